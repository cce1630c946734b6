//! JPEG encoding of product photos for upload.
//!
//! The full-resolution image is sent; nothing is resized. JPEG has no alpha
//! channel, so RGBA, palette-expanded, and 16-bit images are flattened to
//! 8-bit RGB before encoding. 8-bit grayscale is encoded as-is.

use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage};
use std::borrow::Cow;

use crate::error::PipelineError;
use crate::llm::ImageInput;

/// Fixed JPEG quality used for every upload.
pub const JPEG_QUALITY: u8 = 85;

/// Encode an image as JPEG at [`JPEG_QUALITY`].
pub fn encode_jpeg(image: &DynamicImage) -> Result<Vec<u8>, PipelineError> {
    let image = jpeg_compatible(image);

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    image
        .write_with_encoder(encoder)
        .map_err(|e| PipelineError::Encode {
            message: e.to_string(),
        })?;

    tracing::debug!(
        width = image.width(),
        height = image.height(),
        bytes = buffer.len(),
        "Encoded image as JPEG"
    );
    Ok(buffer)
}

/// Encode an image and wrap it for a chat-completions request.
pub fn encode_for_upload(image: &DynamicImage) -> Result<ImageInput, PipelineError> {
    let bytes = encode_jpeg(image)?;
    Ok(ImageInput::from_bytes(&bytes, "jpeg"))
}

fn jpeg_compatible(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::Rgb8 | ColorType::L8 => Cow::Borrowed(image),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, ImageFormat, Rgba, RgbaImage};

    fn assert_decodes_as_jpeg(bytes: &[u8], width: u32, height: u32) {
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!(decoded.dimensions(), (width, height));
    }

    #[test]
    fn test_rgba_is_flattened_and_encoded() {
        let mut rgba = RgbaImage::new(64, 48);
        for (x, _, pixel) in rgba.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8 * 4, 120, 200, if x % 2 == 0 { 0 } else { 255 }]);
        }
        let bytes = encode_jpeg(&DynamicImage::ImageRgba8(rgba)).unwrap();
        assert_decodes_as_jpeg(&bytes, 64, 48);
    }

    #[test]
    fn test_rgb_passes_through() {
        let bytes = encode_jpeg(&DynamicImage::new_rgb8(33, 17)).unwrap();
        assert_decodes_as_jpeg(&bytes, 33, 17);
    }

    #[test]
    fn test_grayscale_alpha_and_16bit() {
        let la = DynamicImage::new_luma_a8(20, 20);
        assert_decodes_as_jpeg(&encode_jpeg(&la).unwrap(), 20, 20);

        let rgb16 = DynamicImage::new_rgb16(10, 12);
        assert_decodes_as_jpeg(&encode_jpeg(&rgb16).unwrap(), 10, 12);

        let luma = DynamicImage::new_luma8(5, 5);
        assert_decodes_as_jpeg(&encode_jpeg(&luma).unwrap(), 5, 5);
    }

    #[test]
    fn test_no_downscaling() {
        let bytes = encode_jpeg(&DynamicImage::new_rgb8(2000, 1500)).unwrap();
        assert_decodes_as_jpeg(&bytes, 2000, 1500);
    }

    #[test]
    fn test_deterministic() {
        let image = DynamicImage::new_rgba8(32, 32);
        assert_eq!(encode_jpeg(&image).unwrap(), encode_jpeg(&image).unwrap());
    }

    #[test]
    fn test_encode_for_upload_data_url() {
        let input = encode_for_upload(&DynamicImage::new_rgba8(4, 4)).unwrap();
        assert_eq!(input.media_type, "image/jpeg");
        assert!(input.data_url().starts_with("data:image/jpeg;base64,/9j/"));
    }
}
