//! Input validation before decoding.

use std::io::Read;
use std::path::Path;

use crate::config::{InputConfig, LimitsConfig};
use crate::error::PipelineError;

/// Validates image files before they are decoded.
pub struct Validator {
    limits: LimitsConfig,
    input: InputConfig,
}

impl Validator {
    /// Create a new validator with the given limits and accepted formats.
    pub fn new(limits: LimitsConfig, input: InputConfig) -> Self {
        Self { limits, input }
    }

    /// Perform quick validation before full decode.
    ///
    /// Checks:
    /// - File exists and is readable
    /// - Extension is one of the accepted upload formats
    /// - File size is within limits
    /// - File has valid image magic bytes
    pub fn validate(&self, path: &Path) -> Result<(), PipelineError> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        self.check_extension(path)?;

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {}", e),
        })?;

        let max_bytes = self.limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() / (1024 * 1024),
                max_mb: self.limits.max_file_size_mb,
            });
        }

        self.check_magic_bytes(path)?;

        Ok(())
    }

    fn check_extension(&self, path: &Path) -> Result<(), PipelineError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if self
            .input
            .supported_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(&ext))
        {
            Ok(())
        } else {
            Err(PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
                format: if ext.is_empty() {
                    "unknown".to_string()
                } else {
                    ext
                },
            })
        }
    }

    /// Check file magic bytes to verify it's an image we can upload.
    fn check_magic_bytes(&self, path: &Path) -> Result<(), PipelineError> {
        let mut file = std::fs::File::open(path).map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open file: {}", e),
        })?;

        let mut header = [0u8; 12];
        let bytes_read = file.read(&mut header).unwrap_or(0);

        if !Self::is_valid_image_header(&header, bytes_read) {
            return Err(PipelineError::Decode {
                path: path.to_path_buf(),
                message: "Unrecognized image format (invalid magic bytes)".to_string(),
            });
        }

        Ok(())
    }

    /// JPEG, PNG, and WebP signatures.
    fn is_valid_image_header(header: &[u8; 12], bytes_read: usize) -> bool {
        if bytes_read < 4 {
            return false;
        }

        // JPEG: FF D8 FF
        if header[..3] == [0xFF, 0xD8, 0xFF] {
            return true;
        }

        // PNG: 89 50 4E 47
        if header[..4] == [0x89, b'P', b'N', b'G'] {
            return true;
        }

        // WebP: RIFF....WEBP
        bytes_read >= 12 && &header[..4] == b"RIFF" && &header[8..12] == b"WEBP"
    }
}
