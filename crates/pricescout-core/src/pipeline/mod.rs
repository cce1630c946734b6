//! Product pricing pipeline components.
//!
//! - **validate**: Pre-decode checks on the image file
//! - **decode**: Load and decode the image with a timeout
//! - **encode**: Normalize to JPEG for upload
//! - **identify**: Vision prompt and identification parsing
//! - **pricing**: Pricing prompt and price-list parsing
//! - **present**: Sort, rank, and summarize quotes
//! - **processor**: Orchestrates the full pipeline

pub mod decode;
pub mod encode;
pub mod identify;
pub mod present;
pub mod pricing;
pub mod processor;
pub mod validate;

pub use decode::{DecodedImage, ImageDecoder};
pub use encode::{encode_for_upload, encode_jpeg, JPEG_QUALITY};
pub use identify::derive_query;
pub use present::present;
pub use pricing::DISCLAIMER;
pub use processor::PriceFinder;
pub use validate::Validator;
