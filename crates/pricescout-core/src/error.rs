//! Error types for the PriceScout pipeline.
//!
//! Errors are organized by stage so every failure can be reported to the user
//! with the detail needed to retry by hand: the stage that failed, the HTTP
//! status and body, or the raw model text that could not be parsed.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::extract::ExtractionError;

/// Top-level error type for PriceScout operations.
#[derive(Error, Debug)]
pub enum PriceScoutError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// The pipeline stage a model call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Vision call that names the product in a photo
    Identification,
    /// Text call that estimates retailer prices
    PriceSearch,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Identification => write!(f, "Product identification"),
            Stage::PriceSearch => write!(f, "Price search"),
        }
    }
}

/// Failures talking to the chat-completions endpoint.
#[derive(Error, Debug)]
pub enum LlmError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset)
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// No response within the configured timeout
    #[error("timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// 200 OK, but the envelope had no usable `choices[0].message.content`
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// HTTP status code, when the endpoint returned one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image file does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File exceeds the configured size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// File extension is not an accepted raster format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// Image data could not be decoded
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Decoded image could not be re-encoded for upload
    #[error("Image encoding failed: {message}")]
    Encode { message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage after {timeout_ms}ms")]
    Timeout { stage: String, timeout_ms: u64 },

    /// No API credential configured
    #[error("API key not set. Set {env_var} or add api_key under [api] in the config file.")]
    MissingCredential { env_var: String },

    /// Transport or HTTP failure talking to the model
    #[error("{stage} failed: {source}")]
    Llm {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    /// The model answered but its text held no usable JSON
    #[error("{stage} failed: {source}")]
    Extraction {
        stage: Stage,
        #[source]
        source: ExtractionError,
    },

    /// Identification produced neither a search query nor a product name
    #[error("No search query: the identification has neither a search_query nor a product_name")]
    MissingQuery,

    /// Well-formed price response with zero retailers
    #[error("No retailer prices returned for '{query}'")]
    EmptyResult { query: String, raw_response: String },
}

impl PipelineError {
    /// Stage of the model call that failed, if this error came from one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PipelineError::Llm { stage, .. }
            | PipelineError::Extraction { stage, .. } => Some(*stage),
            PipelineError::EmptyResult { .. } => Some(Stage::PriceSearch),
            _ => None,
        }
    }

    /// Soft failures are reported as warnings rather than errors.
    pub fn is_soft(&self) -> bool {
        matches!(self, PipelineError::EmptyResult { .. })
    }

    /// Raw model or HTTP text worth showing for manual inspection.
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            PipelineError::Extraction { source, .. } => Some(source.raw()),
            PipelineError::Llm {
                source: LlmError::Http { body, .. },
                ..
            } => Some(body),
            PipelineError::EmptyResult { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// Convenience type alias for PriceScout results.
pub type Result<T> = std::result::Result<T, PriceScoutError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract_json, JsonKind};

    #[test]
    fn test_llm_error_status_code() {
        let err = LlmError::Http {
            status: 401,
            body: "invalid api key".to_string(),
        };
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(LlmError::Request("dns".into()).status_code(), None);
    }

    #[test]
    fn test_stage_in_message() {
        let err = PipelineError::Llm {
            stage: Stage::PriceSearch,
            source: LlmError::Http {
                status: 503,
                body: "overloaded".to_string(),
            },
        };
        assert_eq!(err.to_string(), "Price search failed: HTTP 503: overloaded");
        assert_eq!(err.stage(), Some(Stage::PriceSearch));
        assert_eq!(err.raw_text(), Some("overloaded"));
    }

    #[test]
    fn test_empty_result_is_soft() {
        let err = PipelineError::EmptyResult {
            query: "kettle".to_string(),
            raw_response: "[]".to_string(),
        };
        assert!(err.is_soft());
        assert!(!PipelineError::MissingQuery.is_soft());
    }

    #[test]
    fn test_extraction_keeps_raw_text() {
        let source = extract_json("I could not identify it.", JsonKind::Object).unwrap_err();
        let err = PipelineError::Extraction {
            stage: Stage::Identification,
            source,
        };
        assert_eq!(err.raw_text(), Some("I could not identify it."));
        assert!(err.to_string().starts_with("Product identification failed"));
    }
}
