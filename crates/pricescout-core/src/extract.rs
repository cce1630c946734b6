//! Recover a JSON value from free-form model output.
//!
//! Hosted models do not reliably return bare JSON even when told to. The
//! recovery here is deliberately small:
//!
//! ```text
//! trim → unwrap ```json / ``` fence → bound by first open / last close → strict parse
//! ```
//!
//! Nothing is repaired. If the bounded candidate does not parse, the caller
//! gets an [`ExtractionError`] holding the raw text so it can be shown to the
//! user as-is.

use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// The structural kind of JSON value to look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    /// `{ ... }`
    Object,
    /// `[ ... ]`
    Array,
}

impl JsonKind {
    fn delimiters(self) -> (char, char) {
        match self {
            JsonKind::Object => ('{', '}'),
            JsonKind::Array => ('[', ']'),
        }
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonKind::Object => write!(f, "object"),
            JsonKind::Array => write!(f, "array"),
        }
    }
}

/// Model text did not contain a parseable value of the expected kind.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No opening delimiter, or no closing delimiter after it
    #[error("no JSON {kind} found in model response")]
    NotFound { kind: JsonKind, raw: String },

    /// A candidate was found but the strict parser rejected it
    #[error("invalid JSON {kind} in model response: {source}")]
    Parse {
        kind: JsonKind,
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ExtractionError {
    /// The untouched model text, for diagnostic display.
    pub fn raw(&self) -> &str {
        match self {
            ExtractionError::NotFound { raw, .. } | ExtractionError::Parse { raw, .. } => raw,
        }
    }
}

/// Take the interior of the first markdown fence, preferring one tagged `json`.
///
/// An unterminated fence runs to the end of the text. Text with no fence is
/// returned trimmed and otherwise unchanged.
pub fn unwrap_fence(text: &str) -> &str {
    let text = text.trim();
    let body = if let Some(start) = text.find(JSON_FENCE) {
        &text[start + JSON_FENCE.len()..]
    } else if let Some(start) = text.find(FENCE) {
        &text[start + FENCE.len()..]
    } else {
        return text;
    };
    match body.find(FENCE) {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Bound `text` by the first opening and last closing delimiter of `kind`.
pub fn locate(text: &str, kind: JsonKind) -> Option<&str> {
    let (open, close) = kind.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (end > start).then(|| &text[start..=end])
}

/// Extract a JSON value of the given kind from raw model output.
pub fn extract_json(text: &str, kind: JsonKind) -> Result<serde_json::Value, ExtractionError> {
    extract_as(text, kind)
}

/// Extract and deserialize straight into `T`.
///
/// Deserialization failures are reported the same way as syntax errors.
pub fn extract_as<T: DeserializeOwned>(text: &str, kind: JsonKind) -> Result<T, ExtractionError> {
    let candidate =
        locate(unwrap_fence(text), kind).ok_or_else(|| ExtractionError::NotFound {
            kind,
            raw: text.to_string(),
        })?;

    serde_json::from_str(candidate).map_err(|source| ExtractionError::Parse {
        kind,
        raw: text.to_string(),
        source,
    })
}
