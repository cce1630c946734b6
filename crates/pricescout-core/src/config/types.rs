//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Chat-completions endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// OpenAI-compatible chat-completions URL
    pub endpoint: String,

    /// Bearer credential (supports ${ENV_VAR} syntax)
    pub api_key: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            api_key: format!("${{{}}}", Self::DEFAULT_KEY_VAR),
        }
    }
}

impl ApiConfig {
    /// Environment variable read when no key is set in the file.
    pub const DEFAULT_KEY_VAR: &'static str = "GROQ_API_KEY";

    /// Name of the env var referenced by `api_key`, or the default one.
    pub fn key_env_var(&self) -> &str {
        self.api_key
            .strip_prefix("${")
            .and_then(|rest| rest.strip_suffix('}'))
            .unwrap_or(Self::DEFAULT_KEY_VAR)
    }

    /// True when `api_key` holds a literal key rather than a reference.
    pub fn has_literal_key(&self) -> bool {
        !self.api_key.is_empty() && !self.api_key.starts_with("${")
    }
}

/// Product identification (vision model) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Vision-capable model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            temperature: 0.3,
            max_tokens: 1024,
        }
    }
}

/// Price estimate (text model) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Text model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Minimum number of retailers to ask the model for
    pub min_retailers: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.3,
            max_tokens: 2048,
            min_retailers: 5,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum image file size in megabytes
    pub max_file_size_mb: u64,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Per-request LLM timeout in milliseconds
    pub llm_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 20,
            decode_timeout_ms: 5000,
            llm_timeout_ms: 60_000,
        }
    }
}

/// Accepted image inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// File extensions accepted for upload
    pub supported_formats: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            supported_formats: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "webp".to_string(),
            ],
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_api_key_is_env_reference() {
        let api = ApiConfig::default();
        assert_eq!(api.api_key, "${GROQ_API_KEY}");
        assert_eq!(api.key_env_var(), "GROQ_API_KEY");
        assert!(!api.has_literal_key());
    }

    #[test]
    fn test_custom_env_reference() {
        let api = ApiConfig {
            api_key: "${MY_KEY}".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(api.key_env_var(), "MY_KEY");
    }

    #[test]
    fn test_literal_key() {
        let api = ApiConfig {
            api_key: "gsk_abc".to_string(),
            ..ApiConfig::default()
        };
        assert!(api.has_literal_key());
        assert_eq!(api.key_env_var(), "GROQ_API_KEY");
    }

    #[test]
    fn test_input_defaults_match_upload_formats() {
        let input = InputConfig::default();
        assert_eq!(input.supported_formats, ["jpg", "jpeg", "png", "webp"]);
    }
}
