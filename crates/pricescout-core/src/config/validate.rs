//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.api.endpoint.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.endpoint must not be empty".into(),
            ));
        }
        if self.vision.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "vision.model must not be empty".into(),
            ));
        }
        if self.pricing.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "pricing.model must not be empty".into(),
            ));
        }
        for (name, temperature) in [
            ("vision.temperature", self.vision.temperature),
            ("pricing.temperature", self.pricing.temperature),
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be between 0.0 and 2.0"
                )));
            }
        }
        if self.vision.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "vision.max_tokens must be > 0".into(),
            ));
        }
        if self.pricing.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "pricing.max_tokens must be > 0".into(),
            ));
        }
        if self.pricing.min_retailers == 0 {
            return Err(ConfigError::ValidationError(
                "pricing.min_retailers must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.input.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "input.supported_formats must list at least one format".into(),
            ));
        }
        Ok(())
    }
}
