//! API key setup: detection, entry, and optional persistence.

use anyhow::Context;
use console::Style;
use dialoguer::{Password, Select};
use pricescout_core::llm::resolve_api_key;
use pricescout_core::Config;
use std::path::Path;

use super::theme::pricescout_theme;

/// Where the current API key comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeyStatus {
    /// Literal key in the config file (or entered this session)
    Literal,
    /// Resolved from the named environment variable
    Environment(String),
    /// Nothing usable; the named variable is unset
    Missing(String),
}

pub(crate) fn key_status(config: &Config) -> KeyStatus {
    if config.api.has_literal_key() {
        return KeyStatus::Literal;
    }
    let var = config.api.key_env_var().to_string();
    match resolve_api_key(&config.api) {
        Ok(_) => KeyStatus::Environment(var),
        Err(_) => KeyStatus::Missing(var),
    }
}

/// Show where the key comes from and offer to replace it.
pub fn configure_api_key(config: &mut Config) -> anyhow::Result<bool> {
    let dim = Style::new().for_stderr().dim();

    let current = match key_status(config) {
        KeyStatus::Literal => "API key set in config".to_string(),
        KeyStatus::Environment(var) => format!("API key read from ${var}"),
        KeyStatus::Missing(var) => format!("No API key ({var} not set)"),
    };
    eprintln!("  {}", dim.apply_to(current));
    eprintln!(
        "  {}",
        dim.apply_to(format!("Config file: {}", Config::default_path().display()))
    );

    prompt_api_key(config)
}

/// Ask for a key, apply it to `config`, and optionally save it.
///
/// Returns `false` if the user skipped.
pub fn prompt_api_key(config: &mut Config) -> anyhow::Result<bool> {
    let theme = pricescout_theme();
    let warn = Style::new().for_stderr().yellow();

    let key = match Password::with_theme(&theme)
        .with_prompt("Enter your Groq API key (leave empty to skip)")
        .allow_empty_password(true)
        .interact()
    {
        Ok(k) if !k.trim().is_empty() => k.trim().to_string(),
        _ => return Ok(false),
    };

    let save_options = &["Yes, save to config file", "No, use for this session only"];
    let save_choice = Select::with_theme(&theme)
        .with_prompt("Save this key for future sessions?")
        .items(save_options)
        .default(0)
        .interact_opt()?;

    match save_choice {
        Some(0) => {
            let path = Config::default_path();
            match save_key_to_config(&path, &key) {
                Ok(()) => {
                    let dim = Style::new().for_stderr().dim();
                    eprintln!(
                        "  {}",
                        dim.apply_to(format!("Key saved to {}", path.display()))
                    );
                }
                Err(e) => {
                    eprintln!(
                        "  {}",
                        warn.apply_to(format!("Could not save to config: {e:#}"))
                    );
                    eprintln!("  Using key for this session only.");
                }
            }
        }
        Some(_) => {}
        None => return Ok(false),
    }

    config.api.api_key = key;
    Ok(true)
}

/// Write `key` under `[api]` in the config file, preserving comments.
pub(crate) fn save_key_to_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let content = if path.exists() {
        std::fs::read_to_string(path)?
    } else {
        String::new()
    };

    let mut doc: toml_edit::DocumentMut = content
        .parse()
        .with_context(|| format!("{} is not valid TOML", path.display()))?;

    if !doc.get("api").is_some_and(|item| item.is_table()) {
        doc["api"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["api"]["api_key"] = toml_edit::value(key);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, doc.to_string())?;
    Ok(())
}
