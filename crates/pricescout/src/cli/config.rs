//! The `pricescout config` command for configuration management.

use clap::{Args, Subcommand};
use pricescout_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration (literal API keys are masked)
    Show,

    /// Show config file path
    Path,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", masked(&config).to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            init_at(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Write a default config file at `path`.
pub(crate) fn init_at(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

/// Copy of `config` safe to print: a literal key keeps only its last 4 chars.
pub(crate) fn masked(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.api.has_literal_key() {
        shown.api.api_key = mask_key(&shown.api.api_key);
    }
    shown
}

pub(crate) fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key() {
        assert_eq!(mask_key("gsk_abcdefghijklmnop"), "****mnop");
        assert_eq!(mask_key("short"), "****");
    }

    #[test]
    fn test_masked_leaves_env_reference() {
        let config = Config::default();
        assert_eq!(masked(&config).api.api_key, "${GROQ_API_KEY}");

        let mut config = Config::default();
        config.api.api_key = "gsk_live_secret_1234".to_string();
        assert_eq!(masked(&config).api.api_key, "****1234");
        assert_eq!(config.api.api_key, "gsk_live_secret_1234");
    }

    #[test]
    fn test_init_at_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        init_at(&path, false).unwrap();
        let written = Config::load_from(&path).unwrap();
        assert_eq!(written.pricing.min_retailers, 5);

        let err = init_at(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        std::fs::write(&path, "# edited\n").unwrap();
        init_at(&path, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("[api]"));
    }
}
