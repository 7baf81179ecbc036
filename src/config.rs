//! Configuration management for the gas price editor
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::editor::{EditorLimits, SessionOptions};

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use num_bigint::BigInt;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref ENV_VAR: Regex =
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid");
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub rpc: RpcConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub urls: Vec<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_gas")]
    pub default_gas: u64,
    #[serde(default = "default_gas_price")]
    pub default_gas_price: u64,
    #[serde(default = "default_max_gas_estimation")]
    pub max_gas_estimation: u64,
    /// Keep a price the user typed when the network price arrives late
    #[serde(default)]
    pub preserve_user_price: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_gas() -> u64 {
    21_000
}

fn default_gas_price() -> u64 {
    20_000_000_000
}

fn default_max_gas_estimation() -> u64 {
    50_000_000
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_gas: default_gas(),
            default_gas_price: default_gas_price(),
            max_gas_estimation: default_max_gas_estimation(),
            preserve_user_price: false,
        }
    }
}

impl EditorConfig {
    /// Bounds handed to every store created from this configuration
    pub fn limits(&self) -> EditorLimits {
        EditorLimits {
            max_gas_estimation: BigInt::from(self.max_gas_estimation),
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            preserve_user_price: self.preserve_user_price,
        }
    }
}

impl Settings {
    /// Load settings from `$GAS_EDITOR_CONFIG` or `config/default.toml`
    pub fn load() -> Result<Self> {
        let config_path = env::var("GAS_EDITOR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::parse(&config_str)
    }

    /// Parse settings from TOML text
    pub fn parse(config_str: &str) -> Result<Self> {
        // Substitute environment variables
        let config_str = substitute_env_vars(config_str);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.rpc.urls.is_empty() {
            anyhow::bail!("At least one RPC URL must be configured");
        }

        if self.editor.max_gas_estimation == 0 {
            anyhow::bail!("editor.max_gas_estimation must be greater than zero");
        }

        if self.editor.default_gas >= self.editor.max_gas_estimation {
            tracing::warn!(
                "editor.default_gas ({}) is not below max_gas_estimation ({})",
                self.editor.default_gas,
                self.editor.max_gas_estimation
            );
        }

        Ok(())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();

    for cap in ENV_VAR.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
