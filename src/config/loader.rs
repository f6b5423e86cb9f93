//! Settings Loader
//!
//! Environment-aware loading of [`ConversionSettings`] from layered sources.
//! Missing files are skipped; malformed files and unknown policy names fail.

use std::env;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::debug;

use super::ConversionSettings;
use crate::constants::{self, settings};
use crate::error::ConvertResult;
use crate::logging::log_configuration;

#[derive(Debug, Clone)]
pub struct SettingsLoader {
    directory: PathBuf,
    environment: String,
    env_prefix: Option<String>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            directory: PathBuf::from(settings::DEFAULT_DIRECTORY),
            environment: Self::detect_environment(),
            env_prefix: Some(constants::env::SETTINGS_PREFIX.to_string()),
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Use an explicit environment instead of the detected one
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into().to_lowercase();
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn without_env_overrides(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn detect_environment() -> String {
        env::var(constants::env::ENVIRONMENT)
            .or_else(|_| env::var(constants::env::APP_ENVIRONMENT))
            .unwrap_or_else(|_| constants::DEFAULT_ENVIRONMENT.to_string())
            .to_lowercase()
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn base_file(&self) -> PathBuf {
        self.directory
            .join(format!("{}.toml", settings::BASE_FILE_STEM))
    }

    pub fn environment_file(&self) -> PathBuf {
        self.directory.join(format!(
            "{}.{}.toml",
            settings::BASE_FILE_STEM,
            self.environment
        ))
    }

    pub fn load(&self) -> ConvertResult<ConversionSettings> {
        debug!(
            "Loading conversion settings for environment '{}' from directory: {}",
            self.environment,
            self.directory.display()
        );

        let mut builder = Config::builder()
            .add_source(File::from(self.base_file()).required(false))
            .add_source(File::from(self.environment_file()).required(false));

        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator(constants::env::SETTINGS_SEPARATOR)
                    .separator(constants::env::SETTINGS_SEPARATOR)
                    .try_parsing(true),
            );
        }

        let settings: ConversionSettings = builder.build()?.try_deserialize()?;

        debug!(
            "Conversion settings loaded: {}",
            serde_json::to_string(&settings).unwrap_or_else(|_| "[serialization error]".to_string())
        );
        log_configuration(
            "load_settings",
            None,
            "loaded",
            Some(self.environment.as_str()),
        );

        Ok(settings)
    }
}
