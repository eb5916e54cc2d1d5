//! Shared configuration loader for the grantha tools.
//!
//! `defaults/grantha.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`GranthaConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use grantha_codec::{EncodeOptions, Grantha, Script};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/grantha.default.toml");

/// Top-level configuration consumed by grantha applications.
#[derive(Debug, Clone, Deserialize)]
pub struct GranthaConfig {
    pub convert: ConvertConfig,
    pub output: OutputConfig,
}

/// What the Markdown encoder writes.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub scripts: Vec<String>,
    pub commentaries: Vec<String>,
    pub all_commentaries: bool,
    pub verify: bool,
}

impl ConvertConfig {
    /// The configured scripts, rejecting names the codec does not know.
    pub fn parsed_scripts(&self) -> Result<Vec<Script>, ConfigError> {
        let scripts = self
            .scripts
            .iter()
            .map(|name| name.parse::<Script>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ConfigError::Message(format!("convert.scripts: {e}")))?;
        if scripts.is_empty() {
            return Err(ConfigError::Message(
                "convert.scripts must name at least one script".to_string(),
            ));
        }
        Ok(scripts)
    }

    /// Encoder options for `doc`.
    ///
    /// `all_commentaries` wins over the explicit list. An empty list selects
    /// no commentaries.
    pub fn encode_options(&self, doc: &Grantha) -> Result<EncodeOptions, ConfigError> {
        let options = EncodeOptions::new(self.parsed_scripts()?);
        Ok(if self.all_commentaries {
            options.all_commentaries(doc)
        } else if self.commentaries.is_empty() {
            options
        } else {
            options.with_commentaries(self.commentaries.iter().cloned())
        })
    }
}

/// Output formatting knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub json_indent: usize,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GranthaConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<GranthaConfig, ConfigError> {
    Loader::new().build()
}
