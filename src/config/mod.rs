//! # Conversion Settings
//!
//! Container options can be built in code through a configuration session, or
//! loaded from layered settings sources and applied in one step.
//!
//! ## Sources
//!
//! - `textconv.toml` in the settings directory
//! - `textconv.{environment}.toml` overriding the base file
//! - Environment variables such as `TEXTCONV__PARSER__MISSING_TRY_PARSE=wrap_parse`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use textconv_core::config::SettingsLoader;
//! use textconv_core::ParserContainer;
//!
//! # fn main() -> textconv_core::ConvertResult<()> {
//! let settings = SettingsLoader::new().with_directory("config").load()?;
//! let parsers = ParserContainer::from_settings(&settings)?;
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod options;

use serde::{Deserialize, Serialize};

use crate::error::ConvertResult;

pub use loader::SettingsLoader;
pub use options::{
    FormatterOptions, MissingFormatSpecific, MissingTryParse, NullFormatHandling, ParserOptions,
};

/// Options for both container kinds
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    pub parser: ParserOptions,
    pub formatter: FormatterOptions,
}

impl ConversionSettings {
    /// Parse settings from an in-memory TOML document
    pub fn from_toml_str(document: &str) -> ConvertResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
