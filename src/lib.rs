#![allow(clippy::doc_markdown)] // Allow technical terms in docs without backticks
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Textconv Core
//!
//! Configurable per-type dispatch for turning strings into values and values
//! into strings.
//!
//! ## Overview
//!
//! A [`ParserContainer`] hands out a parser strategy for any registered type,
//! and a [`FormatterContainer`] hands out a formatter strategy. Strategies are
//! resolved lazily from each type's declared [`Capabilities`], or supplied
//! explicitly during a one-time configuration session, and cached so every
//! caller sees the same strategy for a given type.
//!
//! ## Key Features
//!
//! - **Capability probing**: `FromStr`, `Display`, [`Formattable`] and
//!   [`Enumeration`] implementations become strategies without glue code
//! - **Policy-driven gaps**: [`MissingTryParse`] and [`MissingFormatSpecific`]
//!   decide what happens when a capability is absent
//! - **Null semantics**: `Option<T>` and reference shapes follow configurable
//!   null and empty-string rules
//! - **Typed and erased access**: `parser::<T>()` and `parser_for(&TypeKey)`
//!   share one cache
//! - **Layered settings**: options can be loaded from TOML files and
//!   environment variables
//!
//! ## Module Organization
//!
//! - [`shape`] - Type registration and erasure
//! - [`capability`] - Capability tables and probing
//! - [`parser`] - Parser strategies, container and configuration
//! - [`formatter`] - Formatter strategies, container and configuration
//! - [`registry`] - Strategy caches
//! - [`config`] - Options, policies and settings loading
//! - [`convert`] - Type-associated converters
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use textconv_core::{Formatter, FormatterContainer, Parser, ParserContainer};
//!
//! # fn main() -> textconv_core::ConvertResult<()> {
//! let port = ParserContainer::global().parser::<u16>()?.parse("8080")?;
//! let hex = FormatterContainer::global()
//!     .formatter::<u16>()?
//!     .format_specific(&port, "X")?;
//!
//! assert_eq!(hex.as_deref(), Some("1F90"));
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod config;
pub mod constants;
pub mod convert;
pub mod error;
pub mod formatter;
pub mod logging;
pub mod parser;
pub mod primitives;
pub mod registry;
pub mod shape;

pub use capability::{
    Capabilities, Enumeration, FormatFn, Formattable, Locale, LocaleFormatFn, ParseFn,
    ToStringFn, TryParseFn, Visibility,
};
pub use config::{
    ConversionSettings, FormatterOptions, MissingFormatSpecific, MissingTryParse,
    NullFormatHandling, ParserOptions, SettingsLoader,
};
pub use convert::{FromStrConverter, TypeConverter};
pub use error::{ConvertError, ConvertResult, Operation};
pub use formatter::{
    ErasedFormatter, Formatter, FormatterConfiguration, FormatterContainer, FunctorFormatter,
    StringFormatter,
};
pub use parser::{
    ErasedParser, FunctorParser, Outcome, Parser, ParserConfiguration, ParserContainer, ParserExt,
    StringParser,
};
pub use registry::{CacheStats, StrategyOrigin};
pub use shape::{Boxed, Shape, TypeKey, TypeKind};
