//! # Formatters
//!
//! Typed and type-erased formatting strategies, the container that resolves
//! and caches them, and the configuration session used to build a container.
//!
//! A formatter result of `Ok(None)` is a null string. Null results only appear
//! where a policy asks for them: nullable wrappers, reference null pass-through
//! or `MissingFormatSpecific::ReturnNull`.
//!
//! ## Usage
//!
//! ```rust
//! use textconv_core::{Formatter, FormatterContainer, MissingFormatSpecific};
//!
//! # fn main() -> textconv_core::ConvertResult<()> {
//! let formatters = FormatterContainer::create(|config| {
//!     config.set_missing_format_specific(MissingFormatSpecific::UseToString)
//! })?;
//!
//! let formatter = formatters.formatter::<u32>()?;
//! assert_eq!(formatter.format(&255)?, Some("255".to_string()));
//! assert_eq!(formatter.format_specific(&255, "X4")?, Some("00FF".to_string()));
//! # Ok(())
//! # }
//! ```

mod configuration;
mod container;
mod strategy;

pub use configuration::FormatterConfiguration;
pub use container::FormatterContainer;
pub use strategy::{FunctorFormatter, StringFormatter};

use crate::error::ConvertResult;
use crate::shape::{Boxed, TypeKey};

/// Typed formatting strategy for `T`
pub trait Formatter<T>: Send + Sync {
    fn format(&self, value: &T) -> ConvertResult<Option<String>>;

    fn format_specific(&self, value: &T, format: &str) -> ConvertResult<Option<String>>;
}

/// Formatting strategy with the source type erased
pub trait ErasedFormatter: Send + Sync {
    fn target(&self) -> TypeKey;

    fn format_boxed(&self, value: Boxed) -> ConvertResult<Option<String>>;

    fn format_specific_boxed(&self, value: Boxed, format: &str) -> ConvertResult<Option<String>>;
}
