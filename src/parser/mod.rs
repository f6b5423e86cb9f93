//! # Parsers
//!
//! Typed and type-erased string parsing strategies, the container that
//! resolves and caches them, and the configuration session used to build a
//! container.
//!
//! Absent input is modelled as `None` on the `*_opt` entry points. Plain
//! `parse` and `try_parse` take a `&str` and never see null.
//!
//! ## Usage
//!
//! ```rust
//! use textconv_core::{MissingTryParse, Parser, ParserContainer};
//!
//! # fn main() -> textconv_core::ConvertResult<()> {
//! let parsers = ParserContainer::create(|config| {
//!     config.set_missing_try_parse(MissingTryParse::WrapParse)?;
//!     config.use_fn(|input: &str| Ok(input.len()))
//! })?;
//!
//! assert_eq!(parsers.parser::<usize>()?.parse("four")?, 4);
//! assert_eq!(parsers.parser::<i32>()?.try_parse("x")?, None);
//! # Ok(())
//! # }
//! ```

mod configuration;
mod container;
mod strategy;

pub use configuration::ParserConfiguration;
pub use container::ParserContainer;
pub use strategy::{FunctorParser, StringParser};

pub(crate) use strategy::{lift_parse, lift_try_parse};

use crate::error::ConvertResult;
use crate::shape::{Boxed, TypeKey};

/// Typed parsing strategy for `T`
pub trait Parser<T>: Send + Sync {
    /// Parse possibly-absent input
    fn parse_opt(&self, input: Option<&str>) -> ConvertResult<T>;

    /// `Ok(None)` reports an ordinary failure. Errors are reserved for
    /// unsupported operations and null-handling violations.
    fn try_parse_opt(&self, input: Option<&str>) -> ConvertResult<Option<T>>;

    fn parse(&self, input: &str) -> ConvertResult<T> {
        self.parse_opt(Some(input))
    }

    fn try_parse(&self, input: &str) -> ConvertResult<Option<T>> {
        self.try_parse_opt(Some(input))
    }
}

/// Parsing strategy with the target type erased
pub trait ErasedParser: Send + Sync {
    fn target(&self) -> TypeKey;

    fn parse_boxed(&self, input: Option<&str>) -> ConvertResult<Boxed>;

    fn try_parse_boxed(&self, input: Option<&str>) -> ConvertResult<Option<Boxed>>;
}

/// Result of a try-parse with a fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> Outcome<T> {
    pub fn is_parsed(&self) -> bool {
        matches!(self, Outcome::Parsed(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Parsed(value) | Outcome::Fallback(value) => value,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Outcome::Parsed(value) | Outcome::Fallback(value) => value,
        }
    }
}

/// Fallback helpers over any [`Parser`].
///
/// All of them route through `try_parse_opt`, so an unsupported try-parse
/// still fails instead of silently producing the fallback.
pub trait ParserExt<T>: Parser<T> {
    fn parse_or_default<'a>(&self, input: impl Into<Option<&'a str>>, fallback: T) -> ConvertResult<T> {
        Ok(self.try_parse_opt(input.into())?.unwrap_or(fallback))
    }

    fn parse_or_else<'a, F>(&self, input: impl Into<Option<&'a str>>, fallback: F) -> ConvertResult<T>
    where
        F: FnOnce() -> T,
    {
        Ok(self.try_parse_opt(input.into())?.unwrap_or_else(fallback))
    }

    fn try_parse_or_default<'a>(
        &self,
        input: impl Into<Option<&'a str>>,
        fallback: T,
    ) -> ConvertResult<Outcome<T>> {
        Ok(match self.try_parse_opt(input.into())? {
            Some(value) => Outcome::Parsed(value),
            None => Outcome::Fallback(fallback),
        })
    }

    fn try_parse_or_else<'a, F>(
        &self,
        input: impl Into<Option<&'a str>>,
        fallback: F,
    ) -> ConvertResult<Outcome<T>>
    where
        F: FnOnce() -> T,
    {
        Ok(match self.try_parse_opt(input.into())? {
            Some(value) => Outcome::Parsed(value),
            None => Outcome::Fallback(fallback()),
        })
    }
}

impl<T, P: Parser<T> + ?Sized> ParserExt<T> for P {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let parsed = Outcome::Parsed(3);
        let fallback = Outcome::Fallback(9);

        assert!(parsed.is_parsed());
        assert!(!fallback.is_parsed());
        assert_eq!(*fallback.value(), 9);
        assert_eq!(parsed.into_inner(), 3);
    }
}
