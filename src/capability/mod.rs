//! # Capability Tables
//!
//! A [`Capabilities`] table lists what a type knows how to do: parse a string,
//! try-parse a string, render itself plainly or with a format specifier. The
//! containers probe the table once per type and compose strategies from the
//! bindings they find.
//!
//! Bindings carry a [`Visibility`]. Trait-derived bindings
//! (`parse_from_str`, `formattable`, `enumeration`, ...) are `Explicit`;
//! closure bindings (`parse_fn`, `format_fn`, ...) are `Public`. When a slot
//! receives bindings of both visibilities the explicit one wins. Two bindings
//! at the same visibility make the slot ambiguous, which is reported only when
//! resolution actually consults that slot.

mod enumeration;
pub(crate) mod probe;

pub use enumeration::Enumeration;
pub(crate) use enumeration::EnumTable;

use std::any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::convert::TypeConverter;
use crate::error::{ConvertError, ConvertResult};

/// Parse a non-null string into a `T`
pub type ParseFn<T> = Arc<dyn Fn(&str) -> ConvertResult<T> + Send + Sync>;
/// Attempt to parse a non-null string, `None` on failure
pub type TryParseFn<T> = Arc<dyn Fn(&str) -> Option<T> + Send + Sync>;
/// Render a value without a format specifier
pub type ToStringFn<T> = Arc<dyn Fn(&T) -> ConvertResult<String> + Send + Sync>;
/// Render a value with a format specifier
pub type FormatFn<T> = Arc<dyn Fn(&T, &str) -> ConvertResult<String> + Send + Sync>;
/// Render a value with a format specifier and a locale
pub type LocaleFormatFn<T> = Arc<dyn Fn(&T, &str, &Locale) -> ConvertResult<String> + Send + Sync>;

/// How a capability was bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Bound from a free closure
    Public,
    /// Bound from a trait implementation
    Explicit,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Explicit => write!(f, "explicit"),
        }
    }
}

/// Formatting culture tag. The empty tag is the invariant locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn invariant() -> Self {
        Self(String::new())
    }

    pub fn tag(&self) -> &str {
        &self.0
    }

    pub fn is_invariant(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invariant() {
            f.write_str("invariant")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Generic "format with specifier and locale" capability.
///
/// When a type binds this, it services both plain and specific formatting;
/// plain formatting passes the empty specifier.
pub trait Formattable {
    fn format_with(&self, format: &str, locale: &Locale) -> ConvertResult<String>;
}

enum Slot<F> {
    Empty,
    Bound(Visibility, F),
    Ambiguous(Visibility),
}

impl<F> Slot<F> {
    fn bind(&mut self, visibility: Visibility, binding: F) {
        let current = std::mem::replace(self, Slot::Empty);
        *self = match current {
            Slot::Empty => Slot::Bound(visibility, binding),
            Slot::Bound(existing, _) if existing == visibility => Slot::Ambiguous(existing),
            Slot::Bound(Visibility::Explicit, kept) => Slot::Bound(Visibility::Explicit, kept),
            Slot::Bound(Visibility::Public, _) => Slot::Bound(visibility, binding),
            Slot::Ambiguous(Visibility::Public) if visibility == Visibility::Explicit => {
                Slot::Bound(visibility, binding)
            }
            ambiguous @ Slot::Ambiguous(_) => ambiguous,
        };
    }

    fn resolve(self, type_name: &'static str, capability: &'static str) -> ConvertResult<Option<F>> {
        match self {
            Slot::Empty => Ok(None),
            Slot::Bound(_, binding) => Ok(Some(binding)),
            Slot::Ambiguous(visibility) => Err(ConvertError::ambiguous_capability(
                type_name, capability, visibility,
            )),
        }
    }

    fn is_bound(&self) -> bool {
        !matches!(self, Slot::Empty)
    }
}

/// Per-type capability bindings
pub struct Capabilities<T> {
    parse: Slot<ParseFn<T>>,
    try_parse: Slot<TryParseFn<T>>,
    enumeration: Option<EnumTable<T>>,
    formattable: Slot<LocaleFormatFn<T>>,
    format_with_locale: Slot<LocaleFormatFn<T>>,
    format: Slot<FormatFn<T>>,
    to_string: Slot<ToStringFn<T>>,
    converter: Option<Arc<dyn TypeConverter<T>>>,
}

impl<T> Default for Capabilities<T> {
    fn default() -> Self {
        Self {
            parse: Slot::Empty,
            try_parse: Slot::Empty,
            enumeration: None,
            formattable: Slot::Empty,
            format_with_locale: Slot::Empty,
            format: Slot::Empty,
            to_string: Slot::Empty,
            converter: None,
        }
    }
}

impl<T: Send + Sync + 'static> Capabilities<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_fn<F>(mut self, parse: F) -> Self
    where
        F: Fn(&str) -> ConvertResult<T> + Send + Sync + 'static,
    {
        self.parse.bind(Visibility::Public, Arc::new(parse));
        self
    }

    pub fn try_parse_fn<F>(mut self, try_parse: F) -> Self
    where
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        self.try_parse.bind(Visibility::Public, Arc::new(try_parse));
        self
    }

    pub fn to_string_fn<F>(mut self, to_string: F) -> Self
    where
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        let binding: ToStringFn<T> = Arc::new(move |value: &T| Ok(to_string(value)));
        self.to_string.bind(Visibility::Public, binding);
        self
    }

    pub fn format_fn<F>(mut self, format: F) -> Self
    where
        F: Fn(&T, &str) -> String + Send + Sync + 'static,
    {
        let binding: FormatFn<T> = Arc::new(move |value: &T, spec: &str| Ok(format(value, spec)));
        self.format.bind(Visibility::Public, binding);
        self
    }

    pub fn format_with_locale_fn<F>(mut self, format: F) -> Self
    where
        F: Fn(&T, &str, &Locale) -> String + Send + Sync + 'static,
    {
        let binding: LocaleFormatFn<T> =
            Arc::new(move |value: &T, spec: &str, locale: &Locale| Ok(format(value, spec, locale)));
        self.format_with_locale.bind(Visibility::Public, binding);
        self
    }

    /// Bind `FromStr` as the parse capability
    pub fn parse_from_str(mut self) -> Self
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let binding: ParseFn<T> = Arc::new(|input: &str| {
            input
                .parse::<T>()
                .map_err(|error| ConvertError::format(any::type_name::<T>(), error.to_string()))
        });
        self.parse.bind(Visibility::Explicit, binding);
        self
    }

    /// Bind `FromStr` as the try-parse capability
    pub fn try_parse_from_str(mut self) -> Self
    where
        T: FromStr,
    {
        let binding: TryParseFn<T> = Arc::new(|input: &str| input.parse::<T>().ok());
        self.try_parse.bind(Visibility::Explicit, binding);
        self
    }

    /// Bind `Display` as the plain rendering
    pub fn to_string_from_display(mut self) -> Self
    where
        T: fmt::Display,
    {
        let binding: ToStringFn<T> = Arc::new(|value: &T| Ok(value.to_string()));
        self.to_string.bind(Visibility::Explicit, binding);
        self
    }

    pub fn formattable(mut self) -> Self
    where
        T: Formattable,
    {
        let binding: LocaleFormatFn<T> =
            Arc::new(|value: &T, spec: &str, locale: &Locale| value.format_with(spec, locale));
        self.formattable.bind(Visibility::Explicit, binding);
        self
    }

    /// Bind the native enum parser and formatter
    pub fn enumeration(mut self) -> Self
    where
        T: Enumeration,
    {
        let table = EnumTable::<T>::of();
        self.enumeration = Some(table);
        let binding: LocaleFormatFn<T> = Arc::new(move |value: &T, spec: &str, _locale: &Locale| {
            table.format(value, spec, any::type_name::<T>())
        });
        self.formattable.bind(Visibility::Explicit, binding);
        self
    }

    pub fn type_converter<C>(mut self, converter: C) -> Self
    where
        C: TypeConverter<T> + 'static,
    {
        self.converter = Some(Arc::new(converter));
        self
    }

    /// Whether default parser resolution will find a parse capability
    pub fn has_parse(&self) -> bool {
        self.parse.is_bound() || self.enumeration.is_some()
    }

    pub fn has_type_converter(&self) -> bool {
        self.converter.is_some()
    }

    pub(crate) fn into_converter(self) -> Option<Arc<dyn TypeConverter<T>>> {
        self.converter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_binding_beats_public() {
        let mut slot: Slot<u8> = Slot::Empty;
        slot.bind(Visibility::Public, 1);
        slot.bind(Visibility::Explicit, 2);
        assert_eq!(slot.resolve("t", "parse"), Ok(Some(2)));

        let mut slot: Slot<u8> = Slot::Empty;
        slot.bind(Visibility::Explicit, 2);
        slot.bind(Visibility::Public, 1);
        assert_eq!(slot.resolve("t", "parse"), Ok(Some(2)));
    }

    #[test]
    fn test_same_visibility_is_ambiguous() {
        let mut slot: Slot<u8> = Slot::Empty;
        slot.bind(Visibility::Public, 1);
        slot.bind(Visibility::Public, 2);
        assert_eq!(
            slot.resolve("t", "parse"),
            Err(ConvertError::ambiguous_capability(
                "t",
                "parse",
                Visibility::Public
            ))
        );
    }

    #[test]
    fn test_explicit_resolves_public_ambiguity() {
        let mut slot: Slot<u8> = Slot::Empty;
        slot.bind(Visibility::Public, 1);
        slot.bind(Visibility::Public, 2);
        slot.bind(Visibility::Explicit, 3);
        assert_eq!(slot.resolve("t", "parse"), Ok(Some(3)));
    }

    #[test]
    fn test_locale_display() {
        assert_eq!(Locale::invariant().to_string(), "invariant");
        assert_eq!(Locale::new("fr-FR").to_string(), "fr-FR");
        assert_eq!(Locale::default(), Locale::invariant());
    }
}
