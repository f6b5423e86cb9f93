//! Native parsing and formatting for enum shapes.

use crate::constants::specifiers::ENUM_HEX_WIDTH;
use crate::error::{ConvertError, ConvertResult};

/// A fieldless enum with named variants and integer discriminants.
///
/// ```rust
/// use textconv_core::Enumeration;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Level { Low = 1, High = 2 }
///
/// impl Enumeration for Level {
///     const VARIANTS: &'static [(&'static str, Self)] = &[("Low", Level::Low), ("High", Level::High)];
///     fn discriminant(self) -> i64 { self as i64 }
/// }
/// ```
pub trait Enumeration: Copy + Send + Sync + 'static {
    const VARIANTS: &'static [(&'static str, Self)];

    fn discriminant(self) -> i64;
}

pub(crate) struct EnumTable<T> {
    parse: fn(&str, &'static str) -> ConvertResult<T>,
    format: fn(&T, &str, &'static str) -> ConvertResult<String>,
}

impl<T> Clone for EnumTable<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EnumTable<T> {}

impl<E: Enumeration> EnumTable<E> {
    pub(crate) fn of() -> Self {
        EnumTable {
            parse: parse_variant::<E>,
            format: format_variant::<E>,
        }
    }
}

impl<T> EnumTable<T> {
    pub(crate) fn parse(&self, input: &str, type_name: &'static str) -> ConvertResult<T> {
        (self.parse)(input, type_name)
    }

    pub(crate) fn format(
        &self,
        value: &T,
        format: &str,
        type_name: &'static str,
    ) -> ConvertResult<String> {
        (self.format)(value, format, type_name)
    }
}

/// Variant name first, then a numeric discriminant. Names are case-sensitive.
fn parse_variant<E: Enumeration>(input: &str, type_name: &'static str) -> ConvertResult<E> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ConvertError::format(
            type_name,
            "must specify a variant name or value",
        ));
    }

    if let Some((_, variant)) = E::VARIANTS.iter().find(|(name, _)| *name == trimmed) {
        return Ok(*variant);
    }

    match trimmed.parse::<i64>() {
        Ok(number) => E::VARIANTS
            .iter()
            .find(|(_, variant)| variant.discriminant() == number)
            .map(|(_, variant)| *variant)
            .ok_or_else(|| {
                ConvertError::format(type_name, format!("{number} is not a defined value"))
            }),
        Err(_) => Err(ConvertError::format(
            type_name,
            format!("requested value '{trimmed}' was not found"),
        )),
    }
}

fn name_of<E: Enumeration>(value: E) -> Option<&'static str> {
    let discriminant = value.discriminant();
    E::VARIANTS
        .iter()
        .find(|(_, variant)| variant.discriminant() == discriminant)
        .map(|(name, _)| *name)
}

fn format_variant<E: Enumeration>(
    value: &E,
    format: &str,
    type_name: &'static str,
) -> ConvertResult<String> {
    let discriminant = value.discriminant();
    match format {
        "" | "G" | "g" | "F" | "f" => Ok(name_of(*value)
            .map(str::to_string)
            .unwrap_or_else(|| discriminant.to_string())),
        "D" | "d" => Ok(discriminant.to_string()),
        "X" | "x" => Ok(format!("{discriminant:0width$X}", width = ENUM_HEX_WIDTH)),
        other => Err(ConvertError::format(
            type_name,
            format!("format specifier '{other}' is not valid for an enum"),
        )),
    }
}
