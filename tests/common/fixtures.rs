//! Shapes shared by the integration tests.

use std::fmt;
use std::str::FromStr;

use textconv_core::{
    Capabilities, ConvertError, ConvertResult, Enumeration, Formattable, Locale, Shape,
    TypeConverter, TypeKind,
};

/// Reference shape with every capability bound
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
}

impl Token {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }

    pub fn parse(input: &str) -> ConvertResult<Self> {
        if input.is_empty() || input.contains(' ') {
            return Err(ConvertError::format("Token", "tokens are single words"));
        }
        Ok(Self::new(input))
    }

    pub fn try_parse(input: &str) -> Option<Self> {
        Self::parse(input).ok()
    }
}

impl Formattable for Token {
    fn format_with(&self, format: &str, locale: &Locale) -> ConvertResult<String> {
        let rendered = match format {
            "" => self.text.clone(),
            "U" => self.text.to_uppercase(),
            "L" => self.text.to_lowercase(),
            other => {
                return Err(ConvertError::format(
                    "Token",
                    format!("unsupported specifier '{other}'"),
                ))
            }
        };
        if locale.is_invariant() {
            Ok(rendered)
        } else {
            Ok(format!("{rendered}@{locale}"))
        }
    }
}

impl Shape for Token {
    const KIND: TypeKind = TypeKind::Reference;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
            .parse_fn(Token::parse)
            .try_parse_fn(Token::try_parse)
            .to_string_fn(|token: &Token| token.text.clone())
            .formattable()
    }
}

/// Reference shape that parses and displays but cannot try-parse or format
/// with a specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label(pub String);

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            Err("label must not be blank".to_string())
        } else {
            Ok(Label(s.trim().to_string()))
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl Shape for Label {
    const KIND: TypeKind = TypeKind::Reference;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new().parse_from_str().to_string_from_display()
    }
}

/// Reference shape with no capabilities at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque;

impl Shape for Opaque {
    const KIND: TypeKind = TypeKind::Reference;
}

/// Value shape with a plain-format binding for specific formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp(pub u32);

impl FromStr for Stamp {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim_start_matches('#').parse().map(Stamp)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Shape for Stamp {
    const KIND: TypeKind = TypeKind::Value;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
            .parse_from_str()
            .try_parse_from_str()
            .to_string_from_display()
            .format_fn(|stamp: &Stamp, spec: &str| format!("#{}/{}", stamp.0, spec))
    }
}

/// Value shape that only displays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker;

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("marker")
    }
}

impl Shape for Marker {
    const KIND: TypeKind = TypeKind::Value;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new().to_string_from_display()
    }
}

/// Value shape whose formattable rendering differs from its to-string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dual;

impl Formattable for Dual {
    fn format_with(&self, format: &str, _locale: &Locale) -> ConvertResult<String> {
        Ok(format!("formattable:{format}"))
    }
}

impl Shape for Dual {
    const KIND: TypeKind = TypeKind::Value;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
            .to_string_fn(|_: &Dual| "to_string".to_string())
            .formattable()
    }
}

/// Value shape with both locale-aware and plain specific formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localized(pub i32);

impl Shape for Localized {
    const KIND: TypeKind = TypeKind::Value;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
            .to_string_fn(|value: &Localized| value.0.to_string())
            .format_fn(|value: &Localized, spec: &str| format!("plain:{}:{spec}", value.0))
            .format_with_locale_fn(|value: &Localized, spec: &str, locale: &Locale| {
                format!("locale:{}:{spec}:{}", value.0, locale.tag())
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red = 1,
    Green = 2,
    Blue = 4,
}

impl Enumeration for Color {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Red", Color::Red),
        ("Green", Color::Green),
        ("Blue", Color::Blue),
    ];

    fn discriminant(self) -> i64 {
        self as i64
    }
}

impl Shape for Color {
    const KIND: TypeKind = TypeKind::Enum;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new().enumeration()
    }
}

/// Value-kind shape that still binds the native enum table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gauge {
    Low = 10,
    High = 20,
}

impl Enumeration for Gauge {
    const VARIANTS: &'static [(&'static str, Self)] =
        &[("Low", Gauge::Low), ("High", Gauge::High)];

    fn discriminant(self) -> i64 {
        self as i64
    }
}

impl Shape for Gauge {
    const KIND: TypeKind = TypeKind::Value;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new().enumeration()
    }
}

/// Reference shape reachable only through its type converter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted(pub String);

pub struct ConvertedConverter;

impl TypeConverter<Converted> for ConvertedConverter {
    fn convert_from_str(&self, input: &str) -> ConvertResult<Converted> {
        match input.strip_prefix("cv:") {
            Some(rest) => Ok(Converted(rest.to_string())),
            None => Err(ConvertError::conversion("Converted", "missing 'cv:' prefix")),
        }
    }

    fn convert_to_string(&self, value: &Converted) -> ConvertResult<String> {
        Ok(format!("cv:{}", value.0))
    }
}

impl Shape for Converted {
    const KIND: TypeKind = TypeKind::Reference;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new().type_converter(ConvertedConverter)
    }
}

/// Shape whose converter only reads strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOnly(pub String);

pub struct ReadOnlyConverter;

impl TypeConverter<ReadOnly> for ReadOnlyConverter {
    fn can_convert_to_str(&self) -> bool {
        false
    }

    fn convert_from_str(&self, input: &str) -> ConvertResult<ReadOnly> {
        Ok(ReadOnly(input.to_string()))
    }

    fn convert_to_string(&self, _value: &ReadOnly) -> ConvertResult<String> {
        Err(ConvertError::conversion("ReadOnly", "cannot convert to string"))
    }
}

impl Shape for ReadOnly {
    const KIND: TypeKind = TypeKind::Reference;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new().type_converter(ReadOnlyConverter)
    }
}

/// Stand-in for a trait-object shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle(pub String);

impl Shape for Handle {
    const KIND: TypeKind = TypeKind::Interface;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
            .parse_fn(|input: &str| Ok(Handle(input.to_string())))
            .to_string_fn(|handle: &Handle| handle.0.clone())
    }
}

/// Stand-in for a callback shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callback;

impl Shape for Callback {
    const KIND: TypeKind = TypeKind::Callable;
}

/// Binds two public parse functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ambiguous(pub u8);

impl fmt::Display for Ambiguous {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ambiguous-{}", self.0)
    }
}

impl Shape for Ambiguous {
    const KIND: TypeKind = TypeKind::Value;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
            .parse_fn(|_: &str| Ok(Ambiguous(1)))
            .parse_fn(|_: &str| Ok(Ambiguous(2)))
            .to_string_from_display()
    }
}

/// Two public try-parse functions and no parse at all
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryOnly(pub u8);

impl Shape for TryOnly {
    const KIND: TypeKind = TypeKind::Value;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
            .try_parse_fn(|_: &str| Some(TryOnly(1)))
            .try_parse_fn(|_: &str| Some(TryOnly(2)))
    }
}

/// Explicit `FromStr` parse alongside a public parse function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferred(pub &'static str);

impl FromStr for Preferred {
    type Err = String;

    fn from_str(_: &str) -> Result<Self, Self::Err> {
        Ok(Preferred("explicit"))
    }
}

impl Shape for Preferred {
    const KIND: TypeKind = TypeKind::Value;

    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
            .parse_fn(|_: &str| Ok(Preferred("public")))
            .parse_from_str()
    }
}

/// Claims to be nullable without wrapping anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rogue;

impl Shape for Rogue {
    const KIND: TypeKind = TypeKind::Nullable;
}

/// Parser that counts characters and accepts absent input
pub struct LengthParser;

impl textconv_core::Parser<usize> for LengthParser {
    fn parse_opt(&self, input: Option<&str>) -> ConvertResult<usize> {
        Ok(input.map(str::len).unwrap_or(0))
    }

    fn try_parse_opt(&self, input: Option<&str>) -> ConvertResult<Option<usize>> {
        Ok(input.map(str::len))
    }
}

/// Formatter that renders tokens in brackets
pub struct BracketFormatter;

impl textconv_core::Formatter<Token> for BracketFormatter {
    fn format(&self, value: &Token) -> ConvertResult<Option<String>> {
        Ok(Some(format!("[{}]", value.text)))
    }

    fn format_specific(&self, value: &Token, format: &str) -> ConvertResult<Option<String>> {
        Ok(Some(format!("[{}:{format}]", value.text)))
    }
}

/// Object strategies for `Converted` that ignore their input
pub struct FixedConverted;

impl textconv_core::Parser<Converted> for FixedConverted {
    fn parse_opt(&self, _: Option<&str>) -> ConvertResult<Converted> {
        Ok(Converted("object".to_string()))
    }

    fn try_parse_opt(&self, _: Option<&str>) -> ConvertResult<Option<Converted>> {
        Ok(Some(Converted("object".to_string())))
    }
}

impl textconv_core::Formatter<Converted> for FixedConverted {
    fn format(&self, _: &Converted) -> ConvertResult<Option<String>> {
        Ok(Some("object".to_string()))
    }

    fn format_specific(&self, _: &Converted, _: &str) -> ConvertResult<Option<String>> {
        Ok(Some("object".to_string()))
    }
}
