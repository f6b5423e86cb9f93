//! Container options and the policy enums they carry.
//!
//! Options are fixed once a container's configuration session ends. Every
//! field has a serde default so partial settings files deserialize cleanly.

use serde::{Deserialize, Serialize};

use crate::capability::Locale;

/// Fallback used when a type can parse but cannot try-parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTryParse {
    /// Try-parse calls fail with a not-supported error
    #[default]
    ThrowNotSupported,
    /// Try-parse calls report failure without trying
    ReturnFalse,
    /// Try-parse calls run the parser and map any error to failure
    WrapParse,
}

/// Fallback used when a type can be rendered but has no specific formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFormatSpecific {
    #[default]
    ThrowNotSupported,
    ReturnEmptyString,
    ReturnNull,
    /// Ignore the specifier and use plain formatting
    UseToString,
}

/// Result of formatting an absent nullable value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullFormatHandling {
    #[default]
    ThrowNullArgument,
    ReturnNull,
    ReturnEmptyString,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    pub missing_try_parse: MissingTryParse,
    /// Null input yields null for reference shapes
    pub reference_types_parse_null_to_null: bool,
    /// Null input yields `None` for nullable value shapes
    pub nullable_value_types_parse_null_to_null: bool,
    /// Empty input yields `None` for nullable value shapes
    pub nullable_value_types_parse_empty_string_to_null: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterOptions {
    pub missing_format_specific: MissingFormatSpecific,
    /// Null values format to null for reference shapes
    pub reference_types_format_null_to_null: bool,
    pub nullable_value_types_format_null: NullFormatHandling,
    /// Locale handed to formattable bindings
    pub default_locale: Locale,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let parser = ParserOptions::default();
        assert_eq!(parser.missing_try_parse, MissingTryParse::ThrowNotSupported);
        assert!(!parser.reference_types_parse_null_to_null);
        assert!(!parser.nullable_value_types_parse_null_to_null);
        assert!(!parser.nullable_value_types_parse_empty_string_to_null);

        let formatter = FormatterOptions::default();
        assert_eq!(
            formatter.missing_format_specific,
            MissingFormatSpecific::ThrowNotSupported
        );
        assert_eq!(
            formatter.nullable_value_types_format_null,
            NullFormatHandling::ThrowNullArgument
        );
        assert!(formatter.default_locale.is_invariant());
    }

    #[test]
    fn test_policy_serialization() {
        let json = serde_json::to_string(&MissingTryParse::WrapParse).unwrap();
        assert_eq!(json, "\"wrap_parse\"");

        let options: ParserOptions =
            serde_json::from_str(r#"{"missing_try_parse":"return_false"}"#).unwrap();
        assert_eq!(options.missing_try_parse, MissingTryParse::ReturnFalse);
        assert!(!options.reference_types_parse_null_to_null);
    }
}
