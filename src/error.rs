//! # Conversion Error Types
//!
//! Structured error handling for parsing, formatting and container
//! configuration. Every fallible operation in the crate returns
//! [`ConvertResult`], and every error surfaces synchronously to the caller of
//! the operation that triggered it.
//!
//! The variants fall into the groups the containers care about:
//!
//! - **Invalid arguments**: [`ConvertError::NullArgument`] and
//!   [`ConvertError::InvalidArgument`]
//! - **Configuration mistakes**: [`ConvertError::Configuration`], raised while a
//!   container is being built and never during later lookups
//! - **Capability absence**: [`ConvertError::NotSupported`], produced only when
//!   the configured policy asks for it
//! - **Conversion failures**: [`ConvertError::Format`] and
//!   [`ConvertError::Conversion`]

use std::fmt;
use thiserror::Error;

use crate::capability::Visibility;

/// The strategy call that an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Parse,
    TryParse,
    Format,
    FormatSpecific,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Parse => write!(f, "parse"),
            Operation::TryParse => write!(f, "try_parse"),
            Operation::Format => write!(f, "format"),
            Operation::FormatSpecific => write!(f, "format_specific"),
        }
    }
}

/// Comprehensive conversion error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Value cannot be null: {argument}")]
    NullArgument { argument: &'static str },

    #[error("Invalid argument: {argument}: {reason}")]
    InvalidArgument {
        argument: &'static str,
        reason: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Operation not supported: {operation} for '{type_name}'")]
    NotSupported {
        type_name: &'static str,
        operation: Operation,
    },

    #[error("Input was not in a correct format for '{type_name}': {message}")]
    Format {
        type_name: &'static str,
        message: String,
    },

    #[error("Ambiguous capability: '{type_name}' binds {capability} more than once with {visibility} visibility")]
    AmbiguousCapability {
        type_name: &'static str,
        capability: &'static str,
        visibility: Visibility,
    },

    #[error("Type mismatch: boxed value is not a '{expected}'")]
    TypeMismatch { expected: &'static str },

    #[error("Conversion failed for '{type_name}': {message}")]
    Conversion {
        type_name: &'static str,
        message: String,
    },

    #[error("Settings error: {message}")]
    Settings { message: String },
}

impl ConvertError {
    /// Create a null argument error
    pub fn null_argument(argument: &'static str) -> Self {
        Self::NullArgument { argument }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(argument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a not supported error
    pub fn not_supported(type_name: &'static str, operation: Operation) -> Self {
        Self::NotSupported {
            type_name,
            operation,
        }
    }

    /// Create a format error
    pub fn format(type_name: &'static str, message: impl Into<String>) -> Self {
        Self::Format {
            type_name,
            message: message.into(),
        }
    }

    /// Create an ambiguous capability error
    pub fn ambiguous_capability(
        type_name: &'static str,
        capability: &'static str,
        visibility: Visibility,
    ) -> Self {
        Self::AmbiguousCapability {
            type_name,
            capability,
            visibility,
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(expected: &'static str) -> Self {
        Self::TypeMismatch { expected }
    }

    /// Create a conversion error
    pub fn conversion(type_name: &'static str, message: impl Into<String>) -> Self {
        Self::Conversion {
            type_name,
            message: message.into(),
        }
    }

    /// Create a settings error
    pub fn settings(message: impl Into<String>) -> Self {
        Self::Settings {
            message: message.into(),
        }
    }

    pub fn is_null_argument(&self) -> bool {
        matches!(self, Self::NullArgument { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    pub fn is_not_supported(&self) -> bool {
        matches!(self, Self::NotSupported { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

impl From<config::ConfigError> for ConvertError {
    fn from(error: config::ConfigError) -> Self {
        Self::settings(error.to_string())
    }
}

pub type ConvertResult<T> = std::result::Result<T, ConvertError>;
