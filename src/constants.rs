//! # System Constants
//!
//! Names shared by the containers, the settings loader and the logging layer.

/// Argument names reported by null-argument errors
pub mod arguments {
    pub const INPUT: &str = "input";
    pub const VALUE: &str = "value";
}

/// Environment variables consulted at startup
pub mod env {
    /// Primary environment selector
    pub const ENVIRONMENT: &str = "TEXTCONV_ENV";
    /// Fallback environment selector shared with host applications
    pub const APP_ENVIRONMENT: &str = "APP_ENV";
    /// `EnvFilter` directives for this crate's log output
    pub const LOG_FILTER: &str = "TEXTCONV_LOG";
    /// Selects `json` log output when set to `json`
    pub const LOG_FORMAT: &str = "TEXTCONV_LOG_FORMAT";
    /// Prefix for settings overrides, e.g. `TEXTCONV__PARSER__MISSING_TRY_PARSE`
    pub const SETTINGS_PREFIX: &str = "TEXTCONV";
    /// Separator between the prefix, the section and the key
    pub const SETTINGS_SEPARATOR: &str = "__";
}

/// Settings file naming
pub mod settings {
    pub const BASE_FILE_STEM: &str = "textconv";
    pub const DEFAULT_DIRECTORY: &str = "config";
}

pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Format specifiers understood by the built-in shapes
pub mod specifiers {
    pub const FIXED_DEFAULT_PRECISION: usize = 2;
    /// Largest width or precision accepted after a specifier letter
    pub const MAX_PRECISION: u16 = 999;
    pub const ENUM_HEX_WIDTH: usize = 8;
}
