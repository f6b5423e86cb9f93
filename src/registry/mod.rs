//! # Strategy Registry
//!
//! Per-container caches of resolved strategies keyed by type identity.
//!
//! ## Architecture
//!
//! ```text
//! Strategy Registry
//! ├── StrategyCache    (TypeId → entry map behind a single RwLock)
//! ├── StrategyOrigin   (how an entry was produced)
//! └── CacheStats       (snapshot for diagnostics)
//! ```
//!
//! Each cache only grows. An entry inserted for a type is never replaced, so
//! every caller observes the same strategy for that type for the lifetime of
//! the container.

pub(crate) mod strategy_cache;

pub(crate) use strategy_cache::{CachedStrategy, StrategyCache};

use std::fmt;

/// How a cached strategy was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyOrigin {
    /// Built-in identity strategy for `String`
    Identity,
    /// Capability probing
    Default,
    /// Caller-supplied functions
    Function,
    /// Caller-supplied strategy object
    Object,
    /// The type's declared converter
    TypeConverter,
    /// Wrapped around the strategy of an underlying type
    Derived,
}

impl fmt::Display for StrategyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StrategyOrigin::Identity => "identity",
            StrategyOrigin::Default => "default",
            StrategyOrigin::Function => "function",
            StrategyOrigin::Object => "object",
            StrategyOrigin::TypeConverter => "type_converter",
            StrategyOrigin::Derived => "derived",
        };
        f.write_str(label)
    }
}

/// Statistics about a strategy cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub cached_strategies: usize,
    /// Sorted type names of every cached entry
    pub cached_types: Vec<&'static str>,
}
