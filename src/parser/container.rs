//! Parser container: lazy resolution and caching of parser strategies.

use std::any::{self, Any, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, info};

use super::configuration::ParserConfiguration;
use super::strategy::{self, BoxedParser, NullableParsePolicy};
use super::{lift_parse, lift_try_parse, ErasedParser, Parser};
use crate::capability::probe::ParseCapability;
use crate::config::{ConversionSettings, MissingTryParse, ParserOptions};
use crate::error::{ConvertError, ConvertResult};
use crate::logging::{log_error, log_resolution};
use crate::registry::{CacheStats, CachedStrategy, StrategyCache, StrategyOrigin};
use crate::shape::{self, Shape, TypeKey, TypeKind};

const CONTAINER: &str = "parser";

static GLOBAL_PARSERS: OnceLock<ParserContainer> = OnceLock::new();

pub(crate) struct ParserCore {
    pub(crate) options: RwLock<ParserOptions>,
    pub(crate) cache: StrategyCache<ParserEntry>,
}

#[derive(Clone)]
pub(crate) struct ParserEntry {
    type_name: &'static str,
    /// Holds an `Arc<dyn Parser<T>>` for the entry's type
    typed: Arc<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedParser>,
    origin: StrategyOrigin,
}

impl ParserEntry {
    pub(crate) fn new<T: Shape>(
        parser: Arc<dyn Parser<T>>,
        origin: StrategyOrigin,
        options: &ParserOptions,
    ) -> Self {
        let null_passthrough = match origin {
            StrategyOrigin::Identity => true,
            StrategyOrigin::Object => false,
            _ => {
                (T::KIND == TypeKind::Str || T::KIND.is_reference_like())
                    && options.reference_types_parse_null_to_null
            }
        };
        let erased: Arc<dyn ErasedParser> =
            Arc::new(BoxedParser::new(Arc::clone(&parser), null_passthrough));

        Self {
            type_name: any::type_name::<T>(),
            typed: Arc::new(parser),
            erased,
            origin,
        }
    }

    fn typed<T: Shape>(&self) -> ConvertResult<Arc<dyn Parser<T>>> {
        self.typed
            .downcast_ref::<Arc<dyn Parser<T>>>()
            .cloned()
            .ok_or_else(|| ConvertError::type_mismatch(any::type_name::<T>()))
    }
}

impl CachedStrategy for ParserEntry {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn origin(&self) -> StrategyOrigin {
        self.origin
    }
}

pub(crate) fn default_origin<T: Shape>() -> StrategyOrigin {
    if TypeId::of::<T>() == TypeId::of::<String>() {
        StrategyOrigin::Identity
    } else if T::KIND == TypeKind::Nullable {
        StrategyOrigin::Derived
    } else {
        StrategyOrigin::Default
    }
}

fn nullable_policy(kind: TypeKind, options: &ParserOptions) -> NullableParsePolicy {
    match kind {
        TypeKind::Str => NullableParsePolicy {
            null_to_null: true,
            empty_to_null: false,
        },
        kind if kind.is_reference_like() => NullableParsePolicy {
            null_to_null: options.reference_types_parse_null_to_null,
            empty_to_null: false,
        },
        _ => NullableParsePolicy {
            null_to_null: options.nullable_value_types_parse_null_to_null,
            empty_to_null: options.nullable_value_types_parse_empty_string_to_null,
        },
    }
}

/// Thread-safe registry of parser strategies.
///
/// Cloning is cheap and clones share the same cache. Strategies resolved for
/// a type are cached on first use and never replaced.
#[derive(Clone)]
pub struct ParserContainer {
    core: Arc<ParserCore>,
}

impl ParserContainer {
    fn empty() -> Self {
        Self {
            core: Arc::new(ParserCore {
                options: RwLock::new(ParserOptions::default()),
                cache: StrategyCache::new(),
            }),
        }
    }

    /// Build a container through a configuration session.
    ///
    /// The session is locked once `configure` returns, whether or not it
    /// succeeded. Its error, if any, is returned unchanged.
    pub fn create<F>(configure: F) -> ConvertResult<Self>
    where
        F: FnOnce(&ParserConfiguration) -> ConvertResult<()>,
    {
        let container = Self::empty();
        let configuration = ParserConfiguration::new(container.clone());

        let outcome = configure(&configuration);
        configuration.lock();
        outcome?;

        info!(
            configured_types = container.core.cache.len(),
            "Parser container configured"
        );
        Ok(container)
    }

    pub fn with_options(options: &ParserOptions) -> ConvertResult<Self> {
        Self::create(|config| config.apply_options(options))
    }

    pub fn from_settings(settings: &ConversionSettings) -> ConvertResult<Self> {
        Self::with_options(&settings.parser)
    }

    /// Process-wide container with default options
    pub fn global() -> &'static ParserContainer {
        GLOBAL_PARSERS.get_or_init(Self::empty)
    }

    pub fn options(&self) -> ParserOptions {
        *self.core.options.read()
    }

    pub fn parser<T: Shape>(&self) -> ConvertResult<Arc<dyn Parser<T>>> {
        self.entry::<T>()?.typed::<T>()
    }

    pub fn parser_for(&self, key: &TypeKey) -> ConvertResult<Arc<dyn ErasedParser>> {
        match self.core.cache.get(key.id()) {
            Some(entry) => Ok(entry.erased),
            None => key.resolve_parser(self),
        }
    }

    pub fn is_cached(&self, key: &TypeKey) -> bool {
        self.core.cache.contains(key.id())
    }

    pub fn origin_of(&self, key: &TypeKey) -> Option<StrategyOrigin> {
        self.core.cache.origin_of(key.id())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.core.cache.stats()
    }

    pub(crate) fn core(&self) -> &ParserCore {
        &self.core
    }

    pub(crate) fn erased_entry<T: Shape>(&self) -> ConvertResult<Arc<dyn ErasedParser>> {
        Ok(self.entry::<T>()?.erased)
    }

    /// Resolution runs without holding the cache lock so that wrapper shapes
    /// can look up their underlying type first.
    fn entry<T: Shape>(&self) -> ConvertResult<ParserEntry> {
        let id = TypeId::of::<T>();
        if let Some(entry) = self.core.cache.get(id) {
            return Ok(entry);
        }

        let type_name = any::type_name::<T>();
        debug!(type_name, kind = %T::KIND, "Parser cache miss, resolving default strategy");

        let options = self.options();
        let parser = T::resolve_parser(self, options.missing_try_parse).map_err(|error| {
            log_error("parser_container", "resolve", &error.to_string(), Some(type_name));
            error
        })?;

        let entry = ParserEntry::new::<T>(parser, default_origin::<T>(), &options);
        let winner = self.core.cache.get_or_insert(id, entry);

        log_resolution(
            CONTAINER,
            type_name,
            &T::KIND.to_string(),
            &winner.origin.to_string(),
            "cached",
        );
        Ok(winner)
    }

    pub(crate) fn resolve_default<T: Shape>(
        &self,
        missing_try_parse: MissingTryParse,
    ) -> ConvertResult<Arc<dyn Parser<T>>> {
        if T::KIND == TypeKind::Nullable {
            return Err(ConvertError::configuration(format!(
                "'{}' declares a nullable shape without wrapping an underlying type",
                any::type_name::<T>()
            )));
        }

        let parser = match T::capabilities().probe_parse()? {
            ParseCapability::Enumeration(table) => strategy::enumeration(table),
            ParseCapability::Methods { parse, try_parse } => strategy::compose(
                parse.map(lift_parse),
                try_parse.map(lift_try_parse),
                missing_try_parse,
            ),
        };
        Ok(Arc::new(parser))
    }

    pub(crate) fn resolve_nullable<V: Shape>(&self) -> ConvertResult<Arc<dyn Parser<Option<V>>>> {
        shape::ensure_single_level::<V>()?;
        let inner = self.parser::<V>()?;
        let policy = nullable_policy(V::KIND, &self.options());
        Ok(Arc::new(strategy::nullable(inner, policy)))
    }
}

impl fmt::Debug for ParserContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserContainer")
            .field("options", &self.options())
            .field("cached_strategies", &self.core.cache.len())
            .finish()
    }
}
