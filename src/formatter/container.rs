//! Formatter container: lazy resolution and caching of formatter strategies.

use std::any::{self, Any, TypeId};
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use tracing::{debug, info};

use super::configuration::FormatterConfiguration;
use super::strategy::{self, lift_format, lift_to_string, BoxedFormatter};
use super::{ErasedFormatter, Formatter};
use crate::config::{ConversionSettings, FormatterOptions, MissingFormatSpecific, NullFormatHandling};
use crate::error::{ConvertError, ConvertResult};
use crate::logging::{log_error, log_resolution};
use crate::registry::{CacheStats, CachedStrategy, StrategyCache, StrategyOrigin};
use crate::shape::{self, Shape, TypeKey, TypeKind};

const CONTAINER: &str = "formatter";

static GLOBAL_FORMATTERS: OnceLock<FormatterContainer> = OnceLock::new();

pub(crate) struct FormatterCore {
    pub(crate) options: RwLock<FormatterOptions>,
    pub(crate) cache: StrategyCache<FormatterEntry>,
}

#[derive(Clone)]
pub(crate) struct FormatterEntry {
    type_name: &'static str,
    /// Holds an `Arc<dyn Formatter<T>>` for the entry's type
    typed: Arc<dyn Any + Send + Sync>,
    erased: Arc<dyn ErasedFormatter>,
    origin: StrategyOrigin,
}

impl FormatterEntry {
    pub(crate) fn new<T: Shape>(
        formatter: Arc<dyn Formatter<T>>,
        origin: StrategyOrigin,
        options: &FormatterOptions,
    ) -> Self {
        let null_passthrough = match origin {
            StrategyOrigin::Identity => true,
            StrategyOrigin::Object => false,
            _ => {
                (T::KIND == TypeKind::Str || T::KIND.is_reference_like())
                    && options.reference_types_format_null_to_null
            }
        };
        let erased: Arc<dyn ErasedFormatter> =
            Arc::new(BoxedFormatter::new(Arc::clone(&formatter), null_passthrough));

        Self {
            type_name: any::type_name::<T>(),
            typed: Arc::new(formatter),
            erased,
            origin,
        }
    }

    fn typed<T: Shape>(&self) -> ConvertResult<Arc<dyn Formatter<T>>> {
        self.typed
            .downcast_ref::<Arc<dyn Formatter<T>>>()
            .cloned()
            .ok_or_else(|| ConvertError::type_mismatch(any::type_name::<T>()))
    }
}

impl CachedStrategy for FormatterEntry {
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

fn null_handling(kind: TypeKind, options: &FormatterOptions) -> NullFormatHandling {
    match kind {
        TypeKind::Str => NullFormatHandling::ReturnNull,
        kind if kind.is_reference_like() => {
            if options.reference_types_format_null_to_null {
                NullFormatHandling::ReturnNull
            } else {
                NullFormatHandling::ThrowNullArgument
            }
        }
        _ => options.nullable_value_types_format_null,
    }
}

/// Thread-safe registry of formatter strategies.
///
/// Cloning is cheap and clones share the same cache.
#[derive(Clone)]
pub struct FormatterContainer {
    core: Arc<FormatterCore>,
}

impl FormatterContainer {
    fn empty() -> Self {
        Self {
            core: Arc::new(FormatterCore {
                options: RwLock::new(FormatterOptions::default()),
                cache: StrategyCache::new(),
            }),
        }
    }

    /// Build a container through a configuration session.
    ///
    /// The session is locked once `configure` returns, whether or not it
    /// succeeded.
    pub fn create<F>(configure: F) -> ConvertResult<Self>
    where
        F: FnOnce(&FormatterConfiguration) -> ConvertResult<()>,
    {
        let container = Self::empty();
        let configuration = FormatterConfiguration::new(container.clone());

        let outcome = configure(&configuration);
        configuration.lock();
        outcome?;

        info!(
            configured_types = container.core.cache.len(),
            "Formatter container configured"
        );
        Ok(container)
    }

    pub fn with_options(options: &FormatterOptions) -> ConvertResult<Self> {
        Self::create(|config| config.apply_options(options))
    }

    pub fn from_settings(settings: &ConversionSettings) -> ConvertResult<Self> {
        Self::with_options(&settings.formatter)
    }

    /// Process-wide container with default options
    pub fn global() -> &'static FormatterContainer {
        GLOBAL_FORMATTERS.get_or_init(Self::empty)
    }

    pub fn options(&self) -> FormatterOptions {
        self.core.options.read().clone()
    }

    pub fn formatter<T: Shape>(&self) -> ConvertResult<Arc<dyn Formatter<T>>> {
        self.entry::<T>()?.typed::<T>()
    }

    pub fn formatter_for(&self, key: &TypeKey) -> ConvertResult<Arc<dyn ErasedFormatter>> {
        match self.core.cache.get(key.id()) {
            Some(entry) => Ok(entry.erased),
            None => key.resolve_formatter(self),
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

    pub(crate) fn core(&self) -> &FormatterCore {
        &self.core
    }

    pub(crate) fn erased_entry<T: Shape>(&self) -> ConvertResult<Arc<dyn ErasedFormatter>> {
        Ok(self.entry::<T>()?.erased)
    }

    fn entry<T: Shape>(&self) -> ConvertResult<FormatterEntry> {
        let id = TypeId::of::<T>();
        if let Some(entry) = self.core.cache.get(id) {
            return Ok(entry);
        }

        let type_name = any::type_name::<T>();
        debug!(type_name, kind = %T::KIND, "Formatter cache miss, resolving default strategy");

        let options = self.options();
        let formatter =
            T::resolve_formatter(self, options.missing_format_specific).map_err(|error| {
                log_error("formatter_container", "resolve", &error.to_string(), Some(type_name));
                error
            })?;

        let entry = FormatterEntry::new::<T>(formatter, default_origin::<T>(), &options);
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
        missing_format_specific: MissingFormatSpecific,
    ) -> ConvertResult<Arc<dyn Formatter<T>>> {
        if T::KIND == TypeKind::Nullable {
            return Err(ConvertError::configuration(format!(
                "'{}' declares a nullable shape without wrapping an underlying type",
                any::type_name::<T>()
            )));
        }

        let locale = self.options().default_locale;
        let capability = T::capabilities().probe_format(&locale)?;
        Ok(Arc::new(strategy::compose(
            capability.format.map(lift_to_string),
            capability.specific.map(lift_format),
            missing_format_specific,
        )))
    }

    pub(crate) fn resolve_nullable<V: Shape>(
        &self,
    ) -> ConvertResult<Arc<dyn Formatter<Option<V>>>> {
        shape::ensure_single_level::<V>()?;
        let inner = self.formatter::<V>()?;
        let on_null = null_handling(V::KIND, &self.options());
        Ok(Arc::new(strategy::nullable(inner, on_null)))
    }
}

impl fmt::Debug for FormatterContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterContainer")
            .field("options", &self.options())
            .field("cached_strategies", &self.core.cache.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handling_by_kind() {
        let options = FormatterOptions {
            nullable_value_types_format_null: NullFormatHandling::ReturnEmptyString,
            ..FormatterOptions::default()
        };

        assert_eq!(
            null_handling(TypeKind::Value, &options),
            NullFormatHandling::ReturnEmptyString
        );
        assert_eq!(
            null_handling(TypeKind::Reference, &options),
            NullFormatHandling::ThrowNullArgument
        );
        assert_eq!(
            null_handling(TypeKind::Str, &options),
            NullFormatHandling::ReturnNull
        );
    }

    #[test]
    fn test_lookup_caches_underlying_type() {
        let container = FormatterContainer::create(|_| Ok(())).unwrap();
        let formatter = container.formatter::<Option<u16>>().unwrap();

        assert!(formatter.format(&None).unwrap_err().is_null_argument());
        assert_eq!(formatter.format(&Some(9)), Ok(Some("9".to_string())));
        assert!(container.is_cached(&TypeKey::of::<u16>()));
        assert_eq!(container.cache_stats().cached_strategies, 2);
    }
}
