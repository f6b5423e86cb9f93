//! Parser configuration session.

use std::any::{self, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::container::{default_origin, ParserCore, ParserEntry};
use super::strategy;
use super::{lift_parse, lift_try_parse, Parser, ParserContainer};
use crate::capability::{ParseFn, TryParseFn};
use crate::config::{MissingTryParse, ParserOptions};
use crate::error::{ConvertError, ConvertResult};
use crate::logging::log_configuration;
use crate::registry::StrategyOrigin;
use crate::shape::{Shape, TypeKind};

struct Session {
    container: ParserContainer,
    locked: AtomicBool,
}

/// Mutable view of a [`ParserContainer`] while it is being created.
///
/// The handle stays usable after creation, but every mutating call then
/// fails with a configuration error. Options must be set before any type is
/// configured.
#[derive(Clone)]
pub struct ParserConfiguration {
    session: Arc<Session>,
}

impl ParserConfiguration {
    pub(crate) fn new(container: ParserContainer) -> Self {
        Self {
            session: Arc::new(Session {
                container,
                locked: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn lock(&self) {
        self.session.locked.store(true, Ordering::Release);
        log_configuration("lock", None, "locked", Some("parser"));
    }

    pub fn is_locked(&self) -> bool {
        self.session.locked.load(Ordering::Acquire)
    }

    fn core(&self) -> &ParserCore {
        self.session.container.core()
    }

    pub fn options(&self) -> ParserOptions {
        self.session.container.options()
    }

    pub fn missing_try_parse(&self) -> MissingTryParse {
        self.options().missing_try_parse
    }

    pub fn set_missing_try_parse(&self, value: MissingTryParse) -> ConvertResult<()> {
        self.update_options(|options| options.missing_try_parse = value)
    }

    pub fn reference_types_parse_null_to_null(&self) -> bool {
        self.options().reference_types_parse_null_to_null
    }

    pub fn set_reference_types_parse_null_to_null(&self, value: bool) -> ConvertResult<()> {
        self.update_options(|options| options.reference_types_parse_null_to_null = value)
    }

    pub fn nullable_value_types_parse_null_to_null(&self) -> bool {
        self.options().nullable_value_types_parse_null_to_null
    }

    pub fn set_nullable_value_types_parse_null_to_null(&self, value: bool) -> ConvertResult<()> {
        self.update_options(|options| options.nullable_value_types_parse_null_to_null = value)
    }

    pub fn nullable_value_types_parse_empty_string_to_null(&self) -> bool {
        self.options().nullable_value_types_parse_empty_string_to_null
    }

    pub fn set_nullable_value_types_parse_empty_string_to_null(
        &self,
        value: bool,
    ) -> ConvertResult<()> {
        self.update_options(|options| {
            options.nullable_value_types_parse_empty_string_to_null = value
        })
    }

    /// Replace every option at once
    pub fn apply_options(&self, options: &ParserOptions) -> ConvertResult<()> {
        let replacement = *options;
        self.update_options(move |options| *options = replacement)
    }

    fn update_options(&self, update: impl FnOnce(&mut ParserOptions)) -> ConvertResult<()> {
        self.ensure_unlocked()?;
        if !self.core().cache.is_empty() {
            return Err(ConvertError::configuration(
                "Options cannot be changed after types have been configured",
            ));
        }
        update(&mut self.core().options.write());
        Ok(())
    }

    /// Resolve the default strategy for `T` now, with the container's policy
    pub fn use_default<T: Shape>(&self) -> ConvertResult<()> {
        self.use_default_with::<T>(self.missing_try_parse())
    }

    pub fn use_default_with<T: Shape>(&self, missing_try_parse: MissingTryParse) -> ConvertResult<()> {
        self.ensure_configurable::<T>()?;
        let parser = T::resolve_parser(&self.session.container, missing_try_parse)?;
        self.register::<T>(parser, default_origin::<T>())
    }

    /// Bind `parse`. Try-parse is not supported unless a policy is given
    /// through [`Self::use_fn_with`].
    pub fn use_fn<T, F>(&self, parse: F) -> ConvertResult<()>
    where
        T: Shape,
        F: Fn(&str) -> ConvertResult<T> + Send + Sync + 'static,
    {
        self.use_fn_with(parse, MissingTryParse::ThrowNotSupported)
    }

    pub fn use_fn_with<T, F>(&self, parse: F, missing_try_parse: MissingTryParse) -> ConvertResult<()>
    where
        T: Shape,
        F: Fn(&str) -> ConvertResult<T> + Send + Sync + 'static,
    {
        self.ensure_configurable::<T>()?;
        let parse: ParseFn<T> = Arc::new(parse);
        let parser = strategy::compose(Some(lift_parse(parse)), None, missing_try_parse);
        self.register::<T>(Arc::new(parser), StrategyOrigin::Function)
    }

    pub fn use_fns<T, F, G>(&self, parse: F, try_parse: G) -> ConvertResult<()>
    where
        T: Shape,
        F: Fn(&str) -> ConvertResult<T> + Send + Sync + 'static,
        G: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        self.ensure_configurable::<T>()?;
        let parse: ParseFn<T> = Arc::new(parse);
        let try_parse: TryParseFn<T> = Arc::new(try_parse);
        let parser = strategy::compose(
            Some(lift_parse(parse)),
            Some(lift_try_parse(try_parse)),
            MissingTryParse::ThrowNotSupported,
        );
        self.register::<T>(Arc::new(parser), StrategyOrigin::Function)
    }

    /// Use a caller-supplied strategy. Null handling is entirely its own.
    pub fn use_object<T, P>(&self, parser: P) -> ConvertResult<()>
    where
        T: Shape,
        P: Parser<T> + 'static,
    {
        self.ensure_configurable::<T>()?;
        self.register::<T>(Arc::new(parser), StrategyOrigin::Object)
    }

    pub fn use_type_converter<T: Shape>(&self) -> ConvertResult<()> {
        self.use_type_converter_with::<T>(MissingTryParse::ThrowNotSupported)
    }

    pub fn use_type_converter_with<T: Shape>(
        &self,
        missing_try_parse: MissingTryParse,
    ) -> ConvertResult<()> {
        self.ensure_configurable::<T>()?;

        let type_name = any::type_name::<T>();
        let converter = T::capabilities().into_converter().ok_or_else(|| {
            ConvertError::configuration(format!("'{type_name}' does not declare a type converter"))
        })?;
        if !converter.can_convert_from_str() {
            return Err(ConvertError::configuration(format!(
                "The type converter for '{type_name}' cannot convert from a string"
            )));
        }

        let parse: ParseFn<T> = Arc::new(move |input: &str| converter.convert_from_str(input));
        let parser = strategy::compose(Some(lift_parse(parse)), None, missing_try_parse);
        self.register::<T>(Arc::new(parser), StrategyOrigin::TypeConverter)
    }

    fn ensure_unlocked(&self) -> ConvertResult<()> {
        if self.is_locked() {
            return Err(ConvertError::configuration(
                "The parser configuration is locked",
            ));
        }
        Ok(())
    }

    fn ensure_configurable<T: Shape>(&self) -> ConvertResult<()> {
        self.ensure_unlocked()?;

        let type_name = any::type_name::<T>();
        match T::KIND {
            TypeKind::Nullable => {
                let underlying = T::underlying()
                    .map(|key| key.name())
                    .unwrap_or("the underlying type");
                return Err(ConvertError::configuration(format!(
                    "Cannot configure nullable '{type_name}'; configure '{underlying}' instead"
                )));
            }
            TypeKind::Interface | TypeKind::Callable => {
                return Err(ConvertError::configuration(format!(
                    "Cannot configure {} '{type_name}'",
                    T::KIND
                )));
            }
            _ => {}
        }

        if self.core().cache.contains(TypeId::of::<T>()) {
            return Err(ConvertError::configuration(format!(
                "'{type_name}' is already configured"
            )));
        }
        Ok(())
    }

    fn register<T: Shape>(&self, parser: Arc<dyn Parser<T>>, origin: StrategyOrigin) -> ConvertResult<()> {
        let type_name = any::type_name::<T>();
        let entry = ParserEntry::new::<T>(parser, origin, &self.options());

        if !self.core().cache.insert_new(TypeId::of::<T>(), entry) {
            return Err(ConvertError::configuration(format!(
                "'{type_name}' is already configured"
            )));
        }

        log_configuration(
            "configure_parser",
            Some(type_name),
            "registered",
            Some(&origin.to_string()),
        );
        Ok(())
    }
}
