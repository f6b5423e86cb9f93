//! Formatter configuration session.

use std::any::{self, TypeId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::container::{default_origin, FormatterCore, FormatterEntry};
use super::strategy::{self, lift_format, lift_to_string};
use super::{Formatter, FormatterContainer};
use crate::capability::{FormatFn, Locale, ToStringFn};
use crate::config::{FormatterOptions, MissingFormatSpecific, NullFormatHandling};
use crate::error::{ConvertError, ConvertResult};
use crate::logging::log_configuration;
use crate::registry::StrategyOrigin;
use crate::shape::{Shape, TypeKind};

struct Session {
    container: FormatterContainer,
    locked: AtomicBool,
}

/// Mutable view of a [`FormatterContainer`] while it is being created
#[derive(Clone)]
pub struct FormatterConfiguration {
    session: Arc<Session>,
}

impl FormatterConfiguration {
    pub(crate) fn new(container: FormatterContainer) -> Self {
        Self {
            session: Arc::new(Session {
                container,
                locked: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn lock(&self) {
        self.session.locked.store(true, Ordering::Release);
        log_configuration("lock", None, "locked", Some("formatter"));
    }

    pub fn is_locked(&self) -> bool {
        self.session.locked.load(Ordering::Acquire)
    }

    fn core(&self) -> &FormatterCore {
        self.session.container.core()
    }

    pub fn options(&self) -> FormatterOptions {
        self.session.container.options()
    }

    pub fn missing_format_specific(&self) -> MissingFormatSpecific {
        self.options().missing_format_specific
    }

    pub fn set_missing_format_specific(&self, value: MissingFormatSpecific) -> ConvertResult<()> {
        self.update_options(|options| options.missing_format_specific = value)
    }

    pub fn reference_types_format_null_to_null(&self) -> bool {
        self.options().reference_types_format_null_to_null
    }

    pub fn set_reference_types_format_null_to_null(&self, value: bool) -> ConvertResult<()> {
        self.update_options(|options| options.reference_types_format_null_to_null = value)
    }

    pub fn nullable_value_types_format_null(&self) -> NullFormatHandling {
        self.options().nullable_value_types_format_null
    }

    pub fn set_nullable_value_types_format_null(
        &self,
        value: NullFormatHandling,
    ) -> ConvertResult<()> {
        self.update_options(|options| options.nullable_value_types_format_null = value)
    }

    pub fn default_locale(&self) -> Locale {
        self.options().default_locale
    }

    pub fn set_default_locale(&self, locale: Locale) -> ConvertResult<()> {
        self.update_options(move |options| options.default_locale = locale)
    }

    /// Replace every option at once
    pub fn apply_options(&self, options: &FormatterOptions) -> ConvertResult<()> {
        let replacement = options.clone();
        self.update_options(move |options| *options = replacement)
    }

    fn update_options(&self, update: impl FnOnce(&mut FormatterOptions)) -> ConvertResult<()> {
        self.ensure_unlocked()?;
        if !self.core().cache.is_empty() {
            return Err(ConvertError::configuration(
                "Options cannot be changed after types have been configured",
            ));
        }
        update(&mut self.core().options.write());
        Ok(())
    }

    pub fn use_default<T: Shape>(&self) -> ConvertResult<()> {
        self.use_default_with::<T>(self.missing_format_specific())
    }

    pub fn use_default_with<T: Shape>(
        &self,
        missing_format_specific: MissingFormatSpecific,
    ) -> ConvertResult<()> {
        self.ensure_configurable::<T>()?;
        let formatter = T::resolve_formatter(&self.session.container, missing_format_specific)?;
        self.register::<T>(formatter, default_origin::<T>())
    }

    /// Bind `format`. Specific formatting is not supported unless a policy
    /// is given through [`Self::use_fn_with`].
    pub fn use_fn<T, F>(&self, format: F) -> ConvertResult<()>
    where
        T: Shape,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.use_fn_with(format, MissingFormatSpecific::ThrowNotSupported)
    }

    pub fn use_fn_with<T, F>(
        &self,
        format: F,
        missing_format_specific: MissingFormatSpecific,
    ) -> ConvertResult<()>
    where
        T: Shape,
        F: Fn(&T) -> String + Send + Sync + 'static,
    {
        self.ensure_configurable::<T>()?;
        let to_string: ToStringFn<T> = Arc::new(move |value: &T| Ok(format(value)));
        let formatter =
            strategy::compose(Some(lift_to_string(to_string)), None, missing_format_specific);
        self.register::<T>(Arc::new(formatter), StrategyOrigin::Function)
    }

    pub fn use_fns<T, F, G>(&self, format: F, format_specific: G) -> ConvertResult<()>
    where
        T: Shape,
        F: Fn(&T) -> String + Send + Sync + 'static,
        G: Fn(&T, &str) -> String + Send + Sync + 'static,
    {
        self.ensure_configurable::<T>()?;
        let to_string: ToStringFn<T> = Arc::new(move |value: &T| Ok(format(value)));
        let specific: FormatFn<T> =
            Arc::new(move |value: &T, spec: &str| Ok(format_specific(value, spec)));
        let formatter = strategy::compose(
            Some(lift_to_string(to_string)),
            Some(lift_format(specific)),
            MissingFormatSpecific::ThrowNotSupported,
        );
        self.register::<T>(Arc::new(formatter), StrategyOrigin::Function)
    }

    /// Use a caller-supplied strategy. Null handling is entirely its own.
    pub fn use_object<T, F>(&self, formatter: F) -> ConvertResult<()>
    where
        T: Shape,
        F: Formatter<T> + 'static,
    {
        self.ensure_configurable::<T>()?;
        self.register::<T>(Arc::new(formatter), StrategyOrigin::Object)
    }

    pub fn use_type_converter<T: Shape>(&self) -> ConvertResult<()> {
        self.use_type_converter_with::<T>(MissingFormatSpecific::ThrowNotSupported)
    }

    pub fn use_type_converter_with<T: Shape>(
        &self,
        missing_format_specific: MissingFormatSpecific,
    ) -> ConvertResult<()> {
        self.ensure_configurable::<T>()?;

        let type_name = any::type_name::<T>();
        let converter = T::capabilities().into_converter().ok_or_else(|| {
            ConvertError::configuration(format!("'{type_name}' does not declare a type converter"))
        })?;
        if !converter.can_convert_to_str() {
            return Err(ConvertError::configuration(format!(
                "The type converter for '{type_name}' cannot convert to a string"
            )));
        }

        let to_string: ToStringFn<T> = Arc::new(move |value: &T| converter.convert_to_string(value));
        let formatter =
            strategy::compose(Some(lift_to_string(to_string)), None, missing_format_specific);
        self.register::<T>(Arc::new(formatter), StrategyOrigin::TypeConverter)
    }

    fn ensure_unlocked(&self) -> ConvertResult<()> {
        if self.is_locked() {
            return Err(ConvertError::configuration(
                "The formatter configuration is locked",
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

    fn register<T: Shape>(
        &self,
        formatter: Arc<dyn Formatter<T>>,
        origin: StrategyOrigin,
    ) -> ConvertResult<()> {
        let type_name = any::type_name::<T>();
        let entry = FormatterEntry::new::<T>(formatter, origin, &self.options());

        if !self.core().cache.insert_new(TypeId::of::<T>(), entry) {
            return Err(ConvertError::configuration(format!(
                "'{type_name}' is already configured"
            )));
        }

        log_configuration(
            "configure_formatter",
            Some(type_name),
            "registered",
            Some(&origin.to_string()),
        );
        Ok(())
    }
}
