//! Concrete formatter strategies and the combinators that assemble them.

use std::any;
use std::sync::Arc;

use super::{ErasedFormatter, Formatter};
use crate::capability::{FormatFn, ToStringFn};
use crate::config::{MissingFormatSpecific, NullFormatHandling};
use crate::constants::arguments;
use crate::error::{ConvertError, ConvertResult, Operation};
use crate::shape::{Boxed, Shape, TypeKey};

pub(crate) type FormatImpl<T> = Arc<dyn Fn(&T) -> ConvertResult<Option<String>> + Send + Sync>;
pub(crate) type SpecificImpl<T> =
    Arc<dyn Fn(&T, &str) -> ConvertResult<Option<String>> + Send + Sync>;

/// Formatter composed from a plain and a specific format function
pub struct FunctorFormatter<T> {
    format: FormatImpl<T>,
    specific: SpecificImpl<T>,
}

impl<T> FunctorFormatter<T> {
    pub(crate) fn new(format: FormatImpl<T>, specific: SpecificImpl<T>) -> Self {
        Self { format, specific }
    }
}

impl<T> Formatter<T> for FunctorFormatter<T> {
    fn format(&self, value: &T) -> ConvertResult<Option<String>> {
        (self.format)(value)
    }

    fn format_specific(&self, value: &T, format: &str) -> ConvertResult<Option<String>> {
        (self.specific)(value, format)
    }
}

/// Identity formatter for `String`. Format specifiers are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringFormatter;

impl Formatter<String> for StringFormatter {
    fn format(&self, value: &String) -> ConvertResult<Option<String>> {
        Ok(Some(value.clone()))
    }

    fn format_specific(&self, value: &String, _format: &str) -> ConvertResult<Option<String>> {
        Ok(Some(value.clone()))
    }
}

/// Erased view over a typed formatter
pub(crate) struct BoxedFormatter<T> {
    inner: Arc<dyn Formatter<T>>,
    null_passthrough: bool,
}

impl<T> BoxedFormatter<T> {
    pub(crate) fn new(inner: Arc<dyn Formatter<T>>, null_passthrough: bool) -> Self {
        Self {
            inner,
            null_passthrough,
        }
    }
}

impl<T: Shape> ErasedFormatter for BoxedFormatter<T> {
    fn target(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn format_boxed(&self, value: Boxed) -> ConvertResult<Option<String>> {
        if value.is_null() && self.null_passthrough {
            return Ok(None);
        }
        let value = T::from_boxed(value)?;
        self.inner.format(&value)
    }

    fn format_specific_boxed(&self, value: Boxed, format: &str) -> ConvertResult<Option<String>> {
        if value.is_null() && self.null_passthrough {
            return Ok(None);
        }
        let value = T::from_boxed(value)?;
        self.inner.format_specific(&value, format)
    }
}

pub(crate) fn lift_to_string<T: 'static>(to_string: ToStringFn<T>) -> FormatImpl<T> {
    Arc::new(move |value: &T| to_string(value).map(Some))
}

pub(crate) fn lift_format<T: 'static>(format: FormatFn<T>) -> SpecificImpl<T> {
    Arc::new(move |value: &T, spec: &str| format(value, spec).map(Some))
}

fn format_not_supported<T: 'static>(type_name: &'static str) -> FormatImpl<T> {
    Arc::new(move |_: &T| Err(ConvertError::not_supported(type_name, Operation::Format)))
}

fn specific_not_supported<T: 'static>(type_name: &'static str) -> SpecificImpl<T> {
    Arc::new(move |_: &T, _: &str| {
        Err(ConvertError::not_supported(type_name, Operation::FormatSpecific))
    })
}

/// Fill a missing specific formatter according to `missing`
pub(crate) fn compose<T: 'static>(
    format: Option<FormatImpl<T>>,
    specific: Option<SpecificImpl<T>>,
    missing: MissingFormatSpecific,
) -> FunctorFormatter<T> {
    let type_name = any::type_name::<T>();
    let format = format.unwrap_or_else(|| format_not_supported(type_name));

    let specific: SpecificImpl<T> = match (specific, missing) {
        (Some(specific), _) => specific,
        (None, MissingFormatSpecific::ThrowNotSupported) => specific_not_supported(type_name),
        (None, MissingFormatSpecific::ReturnEmptyString) => {
            Arc::new(|_: &T, _: &str| Ok(Some(String::new())))
        }
        (None, MissingFormatSpecific::ReturnNull) => Arc::new(|_: &T, _: &str| Ok(None)),
        (None, MissingFormatSpecific::UseToString) => {
            let plain = Arc::clone(&format);
            Arc::new(move |value: &T, _: &str| plain(value))
        }
    };

    FunctorFormatter::new(format, specific)
}

fn format_null(on_null: NullFormatHandling) -> ConvertResult<Option<String>> {
    match on_null {
        NullFormatHandling::ThrowNullArgument => Err(ConvertError::null_argument(arguments::VALUE)),
        NullFormatHandling::ReturnNull => Ok(None),
        NullFormatHandling::ReturnEmptyString => Ok(Some(String::new())),
    }
}

pub(crate) fn nullable<V: 'static>(
    inner: Arc<dyn Formatter<V>>,
    on_null: NullFormatHandling,
) -> FunctorFormatter<Option<V>> {
    let plain_inner = Arc::clone(&inner);
    let format: FormatImpl<Option<V>> = Arc::new(move |value: &Option<V>| match value {
        Some(value) => plain_inner.format(value),
        None => format_null(on_null),
    });

    let specific: SpecificImpl<Option<V>> =
        Arc::new(move |value: &Option<V>, spec: &str| match value {
            Some(value) => inner.format_specific(value, spec),
            None => format_null(on_null),
        });

    FunctorFormatter::new(format, specific)
}
