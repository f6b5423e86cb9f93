//! Capability probing in priority order.

use std::any;
use std::sync::Arc;

use super::{Capabilities, EnumTable, FormatFn, Locale, ParseFn, ToStringFn, TryParseFn};
use crate::error::ConvertResult;
use crate::shape::Shape;

pub(crate) enum ParseCapability<T> {
    Enumeration(EnumTable<T>),
    Methods {
        parse: Option<ParseFn<T>>,
        try_parse: Option<TryParseFn<T>>,
    },
}

pub(crate) struct FormatCapability<T> {
    pub(crate) format: Option<ToStringFn<T>>,
    pub(crate) specific: Option<FormatFn<T>>,
}

impl<T: Shape> Capabilities<T> {
    /// A bound enumeration table takes the native enum parser, whatever the
    /// shape's kind. Everything else consults both the parse and try-parse
    /// slots, so an ambiguous try-parse is reported even without a parse.
    pub(crate) fn probe_parse(self) -> ConvertResult<ParseCapability<T>> {
        let type_name = any::type_name::<T>();

        if let Some(table) = self.enumeration {
            return Ok(ParseCapability::Enumeration(table));
        }

        let parse = self.parse.resolve(type_name, "parse")?;
        let try_parse = self.try_parse.resolve(type_name, "try_parse")?;

        Ok(ParseCapability::Methods { parse, try_parse })
    }

    /// A formattable binding services both calls with `locale`. Otherwise the
    /// locale-aware format binding beats the plain one for specific
    /// formatting, and plain formatting uses the to-string binding.
    pub(crate) fn probe_format(self, locale: &Locale) -> ConvertResult<FormatCapability<T>> {
        let type_name = any::type_name::<T>();

        if let Some(formattable) = self.formattable.resolve(type_name, "formattable")? {
            let plain_locale = locale.clone();
            let plain = Arc::clone(&formattable);
            let format: ToStringFn<T> = Arc::new(move |value: &T| plain(value, "", &plain_locale));

            let locale = locale.clone();
            let specific: FormatFn<T> =
                Arc::new(move |value: &T, spec: &str| formattable(value, spec, &locale));

            return Ok(FormatCapability {
                format: Some(format),
                specific: Some(specific),
            });
        }

        let specific = match self
            .format_with_locale
            .resolve(type_name, "format_with_locale")?
        {
            Some(with_locale) => {
                let locale = locale.clone();
                let specific: FormatFn<T> =
                    Arc::new(move |value: &T, spec: &str| with_locale(value, spec, &locale));
                Some(specific)
            }
            None => self.format.resolve(type_name, "format")?,
        };
        let format = self.to_string.resolve(type_name, "to_string")?;

        Ok(FormatCapability { format, specific })
    }
}
