//! # Type Converters
//!
//! A [`TypeConverter`] is a type-associated two-way string converter declared
//! through [`Capabilities::type_converter`](crate::Capabilities::type_converter).
//! Containers only use it when a type is explicitly configured with
//! `use_type_converter`; default resolution never consults it.

use std::any;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::error::{ConvertError, ConvertResult};

pub trait TypeConverter<T>: Send + Sync {
    fn can_convert_from_str(&self) -> bool {
        true
    }

    fn can_convert_to_str(&self) -> bool {
        true
    }

    fn convert_from_str(&self, input: &str) -> ConvertResult<T>;

    fn convert_to_string(&self, value: &T) -> ConvertResult<String>;
}

/// Converter backed by `FromStr` and `Display`
pub struct FromStrConverter<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> FromStrConverter<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for FromStrConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for FromStrConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FromStrConverter<{}>", any::type_name::<T>())
    }
}

impl<T> TypeConverter<T> for FromStrConverter<T>
where
    T: FromStr + fmt::Display,
    T::Err: fmt::Display,
{
    fn convert_from_str(&self, input: &str) -> ConvertResult<T> {
        input
            .parse::<T>()
            .map_err(|error| ConvertError::conversion(any::type_name::<T>(), error.to_string()))
    }

    fn convert_to_string(&self, value: &T) -> ConvertResult<String> {
        Ok(value.to_string())
    }
}
