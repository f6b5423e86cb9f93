//! Concrete parser strategies and the combinators that assemble them.

use std::any;
use std::sync::Arc;

use super::{ErasedParser, Parser};
use crate::capability::{EnumTable, ParseFn, TryParseFn};
use crate::config::MissingTryParse;
use crate::constants::arguments;
use crate::error::{ConvertError, ConvertResult, Operation};
use crate::shape::{Boxed, Shape, TypeKey};

pub(crate) type ParseImpl<T> = Arc<dyn Fn(Option<&str>) -> ConvertResult<T> + Send + Sync>;
pub(crate) type TryParseImpl<T> =
    Arc<dyn Fn(Option<&str>) -> ConvertResult<Option<T>> + Send + Sync>;

/// Parser composed from a parse function and a try-parse function
pub struct FunctorParser<T> {
    parse: ParseImpl<T>,
    try_parse: TryParseImpl<T>,
}

impl<T> FunctorParser<T> {
    pub(crate) fn new(parse: ParseImpl<T>, try_parse: TryParseImpl<T>) -> Self {
        Self { parse, try_parse }
    }
}

impl<T> Parser<T> for FunctorParser<T> {
    fn parse_opt(&self, input: Option<&str>) -> ConvertResult<T> {
        (self.parse)(input)
    }

    fn try_parse_opt(&self, input: Option<&str>) -> ConvertResult<Option<T>> {
        (self.try_parse)(input)
    }
}

/// Identity parser for `String`. Absent input parses to the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl Parser<String> for StringParser {
    fn parse_opt(&self, input: Option<&str>) -> ConvertResult<String> {
        Ok(input.map(str::to_owned).unwrap_or_default())
    }

    fn try_parse_opt(&self, input: Option<&str>) -> ConvertResult<Option<String>> {
        Ok(Some(input.map(str::to_owned).unwrap_or_default()))
    }
}

/// Erased view over a typed parser
pub(crate) struct BoxedParser<T> {
    inner: Arc<dyn Parser<T>>,
    null_passthrough: bool,
}

impl<T> BoxedParser<T> {
    pub(crate) fn new(inner: Arc<dyn Parser<T>>, null_passthrough: bool) -> Self {
        Self {
            inner,
            null_passthrough,
        }
    }
}

impl<T: Shape> ErasedParser for BoxedParser<T> {
    fn target(&self) -> TypeKey {
        TypeKey::of::<T>()
    }

    fn parse_boxed(&self, input: Option<&str>) -> ConvertResult<Boxed> {
        if input.is_none() && self.null_passthrough {
            return Ok(Boxed::Null);
        }
        self.inner.parse_opt(input).map(Shape::into_boxed)
    }

    fn try_parse_boxed(&self, input: Option<&str>) -> ConvertResult<Option<Boxed>> {
        if input.is_none() && self.null_passthrough {
            return Ok(Some(Boxed::Null));
        }
        Ok(self.inner.try_parse_opt(input)?.map(Shape::into_boxed))
    }
}

pub(crate) fn lift_parse<T: 'static>(parse: ParseFn<T>) -> ParseImpl<T> {
    Arc::new(move |input: Option<&str>| match input {
        Some(input) => parse(input),
        None => Err(ConvertError::null_argument(arguments::INPUT)),
    })
}

pub(crate) fn lift_try_parse<T: 'static>(try_parse: TryParseFn<T>) -> TryParseImpl<T> {
    Arc::new(move |input: Option<&str>| Ok(input.and_then(|input| try_parse(input))))
}

fn wrap_parse<T: 'static>(parse: ParseImpl<T>) -> TryParseImpl<T> {
    Arc::new(move |input: Option<&str>| Ok(parse(input).ok()))
}

fn parse_not_supported<T: 'static>(type_name: &'static str) -> ParseImpl<T> {
    Arc::new(move |_: Option<&str>| Err(ConvertError::not_supported(type_name, Operation::Parse)))
}

fn try_parse_not_supported<T: 'static>(type_name: &'static str) -> TryParseImpl<T> {
    Arc::new(move |_: Option<&str>| {
        Err(ConvertError::not_supported(type_name, Operation::TryParse))
    })
}

/// Fill a missing try-parse according to `missing`. Without a parse function
/// both entry points report not supported.
pub(crate) fn compose<T: 'static>(
    parse: Option<ParseImpl<T>>,
    try_parse: Option<TryParseImpl<T>>,
    missing: MissingTryParse,
) -> FunctorParser<T> {
    let type_name = any::type_name::<T>();

    let Some(parse) = parse else {
        return FunctorParser::new(
            parse_not_supported(type_name),
            try_parse_not_supported(type_name),
        );
    };

    let try_parse: TryParseImpl<T> = match (try_parse, missing) {
        (Some(try_parse), _) => try_parse,
        (None, MissingTryParse::WrapParse) => wrap_parse(Arc::clone(&parse)),
        (None, MissingTryParse::ReturnFalse) => Arc::new(|_: Option<&str>| Ok(None)),
        (None, MissingTryParse::ThrowNotSupported) => try_parse_not_supported(type_name),
    };

    FunctorParser::new(parse, try_parse)
}

/// Native enum parser. Only format failures count as try-parse failures.
pub(crate) fn enumeration<T: 'static>(table: EnumTable<T>) -> FunctorParser<T> {
    let type_name = any::type_name::<T>();

    let parse: ParseImpl<T> = Arc::new(move |input: Option<&str>| match input {
        Some(input) => table.parse(input, type_name),
        None => Err(ConvertError::null_argument(arguments::INPUT)),
    });
    let try_parse: TryParseImpl<T> = Arc::new(move |input: Option<&str>| match input {
        Some(input) => match table.parse(input, type_name) {
            Ok(value) => Ok(Some(value)),
            Err(ConvertError::Format { .. }) => Ok(None),
            Err(error) => Err(error),
        },
        None => Ok(None),
    });

    FunctorParser::new(parse, try_parse)
}

/// Null handling for a nullable wrapper
#[derive(Debug, Clone, Copy)]
pub(crate) struct NullableParsePolicy {
    pub(crate) null_to_null: bool,
    pub(crate) empty_to_null: bool,
}

impl NullableParsePolicy {
    fn maps_to_none(&self, input: Option<&str>) -> bool {
        match input {
            None => self.null_to_null,
            Some("") => self.empty_to_null,
            Some(_) => false,
        }
    }
}

pub(crate) fn nullable<V: 'static>(
    inner: Arc<dyn Parser<V>>,
    policy: NullableParsePolicy,
) -> FunctorParser<Option<V>> {
    let parse_inner = Arc::clone(&inner);
    let parse: ParseImpl<Option<V>> = Arc::new(move |input: Option<&str>| {
        if policy.maps_to_none(input) {
            return Ok(None);
        }
        parse_inner.parse_opt(input).map(Some)
    });

    let try_parse: TryParseImpl<Option<V>> = Arc::new(move |input: Option<&str>| {
        if policy.maps_to_none(input) {
            return Ok(Some(None));
        }
        Ok(inner.try_parse_opt(input)?.map(Some))
    });

    FunctorParser::new(parse, try_parse)
}
