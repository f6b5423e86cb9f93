//! # Type Shapes
//!
//! Static registration of convertible types.
//!
//! Every type a container can service implements [`Shape`]. The implementation
//! declares the type's classification ([`TypeKind`]) and answers the capability
//! lookup for it by returning a [`Capabilities`] table, so the containers never
//! need runtime reflection to decide how a type parses or formats.
//!
//! ## Classification
//!
//! | Kind | Rust types | Default resolution |
//! |------|------------|--------------------|
//! | `Value` / `Enum` | primitives, plain structs, enums | capability probing |
//! | `Reference` | shared or heap-backed domain types | capability probing plus null policy |
//! | `Str` | `String` | identity |
//! | `Nullable` | `Option<V>` | derived from `V` |
//! | `Interface` / `Callable` | trait-object and callback wrappers | probing; never configurable |
//!
//! ## Usage
//!
//! ```rust
//! use textconv_core::{Capabilities, ParserContainer, Shape, TypeKind};
//!
//! #[derive(Debug, PartialEq)]
//! struct Port(u16);
//!
//! impl std::str::FromStr for Port {
//!     type Err = std::num::ParseIntError;
//!     fn from_str(s: &str) -> Result<Self, Self::Err> {
//!         s.parse().map(Port)
//!     }
//! }
//!
//! impl Shape for Port {
//!     const KIND: TypeKind = TypeKind::Value;
//!     fn capabilities() -> Capabilities<Self> {
//!         Capabilities::new().parse_from_str()
//!     }
//! }
//!
//! # fn main() -> textconv_core::ConvertResult<()> {
//! let parser = ParserContainer::global().parser::<Port>()?;
//! assert_eq!(parser.parse("8080")?, Port(8080));
//! # Ok(())
//! # }
//! ```

use std::any::{self, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::capability::Capabilities;
use crate::config::{MissingFormatSpecific, MissingTryParse};
use crate::constants::arguments;
use crate::error::{ConvertError, ConvertResult};
use crate::formatter::{ErasedFormatter, Formatter, FormatterContainer, StringFormatter};
use crate::parser::{ErasedParser, Parser, ParserContainer, StringParser};

/// Classification of a convertible type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Value,
    Enum,
    Reference,
    Str,
    Nullable,
    Interface,
    Callable,
}

impl TypeKind {
    /// Kinds whose values are never absent at the call boundary
    pub fn is_value_like(self) -> bool {
        matches!(self, TypeKind::Value | TypeKind::Enum)
    }

    /// Kinds governed by the reference-type null options
    pub fn is_reference_like(self) -> bool {
        matches!(
            self,
            TypeKind::Reference | TypeKind::Interface | TypeKind::Callable
        )
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TypeKind::Value => "value",
            TypeKind::Enum => "enum",
            TypeKind::Reference => "reference",
            TypeKind::Str => "string",
            TypeKind::Nullable => "nullable",
            TypeKind::Interface => "interface",
            TypeKind::Callable => "callable",
        };
        f.write_str(label)
    }
}

/// A type that parser and formatter containers can service.
///
/// Only `KIND` is required. `capabilities` defaults to an empty table, which
/// resolves to strategies that report every call as not supported.
pub trait Shape: Sized + Send + Sync + 'static {
    const KIND: TypeKind;

    /// Capability table probed once per container on first use.
    fn capabilities() -> Capabilities<Self> {
        Capabilities::new()
    }

    fn into_boxed(self) -> Boxed {
        Boxed::new(self)
    }

    fn from_boxed(boxed: Boxed) -> ConvertResult<Self> {
        boxed.downcast::<Self>()
    }

    /// Default parser resolution. Only wrapper shapes override this.
    #[doc(hidden)]
    fn resolve_parser(
        container: &ParserContainer,
        missing_try_parse: MissingTryParse,
    ) -> ConvertResult<Arc<dyn Parser<Self>>> {
        container.resolve_default::<Self>(missing_try_parse)
    }

    /// Default formatter resolution. Only wrapper shapes override this.
    #[doc(hidden)]
    fn resolve_formatter(
        container: &FormatterContainer,
        missing_format_specific: MissingFormatSpecific,
    ) -> ConvertResult<Arc<dyn Formatter<Self>>> {
        container.resolve_default::<Self>(missing_format_specific)
    }

    /// The wrapped type, for wrapper shapes
    #[doc(hidden)]
    fn underlying() -> Option<TypeKey> {
        None
    }
}

impl Shape for String {
    const KIND: TypeKind = TypeKind::Str;

    fn resolve_parser(
        _container: &ParserContainer,
        _missing_try_parse: MissingTryParse,
    ) -> ConvertResult<Arc<dyn Parser<Self>>> {
        Ok(Arc::new(StringParser))
    }

    fn resolve_formatter(
        _container: &FormatterContainer,
        _missing_format_specific: MissingFormatSpecific,
    ) -> ConvertResult<Arc<dyn Formatter<Self>>> {
        Ok(Arc::new(StringFormatter))
    }
}

/// Nullable wrappers are single-level: `Option<Option<V>>` has no strategy.
pub(crate) fn ensure_single_level<V: Shape>() -> ConvertResult<()> {
    if V::KIND == TypeKind::Nullable {
        return Err(ConvertError::configuration(format!(
            "'{}' nests a nullable shape inside another nullable shape",
            any::type_name::<Option<V>>()
        )));
    }
    Ok(())
}

impl<V: Shape> Shape for Option<V> {
    const KIND: TypeKind = TypeKind::Nullable;

    fn into_boxed(self) -> Boxed {
        match self {
            Some(value) => value.into_boxed(),
            None => Boxed::Null,
        }
    }

    fn from_boxed(boxed: Boxed) -> ConvertResult<Self> {
        match boxed {
            Boxed::Null => Ok(None),
            Boxed::Value(value) if value.is::<Self>() => Boxed::Value(value).downcast::<Self>(),
            other => V::from_boxed(other).map(Some),
        }
    }

    fn resolve_parser(
        container: &ParserContainer,
        _missing_try_parse: MissingTryParse,
    ) -> ConvertResult<Arc<dyn Parser<Self>>> {
        container.resolve_nullable::<V>()
    }

    fn resolve_formatter(
        container: &FormatterContainer,
        _missing_format_specific: MissingFormatSpecific,
    ) -> ConvertResult<Arc<dyn Formatter<Self>>> {
        container.resolve_nullable::<V>()
    }

    fn underlying() -> Option<TypeKey> {
        Some(TypeKey::of::<V>())
    }
}

/// Runtime token for a [`Shape`] type.
///
/// Besides identity, a key carries the monomorphized entry points that let a
/// container resolve the type without knowing it statically.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
    parser_entry: fn(&ParserContainer) -> ConvertResult<Arc<dyn ErasedParser>>,
    formatter_entry: fn(&FormatterContainer) -> ConvertResult<Arc<dyn ErasedFormatter>>,
}

impl TypeKey {
    pub fn of<T: Shape>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: any::type_name::<T>(),
            kind: T::KIND,
            parser_entry: ParserContainer::erased_entry::<T>,
            formatter_entry: FormatterContainer::erased_entry::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub(crate) fn resolve_parser(
        &self,
        container: &ParserContainer,
    ) -> ConvertResult<Arc<dyn ErasedParser>> {
        (self.parser_entry)(container)
    }

    pub(crate) fn resolve_formatter(
        &self,
        container: &FormatterContainer,
    ) -> ConvertResult<Arc<dyn ErasedFormatter>> {
        (self.formatter_entry)(container)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeKey")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type-erased value crossing the untyped strategy surface
pub enum Boxed {
    Null,
    Value(Box<dyn Any + Send>),
}

impl Boxed {
    pub fn new<T: Any + Send>(value: T) -> Self {
        Boxed::Value(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Boxed::Null)
    }

    /// Unbox into `T`, failing on null or on a value of another type
    pub fn downcast<T: Any>(self) -> ConvertResult<T> {
        match self {
            Boxed::Null => Err(ConvertError::null_argument(arguments::VALUE)),
            Boxed::Value(value) => value
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| ConvertError::type_mismatch(any::type_name::<T>())),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Boxed::Null => None,
            Boxed::Value(value) => value.downcast_ref::<T>(),
        }
    }
}

impl fmt::Debug for Boxed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boxed::Null => f.write_str("Boxed::Null"),
            Boxed::Value(_) => f.write_str("Boxed::Value(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_boxing_unwraps_inner_value() {
        let boxed = Some(7_i32).into_boxed();
        assert_eq!(boxed.downcast_ref::<i32>(), Some(&7));
        assert!(Option::<i32>::None.into_boxed().is_null());
    }

    #[test]
    fn test_nullable_unboxing() {
        assert_eq!(Option::<i32>::from_boxed(Boxed::Null), Ok(None));
        assert_eq!(Option::<i32>::from_boxed(Boxed::new(3_i32)), Ok(Some(3)));
        assert_eq!(
            Option::<i32>::from_boxed(Boxed::new(Some(4_i32))),
            Ok(Some(4))
        );
    }

    #[test]
    fn test_value_unboxing_rejects_null_and_mismatch() {
        assert!(i32::from_boxed(Boxed::Null).unwrap_err().is_null_argument());
        assert_eq!(
            i32::from_boxed(Boxed::new("text")),
            Err(ConvertError::type_mismatch("i32"))
        );
    }

    #[test]
    fn test_type_key_identity() {
        assert_eq!(TypeKey::of::<u8>(), TypeKey::of::<u8>());
        assert_ne!(TypeKey::of::<u8>(), TypeKey::of::<Option<u8>>());
        assert_eq!(TypeKey::of::<Option<u8>>().kind(), TypeKind::Nullable);
        assert_eq!(
            <Option<u8> as Shape>::underlying(),
            Some(TypeKey::of::<u8>())
        );
    }
}
