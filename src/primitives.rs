//! # Built-in Shapes
//!
//! Shape registrations for the primitive numeric types, `bool` and `char`.
//!
//! Integers and floats are [`Formattable`] with a small specifier language:
//!
//! | Specifier | Integers | Floats |
//! |-----------|----------|--------|
//! | `""`, `G` | `Display` | `Display` |
//! | `D[n]` | zero-padded decimal | n/a |
//! | `X[n]`, `x[n]` | zero-padded hexadecimal | n/a |
//! | `B[n]`, `O[n]` | zero-padded binary / octal | n/a |
//! | `F[n]` | n/a | fixed point, two places by default |
//! | `E[n]`, `e[n]` | scientific | scientific |
//!
//! `n` may not exceed [`MAX_PRECISION`]. The locale argument is accepted and
//! ignored.

use std::any;
use std::fmt;

use crate::capability::{Capabilities, Formattable, Locale};
use crate::constants::specifiers::{FIXED_DEFAULT_PRECISION, MAX_PRECISION};
use crate::error::{ConvertError, ConvertResult};
use crate::shape::{Shape, TypeKind};

struct FormatSpec {
    kind: char,
    precision: Option<usize>,
}

impl FormatSpec {
    fn parse(format: &str, type_name: &'static str) -> ConvertResult<Option<Self>> {
        let mut chars = format.chars();
        let Some(kind) = chars.next() else {
            return Ok(None);
        };

        let rest = chars.as_str();
        let precision = if rest.is_empty() {
            None
        } else {
            if !rest.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConvertError::format(
                    type_name,
                    format!("invalid format specifier '{format}'"),
                ));
            }
            match rest.parse::<u16>() {
                Ok(digits) if digits <= MAX_PRECISION => Some(usize::from(digits)),
                _ => return Err(ConvertError::format(type_name, "precision out of range")),
            }
        };

        Ok(Some(Self { kind, precision }))
    }

    fn unknown(&self, type_name: &'static str) -> ConvertError {
        ConvertError::format(
            type_name,
            format!("unknown format specifier '{}'", self.kind),
        )
    }
}

fn format_integer<T>(value: &T, format: &str, type_name: &'static str) -> ConvertResult<String>
where
    T: fmt::Display + fmt::UpperHex + fmt::LowerHex + fmt::Binary + fmt::Octal + fmt::UpperExp + fmt::LowerExp,
{
    let Some(spec) = FormatSpec::parse(format, type_name)? else {
        return Ok(value.to_string());
    };
    let width = spec.precision.unwrap_or(0);

    match spec.kind {
        'G' | 'g' => Ok(value.to_string()),
        'D' | 'd' => Ok(format!("{value:0width$}")),
        'X' => Ok(format!("{value:0width$X}")),
        'x' => Ok(format!("{value:0width$x}")),
        'B' | 'b' => Ok(format!("{value:0width$b}")),
        'O' | 'o' => Ok(format!("{value:0width$o}")),
        'E' => Ok(format!("{value:E}")),
        'e' => Ok(format!("{value:e}")),
        _ => Err(spec.unknown(type_name)),
    }
}

fn format_float<T>(value: &T, format: &str, type_name: &'static str) -> ConvertResult<String>
where
    T: fmt::Display + fmt::UpperExp + fmt::LowerExp,
{
    let Some(spec) = FormatSpec::parse(format, type_name)? else {
        return Ok(value.to_string());
    };

    match (spec.kind, spec.precision) {
        ('G' | 'g', _) => Ok(value.to_string()),
        ('F' | 'f', precision) => {
            let precision = precision.unwrap_or(FIXED_DEFAULT_PRECISION);
            Ok(format!("{value:.precision$}"))
        }
        ('E', Some(precision)) => Ok(format!("{value:.precision$E}")),
        ('E', None) => Ok(format!("{value:E}")),
        ('e', Some(precision)) => Ok(format!("{value:.precision$e}")),
        ('e', None) => Ok(format!("{value:e}")),
        _ => Err(spec.unknown(type_name)),
    }
}

macro_rules! integer_shapes {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Shape for $ty {
                const KIND: TypeKind = TypeKind::Value;

                fn capabilities() -> Capabilities<Self> {
                    Capabilities::new()
                        .parse_from_str()
                        .try_parse_from_str()
                        .to_string_from_display()
                        .formattable()
                }
            }

            impl Formattable for $ty {
                fn format_with(&self, format: &str, _locale: &Locale) -> ConvertResult<String> {
                    format_integer(self, format, any::type_name::<$ty>())
                }
            }
        )*
    };
}

macro_rules! float_shapes {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Shape for $ty {
                const KIND: TypeKind = TypeKind::Value;

                fn capabilities() -> Capabilities<Self> {
                    Capabilities::new()
                        .parse_from_str()
                        .try_parse_from_str()
                        .to_string_from_display()
                        .formattable()
                }
            }

            impl Formattable for $ty {
                fn format_with(&self, format: &str, _locale: &Locale) -> ConvertResult<String> {
                    format_float(self, format, any::type_name::<$ty>())
                }
            }
        )*
    };
}

macro_rules! display_shapes {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Shape for $ty {
                const KIND: TypeKind = TypeKind::Value;

                fn capabilities() -> Capabilities<Self> {
                    Capabilities::new()
                        .parse_from_str()
                        .try_parse_from_str()
                        .to_string_from_display()
                }
            }
        )*
    };
}

integer_shapes!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
float_shapes!(f32, f64);
display_shapes!(bool, char);

#[cfg(test)]
mod tests {
    use super::*;

    fn integer(value: i64, format: &str) -> ConvertResult<String> {
        value.format_with(format, &Locale::invariant())
    }

    fn float(value: f64, format: &str) -> ConvertResult<String> {
        value.format_with(format, &Locale::invariant())
    }

    #[test]
    fn test_integer_specifiers() {
        assert_eq!(integer(42, "").unwrap(), "42");
        assert_eq!(integer(42, "G").unwrap(), "42");
        assert_eq!(integer(42, "D5").unwrap(), "00042");
        assert_eq!(integer(255, "X").unwrap(), "FF");
        assert_eq!(integer(255, "x4").unwrap(), "00ff");
        assert_eq!(integer(5, "B8").unwrap(), "00000101");
        assert_eq!(integer(8, "O").unwrap(), "10");
        assert_eq!(integer(1500, "E").unwrap(), "1.5E3");
    }

    #[test]
    fn test_float_specifiers() {
        assert_eq!(float(2.5, "").unwrap(), "2.5");
        assert_eq!(float(1.23456, "F").unwrap(), "1.23");
        assert_eq!(float(1.23456, "F4").unwrap(), "1.2346");
        assert_eq!(float(1234.5, "E2").unwrap(), "1.23E3");
        assert_eq!(float(1234.5, "e").unwrap(), "1.2345e3");
    }

    #[test]
    fn test_rejects_unknown_specifiers() {
        assert!(integer(1, "Q").unwrap_err().is_format());
        assert!(integer(1, "F2").unwrap_err().is_format());
        assert!(integer(1, "Dx").unwrap_err().is_format());
        assert!(float(1.0, "X").unwrap_err().is_format());
    }

    #[test]
    fn test_rejects_oversized_precision() {
        assert!(integer(1, "D70000").unwrap_err().is_format());
        assert!(integer(1, "X99999999999999").unwrap_err().is_format());
        assert!(float(1.0, "F70000").unwrap_err().is_format());
        assert!(float(1.0, "E1000").unwrap_err().is_format());

        assert_eq!(integer(7, "D999").unwrap().len(), 999);
    }
}
