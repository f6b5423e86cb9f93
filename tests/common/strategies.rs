use proptest::prelude::*;

/// Strategy for generating single-word tokens
pub fn token_text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9_-]{0,31}"
}

/// Strategy for generating input that is not a valid integer
pub fn non_numeric_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{1,16}"
}

/// Strategy for generating integer format specifiers
pub fn integer_specifier_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["D", "X", "x", "B", "O"]),
        prop::option::of(0usize..12),
    )
        .prop_map(|(kind, width)| match width {
            Some(width) => format!("{kind}{width}"),
            None => kind.to_string(),
        })
}
