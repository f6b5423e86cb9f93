//! Fallback helpers layered over parser strategies.

mod common;

use std::cell::Cell;

use common::*;
use textconv_core::{MissingTryParse, Outcome, Parser, ParserContainer, ParserExt, ParserOptions};

#[test]
fn test_parse_or_default() {
    let ints = ParserContainer::global().parser::<i32>().unwrap();

    assert_eq!(ints.parse_or_default("5", 7), Ok(5));
    assert_eq!(ints.parse_or_default("five", 7), Ok(7));
    assert_eq!(ints.parse_or_default(None::<&str>, 7), Ok(7));
}

#[test]
fn test_parse_or_else_is_lazy() {
    let ints = ParserContainer::global().parser::<i32>().unwrap();
    let calls = Cell::new(0);
    let fallback = || {
        calls.set(calls.get() + 1);
        -1
    };

    assert_eq!(ints.parse_or_else("10", fallback), Ok(10));
    assert_eq!(calls.get(), 0);
    assert_eq!(ints.parse_or_else("ten", fallback), Ok(-1));
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_try_parse_outcomes() {
    let colors = ParserContainer::global().parser::<Color>().unwrap();

    let parsed = colors.try_parse_or_default("Blue", Color::Red).unwrap();
    assert_eq!(parsed, Outcome::Parsed(Color::Blue));
    assert!(parsed.is_parsed());

    let fallback = colors.try_parse_or_default("Mauve", Color::Red).unwrap();
    assert_eq!(fallback, Outcome::Fallback(Color::Red));
    assert_eq!(*fallback.value(), Color::Red);

    let computed = colors.try_parse_or_else(None::<&str>, || Color::Green).unwrap();
    assert!(!computed.is_parsed());
    assert_eq!(computed.into_inner(), Color::Green);
}

#[test]
fn test_unsupported_try_parse_propagates() {
    let labels = ParserContainer::create(|_| Ok(())).unwrap().parser::<Label>().unwrap();

    assert!(labels
        .parse_or_default("inbox", Label("fallback".to_string()))
        .unwrap_err()
        .is_not_supported());
    assert!(labels
        .try_parse_or_else("inbox", || Label("fallback".to_string()))
        .unwrap_err()
        .is_not_supported());
}

#[test]
fn test_helpers_follow_container_policy() {
    let labels = ParserContainer::with_options(&ParserOptions {
        missing_try_parse: MissingTryParse::WrapParse,
        ..ParserOptions::default()
    })
    .unwrap()
    .parser::<Label>()
    .unwrap();

    assert_eq!(
        labels.parse_or_default("  ", Label("fallback".to_string())),
        Ok(Label("fallback".to_string()))
    );
    assert_eq!(
        labels.parse_or_default("inbox", Label("fallback".to_string())),
        Ok(Label("inbox".to_string()))
    );
}

#[test]
fn test_helpers_work_on_custom_parsers() {
    let lengths: &dyn Parser<usize> = &LengthParser;

    assert_eq!(lengths.parse_or_default("abc", 0), Ok(3));
    assert_eq!(
        lengths.try_parse_or_default(None::<&str>, 99),
        Ok(Outcome::Fallback(99))
    );
}
