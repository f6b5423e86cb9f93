//! Concurrent lookups against a shared container.

mod common;

use std::sync::Arc;

use common::*;
use textconv_core::{
    Formatter, FormatterContainer, Parser, ParserContainer, ParserOptions, TypeKey,
};

const THREADS: usize = 16;

#[test]
fn test_concurrent_first_lookup_yields_one_strategy() {
    let parsers = ParserContainer::create(|_| Ok(())).unwrap();

    let resolved: Vec<Arc<dyn Parser<Token>>> = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| scope.spawn(|_| parsers.parser::<Token>().unwrap()))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    })
    .unwrap();

    let first = &resolved[0];
    assert!(resolved.iter().all(|parser| Arc::ptr_eq(parser, first)));
    assert!(Arc::ptr_eq(first, &parsers.parser::<Token>().unwrap()));
    assert_eq!(parsers.cache_stats().cached_strategies, 1);
}

#[test]
fn test_concurrent_nullable_lookups_share_underlying_strategy() {
    let parsers = ParserContainer::with_options(&ParserOptions {
        nullable_value_types_parse_null_to_null: true,
        ..ParserOptions::default()
    })
    .unwrap();

    crossbeam::thread::scope(|scope| {
        for worker in 0..THREADS {
            let parsers = parsers.clone();
            scope.spawn(move |_| {
                if worker % 2 == 0 {
                    let parser = parsers.parser::<Option<u32>>().unwrap();
                    assert_eq!(parser.parse(&worker.to_string()), Ok(Some(worker as u32)));
                    assert_eq!(parser.parse_opt(None), Ok(None));
                } else {
                    let parser = parsers.parser::<u32>().unwrap();
                    assert_eq!(parser.parse(&worker.to_string()), Ok(worker as u32));
                }
            });
        }
    })
    .unwrap();

    assert!(parsers.is_cached(&TypeKey::of::<u32>()));
    assert!(parsers.is_cached(&TypeKey::of::<Option<u32>>()));
    assert_eq!(parsers.cache_stats().cached_strategies, 2);
}

#[test]
fn test_concurrent_typed_and_erased_formatter_lookups() {
    let formatters = FormatterContainer::create(|_| Ok(())).unwrap();
    let key = TypeKey::of::<Color>();

    crossbeam::thread::scope(|scope| {
        for worker in 0..THREADS {
            let formatters = &formatters;
            scope.spawn(move |_| {
                let rendered = if worker % 2 == 0 {
                    formatters.formatter::<Color>().unwrap().format(&Color::Blue)
                } else {
                    formatters
                        .formatter_for(&key)
                        .unwrap()
                        .format_boxed(textconv_core::Boxed::new(Color::Blue))
                };
                assert_eq!(rendered, Ok(Some("Blue".to_string())));
            });
        }
    })
    .unwrap();

    assert_eq!(formatters.cache_stats().cached_strategies, 1);
}

#[test]
fn test_clones_share_one_cache() {
    let formatters = FormatterContainer::create(|_| Ok(())).unwrap();
    let clone = formatters.clone();

    let from_clone = clone.formatter::<i16>().unwrap();
    let from_original = formatters.formatter::<i16>().unwrap();
    assert!(Arc::ptr_eq(&from_clone, &from_original));
}
