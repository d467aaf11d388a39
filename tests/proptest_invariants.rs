//! Property-based invariant testing for the level iterator
//!
//! A level is generated as a random set of distinct keys cut into a random
//! number of consecutive tables. The reference model is simply the sorted
//! key list: whatever the level iterator yields has to match the matching
//! slice of that list.
//!
//! # Invariant Categories
//!
//! ## 1. Ordering Invariants
//! - Forward iteration equals the concatenation of the files
//! - Backward iteration equals its reverse
//!
//! ## 2. Seek Invariants
//! - `seek_ge(k)` then forward = suffix of keys >= k
//! - `seek_lt(k)` then backward = reversed prefix of keys < k
//!
//! ## 3. Bound Invariants
//! - Only keys in `[lower, upper)` are emitted
//! - Tables entirely outside the bounds are never opened, whichever of
//!   `seek_ge`, `seek_lt`, `first` or `last` starts the scan

use std::{collections::BTreeSet, sync::Arc};

use leveliter::{
    BytewiseComparator, FileMetaData, InternalIterator, InternalKey, LevelIterator, ReadOptions,
    Slice, TableBuilder, TableCache, ValueType,
};
use proptest::prelude::*;

// ============================================================================
// Helper Functions
// ============================================================================

fn arbitrary_keys() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[a-f]{1,3}", 1..60).prop_map(|s| s.into_iter().collect())
}

fn arbitrary_cuts() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..6, 1..20)
}

fn probe_key() -> impl Strategy<Value = String> {
    "[a-g]{0,3}"
}

/// Cut `keys` into consecutive tables whose sizes follow `cuts` (cycled)
fn build_level(keys: &[String], cuts: &[usize]) -> (Arc<TableCache>, Vec<FileMetaData>) {
    let cache = TableCache::new();
    let mut metas = Vec::new();
    let mut rest = keys;
    let mut number = 1;
    for size in cuts.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (chunk, tail) = rest.split_at((*size).min(rest.len()));
        let mut builder = TableBuilder::new(number, Arc::new(BytewiseComparator));
        for k in chunk {
            builder
                .add(InternalKey::new(k.as_str(), 1, ValueType::Value), k.as_str())
                .unwrap();
        }
        let (table, meta) = builder.finish().unwrap();
        cache.insert(table);
        metas.push(meta);
        number += 1;
        rest = tail;
    }
    (Arc::new(cache), metas)
}

fn level_iter(cache: &Arc<TableCache>, metas: &[FileMetaData], opts: ReadOptions) -> LevelIterator {
    LevelIterator::new(
        opts,
        Arc::new(BytewiseComparator),
        cache.clone(),
        metas.to_vec(),
    )
}

fn drain_forward(it: &mut LevelIterator, mut ok: bool) -> Vec<String> {
    let mut out = Vec::new();
    while ok {
        out.push(it.key().user_key().to_string());
        assert_eq!(it.value(), it.key().user_key().clone());
        ok = it.next();
    }
    out
}

fn drain_backward(it: &mut LevelIterator, mut ok: bool) -> Vec<String> {
    let mut out = Vec::new();
    while ok {
        out.push(it.key().user_key().to_string());
        ok = it.prev();
    }
    out
}

// ============================================================================
// Property 1: Ordering
// ============================================================================

proptest! {
    #[test]
    fn prop_forward_is_concatenation(keys in arbitrary_keys(), cuts in arbitrary_cuts()) {
        let (cache, metas) = build_level(&keys, &cuts);
        let mut it = level_iter(&cache, &metas, ReadOptions::default());

        let ok = it.first();
        let got = drain_forward(&mut it, ok);
        prop_assert_eq!(got, keys);
        prop_assert!(!it.valid());
        prop_assert!(it.error().is_none());

        // Every table was opened exactly once.
        for meta in &metas {
            prop_assert_eq!(cache.open_count(meta.number), 1);
        }
        prop_assert!(it.close().is_ok());
    }

    #[test]
    fn prop_backward_is_reverse(keys in arbitrary_keys(), cuts in arbitrary_cuts()) {
        let (cache, metas) = build_level(&keys, &cuts);
        let mut it = level_iter(&cache, &metas, ReadOptions::default());

        let ok = it.last();
        let got = drain_backward(&mut it, ok);
        let expected: Vec<String> = keys.iter().rev().cloned().collect();
        prop_assert_eq!(got, expected);
    }
}

// ============================================================================
// Property 2: Seeks
// ============================================================================

proptest! {
    #[test]
    fn prop_seek_ge_is_suffix(
        keys in arbitrary_keys(),
        cuts in arbitrary_cuts(),
        target in probe_key(),
    ) {
        let (cache, metas) = build_level(&keys, &cuts);
        let mut it = level_iter(&cache, &metas, ReadOptions::default());

        let ok = it.seek_ge(&Slice::from(target.as_str()));
        let got = drain_forward(&mut it, ok);
        let expected: Vec<String> = keys.iter().filter(|k| **k >= target).cloned().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_seek_lt_is_reversed_prefix(
        keys in arbitrary_keys(),
        cuts in arbitrary_cuts(),
        target in probe_key(),
    ) {
        let (cache, metas) = build_level(&keys, &cuts);
        let mut it = level_iter(&cache, &metas, ReadOptions::default());

        let ok = it.seek_lt(&Slice::from(target.as_str()));
        let got = drain_backward(&mut it, ok);
        let expected: Vec<String> = keys.iter().rev().filter(|k| **k < target).cloned().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_direction_change_round_trips(
        keys in arbitrary_keys(),
        cuts in arbitrary_cuts(),
        target in probe_key(),
    ) {
        let (cache, metas) = build_level(&keys, &cuts);
        let mut it = level_iter(&cache, &metas, ReadOptions::default());

        if it.seek_ge(&Slice::from(target.as_str())) {
            let here = it.key();
            if it.next() {
                prop_assert!(it.prev());
                prop_assert_eq!(it.key(), here);
            }
        }
    }
}

// ============================================================================
// Property 3: Bounds
// ============================================================================

proptest! {
    #[test]
    fn prop_bounds_restrict_output_and_opens(
        keys in arbitrary_keys(),
        cuts in arbitrary_cuts(),
        a in probe_key(),
        b in probe_key(),
    ) {
        let (lower, upper) = if a <= b { (a, b) } else { (b, a) };
        let (cache, metas) = build_level(&keys, &cuts);
        let opts = ReadOptions::new()
            .with_lower_bound(lower.as_str())
            .with_upper_bound(upper.as_str());
        let mut it = level_iter(&cache, &metas, opts);

        let ok = it.seek_ge(&Slice::from(lower.as_str()));
        let forward = drain_forward(&mut it, ok);
        let expected: Vec<String> = keys
            .iter()
            .filter(|k| **k >= lower && **k < upper)
            .cloned()
            .collect();
        prop_assert_eq!(&forward, &expected);

        let ok = it.seek_lt(&Slice::from(upper.as_str()));
        let backward = drain_backward(&mut it, ok);
        let reversed: Vec<String> = expected.iter().rev().cloned().collect();
        prop_assert_eq!(backward, reversed);

        // first()/last() start outside the window whenever a bound cuts
        // off whole tables, and must skip them without opening.
        let ok = it.first();
        prop_assert_eq!(drain_forward(&mut it, ok), expected.clone());
        prop_assert_eq!(it.prev(), !expected.is_empty());
        if let Some(last) = expected.last() {
            prop_assert_eq!(&it.key().user_key().to_string(), last);
        }

        let ok = it.last();
        let backward = drain_backward(&mut it, ok);
        let reversed: Vec<String> = expected.iter().rev().cloned().collect();
        prop_assert_eq!(backward, reversed);
        prop_assert_eq!(it.next(), !expected.is_empty());
        if let Some(first) = expected.first() {
            prop_assert_eq!(&it.key().user_key().to_string(), first);
        }

        for meta in &metas {
            let smallest = meta.smallest.user_key().to_string();
            let largest = meta.largest.user_key().to_string();
            if largest < lower || smallest >= upper {
                prop_assert_eq!(cache.open_count(meta.number), 0);
            }
        }
    }
}

#[test]
fn test_generated_keys_are_unique() {
    let keys: BTreeSet<&str> = ["a", "b", "a"].into_iter().collect();
    let keys: Vec<String> = keys.into_iter().map(String::from).collect();
    let (cache, metas) = build_level(&keys, &[1]);
    assert_eq!(metas.len(), 2);
    assert_eq!(cache.len(), 2);
}
