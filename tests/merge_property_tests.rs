use proptest::prelude::*;
use resgen::merge;
use resgen::types::RawResourceMap;
use resgen::{Locale, ResourceKind, Tiers};
use std::collections::BTreeMap;

fn key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,8}").expect("valid key regex")
}

fn value_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ]{1,12}").expect("valid value regex")
}

fn locale_strategy() -> impl Strategy<Value = Locale> {
    prop_oneof![
        Just(Locale::Base),
        Just(Locale::tag("de", None)),
        Just(Locale::tag("en", Some("GB"))),
    ]
}

fn layer_strategy() -> impl Strategy<Value = RawResourceMap<String>> {
    prop::collection::btree_map(
        locale_strategy(),
        prop::collection::btree_map(key_strategy(), value_strategy(), 0..6),
        0..3,
    )
}

proptest! {
    #[test]
    fn prop_highest_tier_wins(lower in layer_strategy(), own in layer_strategy(), upper in layer_strategy()) {
        let merged = merge(ResourceKind::Strings, &Tiers::new(lower.clone(), own.clone(), upper.clone()));

        let mut expected: BTreeMap<(Locale, String), String> = BTreeMap::new();
        for layer in [&lower, &own, &upper] {
            for (locale, entries) in layer {
                for (key, value) in entries {
                    expected.insert((locale.clone(), key.clone()), value.clone());
                }
            }
        }

        for ((locale, key), value) in &expected {
            let lookup = |layer: &RawResourceMap<String>| layer.get(locale).and_then(|e| e.get(key)).cloned();
            let winner = lookup(&upper).or_else(|| lookup(&own)).or_else(|| lookup(&lower));
            prop_assert_eq!(winner.as_ref(), Some(value));
            prop_assert_eq!(merged.get(locale, key), Some(value));
        }

        let merged_count: usize = merged
            .locales()
            .filter_map(|locale| merged.entries(locale))
            .map(BTreeMap::len)
            .sum();
        prop_assert_eq!(merged_count, expected.len());
    }

    #[test]
    fn prop_canonical_keys_are_base_keys(own in layer_strategy()) {
        let merged = merge(ResourceKind::Strings, &Tiers::new(RawResourceMap::new(), own.clone(), RawResourceMap::new()));
        let base_keys: Vec<&str> = own
            .get(&Locale::Base)
            .map(|entries| entries.keys().map(String::as_str).collect())
            .unwrap_or_default();

        match merged.canonical_keys() {
            Ok(keys) => prop_assert_eq!(keys.into_iter().collect::<Vec<_>>(), base_keys),
            Err(_) => {
                prop_assert!(base_keys.is_empty());
                prop_assert!(!merged.is_empty());
            }
        }
    }
}
