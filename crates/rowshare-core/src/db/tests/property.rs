use super::context;
use crate::{
    config::SharedTableConfig,
    db::{
        EntryComparator, SharedTableCache, enumerate::collect_row_entries,
        resolve::resolve_main_entry,
    },
    test_support::{ChainFixture, TestAdapter, TestEntry, chain_fixture},
};
use proptest::prelude::*;
use std::cmp::Ordering;

// A chain of `links.len() + 1` types where `links[i]` says whether entry
// `i + 1` is linked to its principal `i`. At least two types keep the table
// shared.
fn arb_chain() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(any::<bool>(), 1..6)
}

fn build(links: &[bool]) -> (ChainFixture, Vec<TestEntry>, TestAdapter) {
    let fx = chain_fixture(links.len() + 1);
    let entries: Vec<_> = fx
        .types
        .iter()
        .zip(0u32..)
        .map(|(&entity_type, id)| TestEntry::new(id, entity_type))
        .collect();

    let mut adapter = TestAdapter::new();
    for (i, linked) in links.iter().enumerate() {
        if *linked {
            adapter.link(entries[i + 1], fx.fks[i], entries[i]);
        }
    }

    (fx, entries, adapter)
}

// Index of the main entry for entry `k`: walk down while links hold.
fn expected_main(links: &[bool], mut k: usize) -> usize {
    while k > 0 && links[k - 1] {
        k -= 1;
    }
    k
}

proptest! {
    #[test]
    fn resolve_matches_model_and_is_idempotent(links in arb_chain(), pick in any::<prop::sample::Index>()) {
        let (fx, entries, adapter) = build(&links);
        let ctx = context(&fx.model, &ChainFixture::table_name(), &adapter, SharedTableConfig::default());
        let k = pick.index(entries.len());

        let main = resolve_main_entry(&ctx, &entries[k]).unwrap();
        prop_assert_eq!(main, entries[expected_main(&links, k)]);
        prop_assert_eq!(resolve_main_entry(&ctx, &main).unwrap(), main);
    }

    #[test]
    fn row_starts_with_main_and_covers_linked_run(links in arb_chain(), pick in any::<prop::sample::Index>()) {
        let (fx, entries, adapter) = build(&links);
        let ctx = context(&fx.model, &ChainFixture::table_name(), &adapter, SharedTableConfig::default());
        let k = pick.index(entries.len());

        let row = collect_row_entries(&ctx, &entries[k]).unwrap();
        let start = expected_main(&links, k);
        let mut end = start;
        while end < links.len() && links[end] {
            end += 1;
        }

        prop_assert_eq!(row[0], resolve_main_entry(&ctx, &entries[k]).unwrap());
        prop_assert_eq!(row, entries[start..=end].to_vec());
    }

    #[test]
    fn entries_with_same_main_share_a_value(links in arb_chain()) {
        let (fx, entries, adapter) = build(&links);
        let table = fx.model.table(&ChainFixture::table_name()).unwrap();
        let mut cache = SharedTableCache::new(
            &fx.model,
            table,
            &adapter,
            |_: &str, _: Option<&str>, _: EntryComparator<'_>| 0u32,
        )
        .unwrap();

        for entry in &entries {
            cache.get_or_add(entry).unwrap();
        }
        // Second pass only hits existing slots, so no address moves.
        let slots: Vec<*const u32> = entries
            .iter()
            .map(|entry| std::ptr::from_mut(cache.get_or_add(entry).unwrap()).cast_const())
            .collect();

        for a in 0..entries.len() {
            for b in 0..entries.len() {
                let same_main = expected_main(&links, a) == expected_main(&links, b);
                prop_assert_eq!(std::ptr::eq(slots[a], slots[b]), same_main);
            }
        }
        let rows = links.iter().filter(|linked| !**linked).count() + 1;
        prop_assert_eq!(cache.len(), rows);
    }

    #[test]
    fn comparator_is_a_strict_weak_ordering(
        picks in prop::collection::vec(any::<prop::sample::Index>(), 3),
        size in 1usize..6,
    ) {
        let fx = chain_fixture(size);
        let table = fx.model.table(&ChainFixture::table_name()).unwrap();
        let comparator = EntryComparator::new(&fx.model, table);
        let pick = |i: usize| {
            let index = picks[i].index(fx.types.len());
            TestEntry::new(u32::try_from(i).unwrap(), fx.types[index])
        };
        let (x, y, z) = (pick(0), pick(1), pick(2));

        // Irreflexive and antisymmetric.
        prop_assert_eq!(comparator.compare(&x, &x), Ordering::Equal);
        prop_assert_eq!(comparator.compare(&x, &y), comparator.compare(&y, &x).reverse());

        // Transitive.
        if comparator.compare(&x, &y) != Ordering::Greater
            && comparator.compare(&y, &z) != Ordering::Greater
        {
            prop_assert_ne!(comparator.compare(&x, &z), Ordering::Greater);
        }

        // Main type first.
        if comparator.is_main_entity_type(x.entity_type) && !comparator.is_main_entity_type(y.entity_type) {
            prop_assert_eq!(comparator.compare(&x, &y), Ordering::Less);
        }
    }
}
