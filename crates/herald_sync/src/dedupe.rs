//! Dedup against the published-record store.

use herald_protocol::Item;
use herald_store::StateStore;
use std::collections::HashSet;

/// Splits candidates into the delta to publish and the count dropped.
///
/// An item is dropped when its id is already in the store, or when an
/// earlier candidate in the same batch carries the same id (ties collapse to
/// a single publish attempt). Membership checks are O(1) per candidate; the
/// store is never written.
pub fn dedupe(candidates: Vec<Item>, store: &dyn StateStore) -> (Vec<Item>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut fresh = Vec::new();
    let mut skipped = 0;

    for item in candidates {
        if store.contains(&item.id) || !seen.insert(item.id.clone()) {
            skipped += 1;
        } else {
            fresh.push(item);
        }
    }

    (fresh, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use herald_protocol::PublishedRecord;
    use herald_store::MemoryStateStore;
    use proptest::prelude::*;

    fn item(id: &str) -> Item {
        Item::new(id, format!("Item {id}"), "Released")
    }

    #[test]
    fn passes_everything_through_an_empty_store() {
        let store = MemoryStateStore::new();
        let (fresh, skipped) = dedupe(vec![item("1"), item("2")], &store);

        assert_eq!(fresh.len(), 2);
        assert_eq!(skipped, 0);
    }

    #[test]
    fn drops_already_published_items() {
        let store = MemoryStateStore::with_records(vec![
            PublishedRecord::new("1", None),
            PublishedRecord::new("3", None),
        ]);

        let (fresh, skipped) = dedupe(vec![item("1"), item("2"), item("3")], &store);
        let ids: Vec<&str> = fresh.iter().map(|i| i.id.as_str()).collect();

        assert_eq!(ids, vec!["2"]);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn intra_batch_ties_collapse() {
        let store = MemoryStateStore::new();
        let (fresh, skipped) = dedupe(vec![item("1"), item("1"), item("1")], &store);

        assert_eq!(fresh.len(), 1);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn dedup_ignores_non_identity_fields() {
        let store = MemoryStateStore::with_records(vec![PublishedRecord::new("1", None)]);

        // Same id, changed title: still a duplicate.
        let changed = Item::new("1", "Renamed feature", "Released");
        let (fresh, skipped) = dedupe(vec![changed], &store);

        assert!(fresh.is_empty());
        assert_eq!(skipped, 1);
    }

    proptest! {
        #[test]
        fn no_survivor_is_in_store_and_ids_are_unique(
            candidate_ids in proptest::collection::vec("[a-z]{1,3}", 0..30),
            stored_ids in proptest::collection::vec("[a-z]{1,3}", 0..10)
        ) {
            let store = MemoryStateStore::with_records(
                stored_ids.iter().map(|id| PublishedRecord::new(id.clone(), None)).collect(),
            );
            let candidates: Vec<Item> = candidate_ids.iter().map(|id| item(id)).collect();
            let total = candidates.len();

            let (fresh, skipped) = dedupe(candidates, &store);

            prop_assert_eq!(fresh.len() + skipped, total);
            prop_assert!(fresh.iter().all(|i| !store.contains(&i.id)));

            let mut unique = HashSet::new();
            prop_assert!(fresh.iter().all(|i| unique.insert(i.id.clone())));
        }
    }
}
