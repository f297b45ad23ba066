//! Released-status filtering.

use herald_protocol::Item;

/// Keeps items whose status name equals the released label.
///
/// The comparison is case-sensitive and exact; "released" does not match
/// "Released". Pure and deterministic.
pub fn select_released(items: Vec<Item>, label: &str) -> Vec<Item> {
    items
        .into_iter()
        .filter(|item| item.status_name == label)
        .collect()
}
