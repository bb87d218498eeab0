//! # Cart Quantity Rules
//!
//! Pure functions implementing the cart's line-item state machine.
//!
//! ## Line-Item State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               One dish line within one cart                             │
//! │                                                                         │
//! │              add            add              add                        │
//! │   absent ────────► qty=1 ────────► qty=2 ────────► qty=N               │
//! │     ▲                │                │                                 │
//! │     │     remove     │     remove     │                                 │
//! │     └────────────────┘◄───────────────┘  (remove decrements until      │
//! │                                           qty=1, then deletes)          │
//! │                                                                         │
//! │   replace / restart: every line jumps straight to absent                │
//! │   (replace then recreates lines from the caller-supplied list)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The storage layer applies these decisions atomically; this module only
//! encodes the decisions themselves so they stay trivially testable.

use crate::types::CartEntry;

// =============================================================================
// Removal Decision
// =============================================================================

/// What removing one unit of a dish does to its line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveAction {
    /// Quantity stays above zero: persist the decremented value.
    Decrement(i64),
    /// Quantity would reach zero: delete the line item entirely.
    Delete,
}

/// Decides between decrementing and deleting a line item.
///
/// Removal is symmetric with addition: one call removes exactly one unit,
/// so repeated calls drain a quantity to 1 and then remove the line.
///
/// ## Example
/// ```rust
/// use mesa_core::cart_math::{remove_action, RemoveAction};
///
/// assert_eq!(remove_action(3), RemoveAction::Decrement(2));
/// assert_eq!(remove_action(1), RemoveAction::Delete);
/// ```
pub fn remove_action(current_quantity: i64) -> RemoveAction {
    if current_quantity > 1 {
        RemoveAction::Decrement(current_quantity - 1)
    } else {
        RemoveAction::Delete
    }
}

// =============================================================================
// Entry Aggregation
// =============================================================================

/// Collapses duplicate dish ids in a replacement list, summing quantities.
///
/// A replacement list describes the state the cart should end in; two
/// entries for the same dish describe a total. Aggregating is the only
/// reading that preserves the one-line-per-dish invariant without
/// rejecting the request. First-seen order of dishes is kept.
///
/// ## Example
/// ```rust
/// use mesa_core::cart_math::aggregate_entries;
/// use mesa_core::types::CartEntry;
///
/// let entries = vec![
///     CartEntry { dish_id: "d1".into(), quantity: 1 },
///     CartEntry { dish_id: "d2".into(), quantity: 2 },
///     CartEntry { dish_id: "d1".into(), quantity: 2 },
/// ];
/// let merged = aggregate_entries(entries);
/// assert_eq!(merged.len(), 2);
/// assert_eq!(merged[0].quantity, 3); // d1: 1 + 2
/// ```
pub fn aggregate_entries(entries: Vec<CartEntry>) -> Vec<CartEntry> {
    let mut merged: Vec<CartEntry> = Vec::with_capacity(entries.len());

    for entry in entries {
        match merged.iter_mut().find(|e| e.dish_id == entry.dish_id) {
            Some(existing) => existing.quantity += entry.quantity,
            None => merged.push(entry),
        }
    }

    merged
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dish: &str, qty: i64) -> CartEntry {
        CartEntry {
            dish_id: dish.to_string(),
            quantity: qty,
        }
    }

    #[test]
    fn test_remove_decrements_above_one() {
        assert_eq!(remove_action(5), RemoveAction::Decrement(4));
        assert_eq!(remove_action(2), RemoveAction::Decrement(1));
    }

    #[test]
    fn test_remove_deletes_at_one() {
        assert_eq!(remove_action(1), RemoveAction::Delete);
    }

    #[test]
    fn test_remove_never_leaves_zero() {
        // Quantities below 1 never exist in the store, but the decision
        // must still never produce a zero-quantity line.
        assert_eq!(remove_action(0), RemoveAction::Delete);
    }

    #[test]
    fn test_aggregate_merges_duplicates() {
        let merged = aggregate_entries(vec![entry("d1", 1), entry("d2", 2), entry("d1", 2)]);
        assert_eq!(merged, vec![entry("d1", 3), entry("d2", 2)]);
    }

    #[test]
    fn test_aggregate_preserves_first_seen_order() {
        let merged = aggregate_entries(vec![entry("b", 1), entry("a", 1), entry("b", 1)]);
        assert_eq!(merged[0].dish_id, "b");
        assert_eq!(merged[1].dish_id, "a");
    }

    #[test]
    fn test_aggregate_empty_is_empty() {
        assert!(aggregate_entries(Vec::new()).is_empty());
    }

    #[test]
    fn test_aggregate_identity_without_duplicates() {
        let entries = vec![entry("a", 1), entry("b", 2)];
        assert_eq!(aggregate_entries(entries.clone()), entries);
    }

    #[test]
    fn test_n_adds_then_n_removes_return_to_absent() {
        // Idempotence-of-intent: N increments drained by N removals.
        let n = 4;
        let mut quantity = 0_i64;
        for _ in 0..n {
            quantity += 1;
        }
        for step in 0..n {
            match remove_action(quantity) {
                RemoveAction::Decrement(next) => quantity = next,
                RemoveAction::Delete => {
                    assert_eq!(step, n - 1, "delete only fires on the last removal");
                    quantity = 0;
                }
            }
        }
        assert_eq!(quantity, 0);
    }
}
