use super::BoundedCost;
use std::cmp::Reverse;
use std::collections::BTreeMap;

/// Index of the nodes eligible for expansion, ordered by cost and then by decreasing depth.
///
/// Nodes with the same cost and depth are kept in insertion order.
#[derive(Debug, Clone)]
pub(super) struct SmaStarFrontier<T, C> {
    entries: BTreeMap<(BoundedCost<C>, Reverse<usize>), Vec<T>>,
}

impl<T, C> SmaStarFrontier<T, C>
where
    T: Copy + PartialEq,
    C: Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, item: T, cost: BoundedCost<C>, depth: usize) {
        self.entries
            .entry((cost, Reverse(depth)))
            .or_default()
            .push(item);
    }

    /// Removes an item stored under the given cost and depth.
    ///
    /// Returns whether the item was present.
    pub fn remove(&mut self, item: T, cost: BoundedCost<C>, depth: usize) -> bool {
        let key = (cost, Reverse(depth));
        let Some(items) = self.entries.get_mut(&key) else {
            return false;
        };
        let Some(position) = items.iter().position(|&other| other == item) else {
            return false;
        };

        items.remove(position);

        if items.is_empty() {
            self.entries.remove(&key);
        }

        true
    }

    /// Returns the deepest item among the cheapest ones.
    pub fn deepest_least_cost(&self) -> Option<T> {
        self.entries
            .first_key_value()
            .and_then(|(_, items)| items.first().copied())
    }

    /// Removes and returns the shallowest item among the most expensive ones satisfying `is_leaf`.
    pub fn remove_shallowest_highest_cost_leaf(&mut self, is_leaf: impl Fn(T) -> bool) -> Option<T> {
        let (key, position) = self.entries.iter().rev().find_map(|(key, items)| {
            items
                .iter()
                .position(|&item| is_leaf(item))
                .map(|position| (*key, position))
        })?;
        let items = self.entries.get_mut(&key)?;
        let item = items.remove(position);

        if items.is_empty() {
            self.entries.remove(&key);
        }

        Some(item)
    }
}
