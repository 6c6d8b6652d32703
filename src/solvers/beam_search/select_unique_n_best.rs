use super::{GenerationSelection, ParentSelector};
use crate::collections::FibonacciHeap;
use crate::error::SearchError;
use crate::search_space::{InformedSearchNode, StateSearchNode};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;

/// Selects the `n` nodes with the lowest estimated total cost, keeping at most one node per search space state.
///
/// Among nodes sharing a state, the first one with the lowest estimated total cost is kept. The other nodes
/// of the same state are not considered pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectUniqueNBest {
    n: usize,
}

impl SelectUniqueNBest {
    /// Creates a selector keeping `n` nodes per generation.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidParameter`] if `n` is zero.
    pub fn new(n: usize) -> Result<Self, SearchError> {
        Ok(Self {
            n: SearchError::positive("n", n)?,
        })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }
}

impl<N, E> ParentSelector<N, E> for SelectUniqueNBest
where
    N: StateSearchNode,
    E: ?Sized,
{
    fn select_nodes_to_expand(
        &self,
        nodes: Vec<InformedSearchNode<N>>,
        _: &E,
    ) -> GenerationSelection<N> {
        // the most expensive selected node sits on top
        let mut heap: FibonacciHeap<Reverse<N::Cost>, InformedSearchNode<N>> = FibonacciHeap::new();
        let mut handles = FxHashMap::default();
        let mut best_pruned: Option<InformedSearchNode<N>> = None;
        let mut prune = |node: InformedSearchNode<N>| {
            if best_pruned
                .as_ref()
                .is_none_or(|best| best.estimated_total_cost() >= node.estimated_total_cost())
            {
                best_pruned = Some(node);
            }
        };

        for node in nodes {
            let cost = node.estimated_total_cost();
            let state = node.node().search_space_state();

            if let Some(&handle) = handles.get(&state) {
                let cheaper = heap
                    .get(handle)
                    .is_ok_and(|(_, other)| cost < other.estimated_total_cost());

                if cheaper && heap.delete(handle).is_ok() {
                    handles.insert(state, heap.push(Reverse(cost), node));
                }

                continue;
            }

            if heap.len() < self.n {
                handles.insert(state, heap.push(Reverse(cost), node));
                continue;
            }

            match heap.find_min() {
                Some((&Reverse(max), _)) if cost < max => {
                    if let Some((_, evicted)) = heap.delete_min() {
                        handles.remove(&evicted.node().search_space_state());
                        prune(evicted);
                    }

                    handles.insert(state, heap.push(Reverse(cost), node));
                }
                _ => prune(node),
            }
        }

        GenerationSelection {
            selected: heap.into_entries().map(|(_, node)| node).collect(),
            best_pruned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::collections::BTreeSet;

    fn select(n: usize, nodes: &[DummyNode]) -> (BTreeSet<&'static str>, Option<&'static str>) {
        let selection = SelectUniqueNBest::new(n)
            .unwrap()
            .select_nodes_to_expand(nodes.iter().map(DummyNode::informed).collect(), &());
        let selected = selection.selected.iter().map(|node| node.node().name).collect();

        (selected, selection.best_pruned.map(|node| node.node().name))
    }

    fn generation() -> Vec<DummyNode> {
        vec![
            node("a", 5.0, 0.0, false).with_state("s2"),
            node("b", 3.0, 0.0, false).with_state("s1"),
            node("c", 0.0, 10.0, false),
            node("d", 8.0, 1.0, false).with_state("s2"),
            node("e", 1.0, 5.0, false).with_state("s1"),
            node("f", 5.0, 3.0, false),
            node("g", 5.0, 7.0, false).with_state("s3"),
            node("h", 8.0, 3.0, false).with_state("s3"),
        ]
    }

    #[test]
    fn test_zero_is_rejected() {
        assert!(SelectUniqueNBest::new(0).is_err());
    }

    #[test]
    fn test_selects_cheapest_unique_states() {
        let (selected, pruned) = select(3, &generation());

        assert_eq!(selected, BTreeSet::from(["a", "b", "f"]));
        assert_eq!(pruned, Some("c"));
    }

    #[test]
    fn test_duplicates_are_not_pruned() {
        let (selected, pruned) = select(10, &generation());

        assert_eq!(selected, BTreeSet::from(["a", "b", "c", "f", "h"]));
        assert_eq!(pruned, None);
    }

    #[test]
    fn test_cheaper_duplicate_replaces_selected_node() {
        let nodes = [
            node("a", 3.0, 0.0, false).with_state("s"),
            node("b", 3.0, 0.0, false),
            node("c", 1.0, 0.0, false).with_state("s"),
        ];
        let (selected, pruned) = select(1, &nodes);

        assert_eq!(selected, BTreeSet::from(["c"]));
        assert_eq!(pruned, Some("b"));
    }

    #[test]
    fn test_evicted_node_is_pruned() {
        let nodes = [
            node("a", 1.0, 0.0, false),
            node("b", 2.0, 0.0, false),
            node("c", 3.0, 0.0, false),
        ];
        assert_eq!(select(1, &nodes), (BTreeSet::from(["a"]), Some("b")));

        let nodes = [
            node("a", 3.0, 0.0, false),
            node("b", 3.0, 0.0, false).with_state("s"),
            node("c", 1.0, 0.0, false).with_state("s"),
        ];
        assert_eq!(select(1, &nodes), (BTreeSet::from(["c"]), Some("a")));
    }
}
