use super::{Solver, Statistics};
use crate::collections::FibonacciHeap;
use crate::manager::{Manager, Solution};
use crate::search_space::{
    Heuristic, InformedSearchNode, SearchNodeGenerator, StateSearchNode,
};
use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// A* search discarding nodes whose search space state was already reached at a lower or equal cost.
///
/// This prunes transpositions in search graphs at the price of one map entry per state.
/// Entries made obsolete by a cheaper path to their state are skipped when popped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AStarStateSolver;

impl AStarStateSolver {
    pub fn new() -> Self {
        Self
    }
}

/// Pushes the node if it reaches its state more cheaply than any node seen before.
fn push_if_improving<N>(
    open: &mut FibonacciHeap<N::Cost, InformedSearchNode<N>>,
    best_costs: &mut FxHashMap<N::State, N::Cost>,
    node: InformedSearchNode<N>,
) -> bool
where
    N: StateSearchNode,
{
    let cost = node.node().cost();

    match best_costs.entry(node.node().search_space_state()) {
        Entry::Occupied(mut entry) => {
            if cost >= *entry.get() {
                return false;
            }

            entry.insert(cost);
        }
        Entry::Vacant(entry) => {
            entry.insert(cost);
        }
    }

    open.push(node.estimated_total_cost(), node);

    true
}

impl<N, E> Solver<N, E> for AStarStateSolver
where
    N: StateSearchNode,
    E: ?Sized,
{
    fn solve<H, G, M>(
        &self,
        start_nodes: Vec<InformedSearchNode<N>>,
        environment: &E,
        heuristic: &H,
        generator: &mut G,
        manager: &mut M,
    ) where
        H: Heuristic<N, E> + ?Sized,
        G: SearchNodeGenerator<N, E>,
        M: Manager<N> + ?Sized,
    {
        let mut statistics = Statistics::default();
        let mut open = FibonacciHeap::new();
        let mut best_costs = FxHashMap::default();
        let cost_bound = manager.cost_bound();

        for node in start_nodes {
            if node.estimated_total_cost() <= cost_bound {
                push_if_improving(&mut open, &mut best_costs, node);
            }
        }

        while manager.continue_search() {
            let Some((cost, node)) = open.delete_min() else {
                break;
            };

            let cost_bound = manager.cost_bound();

            if cost > cost_bound {
                break;
            }

            let is_stale = best_costs
                .get(&node.node().search_space_state())
                .is_some_and(|&best| best < node.node().cost());

            if is_stale {
                continue;
            }

            trace!("Expanding node with estimated cost {:?}", cost);
            let successors = generator.generate_successor_nodes(node.node(), environment, heuristic);
            statistics.record_expansion(successors.len());

            for successor in successors {
                if successor.estimated_total_cost() <= cost_bound {
                    push_if_improving(&mut open, &mut best_costs, successor);
                }
            }

            if node.node().is_goal() {
                manager.register_solution(Solution::new(node.into_node(), true));
            }
        }

        debug!(
            "A* with state registry finished, expanded: {expanded}, generated: {generated}, states: {states}",
            expanded = statistics.expanded,
            generated = statistics.generated,
            states = best_costs.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_space::SearchNode;
    use crate::testing::*;

    #[test]
    fn test_basic_scenarios() {
        check_basic_scenarios(&AStarStateSolver::new());
    }

    #[test]
    fn test_push_if_improving() {
        let mut open = FibonacciHeap::new();
        let mut best_costs = FxHashMap::default();
        let a = node("a", 3.0, 0.0, false).with_state("s");
        let b = node("b", 3.0, 0.0, false).with_state("s");
        let c = node("c", 2.0, 0.0, false).with_state("s");

        assert!(push_if_improving(&mut open, &mut best_costs, a.informed()));
        assert!(!push_if_improving(&mut open, &mut best_costs, b.informed()));
        assert!(push_if_improving(&mut open, &mut best_costs, c.informed()));
        assert_eq!(open.len(), 2);
        assert_eq!(best_costs.get("s"), Some(&c.cost()));
    }

    #[test]
    fn test_expansion_order() {
        let a1 = node("a1", 0.0, 0.0, false).with_state("a");
        let a2 = node("a2", 4.0, 0.0, false).with_state("a");
        let b1 = node("b1", 5.0, 0.0, false).with_state("b");
        let b2 = node("b2", 4.0, 0.0, false).with_state("b");
        let c1 = node("c1", 7.0, 0.0, false).with_state("c");
        let c2 = node("c2", 6.0, 0.0, false).with_state("c");
        let d1 = node("d1", 9.0, 0.0, true).with_state("d");
        let d2 = node("d2", 8.0, 0.0, true).with_state("d");
        let e = node("e", 2.0, 5.5, false).with_state("e");
        let mut generator = DummyGenerator::default();
        generator.add(&a1, &[&e, &b1]);
        generator.add(&e, &[&a2, &b2]);
        generator.add(&b2, &[&c2]);
        generator.add(&c2, &[&d2]);
        generator.add(&b1, &[&c1]);
        generator.add(&c1, &[&d1]);

        let result = run(&AStarStateSolver::new(), generator, &[&a1]);

        assert_eq!(result.expanded, vec!["a1", "b1", "c1", "e", "b2", "c2", "d2"]);
        assert_eq!(result.solution(), Some(("d2", true)));
    }
}
