mod select_n_best;
mod select_unique_n_best;

pub use select_n_best::SelectNBest;
pub use select_unique_n_best::SelectUniqueNBest;

use super::{Solver, Statistics};
use crate::manager::{Manager, Solution};
use crate::search_space::{Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator};
use log::{debug, trace};
use std::cmp;

/// Nodes chosen to seed the next generation of a beam search.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSelection<N: SearchNode> {
    /// Nodes to expand, in no particular order.
    pub selected: Vec<InformedSearchNode<N>>,
    /// Cheapest node that was not selected.
    pub best_pruned: Option<InformedSearchNode<N>>,
}

/// Trait for choosing the nodes of a generation to expand.
pub trait ParentSelector<N: SearchNode, E: ?Sized> {
    /// Chooses the nodes to expand among `nodes`.
    ///
    /// Every node not selected counts as pruned, and the cheapest of them must be returned as `best_pruned`.
    fn select_nodes_to_expand(
        &self,
        nodes: Vec<InformedSearchNode<N>>,
        environment: &E,
    ) -> GenerationSelection<N>;
}

/// Beam search.
///
/// The search proceeds in generations. Goals within the cost bound are reported as non-optimal as soon as they
/// are generated. The nodes cheaper than the bound are handed to a [`ParentSelector`], and the successors
/// of the selected nodes form the next generation.
///
/// When no generation is left, the cheapest goal is reported as optimal if no pruned node was cheaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamSearchSolver<P> {
    parent_selector: P,
}

impl<P> BeamSearchSolver<P> {
    pub fn new(parent_selector: P) -> Self {
        Self { parent_selector }
    }

    #[inline]
    pub fn parent_selector(&self) -> &P {
        &self.parent_selector
    }
}

impl<N, E, P> Solver<N, E> for BeamSearchSolver<P>
where
    N: SearchNode + Clone,
    E: ?Sized,
    P: ParentSelector<N, E>,
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
        let mut best_pruned_cost: Option<N::Cost> = None;
        let mut best_goal: Option<N> = None;
        let mut generation = start_nodes;
        let mut depth = 0;

        while !generation.is_empty() {
            let cost_bound = manager.cost_bound();

            for node in &generation {
                if node.estimated_total_cost() > cost_bound || !node.node().is_goal() {
                    continue;
                }

                let node = node.node();
                manager.register_solution(Solution::new(node.clone(), false));

                if best_goal.as_ref().is_none_or(|best| best.cost() > node.cost()) {
                    best_goal = Some(node.clone());
                }
            }

            if !manager.continue_search() {
                debug!(
                    "Beam search stopped at depth {depth}, expanded: {expanded}, generated: {generated}",
                    expanded = statistics.expanded,
                    generated = statistics.generated,
                );

                return;
            }

            let cost_bound = manager.cost_bound();
            generation.retain(|node| node.estimated_total_cost() < cost_bound);

            let selection = self
                .parent_selector
                .select_nodes_to_expand(generation, environment);

            if let Some(pruned) = selection.best_pruned {
                let cost = pruned.estimated_total_cost();
                best_pruned_cost = Some(best_pruned_cost.map_or(cost, |best| cmp::min(best, cost)));
            }

            trace!(
                "Generation {depth}: expanding {} nodes, cheapest pruned cost: {:?}",
                selection.selected.len(),
                best_pruned_cost
            );

            generation = Vec::new();

            for parent in &selection.selected {
                let successors = generator.generate_successor_nodes(parent.node(), environment, heuristic);
                statistics.record_expansion(successors.len());
                generation.extend(successors);
            }

            depth += 1;
        }

        debug!(
            "Beam search exhausted at depth {depth}, expanded: {expanded}, generated: {generated}",
            expanded = statistics.expanded,
            generated = statistics.generated,
        );

        if let Some(best_goal) = best_goal {
            if best_pruned_cost.is_none_or(|pruned| best_goal.cost() <= pruned) {
                manager.register_solution(Solution::new(best_goal, true));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::collections::BTreeSet;

    fn run_with_width(n: usize) -> Run {
        let a = node("a", 0.0, 0.0, false);
        let b = node("b", 1.0, 0.0, false);
        let c = node("c", 0.5, 1.5, false);
        let d = node("d", 2.0, 1.0, false);
        let e = node("e", 0.0, 4.0, false);
        let f = node("f", 5.0, 0.0, true);
        let g = node("g", 4.0, 2.0, false);
        let h = node("h", 7.0, 0.0, true);
        let i = node("i", 8.0, 0.0, true);
        let mut generator = DummyGenerator::default();
        generator.add(&a, &[&c, &d, &b]);
        generator.add(&c, &[&e, &g]);
        generator.add(&g, &[&i]);
        generator.add(&d, &[&f]);
        generator.add(&b, &[&h]);

        let solver = BeamSearchSolver::new(SelectNBest::new(n).unwrap());

        run_with_bound(&solver, generator, &[&a], crate::cost::FloatCost::INFINITY)
    }

    fn expanded_set(run: &Run) -> BTreeSet<&'static str> {
        run.expanded.iter().copied().collect()
    }

    #[test]
    fn test_basic_scenarios() {
        check_basic_scenarios(&BeamSearchSolver::new(SelectNBest::new(100).unwrap()));
        check_basic_scenarios(&BeamSearchSolver::new(SelectUniqueNBest::new(100).unwrap()));
    }

    #[test]
    fn test_width_one_misses_optimum() {
        let result = run_with_width(1);

        assert_eq!(result.expanded, vec!["a", "b"]);
        assert_eq!(result.solution(), Some(("h", false)));
    }

    #[test]
    fn test_width_two() {
        let result = run_with_width(2);

        assert_eq!(expanded_set(&result), BTreeSet::from(["a", "b", "c", "e", "g"]));
        assert_eq!(result.solution(), Some(("h", false)));
    }

    #[test]
    fn test_width_three_finds_optimum() {
        let result = run_with_width(3);

        assert_eq!(expanded_set(&result), BTreeSet::from(["a", "b", "c", "d", "e"]));
        assert_eq!(result.solution(), Some(("f", true)));
    }

    #[test]
    fn test_unique_selection_skips_duplicate_states() {
        let a = node("a", 0.0, 0.0, false);
        let b = node("b", 1.0, 0.0, false).with_state("s");
        let c = node("c", 2.0, 0.0, false).with_state("s");
        let d = node("d", 3.0, 0.0, false);
        let e = node("e", 4.0, 0.0, true);
        let mut generator = DummyGenerator::default();
        generator.add(&a, &[&c, &b, &d]);
        generator.add(&d, &[&e]);

        let solver = BeamSearchSolver::new(SelectUniqueNBest::new(2).unwrap());
        let result = run(&solver, generator, &[&a]);

        // e tightens the bound to its own cost, so it is never expanded
        assert_eq!(expanded_set(&result), BTreeSet::from(["a", "b", "d"]));
        assert_eq!(result.solution(), Some(("e", true)));
    }
}
