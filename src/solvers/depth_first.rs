use super::{Solver, Statistics};
use crate::manager::{Manager, Solution};
use crate::search_space::{Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator};
use log::{debug, trace};
use std::vec;

/// Depth-first search.
///
/// Successors are visited in the order produced by the generator.
/// The search keeps a stack of successor lists instead of recursing, so its memory grows with the depth of the
/// search tree times the branching factor.
///
/// Every goal is reported as non-optimal when found.
/// Once the whole space under the cost bound has been examined, the cheapest goal is reported again as optimal.
/// Goals are expanded as well, since the manager may be interested in several solutions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepthFirstSolver;

impl DepthFirstSolver {
    pub fn new() -> Self {
        Self
    }
}

impl<N, E> Solver<N, E> for DepthFirstSolver
where
    N: SearchNode + Clone,
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
        let mut stack: Vec<vec::IntoIter<InformedSearchNode<N>>> = vec![start_nodes.into_iter()];
        let mut best_goal: Option<N> = None;

        while let Some(successors) = stack.last_mut() {
            if !manager.continue_search() {
                debug!(
                    "Depth-first search stopped, expanded: {expanded}, generated: {generated}",
                    expanded = statistics.expanded,
                    generated = statistics.generated,
                );

                return;
            }

            let Some(node) = successors.next() else {
                stack.pop();
                continue;
            };

            if node.estimated_total_cost() > manager.cost_bound() {
                continue;
            }

            let node = node.into_node();

            if node.is_goal() {
                if best_goal
                    .as_ref()
                    .is_none_or(|best| node.cost() < best.cost())
                {
                    best_goal = Some(node.clone());
                }

                manager.register_solution(Solution::new(node.clone(), false));
            }

            trace!("Expanding node at depth {} with cost {:?}", stack.len(), node.cost());
            let successors = generator.generate_successor_nodes(&node, environment, heuristic);
            statistics.record_expansion(successors.len());
            stack.push(successors.into_iter());
        }

        debug!(
            "Depth-first search exhausted, expanded: {expanded}, generated: {generated}",
            expanded = statistics.expanded,
            generated = statistics.generated,
        );

        if let Some(best_goal) = best_goal {
            manager.register_solution(Solution::new(best_goal, true));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::FloatCost;
    use crate::manager::{BasicManager, InterruptibleManager};
    use crate::solvers::solve;
    use crate::testing::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_basic_scenarios() {
        check_basic_scenarios(&DepthFirstSolver::new());
    }

    #[test]
    fn test_expansion_order_follows_generator() {
        let a = node("a", 0.0, 0.0, false);
        let b = node("b", 3.0, 0.0, false);
        let c = node("c", 1.0, 0.0, false);
        let d = node("d", 4.0, 0.0, false);
        let e = node("e", 2.0, 0.0, false);
        let mut generator = DummyGenerator::default();
        generator.add(&a, &[&b, &c]);
        generator.add(&b, &[&d]);
        generator.add(&c, &[&e]);

        let result = run(&DepthFirstSolver::new(), generator, &[&a]);

        assert_eq!(result.expanded, vec!["a", "b", "d", "c", "e"]);
        assert_eq!(result.solution(), None);
    }

    #[test]
    fn test_reports_cheapest_goal_as_optimal_after_exhaustion() {
        let a = node("a", 0.0, 0.0, false);
        let b = node("b", 6.0, 0.0, true);
        let c = node("c", 7.0, 0.0, false);
        let d = node("d", 1.0, 0.0, false);
        let e = node("e", 3.0, 0.0, true);
        let mut generator = DummyGenerator::default();
        generator.add(&a, &[&b, &d]);
        generator.add(&b, &[&c]);
        generator.add(&d, &[&e]);

        let result = run(&DepthFirstSolver::new(), generator, &[&a]);

        // c lies beyond the bound set by b
        assert_eq!(result.expanded, vec!["a", "b", "d", "e"]);
        assert_eq!(result.solution(), Some(("e", true)));
    }

    #[test]
    fn test_interrupted_search_reports_no_optimal_solution() {
        let a = node("a", 1.0, 0.0, true);
        let flag = AtomicBool::new(true);
        let mut manager = InterruptibleManager::new(BasicManager::new(FloatCost::MAX), &flag);
        let mut generator = DummyGenerator::default();

        solve(
            &DepthFirstSolver::new(),
            &mut manager,
            &mut generator,
            &DummyHeuristic,
            &(),
            [a],
        );

        assert!(manager.into_inner().solution().is_none());
    }
}
