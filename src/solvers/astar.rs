use super::{Solver, Statistics};
use crate::collections::FibonacciHeap;
use crate::manager::{Manager, Solution};
use crate::search_space::{Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator};
use log::{debug, trace};

/// A* search.
///
/// Nodes are expanded in order of their estimated total cost, so with an admissible heuristic
/// the first goal popped from the open list is optimal.
/// The open list is a [`FibonacciHeap`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AStarSolver {
    stop_at_first_goal: bool,
}

impl AStarSolver {
    /// Creates a solver that reports every goal it pops and keeps searching until the manager stops it.
    ///
    /// Goals are expanded like any other node.
    pub fn new() -> Self {
        Self {
            stop_at_first_goal: false,
        }
    }

    /// Creates a solver that returns right after reporting the first goal.
    pub fn stop_at_first_goal() -> Self {
        Self {
            stop_at_first_goal: true,
        }
    }

    #[inline]
    pub fn stops_at_first_goal(&self) -> bool {
        self.stop_at_first_goal
    }
}

impl<N, E> Solver<N, E> for AStarSolver
where
    N: SearchNode,
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
        let cost_bound = manager.cost_bound();

        for node in start_nodes {
            let cost = node.estimated_total_cost();

            if cost <= cost_bound {
                open.push(cost, node);
            }
        }

        while manager.continue_search() {
            let Some((cost, node)) = open.delete_min() else {
                break;
            };

            // every remaining node is at least as expensive
            if cost > manager.cost_bound() {
                break;
            }

            if node.node().is_goal() && self.stop_at_first_goal {
                manager.register_solution(Solution::new(node.into_node(), true));
                break;
            }

            trace!("Expanding node with estimated cost {:?}", cost);
            let cost_bound = manager.cost_bound();
            let successors = generator.generate_successor_nodes(node.node(), environment, heuristic);
            statistics.record_expansion(successors.len());

            for successor in successors {
                let cost = successor.estimated_total_cost();

                if cost <= cost_bound {
                    open.push(cost, successor);
                }
            }

            if node.node().is_goal() {
                manager.register_solution(Solution::new(node.into_node(), true));
            }
        }

        debug!(
            "A* finished, expanded: {expanded}, generated: {generated}, open: {open}",
            expanded = statistics.expanded,
            generated = statistics.generated,
            open = open.len(),
        );
    }
}
