//! Search strategies.
//!
//! Every solver reports its findings exclusively through [`Manager::register_solution`]
//! and polls [`Manager::continue_search`] before each expansion.

mod astar;
mod astar_state;
mod beam_search;
mod depth_first;
mod idastar;
mod iterative_deepening;
mod rbfs;
mod smastar;

pub use astar::AStarSolver;
pub use astar_state::AStarStateSolver;
pub use beam_search::{
    BeamSearchSolver, GenerationSelection, ParentSelector, SelectNBest, SelectUniqueNBest,
};
pub use depth_first::DepthFirstSolver;
pub use idastar::IdaStarSolver;
pub use iterative_deepening::IterativeDeepeningSolver;
pub use rbfs::RbfsSolver;
pub use smastar::SmaStarSolver;

use crate::manager::Manager;
use crate::search_space::{Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator};

/// Trait for search strategies.
///
/// A solver holds no state between runs, so one instance can serve many searches.
pub trait Solver<N: SearchNode, E: ?Sized> {
    /// Searches the space reachable from `start_nodes` and registers the goals it finds with `manager`.
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
        M: Manager<N> + ?Sized;
}

/// Counters of a single solver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Statistics {
    /// Number of nodes expanded.
    pub expanded: usize,
    /// Number of nodes generated.
    pub generated: usize,
}

impl Statistics {
    #[inline]
    pub fn record_expansion(&mut self, generated: usize) {
        self.expanded += 1;
        self.generated += generated;
    }
}

/// Annotates the start nodes with `heuristic` and runs `solver`.
pub fn solve<S, N, E, H, G, M>(
    solver: &S,
    manager: &mut M,
    generator: &mut G,
    heuristic: &H,
    environment: &E,
    start_nodes: impl IntoIterator<Item = N>,
) where
    S: Solver<N, E> + ?Sized,
    N: SearchNode,
    E: ?Sized,
    H: Heuristic<N, E> + ?Sized,
    G: SearchNodeGenerator<N, E>,
    M: Manager<N> + ?Sized,
{
    let start_nodes = start_nodes
        .into_iter()
        .map(|node| {
            let estimate = heuristic.estimate_remaining_cost(&node, environment);
            InformedSearchNode::new(node, estimate)
        })
        .collect();

    solver.solve(start_nodes, environment, heuristic, generator, manager);
}
