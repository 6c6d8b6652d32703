use super::Solver;
use crate::error::SearchError;
use crate::manager::{Manager, Solution};
use crate::search_space::{
    DepthSearchNode, Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator,
};
use log::debug;
use std::cell::Cell;

/// Iterative deepening on top of another solver.
///
/// The wrapped solver is run repeatedly, each time on the part of the search space up to a maximum depth.
/// The depth limit grows after every pass, until a pass leaves no node out or the manager stops the search.
///
/// Start nodes are always searched, whatever their depth. An optimal solution reported by a pass that left
/// nodes out is passed on as non-optimal, since a cheaper goal may lie deeper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterativeDeepeningSolver<S> {
    solver: S,
    start_depth: usize,
    depth_delta: usize,
}

impl<S> IterativeDeepeningSolver<S> {
    /// Creates a solver whose first pass searches up to depth 1, growing by 1 per pass.
    pub fn new(solver: S) -> Self {
        Self {
            solver,
            start_depth: 1,
            depth_delta: 1,
        }
    }

    /// Creates a solver whose first pass searches up to `start_depth`, growing by `depth_delta` per pass.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidParameter`] if `depth_delta` is zero.
    pub fn with_depths(solver: S, start_depth: usize, depth_delta: usize) -> Result<Self, SearchError> {
        Ok(Self {
            solver,
            start_depth,
            depth_delta: SearchError::positive("depth_delta", depth_delta)?,
        })
    }

    #[inline]
    pub fn solver(&self) -> &S {
        &self.solver
    }
}

/// Generator decorator dropping successors deeper than a limit.
struct DepthLimitedGenerator<'a, G> {
    inner: &'a mut G,
    max_depth: usize,
    filtered_any: &'a Cell<bool>,
}

impl<N, E, G> SearchNodeGenerator<N, E> for DepthLimitedGenerator<'_, G>
where
    N: DepthSearchNode,
    E: ?Sized,
    G: SearchNodeGenerator<N, E>,
{
    fn generate_successor_nodes<H>(
        &mut self,
        node: &N,
        environment: &E,
        heuristic: &H,
    ) -> Vec<InformedSearchNode<N>>
    where
        H: Heuristic<N, E> + ?Sized,
    {
        let mut successors = self
            .inner
            .generate_successor_nodes(node, environment, heuristic);
        let generated = successors.len();
        successors.retain(|successor| successor.node().depth() <= self.max_depth);

        if successors.len() < generated {
            self.filtered_any.set(true);
        }

        successors
    }
}

/// Manager decorator for a single pass.
struct PassManager<'a, M: ?Sized> {
    inner: &'a mut M,
    filtered_any: &'a Cell<bool>,
}

impl<N, M> Manager<N> for PassManager<'_, M>
where
    N: SearchNode,
    M: Manager<N> + ?Sized,
{
    #[inline]
    fn continue_search(&self) -> bool {
        self.inner.continue_search()
    }

    fn register_solution(&mut self, mut solution: Solution<N>) {
        if self.filtered_any.get() {
            solution.is_optimal = false;
        }

        self.inner.register_solution(solution)
    }

    #[inline]
    fn cost_bound(&self) -> N::Cost {
        self.inner.cost_bound()
    }
}

impl<N, E, S> Solver<N, E> for IterativeDeepeningSolver<S>
where
    N: DepthSearchNode + Clone,
    E: ?Sized,
    S: Solver<N, E>,
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
        let mut max_depth = self.start_depth;

        while manager.continue_search() {
            let filtered_any = Cell::new(false);
            let mut generator = DepthLimitedGenerator {
                inner: &mut *generator,
                max_depth,
                filtered_any: &filtered_any,
            };
            let mut manager = PassManager {
                inner: &mut *manager,
                filtered_any: &filtered_any,
            };

            self.solver.solve(
                start_nodes.clone(),
                environment,
                heuristic,
                &mut generator,
                &mut manager,
            );

            if !filtered_any.get() {
                debug!("Search space fully examined at depth limit {max_depth}");
                break;
            }

            debug!("Depth limit {max_depth} reached, deepening by {}", self.depth_delta);
            max_depth = max_depth.saturating_add(self.depth_delta);
        }
    }
}
