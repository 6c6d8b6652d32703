//! Managers controlling a search and collecting its solutions.

use crate::search_space::SearchNode;
use crate::timer::Timer;
use log::info;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Goal node found by a solver.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution<N> {
    /// The goal node.
    pub node: N,
    /// Whether the solver guarantees that no cheaper goal exists.
    pub is_optimal: bool,
}

impl<N: SearchNode> Solution<N> {
    pub fn new(node: N, is_optimal: bool) -> Self {
        Self { node, is_optimal }
    }

    /// Returns the cost of the goal node.
    #[inline]
    pub fn cost(&self) -> N::Cost {
        self.node.cost()
    }
}

/// Trait for handling the solutions found by a solver.
///
/// A manager provides the cost bound and the stop criterion of a search.
/// Solvers query both before every expansion, so a manager can stop a search or tighten its bound at any time.
pub trait Manager<N: SearchNode> {
    /// Returns whether the solver should continue searching.
    fn continue_search(&self) -> bool;

    /// Handles a (possibly intermediate) solution.
    fn register_solution(&mut self, solution: Solution<N>);

    /// Returns the bound: solutions costlier than this are of no interest.
    fn cost_bound(&self) -> N::Cost;
}

/// Manager for a single search, keeping the best solution.
///
/// The search continues until an optimal solution is registered.
/// Every accepted solution tightens the cost bound to its cost, which lets solvers prune more aggressively.
#[derive(Debug, Clone)]
pub struct BasicManager<N: SearchNode> {
    solution: Option<Solution<N>>,
    cost_bound: N::Cost,
}

impl<N: SearchNode> BasicManager<N> {
    /// Creates a manager with the given initial cost bound.
    ///
    /// Use the maximum value of the cost type (or an infinite cost) for an unbounded search.
    pub fn new(cost_bound: N::Cost) -> Self {
        Self {
            solution: None,
            cost_bound,
        }
    }

    /// Returns the best solution registered so far.
    #[inline]
    pub fn solution(&self) -> Option<&Solution<N>> {
        self.solution.as_ref()
    }

    /// Returns the best solution, consuming the manager.
    pub fn into_solution(self) -> Option<Solution<N>> {
        self.solution
    }
}

impl<N> Manager<N> for BasicManager<N>
where
    N: SearchNode,
{
    fn continue_search(&self) -> bool {
        self.solution
            .as_ref()
            .is_none_or(|solution| !solution.is_optimal)
    }

    fn register_solution(&mut self, solution: Solution<N>) {
        let cost = solution.cost();

        if cost > self.cost_bound {
            return;
        }

        let replaces = cost < self.cost_bound
            || self.solution.as_ref().is_none_or(|best| solution.is_optimal && !best.is_optimal);

        if replaces {
            info!(
                "New best solution with cost {:?} (optimal: {})",
                cost, solution.is_optimal
            );
            self.cost_bound = cost;
            self.solution = Some(solution);
        }
    }

    #[inline]
    fn cost_bound(&self) -> N::Cost {
        self.cost_bound
    }
}

/// Manager decorator stopping the search once a time limit is reached.
///
/// The time is measured from the construction of the manager.
#[derive(Debug, Clone)]
pub struct TimeLimitManager<M> {
    inner: M,
    timer: Timer,
}

impl<M> TimeLimitManager<M> {
    pub fn new(inner: M, time_limit: Duration) -> Self {
        Self {
            inner,
            timer: Timer::with_time_limit(time_limit),
        }
    }

    /// Returns whether the time limit is reached.
    pub fn is_time_limit_reached(&self) -> bool {
        self.timer.check_time_limit()
    }

    /// Returns the wrapped manager.
    #[inline]
    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<N, M> Manager<N> for TimeLimitManager<M>
where
    N: SearchNode,
    M: Manager<N>,
{
    fn continue_search(&self) -> bool {
        if self.timer.check_time_limit() {
            info!("Time limit reached after {:?}", self.timer.elapsed());

            return false;
        }

        self.inner.continue_search()
    }

    #[inline]
    fn register_solution(&mut self, solution: Solution<N>) {
        self.inner.register_solution(solution)
    }

    #[inline]
    fn cost_bound(&self) -> N::Cost {
        self.inner.cost_bound()
    }
}

/// Manager decorator stopping the search once a shared flag is raised, e.g., from another thread.
pub struct InterruptibleManager<'a, M> {
    inner: M,
    stop_flag: &'a AtomicBool,
}

impl<'a, M> InterruptibleManager<'a, M> {
    /// Creates a manager that stops the search when `stop_flag` becomes `true`.
    pub fn new(inner: M, stop_flag: &'a AtomicBool) -> Self {
        Self { inner, stop_flag }
    }

    #[inline]
    pub fn inner(&self) -> &M {
        &self.inner
    }

    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: fmt::Debug> fmt::Debug for InterruptibleManager<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterruptibleManager")
            .field("inner", &self.inner)
            .field("interrupted", &self.stop_flag.load(Ordering::Relaxed))
            .finish()
    }
}

impl<N, M> Manager<N> for InterruptibleManager<'_, M>
where
    N: SearchNode,
    M: Manager<N>,
{
    fn continue_search(&self) -> bool {
        if self.stop_flag.load(Ordering::Relaxed) {
            info!("Search interrupted");

            return false;
        }

        self.inner.continue_search()
    }

    #[inline]
    fn register_solution(&mut self, solution: Solution<N>) {
        self.inner.register_solution(solution)
    }

    #[inline]
    fn cost_bound(&self) -> N::Cost {
        self.inner.cost_bound()
    }
}
