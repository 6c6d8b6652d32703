pub mod collections;
pub mod cost;
pub mod dev;
mod error;
pub mod manager;
pub mod search_space;
pub mod solvers;
#[cfg(test)]
mod testing;
pub mod timer;

pub use error::SearchError;

pub mod prelude {
    pub use super::collections::{FibonacciHeap, PathListing};
    pub use super::cost::{Cost, FloatCost};
    pub use super::manager::{
        BasicManager, InterruptibleManager, Manager, Solution, TimeLimitManager,
    };
    pub use super::search_space::{
        DepthSearchNode, Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator,
        StateSearchNode, ZeroHeuristic,
    };
    pub use super::solvers::{
        solve, AStarSolver, AStarStateSolver, BeamSearchSolver, DepthFirstSolver,
        GenerationSelection, IdaStarSolver, IterativeDeepeningSolver, ParentSelector, RbfsSolver,
        SelectNBest, SelectUniqueNBest, SmaStarSolver, Solver,
    };
    pub use super::SearchError;
}
