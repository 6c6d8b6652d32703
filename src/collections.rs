//! Data structures backing the solvers.

mod fibonacci_heap;
mod path_listing;

pub use fibonacci_heap::{FibonacciHeap, Handle, HeapError};
pub use path_listing::PathListing;
