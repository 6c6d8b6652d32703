//! Utilities for developing and debugging search problems.

use crate::search_space::{Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator};
use log::trace;
use std::fmt;
use std::marker::PhantomData;

/// Generator decorator recording every node it expands, in expansion order.
///
/// Useful to inspect how a solver traverses a search space.
pub struct LoggingGenerator<G, N> {
    inner: G,
    expanded_nodes: Vec<N>,
    _phantom: PhantomData<fn(&N)>,
}

impl<G, N> LoggingGenerator<G, N> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            expanded_nodes: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Returns the nodes expanded so far, oldest first.
    #[inline]
    pub fn expanded_nodes(&self) -> &[N] {
        &self.expanded_nodes
    }

    #[inline]
    pub fn inner(&self) -> &G {
        &self.inner
    }

    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<G: fmt::Debug, N: fmt::Debug> fmt::Debug for LoggingGenerator<G, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingGenerator")
            .field("inner", &self.inner)
            .field("expanded_nodes", &self.expanded_nodes)
            .finish()
    }
}

impl<N, E, G> SearchNodeGenerator<N, E> for LoggingGenerator<G, N>
where
    N: SearchNode + Clone + fmt::Debug,
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
        trace!("Expanding {:?}", node);
        self.expanded_nodes.push(node.clone());

        self.inner
            .generate_successor_nodes(node, environment, heuristic)
    }
}
