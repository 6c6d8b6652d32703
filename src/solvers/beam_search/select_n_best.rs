use super::{GenerationSelection, ParentSelector};
use crate::error::SearchError;
use crate::search_space::{InformedSearchNode, SearchNode};
use itertools::Itertools;

/// Selects the `n` nodes with the lowest estimated total cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectNBest {
    n: usize,
}

impl SelectNBest {
    /// Creates a selector keeping `n` nodes per generation.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidParameter`] if `n` is zero.
    pub fn new(n: usize) -> Result<Self, SearchError> {
        Ok(Self {
            n: SearchError::positive("n", n)?,
        })
    }

    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }
}

impl<N, E> ParentSelector<N, E> for SelectNBest
where
    N: SearchNode,
    E: ?Sized,
{
    fn select_nodes_to_expand(
        &self,
        nodes: Vec<InformedSearchNode<N>>,
        _: &E,
    ) -> GenerationSelection<N> {
        let mut selected = nodes
            .into_iter()
            .k_smallest_by(self.n + 1, |a, b| {
                a.estimated_total_cost().cmp(&b.estimated_total_cost())
            })
            .collect::<Vec<_>>();
        let best_pruned = if selected.len() > self.n {
            selected.pop()
        } else {
            None
        };

        GenerationSelection {
            selected,
            best_pruned,
        }
    }
}
