mod frontier;
mod tree;

use super::{Solver, Statistics};
use crate::error::SearchError;
use crate::manager::{Manager, Solution};
use crate::search_space::{Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator};
use frontier::SmaStarFrontier;
use log::{debug, trace, warn};
use std::cmp;
use tree::{NodeId, SmaTree, ROOT};

/// Cost extended with a bottom and a top element.
///
/// `Max` marks nodes whose subtree cannot be searched within the memory limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum BoundedCost<C> {
    Min,
    Value(C),
    Max,
}

/// Simplified memory-bounded A* (SMA*).
///
/// SMA* behaves like A* until the number of nodes in memory reaches the limit.
/// From then on, bringing a new node into memory evicts the shallowest of the most expensive leaves;
/// its parent remembers the cost of the forgotten subtree and regenerates it when it becomes
/// the most promising option again.
///
/// Nodes at a depth of at least the limit cannot be part of a path kept in memory.
/// Unless they are goals, they are never expanded, and a goal found while such a node was cheaper
/// is reported as non-optimal.
/// With too little memory the search may end without any solution.
///
/// Successors are generated once per expansion and kept until the node leaves memory.
/// A successor equal to one already in memory under the same parent is not brought in a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaStarSolver {
    max_nodes: usize,
}

impl SmaStarSolver {
    /// Creates a solver keeping at most `max_nodes` search nodes in memory.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidParameter`] if `max_nodes` is zero.
    pub fn new(max_nodes: usize) -> Result<Self, SearchError> {
        Ok(Self {
            max_nodes: SearchError::positive("max_nodes", max_nodes)?,
        })
    }

    #[inline]
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }
}

/// State of a single run.
struct SmaSearch<N: SearchNode> {
    tree: SmaTree<N>,
    frontier: SmaStarFrontier<NodeId, N::Cost>,
    /// Cheapest estimate of a node that was dropped for lying too deep.
    minimum_boundary_cost: BoundedCost<N::Cost>,
    max_nodes: usize,
}

impl<N: SearchNode + PartialEq> SmaSearch<N> {
    fn new(start_nodes: Vec<InformedSearchNode<N>>, max_nodes: usize) -> Self {
        let mut frontier = SmaStarFrontier::new();
        frontier.add(ROOT, BoundedCost::Min, 0);

        Self {
            tree: SmaTree::new(start_nodes),
            frontier,
            minimum_boundary_cost: BoundedCost::Max,
            max_nodes,
        }
    }

    fn add_to_frontier(&mut self, id: NodeId) {
        let node = self.tree.node(id);
        self.frontier.add(id, node.cost, node.depth);
    }

    fn remove_from_frontier(&mut self, id: NodeId) -> bool {
        let node = self.tree.node(id);
        self.frontier.remove(id, node.cost, node.depth)
    }

    /// Brings the next successor of `id` that is not yet in memory into memory.
    ///
    /// Starts a new pass over the successors if the current one is exhausted and a child was evicted during it.
    /// A regenerated child starts at no less than the cost it had when it was evicted.
    fn generate_child(&mut self, id: NodeId) -> Option<NodeId> {
        loop {
            let mut child = None;

            while child.is_none() {
                let node = self.tree.node(id);
                let index = node.cursor;
                let Some(successors) = node.successors.as_ref() else {
                    break;
                };
                let Some(successor) = successors.get(index) else {
                    break;
                };
                // equal successors share one slot in memory
                let is_resident = node
                    .children_in_memory
                    .iter()
                    .any(|&(i, _)| successors[i].node() == successor.node());
                let depth = node.depth + 1;
                let estimate = BoundedCost::Value(successor.estimated_total_cost());
                let is_goal = successor.node().is_goal();
                let parent_cost = node.cost;
                let forgotten_cost = node.forgotten_cost(index);

                self.tree.node_mut(id).cursor += 1;

                if is_resident {
                    continue;
                }

                let cost = if depth >= self.max_nodes && !is_goal {
                    self.minimum_boundary_cost = cmp::min(self.minimum_boundary_cost, estimate);
                    BoundedCost::Max
                } else {
                    cmp::max(cmp::max(estimate, parent_cost), forgotten_cost)
                };

                child = Some(self.tree.insert_child(id, index, cost));
            }

            if !self.tree.node(id).has_next_successor() {
                self.propagate_cost_estimates(id);
            }

            if child.is_some() || !self.tree.node(id).pruned_in_iteration {
                return child;
            }

            self.tree.node_mut(id).reset_cursor();
        }
    }

    /// Updates the cost of each ancestor to the cheapest of its resident children and purged subtrees.
    fn propagate_cost_estimates(&mut self, id: NodeId) {
        let mut current = Some(id);

        while let Some(id) = current {
            let node = self.tree.node(id);

            if node.has_next_successor() {
                return;
            }

            let cost = node
                .children_in_memory
                .iter()
                .map(|&(_, child)| self.tree.node(child).cost)
                .fold(node.cheapest_purged_in_iteration, cmp::min);

            if cost == node.cost {
                return;
            }

            let was_on_frontier = self.remove_from_frontier(id);
            self.tree.node_mut(id).cost = cost;

            if was_on_frontier {
                self.add_to_frontier(id);
            }

            current = self.tree.parent(id);
        }
    }

    /// Evicts the shallowest of the most expensive leaves.
    ///
    /// Returns `false` if there is no leaf to evict.
    fn purge_worst_node(&mut self) -> bool {
        let tree = &self.tree;
        let worst = self.frontier.remove_shallowest_highest_cost_leaf(|id| {
            id != ROOT && tree.node(id).children_in_memory.is_empty()
        });
        let Some((worst, parent)) = worst.and_then(|worst| Some((worst, self.tree.parent(worst)?)))
        else {
            warn!("No leaf to evict from the frontier");
            return false;
        };

        trace!("Evicting node with cost {:?}", self.tree.node(worst).cost);

        // the parent may now regenerate the evicted child
        if !self.tree.node(parent).should_be_on_frontier() {
            self.add_to_frontier(parent);
        }

        self.tree.remove_child_from_memory(parent, worst);

        true
    }
}

impl<N, E> Solver<N, E> for SmaStarSolver
where
    N: SearchNode + PartialEq,
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
        if start_nodes.is_empty() {
            return;
        }

        let mut statistics = Statistics::default();
        let mut search = SmaSearch::new(start_nodes, self.max_nodes);
        // excludes the root
        let mut nodes_in_memory = 0;

        while manager.continue_search() {
            let Some(cheapest) = search.frontier.deepest_least_cost() else {
                break;
            };
            let cost = search.tree.node(cheapest).cost;

            if cost > BoundedCost::Value(manager.cost_bound()) || cost == BoundedCost::Max {
                break;
            }

            if search.tree.is_goal(cheapest) {
                let is_optimal = cost <= search.minimum_boundary_cost;

                if let Some(node) = search.tree.take_search_node(cheapest) {
                    manager.register_solution(Solution::new(node, is_optimal));
                }

                break;
            }

            let mut has_children = true;

            if search.tree.node(cheapest).successors.is_none() {
                let successors = match search.tree.search_node(cheapest) {
                    Some(node) => generator.generate_successor_nodes(node, environment, heuristic),
                    None => Vec::new(),
                };
                trace!("Expanded node with cost {:?} into {} successors", cost, successors.len());
                statistics.record_expansion(successors.len());
                has_children = !successors.is_empty();
                search.tree.node_mut(cheapest).successors = Some(successors);
            }

            if has_children {
                let child = search.generate_child(cheapest);

                if !search.tree.node(cheapest).should_be_on_frontier() {
                    search.remove_from_frontier(cheapest);
                }

                if let Some(child) = child {
                    if nodes_in_memory < self.max_nodes || !search.purge_worst_node() {
                        nodes_in_memory += 1;
                    }

                    search.add_to_frontier(child);
                }
            } else {
                search.remove_from_frontier(cheapest);
                search.tree.node_mut(cheapest).cost = BoundedCost::Max;
                search.add_to_frontier(cheapest);
            }
        }

        debug!(
            "SMA* finished, expanded: {expanded}, generated: {generated}, in memory: {nodes_in_memory}",
            expanded = statistics.expanded,
            generated = statistics.generated,
        );
    }
}
