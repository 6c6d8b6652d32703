use crate::cost::Cost;
use num_traits::Zero;
use std::hash::Hash;

/// Trait for search nodes.
///
/// A search node represents a path from a start node through the state space, together with its exact cost.
/// Solvers never modify search nodes; new nodes are created by a [`SearchNodeGenerator`].
///
/// # Examples
///
/// ```
/// use statespace_search::prelude::*;
///
/// #[derive(Debug, Clone)]
/// struct Route {
///     city: usize,
///     distance: u32,
/// }
///
/// impl SearchNode for Route {
///     type Cost = u32;
///
///     fn is_goal(&self) -> bool {
///         self.city == 3
///     }
///
///     fn cost(&self) -> Self::Cost {
///         self.distance
///     }
/// }
///
/// struct RoadMap {
///     roads: Vec<Vec<(usize, u32)>>,
/// }
///
/// struct Roads;
///
/// impl SearchNodeGenerator<Route, RoadMap> for Roads {
///     fn generate_successor_nodes<H>(
///         &mut self,
///         node: &Route,
///         map: &RoadMap,
///         heuristic: &H,
///     ) -> Vec<InformedSearchNode<Route>>
///     where
///         H: Heuristic<Route, RoadMap> + ?Sized,
///     {
///         map.roads[node.city]
///             .iter()
///             .map(|&(city, length)| {
///                 let successor = Route {
///                     city,
///                     distance: node.distance + length,
///                 };
///                 let estimate = heuristic.estimate_remaining_cost(&successor, map);
///
///                 InformedSearchNode::new(successor, estimate)
///             })
///             .collect()
///     }
/// }
///
/// let map = RoadMap {
///     roads: vec![vec![(1, 4), (2, 1)], vec![(3, 1)], vec![(1, 2), (3, 6)], vec![]],
/// };
/// let start = Route { city: 0, distance: 0 };
/// let mut manager = BasicManager::new(u32::MAX);
///
/// solve(&AStarSolver::new(), &mut manager, &mut Roads, &ZeroHeuristic, &map, [start]);
///
/// let solution = manager.solution().unwrap();
/// assert_eq!(solution.node.distance, 4);
/// assert!(solution.is_optimal);
/// ```
pub trait SearchNode {
    /// Type of the cost.
    type Cost: Cost;

    /// Returns whether the node is a goal.
    fn is_goal(&self) -> bool;

    /// Returns the exact cost of the path from a start node to this node.
    fn cost(&self) -> Self::Cost;
}

/// Search node exposing the identity of the state it reached.
///
/// Two nodes with the same search space state represent the same configuration reached by different paths,
/// so the costlier one can be discarded.
pub trait StateSearchNode: SearchNode {
    /// Type of the search space state. It should be lightweight.
    type State: Hash + Eq;

    /// Returns the search space state.
    fn search_space_state(&self) -> Self::State;
}

/// Search node knowing its depth in the search tree.
pub trait DepthSearchNode: SearchNode {
    /// Returns the number of transitions from a start node. Start nodes usually have depth 0.
    fn depth(&self) -> usize;
}

/// Search node annotated with an estimate of the cost remaining to reach a goal.
#[derive(Debug, Clone, PartialEq)]
pub struct InformedSearchNode<N: SearchNode> {
    node: N,
    estimated_remaining_cost: N::Cost,
    estimated_total_cost: N::Cost,
}

impl<N: SearchNode> InformedSearchNode<N> {
    /// Creates a new informed node.
    pub fn new(node: N, estimated_remaining_cost: N::Cost) -> Self {
        let estimated_total_cost = node.cost() + estimated_remaining_cost;

        Self {
            node,
            estimated_remaining_cost,
            estimated_total_cost,
        }
    }

    /// Returns the search node.
    #[inline]
    pub fn node(&self) -> &N {
        &self.node
    }

    /// Returns the search node, consuming the annotation.
    #[inline]
    pub fn into_node(self) -> N {
        self.node
    }

    #[inline]
    pub fn estimated_remaining_cost(&self) -> N::Cost {
        self.estimated_remaining_cost
    }

    /// Returns the cost of the node plus the estimated remaining cost.
    #[inline]
    pub fn estimated_total_cost(&self) -> N::Cost {
        self.estimated_total_cost
    }
}

/// Trait for heuristics estimating the cost from a node to the cheapest goal.
///
/// A heuristic is admissible if it never overestimates this cost.
/// Solvers claiming optimality assume admissibility; with an inadmissible heuristic they still return solutions,
/// which may be suboptimal.
///
/// Any closure `Fn(&N, &E) -> N::Cost` is a heuristic.
pub trait Heuristic<N: SearchNode, E: ?Sized> {
    /// Estimates the cost remaining from `node` to a goal.
    fn estimate_remaining_cost(&self, node: &N, environment: &E) -> N::Cost;
}

impl<N, E, F> Heuristic<N, E> for F
where
    N: SearchNode,
    E: ?Sized,
    F: Fn(&N, &E) -> N::Cost,
{
    #[inline]
    fn estimate_remaining_cost(&self, node: &N, environment: &E) -> N::Cost {
        self(node, environment)
    }
}

/// Heuristic that always estimates zero, which turns informed solvers into uninformed ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZeroHeuristic;

impl<N, E> Heuristic<N, E> for ZeroHeuristic
where
    N: SearchNode,
    E: ?Sized,
{
    #[inline]
    fn estimate_remaining_cost(&self, _: &N, _: &E) -> N::Cost {
        N::Cost::zero()
    }
}

/// Trait for generating the successors of search nodes.
///
/// Depth-first search and RBFS visit successors in the returned order.
pub trait SearchNodeGenerator<N: SearchNode, E: ?Sized> {
    /// Generates the successors of `node`, each annotated by `heuristic`.
    fn generate_successor_nodes<H>(
        &mut self,
        node: &N,
        environment: &E,
        heuristic: &H,
    ) -> Vec<InformedSearchNode<N>>
    where
        H: Heuristic<N, E> + ?Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct MockNode {
        position: i32,
        cost: i32,
    }

    impl SearchNode for MockNode {
        type Cost = i32;

        fn is_goal(&self) -> bool {
            self.position == 0
        }

        fn cost(&self) -> Self::Cost {
            self.cost
        }
    }

    impl StateSearchNode for MockNode {
        type State = i32;

        fn search_space_state(&self) -> Self::State {
            self.position
        }
    }

    struct MockGenerator;

    impl SearchNodeGenerator<MockNode, i32> for MockGenerator {
        fn generate_successor_nodes<H>(
            &mut self,
            node: &MockNode,
            step: &i32,
            heuristic: &H,
        ) -> Vec<InformedSearchNode<MockNode>>
        where
            H: Heuristic<MockNode, i32> + ?Sized,
        {
            [node.position - step, node.position + step]
                .into_iter()
                .map(|position| {
                    let successor = MockNode {
                        position,
                        cost: node.cost + 1,
                    };
                    let estimate = heuristic.estimate_remaining_cost(&successor, step);

                    InformedSearchNode::new(successor, estimate)
                })
                .collect()
        }
    }

    #[test]
    fn test_informed_node() {
        let node = InformedSearchNode::new(MockNode { position: 3, cost: 4 }, 6);

        assert_eq!(node.node(), &MockNode { position: 3, cost: 4 });
        assert_eq!(node.estimated_remaining_cost(), 6);
        assert_eq!(node.estimated_total_cost(), 10);
        assert_eq!(node.into_node().search_space_state(), 3);
    }

    #[test]
    fn test_zero_heuristic() {
        let node = MockNode { position: 5, cost: 2 };

        assert_eq!(ZeroHeuristic.estimate_remaining_cost(&node, &1), 0);
    }

    #[test]
    fn test_closure_heuristic() {
        let distance = |node: &MockNode, step: &i32| node.position.abs() / step;
        let node = MockNode { position: -6, cost: 0 };

        assert_eq!(distance.estimate_remaining_cost(&node, &2), 3);
    }

    #[test]
    fn test_generator_annotates_successors() {
        let distance = |node: &MockNode, _: &i32| node.position.abs();
        let node = MockNode { position: 2, cost: 1 };

        let successors = MockGenerator.generate_successor_nodes(&node, &3, &distance);

        assert_eq!(successors.len(), 2);
        assert_eq!(successors[0].node(), &MockNode { position: -1, cost: 2 });
        assert_eq!(successors[0].estimated_total_cost(), 3);
        assert_eq!(successors[1].node(), &MockNode { position: 5, cost: 2 });
        assert_eq!(successors[1].estimated_total_cost(), 7);
        assert!(!successors[0].node().is_goal());
    }
}
