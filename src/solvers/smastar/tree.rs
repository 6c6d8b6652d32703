use super::BoundedCost;
use crate::search_space::{InformedSearchNode, SearchNode};
use smallvec::SmallVec;
use std::cmp;

pub(super) type NodeId = usize;

/// Virtual root whose successors are the start nodes.
pub(super) const ROOT: NodeId = 0;

/// Node of the in-memory search tree.
///
/// The search node itself is stored in the successor list of the parent.
#[derive(Debug)]
pub(super) struct SmaNode<N: SearchNode> {
    /// Parent and index in the successor list of the parent.
    pub parent: Option<(NodeId, usize)>,
    pub depth: usize,
    pub cost: BoundedCost<N::Cost>,
    /// Generated once, on the first expansion.
    pub successors: Option<Vec<InformedSearchNode<N>>>,
    /// Index of the next successor to bring into memory.
    pub cursor: usize,
    pub pruned_in_iteration: bool,
    pub cheapest_purged_in_iteration: BoundedCost<N::Cost>,
    /// Resident children with their index in the successor list.
    pub children_in_memory: SmallVec<[(usize, NodeId); 4]>,
    /// Cost of each successor when it last left memory, by index. Missing entries were never evicted.
    forgotten_costs: Vec<BoundedCost<N::Cost>>,
}

impl<N: SearchNode> SmaNode<N> {
    fn new(parent: Option<(NodeId, usize)>, depth: usize, cost: BoundedCost<N::Cost>) -> Self {
        Self {
            parent,
            depth,
            cost,
            successors: None,
            cursor: 0,
            pruned_in_iteration: false,
            cheapest_purged_in_iteration: BoundedCost::Max,
            children_in_memory: SmallVec::new(),
            forgotten_costs: Vec::new(),
        }
    }

    /// Returns the cost the successor at `index` had when it was last evicted, or `Min`.
    #[inline]
    pub fn forgotten_cost(&self, index: usize) -> BoundedCost<N::Cost> {
        self.forgotten_costs
            .get(index)
            .copied()
            .unwrap_or(BoundedCost::Min)
    }

    /// Returns whether the cursor has successors left, or the successors are still unknown.
    pub fn has_next_successor(&self) -> bool {
        self.successors
            .as_ref()
            .is_none_or(|successors| self.cursor < successors.len())
    }

    /// Returns whether the node can still bring a child into memory.
    pub fn should_be_on_frontier(&self) -> bool {
        self.has_next_successor() || self.pruned_in_iteration
    }

    /// Starts a new pass over the successors.
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.cheapest_purged_in_iteration = BoundedCost::Max;
        self.pruned_in_iteration = false;
    }
}

/// Arena holding the part of the search tree that is in memory.
#[derive(Debug)]
pub(super) struct SmaTree<N: SearchNode> {
    nodes: Vec<Option<SmaNode<N>>>,
    vacant: Vec<NodeId>,
}

impl<N: SearchNode> SmaTree<N> {
    pub fn new(start_nodes: Vec<InformedSearchNode<N>>) -> Self {
        let mut root = SmaNode::new(None, 0, BoundedCost::Min);
        root.successors = Some(start_nodes);

        Self {
            nodes: vec![Some(root)],
            vacant: Vec::new(),
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SmaNode<N> {
        match &self.nodes[id] {
            Some(node) => node,
            None => unreachable!("node {id} is not in memory"),
        }
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut SmaNode<N> {
        match &mut self.nodes[id] {
            Some(node) => node,
            None => unreachable!("node {id} is not in memory"),
        }
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent.map(|(parent, _)| parent)
    }

    /// Returns the search node, or `None` for the root.
    pub fn search_node(&self, id: NodeId) -> Option<&N> {
        let (parent, index) = self.node(id).parent?;

        self.node(parent)
            .successors
            .as_ref()
            .and_then(|successors| successors.get(index))
            .map(InformedSearchNode::node)
    }

    pub fn is_goal(&self, id: NodeId) -> bool {
        self.search_node(id).is_some_and(SearchNode::is_goal)
    }

    /// Moves the search node out of the tree, leaving the successors of its parent unusable.
    pub fn take_search_node(&mut self, id: NodeId) -> Option<N> {
        let (parent, index) = self.node(id).parent?;

        self.node_mut(parent)
            .successors
            .take()
            .and_then(|successors| successors.into_iter().nth(index))
            .map(InformedSearchNode::into_node)
    }

    /// Brings the successor at `index` of `parent` into memory.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, cost: BoundedCost<N::Cost>) -> NodeId {
        let depth = self.node(parent).depth + 1;
        let child = SmaNode::new(Some((parent, index)), depth, cost);
        let id = match self.vacant.pop() {
            Some(id) => {
                self.nodes[id] = Some(child);
                id
            }
            None => {
                self.nodes.push(Some(child));
                self.nodes.len() - 1
            }
        };

        self.node_mut(parent).children_in_memory.push((index, id));

        id
    }

    /// Forgets a child without resident children, remembering its cost in the parent.
    ///
    /// The cost is kept per successor across passes, so a regenerated child never starts below it.
    pub fn remove_child_from_memory(&mut self, parent: NodeId, child: NodeId) {
        let child_node = self.node(child);
        let cost = child_node.cost;
        let index = child_node.parent.map_or(0, |(_, index)| index);
        let node = self.node_mut(parent);
        node.children_in_memory.retain(|&mut (_, id)| id != child);
        node.pruned_in_iteration = true;
        node.cheapest_purged_in_iteration = cmp::min(node.cheapest_purged_in_iteration, cost);

        if node.forgotten_costs.len() <= index {
            node.forgotten_costs.resize(index + 1, BoundedCost::Min);
        }
        node.forgotten_costs[index] = cmp::max(node.forgotten_costs[index], cost);

        self.nodes[child] = None;
        self.vacant.push(child);
    }
}
