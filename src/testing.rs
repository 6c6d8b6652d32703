//! Shared fixtures for solver tests.

use crate::cost::FloatCost;
use crate::dev::LoggingGenerator;
use crate::manager::{BasicManager, Manager};
use crate::search_space::{
    DepthSearchNode, Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator,
    StateSearchNode,
};
use crate::solvers::{solve, Solver};
use rustc_hash::FxHashMap;

/// Named node with a fixed cost, heuristic estimate and goal flag.
#[derive(Debug, Clone, PartialEq)]
pub struct DummyNode {
    pub name: &'static str,
    pub cost: FloatCost,
    pub heuristic: FloatCost,
    pub goal: bool,
    pub state: &'static str,
    pub depth: usize,
}

/// Creates a node whose search space state is its own name.
pub fn node(name: &'static str, cost: f64, heuristic: f64, goal: bool) -> DummyNode {
    DummyNode {
        name,
        cost: FloatCost::new(cost).unwrap(),
        heuristic: FloatCost::new(heuristic).unwrap(),
        goal,
        state: name,
        depth: 0,
    }
}

impl DummyNode {
    pub fn with_state(mut self, state: &'static str) -> Self {
        self.state = state;
        self
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn informed(&self) -> InformedSearchNode<Self> {
        InformedSearchNode::new(self.clone(), self.heuristic)
    }
}

impl SearchNode for DummyNode {
    type Cost = FloatCost;

    fn is_goal(&self) -> bool {
        self.goal
    }

    fn cost(&self) -> Self::Cost {
        self.cost
    }
}

impl StateSearchNode for DummyNode {
    type State = &'static str;

    fn search_space_state(&self) -> Self::State {
        self.state
    }
}

impl DepthSearchNode for DummyNode {
    fn depth(&self) -> usize {
        self.depth
    }
}

/// Heuristic returning the estimate stored in the node.
pub struct DummyHeuristic;

impl Heuristic<DummyNode, ()> for DummyHeuristic {
    fn estimate_remaining_cost(&self, node: &DummyNode, _: &()) -> FloatCost {
        node.heuristic
    }
}

/// Generator backed by a map from node names to successors.
#[derive(Debug, Default)]
pub struct DummyGenerator {
    successors: FxHashMap<&'static str, Vec<DummyNode>>,
}

impl DummyGenerator {
    pub fn add(&mut self, parent: &DummyNode, children: &[&DummyNode]) {
        self.successors
            .entry(parent.name)
            .or_default()
            .extend(children.iter().map(|&child| child.clone()));
    }
}

impl SearchNodeGenerator<DummyNode, ()> for DummyGenerator {
    fn generate_successor_nodes<H>(
        &mut self,
        node: &DummyNode,
        environment: &(),
        heuristic: &H,
    ) -> Vec<InformedSearchNode<DummyNode>>
    where
        H: Heuristic<DummyNode, ()> + ?Sized,
    {
        self.successors
            .get(node.name)
            .map(|children| {
                children
                    .iter()
                    .map(|child| {
                        let estimate = heuristic.estimate_remaining_cost(child, environment);
                        InformedSearchNode::new(child.clone(), estimate)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Result of a test run: the manager and the names of the expanded nodes in expansion order.
pub struct Run {
    pub manager: BasicManager<DummyNode>,
    pub expanded: Vec<&'static str>,
}

impl Run {
    /// Returns the name of the solution and whether it is optimal.
    pub fn solution(&self) -> Option<(&'static str, bool)> {
        self.manager
            .solution()
            .map(|solution| (solution.node.name, solution.is_optimal))
    }
}

pub fn run_with_bound<S>(
    solver: &S,
    generator: DummyGenerator,
    start_nodes: &[&DummyNode],
    cost_bound: FloatCost,
) -> Run
where
    S: Solver<DummyNode, ()>,
{
    let mut manager = BasicManager::new(cost_bound);
    let mut generator = LoggingGenerator::new(generator);

    solve(
        solver,
        &mut manager,
        &mut generator,
        &DummyHeuristic,
        &(),
        start_nodes.iter().map(|&node| node.clone()),
    );

    let expanded = generator
        .expanded_nodes()
        .iter()
        .map(|node| node.name)
        .collect();

    Run { manager, expanded }
}

pub fn run<S>(solver: &S, generator: DummyGenerator, start_nodes: &[&DummyNode]) -> Run
where
    S: Solver<DummyNode, ()>,
{
    run_with_bound(solver, generator, start_nodes, FloatCost::MAX)
}

/// Scenarios every complete solver must pass.
pub fn check_basic_scenarios<S>(solver: &S)
where
    S: Solver<DummyNode, ()>,
{
    // no start nodes
    let result = run(solver, DummyGenerator::default(), &[]);
    assert_eq!(result.solution(), None);
    assert!(result.expanded.is_empty());

    // no goal among start nodes without successors
    let a = node("a", 2.0, 0.0, false);
    let b = node("b", 1.0, 0.0, false);
    let c = node("c", 3.0, 0.0, false);
    let d = node("d", 4.0, 0.0, false);
    let result = run(solver, DummyGenerator::default(), &[&a, &b, &c, &d]);
    assert_eq!(result.solution(), None);

    // no goal among start nodes and their successors
    let e = node("e", 2.0, 0.0, false);
    let f = node("f", 5.0, 0.0, false);
    let mut generator = DummyGenerator::default();
    generator.add(&b, &[&e, &f]);
    let result = run(solver, generator, &[&a, &b, &c, &d]);
    assert_eq!(result.solution(), None);
    assert!(result.manager.continue_search());

    // goal among start nodes
    let c = node("c", 3.0, 0.0, true);
    let result = run(solver, DummyGenerator::default(), &[&a, &b, &c, &d]);
    assert_eq!(result.solution(), Some(("c", true)));

    // goal among successors
    let c = node("c", 3.0, 0.0, false);
    let d = node("d", 6.0, 0.0, false);
    let e = node("e", 3.0, 0.0, false);
    let f = node("f", 4.0, 0.0, true);
    let mut generator = DummyGenerator::default();
    generator.add(&b, &[&e, &f]);
    let result = run(solver, generator, &[&a, &b, &c, &d]);
    assert_eq!(result.solution(), Some(("f", true)));
}
