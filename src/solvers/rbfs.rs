use super::{Solver, Statistics};
use crate::manager::{Manager, Solution};
use crate::search_space::{Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator};
use log::{debug, trace};
use std::cmp;

/// Recursive best-first search (RBFS).
///
/// RBFS expands nodes in roughly the same order as A*, but only keeps the siblings along the current path in
/// memory. Each level of the path is allowed to grow until its best node becomes costlier than the best
/// alternative at a higher level; the level is then abandoned and its cost remembered by its parent, so the
/// subtree can be regenerated later if it becomes the best option again.
///
/// The recursion is unrolled into an explicit stack of levels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RbfsSolver;

impl RbfsSolver {
    pub fn new() -> Self {
        Self
    }
}

struct RbfsNode<N: SearchNode> {
    node: InformedSearchNode<N>,
    /// Lower bound on the cost of any solution through this node.
    cost: N::Cost,
    /// False once the subtree is known to hold no goal.
    may_lead_to_solution: bool,
}

struct Level<N: SearchNode> {
    cutoff: N::Cost,
    nodes: Vec<RbfsNode<N>>,
}

impl<N: SearchNode> Level<N> {
    /// Sorts the nodes on lower bound, nodes without solution last.
    fn sort(&mut self) {
        self.nodes.sort_by(|a, b| {
            b.may_lead_to_solution
                .cmp(&a.may_lead_to_solution)
                .then_with(|| a.cost.cmp(&b.cost))
        });
    }
}

impl<N, E> Solver<N, E> for RbfsSolver
where
    N: SearchNode,
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
        let mut statistics = Statistics::default();
        let nodes = start_nodes
            .into_iter()
            .map(|node| RbfsNode {
                cost: node.estimated_total_cost(),
                node,
                may_lead_to_solution: true,
            })
            .collect();
        let mut levels = vec![Level {
            cutoff: manager.cost_bound(),
            nodes,
        }];

        while manager.continue_search() {
            let depth = levels.len();
            let Some(level) = levels.last_mut() else {
                break;
            };

            level.sort();
            level.cutoff = cmp::min(level.cutoff, manager.cost_bound());

            let Some(best) = level.nodes.first() else {
                break;
            };

            if best.cost > level.cutoff || !best.may_lead_to_solution {
                let (cost, may_lead_to_solution) = (best.cost, best.may_lead_to_solution);
                levels.pop();

                // the parent level keeps the node it expanded in front
                match levels.last_mut().and_then(|parent| parent.nodes.first_mut()) {
                    Some(parent) => {
                        parent.cost = cost;
                        parent.may_lead_to_solution = may_lead_to_solution;
                    }
                    None => break,
                }

                continue;
            }

            if best.node.node().is_goal() {
                let best = level.nodes.swap_remove(0);
                manager.register_solution(Solution::new(best.node.into_node(), true));
                break;
            }

            trace!("Expanding node with bound {:?} at depth {}", best.cost, depth);
            let parent_cost = best.cost;
            let successors =
                generator.generate_successor_nodes(best.node.node(), environment, heuristic);
            statistics.record_expansion(successors.len());

            if successors.is_empty() {
                level.nodes[0].may_lead_to_solution = false;
                continue;
            }

            let cutoff = match level.nodes.get(1) {
                Some(second) if second.may_lead_to_solution => cmp::min(level.cutoff, second.cost),
                _ => level.cutoff,
            };
            let nodes = successors
                .into_iter()
                .map(|node| RbfsNode {
                    cost: cmp::max(node.estimated_total_cost(), parent_cost),
                    node,
                    may_lead_to_solution: true,
                })
                .collect();

            levels.push(Level { cutoff, nodes });
        }

        debug!(
            "RBFS finished, expanded: {expanded}, generated: {generated}",
            expanded = statistics.expanded,
            generated = statistics.generated,
        );
    }
}
