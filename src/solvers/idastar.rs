use super::{DepthFirstSolver, Solver};
use crate::manager::Manager;
use crate::search_space::{Heuristic, InformedSearchNode, SearchNode, SearchNodeGenerator};
use log::debug;
use std::cmp;

/// Iterative deepening A* (IDA*).
///
/// IDA* runs depth-first search repeatedly, each pass limited to the nodes whose estimated total cost is within
/// a bound. The next pass raises the bound to the cheapest estimate left out by the previous one, so with an
/// admissible heuristic the first goal confirmed is optimal.
///
/// Only the current path is kept in memory, at the price of revisiting nodes in every pass. The number of passes
/// grows with the number of distinct estimated total costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdaStarSolver;

impl IdaStarSolver {
    pub fn new() -> Self {
        Self
    }
}

/// Admits nodes up to a maximum cost and remembers the cheapest node it rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CostBoundedFilter<C> {
    /// `None` rejects every node.
    max_allowed: Option<C>,
    min_filtered: Option<C>,
}

impl<C: Copy + Ord> CostBoundedFilter<C> {
    fn new(max_allowed: Option<C>) -> Self {
        Self {
            max_allowed,
            min_filtered: None,
        }
    }

    fn accepts(&mut self, cost: C) -> bool {
        if self.max_allowed.is_some_and(|max| cost <= max) {
            return true;
        }

        self.min_filtered = Some(self.min_filtered.map_or(cost, |min| cmp::min(min, cost)));

        false
    }

    #[inline]
    fn min_filtered_cost(&self) -> Option<C> {
        self.min_filtered
    }

    #[inline]
    fn filtered_any(&self) -> bool {
        self.min_filtered.is_some()
    }
}

struct CostBoundedGenerator<'a, G, C> {
    inner: &'a mut G,
    filter: &'a mut CostBoundedFilter<C>,
}

impl<N, E, G> SearchNodeGenerator<N, E> for CostBoundedGenerator<'_, G, N::Cost>
where
    N: SearchNode,
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
        let mut successors = self
            .inner
            .generate_successor_nodes(node, environment, heuristic);
        successors.retain(|successor| self.filter.accepts(successor.estimated_total_cost()));

        successors
    }
}

impl<N, E> Solver<N, E> for IdaStarSolver
where
    N: SearchNode + Clone,
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
        let solver = DepthFirstSolver::new();
        let mut max_allowed = None;
        let mut passes = 0;

        while manager.continue_search() {
            let mut filter = CostBoundedFilter::new(max_allowed);
            let admitted = start_nodes
                .iter()
                .filter(|node| filter.accepts(node.estimated_total_cost()))
                .cloned()
                .collect();
            let mut generator = CostBoundedGenerator {
                inner: &mut *generator,
                filter: &mut filter,
            };

            solver.solve(admitted, environment, heuristic, &mut generator, manager);
            passes += 1;

            if !filter.filtered_any() {
                debug!("IDA* exhausted the search space after {passes} passes");
                break;
            }

            match filter.min_filtered_cost() {
                Some(next) if next <= manager.cost_bound() => {
                    debug!("IDA* pass {passes} done, next bound: {next:?}");
                    max_allowed = Some(next);
                }
                _ => {
                    debug!("IDA* stopped after {passes} passes, next bound exceeds the cost bound");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::FloatCost;
    use crate::testing::*;

    #[test]
    fn test_basic_scenarios() {
        check_basic_scenarios(&IdaStarSolver::new());
    }

    #[test]
    fn test_cost_bounded_filter() {
        let mut filter = CostBoundedFilter::new(Some(10));

        for cost in [0, 5, -5, 10] {
            assert!(filter.accepts(cost));
        }
        assert!(!filter.filtered_any());

        assert!(!filter.accepts(20));
        assert_eq!(filter.min_filtered_cost(), Some(20));

        for cost in [15, 100, 12, 16] {
            assert!(!filter.accepts(cost));
        }
        assert!(filter.filtered_any());
        assert_eq!(filter.min_filtered_cost(), Some(12));
    }

    #[test]
    fn test_unbounded_filter_admits_nothing() {
        let mut filter = CostBoundedFilter::new(None);

        assert!(!filter.accepts(i32::MIN));
        assert_eq!(filter.min_filtered_cost(), Some(i32::MIN));
    }

    #[test]
    fn test_expansion_order() {
        let a = node("a", 0.0, 0.0, false);
        let b = node("b", 0.0, 0.0, false);
        let c = node("c", 1.0, 0.0, false);
        let d = node("d", 0.0, 1.0, false);
        let e = node("e", 0.0, 1.0, false);
        let f = node("f", 2.0, 0.0, false);
        let g = node("g", 0.0, 2.0, false);
        let h = node("h", 1.0, 1.0, false);
        let i = node("i", 1.0, 1.0, false);
        let j = node("j", 1.0, 2.0, false);
        let k = node("k", 3.0, 0.0, true);
        let l = node("l", 4.0, 0.0, true);
        let mut generator = DummyGenerator::default();
        generator.add(&a, &[&f, &c]);
        generator.add(&b, &[&d, &e]);
        generator.add(&f, &[&j]);
        generator.add(&j, &[&l]);
        generator.add(&d, &[&g, &k]);
        generator.add(&e, &[&h, &i]);

        let result = run(&IdaStarSolver::new(), generator, &[&a, &b]);

        #[rustfmt::skip]
        let expected = vec![
            "a", "b",
            "a", "c", "b", "d", "e",
            "a", "f", "c", "b", "d", "g", "e", "h", "i",
            "a", "f", "j", "c", "b", "d", "g", "k", "e", "h", "i",
        ];
        assert_eq!(result.expanded, expected);
        assert_eq!(result.solution(), Some(("k", true)));
    }

    #[test]
    fn test_infinite_costs() {
        let a = node("a", 0.0, 0.0, false);
        let b = node("b", f64::NEG_INFINITY, 0.0, false);
        let c = node("c", f64::INFINITY, 0.0, false);
        let d = node("d", -10.0, 0.0, false);
        let e = node("e", 10.0, 0.0, false);
        let f = node("f", -5.0, 0.0, false);
        let g = node("g", 5.0, 0.0, false);
        let mut generator = DummyGenerator::default();
        generator.add(&b, &[&d, &e]);
        generator.add(&d, &[&f]);
        generator.add(&e, &[&g]);

        let result = run_with_bound(&IdaStarSolver::new(), generator, &[&a, &b, &c], FloatCost::INFINITY);

        #[rustfmt::skip]
        let expected = vec![
            "b",
            "b", "d",
            "b", "d", "f",
            "a", "b", "d", "f",
            "a", "b", "d", "f", "e", "g",
            "a", "b", "d", "f", "e", "g", "c",
        ];
        assert_eq!(result.expanded, expected);
        assert_eq!(result.solution(), None);
    }

    #[test]
    fn test_cheapest_goal_is_optimal() {
        let a = node("a", 0.0, 0.0, false);
        let b = node("b", 0.0, 0.0, false);
        let c = node("c", 1.0, 0.0, true);
        let d = node("d", 2.0, 0.0, true);
        let mut generator = DummyGenerator::default();
        generator.add(&b, &[&c]);

        let result = run(&IdaStarSolver::new(), generator, &[&a, &b, &d]);

        assert_eq!(result.solution(), Some(("c", true)));
    }
}
