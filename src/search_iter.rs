use common_macros::{hash_map, hash_set};
use log::trace;
use num::Integer;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Add;
use trait_set::trait_set;

use crate::Route;
use crate::error::{PlanError, Result};
use crate::graph::Graph;
use crate::point::GridPoint;

trait_set! {
    pub trait SearchNode = Clone + Hash + Eq + Debug;
}

pub struct BfsIter<T: SearchNode, S: FnMut(&T) -> Vec<T>> {
    queue: VecDeque<T>,
    seen: HashSet<T>,
    successor: S,
}

impl<T: SearchNode, S: FnMut(&T) -> Vec<T>> BfsIter<T, S> {
    pub fn new(start: T, successor: S) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back(start.clone());
        Self {
            queue,
            seen: hash_set!(start),
            successor,
        }
    }
}

impl<T: SearchNode, S: FnMut(&T) -> Vec<T>> Iterator for BfsIter<T, S> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front().inspect(|parent| {
            for child in (self.successor)(parent) {
                if self.seen.insert(child.clone()) {
                    self.queue.push_back(child);
                }
            }
        })
    }
}

fn path_back_from<T: SearchNode>(node: &T, parents: &HashMap<T, Option<T>>) -> VecDeque<T> {
    let mut result = VecDeque::new();
    let mut current = node;
    result.push_back(current.clone());
    while let Some(Some(parent)) = parents.get(current) {
        result.push_back(parent.clone());
        current = parent;
    }
    result
}

trait_set! {
    pub trait Estimator = Integer + Copy + Clone + Add<Output=Self> + PartialOrd + Ord + Debug + Default
}

/// Frontier priority: lowest `from_start + estimate_to_goal` first, and
/// among equal totals the earliest pushed.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
struct TotalEstimate<N: Estimator> {
    from_start: N,
    estimate_to_goal: N,
    sequence: u64,
}

impl<N: Estimator> TotalEstimate<N> {
    fn total(&self) -> N {
        self.from_start + self.estimate_to_goal
    }
}

impl<N: Estimator> Ord for TotalEstimate<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest, so both keys are reversed.
        other
            .total()
            .cmp(&self.total())
            .then(other.sequence.cmp(&self.sequence))
    }
}

impl<N: Estimator> PartialOrd for TotalEstimate<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

struct FrontierEntry<T, N: Estimator> {
    estimate: TotalEstimate<N>,
    node: T,
}

impl<T, N: Estimator> PartialEq for FrontierEntry<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.estimate == other.estimate
    }
}

impl<T, N: Estimator> Eq for FrontierEntry<T, N> {}

impl<T, N: Estimator> Ord for FrontierEntry<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.estimate.cmp(&other.estimate)
    }
}

impl<T, N: Estimator> PartialOrd for FrontierEntry<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search that yields each node once, at the moment it is finalized.
///
/// The frontier has no decrease-key: an improved cost pushes a fresh entry and
/// leaves the old one behind. When an entry surfaces for a node that is already
/// finalized it is discarded and counted in [`stale_pops`](Self::stale_pops).
pub struct PrioritySearchIter<
    N: Estimator,
    T: SearchNode,
    S: FnMut(&T) -> Vec<(T, N)>,
    H: Fn(&T) -> N,
> {
    queue: BinaryHeap<FrontierEntry<T, N>>,
    costs: HashMap<T, N>,
    parents: HashMap<T, Option<T>>,
    finalized: HashSet<T>,
    successor: S,
    heuristic: H,
    pushed: u64,
    stale_pops: usize,
}

impl<N: Estimator, T: SearchNode, S: FnMut(&T) -> Vec<(T, N)>, H: Fn(&T) -> N>
    PrioritySearchIter<N, T, S, H>
{
    pub fn a_star(start: T, successor: S, heuristic: H) -> Self {
        let mut result = Self {
            queue: BinaryHeap::new(),
            costs: hash_map!(start.clone() => N::zero()),
            parents: hash_map!(start.clone() => None),
            finalized: HashSet::new(),
            successor,
            heuristic,
            pushed: 0,
            stale_pops: 0,
        };
        result.push(start, N::zero());
        result
    }

    fn push(&mut self, node: T, from_start: N) {
        let estimate = TotalEstimate {
            from_start,
            estimate_to_goal: (self.heuristic)(&node),
            sequence: self.pushed,
        };
        self.pushed += 1;
        self.queue.push(FrontierEntry { estimate, node });
    }

    pub fn path_back_from(&self, node: &T) -> VecDeque<T> {
        path_back_from(node, &self.parents)
    }

    /// Start-to-`node` path along the best predecessors found so far.
    pub fn path_to(&self, node: &T) -> Vec<T> {
        self.path_back_from(node).into_iter().rev().collect()
    }

    pub fn cost_for(&self, node: &T) -> Option<N> {
        self.costs.get(node).copied()
    }

    pub fn stale_pops(&self) -> usize {
        self.stale_pops
    }

    pub fn finalized_count(&self) -> usize {
        self.finalized.len()
    }
}

impl<N: Estimator, T: SearchNode, S: FnMut(&T) -> Vec<(T, N)>, H: Fn(&T) -> N> Iterator
    for PrioritySearchIter<N, T, S, H>
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(FrontierEntry { estimate, node }) = self.queue.pop() {
            if self.finalized.contains(&node) {
                self.stale_pops += 1;
                continue;
            }
            self.finalized.insert(node.clone());
            for (child, step_cost) in (self.successor)(&node) {
                if self.finalized.contains(&child) {
                    continue;
                }
                let from_start = estimate.from_start + step_cost;
                if self.costs.get(&child).is_none_or(|best| from_start < *best) {
                    self.costs.insert(child.clone(), from_start);
                    self.parents.insert(child.clone(), Some(node.clone()));
                    self.push(child, from_start);
                }
            }
            return Some(node);
        }
        None
    }
}

/// A* from `source` to `destination` over `graph`, estimating remaining cost
/// with `heuristic(node, destination)`.
pub fn search<H>(graph: &Graph, heuristic: H, source: GridPoint, destination: GridPoint) -> Result<Route>
where
    H: Fn(&GridPoint, &GridPoint) -> u64,
{
    let not_found = PlanError::PathNotFound {
        from: source,
        to: destination,
    };
    if !graph.contains(&source) || !graph.contains(&destination) {
        return Err(not_found);
    }
    let mut searcher = PrioritySearchIter::a_star(
        source,
        |p: &GridPoint| graph.neighbors(p).to_vec(),
        |p: &GridPoint| heuristic(p, &destination),
    );
    let found = searcher.by_ref().find(|p| *p == destination);
    trace!(
        "{source} -> {destination}: {} finalized, {} stale",
        searcher.finalized_count(),
        searcher.stale_pops()
    );
    match found.and_then(|p| searcher.cost_for(&p).map(|cost| (p, cost))) {
        Some((p, cost)) => Ok(Route::new(searcher.path_to(&p), cost)),
        None => Err(not_found),
    }
}
