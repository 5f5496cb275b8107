//! Exhaustive goal ordering.
//!
//! Every permutation of the goals is chained into one route (start, then each
//! goal in turn) by repeated A* searches, and the cheapest complete route wins.
//! This is exact and O(k! * search), which is fine for the single-digit goal
//! counts a run sees.

use std::time::Instant;

use itertools::Itertools;
use log::{debug, info};

use crate::{
    Route,
    error::{PlanError, Result},
    graph::Graph,
    point::GridPoint,
    search_iter::search,
};

/// Chains `start -> order[0] -> order[1] -> ...`. `None` if any leg has no path.
pub fn chain_route<H>(graph: &Graph, heuristic: &H, start: GridPoint, order: &[GridPoint]) -> Option<Route>
where
    H: Fn(&GridPoint, &GridPoint) -> u64,
{
    if !graph.contains(&start) {
        return None;
    }
    let mut route = Route::at(start);
    let mut from = start;
    for goal in order {
        match search(graph, heuristic, from, *goal) {
            Ok(leg) => route.append(leg),
            Err(e) => {
                debug!("{}: {e}", order_str(order));
                return None;
            }
        }
        from = *goal;
    }
    Some(route)
}

pub fn plan_route<H>(graph: &Graph, heuristic: H, start: GridPoint, goals: &[GridPoint]) -> Result<Route>
where
    H: Fn(&GridPoint, &GridPoint) -> u64,
{
    plan_route_until(graph, heuristic, start, goals, None)
}

/// As [`plan_route`], giving up with `DeadlineExceeded` once `deadline` passes.
pub fn plan_route_until<H>(
    graph: &Graph,
    heuristic: H,
    start: GridPoint,
    goals: &[GridPoint],
    deadline: Option<Instant>,
) -> Result<Route>
where
    H: Fn(&GridPoint, &GridPoint) -> u64,
{
    let orders = goals.iter().copied().permutations(goals.len());
    let best = best_of(graph, &heuristic, start, orders, deadline)?;
    finish(best, goals.len())
}

/// Same answer as [`plan_route_until`]. The permutation sequence is split into
/// contiguous ranges over `threads` scoped workers sharing `graph`; each worker
/// walks the lazy sequence to its range and keeps only its own best route.
pub fn plan_route_parallel<H>(
    graph: &Graph,
    heuristic: H,
    start: GridPoint,
    goals: &[GridPoint],
    threads: usize,
    deadline: Option<Instant>,
) -> Result<Route>
where
    H: Fn(&GridPoint, &GridPoint) -> u64 + Sync,
{
    let threads = threads.max(1);
    let total = (1..=goals.len())
        .try_fold(1usize, |n, k| n.checked_mul(k))
        .unwrap_or(usize::MAX);
    let chunk_size = total.div_ceil(threads).max(1);
    let heuristic = &heuristic;
    let bests = crossbeam::scope(|s| {
        let handles = (0..threads)
            .map(|i| {
                s.spawn(move |_| {
                    let orders = goals
                        .iter()
                        .copied()
                        .permutations(goals.len())
                        .skip(i.saturating_mul(chunk_size))
                        .take(chunk_size);
                    best_of(graph, heuristic, start, orders, deadline)
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().map_err(|_| PlanError::WorkerPanicked)?)
            .collect::<Result<Vec<_>>>()
    })
    .map_err(|_| PlanError::WorkerPanicked)??;

    // Ranges are in sequence order, so a strict comparison keeps the first minimum.
    let mut best: Option<Route> = None;
    for route in bests.into_iter().flatten() {
        if best.as_ref().is_none_or(|b| route.cost < b.cost) {
            best = Some(route);
        }
    }
    finish(best, goals.len())
}

fn best_of<H, I>(
    graph: &Graph,
    heuristic: &H,
    start: GridPoint,
    orders: I,
    deadline: Option<Instant>,
) -> Result<Option<Route>>
where
    H: Fn(&GridPoint, &GridPoint) -> u64,
    I: Iterator<Item = Vec<GridPoint>>,
{
    let mut best: Option<Route> = None;
    for order in orders {
        check_deadline(deadline)?;
        if let Some(route) = chain_route(graph, heuristic, start, &order) {
            debug!("{}: cost {}", order_str(&order), route.cost);
            if best.as_ref().is_none_or(|b| route.cost < b.cost) {
                best = Some(route);
            }
        }
    }
    Ok(best)
}

fn check_deadline(deadline: Option<Instant>) -> Result<()> {
    match deadline {
        Some(d) if Instant::now() >= d => Err(PlanError::DeadlineExceeded),
        _ => Ok(()),
    }
}

fn finish(best: Option<Route>, goals: usize) -> Result<Route> {
    match best {
        Some(route) => {
            info!("best route: {} steps, cost {}", route.steps(), route.cost);
            Ok(route)
        }
        None => Err(PlanError::RouteNotFound { goals }),
    }
}

fn order_str(order: &[GridPoint]) -> String {
    format!("[{}]", order.iter().join(", "))
}
