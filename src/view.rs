use std::collections::HashSet;

use itertools::Itertools;

use crate::{Obstacle, Route, graph::Graph, point::GridPoint};

/// Draws the grid with the highest row on top.
///
/// `X` obstacle, `S` start, `G` goal, `*` route, `#` excluded, `.` free.
pub fn grid_str(
    graph: &Graph,
    obstacles: &[Obstacle],
    goals: &[GridPoint],
    start: GridPoint,
    route: Option<&Route>,
) -> String {
    let extent = graph.extent();
    let obstacles = obstacles.iter().map(|o| o.position()).collect::<HashSet<_>>();
    let goals = goals.iter().copied().collect::<HashSet<_>>();
    let on_route = route
        .map(|r| r.path.iter().copied().collect::<HashSet<_>>())
        .unwrap_or_default();
    let width = format!("{}", extent.saturating_sub(1)).len();

    let mut result = String::new();
    for y in (0..extent).rev() {
        let row = (0..extent)
            .map(|x| {
                let p = GridPoint::new(x, y);
                if obstacles.contains(&p) {
                    'X'
                } else if p == start {
                    'S'
                } else if goals.contains(&p) {
                    'G'
                } else if on_route.contains(&p) {
                    '*'
                } else if !graph.contains(&p) {
                    '#'
                } else {
                    '.'
                }
            })
            .join(" ");
        result.push_str(&format!("{y:>width$} {row}\n"));
    }
    let columns = (0..extent)
        .map(|x| GridPoint::new(x, 0).to_label().chars().next().unwrap_or('?'))
        .join(" ");
    result.push_str(&format!("{:>width$} {columns}\n", ""));
    result
}
