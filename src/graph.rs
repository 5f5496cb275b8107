use std::collections::{HashMap, HashSet};

use crate::{
    Obstacle,
    point::{GridPoint, all_coordinates},
    search_iter::BfsIter,
};

/// 4-connected grid graph with every exclusion-zone cell removed.
///
/// Built once per planning request and read-only afterwards, so a single
/// `&Graph` can be shared by concurrent searches.
#[derive(Clone, Debug)]
pub struct Graph {
    extent: u64,
    adjacency: HashMap<GridPoint, Vec<(GridPoint, u64)>>,
}

impl Graph {
    /// Unpruned `extent` x `extent` grid.
    pub fn full(extent: u64, step_cost: u64) -> Self {
        let adjacency = all_coordinates(extent)
            .map(|p| {
                let edges = p.manhattan_neighbors(extent).map(|n| (n, step_cost)).collect();
                (p, edges)
            })
            .collect();
        Self {
            extent,
            adjacency,
        }
    }

    /// Drops every node in `excluded` and every edge that points at one.
    pub fn without(self, excluded: &HashSet<GridPoint>) -> Self {
        let adjacency = self
            .adjacency
            .into_iter()
            .filter(|(p, _)| !excluded.contains(p))
            .map(|(p, edges)| {
                let kept = edges
                    .into_iter()
                    .filter(|(n, _)| !excluded.contains(n))
                    .collect();
                (p, kept)
            })
            .collect();
        Self {
            extent: self.extent,
            adjacency,
        }
    }

    pub fn extent(&self) -> u64 {
        self.extent
    }

    pub fn contains(&self, p: &GridPoint) -> bool {
        self.adjacency.contains_key(p)
    }

    /// Outgoing `(neighbor, cost)` edges; empty for a node not in the graph.
    pub fn neighbors(&self, p: &GridPoint) -> &[(GridPoint, u64)] {
        self.adjacency.get(p).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GridPoint> {
        self.adjacency.keys()
    }

    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Every node in the same connected component as `start`.
    pub fn reachable_from(&self, start: GridPoint) -> HashSet<GridPoint> {
        if !self.contains(&start) {
            return HashSet::new();
        }
        BfsIter::new(start, |p: &GridPoint| {
            self.neighbors(p).iter().map(|(n, _)| *n).collect()
        })
        .collect()
    }
}

/// Square of side `2 * radius + 1` around `center`, clipped to the grid.
pub fn exclusion_zone(center: GridPoint, radius: u64, extent: u64) -> impl Iterator<Item = GridPoint> {
    let last = extent.saturating_sub(1);
    let xs = center.x().saturating_sub(radius)..=center.x().saturating_add(radius).min(last);
    let ys = center.y().saturating_sub(radius)..=center.y().saturating_add(radius).min(last);
    xs.flat_map(move |x| ys.clone().map(move |y| GridPoint::new(x, y)))
        .filter(move |p| p.within(extent))
}

pub fn build_graph(extent: u64, obstacles: &[Obstacle], exclusion_radius: u64, step_cost: u64) -> Graph {
    let excluded = obstacles
        .iter()
        .flat_map(|o| exclusion_zone(o.position(), exclusion_radius, extent))
        .collect::<HashSet<_>>();
    Graph::full(extent, step_cost).without(&excluded)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{Rng, SeedableRng, rngs::StdRng};

    use super::{Graph, build_graph, exclusion_zone};
    use crate::{Facing, Obstacle, point::GridPoint};

    fn at(label: &str) -> GridPoint {
        GridPoint::from_label(label, 20).unwrap()
    }

    #[test]
    fn test_full_grid() {
        let graph = Graph::full(20, 10);
        assert_eq!(graph.len(), 400);
        let edges = graph.nodes().map(|p| graph.neighbors(p).len()).sum::<usize>();
        // 2 * 2 * 20 * 19 directed edges
        assert_eq!(edges, 1520);
        assert!(graph.nodes().all(|p| graph.neighbors(p).iter().all(|(_, c)| *c == 10)));
        for p in graph.nodes() {
            for (n, _) in graph.neighbors(p) {
                assert_eq!(p.manhattan_distance(n), 1);
                assert!(graph.neighbors(n).iter().any(|(back, _)| back == p));
            }
        }
    }

    #[test]
    fn test_zone_clipping() {
        let zone = exclusion_zone(GridPoint::new(0, 0), 2, 20).collect::<HashSet<_>>();
        assert_eq!(zone.len(), 9);
        let zone = exclusion_zone(GridPoint::new(10, 10), 2, 20).collect::<HashSet<_>>();
        assert_eq!(zone.len(), 25);
        let zone = exclusion_zone(GridPoint::new(19, 10), 2, 20).collect::<HashSet<_>>();
        assert_eq!(zone.len(), 15);
        let zone = exclusion_zone(GridPoint::new(5, 5), 0, 20).collect::<Vec<_>>();
        assert_eq!(zone, vec![GridPoint::new(5, 5)]);
    }

    #[test]
    fn test_single_cell_exclusion() {
        let obstacle = Obstacle::new(at("B-2"), Facing::East);
        let graph = build_graph(4, &[obstacle], 0, 10);
        assert_eq!(graph.len(), 15);
        assert!(!graph.contains(&at("B-2")));
        for (label, expected) in [("A-2", 2), ("C-2", 3), ("B-1", 3), ("B-3", 2)] {
            let p = at(label);
            assert!(graph.contains(&p));
            assert_eq!(graph.neighbors(&p).len(), expected, "{label}");
            assert!(graph.neighbors(&p).iter().all(|(n, _)| *n != at("B-2")));
        }
    }

    #[test]
    fn test_overlapping_zones() {
        let obstacles = [
            Obstacle::new(at("E-5"), Facing::North),
            Obstacle::new(at("F-5"), Facing::South),
        ];
        let graph = build_graph(20, &obstacles, 2, 10);
        // Union of two 5x5 squares offset by one column: 6x5
        assert_eq!(graph.len(), 400 - 30);
    }

    #[test]
    fn test_pruning_random() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let extent = rng.random_range(1..=20);
            let radius = rng.random_range(0..=3);
            let obstacles = (0..rng.random_range(0..5))
                .map(|_| {
                    let p = GridPoint::new(rng.random_range(0..extent), rng.random_range(0..extent));
                    Obstacle::new(p, Facing::North)
                })
                .collect::<Vec<_>>();
            let graph = build_graph(extent, &obstacles, radius, 10);
            let excluded = obstacles
                .iter()
                .flat_map(|o| exclusion_zone(o.position(), radius, extent))
                .collect::<HashSet<_>>();
            assert_eq!(graph.len() as u64 + excluded.len() as u64, extent * extent);
            for p in graph.nodes() {
                assert!(!excluded.contains(p));
                for (n, _) in graph.neighbors(p) {
                    assert!(!excluded.contains(n));
                    assert!(graph.contains(n));
                }
            }
        }
    }

    #[test]
    fn test_reachable() {
        // A wall of exclusion along column C cuts the 20x20 grid in two.
        let obstacles = (0..20)
            .step_by(3)
            .map(|y| Obstacle::new(GridPoint::new(2, y), Facing::East))
            .collect::<Vec<_>>();
        let graph = build_graph(20, &obstacles, 1, 10);
        let left = graph.reachable_from(at("A-0"));
        assert_eq!(left.len(), 20);
        assert!(!left.contains(&at("T-19")));
        assert!(graph.reachable_from(at("C-0")).is_empty());
    }
}
