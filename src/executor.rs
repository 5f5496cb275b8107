use itertools::Itertools;

use crate::{Route, point::GridPoint};

/// Steps an agent along a planned route one cell at a time, in either direction.
pub struct RouteExecutor {
    route: Route,
    step: usize,
}

impl RouteExecutor {
    pub fn new(route: Route) -> Self {
        Self { route, step: 0 }
    }

    /// The cell the agent currently occupies.
    pub fn waypoint(&self) -> Option<GridPoint> {
        self.route.path.get(self.step).copied()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn max_steps(&self) -> usize {
        self.route.steps()
    }

    pub fn finished(&self) -> bool {
        self.step >= self.max_steps()
    }

    pub fn advance(&mut self) -> bool {
        if self.finished() {
            false
        } else {
            self.step += 1;
            true
        }
    }

    pub fn retreat(&mut self) -> bool {
        if self.step == 0 {
            false
        } else {
            self.step -= 1;
            true
        }
    }

    pub fn goal(&self) -> Option<GridPoint> {
        self.route.end()
    }

    pub fn full_path_copy(&self) -> String {
        format!("[{}]", self.route.path.iter().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::RouteExecutor;
    use crate::{Route, point::GridPoint};

    fn at(label: &str) -> GridPoint {
        GridPoint::from_label(label, 20).unwrap()
    }

    #[test]
    fn test_walk() {
        let route = Route::new(vec![at("A-0"), at("A-1"), at("B-1")], 20);
        let mut executor = RouteExecutor::new(route);
        assert_eq!(executor.max_steps(), 2);
        assert_eq!(executor.waypoint(), Some(at("A-0")));
        assert!(!executor.retreat());
        assert!(executor.advance());
        assert!(executor.advance());
        assert!(executor.finished());
        assert!(!executor.advance());
        assert_eq!(executor.waypoint(), executor.goal());
        assert!(executor.retreat());
        assert_eq!(executor.waypoint(), Some(at("A-1")));
        assert_eq!(executor.step(), 1);
        assert_eq!(executor.full_path_copy(), "[A-0,A-1,B-1]");
    }

    #[test]
    fn test_single_point() {
        let mut executor = RouteExecutor::new(Route::at(at("C-3")));
        assert!(executor.finished());
        assert!(!executor.advance());
        assert_eq!(executor.waypoint(), Some(at("C-3")));
        assert_eq!(executor.goal(), Some(at("C-3")));
    }
}
