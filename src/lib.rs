use std::{
    fmt::Display,
    str::FromStr,
    time::{Duration, Instant},
};

use enum_iterator::{Sequence, all};
use itertools::Itertools;
use log::{info, warn};

pub mod cmd;
pub mod error;
pub mod executor;
pub mod goals;
pub mod graph;
pub mod optimizer;
pub mod parse;
pub mod point;
pub mod search_iter;
pub mod view;

pub use error::{PlanError, Result};
use graph::{Graph, build_graph};
use point::GridPoint;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Sequence)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    pub fn code(&self) -> &'static str {
        match self {
            Facing::North => "N",
            Facing::South => "S",
            Facing::East => "E",
            Facing::West => "W",
        }
    }

    /// Unit step in grid coordinates; north is increasing row.
    pub fn unit(&self) -> (i64, i64) {
        match self {
            Facing::North => (0, 1),
            Facing::South => (0, -1),
            Facing::East => (1, 0),
            Facing::West => (-1, 0),
        }
    }
}

impl FromStr for Facing {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self> {
        all::<Facing>()
            .find(|f| f.code() == s)
            .ok_or_else(|| PlanError::InvalidDirection(s.to_string()))
    }
}

impl Display for Facing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Obstacle {
    position: GridPoint,
    facing: Facing,
}

impl Obstacle {
    pub fn new(position: GridPoint, facing: Facing) -> Self {
        Self { position, facing }
    }

    /// From a position label and a direction code, e.g. `("B-7", "E")`.
    pub fn parse(position: &str, direction: &str, extent: u64) -> Result<Self> {
        Ok(Self::new(
            GridPoint::from_label(position, extent)?,
            direction.parse()?,
        ))
    }

    pub fn position(&self) -> GridPoint {
        self.position
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }
}

/// A walk over grid cells, both endpoints included, with its total edge cost.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: Vec<GridPoint>,
    pub cost: u64,
}

impl Route {
    pub fn new(path: Vec<GridPoint>, cost: u64) -> Self {
        Self { path, cost }
    }

    pub fn at(start: GridPoint) -> Self {
        Self::new(vec![start], 0)
    }

    /// Continues this route with `leg`, which starts where this one ends.
    /// The shared point is kept once.
    pub fn append(&mut self, leg: Route) {
        let skip = usize::from(self.path.last() == leg.path.first());
        self.path.extend(leg.path.into_iter().skip(skip));
        self.cost += leg.cost;
    }

    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    pub fn end(&self) -> Option<GridPoint> {
        self.path.last().copied()
    }

    pub fn labels(&self) -> Vec<String> {
        self.path.iter().map(|p| p.to_label()).collect()
    }

    pub fn as_python_dict(&self) -> String {
        let path = self.path.iter().map(|p| format!("'{p}'")).join(", ");
        format!("{{'path': [{path}], 'cost': {}}}", self.cost)
    }
}

#[derive(Clone, Debug)]
pub struct PlannerBuilder {
    extent: u64,
    step_cost: u64,
    exclusion_radius: u64,
    goal_offset: u64,
    start: GridPoint,
    threads: usize,
    deadline: Option<Duration>,
}

impl Default for PlannerBuilder {
    fn default() -> Self {
        Self {
            extent: 20,
            step_cost: 10,
            exclusion_radius: 2,
            goal_offset: 3,
            start: GridPoint::new(0, 0),
            threads: 1,
            deadline: None,
        }
    }
}

impl PlannerBuilder {
    pub fn extent(&mut self, extent: u64) -> &mut Self {
        self.extent = extent;
        self
    }

    pub fn step_cost(&mut self, step_cost: u64) -> &mut Self {
        self.step_cost = step_cost;
        self
    }

    pub fn exclusion_radius(&mut self, radius: u64) -> &mut Self {
        self.exclusion_radius = radius;
        self
    }

    pub fn goal_offset(&mut self, offset: u64) -> &mut Self {
        self.goal_offset = offset;
        self
    }

    pub fn start(&mut self, start: GridPoint) -> &mut Self {
        self.start = start;
        self
    }

    pub fn threads(&mut self, threads: usize) -> &mut Self {
        self.threads = threads;
        self
    }

    pub fn deadline(&mut self, deadline: Duration) -> &mut Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn build(&self) -> Result<Planner> {
        if !(1..=point::MAX_EXTENT).contains(&self.extent) {
            return Err(PlanError::InvalidConfig(format!(
                "extent {} is outside 1..={}",
                self.extent,
                point::MAX_EXTENT
            )));
        }
        if self.step_cost == 0 {
            return Err(PlanError::InvalidConfig("step cost must be positive".into()));
        }
        if self.threads == 0 {
            return Err(PlanError::InvalidConfig("need at least one thread".into()));
        }
        if !self.start.within(self.extent) {
            return Err(PlanError::InvalidConfig(format!(
                "start {} is outside a {}x{} grid",
                self.start, self.extent, self.extent
            )));
        }
        Ok(Planner {
            extent: self.extent,
            step_cost: self.step_cost,
            exclusion_radius: self.exclusion_radius,
            goal_offset: self.goal_offset,
            start: self.start,
            threads: self.threads,
            deadline: self.deadline,
        })
    }
}

/// Plans one inspection route per call. Holds only configuration; the graph
/// and goals are rebuilt from each call's obstacles.
#[derive(Clone, Debug)]
pub struct Planner {
    extent: u64,
    step_cost: u64,
    exclusion_radius: u64,
    goal_offset: u64,
    start: GridPoint,
    threads: usize,
    deadline: Option<Duration>,
}

impl Planner {
    pub fn extent(&self) -> u64 {
        self.extent
    }

    pub fn start(&self) -> GridPoint {
        self.start
    }

    pub fn obstacle(&self, position: &str, direction: &str) -> Result<Obstacle> {
        Obstacle::parse(position, direction, self.extent)
    }

    pub fn goals_for(&self, obstacles: &[Obstacle]) -> Result<Vec<GridPoint>> {
        if let Some(o) = obstacles.iter().find(|o| !o.position().within(self.extent)) {
            return Err(PlanError::InvalidCoordinate(o.position().to_label()));
        }
        goals::derive_goals(obstacles, self.goal_offset, self.extent)
    }

    pub fn graph_for(&self, obstacles: &[Obstacle]) -> Graph {
        build_graph(self.extent, obstacles, self.exclusion_radius, self.step_cost)
    }

    pub fn plan(&self, obstacles: &[Obstacle]) -> Result<Route> {
        let goals = self.goals_for(obstacles)?;
        let graph = self.graph_for(obstacles);
        if !graph.contains(&self.start) {
            warn!("start {} lies inside an exclusion zone", self.start);
        }
        for goal in goals.iter().filter(|g| !graph.contains(g)) {
            warn!("goal {goal} lies inside an exclusion zone");
        }

        let reachable = graph.reachable_from(self.start);
        if let Some(goal) = goals.iter().find(|g| !reachable.contains(g)) {
            info!("goal {goal} cannot be reached from {}", self.start);
            return Err(PlanError::RouteNotFound { goals: goals.len() });
        }

        let deadline = self.deadline.map(|d| Instant::now() + d);
        let heuristic = GridPoint::manhattan_distance;
        if self.threads > 1 {
            optimizer::plan_route_parallel(&graph, heuristic, self.start, &goals, self.threads, deadline)
        } else {
            optimizer::plan_route_until(&graph, heuristic, self.start, &goals, deadline)
        }
    }

    /// Validates every `(position, direction)` pair before planning anything.
    pub fn plan_codes<S: AsRef<str>>(&self, codes: &[(S, S)]) -> Result<Route> {
        let obstacles = codes
            .iter()
            .map(|(position, direction)| self.obstacle(position.as_ref(), direction.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        self.plan(&obstacles)
    }
}
