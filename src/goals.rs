use crate::{
    Obstacle,
    error::{PlanError, Result},
    point::GridPoint,
};

/// Raw stand-off position `offset` cells out from the obstacle along its
/// facing. May fall off the grid; see [`derive_goals`] for the checked form.
/// Offsets too large for `i64` saturate, which always lands off the grid.
pub fn derive_goal(obstacle: &Obstacle, offset: u64) -> (i64, i64) {
    let (dx, dy) = obstacle.facing().unit();
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);
    let position = obstacle.position();
    let shift = |coord: u64, unit: i64| {
        i64::try_from(coord)
            .unwrap_or(i64::MAX)
            .saturating_add(unit.saturating_mul(offset))
    };
    (shift(position.x(), dx), shift(position.y(), dy))
}

/// One goal per obstacle, in input order. Duplicates are kept; each one is a
/// separate required visit.
pub fn derive_goals(obstacles: &[Obstacle], offset: u64, extent: u64) -> Result<Vec<GridPoint>> {
    obstacles
        .iter()
        .map(|obstacle| {
            let (x, y) = derive_goal(obstacle, offset);
            let in_range = |v: i64| (0..extent as i64).contains(&v);
            if in_range(x) && in_range(y) {
                Ok(GridPoint::new(x as u64, y as u64))
            } else {
                Err(PlanError::GoalOutOfBounds {
                    obstacle: obstacle.position(),
                    x,
                    y,
                })
            }
        })
        .collect()
}
