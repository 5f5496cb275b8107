use pest::Parser;
use pest_derive::Parser;

use crate::{
    Obstacle,
    error::{PlanError, Result},
};

#[derive(Parser)]
#[grammar = "obstacles.pest"]
struct ObstacleListParser;

/// Reads a list of `(position, direction)` tuples such as
/// `[('B-7', 'E'), ('K-10', 'W')]`. Every entry is validated; the first bad
/// one fails the whole list.
pub fn parse_obstacle_list(input: &str, extent: u64) -> Result<Vec<Obstacle>> {
    let list = ObstacleListParser::parse(Rule::obstacle_list, input.trim())
        .map_err(|e| PlanError::MalformedInput(e.to_string()))?
        .next()
        .ok_or_else(|| PlanError::MalformedInput("empty input".into()))?;
    list.into_inner()
        .filter(|pair| pair.as_rule() == Rule::obstacle)
        .map(|pair| {
            let mut fields = pair.into_inner().map(|text| text.into_inner().as_str());
            let position = fields.next().unwrap_or_default();
            let direction = fields.next().unwrap_or_default();
            Obstacle::parse(position, direction, extent)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::parse_obstacle_list;
    use crate::{Facing, Obstacle, error::PlanError, point::GridPoint};

    fn at(label: &str) -> GridPoint {
        GridPoint::from_label(label, 20).unwrap()
    }

    #[test]
    fn test_demo_list() {
        let obstacles = parse_obstacle_list("[('B-7', 'E'), ('K-10', 'W'), ('K-19', 'S')]", 20).unwrap();
        assert_eq!(
            obstacles,
            vec![
                Obstacle::new(at("B-7"), Facing::East),
                Obstacle::new(at("K-10"), Facing::West),
                Obstacle::new(at("K-19"), Facing::South),
            ]
        );
    }

    #[test]
    fn test_layout_variants() {
        let text = "
            [
                (\"C-3\", \"N\"),
                ('D-4','S'),
            ]
        ";
        let obstacles = parse_obstacle_list(text, 20).unwrap();
        assert_eq!(obstacles.len(), 2);
        assert_eq!(obstacles[0].facing(), Facing::North);
        assert_eq!(obstacles[1].position(), at("D-4"));
        assert_eq!(parse_obstacle_list("[]", 20), Ok(vec![]));
    }

    #[test]
    fn test_syntax_errors() {
        for text in [
            "",
            "('B-7', 'E')",
            "[('B-7', 'E')",
            "[('B-7' 'E')]",
            "[('B-7', 'E)]",
            "[('B-7', 'E', 'N')]",
            "[('B-7', 'E')] trailing",
            "[,]",
        ] {
            assert!(
                matches!(parse_obstacle_list(text, 20), Err(PlanError::MalformedInput(_))),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_first_bad_entry_wins() {
        assert_eq!(
            parse_obstacle_list("[('B-7', 'E'), ('b-7', 'E'), ('C-1', 'X')]", 20),
            Err(PlanError::InvalidCoordinate("b-7".into()))
        );
        assert_eq!(
            parse_obstacle_list("[('B-7', 'NE')]", 20),
            Err(PlanError::InvalidDirection("NE".into()))
        );
        assert_eq!(
            parse_obstacle_list("[('E-1', 'N')]", 4),
            Err(PlanError::InvalidCoordinate("E-1".into()))
        );
    }
}
