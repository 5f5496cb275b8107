use std::{fmt::Display, ops::Index};

use itertools::Itertools;

use crate::error::{PlanError, Result};

/// Column labels run `A..=Z`, so no grid can be wider than this.
pub const MAX_EXTENT: u64 = 26;

const COLUMNS: &[u8; MAX_EXTENT as usize] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A cell on the square planning grid. `[0]` is the column (lettered axis),
/// `[1]` is the row (numbered axis).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub struct GridPoint {
    coords: [u64; 2],
}

impl GridPoint {
    pub fn new(x: u64, y: u64) -> Self {
        Self { coords: [x, y] }
    }

    pub fn x(&self) -> u64 {
        self[0]
    }

    pub fn y(&self) -> u64 {
        self[1]
    }

    pub fn within(&self, extent: u64) -> bool {
        self[0] < extent && self[1] < extent
    }

    /// Canonical label, e.g. `(1, 7)` is `B-7`.
    pub fn to_label(&self) -> String {
        format!("{self}")
    }

    /// Parses a `<letter>-<number>` label, rejecting anything malformed or
    /// outside `[0, extent)` on either axis.
    pub fn from_label(label: &str, extent: u64) -> Result<Self> {
        let invalid = || PlanError::InvalidCoordinate(label.to_string());
        let (column, row) = label.split_once('-').ok_or_else(invalid)?;
        let x = match column.as_bytes() {
            [letter] => COLUMNS
                .iter()
                .position(|c| c == letter)
                .ok_or_else(invalid)? as u64,
            _ => return Err(invalid()),
        };
        if row.is_empty() || !row.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let y = row.parse::<u64>().map_err(|_| invalid())?;
        let point = Self::new(x, y);
        if point.within(extent) {
            Ok(point)
        } else {
            Err(invalid())
        }
    }

    pub fn manhattan_distance(&self, other: &GridPoint) -> u64 {
        self[0].abs_diff(other[0]) + self[1].abs_diff(other[1])
    }

    /// Horizontal and vertical neighbors that stay inside `[0, extent)`.
    pub fn manhattan_neighbors(&self, extent: u64) -> impl Iterator<Item = GridPoint> {
        let here = *self;
        OFFSETS
            .iter()
            .permutations(2)
            .filter(|c| c.iter().filter(|n| ***n != 0).count() == 1)
            .map(move |c| [here[0] as i64 + c[0], here[1] as i64 + c[1]])
            .filter(move |c| c.iter().all(|v| (0..extent as i64).contains(v)))
            .map(|c| GridPoint::new(c[0] as u64, c[1] as u64))
    }
}

const OFFSETS: [i64; 3] = [-1, 0, 1];

/// Every cell of an `extent` x `extent` grid, column by column.
pub fn all_coordinates(extent: u64) -> impl Iterator<Item = GridPoint> {
    (0..extent).cartesian_product(0..extent).map(|(x, y)| GridPoint::new(x, y))
}

impl Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match COLUMNS.get(self[0] as usize) {
            Some(letter) => write!(f, "{}-{}", *letter as char, self[1]),
            None => write!(f, "({},{})", self[0], self[1]),
        }
    }
}

impl Index<usize> for GridPoint {
    type Output = u64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}
