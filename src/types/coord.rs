//! Tile coordinates on the 8x8 grid.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PrioError, Result};

/// A tile position, counted in whole tiles from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Row-major order: top row first, left to right within a row.
impl Ord for TileCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for TileCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for TileCoord {
    type Err = PrioError;

    fn from_str(s: &str) -> Result<Self> {
        let (x, y) = s.split_once(',').ok_or_else(|| invalid_coord(s))?;
        Ok(Self {
            x: parse_component(x, s)?,
            y: parse_component(y, s)?,
        })
    }
}

/// Parse one axis of an `x,y` pair.
fn parse_component(part: &str, whole: &str) -> Result<u32> {
    part.trim().parse().map_err(|_| invalid_coord(whole))
}

fn invalid_coord(s: &str) -> PrioError {
    PrioError::Parse {
        message: format!("Invalid tile coordinate '{}'", s),
        help: Some("Use the form x,y with whole tile counts, e.g. 3,0".to_string()),
    }
}
