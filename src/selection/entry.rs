//! One tracked image and its marked tiles.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PrioError, Result};
use crate::types::{TileCoord, TILE_SIZE};

/// A tracked image: its path (relative to the selection document), its
/// grid size in tiles, and the tiles marked high priority.
///
/// `width` and `height` are tile counts, not pixels. They are fixed when
/// the entry is created and checked against the real raster at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub path: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub priority_tiles: Vec<TileCoord>,
}

impl ImageEntry {
    /// Create an entry with no marked tiles.
    pub fn new(path: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
            priority_tiles: Vec::new(),
        }
    }

    /// Total number of tiles in the grid.
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Expected raster width in pixels.
    pub fn pixel_width(&self) -> u32 {
        self.width.saturating_mul(TILE_SIZE)
    }

    /// Expected raster height in pixels.
    pub fn pixel_height(&self) -> u32 {
        self.height.saturating_mul(TILE_SIZE)
    }

    /// Check whether a coordinate lies inside the grid.
    pub fn in_grid(&self, coord: TileCoord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Check whether a coordinate is marked.
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.priority_tiles.contains(&coord)
    }

    /// Set or clear a mark. Returns `Ok(true)` when the selection changed
    /// and `Ok(false)` when it already matched, so repeated calls are
    /// harmless. Coordinates outside the grid are rejected.
    pub fn toggle(&mut self, coord: TileCoord, marked: bool) -> Result<bool> {
        if !self.in_grid(coord) {
            return Err(PrioError::Build {
                message: format!(
                    "tile {} is outside the {}x{} grid of '{}'",
                    coord, self.width, self.height, self.path
                ),
                help: Some(format!(
                    "Valid tiles run 0,0 to {},{}",
                    self.width.saturating_sub(1),
                    self.height.saturating_sub(1)
                )),
            });
        }

        if marked {
            if self.contains(coord) {
                Ok(false)
            } else {
                self.priority_tiles.push(coord);
                Ok(true)
            }
        } else {
            let before = self.priority_tiles.len();
            self.priority_tiles.retain(|&c| c != coord);
            Ok(self.priority_tiles.len() != before)
        }
    }

    /// Compare the declared grid against a raster's real pixel size.
    pub fn check_dimensions(&self, pixel_width: u32, pixel_height: u32) -> Result<()> {
        if pixel_width != self.pixel_width() || pixel_height != self.pixel_height() {
            return Err(PrioError::DimensionMismatch {
                path: PathBuf::from(&self.path),
                expected: format!("{}x{}", self.pixel_width(), self.pixel_height()),
                actual: format!("{}x{}", pixel_width, pixel_height),
            });
        }
        Ok(())
    }
}
