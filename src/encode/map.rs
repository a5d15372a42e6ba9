//! Priority map encoding.

use std::collections::HashSet;

use crate::error::{PrioError, Result};
use crate::selection::ImageEntry;
use crate::types::{TileCoord, TileGrid, ID_MASK, PRIORITY_MASK};

use super::tile::PackedTile;

/// Encode an entry's tile grid.
///
/// Identities run 1..N in row-major order; each cell keeps its identity in
/// the low 15 bits and carries [`PRIORITY_MASK`] when its coordinate is
/// marked. The packed tile slice must line up with the grid, one tile per
/// cell, and the identity space caps the grid at 32767 tiles.
pub fn encode_map(entry: &ImageEntry, tiles: &[PackedTile]) -> Result<TileGrid> {
    let cells = entry.tile_count();
    if tiles.len() != cells {
        return Err(PrioError::Build {
            message: format!(
                "{} packed tiles do not cover the {}x{} grid of '{}'",
                tiles.len(),
                entry.width,
                entry.height,
                entry.path
            ),
            help: None,
        });
    }
    if cells > ID_MASK as usize {
        return Err(PrioError::Build {
            message: format!(
                "'{}' has {} tiles but identities only reach {}",
                entry.path, cells, ID_MASK
            ),
            help: Some("Split the image into smaller maps".to_string()),
        });
    }

    let marked: HashSet<TileCoord> = entry.priority_tiles.iter().copied().collect();
    let mut values = Vec::with_capacity(cells);
    let mut id: u16 = 1;
    for y in 0..entry.height {
        for x in 0..entry.width {
            let mut value = id & ID_MASK;
            if marked.contains(&TileCoord::new(x, y)) {
                value |= PRIORITY_MASK;
            }
            values.push(value);
            id += 1;
        }
    }

    Ok(TileGrid::new(entry.width, entry.height, values))
}
