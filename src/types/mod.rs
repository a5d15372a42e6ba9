//! Core domain types for priomap.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - RGBA colour values and BGR555 conversion
//! - `TileCoord` - positions on the 8x8 tile grid
//! - `TileGrid` - the encoded identity/priority grid

mod colour;
mod coord;
mod grid;

pub use colour::Colour;
pub use coord::TileCoord;
pub use grid::{TileGrid, ID_MASK, PRIORITY_MASK};

/// Edge length of a tile in pixels.
pub const TILE_SIZE: u32 = 8;
