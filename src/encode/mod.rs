//! Artifact encoders.
//!
//! Turns an entry's raster and selection into the two build outputs: the
//! 32-byte BGR555 palette file and the two-layer TMX map document. Tile
//! packing sits here too since tile identity and grid order are shared
//! between both outputs.

mod map;
mod pal;
mod tile;
mod tmx;

pub use map::encode_map;
pub use pal::{encode_pal, write_pal, PAL_FILE_BYTES};
pub use tile::{pack_4bpp, sample_tile, PackedTile, PACKED_TILE_BYTES, TILE_PIXELS};
pub use tmx::MapDocument;
