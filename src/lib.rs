//! priomap - Palette and priority tile-map pipeline
//!
//! A library for turning raster images with user-marked high priority
//! tiles into hardware palette files and priority-annotated tile maps.

pub mod cli;
pub mod config;
pub mod encode;
pub mod error;
pub mod output;
pub mod quantize;
pub mod raster;
pub mod selection;
pub mod types;
pub mod validation;

pub use config::{Manifest, DEFAULT_DOCUMENT, MANIFEST_FILENAME};
pub use encode::{
    encode_map, encode_pal, pack_4bpp, sample_tile, write_pal, MapDocument, PackedTile,
    PACKED_TILE_BYTES, PAL_FILE_BYTES, TILE_PIXELS,
};
pub use error::{PrioError, Result};
pub use quantize::{derive_palette, index_image, MedianCut, PaletteTable, Quantizer, PALETTE_SIZE};
pub use raster::{probe_dimensions, ImageRaster, IndexedRaster, Pixel, Raster, Region};
pub use selection::{ImageEntry, SelectionStore, DOCUMENT_VERSION};
pub use types::{Colour, TileCoord, TileGrid, ID_MASK, PRIORITY_MASK, TILE_SIZE};
pub use validation::{validate_store, Diagnostic, Severity, ValidationResult};
