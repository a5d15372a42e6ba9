//! Palette file output.
//!
//! A `.pal` file is exactly 32 bytes: the 16 palette slots as BGR555
//! words in little-endian order. Slot order is the table's order, so the
//! first word is always the most frequent colour.

use std::fs;
use std::path::Path;

use crate::error::{PrioError, Result};
use crate::quantize::{PaletteTable, PALETTE_SIZE};

/// Size of a palette file in bytes.
pub const PAL_FILE_BYTES: usize = PALETTE_SIZE * 2;

/// Encode a palette table to its 32-byte file image.
pub fn encode_pal(palette: &PaletteTable) -> [u8; PAL_FILE_BYTES] {
    let mut bytes = [0u8; PAL_FILE_BYTES];
    for (i, colour) in palette.slots().iter().enumerate() {
        let word = colour.to_bgr555().to_le_bytes();
        bytes[i * 2] = word[0];
        bytes[i * 2 + 1] = word[1];
    }
    bytes
}

/// Write a palette file.
pub fn write_pal(palette: &PaletteTable, path: &Path) -> Result<()> {
    fs::write(path, encode_pal(palette)).map_err(|e| PrioError::Serialization {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
