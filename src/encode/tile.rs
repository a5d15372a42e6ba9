//! 8x8 tile sampling and 4bpp packing.

use crate::raster::{Pixel, Raster, Region};
use crate::types::TILE_SIZE;

/// Pixels in one tile.
pub const TILE_PIXELS: usize = (TILE_SIZE * TILE_SIZE) as usize;

/// Bytes in one packed 4bpp tile.
pub const PACKED_TILE_BYTES: usize = TILE_PIXELS / 2;

/// One tile packed to 4 bits per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedTile {
    bytes: [u8; PACKED_TILE_BYTES],
}

impl PackedTile {
    pub fn bytes(&self) -> &[u8; PACKED_TILE_BYTES] {
        &self.bytes
    }
}

/// Sample the 8x8 tile at grid position `(tx, ty)` as 64 row-major
/// 4-bit values.
///
/// Indexed pixels keep their palette index; direct-colour pixels fall back
/// to a luminance estimate, `((r + g + b) / 3) >> 4`. Either way only the
/// low 4 bits survive.
pub fn sample_tile(raster: &dyn Raster, tx: u32, ty: u32) -> [u8; TILE_PIXELS] {
    let region = Region::new(raster, tx * TILE_SIZE, ty * TILE_SIZE, TILE_SIZE, TILE_SIZE);
    let mut pixels = [0u8; TILE_PIXELS];
    let mut i = 0;
    for y in 0..TILE_SIZE {
        for x in 0..TILE_SIZE {
            pixels[i] = match region.pixel(x, y) {
                Pixel::Indexed(index) => index & 0x0F,
                Pixel::Direct(c) => {
                    (((c.r as u16 + c.g as u16 + c.b as u16) / 3) >> 4) as u8 & 0x0F
                }
            };
            i += 1;
        }
    }
    pixels
}

/// Pack 64 4-bit pixels into 32 bytes.
///
/// The first pixel of each pair lands in the high nibble.
pub fn pack_4bpp(pixels: &[u8; TILE_PIXELS]) -> PackedTile {
    let mut bytes = [0u8; PACKED_TILE_BYTES];
    for (i, pair) in pixels.chunks_exact(2).enumerate() {
        bytes[i] = ((pair[0] & 0x0F) << 4) | (pair[1] & 0x0F);
    }
    PackedTile { bytes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{ImageRaster, IndexedRaster};

    #[test]
    fn test_sample_tile_reads_indexed_pixels() {
        // 16x8 surface, left tile all 3s, right tile all 5s
        let indices: Vec<u8> = (0..16 * 8)
            .map(|i| if i % 16 < 8 { 3 } else { 5 })
            .collect();
        let raster = IndexedRaster::new(16, 8, indices);

        assert_eq!(sample_tile(&raster, 0, 0), [3u8; TILE_PIXELS]);
        assert_eq!(sample_tile(&raster, 1, 0), [5u8; TILE_PIXELS]);
    }

    #[test]
    fn test_sample_tile_masks_to_four_bits() {
        let raster = IndexedRaster::new(8, 8, vec![0xAB; TILE_PIXELS]);
        assert_eq!(sample_tile(&raster, 0, 0), [0x0B; TILE_PIXELS]);
    }

    #[test]
    fn test_sample_tile_direct_colour_luminance() {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 255, 255, 255]));
        let raster = ImageRaster::from_image(img);
        // (255 * 3 / 3) >> 4 = 15
        assert_eq!(sample_tile(&raster, 0, 0), [15u8; TILE_PIXELS]);

        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([32, 16, 0, 255]));
        let raster = ImageRaster::from_image(img);
        // (48 / 3) >> 4 = 1
        assert_eq!(sample_tile(&raster, 0, 0), [1u8; TILE_PIXELS]);
    }

    #[test]
    fn test_sample_tile_offsets_into_grid() {
        // Row-major indices 0..255 over a 16x16 surface
        let indices: Vec<u8> = (0u32..256).map(|i| (i % 16) as u8).collect();
        let raster = IndexedRaster::new(16, 16, indices);

        let tile = sample_tile(&raster, 1, 1);
        // Every row of the bottom-right tile starts at column 8
        assert_eq!(tile[0], 8);
        assert_eq!(tile[7], 15);
        assert_eq!(tile[56], 8);
    }

    #[test]
    fn test_pack_4bpp_nibble_order() {
        let mut pixels = [0u8; TILE_PIXELS];
        pixels[0] = 0xA;
        pixels[1] = 0xB;
        pixels[2] = 0x1;
        pixels[3] = 0x2;
        let packed = pack_4bpp(&pixels);
        assert_eq!(packed.bytes()[0], 0xAB);
        assert_eq!(packed.bytes()[1], 0x12);
        assert_eq!(packed.bytes().len(), PACKED_TILE_BYTES);
    }

    #[test]
    fn test_pack_4bpp_masks_high_bits() {
        let pixels = [0xFFu8; TILE_PIXELS];
        let packed = pack_4bpp(&pixels);
        assert_eq!(packed.bytes(), &[0xFFu8; PACKED_TILE_BYTES]);

        let pixels = [0xF0u8; TILE_PIXELS];
        let packed = pack_4bpp(&pixels);
        assert_eq!(packed.bytes(), &[0x00u8; PACKED_TILE_BYTES]);
    }
}
