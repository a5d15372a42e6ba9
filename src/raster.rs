//! Raster access for the pipeline.
//!
//! Everything downstream of image loading works against the `Raster`
//! capability rather than a concrete decoder, so tile sampling and
//! quantization run unchanged over decoded PNGs, palette-indexed buffers,
//! and cropped views.

use std::path::Path;

use crate::error::{PrioError, Result};
use crate::types::Colour;

/// One sampled pixel: either a direct colour or a palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Direct(Colour),
    Indexed(u8),
}

/// Read access to a rectangular pixel surface.
///
/// Callers must keep `x` and `y` inside the surface; backends may panic
/// outside it, matching the underlying buffer types.
pub trait Raster {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Sample the pixel at a position.
    fn pixel(&self, x: u32, y: u32) -> Pixel;
}

/// A decoded RGBA image backed by the `image` crate.
pub struct ImageRaster {
    img: image::RgbaImage,
}

impl ImageRaster {
    /// Decode an image file into an RGBA surface.
    pub fn open(path: &Path) -> Result<Self> {
        let img = image::open(path)
            .map_err(|e| PrioError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .to_rgba8();
        Ok(Self::from_image(img))
    }

    /// Wrap an already-decoded RGBA buffer.
    pub fn from_image(img: image::RgbaImage) -> Self {
        Self { img }
    }
}

impl Raster for ImageRaster {
    fn width(&self) -> u32 {
        self.img.width()
    }

    fn height(&self) -> u32 {
        self.img.height()
    }

    fn pixel(&self, x: u32, y: u32) -> Pixel {
        let rgba = self.img.get_pixel(x, y).0;
        Pixel::Direct(Colour::new(rgba[0], rgba[1], rgba[2], rgba[3]))
    }
}

/// A surface of palette indices, produced by quantization.
pub struct IndexedRaster {
    width: u32,
    height: u32,
    indices: Vec<u8>,
}

impl IndexedRaster {
    /// Create an indexed surface. `indices` must hold `width * height`
    /// values in row-major order.
    pub fn new(width: u32, height: u32, indices: Vec<u8>) -> Self {
        debug_assert_eq!(indices.len(), width as usize * height as usize);
        Self {
            width,
            height,
            indices,
        }
    }
}

impl Raster for IndexedRaster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Pixel {
        Pixel::Indexed(self.indices[(y * self.width + x) as usize])
    }
}

/// A rectangular view into another raster.
pub struct Region<'a> {
    parent: &'a dyn Raster,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl<'a> Region<'a> {
    /// Crop a view at `(x, y)` with the given size. The view must lie
    /// entirely inside the parent surface.
    pub fn new(parent: &'a dyn Raster, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            parent,
            x,
            y,
            width,
            height,
        }
    }
}

impl Raster for Region<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Pixel {
        self.parent.pixel(self.x + x, self.y + y)
    }
}

/// Read an image's pixel dimensions from its header without decoding it.
pub fn probe_dimensions(path: &Path) -> Result<(u32, u32)> {
    image::image_dimensions(path).map_err(|e| PrioError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> ImageRaster {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8, y as u8, 0, 255])
        });
        ImageRaster::from_image(img)
    }

    #[test]
    fn test_image_raster_pixels() {
        let raster = gradient(4, 2);
        assert_eq!(raster.width(), 4);
        assert_eq!(raster.height(), 2);
        assert_eq!(raster.pixel(3, 1), Pixel::Direct(Colour::new(3, 1, 0, 255)));
    }

    #[test]
    fn test_region_offsets_into_parent() {
        let raster = gradient(16, 16);
        let region = Region::new(&raster, 8, 8, 8, 8);
        assert_eq!(region.width(), 8);
        assert_eq!(region.height(), 8);
        assert_eq!(
            region.pixel(0, 0),
            Pixel::Direct(Colour::new(8, 8, 0, 255))
        );
        assert_eq!(
            region.pixel(7, 7),
            Pixel::Direct(Colour::new(15, 15, 0, 255))
        );
    }

    #[test]
    fn test_indexed_raster_pixels() {
        let raster = IndexedRaster::new(2, 2, vec![0, 1, 2, 3]);
        assert_eq!(raster.pixel(0, 0), Pixel::Indexed(0));
        assert_eq!(raster.pixel(1, 1), Pixel::Indexed(3));
    }

    #[test]
    fn test_open_missing_file() {
        let err = ImageRaster::open(Path::new("/nonexistent/beach.png"));
        assert!(err.is_err());
    }

    #[test]
    fn test_probe_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probe.png");
        let img = image::RgbaImage::from_pixel(24, 16, image::Rgba([1, 2, 3, 255]));
        img.save(&path).unwrap();

        assert_eq!(probe_dimensions(&path).unwrap(), (24, 16));
    }
}
