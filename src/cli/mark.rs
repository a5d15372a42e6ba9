//! Mark command implementation.
//!
//! Adds or removes high priority tile coordinates for an image and saves
//! the selection document. Creates the image's entry on first use, sized
//! from the raster's pixel dimensions.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Manifest;
use crate::error::{PrioError, Result};
use crate::output::{plural, Printer};
use crate::raster::probe_dimensions;
use crate::selection::SelectionStore;
use crate::types::TileCoord;

/// Mark or unmark high priority tiles on an image
#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Image file whose tiles are being marked
    pub image: PathBuf,

    /// Tile coordinates as x,y pairs (tile units, origin top-left)
    #[arg(required = true)]
    pub coords: Vec<TileCoord>,

    /// Unmark the coordinates instead of marking them
    #[arg(long)]
    pub remove: bool,

    /// Reject images whose pixel dimensions are not tile-aligned
    #[arg(long)]
    pub strict: bool,

    /// Selection document to update
    #[arg(long)]
    pub document: Option<PathBuf>,
}

pub fn run(args: MarkArgs, printer: &Printer) -> Result<()> {
    // The manifest governing a document lives beside it.
    let (document, manifest) = match &args.document {
        Some(path) => {
            let root = parent_dir(path);
            (path.clone(), Manifest::discover(&root)?)
        }
        None => {
            let root = PathBuf::from(".");
            let manifest = Manifest::discover(&root)?;
            (manifest.document_path(&root), manifest)
        }
    };
    let strict = args.strict || manifest.strict;

    let mut store = SelectionStore::load(&document)?;
    let root = parent_dir(&document);

    let key = entry_key(&args.image, &root)?;
    let is_new = !store.entries().iter().any(|e| e.path == key);

    let (pixel_width, pixel_height) = probe_dimensions(&args.image)?;
    let entry = store.get_or_create(&key, pixel_width, pixel_height, strict)?;

    let marked = !args.remove;
    let mut changed = 0usize;
    let mut unchanged = 0usize;
    let coords: BTreeSet<TileCoord> = args.coords.iter().copied().collect();
    for coord in coords {
        if entry.toggle(coord, marked)? {
            changed += 1;
        } else {
            unchanged += 1;
        }
    }

    store.save()?;

    if is_new {
        printer.info("Tracking", &key);
    }

    let verb = if marked { "Marked" } else { "Cleared" };
    let mut message = format!("{} on {}", plural(changed, "tile", "tiles"), key);
    if unchanged > 0 {
        let state = if marked { "marked" } else { "clear" };
        message.push_str(&format!(" ({} already {})", unchanged, state));
    }
    printer.success(verb, &message);

    Ok(())
}

/// Parent directory of a path, defaulting to the current directory.
fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Derive an entry key: the image path relative to the document directory.
fn entry_key(image: &Path, root: &Path) -> Result<String> {
    let root = root.canonicalize().map_err(|e| PrioError::Io {
        path: root.to_path_buf(),
        message: format!("Failed to resolve document directory: {}", e),
    })?;
    let image = image.canonicalize().map_err(|e| PrioError::Io {
        path: image.to_path_buf(),
        message: format!("Failed to resolve image path: {}", e),
    })?;

    let relative = image.strip_prefix(&root).map_err(|_| PrioError::Build {
        message: format!(
            "{} is outside the document directory {}",
            image.display(),
            root.display()
        ),
        help: Some("Move the image under the document's directory or pass --document".to_string()),
    })?;

    Ok(relative.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([40, 80, 120, 255]));
        img.save(path).unwrap();
    }

    fn mark_args(dir: &Path, image: &str, coords: &[(u32, u32)]) -> MarkArgs {
        MarkArgs {
            image: dir.join(image),
            coords: coords.iter().map(|&(x, y)| TileCoord::new(x, y)).collect(),
            remove: false,
            strict: false,
            document: Some(dir.join("tile_priorities.json")),
        }
    }

    #[test]
    fn test_mark_creates_entry_and_saves() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("beach.png"), 16, 16);

        run(mark_args(dir.path(), "beach.png", &[(1, 0)]), &Printer::new()).unwrap();

        let store = SelectionStore::load(&dir.path().join("tile_priorities.json")).unwrap();
        assert_eq!(store.len(), 1);
        let entry = &store.entries()[0];
        assert_eq!(entry.path, "beach.png");
        assert_eq!((entry.width, entry.height), (2, 2));
        assert_eq!(entry.priority_tiles, vec![TileCoord::new(1, 0)]);
    }

    #[test]
    fn test_mark_then_remove_restores_empty_set() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("beach.png"), 16, 16);

        run(mark_args(dir.path(), "beach.png", &[(1, 1)]), &Printer::new()).unwrap();

        let mut args = mark_args(dir.path(), "beach.png", &[(1, 1)]);
        args.remove = true;
        run(args, &Printer::new()).unwrap();

        let store = SelectionStore::load(&dir.path().join("tile_priorities.json")).unwrap();
        assert!(store.entries()[0].priority_tiles.is_empty());
    }

    #[test]
    fn test_mark_is_idempotent() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("beach.png"), 16, 16);

        run(mark_args(dir.path(), "beach.png", &[(0, 0)]), &Printer::new()).unwrap();
        run(
            mark_args(dir.path(), "beach.png", &[(0, 0), (1, 0)]),
            &Printer::new(),
        )
        .unwrap();

        let store = SelectionStore::load(&dir.path().join("tile_priorities.json")).unwrap();
        assert_eq!(
            store.entries()[0].priority_tiles,
            vec![TileCoord::new(0, 0), TileCoord::new(1, 0)]
        );
    }

    #[test]
    fn test_mark_rejects_out_of_grid_coordinate() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("beach.png"), 16, 16);

        let result = run(mark_args(dir.path(), "beach.png", &[(9, 9)]), &Printer::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_mark_strict_rejects_unaligned_image() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("odd.png"), 17, 16);

        let mut args = mark_args(dir.path(), "odd.png", &[(0, 0)]);
        args.strict = true;
        let result = run(args, &Printer::new());
        assert!(matches!(result, Err(PrioError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_mark_truncates_unaligned_image_by_default() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("odd.png"), 17, 25);

        run(mark_args(dir.path(), "odd.png", &[(1, 2)]), &Printer::new()).unwrap();

        let store = SelectionStore::load(&dir.path().join("tile_priorities.json")).unwrap();
        assert_eq!((store.entries()[0].width, store.entries()[0].height), (2, 3));
    }

    #[test]
    fn test_mark_rejects_image_outside_document_directory() {
        let dir = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        write_png(&elsewhere.path().join("far.png"), 16, 16);

        let mut args = mark_args(dir.path(), "unused.png", &[(0, 0)]);
        args.image = elsewhere.path().join("far.png");
        let result = run(args, &Printer::new());
        assert!(matches!(result, Err(PrioError::Build { .. })));
    }

    #[test]
    fn test_entry_key_is_relative_to_document_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("art")).unwrap();
        write_png(&dir.path().join("art/beach.png"), 16, 16);

        let key = entry_key(&dir.path().join("art/beach.png"), dir.path()).unwrap();
        assert_eq!(key, "art/beach.png");
    }
}
