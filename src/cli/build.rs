//! Build command implementation.
//!
//! Runs the full pipeline for every tracked image: quantize a palette,
//! index the pixels, pack the tiles, then write the `.pal` and
//! `_map.tmx` artifacts beside the source image.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use clap::Args;
use notify::{RecursiveMode, Watcher};

use crate::config::Manifest;
use crate::encode::{encode_map, pack_4bpp, sample_tile, write_pal, MapDocument};
use crate::error::{PrioError, Result};
use crate::output::{display_path, plural, Printer};
use crate::quantize::{derive_palette, index_image, MedianCut};
use crate::raster::{ImageRaster, Raster};
use crate::selection::{ImageEntry, SelectionStore};

/// Build palette and map files for every tracked image
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Selection document to build from (default: the manifest's
    /// document setting, or tile_priorities.json)
    pub document: Option<PathBuf>,

    /// Keep running and rebuild when the document or an image changes
    #[arg(long)]
    pub watch: bool,
}

/// Tally of per-entry outcomes from one pass over the document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildOutcome {
    pub built: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let document = resolve_document(args.document.as_deref())?;

    build_document(&document, printer)?;

    if args.watch {
        watch(&document, printer)?;
    }

    Ok(())
}

/// Pick the document path from the argument, the manifest, or the default.
fn resolve_document(arg: Option<&Path>) -> Result<PathBuf> {
    match arg {
        Some(path) => Ok(path.to_path_buf()),
        None => {
            let root = PathBuf::from(".");
            let manifest = Manifest::discover(&root)?;
            Ok(manifest.document_path(&root))
        }
    }
}

/// Run the pipeline over every entry in the document.
///
/// Per-entry problems are reported and counted; only fatal conditions
/// (an unreadable document, a palette that cannot be derived) propagate.
pub fn build_document(document: &Path, printer: &Printer) -> Result<BuildOutcome> {
    let store = SelectionStore::load(document)?;
    let root = document
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut outcome = BuildOutcome::default();

    if store.is_empty() {
        printer.info("Empty", "no images tracked; nothing to build");
        return Ok(outcome);
    }

    for entry in store.entries() {
        match build_entry(entry, &root, printer) {
            Ok(()) => outcome.built += 1,
            Err(e) if e.is_skip() => {
                printer.warning("Skipping", &e.to_string());
                outcome.skipped += 1;
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                printer.error("Failed", &e.to_string());
                outcome.failed += 1;
            }
        }
    }

    printer.success(
        "Finished",
        &format!(
            "{}, {} skipped, {} failed",
            plural(outcome.built, "image built", "images built"),
            outcome.skipped,
            outcome.failed
        ),
    );

    Ok(outcome)
}

/// Build one entry: a palette file and a map document beside the source.
fn build_entry(entry: &ImageEntry, root: &Path, printer: &Printer) -> Result<()> {
    let source = root.join(&entry.path);
    if !source.exists() {
        return Err(PrioError::MissingSource { path: source });
    }

    printer.status("Building", &display_path(&source));

    let raster = ImageRaster::open(&source)?;
    entry.check_dimensions(raster.width(), raster.height())?;

    let palette = derive_palette(&MedianCut, &raster, &source)?;
    let indexed = index_image(&raster, &palette);

    let mut tiles = Vec::with_capacity(entry.tile_count());
    for ty in 0..entry.height {
        for tx in 0..entry.width {
            tiles.push(pack_4bpp(&sample_tile(&indexed, tx, ty)));
        }
    }

    let grid = encode_map(entry, &tiles)?;

    let pal = pal_path(&source);
    write_pal(&palette, &pal)?;
    printer.success("Wrote", &display_path(&pal));

    let image_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| entry.path.clone());
    let map = map_path(&source);
    MapDocument::new(&image_name, raster.width(), raster.height(), &grid).write(&map)?;
    printer.success("Wrote", &display_path(&map));

    Ok(())
}

/// Palette file path for a source image: `beach.png` -> `beach.pal`.
fn pal_path(source: &Path) -> PathBuf {
    source.with_extension("pal")
}

/// Map document path for a source image: `beach.png` -> `beach_map.tmx`.
fn map_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "map".to_string());
    source.with_file_name(format!("{}_map.tmx", stem))
}

type WatchEvent = std::result::Result<notify::Event, notify::Error>;

/// Rebuild whenever the document or a source image changes.
///
/// Watches the document's directory, non-recursive. Saves arrive as a
/// tmp-file write followed by a rename onto the document, so events are
/// drained for a short window before each rebuild.
fn watch(document: &Path, printer: &Printer) -> Result<()> {
    let dir = document
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |event: WatchEvent| {
        let _ = tx.send(event);
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    printer.info("Watching", &display_path(&dir));

    loop {
        let first = match rx.recv() {
            Ok(event) => event,
            Err(_) => return Ok(()),
        };

        let mut relevant = event_is_relevant(&first, document);
        while let Ok(event) = rx.recv_timeout(Duration::from_millis(200)) {
            relevant |= event_is_relevant(&event, document);
        }

        if !relevant {
            continue;
        }

        printer.status("Rebuilding", &display_path(document));
        if let Err(e) = build_document(document, printer) {
            printer.error("Error", &e.to_string());
        }
    }
}

/// Decide whether an event should trigger a rebuild.
///
/// Only the document itself and `.png` files count; writes to generated
/// `.pal`/`.tmx` artifacts must not retrigger the loop.
fn event_is_relevant(event: &WatchEvent, document: &Path) -> bool {
    let event = match event {
        Ok(event) => event,
        // An error from the watcher means events may have been lost.
        Err(_) => return true,
    };

    if event.kind.is_access() {
        return false;
    }
    if event.paths.is_empty() {
        return true;
    }

    event.paths.iter().any(|p| {
        p.file_name() == document.file_name()
            || p.extension().and_then(|e| e.to_str()) == Some("png")
    })
}
