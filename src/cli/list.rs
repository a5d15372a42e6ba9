//! List command implementation.
//!
//! Prints the tracked-image inventory from the selection document, and
//! optionally the `.png` files in the document's directory that have no
//! entry yet.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use clap::Args;
use walkdir::WalkDir;

use crate::config::Manifest;
use crate::error::Result;
use crate::output::{plural, Printer};
use crate::selection::SelectionStore;

/// List tracked images and their selections
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Selection document to read
    #[arg(long)]
    pub document: Option<PathBuf>,

    /// Also list .png files under the document directory with no entry
    #[arg(long)]
    pub untracked: bool,
}

pub fn run(args: ListArgs, printer: &Printer) -> Result<()> {
    let document = match &args.document {
        Some(path) => path.clone(),
        None => {
            let root = PathBuf::from(".");
            Manifest::discover(&root)?.document_path(&root)
        }
    };

    let store = SelectionStore::load(&document)?;
    let root = document
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if store.is_empty() {
        printer.info("Empty", "no images tracked");
    }

    for entry in store.entries() {
        let detail = format!(
            "{}x{} tiles, {}",
            entry.width,
            entry.height,
            plural(entry.priority_tiles.len(), "priority tile", "priority tiles")
        );

        if root.join(&entry.path).exists() {
            printer.info(
                "Tracked",
                &format!("{} {}", entry.path, printer.dim(&format!("({})", detail))),
            );
        } else {
            printer.warning(
                "Missing",
                &format!(
                    "{} {}",
                    entry.path,
                    printer.dim(&format!("({}, source not found)", detail))
                ),
            );
        }
    }

    if args.untracked {
        for key in untracked_images(&store, &root) {
            printer.info("Untracked", &key);
        }
    }

    Ok(())
}

/// Find `.png` files under the root that no entry tracks, sorted.
fn untracked_images(store: &SelectionStore, root: &Path) -> Vec<String> {
    let tracked: HashSet<&str> = store.entries().iter().map(|e| e.path.as_str()).collect();

    let mut found = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }

        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if !is_png {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let key = relative.to_string_lossy();
        if !tracked.contains(key.as_ref()) {
            found.push(key.into_owned());
        }
    }

    found.sort();
    found
}
