//! Validation for selection documents.
//!
//! Runs a suite of checks against a loaded selection store and reports
//! errors and warnings: structural problems first (duplicate paths, stray
//! coordinates), then a pass over the source images on disk.

mod checks;

pub use checks::{Diagnostic, Severity, ValidationResult};

use std::path::Path;

use crate::output::Printer;
use crate::selection::SelectionStore;

/// Run all validation checks against a selection store.
///
/// Source images are resolved relative to `base`.
pub fn validate_store(store: &SelectionStore, base: &Path) -> ValidationResult {
    let entries = store.entries();

    let mut result = ValidationResult::new();
    result.merge(checks::check_duplicate_paths(entries));
    result.merge(checks::check_duplicate_coordinates(entries));
    result.merge(checks::check_coordinate_bounds(entries));
    result.merge(checks::check_sources(entries, base));
    result
}

/// Print diagnostics to stderr.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    for d in result.iter() {
        let is_error = d.severity == Severity::Error;
        let label = match d.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        eprintln!(
            "  {}[{}]: {}",
            printer.severity(label, is_error),
            d.code,
            d.message
        );
        if let Some(help) = &d.help {
            eprintln!("    help: {}", help);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionStore;

    #[test]
    fn test_validate_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::load(&dir.path().join("absent.json")).unwrap();
        let result = validate_store(&store, dir.path());
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_merges_all_checks() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("tile_priorities.json");
        std::fs::write(
            &doc,
            r#"{
  "version": 1,
  "images": [
    { "path": "beach.png", "width": 2, "height": 2, "priority_tiles": [{ "x": 9, "y": 9 }] },
    { "path": "beach.png", "width": 2, "height": 2 }
  ]
}"#,
        )
        .unwrap();

        let store = SelectionStore::load(&doc).unwrap();
        let result = validate_store(&store, dir.path());

        // One duplicate path, one stray coordinate, two missing sources.
        assert_eq!(result.error_count(), 2);
        assert_eq!(result.warning_count(), 2);
    }

    #[test]
    fn test_validate_clean_store() {
        let dir = tempfile::tempdir().unwrap();
        let img = image::RgbaImage::from_pixel(16, 8, image::Rgba([10, 20, 30, 255]));
        img.save(dir.path().join("strip.png")).unwrap();

        let doc = dir.path().join("tile_priorities.json");
        std::fs::write(
            &doc,
            r#"{
  "version": 1,
  "images": [
    { "path": "strip.png", "width": 2, "height": 1, "priority_tiles": [{ "x": 1, "y": 0 }] }
  ]
}"#,
        )
        .unwrap();

        let store = SelectionStore::load(&doc).unwrap();
        let result = validate_store(&store, dir.path());
        assert!(result.is_ok());
    }
}
