//! Validation checks for the selection document.
//!
//! Each check takes the document's entries and returns a
//! `ValidationResult`. Structural checks are pure; source checks probe
//! image headers on disk but never decode pixel data.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::raster::probe_dimensions;
use crate::selection::ImageEntry;
use crate::types::TileCoord;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity level.
    pub severity: Severity,
    /// Machine-readable diagnostic code (e.g. "priomap::validate::duplicate-path").
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

/// Collects diagnostics from validation checks.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if there are any errors.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Warning)
    }

    /// Count errors.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    /// Count warnings.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Check if there are no diagnostics at all.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Merge another result into this one.
    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Iterate over diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

/// Check for image paths that appear in more than one entry.
///
/// Lookups only ever find the first entry, so duplicates silently shadow
/// each other's selections.
pub fn check_duplicate_paths(entries: &[ImageEntry]) -> ValidationResult {
    let mut result = ValidationResult::new();

    let mut seen: HashSet<&str> = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.path.as_str()) {
            result.push(
                Diagnostic::error(
                    "priomap::validate::duplicate-path",
                    format!("'{}' appears more than once in the document", entry.path),
                )
                .with_help("Merge the duplicate entries; only the first one is ever used"),
            );
        }
    }

    result
}

/// Check for coordinates listed twice within one entry.
pub fn check_duplicate_coordinates(entries: &[ImageEntry]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for entry in entries {
        let mut seen: HashSet<TileCoord> = HashSet::new();
        for &coord in &entry.priority_tiles {
            if !seen.insert(coord) {
                result.push(Diagnostic::warning(
                    "priomap::validate::duplicate-coordinate",
                    format!("'{}': tile {} is listed more than once", entry.path, coord),
                ));
            }
        }
    }

    result
}

/// Check that every marked coordinate lies inside its entry's grid.
pub fn check_coordinate_bounds(entries: &[ImageEntry]) -> ValidationResult {
    let mut result = ValidationResult::new();

    for entry in entries {
        for &coord in &entry.priority_tiles {
            if !entry.in_grid(coord) {
                result.push(
                    Diagnostic::error(
                        "priomap::validate::coordinate-range",
                        format!(
                            "'{}': tile {} is outside the {}x{} grid",
                            entry.path, coord, entry.width, entry.height
                        ),
                    )
                    .with_help("Remove the coordinate or re-mark the image"),
                );
            }
        }
    }

    result
}

/// Check each entry's source image on disk.
///
/// A missing file is a warning (builds skip it and it may reappear); a
/// grid that contradicts the real raster is an error because the recorded
/// selections no longer mean anything.
pub fn check_sources(entries: &[ImageEntry], base: &Path) -> ValidationResult {
    let mut result = ValidationResult::new();

    for entry in entries {
        let source = base.join(&entry.path);
        if !source.exists() {
            result.push(
                Diagnostic::warning(
                    "priomap::validate::missing-source",
                    format!("'{}' does not exist under {}", entry.path, base.display()),
                )
                .with_help("Builds skip this entry until the image returns"),
            );
            continue;
        }

        match probe_dimensions(&source) {
            Err(e) => {
                result.push(
                    Diagnostic::error(
                        "priomap::validate::unreadable-source",
                        format!("'{}' is not a readable image", entry.path),
                    )
                    .with_help(e.to_string()),
                );
            }
            Ok((width, height)) => {
                if entry.check_dimensions(width, height).is_err() {
                    result.push(
                        Diagnostic::error(
                            "priomap::validate::dimension-mismatch",
                            format!(
                                "'{}' declares a {}x{} tile grid but the image is {}x{} pixels",
                                entry.path, entry.width, entry.height, width, height
                            ),
                        )
                        .with_help("Fix the document or re-mark the resized image"),
                    );
                }
            }
        }
    }

    result
}
