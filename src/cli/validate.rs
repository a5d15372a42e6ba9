//! Validate command implementation.
//!
//! Loads the selection document, runs every check and prints the
//! diagnostics. Errors fail the command; warnings alone pass.

use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::Manifest;
use crate::error::{PrioError, Result};
use crate::output::{display_path, plural, Printer};
use crate::selection::SelectionStore;
use crate::validation::{print_diagnostics, validate_store};

/// Check the selection document without building
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Selection document to check (default: the manifest's document
    /// setting, or tile_priorities.json)
    pub document: Option<PathBuf>,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let document = match &args.document {
        Some(path) => path.clone(),
        None => {
            let root = PathBuf::from(".");
            Manifest::discover(&root)?.document_path(&root)
        }
    };

    printer.status("Checking", &display_path(&document));

    let store = SelectionStore::load(&document)?;
    let root = document
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let result = validate_store(&store, &root);
    print_diagnostics(&result, printer);

    if result.has_errors() {
        return Err(PrioError::Validation {
            message: format!(
                "{}, {}",
                plural(result.error_count(), "error", "errors"),
                plural(result.warning_count(), "warning", "warnings")
            ),
            help: Some("Fix the entries flagged above and run validate again".to_string()),
        });
    }

    if result.has_warnings() {
        printer.success(
            "Passed",
            &format!("with {}", plural(result.warning_count(), "warning", "warnings")),
        );
    } else {
        printer.success(
            "Passed",
            &plural(store.len(), "entry checked", "entries checked"),
        );
    }

    Ok(())
}
