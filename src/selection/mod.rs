//! Selection-state persistence.
//!
//! Tracks which images feed the pipeline and which of their tiles are
//! marked high priority. This is the single source of truth shared by the
//! marking commands and the batch builder.

mod entry;
mod store;

pub use entry::ImageEntry;
pub use store::{SelectionStore, DOCUMENT_VERSION};
