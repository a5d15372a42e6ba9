//! The selection document on disk.
//!
//! Selections live in a small JSON document next to the images they
//! describe. The current shape is a versioned envelope:
//!
//! ```json
//! {
//!   "version": 1,
//!   "images": [
//!     { "path": "beach.png", "width": 4, "height": 4,
//!       "priority_tiles": [{ "x": 1, "y": 0 }] }
//!   ]
//! }
//! ```
//!
//! Earlier documents were a bare entry array; those still load and are
//! rewritten in the envelope shape on the next save. Saves go through a
//! temporary file and a rename, so a crash mid-write never leaves a
//! half-written document behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrioError, Result};
use crate::types::TILE_SIZE;

use super::entry::ImageEntry;

/// Document shape version this build reads and writes.
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
struct DocumentEnvelope {
    version: u32,
    images: Vec<ImageEntry>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    images: &'a [ImageEntry],
}

/// The in-memory selection document, bound to its file path.
#[derive(Debug)]
pub struct SelectionStore {
    path: PathBuf,
    entries: Vec<ImageEntry>,
}

impl SelectionStore {
    /// Load a document, treating an absent file as an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self {
                path: path.to_path_buf(),
                entries: Vec::new(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| PrioError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read selection document: {}", e),
        })?;
        let entries = parse_document(&content)?;

        for entry in &entries {
            if entry.width == 0 || entry.height == 0 {
                return Err(PrioError::Storage {
                    message: format!("entry '{}' has a zero-sized tile grid", entry.path),
                    help: Some("width and height are tile counts and must be positive".to_string()),
                });
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// The document's file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tracked entries, in document order.
    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the entry for an image key, or create one sized from the
    /// raster's pixel dimensions.
    ///
    /// The grid is the pixel size divided by the tile size; remainder
    /// pixels are dropped unless `strict` is set, in which case an
    /// unaligned raster is an error. Rasters smaller than one tile are
    /// always rejected. An existing entry is returned as-is, whatever the
    /// raster looks like today.
    pub fn get_or_create(
        &mut self,
        key: &str,
        pixel_width: u32,
        pixel_height: u32,
        strict: bool,
    ) -> Result<&mut ImageEntry> {
        if let Some(index) = self.entries.iter().position(|e| e.path == key) {
            return Ok(&mut self.entries[index]);
        }

        if strict && (pixel_width % TILE_SIZE != 0 || pixel_height % TILE_SIZE != 0) {
            return Err(PrioError::DimensionMismatch {
                path: PathBuf::from(key),
                expected: "tile-aligned dimensions".to_string(),
                actual: format!("{}x{}", pixel_width, pixel_height),
            });
        }

        let width = pixel_width / TILE_SIZE;
        let height = pixel_height / TILE_SIZE;
        if width == 0 || height == 0 {
            return Err(PrioError::DimensionMismatch {
                path: PathBuf::from(key),
                expected: format!("at least {0}x{0}", TILE_SIZE),
                actual: format!("{}x{}", pixel_width, pixel_height),
            });
        }

        let index = self.entries.len();
        self.entries.push(ImageEntry::new(key, width, height));
        Ok(&mut self.entries[index])
    }

    /// Write the document back to its path.
    ///
    /// The JSON is written to `<path>.tmp` and renamed into place.
    pub fn save(&self) -> Result<()> {
        let envelope = EnvelopeRef {
            version: DOCUMENT_VERSION,
            images: &self.entries,
        };
        let mut json = serde_json::to_string_pretty(&envelope).map_err(|e| PrioError::Storage {
            message: format!("failed to serialize the selection document: {}", e),
            help: None,
        })?;
        json.push('\n');

        let mut tmp = self.path.as_os_str().to_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &json).map_err(|e| PrioError::Io {
            path: tmp.clone(),
            message: format!("Failed to write selection document: {}", e),
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| PrioError::Io {
            path: self.path.clone(),
            message: format!("Failed to replace selection document: {}", e),
        })
    }
}

/// Parse either document shape: the versioned envelope or the legacy
/// bare entry array.
fn parse_document(content: &str) -> Result<Vec<ImageEntry>> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| PrioError::Storage {
        message: format!("invalid JSON: {}", e),
        help: None,
    })?;

    match value {
        serde_json::Value::Object(_) => {
            let envelope: DocumentEnvelope =
                serde_json::from_value(value).map_err(|e| PrioError::Storage {
                    message: format!("malformed selection document: {}", e),
                    help: Some(
                        "expected {\"version\": 1, \"images\": [...]} or a bare entry array"
                            .to_string(),
                    ),
                })?;
            if envelope.version != DOCUMENT_VERSION {
                return Err(PrioError::Storage {
                    message: format!(
                        "unsupported selection document version {}",
                        envelope.version
                    ),
                    help: Some(format!("this build reads version {}", DOCUMENT_VERSION)),
                });
            }
            Ok(envelope.images)
        }
        serde_json::Value::Array(_) => {
            serde_json::from_value(value).map_err(|e| PrioError::Storage {
                message: format!("malformed selection entry: {}", e),
                help: None,
            })
        }
        _ => Err(PrioError::Storage {
            message: "selection document must be an object or an entry array".to_string(),
            help: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileCoord;

    fn temp_doc(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile_priorities.json");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_absent_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SelectionStore::load(&dir.path().join("missing.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_versioned_envelope() {
        let (_dir, path) = temp_doc(
            r#"{"version":1,"images":[{"path":"beach.png","width":2,"height":2,"priority_tiles":[{"x":1,"y":0}]}]}"#,
        );
        let store = SelectionStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].path, "beach.png");
        assert_eq!(store.entries()[0].priority_tiles, vec![TileCoord::new(1, 0)]);
    }

    #[test]
    fn test_load_legacy_array() {
        let (_dir, path) =
            temp_doc(r#"[{"path":"beach.png","width":2,"height":2,"priority_tiles":[]}]"#);
        let store = SelectionStore::load(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.entries()[0].path, "beach.png");
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let (_dir, path) = temp_doc(r#"{"version":9,"images":[]}"#);
        let err = SelectionStore::load(&path).unwrap_err();
        assert!(matches!(err, PrioError::Storage { .. }));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let (_dir, path) = temp_doc("not json at all");
        assert!(SelectionStore::load(&path).is_err());

        let (_dir, path) = temp_doc(r#""just a string""#);
        let err = SelectionStore::load(&path).unwrap_err();
        assert!(matches!(err, PrioError::Storage { .. }));
    }

    #[test]
    fn test_load_rejects_zero_sized_grid() {
        let (_dir, path) =
            temp_doc(r#"{"version":1,"images":[{"path":"beach.png","width":0,"height":2}]}"#);
        let err = SelectionStore::load(&path).unwrap_err();
        assert!(matches!(err, PrioError::Storage { .. }));
    }

    #[test]
    fn test_get_or_create_truncates_remainder() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SelectionStore::load(&dir.path().join("doc.json")).unwrap();

        let entry = store.get_or_create("beach.png", 17, 25, false).unwrap();
        assert_eq!((entry.width, entry.height), (2, 3));
    }

    #[test]
    fn test_get_or_create_strict_rejects_unaligned() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SelectionStore::load(&dir.path().join("doc.json")).unwrap();

        let err = store.get_or_create("beach.png", 17, 24, true).unwrap_err();
        assert!(matches!(err, PrioError::DimensionMismatch { .. }));

        // Aligned rasters pass in strict mode
        assert!(store.get_or_create("beach.png", 16, 24, true).is_ok());
    }

    #[test]
    fn test_get_or_create_rejects_sub_tile_raster() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SelectionStore::load(&dir.path().join("doc.json")).unwrap();

        let err = store.get_or_create("dot.png", 4, 16, false).unwrap_err();
        assert!(matches!(err, PrioError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_get_or_create_returns_existing() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SelectionStore::load(&dir.path().join("doc.json")).unwrap();

        store
            .get_or_create("beach.png", 16, 16, false)
            .unwrap()
            .toggle(TileCoord::new(0, 0), true)
            .unwrap();

        // Stale pixel dimensions do not resize an existing entry
        let entry = store.get_or_create("beach.png", 64, 64, false).unwrap();
        assert_eq!((entry.width, entry.height), (2, 2));
        assert!(entry.contains(TileCoord::new(0, 0)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let mut store = SelectionStore::load(&path).unwrap();
        store
            .get_or_create("beach.png", 16, 16, false)
            .unwrap()
            .toggle(TileCoord::new(1, 0), true)
            .unwrap();
        store.save().unwrap();

        // The temporary file never survives a save
        assert!(!dir.path().join("doc.json.tmp").exists());

        let reloaded = SelectionStore::load(&path).unwrap();
        assert_eq!(reloaded.entries(), store.entries());
    }

    #[test]
    fn test_save_writes_versioned_envelope() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");

        let mut store = SelectionStore::load(&path).unwrap();
        store.get_or_create("beach.png", 16, 16, false).unwrap();
        store.save().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["images"][0]["path"], "beach.png");
    }

    #[test]
    fn test_save_upgrades_legacy_document() {
        let (_dir, path) =
            temp_doc(r#"[{"path":"beach.png","width":2,"height":2,"priority_tiles":[]}]"#);

        let store = SelectionStore::load(&path).unwrap();
        store.save().unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
    }
}
