//! Project manifest (priomap.yaml) parsing.
//!
//! The manifest defines project configuration: where the selection
//! document lives and whether marking is strict about image dimensions.
//! Everything is optional; a project without a manifest gets defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PrioError, Result};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "priomap.yaml";

/// Default selection document path, relative to the project root.
pub const DEFAULT_DOCUMENT: &str = "tile_priorities.json";

/// Project manifest loaded from priomap.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Selection document path, relative to the project root.
    #[serde(default = "default_document")]
    pub document: PathBuf,

    /// Reject images whose pixel dimensions are not tile-aligned.
    #[serde(default)]
    pub strict: bool,
}

fn default_document() -> PathBuf {
    PathBuf::from(DEFAULT_DOCUMENT)
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            document: default_document(),
            strict: false,
        }
    }
}

impl Manifest {
    /// Load manifest from a priomap.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PrioError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| PrioError::Parse {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check priomap.yaml syntax".to_string()),
        })
    }

    /// Find and load the manifest for a project directory.
    ///
    /// Returns defaults when the directory has no priomap.yaml.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(MANIFEST_FILENAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the selection document path against a project root.
    pub fn document_path(&self, root: &Path) -> PathBuf {
        if self.document.is_absolute() {
            self.document.clone()
        } else {
            root.join(&self.document)
        }
    }
}
