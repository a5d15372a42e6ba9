use miette::Diagnostic;
use thiserror::Error;

/// Main error type for priomap operations
#[derive(Error, Diagnostic, Debug)]
pub enum PrioError {
    #[error("IO error: {0}")]
    #[diagnostic(code(priomap::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(priomap::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Parse error: {message}")]
    #[diagnostic(code(priomap::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Validation error: {message}")]
    #[diagnostic(code(priomap::validate))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Build error: {message}")]
    #[diagnostic(code(priomap::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{path}: expected {expected}, found {actual} pixels")]
    #[diagnostic(code(priomap::dimension_mismatch))]
    DimensionMismatch {
        path: std::path::PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Source image not found: {path}")]
    #[diagnostic(code(priomap::missing_source))]
    MissingSource { path: std::path::PathBuf },

    #[error("No palette could be derived from {path}")]
    #[diagnostic(
        code(priomap::palette_unavailable),
        help("Palette derivation samples opaque pixels only; a fully transparent image has none")
    )]
    PaletteUnavailable { path: std::path::PathBuf },

    #[error("Selection document error: {message}")]
    #[diagnostic(code(priomap::storage))]
    Storage {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to write {path}: {message}")]
    #[diagnostic(code(priomap::serialization))]
    Serialization {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Watch error: {0}")]
    #[diagnostic(code(priomap::watch))]
    Watch(#[from] notify::Error),
}

impl PrioError {
    /// True for conditions that abort a whole batch rather than one entry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PrioError::Storage { .. } | PrioError::PaletteUnavailable { .. }
        )
    }

    /// True for per-entry conditions a batch records as skipped and moves past.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            PrioError::DimensionMismatch { .. } | PrioError::MissingSource { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PrioError>;
