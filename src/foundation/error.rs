use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type ThermaResult<T> = Result<T, ThermaError>;

/// Error taxonomy for extraction, colorization and video assembly.
#[derive(thiserror::Error, Debug)]
pub enum ThermaError {
    /// A source yielded zero usable numeric rows.
    #[error("no data: {0}")]
    NoData(String),

    /// Rows of differing width were handed to a frame constructor.
    #[error("shape mismatch: row {row} has {found} columns, expected {expected}")]
    ShapeMismatch {
        /// Width every row was expected to have.
        expected: usize,
        /// Width actually observed.
        found: usize,
        /// 0-based row index of the first offending row.
        row: usize,
    },

    /// Every source was skipped; nothing to encode.
    #[error("empty sequence: no frames were produced from {sources} source file(s)")]
    EmptySequence {
        /// Number of sources that were attempted.
        sources: usize,
    },

    /// Invalid options or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Video sink failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Filesystem failure with the path that caused it.
    #[error("io error on '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Pass-through for contextual errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ThermaError {
    /// Build a [`ThermaError::NoData`].
    pub fn no_data(msg: impl Into<String>) -> Self {
        Self::NoData(msg.into())
    }

    /// Build a [`ThermaError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ThermaError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ThermaError::Io`] for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the assembler should skip the offending file and keep going.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::NoData(_) | Self::ShapeMismatch { .. } | Self::Validation(_) | Self::Io { .. }
        )
    }
}
