//! Load errors for components, scenes and configuration files.
//!
//! Anything that reads structured data (component blobs, scene files, layer
//! configuration, input scripts) reports failures through [`LoadError`].
//! The per-frame path never produces these: runtime problems such as a
//! missing sibling component are handled by the component disabling itself.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Error)]
pub enum LoadError {
    /// A required key is absent from a component blob.
    #[error("{component}: missing required field '{field}'")]
    MissingField {
        component: String,
        field: &'static str,
    },

    /// A key is present but holds a value of the wrong shape.
    #[error("{component}: field '{field}' must be {expected}")]
    InvalidField {
        component: String,
        field: &'static str,
        expected: &'static str,
    },

    /// No factory is registered under this type name.
    #[error("unknown component type '{0}'")]
    UnknownComponentType(String),

    /// The scene document itself does not have the expected layout.
    #[error("malformed scene: {0}")]
    MalformedScene(String),

    /// The frame schedule could not be built.
    #[error("failed to initialize schedule: {0}")]
    Schedule(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Helper for wrapping an I/O failure together with the path involved.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for [`LoadError::MissingField`].
    pub fn is_missing_field(&self) -> bool {
        matches!(self, LoadError::MissingField { .. })
    }
}
