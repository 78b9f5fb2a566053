//! Error types for the coldstart pipeline

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error type.
///
/// Every stage reports prerequisite and library problems through these
/// variants so callers can attach remediation text; unexpected I/O and JSON
/// failures carry the path they occurred on.
#[derive(Debug, Error)]
pub enum Error {
    /// A stage required a staging or persisted config that does not exist.
    #[error("configuration not found at {}: {hint}", path.display())]
    ConfigMissing {
        /// Path that was probed.
        path: PathBuf,
        /// Which prerequisite stage to run.
        hint: String,
    },

    /// The target directory has no recoverable configuration source.
    #[error("project at {} is not initialized; run `init-config` to create project.json", path.display())]
    ProjectNotInitialized {
        /// Target project directory.
        path: PathBuf,
    },

    /// A required template artifact is absent from the library.
    #[error("template library artifact missing: {}", path.display())]
    TemplateNotFound {
        /// Missing artifact path.
        path: PathBuf,
    },

    /// A required module parameter received no value and has no default.
    #[error("module parameter `{name}` is required and has no default value")]
    MissingRequiredParameter {
        /// Parameter name as declared in module.config.json.
        name: String,
    },

    /// A mandatory interactive selection was cancelled or out of range.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Template rendering failed.
    #[error("failed to render template `{name}`")]
    Render {
        /// Logical template name.
        name: String,
        /// Underlying engine error.
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// Filesystem operation failed.
    #[error("I/O error on {}", path.display())]
    Io {
        /// Path the operation touched.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A persisted document is not syntactically valid JSON.
    #[error("invalid JSON in {}", path.display())]
    Json {
        /// Offending document.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// Wraps an I/O error with the path it occurred on.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Wraps a JSON parse/serialize error with the document path.
    #[must_use]
    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }

    /// Wraps a rendering error with the logical template name.
    #[must_use]
    pub fn render(name: impl Into<String>, source: handlebars::RenderError) -> Self {
        Self::Render {
            name: name.into(),
            source: Box::new(source),
        }
    }
}
