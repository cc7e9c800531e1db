//! Error types for template loading.
//!
//! All failure modes of the loader surface as [`LoadError`]. Variants are
//! strongly typed so callers can match on the failure mode, and every variant
//! carries the template name it concerns so a failure deep in an ancestor
//! chain still identifies which member broke.

use std::io;

use thiserror::Error;

/// Errors produced while loading, parsing, or rendering a template.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The named template does not exist in the backing source.
    #[error("template '{name}' not found")]
    NotFound {
        /// Name the load was requested under.
        name: String,
        #[source]
        source: io::Error,
    },

    /// The named template exists but could not be read, or its content is
    /// not valid UTF-8.
    #[error("failed to read template '{name}'")]
    Read {
        /// Name the load was requested under.
        name: String,
        #[source]
        source: io::Error,
    },

    /// The template source (root content or a merged child fragment) is not
    /// valid template syntax.
    #[error("failed to parse template '{name}'")]
    Parse {
        /// Chain member that failed to parse.
        name: String,
        #[source]
        source: Box<tera::Error>,
    },

    /// A parent declared by `name` failed to load. Wraps the underlying
    /// failure rather than replacing it, so the full chain stays visible.
    #[error("failed to load parent '{parent}' of '{name}'")]
    Ancestor {
        /// Template whose declaration pulled in the parent.
        name: String,
        /// Parent name extracted from the declaration.
        parent: String,
        #[source]
        source: Box<LoadError>,
    },

    /// Executing a compiled template against a data context failed.
    #[error("failed to render template '{name}'")]
    Render {
        /// Entry-point name that was being rendered.
        name: String,
        #[source]
        source: Box<tera::Error>,
    },
}

impl LoadError {
    /// The template name the error concerns.
    ///
    /// For [`LoadError::Ancestor`] this is the declaring child; the failing
    /// parent is available through the wrapped source.
    pub fn name(&self) -> &str {
        match self {
            Self::NotFound { name, .. }
            | Self::Read { name, .. }
            | Self::Parse { name, .. }
            | Self::Ancestor { name, .. }
            | Self::Render { name, .. } => name,
        }
    }

    /// True when the root cause anywhere in the chain is a missing template.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Ancestor { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
