//! Errors raised while writing a property.
//!
//! ## HTTP Mapping
//!
//! The surrounding request pipeline decides the response, [`Error::status`]
//! gives the baseline:
//! - `Configuration` → 404 (the request does not address a property)
//! - `UnsupportedType` → 501
//! - `TypeMismatch`, `Schema`, `Render` → 500 (the data disagrees with the model)

use http::StatusCode;
use modkit_odata_edm::EdmError;
use thiserror::Error;

/// Failure reported by a [`PropertyFormat`](crate::PropertyFormat) implementation.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct RenderError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RenderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// The request does not resolve to a target type.
    #[error("target type could not be resolved: {0}")]
    Configuration(String),

    /// The value's type or cardinality disagrees with the declared type.
    #[error("property type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error(transparent)]
    Schema(#[from] EdmError),

    /// The declared type has no rendering branch.
    #[error("unhandled object type {0}")]
    UnsupportedType(String),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl Error {
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    #[must_use]
    pub fn type_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    #[must_use]
    pub fn unsupported_type(type_name: impl Into<String>) -> Self {
        Self::UnsupportedType(type_name.into())
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Configuration(_) => StatusCode::NOT_FOUND,
            Error::UnsupportedType(_) => StatusCode::NOT_IMPLEMENTED,
            Error::TypeMismatch { .. } | Error::Schema(_) | Error::Render(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
