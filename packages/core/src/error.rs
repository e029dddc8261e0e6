//! Error types for the resource layer.
//!
//! Absence is not an error for existence checks and enumeration; only
//! `load` and the handler's `get` turn it into one.

use std::path::PathBuf;

use crate::{ResourceId, ResourceKind};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No loader in the namespace holds the identifier.
    #[error("Resource with name {name} and type {kind} wasn't found")]
    NotFound { name: String, kind: ResourceKind },

    /// The handler was asked for its root before one was installed.
    #[error(
        "Resource loader wasn't initialized. Make sure that you set one via ResourceHandler::initialize"
    )]
    NotInitialized,

    /// A root loader was installed twice.
    #[error("Resource loader was already initialized")]
    AlreadyInitialized,

    /// Resolving an alias led back to an alias already being resolved.
    #[error("Alias cycle detected while resolving {name} of type {kind}")]
    AliasCycle { name: String, kind: ResourceKind },

    /// A configuration document does not have the expected shape.
    #[error("Malformed configuration: {message}")]
    MalformedConfiguration { message: String },

    /// A loader root directory is missing or unusable.
    #[error("Invalid loader root ({}): {message}", .path.display())]
    InvalidRoot { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Build a [`Error::NotFound`] for an identifier.
    pub fn not_found(id: &ResourceId) -> Self {
        Error::NotFound {
            name: id.name().to_string(),
            kind: id.kind(),
        }
    }

    /// Build a [`Error::MalformedConfiguration`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedConfiguration {
            message: message.into(),
        }
    }

    /// True for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
