//! Declarative filesystem layout.
//!
//! A layout is an ordered list of sources. Each source names a mount point
//! and a loader type:
//!
//! ```json
//! {
//!     "sources": [
//!         {"mount": "DATA/", "type": "dir", "path": "data"},
//!         {"mount": "DATA/", "type": "dir", "path": "mods/hd/data"},
//!         {"mount": "DATA/", "type": "map", "path": "config/aliases.json"},
//!         {"mount": "SAVES/", "type": "dir", "path": "saves", "writable": true},
//!         {"mount": "", "type": "memory", "writable": true}
//!     ]
//! }
//! ```
//!
//! List order is registration order, so later sources override earlier ones.

use std::path::{Path, PathBuf};

use layerfs_core::Error;
use serde::{Deserialize, Serialize};

use layerfs_local::directory::DEFAULT_DEPTH;

/// The whole filesystem layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FilesystemConfig {
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// One source: where it is mounted and what backs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceConfig {
    /// Namespace prefix, e.g. `"DATA/"`. Empty mounts at the root.
    #[serde(default)]
    pub mount: String,
    #[serde(flatten)]
    pub loader: LoaderConfig,
}

/// Configuration for a single loader
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LoaderConfig {
    /// Files under a local directory
    Dir {
        path: PathBuf,
        #[serde(default = "default_depth")]
        depth: usize,
        #[serde(default)]
        writable: bool,
    },
    /// Alias table stored as a resource in the sources registered before it
    Map { path: String },
    /// Alias table given inline
    Aliases { entries: serde_json::Value },
    /// Empty in-memory scratch space.
    ///
    /// Configuration cannot fill it, so a read-only `memory` source stays
    /// empty and only reserves its place in the stack.
    Memory {
        #[serde(default)]
        writable: bool,
    },
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

impl LoaderConfig {
    /// True if the loader should accept resource creation.
    pub fn is_writable(&self) -> bool {
        match self {
            LoaderConfig::Dir { writable, .. } | LoaderConfig::Memory { writable } => *writable,
            LoaderConfig::Map { .. } | LoaderConfig::Aliases { .. } => false,
        }
    }
}

impl FilesystemConfig {
    /// Parse a layout from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a layout from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value)?)
    }

    /// Read and parse a layout file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Append a source.
    pub fn push(&mut self, mount: impl Into<String>, loader: LoaderConfig) -> &mut Self {
        self.sources.push(SourceConfig {
            mount: mount.into(),
            loader,
        });
        self
    }
}
