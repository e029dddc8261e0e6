//! layerfs: a layered virtual filesystem.
//!
//! An ordered stack of loaders (directories, in-memory layers, alias tables)
//! is presented as one namespace. Later-registered loaders shadow earlier
//! ones, so mods, patches and save directories override base content simply
//! by being registered after it.
//!
//! # Example
//!
//! ```rust
//! use layerfs::{FilesystemConfig, FilesystemFactory, ResourceHandler, ResourceLoader};
//! use serde_json::json;
//!
//! let handler = ResourceHandler::new();
//! let config = FilesystemConfig::from_value(json!({
//!     "sources": [
//!         {"mount": "", "type": "memory"},
//!         {"mount": "SAVES/", "type": "memory", "writable": true}
//!     ]
//! }))?;
//! FilesystemFactory::new(&handler).initialize(&config)?;
//!
//! let root = handler.get()?;
//! assert!(root.create_resource("SAVES/slot1.txt", false));
//! # Ok::<(), layerfs::Error>(())
//! ```

pub mod config;
pub mod factory;

pub use config::{FilesystemConfig, LoaderConfig, SourceConfig};
pub use factory::FilesystemFactory;

pub use layerfs_core::filesystem_list::FilesystemList;
pub use layerfs_core::mapped_loader::MappedLoader;
pub use layerfs_core::{
    handler, Bytes, Error, InputStream, ResourceFilter, ResourceHandler, ResourceId,
    ResourceKind, ResourceLoader, Stream, WeakResourceHandler,
};
pub use layerfs_local::{DirectoryLoader, InMemoryLoader};
