//! Build a root [`FilesystemList`] from a [`FilesystemConfig`].

use std::path::PathBuf;

use layerfs_core::filesystem_list::{FilesystemList, LoaderBox};
use layerfs_core::mapped_loader::MappedLoader;
use layerfs_core::{Error, ResourceHandler, ResourceId, ResourceKind, ResourceLoader};
use layerfs_local::{DirectoryLoader, InMemoryLoader};

use crate::config::{FilesystemConfig, LoaderConfig, SourceConfig};

/// Creates loaders from configuration and stacks them.
///
/// Alias loaders resolve through `handler`, so the list this factory builds
/// is meant to be installed into that same handler (see
/// [`FilesystemFactory::initialize`]).
pub struct FilesystemFactory {
    handler: ResourceHandler,
    base_directory: Option<PathBuf>,
}

impl FilesystemFactory {
    /// A factory whose lists are installed into `handler`.
    pub fn new(handler: &ResourceHandler) -> Self {
        Self {
            handler: handler.clone(),
            base_directory: None,
        }
    }

    /// Resolve relative `dir` paths against `base_directory`.
    pub fn with_base_directory(mut self, base_directory: impl Into<PathBuf>) -> Self {
        self.base_directory = Some(base_directory.into());
        self
    }

    /// Build a list holding every configured source, in order.
    pub fn build(&self, config: &FilesystemConfig) -> Result<FilesystemList, Error> {
        let mut list = FilesystemList::new();
        for source in &config.sources {
            let loader = self.create(source, &list)?;
            list.add_boxed_loader(loader, source.loader.is_writable());
        }
        Ok(list)
    }

    /// Build the list and install it as the handler's root.
    pub fn initialize(&self, config: &FilesystemConfig) -> Result<(), Error> {
        if self.handler.is_initialized() {
            return Err(Error::AlreadyInitialized);
        }
        let list = self.build(config)?;
        tracing::debug!(loaders = list.len(), "installing root filesystem");
        self.handler.initialize(list)
    }

    /// Create one loader. `existing` holds the sources registered so far.
    fn create(&self, source: &SourceConfig, existing: &FilesystemList) -> Result<LoaderBox, Error> {
        let mount = source.mount.as_str();
        match &source.loader {
            LoaderConfig::Dir { path, depth, .. } => {
                let path = match &self.base_directory {
                    Some(base) if path.is_relative() => base.join(path),
                    _ => path.clone(),
                };
                Ok(Box::new(DirectoryLoader::with_depth(mount, path, *depth)?))
            }
            LoaderConfig::Map { path } => {
                let id = ResourceId::new(path, ResourceKind::Text);
                let bytes = existing.load(&id)?.read_all()?;
                let entries: serde_json::Value = serde_json::from_slice(&bytes)?;
                Ok(Box::new(MappedLoader::new(mount, &entries, &self.handler)?))
            }
            LoaderConfig::Aliases { entries } => {
                Ok(Box::new(MappedLoader::new(mount, entries, &self.handler)?))
            }
            LoaderConfig::Memory { .. } => Ok(Box::new(InMemoryLoader::new(mount))),
        }
    }
}
