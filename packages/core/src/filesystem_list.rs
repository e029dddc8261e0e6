//! FilesystemList: many loaders presented as one namespace.
//!
//! Loaders are kept in registration order, and registration order is
//! priority: a loader added later shadows every earlier loader for the
//! identifiers they share. There are no priority numbers; the list is
//! scanned from the last index down to 0.
//!
//! ```text
//!   add_loader(base)      index 0   lowest priority
//!   add_loader(mod_a)     index 1
//!   add_loader(saves, w)  index 2   highest priority, writable
//! ```
//!
//! Existence and enumeration ask every loader; `load`, `resource_name` and
//! `create_resource` stop at the first (highest priority) match.

use std::collections::{BTreeSet, HashSet};

use crate::{Error, ResourceFilter, ResourceId, ResourceLoader, Stream};

/// A boxed loader owned by a [`FilesystemList`].
pub type LoaderBox = Box<dyn ResourceLoader>;

/// An ordered stack of loaders with last-registered-wins resolution.
///
/// The list is append-only. `add_loader` takes `&mut self`, so it cannot
/// run while the list is shared for reading; once the stack is built it is
/// normally handed to a [`ResourceHandler`](crate::ResourceHandler).
///
/// # Example
///
/// ```rust
/// use layerfs_core::filesystem_list::FilesystemList;
/// use layerfs_core::{ResourceId, ResourceLoader};
///
/// let mut list = FilesystemList::new();
/// // list.add_loader(base_game, false);
/// // list.add_loader(mod_overrides, false);
/// // list.add_loader(save_directory, true);
///
/// assert!(!list.exists_resource(&ResourceId::from_path("a.txt")));
/// ```
#[derive(Default)]
pub struct FilesystemList {
    loaders: Vec<LoaderBox>,
    /// Indices into `loaders` that accept resource creation.
    writable: BTreeSet<usize>,
}

impl FilesystemList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `loader` as the new highest-priority source.
    ///
    /// Returns the loader's index, which is also its priority.
    pub fn add_loader<L: ResourceLoader + 'static>(&mut self, loader: L, writable: bool) -> usize {
        self.add_boxed_loader(Box::new(loader), writable)
    }

    /// Append an already boxed loader.
    pub fn add_boxed_loader(&mut self, loader: LoaderBox, writable: bool) -> usize {
        let index = self.loaders.len();
        tracing::debug!(
            index,
            writable,
            mount_point = loader.mount_point(),
            "registering loader"
        );
        self.loaders.push(loader);
        if writable {
            self.writable.insert(index);
        }
        index
    }

    /// Number of registered loaders.
    pub fn len(&self) -> usize {
        self.loaders.len()
    }

    /// True if no loaders are registered.
    pub fn is_empty(&self) -> bool {
        self.loaders.is_empty()
    }

    /// True if the loader at `index` accepts resource creation.
    pub fn is_writable(&self, index: usize) -> bool {
        self.writable.contains(&index)
    }

    /// The loader at `index`.
    pub fn loader(&self, index: usize) -> Option<&dyn ResourceLoader> {
        self.loaders.get(index).map(|loader| loader.as_ref())
    }

    /// Iterate over loaders in registration (lowest priority first) order.
    pub fn loaders(&self) -> impl Iterator<Item = &dyn ResourceLoader> {
        self.loaders.iter().map(|loader| loader.as_ref())
    }

    /// Index of the loader `load` would read `id` from.
    pub fn provider_of(&self, id: &ResourceId) -> Option<usize> {
        (0..self.loaders.len())
            .rev()
            .find(|&index| self.loaders[index].exists_resource(id))
    }

    /// Check that a resource just created by the loader at `creator` is
    /// what the namespace now resolves for `id`.
    fn verify_created(&self, id: &ResourceId, creator: usize) -> bool {
        match self.provider_of(id) {
            Some(provider) if provider == creator => {}
            Some(provider) => {
                tracing::warn!(
                    resource = %id,
                    creator,
                    provider,
                    "created resource is shadowed by a higher priority loader"
                );
                return false;
            }
            None => {
                tracing::error!(
                    resource = %id,
                    creator,
                    "loader reported a successful creation but the resource does not exist"
                );
                return false;
            }
        }

        match self.load(id) {
            Ok(_) => true,
            Err(error) => {
                tracing::error!(
                    resource = %id,
                    creator,
                    %error,
                    "loader reported a successful creation but the resource cannot be loaded"
                );
                false
            }
        }
    }
}

impl ResourceLoader for FilesystemList {
    fn exists_resource(&self, id: &ResourceId) -> bool {
        self.loaders.iter().any(|loader| loader.exists_resource(id))
    }

    fn load(&self, id: &ResourceId) -> Result<Stream, Error> {
        // Last loader that has it is the overriding version.
        for loader in self.loaders.iter().rev() {
            if loader.exists_resource(id) {
                return loader.load(id);
            }
        }
        Err(Error::not_found(id))
    }

    fn mount_point(&self) -> &str {
        ""
    }

    fn resource_name(&self, id: &ResourceId) -> Option<String> {
        self.resources_with_name(id)
            .last()
            .and_then(|loader| loader.resource_name(id))
    }

    fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId> {
        self.loaders
            .iter()
            .flat_map(|loader| loader.filtered_files(filter))
            .collect()
    }

    fn resources_with_name(&self, id: &ResourceId) -> Vec<&dyn ResourceLoader> {
        self.loaders
            .iter()
            .flat_map(|loader| loader.resources_with_name(id))
            .collect()
    }

    fn create_resource(&self, name: &str, update: bool) -> bool {
        tracing::trace!(name, update, "creating resource");
        let id = ResourceId::from_path(name);
        if !update && self.exists_resource(&id) {
            tracing::debug!(name, "resource already exists, not creating");
            return false;
        }

        for index in self.writable.iter().rev().copied() {
            if self.loaders[index].create_resource(name, update) {
                let verified = self.verify_created(&id, index);
                if verified {
                    tracing::trace!(name, index, "resource created successfully");
                }
                return verified;
            }
        }

        tracing::trace!(name, "failed to create resource");
        false
    }
}
