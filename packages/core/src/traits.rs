//! The loader capability every data source implements.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{Error, ResourceId, Stream};

/// A predicate used to filter enumerated identifiers.
pub type ResourceFilter<'a> = &'a dyn Fn(&ResourceId) -> bool;

/// A data source in the resource namespace.
///
/// Reads take `&self` and loaders are `Send + Sync`, so a fully built
/// loader stack can be shared between threads. Creation also takes `&self`;
/// loaders that support it guard their own index.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn ResourceLoader>`.
pub trait ResourceLoader: Send + Sync {
    /// True if this loader holds `id`. Never fails; absence is `false`.
    fn exists_resource(&self, id: &ResourceId) -> bool;

    /// Open `id` for reading.
    ///
    /// # Returns
    ///
    /// * `Ok(stream)` - The resource's bytes.
    /// * `Err(Error::NotFound)` - This loader cannot resolve `id`.
    /// * `Err(_)` - The backing storage failed.
    fn load(&self, id: &ResourceId) -> Result<Stream, Error>;

    /// The namespace prefix this loader owns, or `""` when it has none.
    fn mount_point(&self) -> &str;

    /// The name of the physical source behind `id`, if the loader can
    /// report one.
    fn resource_name(&self, _id: &ResourceId) -> Option<String> {
        None
    }

    /// Every identifier this loader holds that passes `filter`.
    fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId>;

    /// The concrete loaders that hold `id`, lowest priority first.
    ///
    /// Leaf loaders return themselves when they hold `id`; aggregates
    /// flatten their members.
    fn resources_with_name(&self, id: &ResourceId) -> Vec<&dyn ResourceLoader>;

    /// Create the resource named `name` (a full path including the mount
    /// point).
    ///
    /// With `update` set an existing resource is overwritten; otherwise an
    /// existing resource is left untouched. Returns `false` when the loader
    /// cannot or will not create it.
    fn create_resource(&self, _name: &str, _update: bool) -> bool {
        false
    }
}

// Blanket implementations for references, boxes and shared pointers

impl<T: ResourceLoader + ?Sized> ResourceLoader for &T {
    fn exists_resource(&self, id: &ResourceId) -> bool {
        (**self).exists_resource(id)
    }

    fn load(&self, id: &ResourceId) -> Result<Stream, Error> {
        (**self).load(id)
    }

    fn mount_point(&self) -> &str {
        (**self).mount_point()
    }

    fn resource_name(&self, id: &ResourceId) -> Option<String> {
        (**self).resource_name(id)
    }

    fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId> {
        (**self).filtered_files(filter)
    }

    fn resources_with_name(&self, id: &ResourceId) -> Vec<&dyn ResourceLoader> {
        (**self).resources_with_name(id)
    }

    fn create_resource(&self, name: &str, update: bool) -> bool {
        (**self).create_resource(name, update)
    }
}

impl<T: ResourceLoader + ?Sized> ResourceLoader for Box<T> {
    fn exists_resource(&self, id: &ResourceId) -> bool {
        self.as_ref().exists_resource(id)
    }

    fn load(&self, id: &ResourceId) -> Result<Stream, Error> {
        self.as_ref().load(id)
    }

    fn mount_point(&self) -> &str {
        self.as_ref().mount_point()
    }

    fn resource_name(&self, id: &ResourceId) -> Option<String> {
        self.as_ref().resource_name(id)
    }

    fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId> {
        self.as_ref().filtered_files(filter)
    }

    fn resources_with_name(&self, id: &ResourceId) -> Vec<&dyn ResourceLoader> {
        self.as_ref().resources_with_name(id)
    }

    fn create_resource(&self, name: &str, update: bool) -> bool {
        self.as_ref().create_resource(name, update)
    }
}

impl<T: ResourceLoader + ?Sized> ResourceLoader for Arc<T> {
    fn exists_resource(&self, id: &ResourceId) -> bool {
        self.as_ref().exists_resource(id)
    }

    fn load(&self, id: &ResourceId) -> Result<Stream, Error> {
        self.as_ref().load(id)
    }

    fn mount_point(&self) -> &str {
        self.as_ref().mount_point()
    }

    fn resource_name(&self, id: &ResourceId) -> Option<String> {
        self.as_ref().resource_name(id)
    }

    fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId> {
        self.as_ref().filtered_files(filter)
    }

    fn resources_with_name(&self, id: &ResourceId) -> Vec<&dyn ResourceLoader> {
        self.as_ref().resources_with_name(id)
    }

    fn create_resource(&self, name: &str, update: bool) -> bool {
        self.as_ref().create_resource(name, update)
    }
}
