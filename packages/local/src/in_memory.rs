//! In-memory loader.
//!
//! Holds resource bytes in a map. Useful as a writable scratch layer and
//! for building namespaces in tests.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use layerfs_core::{
    Bytes, Error, MemoryStream, ResourceFilter, ResourceId, ResourceLoader, Stream,
};

use crate::strip_mount_point;

struct Entry {
    name: String,
    data: Bytes,
}

/// A loader whose resources live in memory.
///
/// # Example
///
/// ```rust
/// use layerfs_local::InMemoryLoader;
/// use layerfs_core::{ResourceId, ResourceLoader};
///
/// let loader = InMemoryLoader::new("DATA/");
/// loader.insert("DATA/hello.txt", "Hello, world!");
///
/// let id = ResourceId::from_path("data/hello.txt");
/// let bytes = loader.load(&id).unwrap().read_all().unwrap();
/// assert_eq!(bytes.as_ref(), b"Hello, world!");
/// ```
pub struct InMemoryLoader {
    mount_point: String,
    files: RwLock<HashMap<ResourceId, Entry>>,
}

impl InMemoryLoader {
    /// Create an empty loader owning `mount_point`.
    pub fn new(mount_point: impl Into<String>) -> Self {
        Self {
            mount_point: mount_point.into(),
            files: RwLock::new(HashMap::new()),
        }
    }

    /// Store `data` under the full name `name`, replacing any previous
    /// content. Returns the identifier it is stored as.
    pub fn insert(&self, name: &str, data: impl Into<Bytes>) -> ResourceId {
        let id = ResourceId::from_path(name);
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id.clone(),
                Entry {
                    name: name.to_string(),
                    data: data.into(),
                },
            );
        id
    }

    /// Remove a resource, returning its content.
    pub fn remove(&self, id: &ResourceId) -> Option<Bytes> {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .map(|entry| entry.data)
    }

    /// Number of stored resources.
    pub fn len(&self) -> usize {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceLoader for InMemoryLoader {
    fn exists_resource(&self, id: &ResourceId) -> bool {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    fn load(&self, id: &ResourceId) -> Result<Stream, Error> {
        let files = self.files.read().unwrap_or_else(PoisonError::into_inner);
        match files.get(id) {
            Some(entry) => Ok(Box::new(MemoryStream::new(entry.data.clone()))),
            None => Err(Error::not_found(id)),
        }
    }

    fn mount_point(&self) -> &str {
        &self.mount_point
    }

    fn resource_name(&self, id: &ResourceId) -> Option<String> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|entry| entry.name.clone())
    }

    fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .filter(|id| filter(*id))
            .cloned()
            .collect()
    }

    fn resources_with_name(&self, id: &ResourceId) -> Vec<&dyn ResourceLoader> {
        if self.exists_resource(id) {
            vec![self as &dyn ResourceLoader]
        } else {
            Vec::new()
        }
    }

    fn create_resource(&self, name: &str, update: bool) -> bool {
        if strip_mount_point(name, &self.mount_point).is_none() {
            return false;
        }

        let id = ResourceId::from_path(name);
        let mut files = self.files.write().unwrap_or_else(PoisonError::into_inner);
        if update || !files.contains_key(&id) {
            files.insert(
                id,
                Entry {
                    name: name.to_string(),
                    data: Bytes::new(),
                },
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layerfs_core::ResourceKind;

    #[test]
    fn insert_and_load() {
        let loader = InMemoryLoader::new("");
        let id = loader.insert("a.txt", "content");

        assert!(loader.exists_resource(&id));
        assert_eq!(loader.len(), 1);
        let bytes = loader.load(&id).unwrap().read_all().unwrap();
        assert_eq!(bytes, Bytes::from_static(b"content"));
    }

    #[test]
    fn load_missing_is_not_found() {
        let loader = InMemoryLoader::new("");
        let result = loader.load(&ResourceId::from_path("missing.txt"));
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn resource_name_is_the_inserted_name() {
        let loader = InMemoryLoader::new("");
        let id = loader.insert("Data/Hero.PNG", vec![0u8; 4]);

        assert_eq!(loader.resource_name(&id), Some("Data/Hero.PNG".to_string()));
        assert_eq!(loader.resource_name(&ResourceId::from_path("x.txt")), None);
    }

    #[test]
    fn filtered_files_applies_filter() {
        let loader = InMemoryLoader::new("");
        loader.insert("a.txt", "1");
        loader.insert("b.png", "2");
        loader.insert("c.json", "3");

        let text = loader.filtered_files(&|id| id.kind() == ResourceKind::Text);
        assert_eq!(text.len(), 2);
        assert!(!text.contains(&ResourceId::from_path("b.png")));
    }

    #[test]
    fn create_respects_mount_point() {
        let loader = InMemoryLoader::new("SAVES/");

        assert!(!loader.create_resource("DATA/a.txt", false));
        assert!(loader.create_resource("saves/a.txt", false));
        assert!(loader.exists_resource(&ResourceId::from_path("SAVES/a.txt")));
        assert_eq!(loader.mount_point(), "SAVES/");
    }

    #[test]
    fn create_without_update_keeps_content() {
        let loader = InMemoryLoader::new("");
        let id = loader.insert("a.txt", "keep me");

        assert!(loader.create_resource("a.txt", false));
        let bytes = loader.load(&id).unwrap().read_all().unwrap();
        assert_eq!(bytes, Bytes::from_static(b"keep me"));
    }

    #[test]
    fn create_with_update_resets_content() {
        let loader = InMemoryLoader::new("");
        let id = loader.insert("a.txt", "old");

        assert!(loader.create_resource("a.txt", true));
        let bytes = loader.load(&id).unwrap().read_all().unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn remove_returns_content() {
        let loader = InMemoryLoader::new("");
        let id = loader.insert("a.txt", "bye");

        assert_eq!(loader.remove(&id), Some(Bytes::from_static(b"bye")));
        assert!(loader.is_empty());
        assert!(loader.resources_with_name(&id).is_empty());
    }
}
