//! MappedLoader: present identifiers that are aliases for other identifiers.
//!
//! The alias table is built once from a flat JSON object of relative names:
//!
//! ```json
//! {
//!     "sprites/hero.png": "sprites/hero_v2.png",
//!     "config/old.json": "config/new.json"
//! }
//! ```
//!
//! Both sides are prefixed with the same mount point, so an alias always
//! points inside its own mount scope. Loading an alias resolves the target
//! through the root loader of a [`ResourceHandler`], which means the target
//! may live in any loader in the namespace, including another alias.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use serde_json::Value as JsonValue;

use crate::handler::{ResourceHandler, WeakResourceHandler};
use crate::{Error, ResourceFilter, ResourceId, ResourceLoader, Stream};

thread_local! {
    /// Aliases being resolved on this thread, for cycle detection.
    static RESOLVING: RefCell<HashSet<ResourceId>> = RefCell::new(HashSet::new());
}

/// Marks an alias as in-flight for as long as it lives.
struct ResolveGuard {
    id: ResourceId,
}

impl ResolveGuard {
    fn enter(id: &ResourceId) -> Result<Self, Error> {
        let fresh = RESOLVING.with(|resolving| resolving.borrow_mut().insert(id.clone()));
        if !fresh {
            return Err(Error::AliasCycle {
                name: id.name().to_string(),
                kind: id.kind(),
            });
        }
        Ok(Self { id: id.clone() })
    }
}

impl Drop for ResolveGuard {
    fn drop(&mut self) {
        RESOLVING.with(|resolving| {
            resolving.borrow_mut().remove(&self.id);
        });
    }
}

/// A loader whose every resource is an alias for another identifier.
///
/// # Example
///
/// ```rust
/// use layerfs_core::mapped_loader::MappedLoader;
/// use layerfs_core::{ResourceHandler, ResourceId, ResourceLoader};
/// use serde_json::json;
///
/// let handler = ResourceHandler::new();
/// let loader = MappedLoader::new(
///     "DATA/",
///     &json!({ "old.txt": "new.txt" }),
///     &handler,
/// )
/// .unwrap();
///
/// assert!(loader.exists_resource(&ResourceId::from_path("data/old.txt")));
/// assert_eq!(loader.mount_point(), "");
/// ```
pub struct MappedLoader {
    file_list: HashMap<ResourceId, ResourceId>,
    handler: WeakResourceHandler,
}

impl MappedLoader {
    /// Build the alias table from a flat JSON object.
    ///
    /// Fails with [`Error::MalformedConfiguration`] when `config` is not an
    /// object or any value is not a string. Nothing is built in that case.
    pub fn new(
        mount_point: &str,
        config: &JsonValue,
        handler: &ResourceHandler,
    ) -> Result<Self, Error> {
        let object = config.as_object().ok_or_else(|| {
            Error::malformed(format!(
                "alias table for mount '{}' must be an object",
                mount_point
            ))
        })?;

        let mut pairs = Vec::with_capacity(object.len());
        for (key, value) in object {
            let target = value.as_str().ok_or_else(|| {
                Error::malformed(format!(
                    "alias '{}' in mount '{}' must map to a string, got {}",
                    key, mount_point, value
                ))
            })?;
            pairs.push((key.as_str(), target));
        }

        Ok(Self::from_pairs(mount_point, pairs, handler))
    }

    /// Build the alias table from already validated pairs.
    pub fn from_pairs<'a, I>(mount_point: &str, pairs: I, handler: &ResourceHandler) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let file_list = pairs
            .into_iter()
            .map(|(alias, target)| {
                (
                    ResourceId::from_path(format!("{}{}", mount_point, alias)),
                    ResourceId::from_path(format!("{}{}", mount_point, target)),
                )
            })
            .collect();

        Self {
            file_list,
            handler: handler.downgrade(),
        }
    }

    /// The identifier `alias` stands for, if it is an alias here.
    pub fn target(&self, alias: &ResourceId) -> Option<&ResourceId> {
        self.file_list.get(alias)
    }

    /// Number of aliases.
    pub fn len(&self) -> usize {
        self.file_list.len()
    }

    /// True if there are no aliases.
    pub fn is_empty(&self) -> bool {
        self.file_list.is_empty()
    }
}

impl ResourceLoader for MappedLoader {
    fn exists_resource(&self, id: &ResourceId) -> bool {
        self.file_list.contains_key(id)
    }

    fn load(&self, id: &ResourceId) -> Result<Stream, Error> {
        let target = self.target(id).ok_or_else(|| Error::not_found(id))?;
        let _guard = ResolveGuard::enter(id)?;
        self.handler.get()?.load(target)
    }

    fn mount_point(&self) -> &str {
        ""
    }

    fn resource_name(&self, id: &ResourceId) -> Option<String> {
        let target = self.target(id)?;
        let _guard = ResolveGuard::enter(id).ok()?;
        self.handler.get().ok()?.resource_name(target)
    }

    fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId> {
        self.file_list
            .keys()
            .filter(|alias| filter(*alias))
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem_list::FilesystemList;
    use crate::{MemoryStream, ResourceKind};
    use serde_json::json;

    /// Fixed content loader for testing.
    struct TestLoader {
        files: HashMap<ResourceId, &'static str>,
    }

    impl TestLoader {
        fn new(files: &[(&str, &'static str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(name, data)| (ResourceId::from_path(name), *data))
                    .collect(),
            }
        }
    }

    impl ResourceLoader for TestLoader {
        fn exists_resource(&self, id: &ResourceId) -> bool {
            self.files.contains_key(id)
        }

        fn load(&self, id: &ResourceId) -> Result<Stream, Error> {
            match self.files.get(id) {
                Some(data) => Ok(Box::new(MemoryStream::new(data.as_bytes().to_vec()))),
                None => Err(Error::not_found(id)),
            }
        }

        fn mount_point(&self) -> &str {
            ""
        }

        fn resource_name(&self, id: &ResourceId) -> Option<String> {
            self.files.get(id).map(|_| format!("test://{}", id.name()))
        }

        fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId> {
            self.files.keys().filter(|id| filter(*id)).cloned().collect()
        }

        fn resources_with_name(&self, id: &ResourceId) -> Vec<&dyn ResourceLoader> {
            if self.exists_resource(id) {
                vec![self as &dyn ResourceLoader]
            } else {
                Vec::new()
            }
        }
    }

    fn read(loader: &dyn ResourceLoader, id: &ResourceId) -> String {
        let data = loader.load(id).unwrap().read_all().unwrap();
        String::from_utf8(data.to_vec()).unwrap()
    }

    #[test]
    fn both_sides_share_the_mount_point() {
        let handler = ResourceHandler::new();
        let loader =
            MappedLoader::new("DATA/", &json!({ "old.txt": "new.txt" }), &handler).unwrap();

        let alias = ResourceId::from_path("DATA/old.txt");
        assert_eq!(
            loader.target(&alias),
            Some(&ResourceId::from_path("DATA/new.txt"))
        );
        assert!(!loader.exists_resource(&ResourceId::from_path("old.txt")));
        assert!(!loader.exists_resource(&ResourceId::from_path("DATA/new.txt")));
    }

    #[test]
    fn rejects_non_object_config() {
        let handler = ResourceHandler::new();
        let result = MappedLoader::new("", &json!(["a", "b"]), &handler);
        assert!(matches!(result, Err(Error::MalformedConfiguration { .. })));
    }

    #[test]
    fn rejects_non_string_values() {
        let handler = ResourceHandler::new();
        let result = MappedLoader::new(
            "",
            &json!({ "a.txt": "b.txt", "c.txt": { "nested": true } }),
            &handler,
        );
        match result {
            Err(Error::MalformedConfiguration { message }) => assert!(message.contains("c.txt")),
            _ => panic!("expected a malformed configuration error"),
        }
    }

    #[test]
    fn load_resolves_through_the_root() {
        let handler = ResourceHandler::new();
        let mapped =
            MappedLoader::new("", &json!({ "alias.txt": "real.txt" }), &handler).unwrap();

        let mut root = FilesystemList::new();
        root.add_loader(TestLoader::new(&[("real.txt", "payload")]), false);
        root.add_loader(mapped, false);
        handler.initialize(root).unwrap();

        let root = handler.get().unwrap();
        let alias = ResourceId::from_path("alias.txt");
        assert_eq!(read(root.as_ref(), &alias), "payload");
        assert_eq!(
            root.resource_name(&alias),
            Some("test://REAL".to_string())
        );
    }

    #[test]
    fn load_without_root_is_not_initialized() {
        let handler = ResourceHandler::new();
        let mapped = MappedLoader::new("", &json!({ "a.txt": "b.txt" }), &handler).unwrap();

        let result = mapped.load(&ResourceId::from_path("a.txt"));
        assert!(matches!(result, Err(Error::NotInitialized)));
        assert_eq!(mapped.resource_name(&ResourceId::from_path("a.txt")), None);
    }

    #[test]
    fn load_of_unknown_alias_is_not_found() {
        let handler = ResourceHandler::new();
        let mapped = MappedLoader::new("", &json!({}), &handler).unwrap();
        assert!(mapped.is_empty());

        let result = mapped.load(&ResourceId::from_path("a.txt"));
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn dangling_alias_is_not_found() {
        let handler = ResourceHandler::new();
        let mapped = MappedLoader::new("", &json!({ "a.txt": "gone.txt" }), &handler).unwrap();
        let mut root = FilesystemList::new();
        root.add_loader(mapped, false);
        handler.initialize(root).unwrap();

        let root = handler.get().unwrap();
        let result = root.load(&ResourceId::from_path("a.txt"));
        match result {
            Err(Error::NotFound { name, kind }) => {
                assert_eq!(name, "GONE");
                assert_eq!(kind, ResourceKind::Text);
            }
            _ => panic!("expected the alias target to be reported missing"),
        }
        assert_eq!(root.resource_name(&ResourceId::from_path("a.txt")), None);
    }

    #[test]
    fn alias_cycle_is_reported() {
        let handler = ResourceHandler::new();
        let mapped = MappedLoader::new(
            "",
            &json!({ "a.txt": "b.txt", "b.txt": "a.txt" }),
            &handler,
        )
        .unwrap();
        let mut root = FilesystemList::new();
        root.add_loader(mapped, false);
        handler.initialize(root).unwrap();

        let root = handler.get().unwrap();
        let result = root.load(&ResourceId::from_path("a.txt"));
        assert!(matches!(result, Err(Error::AliasCycle { .. })));
        assert_eq!(root.resource_name(&ResourceId::from_path("a.txt")), None);

        // The guard is released, so a second attempt fails the same way.
        let again = root.load(&ResourceId::from_path("a.txt"));
        assert!(matches!(again, Err(Error::AliasCycle { .. })));
    }

    #[test]
    fn chained_aliases_resolve() {
        let handler = ResourceHandler::new();
        let first = MappedLoader::new("", &json!({ "a.txt": "b.txt" }), &handler).unwrap();
        let second = MappedLoader::new("", &json!({ "b.txt": "c.txt" }), &handler).unwrap();
        let mut root = FilesystemList::new();
        root.add_loader(TestLoader::new(&[("c.txt", "end")]), false);
        root.add_loader(first, false);
        root.add_loader(second, false);
        handler.initialize(root).unwrap();

        let root = handler.get().unwrap();
        assert_eq!(read(root.as_ref(), &ResourceId::from_path("a.txt")), "end");
    }

    #[test]
    fn filtered_files_lists_aliases_not_targets() {
        let handler = ResourceHandler::new();
        let mapped = MappedLoader::new(
            "MODS/",
            &json!({ "a.txt": "x.png", "b.png": "y.png" }),
            &handler,
        )
        .unwrap();

        let all = mapped.filtered_files(&|_| true);
        assert_eq!(all.len(), 2);
        assert!(all.contains(&ResourceId::from_path("MODS/a.txt")));
        assert!(all.contains(&ResourceId::from_path("MODS/b.png")));

        let text = mapped.filtered_files(&|id| id.kind() == ResourceKind::Text);
        assert_eq!(text.len(), 1);
    }
}
