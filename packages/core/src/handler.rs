//! The resource handler: the one entry point to the resource namespace.
//!
//! A [`ResourceHandler`] is a cheap, cloneable context object. It starts
//! empty, is initialized exactly once with a root loader (normally a fully
//! populated [`FilesystemList`](crate::filesystem_list::FilesystemList)), and
//! from then on hands the root out to anyone holding a clone.
//!
//! Loaders that resolve identifiers through the whole namespace (such as
//! [`MappedLoader`](crate::mapped_loader::MappedLoader)) are built before the
//! root exists and end up inside it, so they hold a [`WeakResourceHandler`]
//! instead of a clone.
//!
//! # Example
//!
//! ```rust
//! use layerfs_core::filesystem_list::FilesystemList;
//! use layerfs_core::{Error, ResourceHandler};
//!
//! let handler = ResourceHandler::new();
//! assert!(matches!(handler.get(), Err(Error::NotInitialized)));
//!
//! handler.initialize(FilesystemList::new()).unwrap();
//! assert!(handler.get().is_ok());
//! ```

use std::sync::{Arc, OnceLock, Weak};

use lazy_static::lazy_static;

use crate::{Error, ResourceLoader};

type Root = OnceLock<Arc<dyn ResourceLoader>>;

/// Shared handle to the root loader.
#[derive(Clone, Default)]
pub struct ResourceHandler {
    root: Arc<Root>,
}

impl ResourceHandler {
    /// Create a handler with no root installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// The installed root loader.
    ///
    /// Fails with [`Error::NotInitialized`] until [`initialize`] has run.
    ///
    /// [`initialize`]: ResourceHandler::initialize
    pub fn get(&self) -> Result<Arc<dyn ResourceLoader>, Error> {
        self.root.get().cloned().ok_or(Error::NotInitialized)
    }

    /// Install `root`. Only the first call succeeds.
    pub fn initialize<L: ResourceLoader + 'static>(&self, root: L) -> Result<(), Error> {
        self.initialize_shared(Arc::new(root))
    }

    /// Install an already shared root.
    pub fn initialize_shared(&self, root: Arc<dyn ResourceLoader>) -> Result<(), Error> {
        self.root
            .set(root)
            .map_err(|_| Error::AlreadyInitialized)?;
        tracing::debug!("resource handler initialized");
        Ok(())
    }

    /// True once a root has been installed.
    pub fn is_initialized(&self) -> bool {
        self.root.get().is_some()
    }

    /// A handle that does not keep the root alive.
    pub fn downgrade(&self) -> WeakResourceHandler {
        WeakResourceHandler {
            root: Arc::downgrade(&self.root),
        }
    }
}

impl std::fmt::Debug for ResourceHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceHandler")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Non-owning counterpart of [`ResourceHandler`].
#[derive(Clone, Default)]
pub struct WeakResourceHandler {
    root: Weak<Root>,
}

impl WeakResourceHandler {
    /// The installed root loader.
    ///
    /// Fails with [`Error::NotInitialized`] when no root has been installed
    /// yet or every strong handler has been dropped.
    pub fn get(&self) -> Result<Arc<dyn ResourceLoader>, Error> {
        self.root
            .upgrade()
            .and_then(|root| root.get().cloned())
            .ok_or(Error::NotInitialized)
    }

    /// Recover a strong handler, if one is still alive.
    pub fn upgrade(&self) -> Option<ResourceHandler> {
        self.root.upgrade().map(|root| ResourceHandler { root })
    }
}

lazy_static! {
    static ref GLOBAL: ResourceHandler = ResourceHandler::new();
}

/// The process-wide handler.
///
/// Prefer passing a [`ResourceHandler`] to the code that needs it; this is
/// for call sites that cannot receive one.
pub fn global() -> &'static ResourceHandler {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem_list::FilesystemList;
    use crate::ResourceId;

    #[test]
    fn get_before_initialize_fails() {
        let handler = ResourceHandler::new();
        assert!(!handler.is_initialized());
        assert!(matches!(handler.get(), Err(Error::NotInitialized)));
    }

    #[test]
    fn initialize_once() {
        let handler = ResourceHandler::new();
        handler.initialize(FilesystemList::new()).unwrap();
        assert!(handler.is_initialized());

        let second = handler.initialize(FilesystemList::new());
        assert!(matches!(second, Err(Error::AlreadyInitialized)));
    }

    #[test]
    fn clones_share_the_root() {
        let handler = ResourceHandler::new();
        let clone = handler.clone();
        handler.initialize(FilesystemList::new()).unwrap();

        let root = clone.get().unwrap();
        assert!(!root.exists_resource(&ResourceId::from_path("a.txt")));
        assert_eq!(root.mount_point(), "");
    }

    #[test]
    fn weak_handler_sees_late_initialization() {
        let handler = ResourceHandler::new();
        let weak = handler.downgrade();
        assert!(matches!(weak.get(), Err(Error::NotInitialized)));

        handler.initialize(FilesystemList::new()).unwrap();
        assert!(weak.get().is_ok());
        assert!(weak.upgrade().is_some());
    }

    #[test]
    fn weak_handler_does_not_keep_root_alive() {
        let handler = ResourceHandler::new();
        let weak = handler.downgrade();
        handler.initialize(FilesystemList::new()).unwrap();
        drop(handler);

        assert!(weak.upgrade().is_none());
        assert!(matches!(weak.get(), Err(Error::NotInitialized)));
    }

    #[test]
    fn default_weak_handler_is_uninitialized() {
        let weak = WeakResourceHandler::default();
        assert!(matches!(weak.get(), Err(Error::NotInitialized)));
    }

    #[test]
    fn global_is_one_instance() {
        assert!(std::ptr::eq(global(), global()));
        assert!(Arc::ptr_eq(&global().clone().root, &global().root));
    }
}
