//! Directory loader: exposes the files under a local directory.
//!
//! Files are indexed once, at construction, as
//! `ResourceId::from_path(mount_point + relative_path)`. Newly created
//! resources are added to the index as they are created.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use layerfs_core::{Error, FileStream, ResourceFilter, ResourceId, ResourceLoader, Stream};

use crate::strip_mount_point;

/// How deep below the base directory files are indexed by default.
pub const DEFAULT_DEPTH: usize = 16;

/// A loader backed by a directory tree on the local filesystem.
///
/// # Example
///
/// ```rust,no_run
/// use layerfs_local::DirectoryLoader;
/// use layerfs_core::{ResourceId, ResourceLoader};
///
/// let loader = DirectoryLoader::new("DATA/", "/usr/share/game/data").unwrap();
/// let exists = loader.exists_resource(&ResourceId::from_path("DATA/heroes.json"));
/// ```
pub struct DirectoryLoader {
    mount_point: String,
    base_directory: PathBuf,
    /// Identifier to path relative to `base_directory`.
    file_list: RwLock<HashMap<ResourceId, PathBuf>>,
}

impl DirectoryLoader {
    /// Index `base_directory` up to [`DEFAULT_DEPTH`] levels deep.
    pub fn new(
        mount_point: impl Into<String>,
        base_directory: impl Into<PathBuf>,
    ) -> Result<Self, Error> {
        Self::with_depth(mount_point, base_directory, DEFAULT_DEPTH)
    }

    /// Index `base_directory` up to `depth` levels deep (1 means only the
    /// files directly inside it).
    pub fn with_depth(
        mount_point: impl Into<String>,
        base_directory: impl Into<PathBuf>,
        depth: usize,
    ) -> Result<Self, Error> {
        let mount_point = mount_point.into();
        let base_directory = base_directory.into();

        let attr = fs::metadata(&base_directory).map_err(|error| Error::InvalidRoot {
            path: base_directory.clone(),
            message: error.to_string(),
        })?;
        if !attr.is_dir() {
            return Err(Error::InvalidRoot {
                path: base_directory,
                message: "Root path must be a directory.".to_string(),
            });
        }

        let file_list = index_directory(&mount_point, &base_directory, depth)?;
        tracing::debug!(
            mount_point = %mount_point,
            base_directory = %base_directory.display(),
            files = file_list.len(),
            "indexed directory"
        );

        Ok(Self {
            mount_point,
            base_directory,
            file_list: RwLock::new(file_list),
        })
    }

    /// The directory this loader reads from.
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// The on-disk path of `id`, if indexed.
    pub fn file_path(&self, id: &ResourceId) -> Option<PathBuf> {
        self.file_list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .map(|relative| self.base_directory.join(relative))
    }
}

fn index_directory(
    mount_point: &str,
    base_directory: &Path,
    depth: usize,
) -> Result<HashMap<ResourceId, PathBuf>, Error> {
    let mut file_list = HashMap::new();
    for entry in walkdir::WalkDir::new(base_directory)
        .min_depth(1)
        .max_depth(depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|error| Error::InvalidRoot {
            path: base_directory.to_path_buf(),
            message: error.to_string(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(base_directory) else {
            continue;
        };
        let Some(relative_name) = relative_resource_name(relative) else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };

        let id = ResourceId::from_path(format!("{}{}", mount_point, relative_name));
        file_list.insert(id, relative.to_path_buf());
    }
    Ok(file_list)
}

/// A relative path as a `/`-separated name.
fn relative_resource_name(relative: &Path) -> Option<String> {
    let components = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(components.join("/"))
}

impl ResourceLoader for DirectoryLoader {
    fn exists_resource(&self, id: &ResourceId) -> bool {
        self.file_list
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    fn load(&self, id: &ResourceId) -> Result<Stream, Error> {
        let path = self.file_path(id).ok_or_else(|| Error::not_found(id))?;
        tracing::debug!(path = %path.display(), "loading");
        Ok(Box::new(FileStream::open(&path)?))
    }

    fn mount_point(&self) -> &str {
        &self.mount_point
    }

    fn resource_name(&self, id: &ResourceId) -> Option<String> {
        self.file_path(id)
            .map(|path| path.to_string_lossy().into_owned())
    }

    fn filtered_files(&self, filter: ResourceFilter<'_>) -> HashSet<ResourceId> {
        self.file_list
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
        let Some(relative) = strip_mount_point(name, &self.mount_point) else {
            return false;
        };
        let id = ResourceId::from_path(name);
        if !update && self.exists_resource(&id) {
            return true;
        }

        let relative = PathBuf::from(relative);
        if !is_contained(&relative) {
            tracing::warn!(name, "refusing to create resource outside base directory");
            return false;
        }
        let path = self.base_directory.join(&relative);
        if let Some(parent) = path.parent() {
            if let Err(error) = fs::create_dir_all(parent) {
                tracing::warn!(path = %parent.display(), %error, "could not create directory");
                return false;
            }
        }

        let created = if update {
            fs::File::create(&path)
        } else {
            fs::OpenOptions::new().write(true).create(true).open(&path)
        };
        if let Err(error) = created {
            tracing::warn!(path = %path.display(), %error, "could not create resource file");
            return false;
        }

        self.file_list
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, relative);
        true
    }
}

/// True if `relative` names a path strictly below the directory it is joined to.
fn is_contained(relative: &Path) -> bool {
    relative.components().next().is_some()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}
