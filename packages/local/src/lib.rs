//! Loaders backed by local storage: a directory tree or process memory.

pub mod directory;
pub mod in_memory;

pub use directory::DirectoryLoader;
pub use in_memory::InMemoryLoader;

/// The part of `name` under `mount_point`, if `name` starts with it.
///
/// The prefix comparison ignores ASCII case, matching identifier
/// normalization.
pub(crate) fn strip_mount_point<'a>(name: &'a str, mount_point: &str) -> Option<&'a str> {
    let prefix = name.get(..mount_point.len())?;
    if !prefix.eq_ignore_ascii_case(mount_point) {
        return None;
    }
    name.get(mount_point.len()..)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_mount_point_ignores_case() {
        assert_eq!(strip_mount_point("Saves/slot1.txt", "SAVES/"), Some("slot1.txt"));
        assert_eq!(strip_mount_point("anything", ""), Some("anything"));
        assert_eq!(strip_mount_point("DATA/a.txt", "SAVES/"), None);
        assert_eq!(strip_mount_point("SAV", "SAVES/"), None);
    }
}
