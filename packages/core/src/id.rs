//! Resource identifiers: a normalized logical name plus a resource kind.

use std::fmt;

/// The kind of content a resource holds.
///
/// Kinds are part of a resource's identity: `MAP` and `MAP.TXT` never
/// collide even though they share a logical name.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Plain or structured text (`.txt`, `.json`).
    Text,
    /// Still images.
    Image,
    /// Animation sheets.
    Animation,
    /// Bitmap or vector fonts.
    Font,
    /// Sound effects and music.
    Sound,
    /// Video clips.
    Video,
    /// Map or scenario files.
    Map,
    /// Zip containers.
    ArchiveZip,
    /// Lod containers.
    ArchiveLod,
    /// Color palettes.
    Palette,
    /// Saved sessions.
    Savegame,
    /// A directory entry.
    Directory,
    /// A file with an extension no other kind claims (or none at all).
    Other,
    /// No kind has been assigned.
    Undefined,
}

impl ResourceKind {
    /// Map a file extension (with or without the leading dot) to a kind.
    ///
    /// Matching is case-insensitive. Unknown extensions map to
    /// [`ResourceKind::Other`].
    ///
    /// ```rust
    /// use layerfs_core::ResourceKind;
    ///
    /// assert_eq!(ResourceKind::from_extension(".JSON"), ResourceKind::Text);
    /// assert_eq!(ResourceKind::from_extension("png"), ResourceKind::Image);
    /// assert_eq!(ResourceKind::from_extension(".xyz"), ResourceKind::Other);
    /// ```
    pub fn from_extension(extension: &str) -> Self {
        let extension = extension.trim_start_matches('.').to_ascii_uppercase();
        match extension.as_str() {
            "TXT" | "JSON" => ResourceKind::Text,
            "BMP" | "JPG" | "PCX" | "PNG" | "TGA" => ResourceKind::Image,
            "DEF" => ResourceKind::Animation,
            "FNT" | "TTF" => ResourceKind::Font,
            "WAV" | "MP3" | "OGG" => ResourceKind::Sound,
            "SMK" | "BIK" | "MJPG" | "MPG" | "OGV" => ResourceKind::Video,
            "H3M" | "MAP" => ResourceKind::Map,
            "ZIP" => ResourceKind::ArchiveZip,
            "LOD" | "PAC" => ResourceKind::ArchiveLod,
            "PAL" => ResourceKind::Palette,
            "VSGM1" | "VCGM1" => ResourceKind::Savegame,
            _ => ResourceKind::Other,
        }
    }

    /// The upper-case type string used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Text => "TEXT",
            ResourceKind::Image => "IMAGE",
            ResourceKind::Animation => "ANIMATION",
            ResourceKind::Font => "FONT",
            ResourceKind::Sound => "SOUND",
            ResourceKind::Video => "VIDEO",
            ResourceKind::Map => "MAP",
            ResourceKind::ArchiveZip => "ARCHIVE_ZIP",
            ResourceKind::ArchiveLod => "ARCHIVE_LOD",
            ResourceKind::Palette => "PALETTE",
            ResourceKind::Savegame => "SAVEGAME",
            ResourceKind::Directory => "DIRECTORY",
            ResourceKind::Other => "OTHER",
            ResourceKind::Undefined => "UNDEFINED",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one logical resource in the namespace.
///
/// Names are normalized on construction: ASCII upper case, `/` as the only
/// separator, and no trailing extension when the extension is implied by the
/// kind. Two identifiers are equal iff their normalized names and kinds are.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ResourceId {
    name: String,
    kind: ResourceKind,
}

impl ResourceId {
    /// Build an identifier with an explicit kind.
    ///
    /// A trailing extension is stripped only when it maps to `kind`, so
    /// `new("data/a.txt", Text)` and `new("data/a", Text)` are the same
    /// identifier while `new("data/a.txt", Other)` keeps its extension.
    ///
    /// ```rust
    /// use layerfs_core::{ResourceId, ResourceKind};
    ///
    /// let a = ResourceId::new("Data/Hero.txt", ResourceKind::Text);
    /// let b = ResourceId::new("DATA/HERO", ResourceKind::Text);
    /// assert_eq!(a, b);
    /// assert_eq!(a.name(), "DATA/HERO");
    /// ```
    pub fn new(name: impl AsRef<str>, kind: ResourceKind) -> Self {
        let mut name = normalize(name.as_ref());
        if let Some((stem, extension)) = split_extension(&name) {
            if ResourceKind::from_extension(extension) == kind {
                name.truncate(stem.len());
            }
        }
        Self { name, kind }
    }

    /// Build an identifier from a path, inferring the kind from its extension.
    ///
    /// ```rust
    /// use layerfs_core::{ResourceId, ResourceKind};
    ///
    /// let id = ResourceId::from_path("config/heroes.json");
    /// assert_eq!(id.name(), "CONFIG/HEROES");
    /// assert_eq!(id.kind(), ResourceKind::Text);
    /// ```
    pub fn from_path(path: impl AsRef<str>) -> Self {
        let mut name = normalize(path.as_ref());
        let kind = match split_extension(&name) {
            Some((stem, extension)) => {
                let kind = ResourceKind::from_extension(extension);
                name.truncate(stem.len());
                kind
            }
            None => ResourceKind::Other,
        };
        Self { name, kind }
    }

    /// The normalized logical name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resource kind.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}

impl From<&str> for ResourceId {
    fn from(path: &str) -> Self {
        ResourceId::from_path(path)
    }
}

fn normalize(name: &str) -> String {
    name.replace('\\', "/").to_ascii_uppercase()
}

/// Split `name` at its last extension dot, ignoring dots in directory names.
fn split_extension(name: &str) -> Option<(&str, &str)> {
    let dot = name.rfind(['/', '.'])?;
    if name.as_bytes()[dot] != b'.' {
        return None;
    }
    Some((&name[..dot], &name[dot + 1..]))
}
