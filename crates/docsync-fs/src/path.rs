//! Normalized path handling for doc-tree relative paths

use std::path::{Path, PathBuf};

/// A path normalized to forward slashes with no empty or `.` segments.
///
/// Doc-tree paths (`docs/<repo>/guide.md`, exclusion entries, snapshot keys)
/// are compared as strings, so every path that crosses a module boundary is
/// normalized first. Conversion to a native `PathBuf` happens only at I/O.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    ///
    /// Backslashes become forward slashes, repeated separators collapse,
    /// `.` segments and trailing separators are dropped, and `..` consumes
    /// the previous segment (or nothing, so a path never climbs above its
    /// root). A leading `/` is preserved so absolute paths stay absolute.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        let absolute = raw.starts_with('/');

        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        let joined = segments.join("/");

        let inner = match (absolute, joined.is_empty()) {
            (true, true) => "/".to_string(),
            (true, false) => format!("/{joined}"),
            (false, _) => joined,
        };
        Self { inner }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// True for the empty relative path (the root of a tree).
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self::new(format!("{}/{}", self.inner, segment))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(0) => None,
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None if self.inner.is_empty() => None,
            None => Some(Self {
                inner: String::new(),
            }),
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Iterate over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('/').filter(|segment| !segment.is_empty())
    }

    /// First segment, i.e. the top-level entry name of a relative path.
    pub fn first_segment(&self) -> Option<&str> {
        self.segments().next()
    }

    /// True when `self` equals `ancestor` or lies underneath it.
    ///
    /// Matching is segment-wise: `docs/api` is not within `docs/ap`.
    pub fn is_within(&self, ancestor: &NormalizedPath) -> bool {
        if ancestor.is_empty() {
            return true;
        }
        self.inner == ancestor.inner
            || (self.inner.starts_with(&ancestor.inner)
                && self.inner.as_bytes().get(ancestor.inner.len()) == Some(&b'/'))
    }

    /// Strip `base` from the front of this path, segment-wise.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<NormalizedPath> {
        if !self.is_within(base) {
            return None;
        }
        if base.is_empty() {
            return Some(self.clone());
        }
        Some(Self::new(&self.inner[base.inner.len()..]).relative())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    fn relative(self) -> Self {
        Self {
            inner: self.inner.trim_start_matches('/').to_string(),
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
