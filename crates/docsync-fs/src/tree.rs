//! Content snapshots of documentation trees

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::checksum::compute_file_checksum;
use crate::io::entry_name;
use crate::{Error, NormalizedPath, Result};

/// A snapshot of a directory: relative path -> content checksum.
///
/// Only regular files are recorded; empty directories carry no content and
/// are invisible to comparisons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocTree {
    files: BTreeMap<NormalizedPath, String>,
}

impl DocTree {
    /// Scan `root` recursively. A missing root yields an empty tree.
    pub fn scan(root: &Path) -> Result<Self> {
        let mut tree = Self::default();
        if root.is_file() {
            let checksum = compute_file_checksum(root).map_err(|e| Error::io(root, e))?;
            tree.files.insert(NormalizedPath::new(""), checksum);
        } else if root.is_dir() {
            tree.scan_dir(root, &NormalizedPath::new(""))?;
        }
        Ok(tree)
    }

    fn scan_dir(&mut self, dir: &Path, rel: &NormalizedPath) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let path = entry.path();
            let Some(name) = entry_name(&entry) else {
                continue;
            };
            let child = rel.join(&name);
            let file_type = entry.file_type().map_err(|e| Error::io(&path, e))?;

            if file_type.is_dir() {
                self.scan_dir(&path, &child)?;
            } else if path.is_file() {
                let checksum = compute_file_checksum(&path).map_err(|e| Error::io(&path, e))?;
                self.files.insert(child, checksum);
            } else {
                tracing::debug!(path = %path.display(), "Skipping non-regular entry");
            }
        }
        Ok(())
    }

    /// All recorded files in path order.
    pub fn files(&self) -> &BTreeMap<NormalizedPath, String> {
        &self.files
    }

    /// Relative paths of all recorded files.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(NormalizedPath::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Checksum of the file at `path`, if recorded.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .get(&NormalizedPath::new(path))
            .map(String::as_str)
    }

    /// The files under `prefix`, re-rooted at `prefix`.
    pub fn subtree(&self, prefix: &str) -> DocTree {
        let prefix = NormalizedPath::new(prefix);
        let files = self
            .files
            .iter()
            .filter_map(|(path, sum)| {
                let rel = path.strip_prefix(&prefix)?;
                (!rel.is_empty()).then(|| (rel, sum.clone()))
            })
            .collect();
        DocTree { files }
    }

    /// The files outside every path in `excludes`.
    pub fn without(&self, excludes: &[NormalizedPath]) -> DocTree {
        let files = self
            .files
            .iter()
            .filter(|(path, _)| !excludes.iter().any(|ex| path.is_within(ex)))
            .map(|(path, sum)| (path.clone(), sum.clone()))
            .collect();
        DocTree { files }
    }

    /// True when every file here exists in `other` with identical content.
    pub fn is_covered_by(&self, other: &DocTree) -> bool {
        self.files
            .iter()
            .all(|(path, sum)| other.files.get(path) == Some(sum))
    }
}
