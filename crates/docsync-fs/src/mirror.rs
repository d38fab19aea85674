//! Directory mirror, merge, and move primitives
//!
//! [`mirror`] is destructive: it makes a destination match a source. It
//! always takes an explicit exclusion list, and excluded paths in the
//! destination are never deleted or overwritten. [`merge_tree`] and
//! [`move_entry`] are content-preserving: they write files but never delete
//! anything at the destination.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::io::{copy_if_changed, entry_name, remove_path};
use crate::{DocTree, Error, NormalizedPath, Result};

/// Counts reported by [`mirror`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MirrorStats {
    /// Files created or overwritten in the destination
    pub written: usize,
    /// Destination entries (files or whole directories) deleted
    pub removed: usize,
}

impl MirrorStats {
    pub fn changed(&self) -> bool {
        self.written > 0 || self.removed > 0
    }
}

/// Make `destination` identical to `source`, except for `excludes`.
///
/// `excludes` are paths relative to both roots. An excluded path is left
/// exactly as it was in the destination, whether or not the source has it,
/// and its ancestor directories are kept. A missing source is a no-op; a
/// missing destination is created.
pub fn mirror(source: &Path, destination: &Path, excludes: &[NormalizedPath]) -> Result<MirrorStats> {
    let mut stats = MirrorStats::default();
    if !source.is_dir() {
        tracing::debug!(source = %source.display(), "Mirror source missing, nothing to do");
        return Ok(stats);
    }

    fs::create_dir_all(destination).map_err(|e| Error::io(destination, e))?;
    let filter = Exclusions(excludes);
    let root = NormalizedPath::new("");

    prune(source, destination, &root, &filter, &mut stats)?;
    copy_into(source, destination, &root, &filter, &mut stats)?;

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        written = stats.written,
        removed = stats.removed,
        "Mirrored directory"
    );
    Ok(stats)
}

/// Copy `src` (file or directory) onto `dst` without deleting anything.
///
/// Files present in both are overwritten with the source content; files
/// only at the destination are kept. Returns the number of files written.
pub fn merge_tree(src: &Path, dst: &Path) -> Result<usize> {
    if src.is_file() {
        return Ok(usize::from(copy_if_changed(src, dst)?));
    }
    if !src.is_dir() {
        return Ok(0);
    }

    if dst.is_file() {
        remove_path(dst)?;
    }
    fs::create_dir_all(dst).map_err(|e| Error::io(dst, e))?;

    let mut written = 0;
    for (name, is_dir) in read_entries(src)? {
        let from = src.join(&name);
        let to = dst.join(&name);
        written += if is_dir {
            merge_tree(&from, &to)?
        } else {
            usize::from(copy_if_changed(&from, &to)?)
        };
    }
    Ok(written)
}

/// Move `src` to `dst`.
///
/// Renames when `dst` does not exist; otherwise merges `src` into `dst` and
/// removes `src`. Returns the number of files that ended up at `dst` from
/// `src`.
pub fn move_entry(src: &Path, dst: &Path) -> Result<usize> {
    if !src.exists() {
        return Ok(0);
    }

    if !dst.exists() {
        let moved = DocTree::scan(src)?.len();
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
        fs::rename(src, dst).map_err(|e| Error::io(src, e))?;
        return Ok(moved);
    }

    let moved = DocTree::scan(src)?.len();
    merge_tree(src, dst)?;
    remove_path(src)?;
    Ok(moved)
}

/// Names of the direct children of `dir`, sorted. Non UTF-8 names are skipped.
pub fn list_entries(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    Ok(read_entries(dir)?.into_iter().map(|(name, _)| name).collect())
}

struct Exclusions<'a>(&'a [NormalizedPath]);

impl Exclusions<'_> {
    /// The path is an excluded path or lies inside one.
    fn excludes(&self, rel: &NormalizedPath) -> bool {
        self.0.iter().any(|ex| rel.is_within(ex))
    }

    /// Some excluded path lies strictly inside `rel`.
    fn shelters(&self, rel: &NormalizedPath) -> bool {
        self.0.iter().any(|ex| ex != rel && ex.is_within(rel))
    }
}

fn read_entries(dir: &Path) -> Result<Vec<(String, bool)>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let Some(name) = entry_name(&entry) else {
            continue;
        };
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        entries.push((name, file_type.is_dir()));
    }
    entries.sort();
    Ok(entries)
}

fn prune(
    src_dir: &Path,
    dst_dir: &Path,
    rel: &NormalizedPath,
    filter: &Exclusions<'_>,
    stats: &mut MirrorStats,
) -> Result<()> {
    for (name, dst_is_dir) in read_entries(dst_dir)? {
        let child = rel.join(&name);
        if filter.excludes(&child) {
            continue;
        }

        let src_path = src_dir.join(&name);
        let dst_path = dst_dir.join(&name);

        if filter.shelters(&child) {
            if dst_is_dir {
                prune(&src_path, &dst_path, &child, filter, stats)?;
            }
            continue;
        }

        let matches_source = if dst_is_dir {
            src_path.is_dir()
        } else {
            src_path.is_file()
        };

        if !matches_source {
            tracing::debug!(path = %child, "Removing stale entry");
            remove_path(&dst_path)?;
            stats.removed += 1;
        } else if dst_is_dir {
            prune(&src_path, &dst_path, &child, filter, stats)?;
        }
    }
    Ok(())
}

fn copy_into(
    src_dir: &Path,
    dst_dir: &Path,
    rel: &NormalizedPath,
    filter: &Exclusions<'_>,
    stats: &mut MirrorStats,
) -> Result<()> {
    for (name, src_is_dir) in read_entries(src_dir)? {
        let child = rel.join(&name);
        if filter.excludes(&child) {
            continue;
        }

        let src_path = src_dir.join(&name);
        let dst_path = dst_dir.join(&name);

        if src_is_dir {
            fs::create_dir_all(&dst_path).map_err(|e| Error::io(&dst_path, e))?;
            copy_into(&src_path, &dst_path, &child, filter, stats)?;
        } else if dst_path.is_dir() && filter.shelters(&child) {
            tracing::warn!(path = %child, "Source file collides with a directory holding excluded content, skipping");
        } else if copy_if_changed(&src_path, &dst_path)? {
            tracing::debug!(path = %child, "Wrote file");
            stats.written += 1;
        }
    }
    Ok(())
}
