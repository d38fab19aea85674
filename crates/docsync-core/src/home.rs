//! The home repository's `docs/` tree as it accumulates during a run

use std::path::{Path, PathBuf};

use docsync_fs::{DocTree, SyncPath};
use serde::Serialize;

use crate::Result;

/// How content reached the home tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PullKind {
    /// The destination's owned subtree
    Owned,
    /// A top-level entry promoted into the owned subtree
    Loose { entry: String },
}

/// One pull into the home tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pulled {
    /// Short name of the destination pulled from
    pub repo: String,
    #[serde(flatten)]
    pub kind: PullKind,
    /// Files written in the home tree
    pub files: usize,
}

/// The home `docs/` directory plus a log of everything pulled into it.
///
/// Mutated in place by each repository pass; later destinations receive
/// what earlier ones contributed.
#[derive(Debug)]
pub struct HomeDocs {
    root: PathBuf,
    docs: PathBuf,
    pulls: Vec<Pulled>,
}

impl HomeDocs {
    pub fn new(home_root: &Path) -> Self {
        Self {
            root: home_root.to_path_buf(),
            docs: home_root.join(SyncPath::Docs.as_str()),
            pulls: Vec::new(),
        }
    }

    /// Working tree of the home repository.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs
    }

    /// `docs/<short>` in the home tree.
    pub fn owned_dir(&self, short: &str) -> PathBuf {
        self.docs.join(short)
    }

    /// Names of the top-level entries currently in the home `docs/`.
    pub fn top_level_names(&self) -> Result<Vec<String>> {
        Ok(docsync_fs::list_entries(&self.docs)?)
    }

    /// Merge a destination's owned subtree into `docs/<short>`.
    ///
    /// Skipped when `source` is empty or every file in it already exists in
    /// home with the same content. Returns the files written.
    pub fn pull_owned(&mut self, short: &str, source: &Path) -> Result<usize> {
        let incoming = DocTree::scan(source)?;
        if incoming.is_empty() {
            return Ok(0);
        }

        let target = self.owned_dir(short);
        if incoming.is_covered_by(&DocTree::scan(&target)?) {
            tracing::debug!(repo = short, "Owned docs already present in home");
            return Ok(0);
        }

        let files = docsync_fs::merge_tree(source, &target)?;
        if files > 0 {
            self.pulls.push(Pulled {
                repo: short.to_string(),
                kind: PullKind::Owned,
                files,
            });
        }
        Ok(files)
    }

    /// Copy a loose entry into `docs/<short>/<entry>`.
    pub fn adopt_loose(&mut self, short: &str, entry: &str, source: &Path) -> Result<usize> {
        let files = docsync_fs::merge_tree(source, &self.owned_dir(short).join(entry))?;
        self.pulls.push(Pulled {
            repo: short.to_string(),
            kind: PullKind::Loose {
                entry: entry.to_string(),
            },
            files,
        });
        Ok(files)
    }

    /// True once anything has been pulled into the home tree.
    pub fn has_pulled(&self) -> bool {
        !self.pulls.is_empty()
    }

    pub fn pulls(&self) -> &[Pulled] {
        &self.pulls
    }

    pub fn into_pulls(self) -> Vec<Pulled> {
        self.pulls
    }
}
