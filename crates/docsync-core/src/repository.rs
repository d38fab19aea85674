//! Repository references and the sync set

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{Error, Result};

/// A destination repository identified as `owner/name`.
///
/// The owner may itself contain slashes (`group/subgroup/name`); the short
/// name is always the last segment and names both the working clone and the
/// owned subtree `docs/<short_name>/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryRef {
    owner: String,
    name: String,
}

impl RepositoryRef {
    /// Parse a single `owner/name` entry. A trailing `.git` is stripped.
    pub fn parse(entry: &str) -> Result<Self> {
        let trimmed = entry.trim();
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
        let invalid = |reason: &str| Error::InvalidRepository {
            entry: entry.to_string(),
            reason: reason.to_string(),
        };

        let (owner, name) = trimmed
            .rsplit_once('/')
            .ok_or_else(|| invalid("expected owner/name"))?;

        if owner.split('/').any(str::is_empty) || name.is_empty() {
            return Err(invalid("empty path segment"));
        }
        if name == "." || name == ".." {
            return Err(invalid("name must be a directory name"));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Last path segment; names the clone directory and owned subtree.
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Clone URL under `remote`: `{remote}/{owner}/{name}.git`.
    pub fn clone_url(&self, remote: &str) -> String {
        format!("{}/{}/{}.git", remote.trim_end_matches('/'), self.owner, self.name)
    }

    /// True when `filter` is this repository's short name or full name.
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.trim();
        let filter = filter.strip_suffix(".git").unwrap_or(filter);
        filter == self.name || filter == self.full_name()
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// The home repository plus its destination repositories, in configured order.
#[derive(Debug, Clone)]
pub struct SyncSet {
    home: String,
    destinations: Vec<RepositoryRef>,
}

impl SyncSet {
    /// Build the set from configured entries.
    ///
    /// Empty entries are ignored; an entry naming the home repository is
    /// dropped from the destinations. Fails when nothing remains to parse or
    /// two destinations share a short name.
    pub fn new<S: AsRef<str>>(home: &str, entries: &[S]) -> Result<Self> {
        let mut destinations: Vec<RepositoryRef> = Vec::new();
        let mut saw_entry = false;

        for entry in entries.iter().map(AsRef::as_ref) {
            if entry.trim().is_empty() {
                continue;
            }
            saw_entry = true;

            let repo = RepositoryRef::parse(entry)?;
            if repo.short_name() == home {
                tracing::debug!(repo = %repo, "Skipping home repository in destination list");
                continue;
            }
            if let Some(existing) = destinations
                .iter()
                .find(|d| d.short_name() == repo.short_name())
            {
                return Err(Error::DuplicateShortName {
                    short_name: repo.short_name().to_string(),
                    first: existing.full_name(),
                    second: repo.full_name(),
                });
            }
            destinations.push(repo);
        }

        if !saw_entry {
            return Err(Error::MissingRepos);
        }

        Ok(Self {
            home: home.to_string(),
            destinations,
        })
    }

    /// Short name of the home repository.
    pub fn home(&self) -> &str {
        &self.home
    }

    pub fn destinations(&self) -> &[RepositoryRef] {
        &self.destinations
    }

    /// Destinations selected by an optional filter argument.
    ///
    /// A filter that matches nothing is a configuration error.
    pub fn select(&self, filter: Option<&str>) -> Result<Vec<&RepositoryRef>> {
        let Some(filter) = filter else {
            return Ok(self.destinations.iter().collect());
        };

        let selected: Vec<_> = self
            .destinations
            .iter()
            .filter(|repo| repo.matches(filter))
            .collect();

        if selected.is_empty() {
            return Err(Error::UnknownRepository {
                filter: filter.to_string(),
            });
        }
        Ok(selected)
    }

    /// Every configured short name plus the home short name.
    pub fn short_names(&self) -> BTreeSet<String> {
        self.destinations
            .iter()
            .map(|repo| repo.short_name().to_string())
            .chain(std::iter::once(self.home.clone()))
            .collect()
    }
}

/// Derive a short name from a remote URL (`.../platform.git` -> `platform`).
///
/// Handles scp-style URLs (`git@host:owner/name.git`) and local paths.
pub fn short_name_from_url(url: &str) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    let name = trimmed.rsplit(['/', ':', '\\']).next()?;
    (!name.is_empty()).then(|| name.to_string())
}
