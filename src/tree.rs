//! Read-only source tree abstraction for template packs.
//!
//! The materializer walks entries through the `TreeEntry` trait so the
//! same logic serves the embedded pack (`MemTree`) and a template
//! directory on disk (`DirTree`). Logical paths are '/'-separated and
//! directory paths end with '/', which is what the directory install
//! predicates suffix-match against.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// A single entry of a read-only source tree.
pub trait TreeEntry {
    /// Entry name, used for placeholder substitution.
    fn name(&self) -> &str;

    /// Logical path within the pack; directories end with '/'.
    fn logical_path(&self) -> &str;

    fn is_dir(&self) -> bool;

    /// Children of a directory entry. Deterministic order per source.
    fn children(&self) -> Result<Vec<Box<dyn TreeEntry + '_>>>;

    /// Raw template text of a file entry.
    fn content(&self) -> Result<String>;
}

/// An in-memory template pack, keyed by full logical path. This is how
/// the built-in templates ship: compiled into the binary rather than
/// read from an archive at runtime.
#[derive(Debug)]
pub struct MemTree {
    files: BTreeMap<String, String>,
}

impl MemTree {
    pub fn new<I, K, V>(files: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let files =
            files.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        MemTree { files }
    }

    /// Returns the directory entry rooted at `prefix` (must end with '/').
    ///
    /// # Errors
    /// `Error::SourceUnavailable` if no packed file lives under the prefix.
    pub fn root(&self, prefix: &str) -> Result<MemEntry<'_>> {
        if !self.files.keys().any(|path| path.starts_with(prefix)) {
            return Err(Error::SourceUnavailable(format!(
                "no packed entries under '{}'",
                prefix
            )));
        }
        let name = prefix
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(prefix)
            .to_string();
        Ok(MemEntry { tree: self, path: prefix.to_string(), name, dir: true })
    }
}

/// An entry inside a `MemTree`.
#[derive(Debug)]
pub struct MemEntry<'a> {
    tree: &'a MemTree,
    path: String,
    name: String,
    dir: bool,
}

impl TreeEntry for MemEntry<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn logical_path(&self) -> &str {
        &self.path
    }

    fn is_dir(&self) -> bool {
        self.dir
    }

    fn children(&self) -> Result<Vec<Box<dyn TreeEntry + '_>>> {
        let mut entries: Vec<Box<dyn TreeEntry>> = Vec::new();
        let mut last_dir: Option<String> = None;

        // Keys are sorted, so all paths under one subdirectory are
        // adjacent and a single pass collects each child once.
        for path in self.tree.files.keys() {
            let Some(rest) = path.strip_prefix(&self.path) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir_name, _)) => {
                    if last_dir.as_deref() == Some(dir_name) {
                        continue;
                    }
                    last_dir = Some(dir_name.to_string());
                    entries.push(Box::new(MemEntry {
                        tree: self.tree,
                        path: format!("{}{}/", self.path, dir_name),
                        name: dir_name.to_string(),
                        dir: true,
                    }));
                }
                None => {
                    entries.push(Box::new(MemEntry {
                        tree: self.tree,
                        path: path.clone(),
                        name: rest.to_string(),
                        dir: false,
                    }));
                }
            }
        }

        Ok(entries)
    }

    fn content(&self) -> Result<String> {
        self.tree
            .files
            .get(&self.path)
            .cloned()
            .ok_or_else(|| {
                Error::SourceUnavailable(format!("missing packed entry '{}'", self.path))
            })
    }
}

/// A template tree rooted at a directory on disk. Interchangeable with
/// the embedded pack from the materializer's point of view.
pub struct DirTree {
    root: PathBuf,
}

impl DirTree {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        DirTree { root: root.as_ref().to_path_buf() }
    }

    /// Returns the directory entry for `prefix` (ending with '/')
    /// resolved under the tree root.
    pub fn root(&self, prefix: &str) -> Result<DirEntry> {
        let path = self.root.join(prefix.trim_end_matches('/'));
        if !path.is_dir() {
            return Err(Error::SourceUnavailable(format!(
                "template directory '{}' does not exist",
                path.display()
            )));
        }
        let name = prefix
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(prefix)
            .to_string();
        Ok(DirEntry { path, logical: prefix.to_string(), name, dir: true })
    }
}

/// An entry of a filesystem-backed template tree.
#[derive(Debug)]
pub struct DirEntry {
    path: PathBuf,
    logical: String,
    name: String,
    dir: bool,
}

impl TreeEntry for DirEntry {
    fn name(&self) -> &str {
        &self.name
    }

    fn logical_path(&self) -> &str {
        &self.logical
    }

    fn is_dir(&self) -> bool {
        self.dir
    }

    fn children(&self) -> Result<Vec<Box<dyn TreeEntry + '_>>> {
        let read_dir = fs::read_dir(&self.path).map_err(|e| {
            Error::SourceUnavailable(format!(
                "cannot read '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| {
                Error::SourceUnavailable(format!(
                    "cannot read '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let dir = entry.path().is_dir();
            let logical = if dir {
                format!("{}{}/", self.logical, name)
            } else {
                format!("{}{}", self.logical, name)
            };
            entries.push(DirEntry { path: entry.path(), logical, name, dir });
        }

        // read_dir order is platform-dependent; sort for determinism.
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries
            .into_iter()
            .map(|e| Box::new(e) as Box<dyn TreeEntry>)
            .collect())
    }

    fn content(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| {
            Error::SourceUnavailable(format!(
                "cannot read '{}': {}",
                self.path.display(),
                e
            ))
        })
    }
}
