//! Filesystem abstraction used by the scan, header and emit stages.
//!
//! All paths handed to a [`SourceTree`] are relative to the library root.
//! [`FsTree`] walks the real filesystem; [`MemoryTree`] keeps everything in
//! memory so the stages can be tested without touching disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{IoResultExt, MigrateError, MigrateResult};

/// Read/list/write capability set the migration stages need.
pub trait SourceTree {
    /// Whether a file or directory exists at `rel`.
    fn exists(&self, rel: &Path) -> bool;

    /// Read a whole file as UTF-8 text.
    fn read_to_string(&self, rel: &Path) -> MigrateResult<String>;

    /// Every file below `rel_dir`, recursively, in walk order.
    ///
    /// Walk order is top-down: the files of a directory come before
    /// anything inside its subdirectories.
    ///
    /// A missing directory yields an empty list.
    fn walk_files(&self, rel_dir: &Path) -> MigrateResult<Vec<PathBuf>>;

    /// Names of the entries directly inside `rel_dir`.
    ///
    /// A missing directory yields an empty list.
    fn list_dir(&self, rel_dir: &Path) -> MigrateResult<Vec<String>>;

    /// Create or overwrite a file, returning its display path.
    fn write(&mut self, rel: &Path, content: &str) -> MigrateResult<PathBuf>;

    /// Path shown to the operator for `rel`.
    fn display_path(&self, rel: &Path) -> PathBuf;
}

/// A [`SourceTree`] backed by the real filesystem.
#[derive(Debug, Clone)]
pub struct FsTree {
    root: PathBuf,
}

impl FsTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceTree for FsTree {
    fn exists(&self, rel: &Path) -> bool {
        self.root.join(rel).exists()
    }

    fn read_to_string(&self, rel: &Path) -> MigrateResult<String> {
        let path = self.root.join(rel);
        fs::read_to_string(&path).with_path(path)
    }

    fn walk_files(&self, rel_dir: &Path) -> MigrateResult<Vec<PathBuf>> {
        let dir = self.root.join(rel_dir);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        // Stable sort: files keep their directory order, subdirectories go last.
        let walker = WalkDir::new(&dir).sort_by(|a, b| {
            a.file_type().is_dir().cmp(&b.file_type().is_dir())
        });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(dir.as_path()).to_path_buf();
                MigrateError::io(path, io::Error::from(e))
            })?;
            let path = entry.path();
            if path.is_file() {
                let rel = path.strip_prefix(&self.root).unwrap_or(path);
                files.push(rel.to_path_buf());
            }
        }
        Ok(files)
    }

    fn list_dir(&self, rel_dir: &Path) -> MigrateResult<Vec<String>> {
        let dir = self.root.join(rel_dir);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&dir).with_path(&dir)? {
            let entry = entry.with_path(&dir)?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn write(&mut self, rel: &Path, content: &str) -> MigrateResult<PathBuf> {
        let path = self.root.join(rel);
        fs::write(&path, content).with_path(&path)?;
        Ok(path)
    }

    fn display_path(&self, rel: &Path) -> PathBuf {
        self.root.join(rel)
    }
}

/// An in-memory [`SourceTree`].
///
/// Files are kept in insertion order, which is also the walk order.
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    files: Vec<(PathBuf, String)>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion, mainly for test fixtures.
    pub fn with_file(mut self, rel: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(rel, content);
        self
    }

    /// Insert or replace a file, keeping its original position on replace.
    pub fn insert(&mut self, rel: impl Into<PathBuf>, content: impl Into<String>) {
        let rel = rel.into();
        let content = content.into();
        match self.files.iter_mut().find(|(p, _)| *p == rel) {
            Some(slot) => slot.1 = content,
            None => self.files.push((rel, content)),
        }
    }

    /// Content of a file, if present.
    pub fn get(&self, rel: impl AsRef<Path>) -> Option<&str> {
        let rel = rel.as_ref();
        self.files
            .iter()
            .find(|(p, _)| p == rel)
            .map(|(_, c)| c.as_str())
    }
}

impl SourceTree for MemoryTree {
    fn exists(&self, rel: &Path) -> bool {
        self.files.iter().any(|(p, _)| p.starts_with(rel))
    }

    fn read_to_string(&self, rel: &Path) -> MigrateResult<String> {
        self.get(rel).map(str::to_string).ok_or_else(|| {
            MigrateError::io(
                rel,
                io::Error::new(io::ErrorKind::NotFound, "no such file in memory tree"),
            )
        })
    }

    fn walk_files(&self, rel_dir: &Path) -> MigrateResult<Vec<PathBuf>> {
        Ok(self
            .files
            .iter()
            .filter(|(p, _)| p.starts_with(rel_dir) && p.as_path() != rel_dir)
            .map(|(p, _)| p.clone())
            .collect())
    }

    fn list_dir(&self, rel_dir: &Path) -> MigrateResult<Vec<String>> {
        let mut names: Vec<String> = Vec::new();
        for (path, _) in &self.files {
            let Ok(rest) = path.strip_prefix(rel_dir) else {
                continue;
            };
            if let Some(first) = rest.components().next() {
                let name = first.as_os_str().to_string_lossy().into_owned();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }

    fn write(&mut self, rel: &Path, content: &str) -> MigrateResult<PathBuf> {
        self.insert(rel, content);
        Ok(rel.to_path_buf())
    }

    fn display_path(&self, rel: &Path) -> PathBuf {
        rel.to_path_buf()
    }
}
