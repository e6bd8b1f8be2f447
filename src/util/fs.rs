//! Filesystem utilities and the upward manifest probe.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::{Context, Result};

/// Read a file to string, with nice error messages.
pub fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read file: {}", path.display()))
}

/// Write a string to a file, creating parent directories if needed.
pub fn write_string(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write file: {}", path.display()))
}

/// Memoized existence checks for the upward probe.
///
/// The same crate directory is probed once per source file in the crate, so
/// repeated `exists` calls dominate without a cache. The cache is owned by the
/// embedding invocation and passed by reference; entries are append-only and
/// idempotent, so concurrent asset builds can share one instance.
#[derive(Debug, Default)]
pub struct ProbeCache {
    entries: RwLock<HashMap<PathBuf, bool>>,
}

impl ProbeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed an existence answer, bypassing the filesystem.
    pub fn seed(&self, path: impl Into<PathBuf>, exists: bool) {
        self.entries.write().unwrap().insert(path.into(), exists);
    }

    /// Check whether `path` exists, consulting the cache first.
    fn exists(&self, path: &Path) -> bool {
        if let Some(&known) = self.entries.read().unwrap().get(path) {
            return known;
        }
        let exists = path.exists();
        self.entries.write().unwrap().insert(path.to_path_buf(), exists);
        exists
    }
}

/// Search ancestor directories of `start` for any of the `markers` filenames.
///
/// The search begins at the parent of `start` and walks upward, stopping at
/// the filesystem root or upon entering a `node_modules` vendor directory.
/// At each level the first marker in the caller's list wins; the closest
/// ancestor wins overall. Returns the directory containing the marker.
pub fn find_ancestor_with(cache: &ProbeCache, start: &Path, markers: &[&str]) -> Option<PathBuf> {
    let mut dir = start.parent()?;

    loop {
        if dir.file_name().is_some_and(|n| n == "node_modules") {
            return None;
        }

        for marker in markers {
            if cache.exists(&dir.join(marker)) {
                return Some(dir.to_path_buf());
            }
        }

        dir = dir.parent()?;
    }
}

/// Convert a filesystem path into a JavaScript module specifier.
///
/// Separators become forward slashes and bare relative paths get an explicit
/// `./` prefix so the bundler resolves them as files, not packages.
pub fn module_specifier(path: &Path) -> String {
    let joined = path.to_string_lossy().replace('\\', "/");

    if joined.starts_with('/') || joined.starts_with('.') {
        joined
    } else {
        format!("./{joined}")
    }
}
