//! Template content sources.
//!
//! The loader reads raw template bytes through the [`TemplateSource`] trait,
//! keeping the storage backend pluggable: a directory on disk, an in-memory
//! map, or anything else that can hand back a byte stream for a name.
//!
//! Names are root-relative paths; a leading `/` is tolerated so `/b.html`
//! and `b.html` address the same entry.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Component, Path, PathBuf};

/// A virtual file system exposing templates by name.
///
/// Implementations open the backing entry immediately before reading; the
/// returned reader releases its handle on drop, on success and failure paths
/// alike.
pub trait TemplateSource: Send + Sync {
    /// Open the named template for reading.
    ///
    /// # Errors
    ///
    /// Returns an error with [`io::ErrorKind::NotFound`] when the name does
    /// not exist, or another [`io::Error`] when it exists but cannot be
    /// opened.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;
}

/// Directory-backed template source.
///
/// Resolves names relative to a root directory. Names that escape the root
/// (via `..` components or absolute platform paths) are rejected.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        let relative = path.trim_start_matches('/');
        let mut resolved = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::PermissionDenied,
                        format!("template path escapes source root: {path}"),
                    ));
                }
            }
        }
        Ok(resolved)
    }
}

impl TemplateSource for DirSource {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        let resolved = self.resolve(path)?;
        let file = File::open(resolved)?;
        Ok(Box::new(file))
    }
}

/// In-memory template source.
///
/// Useful for tests and for shipping a fixed template set inside a binary.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl AsRef<str>, content: impl Into<Vec<u8>>) -> &mut Self {
        self.entries.insert(normalize(name.as_ref()), content.into());
        self
    }

    /// Build a source from `(name, content)` pairs.
    pub fn from_entries<N, C>(entries: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: AsRef<str>,
        C: Into<Vec<u8>>,
    {
        let mut source = Self::new();
        for (name, content) in entries {
            source.insert(name, content);
        }
        source
    }
}

fn normalize(name: &str) -> String {
    name.trim_start_matches('/').to_string()
}

impl TemplateSource for MemorySource {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        match self.entries.get(&normalize(path)) {
            Some(content) => Ok(Box::new(Cursor::new(content.as_slice()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no template entry named '{path}'"),
            )),
        }
    }
}
