//! Shared helpers for integration tests.

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use loadtmpl::{DirSource, TemplateSource};
use tempfile::TempDir;

/// Write `(name, content)` fixture files into a fresh temporary directory.
pub fn fixture_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create fixture dir");
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).expect("write fixture file");
    }
    dir
}

/// A [`TemplateSource`] wrapper that counts how many times templates are
/// opened, so tests can assert on filesystem activity.
pub struct CountingSource {
    inner: DirSource,
    opens: Arc<AtomicUsize>,
}

impl CountingSource {
    pub fn new(dir: &TempDir) -> (Self, Arc<AtomicUsize>) {
        let opens = Arc::new(AtomicUsize::new(0));
        let source = Self {
            inner: DirSource::new(dir.path()),
            opens: Arc::clone(&opens),
        };
        (source, opens)
    }
}

impl TemplateSource for CountingSource {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        self.inner.open(path)
    }
}
