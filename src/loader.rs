//! Template loading with single-inheritance composition and caching.
//!
//! [`Loader`] resolves templates by name from a [`TemplateSource`], follows
//! `{# extends "..." #}` declarations up the ancestor chain, and merges each
//! descendant into its root's [`Tera`] instance as one more named definition.
//! Successful top-level loads are cached by name; ancestors are resolved
//! fresh for every chain so a cached tree is never mutated after it is handed
//! out.

use std::collections::HashMap;
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use serde::Serialize;
use tera::{Context, Tera, Value};

use crate::error::LoadError;
use crate::matcher;
use crate::source::TemplateSource;

/// A callable installed into the template engine under a function name.
pub type TemplateFunction =
    Arc<dyn Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync>;

/// Mapping from function name to callable, supplied once at construction and
/// installed into every fresh root template before parsing. Descendants
/// merged into a root inherit its functions.
pub type FunctionMap = HashMap<String, TemplateFunction>;

/// A parsed, executable template tree.
///
/// For an ancestor chain the tree holds one named definition per chain
/// member, all inside a single [`Tera`] instance; the entry point is the name
/// the load was requested under. Rendering the entry point produces the root
/// body with every descendant block override applied.
pub struct CompiledTemplate {
    tera: Tera,
    name: String,
}

impl CompiledTemplate {
    /// The entry-point name this template renders as.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of all definitions registered in the tree, one per chain member.
    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.tera.get_template_names()
    }

    /// Render the entry point against `context`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Render`] when template execution fails.
    pub fn render(&self, context: &Context) -> Result<String, LoadError> {
        self.tera.render(&self.name, context).map_err(|err| LoadError::Render {
            name: self.name.clone(),
            source: Box::new(err),
        })
    }

    /// Render the entry point against any serializable value.
    ///
    /// Convenience over [`CompiledTemplate::render`] for callers that do not
    /// want to build a [`Context`] by hand.
    pub fn render_data<T: Serialize>(&self, data: &T) -> Result<String, LoadError> {
        let context = Context::from_serialize(data).map_err(|err| LoadError::Render {
            name: self.name.clone(),
            source: Box::new(err),
        })?;
        self.render(&context)
    }
}

impl std::fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .field("definitions", &self.definition_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Fetches templates by name from a [`TemplateSource`], resolving inheritance
/// declared through a leading `{# extends "..." #}` comment.
///
/// Loads of the same name are cached and served without filesystem or parse
/// work; see [`Loader::set_no_cache`] for the always-fresh mode. The loader
/// is safe to share across threads: cache reads and writes are synchronized,
/// and concurrent first loads of one name are coalesced into a single read
/// and parse.
pub struct Loader<S> {
    source: S,
    functions: FunctionMap,
    cache: DashMap<String, Arc<CompiledTemplate>>,
    gates: DashMap<String, Arc<Mutex<()>>>,
    no_cache: AtomicBool,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl<S: TemplateSource> Loader<S> {
    /// Create a loader over `source` with `functions` installed into every
    /// root template it builds.
    pub fn new(source: S, functions: FunctionMap) -> Self {
        Self {
            source,
            functions,
            cache: DashMap::new(),
            gates: DashMap::new(),
            no_cache: AtomicBool::new(false),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// When set, every load bypasses the cache entirely: nothing is read
    /// from it and nothing is stored, so each call re-reads and re-parses
    /// the whole ancestor chain. Output is rendering-equivalent to the
    /// cached path for unchanged inputs.
    pub fn set_no_cache(&self, no_cache: bool) {
        self.no_cache.store(no_cache, Ordering::Relaxed);
    }

    /// Whether the loader is in no-cache mode.
    pub fn no_cache(&self) -> bool {
        self.no_cache.load(Ordering::Relaxed)
    }

    /// Cache `(hits, misses)` counters for loads served so far.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    /// Load the named template, following its ancestor chain.
    ///
    /// On a cache hit the stored [`CompiledTemplate`] is returned without any
    /// filesystem access. On a miss the content is read, its parent (if
    /// declared) is resolved recursively, and the merged result is parsed,
    /// cached, and returned. A failed load stores nothing.
    ///
    /// # Errors
    ///
    /// [`LoadError::NotFound`] / [`LoadError::Read`] when the name or any
    /// ancestor cannot be read, [`LoadError::Parse`] on invalid template
    /// syntax, with ancestor failures wrapped in [`LoadError::Ancestor`].
    pub fn load(&self, name: &str) -> Result<Arc<CompiledTemplate>, LoadError> {
        if self.no_cache() {
            tracing::debug!("cache disabled, loading '{}' fresh", name);
            return Ok(Arc::new(self.load_uncached(name)?));
        }

        if let Some(cached) = self.cache.get(name) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("template '{}' served from cache", name);
            return Ok(Arc::clone(&cached));
        }

        // Coalesce concurrent first loads of the same name: one caller does
        // the work, the rest block on the gate and pick up the cached result.
        let gate = self.gate(name);
        let _inflight = gate.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(cached) = self.cache.get(name) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("template '{}' filled by concurrent load", name);
            return Ok(Arc::clone(&cached));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("template '{}' not cached, loading", name);
        let compiled = Arc::new(self.load_uncached(name)?);
        self.cache.insert(name.to_string(), Arc::clone(&compiled));
        Ok(compiled)
    }

    fn gate(&self, name: &str) -> Arc<Mutex<()>> {
        self.gates.entry(name.to_string()).or_default().clone()
    }

    /// Resolve `name` and its ancestors without touching the cache.
    ///
    /// Recursion goes through this method rather than [`Loader::load`] so a
    /// descendant never merges itself into a tree some earlier caller
    /// already holds.
    fn load_uncached(&self, name: &str) -> Result<CompiledTemplate, LoadError> {
        let content = self.read_content(name)?;

        match matcher::parent_name(&content) {
            Some(parent) => {
                tracing::debug!("template '{}' extends '{}'", name, parent);
                let parent = parent.to_string();
                let mut compiled =
                    self.load_uncached(&parent).map_err(|err| LoadError::Ancestor {
                        name: name.to_string(),
                        parent: parent.clone(),
                        source: Box::new(err),
                    })?;

                // The extends prefix shares the child's first line and the
                // declaration comment stays in the body, so engine-reported
                // line numbers match the file on disk.
                let merged = format!("{{% extends \"{parent}\" %}}{content}");
                compiled.tera.add_raw_template(name, &merged).map_err(|err| {
                    LoadError::Parse {
                        name: name.to_string(),
                        source: Box::new(err),
                    }
                })?;
                compiled.name = name.to_string();
                Ok(compiled)
            }
            None => {
                tracing::debug!("template '{}' is a root", name);
                let mut tera = Tera::default();
                self.install_functions(&mut tera);
                tera.add_raw_template(name, &content).map_err(|err| LoadError::Parse {
                    name: name.to_string(),
                    source: Box::new(err),
                })?;
                Ok(CompiledTemplate {
                    tera,
                    name: name.to_string(),
                })
            }
        }
    }

    fn install_functions(&self, tera: &mut Tera) {
        for (name, function) in &self.functions {
            let function = Arc::clone(function);
            tera.register_function(name, move |args: &HashMap<String, Value>| function(args));
        }
    }

    fn read_content(&self, name: &str) -> Result<String, LoadError> {
        let mut reader = self.source.open(name).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                LoadError::NotFound {
                    name: name.to_string(),
                    source: err,
                }
            } else {
                LoadError::Read {
                    name: name.to_string(),
                    source: err,
                }
            }
        })?;

        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|err| LoadError::Read {
            name: name.to_string(),
            source: err,
        })?;

        String::from_utf8(bytes).map_err(|err| LoadError::Read {
            name: name.to_string(),
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })
    }
}

impl<S> std::fmt::Debug for Loader<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("cached", &self.cache.len())
            .field("no_cache", &self.no_cache.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}
