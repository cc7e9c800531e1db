//! loadtmpl - Inheritance-aware template loader for Tera
//!
//! Fetches templates by name from a pluggable virtual file system and
//! composes single-inheritance chains declared through a specially formed
//! leading comment. A template that begins with
//!
//! ```text
//! {# extends "layout.html" #}
//! ```
//!
//! is merged into its parent's render tree as one more named definition: the
//! loader recursively resolves the whole ancestor chain, parses the root into
//! a fresh [`tera::Tera`] instance, and registers each descendant inside that
//! same instance. Rendering the loaded name produces the root body with every
//! descendant's `{% block %}` overrides applied. Loads are cached by name so
//! repeated requests cost neither filesystem reads nor reparsing.
//!
//! # Core Modules
//!
//! - [`loader`] - [`Loader`] and [`CompiledTemplate`]: chain resolution,
//!   fragment composition, by-name caching, coalesced concurrent loads
//! - [`matcher`] - extraction of the parent declaration from raw content
//! - [`source`] - the [`TemplateSource`] file-system seam with directory and
//!   in-memory implementations
//! - [`error`] - [`LoadError`] covering every failure mode
//!
//! # Example
//!
//! ```
//! use loadtmpl::{FunctionMap, Loader, MemorySource};
//! use tera::Context;
//!
//! let mut source = MemorySource::new();
//! source.insert(
//!     "layout.html",
//!     "<main>{% block body %}default{% endblock %}</main>",
//! );
//! source.insert(
//!     "page.html",
//!     r#"{# extends "layout.html" #}{% block body %}page{% endblock %}"#,
//! );
//!
//! let loader = Loader::new(source, FunctionMap::new());
//! let page = loader.load("/page.html")?;
//! assert_eq!(page.render(&Context::new())?, "<main>page</main>");
//!
//! // Served from cache: same underlying object, no filesystem access.
//! let again = loader.load("/page.html")?;
//! assert!(std::sync::Arc::ptr_eq(&page, &again));
//! # Ok::<(), loadtmpl::LoadError>(())
//! ```
//!
//! # Inheritance Semantics
//!
//! Only a well-formed declaration anchored at the very start of the content
//! activates inheritance; a malformed one is plain content and the template
//! loads as a root. The declaration comment is left verbatim inside the
//! merged fragment (Tera comments are inert) and the synthesized extends
//! prefix adds no newline, so engine-reported line numbers keep matching the
//! file on disk.
//!
//! # Caching
//!
//! Successfully loaded names are cached for the lifetime of the [`Loader`];
//! there is no eviction and no staleness detection. Environments where the
//! backing files change between requests can switch the loader into no-cache
//! mode ([`Loader::set_no_cache`]) to trade performance for freshness.

pub mod error;
pub mod loader;
pub mod matcher;
pub mod source;

pub use error::LoadError;
pub use loader::{CompiledTemplate, FunctionMap, Loader, TemplateFunction};
pub use source::{DirSource, MemorySource, TemplateSource};
