//! # Cite Finder
//!
//! Resolve a free-form search term (an identifier, a DOI, a title or a PDF
//! file name) against PubMed, Crossref, arXiv or Google Scholar, and reduce
//! the best match to a one-line, filename-safe citation summary such as
//! `Vaswani Polosukhin (arXiv 2017) Attention Is All You Need`.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SearchRequest, Candidate, Citation, etc.)
//! - [`sources`]: One adapter per literature database behind the [`Source`] trait
//! - [`resolver`]: Candidate ranking, normalization and the not-found boundary
//! - [`utils`]: HTTP transport, summary formatting and clipboard access
//! - [`config`]: Configuration management
//! - [`ui`]: Terminal output for the CLI
//!
//! ## Example
//!
//! ```no_run
//! use cite_finder::{Resolver, SourceRegistry};
//! use cite_finder::config::Config;
//! use cite_finder::models::{SearchRequest, SourceKind};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SourceRegistry::from_config(&Config::default())?;
//! let resolver = Resolver::new(registry);
//!
//! let request = SearchRequest::new("arXiv:1706.03762", SourceKind::Arxiv);
//! println!("{}", resolver.search(&request).await.text());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod models;
pub mod resolver;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Citation, SearchMode, SearchRequest, SourceKind};
pub use resolver::{Resolution, ResolveError, Resolver, NOT_FOUND_MESSAGE};
pub use sources::{Source, SourceRegistry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
