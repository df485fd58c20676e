//! Literature database adapters behind one [`Source`] trait.
//!
//! Each source knows how to classify a raw search term into a
//! [`QueryDescriptor`], how to turn the response body into [`Candidate`]s, and,
//! for sources whose keyword search only returns identifiers, how to upgrade a
//! stub into a full [`CandidateRecord`].
//!
//! # Feature Flags
//!
//! Individual sources can be disabled at compile time using Cargo features:
//!
//! - `pubmed` - Enable PubMed source (default: enabled)
//! - `crossref` - Enable Crossref source (default: enabled)
//! - `arxiv` - Enable arXiv source (default: enabled)
//! - `google_scholar` - Enable Google Scholar source (default: enabled)
//!
//! A request for a source that was compiled out resolves to "not found".

#[cfg(feature = "source-arxiv")]
mod arxiv;
#[cfg(feature = "source-crossref")]
mod crossref;
#[cfg(feature = "source-google_scholar")]
mod google_scholar;
#[cfg(feature = "source-pubmed")]
mod pubmed;
mod registry;

pub mod mock;

#[cfg(feature = "source-arxiv")]
pub use arxiv::ArxivSource;
#[cfg(feature = "source-crossref")]
pub use crossref::{extract_doi, CrossRefSource};
#[cfg(feature = "source-google_scholar")]
pub use google_scholar::{remove_matching_chars, GoogleScholarSource};
#[cfg(feature = "source-pubmed")]
pub use pubmed::PubMedSource;

pub use mock::MockTransport;
pub use registry::SourceRegistry;

use crate::config::EndpointConfig;
use crate::models::{Candidate, CandidateRecord, QueryDescriptor, SourceKind};
use async_trait::async_trait;

/// The Source trait defines the interface for all literature database adapters.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Which database this adapter talks to
    fn kind(&self) -> SourceKind;

    /// Unique identifier for this source (e.g. "arxiv", "pubmed")
    fn id(&self) -> &'static str {
        self.kind().id()
    }

    /// Human-readable name of this source
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Turn a raw search term into a request descriptor. Never fails.
    fn classify(&self, term: &str) -> QueryDescriptor;

    /// Run the query and parse the response into candidates, possibly none.
    ///
    /// Performs exactly one transport call.
    async fn fetch_candidates(
        &self,
        query: &QueryDescriptor,
    ) -> Result<Vec<Candidate>, SourceError>;

    /// Fetch the full record behind a stub's identifier.
    async fn upgrade(&self, _key: &str) -> Result<CandidateRecord, SourceError> {
        Err(SourceError::NotImplemented)
    }
}

/// Classify `term` for `source` against the default endpoints.
///
/// Returns `None` only when the source was compiled out.
pub fn classify(term: &str, source: SourceKind) -> Option<QueryDescriptor> {
    classify_with(&EndpointConfig::default(), term, source)
}

/// Classify `term` for `source` against the given endpoints
#[allow(unused_variables)]
pub fn classify_with(
    endpoints: &EndpointConfig,
    term: &str,
    source: SourceKind,
) -> Option<QueryDescriptor> {
    let base = endpoints.base_url(source);
    match source {
        #[cfg(feature = "source-pubmed")]
        SourceKind::PubMed => Some(pubmed::classify(base, term)),
        #[cfg(feature = "source-crossref")]
        SourceKind::Crossref => Some(crossref::classify(base, term)),
        #[cfg(feature = "source-arxiv")]
        SourceKind::Arxiv => Some(arxiv::classify(base, term)),
        #[cfg(feature = "source-google_scholar")]
        SourceKind::GoogleScholar => Some(google_scholar::classify(base, term)),
        #[allow(unreachable_patterns)]
        _ => None,
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The requested operation is not implemented for this source
    #[error("Operation not implemented for this source")]
    NotImplemented,

    /// Network failure, timeout included
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the source
    #[error("API error: {0}")]
    Api(String),

    /// Parsing error (XML, JSON, HTML, etc.)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
