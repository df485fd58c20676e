//! arXiv source implementation.

use async_trait::async_trait;
use chrono::Datelike;
use feed_rs::parser;
use std::sync::Arc;

use crate::config::EndpointConfig;
use crate::models::{Candidate, CandidateRecord, QueryDescriptor, SourceKind};
use crate::sources::{Source, SourceError};
use crate::utils::Transport;

/// Fixed query parameters; arXiv is always asked for ten results by relevance
const ARXIV_QUERY_PARAMS: &str = "?&sortBy=relevance&sortOrder=ascending&max_results=10";

/// Marker that makes a term an arXiv ID lookup
const ARXIV_ID_MARKER: &str = "arXiv:";

/// Venue reported for every arXiv record
const ARXIV_VENUE: &str = "arXiv";

/// Percent-encode a keyword term for the arXiv query.
///
/// Hyphens become spaces too, so `self-attention` searches for `self attention`.
fn encode_search_terms(term: &str) -> String {
    term.replace(|c| c == ' ' || c == '-', "%20")
}

/// A term containing `arXiv:` is an ID lookup; anything else a keyword search
pub(crate) fn classify(base: &str, term: &str) -> QueryDescriptor {
    if term.contains(ARXIV_ID_MARKER) {
        let id = term.replace(ARXIV_ID_MARKER, "");
        QueryDescriptor::id_lookup(format!("{}{}&id_list={}", base, ARXIV_QUERY_PARAMS, id))
    } else {
        QueryDescriptor::keyword(format!(
            "{}{}&search_query={}",
            base,
            ARXIV_QUERY_PARAMS,
            encode_search_terms(term)
        ))
    }
}

/// arXiv research source
///
/// The Atom feed already carries full entries, so no upgrade calls are needed.
#[derive(Debug, Clone)]
pub struct ArxivSource {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ArxivSource {
    /// Create a new arXiv source
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, EndpointConfig::default().arxiv)
    }

    /// Create with a custom API URL (for testing)
    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Parse an arXiv Atom feed entry into a record
    fn parse_entry(entry: &feed_rs::model::Entry) -> CandidateRecord {
        // Long titles are wrapped with a newline and a space.
        let title = entry.title.as_ref().map(|t| t.content.replace("\n ", ""));

        let year = entry
            .published
            .map(|d| d.year().to_string())
            .unwrap_or_default();

        let mut record = CandidateRecord::new(SourceKind::Arxiv)
            .authors(entry.authors.iter().map(|a| a.name.clone()))
            .venue(ARXIV_VENUE)
            .year(year);
        record.title = title;
        record
    }

    fn parse_feed(body: &str) -> Result<Vec<Candidate>, SourceError> {
        let feed = parser::parse(body.as_bytes())
            .map_err(|e| SourceError::Parse(format!("Failed to parse Atom feed: {}", e)))?;

        Ok(feed
            .entries
            .iter()
            .map(|entry| Self::parse_entry(entry).into())
            .collect())
    }
}

#[async_trait]
impl Source for ArxivSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Arxiv
    }

    fn classify(&self, term: &str) -> QueryDescriptor {
        classify(&self.base_url, term)
    }

    async fn fetch_candidates(
        &self,
        query: &QueryDescriptor,
    ) -> Result<Vec<Candidate>, SourceError> {
        let body = self.transport.fetch(&query.url).await?;
        let candidates = Self::parse_feed(&body)?;
        tracing::debug!("arXiv returned {} entries", candidates.len());
        Ok(candidates)
    }
}
