//! PubMed source implementation using the E-utilities JSON API.

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

use crate::config::EndpointConfig;
use crate::models::{Candidate, CandidateRecord, QueryDescriptor, QueryKind, SourceKind};
use crate::sources::{Source, SourceError};
use crate::utils::Transport;

/// A bare PubMed ID is exactly eight digits
fn pmid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{8}$").expect("PMID pattern is valid"))
}

/// Build the esummary URL for one PubMed ID
fn summary_url(base: &str, id: &str) -> String {
    format!("{}/esummary.fcgi?db=pubmed&retmode=json&id={}", base, id)
}

/// Build the relevance-sorted esearch URL for a keyword term
fn search_url(base: &str, term: &str) -> String {
    format!(
        "{}/esearch.fcgi?db=pubmed&sort=relevance&retmode=json&term={}",
        base, term
    )
}

/// An eight-digit term is a PubMed ID lookup; anything else is a keyword search
pub(crate) fn classify(base: &str, term: &str) -> QueryDescriptor {
    if pmid_pattern().is_match(term) {
        QueryDescriptor::id_lookup(summary_url(base, term))
    } else {
        QueryDescriptor::keyword(search_url(base, term))
    }
}

/// PubMed source
///
/// Keyword searches return PubMed IDs only; each is upgraded through esummary.
#[derive(Debug, Clone)]
pub struct PubMedSource {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl PubMedSource {
    /// Create a PubMed source against the public E-utilities endpoint
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, EndpointConfig::default().pubmed)
    }

    /// Create with a custom E-utilities base URL (for testing)
    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Parse an esearch response into its ordered ID list
    fn parse_search_response(json: &str) -> Result<Vec<String>, SourceError> {
        #[derive(Debug, Deserialize)]
        struct ESearchResponse {
            esearchresult: ESearchResult,
        }

        #[derive(Debug, Deserialize)]
        struct ESearchResult {
            #[serde(default)]
            idlist: Vec<String>,
        }

        let response: ESearchResponse = serde_json::from_str(json).map_err(|e| {
            SourceError::Parse(format!("Failed to parse PubMed search JSON: {}", e))
        })?;

        Ok(response.esearchresult.idlist)
    }

    /// Parse an esummary response into the record for its first UID
    fn parse_summary_response(json: &str) -> Result<Option<CandidateRecord>, SourceError> {
        #[derive(Debug, Deserialize)]
        struct ESummaryResponse {
            result: serde_json::Map<String, serde_json::Value>,
        }

        #[derive(Debug, Deserialize)]
        struct DocumentSummary {
            title: Option<String>,
            #[serde(default)]
            pubdate: String,
            #[serde(default)]
            source: String,
            #[serde(default)]
            authors: Vec<SummaryAuthor>,
            lastauthor: Option<String>,
        }

        #[derive(Debug, Deserialize)]
        struct SummaryAuthor {
            #[serde(default)]
            name: String,
        }

        let response: ESummaryResponse = serde_json::from_str(json).map_err(|e| {
            SourceError::Parse(format!("Failed to parse PubMed summary JSON: {}", e))
        })?;

        let uids: Vec<String> = match response.result.get("uids") {
            Some(uids) => serde_json::from_value(uids.clone())?,
            None => return Ok(None),
        };

        let Some(uid) = uids.first() else {
            return Ok(None);
        };

        let summary: DocumentSummary = response
            .result
            .get(uid)
            .cloned()
            .map(serde_json::from_value::<DocumentSummary>)
            .transpose()?
            .ok_or_else(|| SourceError::Parse(format!("Summary for PMID {} is missing", uid)))?;

        let year = summary
            .pubdate
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();

        let mut record = CandidateRecord::new(SourceKind::PubMed)
            .authors(summary.authors.into_iter().map(|a| a.name))
            .venue(summary.source)
            .year(year);
        record.title = summary.title;
        record.last_author = summary.lastauthor;

        Ok(Some(record))
    }
}

#[async_trait]
impl Source for PubMedSource {
    fn kind(&self) -> SourceKind {
        SourceKind::PubMed
    }

    fn classify(&self, term: &str) -> QueryDescriptor {
        classify(&self.base_url, term)
    }

    async fn fetch_candidates(
        &self,
        query: &QueryDescriptor,
    ) -> Result<Vec<Candidate>, SourceError> {
        let body = self.transport.fetch(&query.url).await?;

        match query.kind {
            QueryKind::KeywordSearch => {
                let ids = Self::parse_search_response(&body)?;
                tracing::debug!("PubMed returned {} IDs", ids.len());
                Ok(ids
                    .into_iter()
                    .map(|id| Candidate::stub(SourceKind::PubMed, id))
                    .collect())
            }
            QueryKind::IdLookup => Ok(Self::parse_summary_response(&body)?
                .into_iter()
                .map(Candidate::Record)
                .collect()),
        }
    }

    async fn upgrade(&self, key: &str) -> Result<CandidateRecord, SourceError> {
        tracing::debug!("Upgrading PubMed ID {}", key);
        let body = self
            .transport
            .fetch(&summary_url(&self.base_url, key))
            .await?;

        Self::parse_summary_response(&body)?
            .ok_or_else(|| SourceError::Parse(format!("No summary returned for PMID {}", key)))
    }
}
