//! CrossRef source implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::EndpointConfig;
use crate::models::{Candidate, CandidateRecord, QueryDescriptor, QueryKind, SourceKind};
use crate::sources::{Source, SourceError};
use crate::utils::Transport;

/// DOI markers, checked in this order; the first one found in the term wins.
const DOI_MARKERS: [&str; 3] = ["https://doi.org/", "doi:", "DOI:"];

/// Work types that may be selected from a keyword search
const ELIGIBLE_TYPES: [&str; 2] = ["journal-article", "posted-content"];

/// Extract a DOI from a term carrying one of the DOI markers.
///
/// The first marker contained in the term is removed everywhere it occurs,
/// then leading whitespace is trimmed. Terms with no marker return `None`.
///
/// ```
/// use cite_finder::sources::extract_doi;
///
/// assert_eq!(extract_doi("doi: 10.1000/xyz123").as_deref(), Some("10.1000/xyz123"));
/// assert_eq!(extract_doi("https://doi.org/10.1038/nphys1170").as_deref(), Some("10.1038/nphys1170"));
/// assert_eq!(extract_doi("10.1000/xyz123"), None);
/// ```
pub fn extract_doi(term: &str) -> Option<String> {
    let marker = DOI_MARKERS.iter().find(|m| term.contains(*m))?;

    // Removing one occurrence can splice a new one together ("ddoi:oi:").
    let mut doi = term.replace(marker, "");
    while doi.contains(marker) {
        doi = doi.replace(marker, "");
    }

    Some(doi.trim_start().to_string())
}

fn work_url(base: &str, doi: &str) -> String {
    format!("{}/works/{}", base, doi)
}

/// A term with a DOI marker is a direct work lookup; anything else a relevance search
pub(crate) fn classify(base: &str, term: &str) -> QueryDescriptor {
    match extract_doi(term) {
        Some(doi) => QueryDescriptor::id_lookup(work_url(base, &doi)),
        None => QueryDescriptor::keyword(format!("{}/works?sort=relevance&query={}", base, term)),
    }
}

/// CrossRef research source
///
/// Uses the CrossRef REST API for DOI metadata lookup and search.
#[derive(Debug, Clone)]
pub struct CrossRefSource {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl CrossRefSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, EndpointConfig::default().crossref)
    }

    /// Create with a custom API base URL (for testing)
    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Parse a search response into DOI stubs, keeping only eligible work types
    fn parse_search_response(json: &str) -> Result<Vec<Candidate>, SourceError> {
        let data: CRResponse<CRList> = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Failed to parse CrossRef JSON: {}", e)))?;

        Ok(data
            .message
            .items
            .into_iter()
            .filter(|item| {
                item.work_type
                    .as_deref()
                    .is_some_and(|t| ELIGIBLE_TYPES.contains(&t))
            })
            .filter_map(|item| item.doi)
            .map(|doi| Candidate::stub(SourceKind::Crossref, doi))
            .collect())
    }

    /// Parse a single-work response
    fn parse_work_response(json: &str) -> Result<CandidateRecord, SourceError> {
        let data: CRResponse<CRWork> = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Failed to parse CrossRef JSON: {}", e)))?;

        Ok(data.message.into_record())
    }
}

#[async_trait]
impl Source for CrossRefSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Crossref
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
                let candidates = Self::parse_search_response(&body)?;
                tracing::debug!("CrossRef returned {} eligible works", candidates.len());
                Ok(candidates)
            }
            QueryKind::IdLookup => Ok(vec![Self::parse_work_response(&body)?.into()]),
        }
    }

    async fn upgrade(&self, key: &str) -> Result<CandidateRecord, SourceError> {
        tracing::debug!("Upgrading DOI {}", key);
        let body = self.transport.fetch(&work_url(&self.base_url, key)).await?;
        Self::parse_work_response(&body)
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CRResponse<T> {
    message: T,
}

#[derive(Debug, Deserialize)]
struct CRList {
    #[serde(default)]
    items: Vec<CRListItem>,
}

#[derive(Debug, Deserialize)]
struct CRListItem {
    #[serde(rename = "DOI")]
    doi: Option<String>,
    #[serde(rename = "type")]
    work_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRWork {
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    author: Vec<CRAuthor>,
    created: Option<CRDate>,
    #[serde(rename = "type")]
    work_type: Option<String>,
    #[serde(rename = "short-container-title", default)]
    short_container_title: Vec<String>,
    #[serde(default)]
    institution: Vec<CRInstitution>,
}

#[derive(Debug, Deserialize)]
struct CRAuthor {
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i64>>>,
}

#[derive(Debug, Deserialize)]
struct CRInstitution {
    name: Option<String>,
}

impl CRWork {
    fn into_record(self) -> CandidateRecord {
        // Posted content (preprints) names its server as an institution.
        let venue = match self.work_type.as_deref() {
            Some("posted-content") => self.institution.into_iter().next().and_then(|i| i.name),
            _ => self.short_container_title.into_iter().next(),
        }
        .unwrap_or_default();

        let year = self
            .created
            .and_then(|c| c.date_parts.into_iter().next())
            .and_then(|parts| parts.into_iter().next().flatten())
            .map(|y| y.to_string())
            .unwrap_or_default();

        let mut record = CandidateRecord::new(SourceKind::Crossref)
            .authors(self.author.into_iter().map(|a| a.family.unwrap_or_default()))
            .venue(venue)
            .year(year);
        record.title = self.title.into_iter().next();
        record
    }
}
