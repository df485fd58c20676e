//! Search request and query descriptor models.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// The literature database a search is sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SourceKind {
    #[serde(rename = "pubmed")]
    PubMed,
    #[serde(rename = "crossref")]
    Crossref,
    #[serde(rename = "arxiv")]
    Arxiv,
    #[serde(rename = "google_scholar", alias = "gscholar", alias = "scholar")]
    GoogleScholar,
}

impl SourceKind {
    /// Every supported source, in menu order
    pub const ALL: [SourceKind; 4] = [
        SourceKind::PubMed,
        SourceKind::Crossref,
        SourceKind::Arxiv,
        SourceKind::GoogleScholar,
    ];

    /// Returns the display name of the source
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::PubMed => "PubMed",
            SourceKind::Crossref => "Crossref",
            SourceKind::Arxiv => "arXiv",
            SourceKind::GoogleScholar => "Google Scholar",
        }
    }

    /// Returns the source identifier (config and CLI naming)
    pub fn id(&self) -> &'static str {
        match self {
            SourceKind::PubMed => "pubmed",
            SourceKind::Crossref => "crossref",
            SourceKind::Arxiv => "arxiv",
            SourceKind::GoogleScholar => "google_scholar",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error returned when a source name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown source: {0}")]
pub struct UnknownSource(pub String);

impl FromStr for SourceKind {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pubmed" => Ok(SourceKind::PubMed),
            "crossref" => Ok(SourceKind::Crossref),
            "arxiv" => Ok(SourceKind::Arxiv),
            "google_scholar" | "gscholar" | "scholar" => Ok(SourceKind::GoogleScholar),
            other => Err(UnknownSource(other.to_string())),
        }
    }
}

/// How a candidate is picked out of a result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Take the first eligible result
    #[default]
    First,
    /// Rank up to ten results by edit distance between the term and the title
    Exact,
}

/// One user search: the raw term, where to send it and how to pick a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub raw_term: String,
    pub source: SourceKind,
    pub mode: SearchMode,
}

impl SearchRequest {
    /// Create a first-result request
    pub fn new(raw_term: impl Into<String>, source: SourceKind) -> Self {
        Self {
            raw_term: raw_term.into(),
            source,
            mode: SearchMode::First,
        }
    }

    /// Build a keyword request from a dropped file.
    ///
    /// The file stem is the search term, so `Vaswani Polosukhin (arXiv 2017) Attention.pdf`
    /// searches for `Vaswani Polosukhin (arXiv 2017) Attention`.
    pub fn from_dropped_file(path: impl AsRef<Path>, source: SourceKind) -> Self {
        let path = path.as_ref();
        let term = path
            .file_stem()
            .or_else(|| path.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(term, source)
    }

    /// Set the selection mode
    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Switch to exact-match ranking
    pub fn exact(self) -> Self {
        self.mode(SearchMode::Exact)
    }
}

/// Whether a query looks up a known identifier or searches by keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    IdLookup,
    KeywordSearch,
}

/// A classified query: its kind and the fully built request URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    pub kind: QueryKind,
    pub url: String,
}

impl QueryDescriptor {
    pub fn id_lookup(url: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::IdLookup,
            url: url.into(),
        }
    }

    pub fn keyword(url: impl Into<String>) -> Self {
        Self {
            kind: QueryKind::KeywordSearch,
            url: url.into(),
        }
    }

    pub fn is_id_lookup(&self) -> bool {
        self.kind == QueryKind::IdLookup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_str() {
        assert_eq!("pubmed".parse::<SourceKind>().unwrap(), SourceKind::PubMed);
        assert_eq!("CrossRef".parse::<SourceKind>().unwrap(), SourceKind::Crossref);
        assert_eq!(" arxiv ".parse::<SourceKind>().unwrap(), SourceKind::Arxiv);
        assert_eq!(
            "gscholar".parse::<SourceKind>().unwrap(),
            SourceKind::GoogleScholar
        );
        assert!("semantic".parse::<SourceKind>().is_err());
    }

    #[test]
    fn test_source_kind_serde_uses_ids() {
        for kind in SourceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.id()));
            let back: SourceKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_request_builder() {
        let request = SearchRequest::new("attention", SourceKind::Arxiv);
        assert_eq!(request.mode, SearchMode::First);

        let request = request.exact();
        assert_eq!(request.mode, SearchMode::Exact);
        assert_eq!(request.raw_term, "attention");
    }

    #[test]
    fn test_from_dropped_file_uses_stem() {
        let request = SearchRequest::from_dropped_file(
            "/home/user/papers/Deep residual learning.pdf",
            SourceKind::Crossref,
        );
        assert_eq!(request.raw_term, "Deep residual learning");
        assert_eq!(request.source, SourceKind::Crossref);
    }
}
