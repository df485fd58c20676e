//! Candidate and citation models.

use serde::{Deserialize, Serialize};

use super::SourceKind;

/// One unconfirmed search hit.
///
/// PubMed and Crossref keyword searches only return identifiers; those arrive as
/// [`Candidate::Stub`] and need an upgrade call before their title is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Candidate {
    /// A list entry carrying only a PubMed ID or a DOI
    Stub { source: SourceKind, key: String },
    /// A fully populated record
    Record(CandidateRecord),
}

impl Candidate {
    pub fn stub(source: SourceKind, key: impl Into<String>) -> Self {
        Candidate::Stub {
            source,
            key: key.into(),
        }
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Candidate::Stub { .. })
    }
}

impl From<CandidateRecord> for Candidate {
    fn from(record: CandidateRecord) -> Self {
        Candidate::Record(record)
    }
}

/// Source-agnostic view of one fully fetched search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Source the record came from (decides how author names are read)
    pub source: SourceKind,

    /// Title, `None` when the payload had no title field
    pub title: Option<String>,

    /// Authors in document order: full names, or family names for Crossref
    pub authors: Vec<String>,

    /// Dedicated last-author field (PubMed only)
    pub last_author: Option<String>,

    /// Journal, container or institution name
    pub venue: String,

    /// Publication year, empty when unknown
    pub year: String,
}

impl CandidateRecord {
    pub fn new(source: SourceKind) -> Self {
        Self {
            source,
            title: None,
            authors: Vec::new(),
            last_author: None,
            venue: String::new(),
            year: String::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    pub fn last_author(mut self, last_author: impl Into<String>) -> Self {
        self.last_author = Some(last_author.into());
        self
    }

    pub fn venue(mut self, venue: impl Into<String>) -> Self {
        self.venue = venue.into();
        self
    }

    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = year.into();
        self
    }

    /// Title used for ranking; an absent title compares as empty
    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// Canonical resolved record.
///
/// Every field is a best-effort string; missing data is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub first_author: String,
    pub last_author: String,
    pub source: String,
    pub year: String,
    pub title: String,
}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::utils::format_summary(self))
    }
}
