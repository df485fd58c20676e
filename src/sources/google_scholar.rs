//! Google Scholar source implementation.
//!
//! Google Scholar does not have an official public API. This source scrapes
//! the result page, which may violate Google's Terms of Service and breaks
//! whenever the page markup changes. Use at your own risk.
//!
//! Each result is read from three co-located blocks:
//!
//! - `h3.gs_rt`: the title
//! - `div.gs_fmaa`: the author list
//! - `div.gs_a.gs_fma_p`: the byline, "authors - venue, year - host"
//!
//! The venue and year are recovered from the byline with two blunt
//! heuristics, kept as-is:
//!
//! - year: every digit in the byline, so a volume or page number in the
//!   byline ends up glued to the year;
//! - venue: [`remove_matching_chars`] of the author list from the byline, cut
//!   at the first comma.

use async_trait::async_trait;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::{Arc, OnceLock};

use crate::config::EndpointConfig;
use crate::models::{Candidate, CandidateRecord, QueryDescriptor, SourceKind};
use crate::sources::{Source, SourceError};
use crate::utils::Transport;

const TITLE_SELECTOR: &str = "h3.gs_rt";
const AUTHORS_SELECTOR: &str = "div.gs_fmaa";
const BYLINE_SELECTOR: &str = "div.gs_a.gs_fma_p";

/// Badge prepended to titles that link to an HTML full text
const HTML_BADGE: &str = "[HTML]";

fn non_digit_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\D").expect("non-digit pattern is valid"))
}

/// Google Scholar only supports keyword search
pub(crate) fn classify(base: &str, term: &str) -> QueryDescriptor {
    QueryDescriptor::keyword(format!("{}?hl=ja&as_sdt=0%2C5&num=10&q={}", base, term))
}

/// Remove from `text`, for each character of `removal` in order, the first
/// remaining occurrence of that character.
///
/// This is a character-level diff, not a token-aware one: a character of
/// `removal` that is missing from the prefix is taken from wherever it next
/// appears in `text`, and a character that repeats in `text` more often than
/// in `removal` survives.
///
/// ```
/// use cite_finder::sources::remove_matching_chars;
///
/// assert_eq!(remove_matching_chars("J Doe", "J Doe - Nature, 2020"), " - Nature, 2020");
/// // "x" is not in the text; "a" is taken from the middle of "Nature".
/// assert_eq!(remove_matching_chars("xa", "Nature"), "Nture");
/// ```
pub fn remove_matching_chars(removal: &str, text: &str) -> String {
    let mut remaining: Vec<char> = text.chars().collect();
    for ch in removal.chars() {
        if let Some(pos) = remaining.iter().position(|&c| c == ch) {
            remaining.remove(pos);
        }
    }
    remaining.into_iter().collect()
}

/// Every digit of the byline, in order
fn extract_year(byline: &str) -> String {
    non_digit_pattern().replace_all(byline, "").into_owned()
}

fn extract_venue(authors: &str, byline: &str) -> String {
    remove_matching_chars(authors, byline)
        .split(',')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn selector(input: &str) -> Result<Selector, SourceError> {
    Selector::parse(input)
        .map_err(|e| SourceError::Parse(format!("invalid selector {}: {}", input, e)))
}

fn select_texts(document: &Html, input: &str) -> Result<Vec<String>, SourceError> {
    let selector = selector(input)?;
    Ok(document
        .select(&selector)
        .map(|element| element.text().collect::<String>())
        .collect())
}

/// Google Scholar research source
#[derive(Debug, Clone)]
pub struct GoogleScholarSource {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl GoogleScholarSource {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_base_url(transport, EndpointConfig::default().google_scholar)
    }

    /// Create with a custom search page URL (for testing)
    pub fn with_base_url(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Build one record from the three text blocks of a result
    fn parse_result(title: &str, authors: &str, byline: &str) -> CandidateRecord {
        let title = title.replace(HTML_BADGE, "").trim_start().to_string();

        CandidateRecord::new(SourceKind::GoogleScholar)
            .title(title)
            .authors(authors.split(',').map(str::trim_start))
            .venue(extract_venue(authors, byline))
            .year(extract_year(byline))
    }

    /// Parse a result page. A page without the expected blocks has no results.
    fn parse_results(html: &str) -> Result<Vec<Candidate>, SourceError> {
        let document = Html::parse_document(html);

        let titles = select_texts(&document, TITLE_SELECTOR)?;
        let authors = select_texts(&document, AUTHORS_SELECTOR)?;
        let bylines = select_texts(&document, BYLINE_SELECTOR)?;

        if titles.is_empty() {
            tracing::warn!("Google Scholar page had no result titles; markup may have changed");
        }

        Ok(titles
            .iter()
            .zip(&authors)
            .zip(&bylines)
            .map(|((title, authors), byline)| Self::parse_result(title, authors, byline).into())
            .collect())
    }
}

#[async_trait]
impl Source for GoogleScholarSource {
    fn kind(&self) -> SourceKind {
        SourceKind::GoogleScholar
    }

    fn classify(&self, term: &str) -> QueryDescriptor {
        classify(&self.base_url, term)
    }

    async fn fetch_candidates(
        &self,
        query: &QueryDescriptor,
    ) -> Result<Vec<Candidate>, SourceError> {
        let html = self.transport.fetch(&query.url).await?;
        let candidates = Self::parse_results(&html)?;
        tracing::debug!("Google Scholar returned {} results", candidates.len());
        Ok(candidates)
    }
}
