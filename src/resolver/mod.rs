//! Citation resolution.
//!
//! One [`SearchRequest`] runs classify, fetch, rank, normalize and format in
//! sequence. Any failure along the way ends the search with the fixed
//! [`NOT_FOUND_MESSAGE`]; the cause is only logged.

mod normalize;
mod rank;

pub use normalize::normalize;
pub use rank::{select, title_distance, EXACT_CANDIDATE_LIMIT};

use crate::models::{Citation, SearchRequest, SourceKind};
use crate::sources::{SourceError, SourceRegistry};
use crate::utils::{format_summary, Clipboard};

/// The single message shown for every failed search
pub const NOT_FOUND_MESSAGE: &str = "Error: no matching reference found";

/// Why a search produced no citation
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Network failure or non-2xx response
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The source returned no candidates
    #[error("No candidates returned")]
    EmptyResult,

    /// The selected record lacks a title or authors
    #[error("Incomplete record: {0}")]
    IncompleteRecord(String),

    /// The response body could not be read
    #[error("Parse failure: {0}")]
    Parse(String),

    /// The source was not compiled in
    #[error("Source not available: {0}")]
    SourceUnavailable(SourceKind),
}

impl From<SourceError> for ResolveError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Network(msg) | SourceError::Api(msg) => ResolveError::Transport(msg),
            SourceError::Parse(msg) => ResolveError::Parse(msg),
            SourceError::NotImplemented => {
                ResolveError::Parse("source returned an identifier it cannot expand".to_string())
            }
        }
    }
}

/// User-visible outcome of one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found {
        citation: Citation,
        display: String,
        /// Whether `display` reached the attached clipboard
        copied: bool,
    },
    NotFound { message: String },
}

impl Resolution {
    fn not_found() -> Self {
        Resolution::NotFound {
            message: NOT_FOUND_MESSAGE.to_string(),
        }
    }

    /// The text to show: the display string or the not-found message
    pub fn text(&self) -> &str {
        match self {
            Resolution::Found { display, .. } => display,
            Resolution::NotFound { message } => message,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found { .. })
    }

    /// True only when the display string was written to a clipboard
    pub fn is_copied(&self) -> bool {
        matches!(self, Resolution::Found { copied: true, .. })
    }

    pub fn citation(&self) -> Option<&Citation> {
        match self {
            Resolution::Found { citation, .. } => Some(citation),
            Resolution::NotFound { .. } => None,
        }
    }
}

/// Runs searches against a [`SourceRegistry`] and publishes results
#[derive(Debug)]
pub struct Resolver {
    registry: SourceRegistry,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl Resolver {
    /// Create a resolver that does not touch any clipboard
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            clipboard: None,
        }
    }

    /// Publish each found display string to `clipboard`
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn clipboard(&self) -> Option<&dyn Clipboard> {
        self.clipboard.as_deref()
    }

    /// Resolve a request to a citation, keeping the failure cause
    pub async fn resolve(&self, request: &SearchRequest) -> Result<Citation, ResolveError> {
        let source = self
            .registry
            .get(request.source)
            .ok_or(ResolveError::SourceUnavailable(request.source))?;

        let query = source.classify(&request.raw_term);
        tracing::debug!("{} {:?} query: {}", source.name(), query.kind, query.url);

        let candidates = source.fetch_candidates(&query).await?;
        tracing::debug!("{} candidates from {}", candidates.len(), source.name());

        let record = select(&**source, candidates, &request.raw_term, request.mode).await?;
        let citation = normalize(&record)?;
        tracing::info!("Selected {:?} from {}", citation.title, source.name());

        Ok(citation)
    }

    /// Resolve a request to a user-visible outcome.
    ///
    /// On success the display string is written to the clipboard, if one is
    /// attached; a clipboard failure is logged and the search still counts as
    /// found.
    pub async fn search(&self, request: &SearchRequest) -> Resolution {
        let citation = match self.resolve(request).await {
            Ok(citation) => citation,
            Err(e) => {
                tracing::warn!(
                    "Search for {:?} on {} failed: {}",
                    request.raw_term,
                    request.source,
                    e
                );
                return Resolution::not_found();
            }
        };

        let display = format_summary(&citation);

        let copied = match &self.clipboard {
            Some(clipboard) => match clipboard.write(&display) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Failed to copy result to clipboard: {}", e);
                    false
                }
            },
            None => false,
        };

        Resolution::Found {
            citation,
            display,
            copied,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointConfig;
    use crate::models::SearchMode;
    use crate::sources::MockTransport;
    use crate::utils::{ClipboardError, MemoryClipboard};
    use std::sync::Arc;

    const ARXIV_ID_URL: &str = "http://export.arxiv.org/api/query?&sortBy=relevance&sortOrder=ascending&max_results=10&id_list=1706.03762";

    const ARXIV_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query Results</title>
  <id>q</id>
  <updated>2023-01-16T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <updated>2023-08-02T00:41:18Z</updated>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All You Need</title>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Illia Polosukhin</name></author>
  </entry>
</feed>"#;

    /// A clipboard whose writes always fail, like a display server going away
    #[derive(Debug)]
    struct BrokenClipboard;

    impl Clipboard for BrokenClipboard {
        fn read(&self) -> Result<String, ClipboardError> {
            Err(ClipboardError::Access("connection lost".into()))
        }

        fn write(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Access("connection lost".into()))
        }
    }

    fn resolver(transport: Arc<MockTransport>) -> Resolver {
        Resolver::new(SourceRegistry::new(transport, &EndpointConfig::default()))
    }

    #[test]
    fn test_resolve_error_from_source_error() {
        assert!(matches!(
            ResolveError::from(SourceError::Api("503".into())),
            ResolveError::Transport(_)
        ));
        assert!(matches!(
            ResolveError::from(SourceError::Network("reset".into())),
            ResolveError::Transport(_)
        ));
        assert!(matches!(
            ResolveError::from(SourceError::Parse("bad".into())),
            ResolveError::Parse(_)
        ));
    }

    #[tokio::test]
    async fn test_search_found_writes_clipboard() {
        let transport = Arc::new(MockTransport::new());
        transport.set_response(ARXIV_ID_URL, ARXIV_FEED);
        let resolver = resolver(transport).with_clipboard(Box::new(MemoryClipboard::new()));

        let request = SearchRequest::new("arXiv:1706.03762", SourceKind::Arxiv);
        let resolution = resolver.search(&request).await;

        assert!(resolution.is_found());
        assert!(resolution.is_copied());
        assert_eq!(
            resolution.text(),
            "Vaswani Polosukhin (arXiv 2017) Attention Is All You Need"
        );
        assert_eq!(
            resolver.clipboard().unwrap().read().unwrap(),
            resolution.text()
        );
    }

    #[tokio::test]
    async fn test_search_found_with_failed_clipboard_write() {
        let transport = Arc::new(MockTransport::new());
        transport.set_response(ARXIV_ID_URL, ARXIV_FEED);
        let resolver = resolver(transport).with_clipboard(Box::new(BrokenClipboard));

        let request = SearchRequest::new("arXiv:1706.03762", SourceKind::Arxiv);
        let resolution = resolver.search(&request).await;

        assert!(resolution.is_found());
        assert!(!resolution.is_copied());
        assert!(matches!(resolution, Resolution::Found { copied: false, .. }));
    }

    #[tokio::test]
    async fn test_search_found_without_clipboard() {
        let transport = Arc::new(MockTransport::new());
        transport.set_response(ARXIV_ID_URL, ARXIV_FEED);
        let resolver = resolver(transport);

        let resolution = resolver
            .search(&SearchRequest::new("arXiv:1706.03762", SourceKind::Arxiv))
            .await;

        assert!(resolution.is_found());
        assert!(!resolution.is_copied());
    }

    #[tokio::test]
    async fn test_search_not_found_leaves_clipboard() {
        let transport = Arc::new(MockTransport::new());
        let resolver = resolver(transport)
            .with_clipboard(Box::new(MemoryClipboard::with_text("previous")));

        let request = SearchRequest::new("arXiv:1706.03762", SourceKind::Arxiv);
        let resolution = resolver.search(&request).await;

        assert_eq!(
            resolution,
            Resolution::NotFound {
                message: NOT_FOUND_MESSAGE.to_string()
            }
        );
        assert_eq!(resolver.clipboard().unwrap().read().unwrap(), "previous");
    }

    #[tokio::test]
    async fn test_resolve_empty_result() {
        let transport = Arc::new(MockTransport::new());
        let resolver = resolver(transport.clone());
        let request = SearchRequest::new("nothing matches this", SourceKind::Crossref);
        transport.set_response(
            "https://api.crossref.org/works?sort=relevance&query=nothing matches this",
            r#"{"status":"ok","message":{"items":[]}}"#,
        );

        let result = resolver.resolve(&request).await;
        assert!(matches!(result, Err(ResolveError::EmptyResult)));
    }

    #[tokio::test]
    async fn test_resolve_unregistered_source() {
        let resolver = Resolver::new(SourceRegistry::empty());
        let request = SearchRequest::new("anything", SourceKind::PubMed);

        let result = resolver.resolve(&request).await;
        assert!(matches!(
            result,
            Err(ResolveError::SourceUnavailable(SourceKind::PubMed))
        ));
        assert!(!resolver.search(&request).await.is_found());
    }

    #[tokio::test]
    async fn test_resolve_exact_mode_on_id_lookup() {
        let transport = Arc::new(MockTransport::new());
        transport.set_response(ARXIV_ID_URL, ARXIV_FEED);
        let resolver = resolver(transport);

        let request =
            SearchRequest::new("arXiv:1706.03762", SourceKind::Arxiv).mode(SearchMode::Exact);
        let citation = resolver.resolve(&request).await.unwrap();
        assert_eq!(citation.title, "Attention Is All You Need");
    }
}
