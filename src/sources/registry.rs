//! Registry for managing literature database adapters.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{Source, SourceError};
use crate::config::{Config, EndpointConfig};
use crate::models::SourceKind;
use crate::utils::{HttpClient, Transport};

#[cfg(feature = "source-arxiv")]
use super::ArxivSource;
#[cfg(feature = "source-crossref")]
use super::CrossRefSource;
#[cfg(feature = "source-google_scholar")]
use super::GoogleScholarSource;
#[cfg(feature = "source-pubmed")]
use super::PubMedSource;

/// Registry for all available sources
///
/// Each request looks its adapter up once by [`SourceKind`]; nothing downstream
/// branches on the source again.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<SourceKind, Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create a registry with every compiled-in source sharing one transport
    #[allow(unused_variables)]
    pub fn new(transport: Arc<dyn Transport>, endpoints: &EndpointConfig) -> Self {
        let mut registry = Self::empty();

        #[cfg(feature = "source-pubmed")]
        registry.register(Arc::new(PubMedSource::with_base_url(
            Arc::clone(&transport),
            endpoints.pubmed.clone(),
        )));
        #[cfg(feature = "source-crossref")]
        registry.register(Arc::new(CrossRefSource::with_base_url(
            Arc::clone(&transport),
            endpoints.crossref.clone(),
        )));
        #[cfg(feature = "source-arxiv")]
        registry.register(Arc::new(ArxivSource::with_base_url(
            Arc::clone(&transport),
            endpoints.arxiv.clone(),
        )));
        #[cfg(feature = "source-google_scholar")]
        registry.register(Arc::new(GoogleScholarSource::with_base_url(
            Arc::clone(&transport),
            endpoints.google_scholar.clone(),
        )));

        registry
    }

    /// Create a registry backed by a real HTTP client built from `config`
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = HttpClient::from_config(&config.http)?;
        Ok(Self::new(Arc::new(client), &config.endpoints))
    }

    /// Create a registry with no sources
    pub fn empty() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }

    /// Register a source, replacing any source of the same kind
    pub fn register(&mut self, source: Arc<dyn Source>) {
        self.sources.insert(source.kind(), source);
    }

    /// Get a source by kind
    pub fn get(&self, kind: SourceKind) -> Option<&Arc<dyn Source>> {
        self.sources.get(&kind)
    }

    /// Get all registered kinds, in menu order
    pub fn kinds(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.sources.keys().copied()
    }

    /// Check if a source exists
    pub fn has(&self, kind: SourceKind) -> bool {
        self.sources.contains_key(&kind)
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
