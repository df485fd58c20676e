//! Core data models for search requests, candidates and citations.

mod citation;
mod request;

pub use citation::{Candidate, CandidateRecord, Citation};
pub use request::{
    QueryDescriptor, QueryKind, SearchMode, SearchRequest, SourceKind, UnknownSource,
};
