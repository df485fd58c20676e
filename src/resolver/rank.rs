//! Candidate selection.

use crate::models::{Candidate, CandidateRecord, SearchMode};
use crate::sources::{Source, SourceError};

use super::ResolveError;

/// Exact mode never looks past this many candidates
pub const EXACT_CANDIDATE_LIMIT: usize = 10;

/// Levenshtein distance between the search term and a record's title
pub fn title_distance(term: &str, record: &CandidateRecord) -> usize {
    strsim::levenshtein(term, record.title_str())
}

/// Turn a candidate into a full record, upgrading stubs through `source`
async fn materialize(
    source: &dyn Source,
    candidate: Candidate,
) -> Result<CandidateRecord, SourceError> {
    match candidate {
        Candidate::Stub { key, .. } => source.upgrade(&key).await,
        Candidate::Record(record) => Ok(record),
    }
}

/// Pick one candidate.
///
/// `First` upgrades and returns only the first candidate. `Exact` upgrades the
/// first [`EXACT_CANDIDATE_LIMIT`] candidates one after another and returns the
/// one whose title is closest to `term`; on a tie the earlier candidate wins.
/// Any failed upgrade aborts the whole selection.
pub async fn select(
    source: &dyn Source,
    candidates: Vec<Candidate>,
    term: &str,
    mode: SearchMode,
) -> Result<CandidateRecord, ResolveError> {
    let mut candidates = candidates.into_iter();

    match mode {
        SearchMode::First => {
            let first = candidates.next().ok_or(ResolveError::EmptyResult)?;
            Ok(materialize(source, first).await?)
        }
        SearchMode::Exact => {
            let mut best: Option<(usize, CandidateRecord)> = None;

            for (index, candidate) in candidates.take(EXACT_CANDIDATE_LIMIT).enumerate() {
                let record = materialize(source, candidate).await?;
                let distance = title_distance(term, &record);
                tracing::debug!(
                    "Candidate {} at distance {}: {:?}",
                    index,
                    distance,
                    record.title_str()
                );

                if best.as_ref().map_or(true, |(d, _)| distance < *d) {
                    best = Some((distance, record));
                }
            }

            best.map(|(_, record)| record)
                .ok_or(ResolveError::EmptyResult)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceKind;
    use crate::sources::{ArxivSource, MockTransport, PubMedSource};
    use std::sync::Arc;

    fn record(title: &str) -> Candidate {
        CandidateRecord::new(SourceKind::Arxiv)
            .title(title)
            .authors(["Ann Author"])
            .into()
    }

    fn arxiv() -> ArxivSource {
        ArxivSource::new(Arc::new(MockTransport::new()))
    }

    fn summary(id: &str, title: &str) -> String {
        format!(
            r#"{{"result":{{"uids":["{id}"],"{id}":{{"title":"{title}","pubdate":"2020","source":"J","authors":[{{"name":"Kim A"}}],"lastauthor":"Lee B"}}}}}}"#
        )
    }

    fn summary_url(id: &str) -> String {
        format!(
            "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/esummary.fcgi?db=pubmed&retmode=json&id={}",
            id
        )
    }

    #[tokio::test]
    async fn test_select_empty_is_empty_result() {
        for mode in [SearchMode::First, SearchMode::Exact] {
            let result = select(&arxiv(), Vec::new(), "term", mode).await;
            assert!(matches!(result, Err(ResolveError::EmptyResult)));
        }
    }

    #[tokio::test]
    async fn test_select_first() {
        let candidates = vec![record("Unrelated"), record("attention is all you need")];
        let chosen = select(&arxiv(), candidates, "attention is all you need", SearchMode::First)
            .await
            .unwrap();
        assert_eq!(chosen.title_str(), "Unrelated");
    }

    #[tokio::test]
    async fn test_select_exact_picks_closest_title() {
        let candidates = vec![
            record("Attention mechanisms in vision"),
            record("Attention Is All You Need"),
            record("attention is all you need!"),
            record("Transformers"),
        ];
        let chosen = select(&arxiv(), candidates, "attention is all you need", SearchMode::Exact)
            .await
            .unwrap();
        assert_eq!(chosen.title_str(), "attention is all you need!");
    }

    #[tokio::test]
    async fn test_select_exact_tie_keeps_earliest() {
        let candidates = vec![record("abcx"), record("abcy"), record("abcz")];
        let chosen = select(&arxiv(), candidates, "abc", SearchMode::Exact)
            .await
            .unwrap();
        assert_eq!(chosen.title_str(), "abcx");
    }

    #[tokio::test]
    async fn test_select_exact_is_deterministic() {
        let candidates: Vec<Candidate> = ["b", "a", "ab", "ba", "a"].into_iter().map(record).collect();
        let first = select(&arxiv(), candidates.clone(), "a", SearchMode::Exact)
            .await
            .unwrap();
        for _ in 0..5 {
            let again = select(&arxiv(), candidates.clone(), "a", SearchMode::Exact)
                .await
                .unwrap();
            assert_eq!(again, first);
        }
    }

    #[tokio::test]
    async fn test_select_exact_ignores_candidates_past_limit() {
        let mut candidates: Vec<Candidate> = (0..EXACT_CANDIDATE_LIMIT)
            .map(|i| record(&format!("unrelated title {}", i)))
            .collect();
        candidates.push(record("exact"));

        let chosen = select(&arxiv(), candidates, "exact", SearchMode::Exact)
            .await
            .unwrap();
        assert_ne!(chosen.title_str(), "exact");
    }

    #[tokio::test]
    async fn test_select_first_upgrades_only_one_stub() {
        let transport = Arc::new(MockTransport::new());
        transport.set_response(summary_url("11111111"), summary("11111111", "First"));
        transport.set_response(summary_url("22222222"), summary("22222222", "Second"));
        let source = PubMedSource::new(transport.clone());

        let candidates = vec![
            Candidate::stub(SourceKind::PubMed, "11111111"),
            Candidate::stub(SourceKind::PubMed, "22222222"),
        ];
        let chosen = select(&source, candidates, "Second", SearchMode::First)
            .await
            .unwrap();

        assert_eq!(chosen.title_str(), "First");
        assert_eq!(transport.requests(), vec![summary_url("11111111")]);
    }

    #[tokio::test]
    async fn test_select_exact_upgrades_each_stub() {
        let transport = Arc::new(MockTransport::new());
        let ids: Vec<String> = (0..12).map(|i| format!("{:08}", 30000000 + i)).collect();
        for (i, id) in ids.iter().enumerate() {
            let title = if i == 4 { "CRISPR screens" } else { "Other work" };
            transport.set_response(summary_url(id), summary(id, title));
        }
        let source = PubMedSource::new(transport.clone());

        let candidates = ids
            .iter()
            .map(|id| Candidate::stub(SourceKind::PubMed, id.clone()))
            .collect();
        let chosen = select(&source, candidates, "CRISPR screens", SearchMode::Exact)
            .await
            .unwrap();

        assert_eq!(chosen.title_str(), "CRISPR screens");
        let requests = transport.requests();
        assert_eq!(requests.len(), EXACT_CANDIDATE_LIMIT);
        assert_eq!(requests[0], summary_url(&ids[0]));
        assert_eq!(requests[9], summary_url(&ids[9]));
    }

    #[tokio::test]
    async fn test_select_exact_failed_upgrade_aborts() {
        let transport = Arc::new(MockTransport::new());
        transport.set_response(summary_url("11111111"), summary("11111111", "exact"));
        // No response for the second ID: the mock answers 404.
        let source = PubMedSource::new(transport.clone());

        let candidates = vec![
            Candidate::stub(SourceKind::PubMed, "11111111"),
            Candidate::stub(SourceKind::PubMed, "22222222"),
        ];
        let result = select(&source, candidates, "exact", SearchMode::Exact).await;

        assert!(matches!(result, Err(ResolveError::Transport(_))));
    }
}
