//! Map a source record onto the canonical [`Citation`].

use crate::models::{CandidateRecord, Citation, SourceKind};

use super::ResolveError;

/// First whitespace-delimited token, or empty
fn first_token(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

/// Second whitespace-delimited word, or the whole name when it has only one
///
/// arXiv and Google Scholar names read "Given Family" or "G Family".
fn family_word(name: &str) -> &str {
    let mut words = name.split_whitespace();
    match (words.next(), words.next()) {
        (_, Some(second)) => second,
        (Some(only), None) => only,
        (None, None) => "",
    }
}

/// Build the citation for `record`.
///
/// Fails with [`ResolveError::IncompleteRecord`] when the title is missing or
/// there is no author; every other field falls back to an empty string.
pub fn normalize(record: &CandidateRecord) -> Result<Citation, ResolveError> {
    let title = record
        .title
        .as_ref()
        .ok_or_else(|| ResolveError::IncompleteRecord("missing title".to_string()))?;
    let (first, rest) = record
        .authors
        .split_first()
        .ok_or_else(|| ResolveError::IncompleteRecord("no authors".to_string()))?;

    let (first_author, last_author) = match record.source {
        SourceKind::PubMed => (
            first_token(first).to_string(),
            record
                .last_author
                .as_deref()
                .map(first_token)
                .unwrap_or("")
                .to_string(),
        ),
        SourceKind::Crossref => {
            let last = rest.last().unwrap_or(first);
            (first.clone(), last.clone())
        }
        SourceKind::Arxiv | SourceKind::GoogleScholar => (
            family_word(first).to_string(),
            rest.last()
                .map(|name| family_word(name))
                .unwrap_or("")
                .to_string(),
        ),
    };

    Ok(Citation {
        first_author,
        last_author,
        source: record.venue.clone(),
        year: record.year.clone(),
        title: title.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pubmed() {
        let record = CandidateRecord::new(SourceKind::PubMed)
            .title("CRISPR screens in cancer")
            .authors(["Smith J", "Doe A", "Tanaka K"])
            .last_author("Tanaka K")
            .venue("Nature")
            .year("2021");

        let citation = normalize(&record).unwrap();
        assert_eq!(citation.first_author, "Smith");
        assert_eq!(citation.last_author, "Tanaka");
        assert_eq!(citation.source, "Nature");
        assert_eq!(citation.year, "2021");
        assert_eq!(citation.title, "CRISPR screens in cancer");
    }

    #[test]
    fn test_normalize_pubmed_without_last_author() {
        let record = CandidateRecord::new(SourceKind::PubMed)
            .title("T")
            .authors(["Smith J"]);

        let citation = normalize(&record).unwrap();
        assert_eq!(citation.first_author, "Smith");
        assert_eq!(citation.last_author, "");
    }

    #[test]
    fn test_normalize_crossref_uses_family_names() {
        let record = CandidateRecord::new(SourceKind::Crossref)
            .title("Graphene")
            .authors(["Novoselov", "Geim", "Firsov"])
            .venue("Science")
            .year("2004");

        let citation = normalize(&record).unwrap();
        assert_eq!(citation.first_author, "Novoselov");
        assert_eq!(citation.last_author, "Firsov");
    }

    #[test]
    fn test_normalize_crossref_single_author_repeats() {
        let record = CandidateRecord::new(SourceKind::Crossref)
            .title("Solo")
            .authors(["Curie"]);

        let citation = normalize(&record).unwrap();
        assert_eq!(citation.first_author, "Curie");
        assert_eq!(citation.last_author, "Curie");
    }

    #[test]
    fn test_normalize_arxiv() {
        let record = CandidateRecord::new(SourceKind::Arxiv)
            .title("Attention Is All You Need")
            .authors(["Ashish Vaswani", "Noam Shazeer", "Illia Polosukhin"])
            .venue("arXiv")
            .year("2017");

        let citation = normalize(&record).unwrap();
        assert_eq!(citation.first_author, "Vaswani");
        assert_eq!(citation.last_author, "Polosukhin");
    }

    #[test]
    fn test_normalize_single_author_leaves_last_empty() {
        for source in [SourceKind::Arxiv, SourceKind::GoogleScholar] {
            let record = CandidateRecord::new(source)
                .title("Deep learning")
                .authors(["Y LeCun"]);

            let citation = normalize(&record).unwrap();
            assert_eq!(citation.first_author, "LeCun");
            assert_eq!(citation.last_author, "");
        }
    }

    #[test]
    fn test_normalize_one_word_name() {
        let record = CandidateRecord::new(SourceKind::GoogleScholar)
            .title("T")
            .authors(["Aristotle", "Plato"]);

        let citation = normalize(&record).unwrap();
        assert_eq!(citation.first_author, "Aristotle");
        assert_eq!(citation.last_author, "Plato");
    }

    #[test]
    fn test_normalize_missing_title() {
        let record = CandidateRecord::new(SourceKind::Arxiv).authors(["A B"]);
        assert!(matches!(
            normalize(&record),
            Err(ResolveError::IncompleteRecord(_))
        ));
    }

    #[test]
    fn test_normalize_no_authors() {
        for source in SourceKind::ALL {
            let record = CandidateRecord::new(source).title("T");
            assert!(matches!(
                normalize(&record),
                Err(ResolveError::IncompleteRecord(_))
            ));
        }
    }

    #[test]
    fn test_normalize_empty_title_is_not_missing() {
        let record = CandidateRecord::new(SourceKind::Crossref)
            .title("")
            .authors(["Geim"]);
        assert_eq!(normalize(&record).unwrap().title, "");
    }
}
