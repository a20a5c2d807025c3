//! Sequence similarity search against a database.
//!
//! The filters only need to know, per query id, whether any alignment
//! survived the acceptance criteria. Running the search itself (BLAST or any
//! other engine) is left to implementors of [`SearchEngine`].

use crate::data::SeqRecord;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[cfg(test)]
use mockall::automock;

/// Search program to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProgram {
    Blastn,
    Blastp,
    Blastx,
    Tblastn,
    Tblastx,
}

/// Residue type of the target database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    Nucleotide,
    Protein,
}

/// Criterion a hit must meet to be reported as a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchFilter {
    /// Expectation value must not exceed `max`.
    MaxEvalue { max: f64 },
    /// Percent identity must be at least `min_percent`.
    MinIdentity { min_percent: f64 },
    /// Aligned length in the query must be at least `min_residues`.
    MinLength { min_residues: u64 },
    /// Aligned fraction of the query (percent) must be at least `min_percent`.
    MinQueryCoverage { min_percent: f64 },
}

/// Everything an engine needs besides the query sequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Sequence file or preformatted database to search against.
    pub database: PathBuf,
    pub program: SearchProgram,
    pub filters: Vec<MatchFilter>,
    /// Database residue type, when it can't be inferred from `program`.
    pub db_type: Option<DbType>,
}

/// Aligned region of a query, 0-based and inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Accepted matches of one search run, keyed by query id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    segments: HashMap<String, Vec<Segment>>,
}

impl SearchHits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the matched segments of a query. An empty list records nothing.
    pub fn insert(&mut self, query_id: &str, segments: Vec<Segment>) {
        if segments.is_empty() {
            return;
        }
        self.segments
            .entry(query_id.to_string())
            .or_default()
            .extend(segments);
    }

    /// Matched segments of a query, or `None` if nothing matched.
    pub fn get_matched_segments(&self, query_id: &str) -> Option<&[Segment]> {
        self.segments.get(query_id).map(Vec::as_slice)
    }

    /// Number of queries with at least one match.
    pub fn n_matched(&self) -> usize {
        self.segments.len()
    }
}

/// A similarity search engine.
///
/// One call per packet: implementations receive the whole batch so they can
/// amortize process start-up and database loading.
#[cfg_attr(test, automock)]
pub trait SearchEngine: Send + Sync {
    fn search(&self, queries: &[SeqRecord], request: &SearchRequest) -> Result<SearchHits>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_hits() {
        let mut hits = SearchHits::new();
        hits.insert("q1", vec![Segment::new(0, 10)]);
        hits.insert("q1", vec![Segment::new(20, 30)]);
        hits.insert("q2", Vec::new());

        assert_eq!(
            hits.get_matched_segments("q1"),
            Some(&[Segment::new(0, 10), Segment::new(20, 30)][..])
        );
        assert!(hits.get_matched_segments("q2").is_none());
        assert!(hits.get_matched_segments("q3").is_none());
        assert_eq!(hits.n_matched(), 1);
    }

    #[test]
    fn test_request_yaml() {
        let yaml = "\
database: /db/vectors.fasta
program: blastn
filters:
  - kind: max_evalue
    max: 0.001
  - kind: min_identity
    min_percent: 90.0
db_type: nucleotide
";
        let request: SearchRequest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(request.program, SearchProgram::Blastn);
        assert_eq!(request.db_type, Some(DbType::Nucleotide));
        assert_eq!(
            request.filters,
            vec![
                MatchFilter::MaxEvalue { max: 0.001 },
                MatchFilter::MinIdentity { min_percent: 90.0 },
            ]
        );
    }
}
