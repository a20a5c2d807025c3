//! Filtering out sequences that match a database.

use super::{partition_packet, SeqFilter};
use crate::data::FilterPacket;
use crate::error::Result;
use crate::external::{DbType, MatchFilter, SearchEngine, SearchProgram, SearchRequest};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Keeps sequences with no accepted match in the target database.
///
/// The search engine runs once per packet over all passed sequences, and
/// not at all when nothing passed.
pub struct BySearchMatch {
    engine: Arc<dyn SearchEngine>,
    request: SearchRequest,
    reverse: bool,
}

impl BySearchMatch {
    pub fn new(
        engine: Arc<dyn SearchEngine>,
        database: impl Into<PathBuf>,
        program: SearchProgram,
        filters: Vec<MatchFilter>,
        db_type: Option<DbType>,
        reverse: bool,
    ) -> Self {
        Self {
            engine,
            request: SearchRequest {
                database: database.into(),
                program,
                filters,
                db_type,
            },
            reverse,
        }
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }
}

impl std::fmt::Debug for BySearchMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BySearchMatch")
            .field("request", &self.request)
            .field("reverse", &self.reverse)
            .finish_non_exhaustive()
    }
}

impl SeqFilter for BySearchMatch {
    fn name(&self) -> &'static str {
        "BySearchMatch"
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        if packet.passed.is_empty() {
            return Ok(packet);
        }
        let hits = self.engine.search(&packet.passed, &self.request)?;
        debug!(
            database = %self.request.database.display(),
            queries = packet.passed.len(),
            matched = hits.n_matched(),
            "searched packet"
        );
        partition_packet(self.name(), packet, self.reverse, |record| {
            Ok(hits.get_matched_segments(record.id()).is_none())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SeqRecord;
    use crate::error::FilterError;
    use crate::external::search::MockSearchEngine;
    use crate::external::{SearchHits, Segment};
    use crate::filter::testing::{ids, packet_of};

    fn records() -> Vec<SeqRecord> {
        ["clean", "vector", "adapter"]
            .iter()
            .map(|id| SeqRecord::new(id, "ACGTACGTAC"))
            .collect()
    }

    fn hits() -> SearchHits {
        let mut hits = SearchHits::new();
        hits.insert("vector", vec![Segment::new(0, 9)]);
        hits.insert("adapter", vec![Segment::new(2, 6)]);
        hits
    }

    fn filter(engine: MockSearchEngine, reverse: bool) -> BySearchMatch {
        BySearchMatch::new(
            Arc::new(engine),
            "/db/univec.fasta",
            SearchProgram::Blastn,
            vec![MatchFilter::MaxEvalue { max: 1e-3 }],
            Some(DbType::Nucleotide),
            reverse,
        )
    }

    #[test]
    fn test_matches_are_filtered() {
        let mut engine = MockSearchEngine::new();
        engine
            .expect_search()
            .times(1)
            .withf(|queries, request| {
                queries.len() == 3 && request.program == SearchProgram::Blastn
            })
            .returning(|_, _| Ok(hits()));

        let out = filter(engine, false).apply(packet_of(records())).unwrap();
        assert_eq!(ids(&out.passed), vec!["clean"]);
        assert_eq!(ids(&out.filtered_out), vec!["vector", "adapter"]);
    }

    #[test]
    fn test_reverse_keeps_matches() {
        let mut engine = MockSearchEngine::new();
        engine.expect_search().returning(|_, _| Ok(hits()));

        let out = filter(engine, true).apply(packet_of(records())).unwrap();
        assert_eq!(ids(&out.passed), vec!["vector", "adapter"]);
        assert_eq!(ids(&out.filtered_out), vec!["clean"]);
    }

    #[test]
    fn test_searches_only_passed() {
        let mut engine = MockSearchEngine::new();
        engine
            .expect_search()
            .withf(|queries, _| queries.iter().all(|q| q.id() != "old"))
            .returning(|_, _| Ok(SearchHits::new()));

        let packet = FilterPacket::new(records(), vec![SeqRecord::new("old", "A")]);
        let out = filter(engine, false).apply(packet).unwrap();
        assert_eq!(out.passed.len(), 3);
        assert_eq!(ids(&out.filtered_out), vec!["old"]);
    }

    #[test]
    fn test_empty_passed_skips_search() {
        let mut engine = MockSearchEngine::new();
        engine.expect_search().never();

        let packet = FilterPacket::new(Vec::new(), records());
        let out = filter(engine, false).apply(packet.clone()).unwrap();
        assert_eq!(out, packet);
    }

    #[test]
    fn test_engine_error_propagates() {
        let mut engine = MockSearchEngine::new();
        engine
            .expect_search()
            .returning(|_, _| Err(FilterError::Search("database not found".into())));

        let result = filter(engine, false).apply(packet_of(records()));
        assert!(matches!(result, Err(FilterError::Search(_))));
    }
}
