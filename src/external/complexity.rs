//! Low-complexity scoring.

use crate::data::SeqRecord;

/// Scores how repetitive a sequence is. Higher means lower complexity.
pub trait ComplexityScorer: Send + Sync {
    fn score(&self, record: &SeqRecord) -> f64;
}

impl<F> ComplexityScorer for F
where
    F: Fn(&SeqRecord) -> f64 + Send + Sync,
{
    fn score(&self, record: &SeqRecord) -> f64 {
        self(record)
    }
}
