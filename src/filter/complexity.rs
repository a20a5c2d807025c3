//! Filtering out low-complexity sequences.

use super::{partition_packet, SeqFilter};
use crate::data::FilterPacket;
use crate::error::Result;
use crate::external::ComplexityScorer;
use crate::settings::Settings;
use std::sync::Arc;

/// Keeps sequences whose dust score is strictly below a threshold.
///
/// Low-complexity sequences score high, so the default threshold removes
/// repeats and homopolymers and keeps ordinary sequence.
pub struct ByComplexity {
    scorer: Arc<dyn ComplexityScorer>,
    threshold: f64,
    reverse: bool,
}

impl ByComplexity {
    pub fn new(scorer: Arc<dyn ComplexityScorer>, threshold: f64, reverse: bool) -> Self {
        Self {
            scorer,
            threshold,
            reverse,
        }
    }

    /// Use the threshold from `settings`.
    pub fn with_settings(
        scorer: Arc<dyn ComplexityScorer>,
        settings: &Settings,
        reverse: bool,
    ) -> Self {
        Self::new(scorer, settings.default_dust_threshold, reverse)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl std::fmt::Debug for ByComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByComplexity")
            .field("threshold", &self.threshold)
            .field("reverse", &self.reverse)
            .finish_non_exhaustive()
    }
}

impl SeqFilter for ByComplexity {
    fn name(&self) -> &'static str {
        "ByComplexity"
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        partition_packet(self.name(), packet, self.reverse, |record| {
            Ok(self.scorer.score(record) < self.threshold)
        })
    }
}
