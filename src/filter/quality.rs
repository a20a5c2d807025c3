//! Filtering by mean phred quality.

use super::{partition_packet, SeqFilter};
use crate::data::{uppercase_segments, FilterPacket, SeqRecord};
use crate::error::{FilterError, Result};

/// Keeps sequences whose quality score reaches a threshold.
///
/// The score is the mean of all quality values. With `ignore_masked`, each
/// unmasked segment contributes `sum(qualities) * segment_length`, and the
/// total is divided by the number of quality values in the whole record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ByQuality {
    threshold: f64,
    reverse: bool,
    ignore_masked: bool,
}

impl ByQuality {
    pub fn new(threshold: f64, reverse: bool, ignore_masked: bool) -> Self {
        Self {
            threshold,
            reverse,
            ignore_masked,
        }
    }

    /// Quality score of a record as compared against the threshold.
    pub fn score(&self, record: &SeqRecord) -> Result<f64> {
        let quals = record
            .quality()
            .ok_or_else(|| FilterError::MissingAnnotation {
                filter: "ByQuality",
                record_id: record.id().to_string(),
                annotation: "quality scores",
            })?;
        if quals.len() != record.len() {
            return Err(FilterError::DimensionMismatch {
                record_id: record.id().to_string(),
                expected: record.len(),
                actual: quals.len(),
            });
        }
        if quals.is_empty() {
            return Ok(0.0);
        }

        let total = if self.ignore_masked {
            // Divided below by the full record length, not the unmasked length.
            uppercase_segments(record.seq())
                .into_iter()
                .map(|(start, end)| {
                    let segment = &quals[start..=end];
                    sum(segment) * segment.len() as f64
                })
                .sum::<f64>()
        } else {
            sum(quals)
        };

        Ok(total / quals.len() as f64)
    }
}

fn sum(quals: &[u8]) -> f64 {
    quals.iter().map(|&q| q as u64).sum::<u64>() as f64
}

impl SeqFilter for ByQuality {
    fn name(&self) -> &'static str {
        "ByQuality"
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        partition_packet(self.name(), packet, self.reverse, |record| {
            Ok(self.score(record)? >= self.threshold)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::testing::{ids, packet_of};
    use approx::assert_relative_eq;

    fn with_quals(id: &str, seq: &str, quals: &[u8]) -> SeqRecord {
        SeqRecord::new(id, seq).with_quality(quals.to_vec()).unwrap()
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let record = with_quals("r", "ACG", &[30, 30, 30]);
        let out = ByQuality::new(30.0, false, false)
            .apply(packet_of(vec![record]))
            .unwrap();
        assert_eq!(ids(&out.passed), vec!["r"]);
    }

    #[test]
    fn test_mean_quality() {
        let records = vec![
            with_quals("good", "ACGT", &[40, 40, 30, 30]),
            with_quals("bad", "ACGT", &[10, 20, 20, 10]),
        ];
        let filter = ByQuality::new(20.0, false, false);
        assert_relative_eq!(filter.score(&records[0]).unwrap(), 35.0);
        assert_relative_eq!(filter.score(&records[1]).unwrap(), 15.0);

        let out = filter.apply(packet_of(records.clone())).unwrap();
        assert_eq!(ids(&out.passed), vec!["good"]);
        assert_eq!(ids(&out.filtered_out), vec!["bad"]);

        let out = ByQuality::new(20.0, true, false)
            .apply(packet_of(records))
            .unwrap();
        assert_eq!(ids(&out.passed), vec!["bad"]);
    }

    #[test]
    fn test_ignore_masked_weighting() {
        // Segments (0, 1) and (4, 4): (20 + 20) * 2 + 40 * 1 = 120, over 5 values.
        let record = with_quals("m", "ACgtA", &[20, 20, 10, 10, 40]);
        let score = ByQuality::new(0.0, false, true).score(&record).unwrap();
        assert_relative_eq!(score, 24.0);

        let unmasked = ByQuality::new(0.0, false, false).score(&record).unwrap();
        assert_relative_eq!(unmasked, 20.0);
    }

    #[test]
    fn test_fully_masked_scores_zero() {
        let record = with_quals("m", "acgt", &[40, 40, 40, 40]);
        let score = ByQuality::new(0.0, false, true).score(&record).unwrap();
        assert_relative_eq!(score, 0.0);
    }

    #[test]
    fn test_missing_quality() {
        let records = vec![
            with_quals("q", "AC", &[30, 30]),
            SeqRecord::new("noqual", "ACGT"),
        ];
        let result = ByQuality::new(20.0, false, false).apply(packet_of(records));
        match result {
            Err(FilterError::MissingAnnotation {
                filter, record_id, ..
            }) => {
                assert_eq!(filter, "ByQuality");
                assert_eq!(record_id, "noqual");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_mismatched_record_from_yaml_is_rejected() {
        let yaml = "id: r\nseq: [65, 67, 71, 84, 65]\nquality: [30, 30]\nfeatures: []\n";
        assert!(serde_yaml::from_str::<SeqRecord>(yaml).is_err());

        let yaml = "id: r\nseq: [65, 67, 71, 84, 65]\nquality: [30, 30, 30, 30, 30]\n";
        let record: SeqRecord = serde_yaml::from_str(yaml).unwrap();
        let out = ByQuality::new(20.0, false, true)
            .apply(packet_of(vec![record]))
            .unwrap();
        assert_eq!(ids(&out.passed), vec!["r"]);
    }

    #[test]
    fn test_empty_sequence_scores_zero() {
        let record = with_quals("empty", "", &[]);
        let score = ByQuality::new(0.0, false, false).score(&record).unwrap();
        assert_relative_eq!(score, 0.0);
    }
}
