//! Filters that partition packets into passed and filtered-out records.
//!
//! Every filter follows the same contract: records already filtered out are
//! carried over untouched and in order, each passed record is classified in
//! turn, and newly rejected records are appended after the carried-over ones.
//! Filters are built once and then applied to any number of packets.

pub mod bam;
pub mod complexity;
pub mod feature_type;
pub mod id;
pub mod length;
pub mod quality;
pub mod rpkm;
pub mod search_match;

pub use bam::ByBam;
pub use complexity::ByComplexity;
pub use feature_type::ByFeatureTypes;
pub use id::ById;
pub use length::ByLength;
pub use quality::ByQuality;
pub use rpkm::ByRpkm;
pub use search_match::BySearchMatch;

use crate::data::{FilterPacket, SeqRecord};
use crate::error::Result;
use std::sync::Arc;
use tracing::debug;

/// A packet-to-packet classification rule.
pub trait SeqFilter: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Partition `packet.passed` further, keeping `packet.filtered_out` as is.
    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket>;
}

impl<T: SeqFilter + ?Sized> SeqFilter for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        (**self).apply(packet)
    }
}

impl<T: SeqFilter + ?Sized> SeqFilter for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        (**self).apply(packet)
    }
}

/// Stable partition of `packet.passed` by `decide`, inverted when `reverse`.
///
/// Stops at the first error; no partial packet is returned.
pub fn partition_packet<F>(
    filter: &'static str,
    packet: FilterPacket,
    reverse: bool,
    mut decide: F,
) -> Result<FilterPacket>
where
    F: FnMut(&SeqRecord) -> Result<bool>,
{
    let FilterPacket {
        passed,
        mut filtered_out,
    } = packet;
    let n_in = passed.len();
    let n_carried = filtered_out.len();

    let mut seqs_passed = Vec::with_capacity(n_in);
    for record in passed {
        if decide(&record)? != reverse {
            seqs_passed.push(record);
        } else {
            filtered_out.push(record);
        }
    }

    debug!(
        filter,
        passed = seqs_passed.len(),
        filtered_out = filtered_out.len() - n_carried,
        "applied filter to packet of {} sequences",
        n_in
    );

    Ok(FilterPacket::new(seqs_passed, filtered_out))
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::data::{FilterPacket, SeqRecord};

    pub fn ids(records: &[SeqRecord]) -> Vec<&str> {
        records.iter().map(SeqRecord::id).collect()
    }

    pub fn packet_of(records: Vec<SeqRecord>) -> FilterPacket {
        FilterPacket::from_batch(records)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::ids;
    use super::*;
    use crate::error::FilterError;

    fn records(ids: &[&str]) -> Vec<SeqRecord> {
        ids.iter().map(|id| SeqRecord::new(id, "ACGT")).collect()
    }

    #[test]
    fn test_partition_keeps_previous_filtered_out() {
        let packet = FilterPacket::new(records(&["a", "b", "c", "d"]), records(&["x", "y"]));
        let out = partition_packet("test", packet, false, |r| Ok(r.id() != "b" && r.id() != "d"))
            .unwrap();

        assert_eq!(ids(&out.passed), vec!["a", "c"]);
        assert_eq!(ids(&out.filtered_out), vec!["x", "y", "b", "d"]);
    }

    #[test]
    fn test_partition_reverse_mirrors_new_records() {
        let decide = |r: &SeqRecord| Ok(r.id() < "c");
        let packet = FilterPacket::new(records(&["a", "b", "c", "d"]), records(&["z"]));

        let forward = partition_packet("test", packet.clone(), false, decide).unwrap();
        let reverse = partition_packet("test", packet, true, decide).unwrap();

        assert_eq!(ids(&forward.passed), ids(&reverse.filtered_out[1..]));
        assert_eq!(ids(&forward.filtered_out[1..]), ids(&reverse.passed));
        assert_eq!(ids(&reverse.filtered_out[..1]), vec!["z"]);
    }

    #[test]
    fn test_partition_is_complete() {
        let packet = FilterPacket::new(records(&["a", "b", "c"]), records(&["q"]));
        let before = packet.len();
        let out = partition_packet("test", packet, false, |r| Ok(r.id() == "a")).unwrap();
        assert_eq!(out.len(), before);
    }

    #[test]
    fn test_partition_fails_fast() {
        let packet = FilterPacket::from_batch(records(&["a", "b", "c"]));
        let mut seen = Vec::new();
        let result = partition_packet("test", packet, false, |r| {
            seen.push(r.id().to_string());
            if r.id() == "b" {
                Err(FilterError::MissingReadCount {
                    filter: "test",
                    record_id: r.id().to_string(),
                })
            } else {
                Ok(true)
            }
        });

        assert!(matches!(
            result,
            Err(FilterError::MissingReadCount { ref record_id, .. }) if record_id == "b"
        ));
        assert_eq!(seen, vec!["a", "b"]);
    }

    #[test]
    fn test_boxed_filter() {
        let filter: Box<dyn SeqFilter> = Box::new(ById::new(["a"], false));
        assert_eq!(filter.name(), "ById");
        let out = filter
            .apply(FilterPacket::from_batch(records(&["a", "b"])))
            .unwrap();
        assert_eq!(ids(&out.passed), vec!["a"]);
    }
}
