//! Filtering by abundance, measured as reads per kilobase per million reads.

use super::{partition_packet, SeqFilter};
use crate::data::{FilterPacket, ReadCountTable, SeqRecord};
use crate::error::{FilterError, Result};
use tracing::debug;

/// Keeps sequences whose RPKM reaches `min_rpkm`.
///
/// The million-reads denominator is the sum of mapped and unmapped reads over
/// the whole table, computed once at construction.
#[derive(Debug, Clone)]
pub struct ByRpkm {
    read_counts: ReadCountTable,
    min_rpkm: f64,
    total_reads: u64,
    reverse: bool,
}

impl ByRpkm {
    pub fn new(read_counts: ReadCountTable, min_rpkm: f64, reverse: bool) -> Result<Self> {
        let total_reads = read_counts.total_reads();
        if total_reads == 0 {
            return Err(FilterError::invalid(
                "ByRpkm",
                "the read count table holds no reads",
            ));
        }
        debug!(
            sequences = read_counts.len(),
            total_reads, "prepared read counts for RPKM filtering"
        );
        Ok(Self {
            read_counts,
            min_rpkm,
            total_reads,
            reverse,
        })
    }

    pub fn total_reads(&self) -> u64 {
        self.total_reads
    }

    /// RPKM of a sequence according to the read count table.
    pub fn rpkm(&self, record: &SeqRecord) -> Result<f64> {
        let count = self
            .read_counts
            .get(record.id())
            .ok_or_else(|| FilterError::MissingReadCount {
                filter: "ByRpkm",
                record_id: record.id().to_string(),
            })?;
        if count.length == 0 {
            return Err(FilterError::InvalidReadCount {
                filter: "ByRpkm",
                record_id: record.id().to_string(),
                reason: "sequence length is zero".to_string(),
            });
        }

        let kb_len = count.length as f64 / 1000.0;
        let million_reads = self.total_reads as f64 / 1e6;
        let rpk = count.mapped_reads as f64 / kb_len;
        Ok(rpk / million_reads)
    }
}

impl SeqFilter for ByRpkm {
    fn name(&self) -> &'static str {
        "ByRpkm"
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        partition_packet(self.name(), packet, self.reverse, |record| {
            Ok(self.rpkm(record)? >= self.min_rpkm)
        })
    }
}
