//! Filter packets: the batch-sized unit of work threaded through a filter chain.

use crate::data::SeqRecord;
use crate::error::{FilterError, Result};

/// Records of one batch, partitioned into those still eligible for
/// downstream filters and those already rejected.
///
/// `filtered_out` only grows as a packet moves through a chain; entries are
/// never removed or reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPacket {
    pub passed: Vec<SeqRecord>,
    pub filtered_out: Vec<SeqRecord>,
}

impl FilterPacket {
    pub fn new(passed: Vec<SeqRecord>, filtered_out: Vec<SeqRecord>) -> Self {
        Self {
            passed,
            filtered_out,
        }
    }

    /// A fresh packet: the whole batch passed, nothing filtered yet.
    pub fn from_batch(batch: Vec<SeqRecord>) -> Self {
        Self::new(batch, Vec::new())
    }

    pub fn passed(&self) -> &[SeqRecord] {
        &self.passed
    }

    pub fn filtered_out(&self) -> &[SeqRecord] {
        &self.filtered_out
    }

    /// Total number of records, passed and filtered.
    pub fn len(&self) -> usize {
        self.passed.len() + self.filtered_out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passed.is_empty() && self.filtered_out.is_empty()
    }

    pub fn into_parts(self) -> (Vec<SeqRecord>, Vec<SeqRecord>) {
        (self.passed, self.filtered_out)
    }
}

/// Turn a stream of record batches into filter packets, one per batch.
pub fn seqs_to_filter_packets<I>(batches: I) -> impl Iterator<Item = FilterPacket>
where
    I: IntoIterator<Item = Vec<SeqRecord>>,
{
    batches.into_iter().map(FilterPacket::from_batch)
}

/// Group a stream of records into batches of at most `packet_size`.
pub fn group_in_packets<I>(records: I, packet_size: usize) -> Result<Batches<I::IntoIter>>
where
    I: IntoIterator<Item = SeqRecord>,
{
    if packet_size == 0 {
        return Err(FilterError::invalid(
            "group_in_packets",
            "packet size must be at least 1",
        ));
    }
    Ok(Batches {
        records: records.into_iter(),
        packet_size,
    })
}

/// Lazy batching adapter returned by [`group_in_packets`].
#[derive(Debug)]
pub struct Batches<I> {
    records: I,
    packet_size: usize,
}

impl<I: Iterator<Item = SeqRecord>> Iterator for Batches<I> {
    type Item = Vec<SeqRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch: Vec<SeqRecord> = self.records.by_ref().take(self.packet_size).collect();
        if batch.is_empty() {
            None
        } else {
            Some(batch)
        }
    }
}
