//! Filtering by sequence id membership.

use super::{partition_packet, SeqFilter};
use crate::data::FilterPacket;
use crate::error::Result;
use std::collections::HashSet;

/// Keeps sequences whose id is in a given set.
#[derive(Debug, Clone)]
pub struct ById {
    seq_ids: HashSet<String>,
    reverse: bool,
}

impl ById {
    /// `reverse` keeps the sequences *not* in the set instead.
    pub fn new<I, S>(seq_ids: I, reverse: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seq_ids: seq_ids.into_iter().map(Into::into).collect(),
            reverse,
        }
    }

    pub fn seq_ids(&self) -> &HashSet<String> {
        &self.seq_ids
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }
}

impl SeqFilter for ById {
    fn name(&self) -> &'static str {
        "ById"
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        partition_packet(self.name(), packet, self.reverse, |record| {
            Ok(self.seq_ids.contains(record.id()))
        })
    }
}
