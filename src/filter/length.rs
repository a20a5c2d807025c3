//! Filtering by sequence length.

use super::{partition_packet, SeqFilter};
use crate::data::{uppercase_length, FilterPacket};
use crate::error::{FilterError, Result};

/// Keeps sequences whose length lies within `[min, max]`.
///
/// Either bound may be left open, but not both. With `ignore_masked` only
/// uppercase residues are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByLength {
    min: Option<usize>,
    max: Option<usize>,
    ignore_masked: bool,
}

impl ByLength {
    pub fn new(min: Option<usize>, max: Option<usize>, ignore_masked: bool) -> Result<Self> {
        match (min, max) {
            (None, None) => Err(FilterError::invalid(
                "ByLength",
                "a minimum or a maximum length must be given",
            )),
            (Some(min), Some(max)) if max < min => Err(FilterError::invalid(
                "ByLength",
                format!("maximum length {} is below minimum length {}", max, min),
            )),
            _ => Ok(Self {
                min,
                max,
                ignore_masked,
            }),
        }
    }

    fn is_within(&self, length: usize) -> bool {
        self.min.map_or(true, |min| length >= min) && self.max.map_or(true, |max| length <= max)
    }
}

impl SeqFilter for ByLength {
    fn name(&self) -> &'static str {
        "ByLength"
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        partition_packet(self.name(), packet, false, |record| {
            let length = if self.ignore_masked {
                uppercase_length(record.seq())
            } else {
                record.len()
            };
            Ok(self.is_within(length))
        })
    }
}
