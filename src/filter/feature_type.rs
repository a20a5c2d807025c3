//! Filtering by annotated feature types.

use super::{partition_packet, SeqFilter};
use crate::data::FilterPacket;
use crate::error::{FilterError, Result};
use std::collections::HashSet;

/// Keeps sequences annotated with at least one feature of the given types.
#[derive(Debug, Clone)]
pub struct ByFeatureTypes {
    feature_types: HashSet<String>,
    reverse: bool,
}

impl ByFeatureTypes {
    pub fn new<I, S>(feature_types: I, reverse: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let feature_types: HashSet<String> = feature_types.into_iter().map(Into::into).collect();
        if feature_types.is_empty() {
            return Err(FilterError::invalid(
                "ByFeatureTypes",
                "at least one feature type must be given",
            ));
        }
        Ok(Self {
            feature_types,
            reverse,
        })
    }
}

impl SeqFilter for ByFeatureTypes {
    fn name(&self) -> &'static str {
        "ByFeatureTypes"
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        partition_packet(self.name(), packet, self.reverse, |record| {
            Ok(record
                .features()
                .iter()
                .any(|feature| self.feature_types.contains(&feature.feature_type)))
        })
    }
}
