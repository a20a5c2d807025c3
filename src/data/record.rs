//! Sequence records and masking-aware measurements.

use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};

/// An annotated region of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Annotation type, e.g. `"intron"` or `"polyA"`.
    pub feature_type: String,
    /// First residue of the feature (0-based, inclusive).
    pub start: usize,
    /// Last residue of the feature (0-based, inclusive).
    pub end: usize,
}

impl Feature {
    pub fn new(feature_type: &str, start: usize, end: usize) -> Self {
        Self {
            feature_type: feature_type.to_string(),
            start,
            end,
        }
    }
}

/// A single biological sequence.
///
/// Lowercase residues mark masked, low-confidence regions. Case carries no
/// biological meaning and is only consulted by filters that ignore masking.
///
/// Deserialization checks the quality length the same way [`SeqRecord::with_quality`] does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSeqRecord")]
pub struct SeqRecord {
    id: String,
    seq: Vec<u8>,
    quality: Option<Vec<u8>>,
    features: Vec<Feature>,
}

/// Unchecked shape of a serialized [`SeqRecord`].
#[derive(Deserialize)]
struct RawSeqRecord {
    id: String,
    seq: Vec<u8>,
    #[serde(default)]
    quality: Option<Vec<u8>>,
    #[serde(default)]
    features: Vec<Feature>,
}

impl TryFrom<RawSeqRecord> for SeqRecord {
    type Error = FilterError;

    fn try_from(raw: RawSeqRecord) -> Result<Self> {
        let record = SeqRecord::new(&raw.id, raw.seq).with_features(raw.features);
        match raw.quality {
            Some(quality) => record.with_quality(quality),
            None => Ok(record),
        }
    }
}

impl SeqRecord {
    /// Create a record without qualities or features.
    pub fn new(id: &str, seq: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.to_string(),
            seq: seq.into(),
            quality: None,
            features: Vec::new(),
        }
    }

    /// Attach phred quality scores, one per residue.
    pub fn with_quality(mut self, quality: impl Into<Vec<u8>>) -> Result<Self> {
        let quality = quality.into();
        if quality.len() != self.seq.len() {
            return Err(FilterError::DimensionMismatch {
                record_id: self.id,
                expected: self.seq.len(),
                actual: quality.len(),
            });
        }
        self.quality = Some(quality);
        Ok(self)
    }

    /// Attach annotated features.
    pub fn with_features(mut self, features: Vec<Feature>) -> Self {
        self.features = features;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn seq(&self) -> &[u8] {
        &self.seq
    }

    pub fn quality(&self) -> Option<&[u8]> {
        self.quality.as_deref()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Number of unmasked (uppercase) residues in a sequence.
pub fn uppercase_length(seq: &[u8]) -> usize {
    seq.iter().filter(|c| c.is_ascii_uppercase()).count()
}

/// Maximal runs of uppercase residues as inclusive `(start, end)` pairs.
///
/// Runs are reported left to right. A sequence without uppercase residues
/// has no segments.
pub fn uppercase_segments(seq: &[u8]) -> Vec<(usize, usize)> {
    let mut segments = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in seq.iter().enumerate() {
        match (c.is_ascii_uppercase(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                segments.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        segments.push((s, seq.len() - 1));
    }

    segments
}
