//! Filtering by whether reads are mapped in alignment files.

use super::{ById, SeqFilter};
use crate::data::FilterPacket;
use crate::error::{FilterError, Result};
use crate::external::{AlignedRead, AlignmentReader};
#[cfg(feature = "hts")]
use crate::external::HtsAlignmentReader;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Keeps reads that are mapped in any of the given alignment files.
///
/// The files are read completely when the filter is built; classification is
/// then a plain id lookup. A read counts as mapped when it is not flagged
/// unmapped and, if `min_mapq` is non-zero, its mapping quality is strictly
/// above `min_mapq`.
#[derive(Debug, Clone)]
pub struct ByBam {
    by_id: ById,
    min_mapq: u8,
}

impl ByBam {
    pub fn new<P: AsRef<Path>>(
        reader: &dyn AlignmentReader,
        bam_paths: &[P],
        min_mapq: u8,
        reverse: bool,
    ) -> Result<Self> {
        if bam_paths.is_empty() {
            return Err(FilterError::invalid(
                "ByBam",
                "at least one alignment file must be given",
            ));
        }
        let mapped = mapped_read_ids(reader, bam_paths, min_mapq)?;
        Ok(Self {
            by_id: ById::new(mapped, reverse),
            min_mapq,
        })
    }

    /// Read the alignment files with htslib.
    #[cfg(feature = "hts")]
    pub fn from_bam_files<P: AsRef<Path>>(
        bam_paths: &[P],
        min_mapq: u8,
        reverse: bool,
    ) -> Result<Self> {
        Self::new(&HtsAlignmentReader, bam_paths, min_mapq, reverse)
    }

    pub fn mapped_ids(&self) -> &HashSet<String> {
        self.by_id.seq_ids()
    }

    pub fn min_mapq(&self) -> u8 {
        self.min_mapq
    }
}

fn mapped_read_ids<P: AsRef<Path>>(
    reader: &dyn AlignmentReader,
    bam_paths: &[P],
    min_mapq: u8,
) -> Result<HashSet<String>> {
    let mut mapped = HashSet::new();
    for path in bam_paths {
        let path = path.as_ref();
        let before = mapped.len();
        reader.visit_reads(path, &mut |read: AlignedRead| {
            if !read.is_unmapped && (min_mapq == 0 || read.mapping_quality > min_mapq) {
                mapped.insert(read.query_name);
            }
        })?;
        info!(
            path = %path.display(),
            new_ids = mapped.len() - before,
            "collected mapped read ids"
        );
    }
    Ok(mapped)
}

impl SeqFilter for ByBam {
    fn name(&self) -> &'static str {
        "ByBam"
    }

    fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        self.by_id.apply(packet)
    }
}
