//! Reading alignment files into the minimal per-read view the filters need.

use crate::error::Result;
use std::path::Path;

/// What a filter needs to know about one alignment record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedRead {
    pub query_name: String,
    pub is_unmapped: bool,
    pub mapping_quality: u8,
}

/// Source of alignment records, one file at a time.
pub trait AlignmentReader: Send + Sync {
    /// Call `visit` for every record in the file at `path`, in file order.
    fn visit_reads(&self, path: &Path, visit: &mut dyn FnMut(AlignedRead)) -> Result<()>;
}

/// [`AlignmentReader`] backed by htslib; handles BAM, SAM and CRAM.
#[cfg(feature = "hts")]
#[derive(Debug, Clone, Copy, Default)]
pub struct HtsAlignmentReader;

#[cfg(feature = "hts")]
impl AlignmentReader for HtsAlignmentReader {
    fn visit_reads(&self, path: &Path, visit: &mut dyn FnMut(AlignedRead)) -> Result<()> {
        use rust_htslib::bam::{self, Read};

        let mut reader = bam::Reader::from_path(path)?;
        for record in reader.records() {
            let record = record?;
            visit(AlignedRead {
                query_name: String::from_utf8_lossy(record.qname()).into_owned(),
                is_unmapped: record.is_unmapped(),
                mapping_quality: record.mapq(),
            });
        }
        Ok(())
    }
}
