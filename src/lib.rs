//! Composable Sequence Filtering Library
//!
//! This library partitions sequence records into *passed* and *filtered out*
//! sets by running them through a chain of independent filters, one
//! batch-sized packet at a time.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (SeqRecord, FilterPacket, ReadCountTable)
//! - **filter**: The filters and the partitioning contract they share
//! - **external**: Contracts for alignment readers, search engines and
//!   complexity scorers the filters delegate to
//! - **pipeline**: Pipeline composition and execution
//! - **settings**: Process-level defaults
//!
//! # Example
//!
//! ```no_run
//! use composable_seqfilter::prelude::*;
//!
//! let records = vec![
//!     SeqRecord::new("read1", "ACGTACGTACGT").with_quality(vec![35; 12]).unwrap(),
//!     SeqRecord::new("read2", "ACG").with_quality(vec![12; 3]).unwrap(),
//! ];
//!
//! let pipeline = Pipeline::new()
//!     .name("qc")
//!     .then(ByLength::new(Some(10), None, true).unwrap())
//!     .then(ByQuality::new(20.0, false, false));
//!
//! let mut summary = PipelineSummary::new();
//! for packet in pipeline.run_records(records, 1000).unwrap() {
//!     let packet = packet.unwrap();
//!     summary.observe(&packet);
//! }
//! println!("{}", summary);
//! ```

pub mod data;
pub mod error;
pub mod external;
pub mod filter;
pub mod pipeline;
pub mod settings;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{
        group_in_packets, seqs_to_filter_packets, uppercase_length, uppercase_segments, Feature,
        FilterPacket, ReadCount, ReadCountTable, SeqRecord,
    };
    pub use crate::error::{FilterError, Result};
    #[cfg(feature = "hts")]
    pub use crate::external::HtsAlignmentReader;
    pub use crate::external::{
        AlignedRead, AlignmentReader, ComplexityScorer, DbType, MatchFilter, SearchEngine,
        SearchHits, SearchProgram, SearchRequest, Segment,
    };
    pub use crate::filter::{
        partition_packet, ByBam, ByComplexity, ByFeatureTypes, ById, ByLength, ByQuality, ByRpkm,
        BySearchMatch, SeqFilter,
    };
    pub use crate::pipeline::{
        Collaborators, FilterStep, Pipeline, PipelineConfig, PipelineRun, PipelineSummary,
    };
    pub use crate::settings::Settings;
}
