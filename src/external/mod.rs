//! Contracts for the collaborators the filters delegate to.
//!
//! - **alignment**: reading mapped reads out of BAM/SAM files
//! - **search**: sequence similarity search against a database
//! - **complexity**: low-complexity (dust) scoring

pub mod alignment;
pub mod complexity;
pub mod search;

pub use alignment::{AlignedRead, AlignmentReader};
#[cfg(feature = "hts")]
pub use alignment::HtsAlignmentReader;
pub use complexity::ComplexityScorer;
pub use search::{
    DbType, MatchFilter, SearchEngine, SearchHits, SearchProgram, SearchRequest, Segment,
};
