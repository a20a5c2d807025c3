//! Data structures for sequence filtering.

mod packet;
mod read_counts;
mod record;

pub use packet::{group_in_packets, seqs_to_filter_packets, Batches, FilterPacket};
pub use read_counts::{ReadCount, ReadCountTable};
pub use record::{uppercase_length, uppercase_segments, Feature, SeqRecord};
