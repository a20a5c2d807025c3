//! Per-sequence read counts used for abundance (RPKM) filtering.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Reads attributed to one reference sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadCount {
    /// Length of the reference sequence in residues.
    pub length: u64,
    pub mapped_reads: u64,
    pub unmapped_reads: u64,
}

impl ReadCount {
    pub fn new(length: u64, mapped_reads: u64, unmapped_reads: u64) -> Self {
        Self {
            length,
            mapped_reads,
            unmapped_reads,
        }
    }

    pub fn total_reads(&self) -> u64 {
        self.mapped_reads + self.unmapped_reads
    }
}

/// Row layout of `samtools idxstats` output.
#[derive(Debug, Deserialize)]
struct IdxStatsRow {
    id: String,
    length: u64,
    mapped_reads: u64,
    unmapped_reads: u64,
}

/// Read counts keyed by sequence id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadCountTable {
    counts: HashMap<String, ReadCount>,
}

impl ReadCountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load counts from a tab-separated file without header.
    ///
    /// Columns are sequence id, sequence length, mapped reads and unmapped
    /// reads, which is what `samtools idxstats` writes. The trailing `*` row
    /// (unplaced unmapped reads) is kept so it counts towards the total.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .comment(Some(b'#'))
            .from_path(path)?;

        let mut table = Self::new();
        for row in reader.deserialize() {
            let row: IdxStatsRow = row?;
            table.insert(
                &row.id,
                ReadCount::new(row.length, row.mapped_reads, row.unmapped_reads),
            );
        }
        Ok(table)
    }

    pub fn insert(&mut self, id: &str, count: ReadCount) {
        self.counts.insert(id.to_string(), count);
    }

    pub fn get(&self, id: &str) -> Option<&ReadCount> {
        self.counts.get(id)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of mapped and unmapped reads over every entry.
    pub fn total_reads(&self) -> u64 {
        self.counts.values().map(ReadCount::total_reads).sum()
    }
}

impl FromIterator<(String, ReadCount)> for ReadCountTable {
    fn from_iter<T: IntoIterator<Item = (String, ReadCount)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_tsv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t1000\t10\t2").unwrap();
        writeln!(file, "chr2\t500\t0\t0").unwrap();
        writeln!(file, "*\t0\t0\t7").unwrap();
        file.flush().unwrap();

        let table = ReadCountTable::from_tsv(file.path()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("chr1"), Some(&ReadCount::new(1000, 10, 2)));
        assert_eq!(table.get("chr2"), Some(&ReadCount::new(500, 0, 0)));
        assert_eq!(table.total_reads(), 19);
    }

    #[test]
    fn test_from_tsv_bad_count() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "chr1\t1000\tmany\t2").unwrap();
        file.flush().unwrap();

        assert!(ReadCountTable::from_tsv(file.path()).is_err());
    }

    #[test]
    fn test_collect() {
        let table: ReadCountTable = vec![
            ("a".to_string(), ReadCount::new(100, 1, 1)),
            ("b".to_string(), ReadCount::new(100, 3, 0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(table.total_reads(), 5);
        assert!(table.get("c").is_none());
    }
}
