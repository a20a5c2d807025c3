//! Pipeline runner for composing filters and streaming packets through them.

use crate::data::{
    group_in_packets, seqs_to_filter_packets, FilterPacket, ReadCountTable, SeqRecord,
};
use crate::error::{FilterError, Result};
use crate::external::{
    AlignmentReader, ComplexityScorer, DbType, MatchFilter, SearchEngine, SearchProgram,
};
#[cfg(feature = "hts")]
use crate::external::HtsAlignmentReader;
use crate::filter::{
    ByBam, ByComplexity, ByFeatureTypes, ById, ByLength, ByQuality, ByRpkm, BySearchMatch,
    SeqFilter,
};
use crate::settings::Settings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

/// A filter in a pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterStep {
    /// Keep sequences annotated with any of the feature types.
    FeatureTypes {
        feature_types: Vec<String>,
        #[serde(default)]
        reverse: bool,
    },
    /// Keep sequences at or above an RPKM, from an idxstats-style table.
    Rpkm {
        read_counts: PathBuf,
        min_rpkm: f64,
        #[serde(default)]
        reverse: bool,
    },
    /// Keep sequences within a length range.
    Length {
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        ignore_masked: bool,
    },
    /// Keep sequences whose id is listed.
    Id {
        seq_ids: Vec<String>,
        #[serde(default)]
        reverse: bool,
    },
    /// Keep reads mapped in any of the alignment files.
    Bam {
        bam_paths: Vec<PathBuf>,
        #[serde(default)]
        min_mapq: u8,
        #[serde(default)]
        reverse: bool,
    },
    /// Keep sequences at or above a mean quality.
    Quality {
        threshold: f64,
        #[serde(default)]
        reverse: bool,
        #[serde(default)]
        ignore_masked: bool,
    },
    /// Drop sequences matching a database.
    SearchMatch {
        database: PathBuf,
        program: SearchProgram,
        #[serde(default)]
        filters: Vec<MatchFilter>,
        #[serde(default)]
        db_type: Option<DbType>,
        #[serde(default)]
        reverse: bool,
    },
    /// Drop low-complexity sequences. Without a threshold the settings
    /// default applies.
    Complexity {
        #[serde(default)]
        threshold: Option<f64>,
        #[serde(default)]
        reverse: bool,
    },
}

impl FilterStep {
    /// Build the filter this step describes.
    ///
    /// Steps that delegate to an external tool take it from `collaborators`
    /// and fail with [`FilterError::Unavailable`] when it is missing.
    pub fn build(
        &self,
        settings: &Settings,
        collaborators: &Collaborators,
    ) -> Result<Box<dyn SeqFilter>> {
        let filter: Box<dyn SeqFilter> = match self {
            FilterStep::FeatureTypes {
                feature_types,
                reverse,
            } => Box::new(ByFeatureTypes::new(feature_types.iter().cloned(), *reverse)?),
            FilterStep::Rpkm {
                read_counts,
                min_rpkm,
                reverse,
            } => {
                let table = ReadCountTable::from_tsv(read_counts)?;
                Box::new(ByRpkm::new(table, *min_rpkm, *reverse)?)
            }
            FilterStep::Length {
                min,
                max,
                ignore_masked,
            } => Box::new(ByLength::new(*min, *max, *ignore_masked)?),
            FilterStep::Id { seq_ids, reverse } => {
                Box::new(ById::new(seq_ids.iter().cloned(), *reverse))
            }
            FilterStep::Bam {
                bam_paths,
                min_mapq,
                reverse,
            } => {
                let reader = collaborators.resolve_alignment_reader()?;
                Box::new(ByBam::new(reader.as_ref(), bam_paths, *min_mapq, *reverse)?)
            }
            FilterStep::Quality {
                threshold,
                reverse,
                ignore_masked,
            } => Box::new(ByQuality::new(*threshold, *reverse, *ignore_masked)),
            FilterStep::SearchMatch {
                database,
                program,
                filters,
                db_type,
                reverse,
            } => {
                let engine = collaborators.search_engine.clone().ok_or(
                    FilterError::Unavailable {
                        filter: "BySearchMatch",
                        capability: "sequence search engine",
                    },
                )?;
                Box::new(BySearchMatch::new(
                    engine,
                    database.clone(),
                    *program,
                    filters.clone(),
                    *db_type,
                    *reverse,
                ))
            }
            FilterStep::Complexity { threshold, reverse } => {
                let scorer = collaborators.complexity_scorer.clone().ok_or(
                    FilterError::Unavailable {
                        filter: "ByComplexity",
                        capability: "complexity scorer",
                    },
                )?;
                let threshold = threshold.unwrap_or(settings.default_dust_threshold);
                Box::new(ByComplexity::new(scorer, threshold, *reverse))
            }
        };
        Ok(filter)
    }
}

/// External tools available to filters built from configuration.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub alignment_reader: Option<Arc<dyn AlignmentReader>>,
    pub search_engine: Option<Arc<dyn SearchEngine>>,
    pub complexity_scorer: Option<Arc<dyn ComplexityScorer>>,
}

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alignment_reader(mut self, reader: Arc<dyn AlignmentReader>) -> Self {
        self.alignment_reader = Some(reader);
        self
    }

    pub fn with_search_engine(mut self, engine: Arc<dyn SearchEngine>) -> Self {
        self.search_engine = Some(engine);
        self
    }

    pub fn with_complexity_scorer(mut self, scorer: Arc<dyn ComplexityScorer>) -> Self {
        self.complexity_scorer = Some(scorer);
        self
    }

    #[cfg(feature = "hts")]
    fn resolve_alignment_reader(&self) -> Result<Arc<dyn AlignmentReader>> {
        Ok(self
            .alignment_reader
            .clone()
            .unwrap_or_else(|| Arc::new(HtsAlignmentReader) as Arc<dyn AlignmentReader>))
    }

    #[cfg(not(feature = "hts"))]
    fn resolve_alignment_reader(&self) -> Result<Arc<dyn AlignmentReader>> {
        self.alignment_reader
            .clone()
            .ok_or(FilterError::Unavailable {
                filter: "ByBam",
                capability: "alignment file reader (or the `hts` feature)",
            })
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("alignment_reader", &self.alignment_reader.is_some())
            .field("search_engine", &self.search_engine.is_some())
            .field("complexity_scorer", &self.complexity_scorer.is_some())
            .finish()
    }
}

/// Pipeline configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the pipeline.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// Filters to apply, in order.
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub steps: Vec<FilterStep>,
}

impl PipelineConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(FilterError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(FilterError::from)
    }
}

/// An ordered chain of filters applied to each packet.
pub struct Pipeline {
    filters: Vec<Box<dyn SeqFilter>>,
    name: String,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("filters", &self.filter_names())
            .finish()
    }
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            name: "unnamed".to_string(),
        }
    }

    /// Build every filter of a config up front.
    ///
    /// Configuration errors and eager collaborator work (reading alignment
    /// files, loading read counts) happen here, before any packet is seen.
    pub fn from_config(
        config: &PipelineConfig,
        settings: &Settings,
        collaborators: &Collaborators,
    ) -> Result<Self> {
        let mut pipeline = Self::new().name(&config.name);
        for step in &config.steps {
            pipeline.filters.push(step.build(settings, collaborators)?);
        }
        info!(
            pipeline = %pipeline.name,
            filters = pipeline.filters.len(),
            "built filter pipeline"
        );
        Ok(pipeline)
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Append a filter.
    pub fn then<F: SeqFilter + 'static>(mut self, filter: F) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Run one packet through every filter in order.
    pub fn apply(&self, packet: FilterPacket) -> Result<FilterPacket> {
        let packet = self
            .filters
            .iter()
            .try_fold(packet, |packet, filter| filter.apply(packet))?;
        debug!(
            pipeline = %self.name,
            passed = packet.passed.len(),
            filtered_out = packet.filtered_out.len(),
            "packet done"
        );
        Ok(packet)
    }

    /// Lazily filter a stream of packets.
    ///
    /// The iterator yields the first error and then stops.
    pub fn run<I>(&self, packets: I) -> PipelineRun<'_, I::IntoIter>
    where
        I: IntoIterator<Item = FilterPacket>,
    {
        PipelineRun {
            pipeline: self,
            packets: packets.into_iter(),
            failed: false,
        }
    }

    /// Batch a stream of records into packets of `packet_size` and filter them.
    pub fn run_records<'a, I>(
        &'a self,
        records: I,
        packet_size: usize,
    ) -> Result<impl Iterator<Item = Result<FilterPacket>> + 'a>
    where
        I: IntoIterator<Item = SeqRecord>,
        I::IntoIter: 'a,
    {
        let batches = group_in_packets(records, packet_size)?;
        Ok(self.run(seqs_to_filter_packets(batches)))
    }
}

/// Iterator returned by [`Pipeline::run`].
pub struct PipelineRun<'a, I> {
    pipeline: &'a Pipeline,
    packets: I,
    failed: bool,
}

impl<I: Iterator<Item = FilterPacket>> Iterator for PipelineRun<'_, I> {
    type Item = Result<FilterPacket>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.pipeline.apply(self.packets.next()?);
        self.failed = result.is_err();
        Some(result)
    }
}

/// Running totals over the packets of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub n_packets: usize,
    pub n_records: usize,
    pub n_passed: usize,
    pub n_filtered_out: usize,
}

impl PipelineSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a finished packet to the totals.
    pub fn observe(&mut self, packet: &FilterPacket) {
        self.n_packets += 1;
        self.n_records += packet.len();
        self.n_passed += packet.passed.len();
        self.n_filtered_out += packet.filtered_out.len();
    }

    /// Proportion of records that passed every filter.
    pub fn pass_rate(&self) -> f64 {
        if self.n_records == 0 {
            0.0
        } else {
            self.n_passed as f64 / self.n_records as f64
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(FilterError::from)
    }
}

impl std::fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Filter Summary")?;
        writeln!(f, "  Packets:      {}", self.n_packets)?;
        writeln!(f, "  Sequences:    {}", self.n_records)?;
        writeln!(f, "  Passed:       {}", self.n_passed)?;
        writeln!(f, "  Filtered out: {}", self.n_filtered_out)?;
        writeln!(f, "  Pass rate:    {:.1}%", self.pass_rate() * 100.0)?;
        Ok(())
    }
}
