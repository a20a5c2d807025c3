//! Pipeline composition and execution for sequence filtering.

mod runner;

pub use runner::{
    Collaborators, FilterStep, Pipeline, PipelineConfig, PipelineRun, PipelineSummary,
};
