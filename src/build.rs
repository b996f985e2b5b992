//! End-to-end graph build
//!
//! records -> phase 1 assembly -> optional phase 2 inference -> document.
//! Output is produced once, after both phases.

use crate::assemble::GraphAssembler;
use crate::config::{Config, ConfigError, InferenceConfig};
use crate::export::{ExportError, GraphDocument};
use crate::infer::{InferenceError, InferenceReport, RelationshipPipeline};
use crate::normalize::LabelNormalizer;
use crate::profile::{active_employees, load_employees, Employee, ProfileError};
use chrono::Utc;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Fatal build errors; inference problems never end up here
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type BuildResult<T> = Result<T, BuildError>;

/// Result of a build
#[derive(Debug)]
pub struct BuildOutcome {
    pub document: GraphDocument,
    /// Present when relationship inference ran
    pub report: Option<InferenceReport>,
}

/// Decide whether phase 2 runs.
///
/// Returns `None` when disabled or when credentials are missing; the
/// latter is logged and is not an error for the build.
pub fn enrichment_pipeline(config: &InferenceConfig, enabled: bool) -> Option<RelationshipPipeline> {
    if !enabled || !config.enabled {
        info!("Relationship inference disabled");
        return None;
    }
    match RelationshipPipeline::from_config(config) {
        Ok(pipeline) => Some(pipeline),
        Err(InferenceError::MissingCredentials(what)) => {
            warn!("Skipping relationship inference, missing {}", what);
            None
        }
        Err(e) => {
            warn!("Skipping relationship inference: {}", e);
            None
        }
    }
}

/// Build the graph document from in-memory records
pub async fn build_document(
    records: &[Employee],
    normalizer: &LabelNormalizer,
    pipeline: Option<&RelationshipPipeline>,
    source: &str,
) -> BuildOutcome {
    let employee_count = active_employees(records).len();
    let mut graph = GraphAssembler::new(normalizer).assemble(records);

    let report = match pipeline {
        Some(pipeline) => Some(pipeline.run(records, &mut graph).await),
        None => None,
    };

    let document = GraphDocument::new(graph, source, employee_count, report.is_some(), Utc::now());
    BuildOutcome { document, report }
}

/// Load records, build, and write the document to `output`
pub async fn run(config: &Config, input: &Path, output: &Path, enable_ai: bool) -> BuildResult<BuildOutcome> {
    let records = load_employees(input)?;

    let normalizer = LabelNormalizer::new().extend(config.synonyms.clone());
    let pipeline = enrichment_pipeline(&config.inference, enable_ai);
    let source = config
        .source
        .clone()
        .unwrap_or_else(|| input.display().to_string());

    let outcome = build_document(&records, &normalizer, pipeline.as_ref(), &source).await;
    outcome.document.write_json_file(output)?;
    Ok(outcome)
}
