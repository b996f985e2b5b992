//! Relationship inference (phase 2)
//!
//! Sends batches of employee pairs to a `RelationshipJudge` and turns the
//! returned scores into `COMPLEMENTS`, `MENTORING_FIT`, and `TEAM_SYNERGY`
//! edges. Batches run strictly one after another with a fixed pause in
//! between. A failed batch is logged and contributes nothing; the run
//! always continues with the next batch.

pub mod client;
pub mod parse;
pub mod prompt;

pub use client::LlmJudge;

use crate::assemble::employee_pairs;
use crate::config::InferenceConfig;
use crate::graph::{Edge, EdgeType, MentoringDirection, NodeId, TalentGraph};
use crate::profile::{active_employees, Employee};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum InferenceError {
    /// Credentials or identifiers are absent; phase 2 is skipped
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-success response from the provider
    #[error("LLM API error: {0}")]
    ApiError(String),

    /// The response body could not be read as judgments
    #[error("Parse error: {0}")]
    ParseError(String),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

/// One pair of employees in a batch
#[derive(Debug, Clone, Copy)]
pub struct PairDescriptor<'a> {
    /// 1-based position in the batch, echoed back by the judge
    pub index: usize,
    pub a: &'a Employee,
    pub b: &'a Employee,
}

/// A scored aspect of a pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Judgment {
    pub score: Option<u8>,
    pub reason: String,
}

/// Mentoring aspect with its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentoringJudgment {
    pub score: Option<u8>,
    pub direction: MentoringDirection,
    pub reason: String,
}

/// Everything the judge said about one pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairJudgment {
    /// Matches `PairDescriptor::index`
    pub pair: usize,
    pub complements: Option<Judgment>,
    pub mentoring_fit: Option<MentoringJudgment>,
    pub team_synergy: Option<Judgment>,
}

/// Capability that scores employee pairs
#[async_trait]
pub trait RelationshipJudge: Send + Sync {
    /// Judge one batch of pairs
    async fn evaluate(&self, batch: &[PairDescriptor<'_>]) -> InferenceResult<Vec<PairJudgment>>;
}

/// Pipeline tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineOptions {
    pub batch_size: usize,
    pub delay: Duration,
    pub score_threshold: u8,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self::from(&InferenceConfig::default())
    }
}

impl From<&InferenceConfig> for PipelineOptions {
    fn from(config: &InferenceConfig) -> Self {
        PipelineOptions {
            batch_size: config.batch_size.max(1),
            delay: Duration::from_millis(config.delay_ms),
            score_threshold: config.score_threshold,
        }
    }
}

/// What a pipeline run did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InferenceReport {
    pub pairs: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub complements: usize,
    pub mentoring_fit: usize,
    pub team_synergy: usize,
}

impl InferenceReport {
    pub fn edges_added(&self) -> usize {
        self.complements + self.mentoring_fit + self.team_synergy
    }

    fn count(&mut self, edge_type: EdgeType) {
        match edge_type {
            EdgeType::Complements => self.complements += 1,
            EdgeType::MentoringFit => self.mentoring_fit += 1,
            EdgeType::TeamSynergy => self.team_synergy += 1,
            _ => {}
        }
    }
}

/// Batched, sequential relationship inference
pub struct RelationshipPipeline {
    judge: Arc<dyn RelationshipJudge>,
    options: PipelineOptions,
}

impl RelationshipPipeline {
    pub fn new(judge: Arc<dyn RelationshipJudge>, options: PipelineOptions) -> Self {
        Self { judge, options }
    }

    /// Pipeline backed by the configured LLM provider.
    ///
    /// Fails with `MissingCredentials` when the provider cannot be called.
    pub fn from_config(config: &InferenceConfig) -> InferenceResult<Self> {
        let judge = LlmJudge::new(config)?;
        Ok(Self::new(Arc::new(judge), PipelineOptions::from(config)))
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Judge every active pair and append the resulting edges to `graph`
    pub async fn run(&self, records: &[Employee], graph: &mut TalentGraph) -> InferenceReport {
        let active = active_employees(records);
        let pairs = employee_pairs(&active);
        let mut report = InferenceReport {
            pairs: pairs.len(),
            ..Default::default()
        };

        let batch_count = pairs.len().div_ceil(self.options.batch_size);
        info!(
            "Relationship inference: {} pairs in {} batches",
            pairs.len(),
            batch_count
        );

        for (n, chunk) in pairs.chunks(self.options.batch_size).enumerate() {
            if n > 0 && !self.options.delay.is_zero() {
                tokio::time::sleep(self.options.delay).await;
            }
            report.batches += 1;

            let batch: Vec<PairDescriptor<'_>> = chunk
                .iter()
                .enumerate()
                .map(|(k, &(i, j))| PairDescriptor {
                    index: k + 1,
                    a: active[i],
                    b: active[j],
                })
                .collect();

            let judgments = match self.judge.evaluate(&batch).await {
                Ok(judgments) => judgments,
                Err(e) => {
                    warn!("Batch {}/{} failed, skipping: {}", n + 1, batch_count, e);
                    report.failed_batches += 1;
                    continue;
                }
            };

            let mut added = 0;
            for judgment in &judgments {
                let Some(pair) = batch.iter().find(|p| p.index == judgment.pair) else {
                    debug!("Ignoring judgment for unknown pair {}", judgment.pair);
                    continue;
                };
                for edge in judgment_edges(pair, judgment, self.options.score_threshold) {
                    report.count(edge.edge_type);
                    graph.add_edge(edge);
                    added += 1;
                }
            }
            debug!("Batch {}/{}: {} edges", n + 1, batch_count, added);
        }

        info!(
            "Relationship inference finished: {} edges, {}/{} batches failed",
            report.edges_added(),
            report.failed_batches,
            report.batches
        );
        report
    }
}

/// Edges for the aspects of a judgment that reach the threshold
pub fn judgment_edges(pair: &PairDescriptor<'_>, judgment: &PairJudgment, threshold: u8) -> Vec<Edge> {
    let a = NodeId::person(&pair.a.name);
    let b = NodeId::person(&pair.b.name);
    let passes = |score: Option<u8>| score.filter(|s| *s >= threshold);

    let mut edges = Vec::new();
    if let Some(j) = &judgment.complements {
        if let Some(score) = passes(j.score) {
            edges.push(Edge::inferred(a.clone(), b.clone(), EdgeType::Complements, score, &j.reason));
        }
    }
    if let Some(j) = &judgment.mentoring_fit {
        if let Some(score) = passes(j.score) {
            edges.push(
                Edge::inferred(a.clone(), b.clone(), EdgeType::MentoringFit, score, &j.reason)
                    .with_direction(j.direction),
            );
        }
    }
    if let Some(j) = &judgment.team_synergy {
        if let Some(score) = passes(j.score) {
            edges.push(Edge::inferred(a, b, EdgeType::TeamSynergy, score, &j.reason));
        }
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judged(score: Option<u8>) -> Judgment {
        Judgment {
            score,
            reason: "r".to_string(),
        }
    }

    #[test]
    fn test_judgment_edges_threshold() {
        let a = Employee::new("A");
        let b = Employee::new("B");
        let pair = PairDescriptor { index: 1, a: &a, b: &b };
        let judgment = PairJudgment {
            pair: 1,
            complements: Some(judged(Some(5))),
            mentoring_fit: Some(MentoringJudgment {
                score: Some(4),
                direction: MentoringDirection::AToB,
                reason: "r".to_string(),
            }),
            team_synergy: Some(judged(None)),
        };

        let edges = judgment_edges(&pair, &judgment, 5);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].edge_type, EdgeType::Complements);
        assert_eq!(edges[0].weight, 5);
        assert!(edges[0].ai_generated);
        assert_eq!(edges[0].source, NodeId::person("A"));
        assert_eq!(edges[0].target, NodeId::person("B"));
    }

    #[test]
    fn test_mentoring_edge_carries_direction() {
        let a = Employee::new("A");
        let b = Employee::new("B");
        let pair = PairDescriptor { index: 1, a: &a, b: &b };
        let judgment = PairJudgment {
            pair: 1,
            mentoring_fit: Some(MentoringJudgment {
                score: Some(9),
                direction: MentoringDirection::BToA,
                reason: "B has led this area".to_string(),
            }),
            ..Default::default()
        };

        let edges = judgment_edges(&pair, &judgment, 5);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].direction, Some(MentoringDirection::BToA));
        assert_eq!(edges[0].reason.as_deref(), Some("B has led this area"));
    }

    #[test]
    fn test_options_from_config() {
        let config = InferenceConfig {
            batch_size: 0,
            delay_ms: 250,
            score_threshold: 7,
            ..Default::default()
        };
        let options = PipelineOptions::from(&config);
        assert_eq!(options.batch_size, 1);
        assert_eq!(options.delay, Duration::from_millis(250));
        assert_eq!(options.score_threshold, 7);
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let result = RelationshipPipeline::from_config(&InferenceConfig::default());
        assert!(matches!(result, Err(InferenceError::MissingCredentials(_))));
    }
}
