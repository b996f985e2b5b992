//! Talent Graph
//!
//! Builds a labeled graph of people and the attributes they share from
//! personnel-profile records, then optionally enriches it with pairwise
//! relationship judgments from an LLM.
//!
//! # Pipeline
//!
//! - Label normalization: free-text attributes collapse onto canonical
//!   labels through a fixed synonym table (`normalize`)
//! - Phase 1, deterministic: person and attribute nodes, dimension edges,
//!   and pairwise `SHARES` overlap edges (`assemble`)
//! - Phase 2, optional: batched, rate-limited relationship inference that
//!   tolerates failed batches (`infer`)
//! - Output: one JSON document with run metadata (`export`)
//!
//! ## Example Usage
//!
//! ```rust
//! use talentgraph::{Category, Employee, GraphAssembler, LabelNormalizer, EdgeType};
//!
//! let records = vec![
//!     Employee::new("A")
//!         .with_attributes(Category::Skill, ["AWS", "インフラ設計"])
//!         .with_attributes(Category::Value, ["自己成長"]),
//!     Employee::new("B")
//!         .with_attributes(Category::Skill, ["AWS"])
//!         .with_attributes(Category::Value, ["成長"]),
//! ];
//!
//! let normalizer = LabelNormalizer::new();
//! let graph = GraphAssembler::new(&normalizer).assemble(&records);
//!
//! let shares: Vec<_> = graph.edges_of_type(EdgeType::Shares).collect();
//! assert_eq!(shares.len(), 1);
//! assert_eq!(shares[0].weight, 2);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod assemble;
pub mod build;
pub mod config;
pub mod export;
pub mod graph;
pub mod infer;
pub mod normalize;
pub mod profile;

// Re-export main types for convenience
pub use assemble::{employee_pairs, GraphAssembler};

pub use build::{build_document, enrichment_pipeline, run, BuildError, BuildOutcome, BuildResult};

pub use config::{Config, ConfigError, ConfigResult, InferenceConfig, LLMProvider};

pub use export::{ExportError, ExportResult, GraphDocument, GraphMetadata};

pub use graph::{
    AttributeNode, Category, Edge, EdgeType, GraphStatistics, MentoringDirection, Node, NodeId,
    PersonNode, SharedAttributes, TalentGraph,
};

pub use infer::{
    InferenceError, InferenceReport, InferenceResult, Judgment, LlmJudge, MentoringJudgment,
    PairDescriptor, PairJudgment, PipelineOptions, RelationshipJudge, RelationshipPipeline,
};

pub use normalize::LabelNormalizer;

pub use profile::{
    active_employees, load_employees, parse_employees, Employee, PersonalityTraits, Profile,
    ProfileError, ProfileResult,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.3.0");
    }
}
