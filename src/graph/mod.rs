//! Talent graph data model
//!
//! - Person and attribute nodes (`node`)
//! - Dimension, overlap, and inferred relationship edges (`edge`)
//! - Id-indexed, insertion-ordered storage (`store`)
//! - Summary statistics (`stats`)

pub mod edge;
pub mod node;
pub mod stats;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Edge, SharedAttributes};
pub use node::{AttributeNode, Node, PersonNode};
pub use stats::{AttributeDegree, GraphStatistics, PairWeight};
pub use store::TalentGraph;
pub use types::{Category, EdgeType, MentoringDirection, NodeId};
