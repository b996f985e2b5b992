//! Edge implementation for the talent graph

use super::types::{Category, EdgeType, MentoringDirection, NodeId};
use serde::{Deserialize, Serialize};

/// Canonical labels two people have in common
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedAttributes {
    pub skills: Vec<String>,
    pub values: Vec<String>,
    pub interests: Vec<String>,
}

impl SharedAttributes {
    /// Number of shared labels; motivations are not compared
    pub fn weight(&self) -> u32 {
        (self.skills.len() + self.values.len() + self.interests.len()) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.weight() == 0
    }
}

/// An edge in the talent graph
///
/// Dimension edges point from a person to an attribute. `SHARES` and the
/// inferred edge types connect two people and are undirected in meaning;
/// `source` is simply the earlier person in input order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,

    #[serde(rename = "type")]
    pub edge_type: EdgeType,

    pub weight: u32,

    /// Overlap lists, `SHARES` only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared: Option<SharedAttributes>,

    /// Model rationale, inferred edges only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// `MENTORING_FIT` only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<MentoringDirection>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub ai_generated: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Edge {
    /// Person -> attribute edge for one dimension
    pub fn dimension(person: NodeId, attribute: NodeId, category: Category) -> Self {
        Edge {
            source: person,
            target: attribute,
            edge_type: category.edge_type(),
            weight: 1,
            shared: None,
            reason: None,
            direction: None,
            ai_generated: false,
        }
    }

    /// Person <-> person overlap edge
    pub fn shares(a: NodeId, b: NodeId, shared: SharedAttributes) -> Self {
        Edge {
            source: a,
            target: b,
            edge_type: EdgeType::Shares,
            weight: shared.weight(),
            shared: Some(shared),
            reason: None,
            direction: None,
            ai_generated: false,
        }
    }

    /// Person <-> person edge from a model judgment
    pub fn inferred(
        a: NodeId,
        b: NodeId,
        edge_type: EdgeType,
        score: u8,
        reason: impl Into<String>,
    ) -> Self {
        Edge {
            source: a,
            target: b,
            edge_type,
            weight: u32::from(score),
            shared: None,
            reason: Some(reason.into()),
            direction: None,
            ai_generated: true,
        }
    }

    pub fn with_direction(mut self, direction: MentoringDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Whether this edge joins the two given nodes, in either orientation
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (&self.source == a && &self.target == b) || (&self.source == b && &self.target == a)
    }
}
