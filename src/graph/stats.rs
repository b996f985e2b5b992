//! Summary statistics over a built graph

use super::edge::Edge;
use super::node::Node;
use super::types::{Category, EdgeType};
use indexmap::IndexMap;
use serde::Serialize;

/// An attribute and how many people reference it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDegree {
    pub label: String,
    pub categories: Vec<Category>,
    pub people: usize,
}

/// A weighted person pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairWeight {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// Graph statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub person_count: usize,
    pub attribute_count: usize,
    /// Edge count per type, in `EdgeType::ALL` order, zero counts included
    pub edge_counts: IndexMap<EdgeType, usize>,
    /// Most-referenced attributes, descending
    pub top_attributes: Vec<AttributeDegree>,
    /// Heaviest `SHARES` edges, descending
    pub strongest_pairs: Vec<PairWeight>,
}

impl GraphStatistics {
    pub fn from_parts<'a>(
        nodes: impl IntoIterator<Item = &'a Node>,
        edges: &[Edge],
        top: usize,
    ) -> Self {
        let mut person_count = 0;
        let mut attributes = Vec::new();
        for node in nodes {
            match node {
                Node::Person(_) => person_count += 1,
                Node::Attribute(a) => attributes.push(AttributeDegree {
                    label: a.label.clone(),
                    categories: a.categories.iter().copied().collect(),
                    people: a.degree(),
                }),
            }
        }
        let attribute_count = attributes.len();

        let mut edge_counts: IndexMap<EdgeType, usize> =
            EdgeType::ALL.iter().map(|t| (*t, 0)).collect();
        for edge in edges {
            *edge_counts.entry(edge.edge_type).or_insert(0) += 1;
        }

        // Stable sorts keep insertion order among ties
        attributes.sort_by(|a, b| b.people.cmp(&a.people));
        attributes.truncate(top);

        let mut strongest_pairs: Vec<PairWeight> = edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::Shares)
            .map(|e| PairWeight {
                source: person_name(e.source.as_str()),
                target: person_name(e.target.as_str()),
                weight: e.weight,
            })
            .collect();
        strongest_pairs.sort_by(|a, b| b.weight.cmp(&a.weight));
        strongest_pairs.truncate(top);

        GraphStatistics {
            person_count,
            attribute_count,
            edge_counts,
            top_attributes: attributes,
            strongest_pairs,
        }
    }

    pub fn edge_count(&self, edge_type: EdgeType) -> usize {
        self.edge_counts.get(&edge_type).copied().unwrap_or(0)
    }

    pub fn ai_edge_count(&self) -> usize {
        self.edge_counts
            .iter()
            .filter(|(t, _)| t.is_ai_generated())
            .map(|(_, n)| n)
            .sum()
    }
}

fn person_name(id: &str) -> String {
    id.strip_prefix(super::NodeId::PERSON_PREFIX)
        .unwrap_or(id)
        .to_string()
}
