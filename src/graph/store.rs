//! In-memory talent graph storage
//!
//! Nodes live in an id-indexed `IndexMap`, so upserts are O(1) while the
//! output order stays the insertion order. Edges are an append-only list
//! plus a key set that enforces one dimension edge per
//! (person, attribute) pair.

use super::edge::Edge;
use super::node::{AttributeNode, Node, PersonNode};
use super::stats::GraphStatistics;
use super::types::{Category, EdgeType, NodeId};
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

/// The graph under construction
///
/// Owned by a single caller for the whole run; phases mutate it through
/// `&mut` and there is no shared access.
#[derive(Debug, Default, Clone)]
pub struct TalentGraph {
    /// Node storage: NodeId -> Node, insertion ordered
    nodes: IndexMap<NodeId, Node>,

    /// Edges in creation order
    edges: Vec<Edge>,

    /// (person, attribute) pairs that already have a dimension edge
    dimension_links: HashSet<(NodeId, NodeId)>,
}

impl TalentGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a person node. Returns false (and keeps the existing node)
    /// if a person with the same id is already present.
    pub fn add_person(&mut self, person: PersonNode) -> bool {
        if self.nodes.contains_key(&person.id) {
            debug!("Person {} already present, keeping first record", person.id);
            return false;
        }
        self.nodes.insert(person.id.clone(), Node::Person(person));
        true
    }

    /// Create the attribute node on first reference and union the
    /// category and person into it. Returns the node id.
    pub fn upsert_attribute(
        &mut self,
        id: NodeId,
        label: &str,
        category: Category,
        person: &str,
    ) -> NodeId {
        let node = self.nodes.entry(id.clone()).or_insert_with(|| {
            debug!("Created attribute node {} ({})", id, label);
            Node::Attribute(AttributeNode::new(id.clone(), label))
        });

        if let Node::Attribute(attribute) = node {
            attribute.record_reference(category, person);
        }
        id
    }

    /// Add a person -> attribute edge unless the pair is already linked.
    ///
    /// The key is (person, attribute) only, so the first dimension to reach
    /// a pair decides the edge type.
    pub fn link_dimension(&mut self, person: &NodeId, attribute: &NodeId, category: Category) -> bool {
        if !self
            .dimension_links
            .insert((person.clone(), attribute.clone()))
        {
            return false;
        }
        self.edges
            .push(Edge::dimension(person.clone(), attribute.clone(), category));
        true
    }

    /// Append an edge
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_attribute(&self, id: &NodeId) -> Option<&AttributeNode> {
        self.nodes.get(id).and_then(Node::as_attribute)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn person_count(&self) -> usize {
        self.nodes().filter(|n| matches!(n, Node::Person(_))).count()
    }

    pub fn attribute_count(&self) -> usize {
        self.nodes().filter(|n| matches!(n, Node::Attribute(_))).count()
    }

    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }

    /// First attribute node with the given canonical label
    pub fn find_attribute_by_label(&self, label: &str) -> Option<&AttributeNode> {
        self.nodes()
            .filter_map(Node::as_attribute)
            .find(|a| a.label == label)
    }

    /// The edge of a type joining two people, either orientation
    pub fn find_edge(&self, edge_type: EdgeType, a: &NodeId, b: &NodeId) -> Option<&Edge> {
        self.edges_of_type(edge_type).find(|e| e.connects(a, b))
    }

    pub fn statistics(&self, top: usize) -> GraphStatistics {
        GraphStatistics::from_parts(self.nodes.values(), &self.edges, top)
    }

    /// Consume the graph into its ordered node and edge lists
    pub fn into_parts(self) -> (Vec<Node>, Vec<Edge>) {
        (self.nodes.into_values().collect(), self.edges)
    }
}
