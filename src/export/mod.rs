//! Graph document output
//!
//! The document shape (`metadata`, `nodes`, `edges`) is read by the
//! Markdown and HTML generators downstream; field names are a contract.

use crate::graph::{Edge, GraphStatistics, Node, TalentGraph};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Run metadata attached to the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// RFC 3339 UTC timestamp
    pub generated_at: String,
    /// Where the employee records came from
    pub source: String,
    /// Number of active employee records. Repeated names count each
    /// record, so this can exceed the number of person nodes.
    pub employee_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    /// Whether relationship inference ran
    pub ai_enhanced: bool,
}

/// The output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub metadata: GraphMetadata,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    /// Wrap a finished graph with its metadata
    pub fn new(
        graph: TalentGraph,
        source: impl Into<String>,
        employee_count: usize,
        ai_enhanced: bool,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let (nodes, edges) = graph.into_parts();
        GraphDocument {
            metadata: GraphMetadata {
                generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                source: source.into(),
                employee_count,
                node_count: nodes.len(),
                edge_count: edges.len(),
                ai_enhanced,
            },
            nodes,
            edges,
        }
    }

    pub fn statistics(&self, top: usize) -> GraphStatistics {
        GraphStatistics::from_parts(&self.nodes, &self.edges, top)
    }

    pub fn to_json_pretty(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the document in one step.
    ///
    /// The JSON goes to a sibling temp file that is then renamed over the
    /// destination, so readers never see a partial document.
    pub fn write_json_file(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        let path = path.as_ref();
        let json = self.to_json_pretty()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, json.as_bytes())?;
        fs::rename(&tmp, path)?;

        info!(
            "Wrote graph to {:?}: {} nodes, {} edges",
            path, self.metadata.node_count, self.metadata.edge_count
        );
        Ok(())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ExportResult<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Category, NodeId, PersonNode};
    use crate::profile::Employee;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_graph() -> TalentGraph {
        let mut graph = TalentGraph::new();
        graph.add_person(PersonNode::from_employee(&Employee::new("A")));
        let id = graph.upsert_attribute(NodeId::attribute("aws"), "AWS", Category::Skill, "A");
        graph.link_dimension(&NodeId::person("A"), &id, Category::Skill);
        graph
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_metadata() {
        let doc = GraphDocument::new(sample_graph(), "employees.json", 1, false, fixed_time());
        assert_eq!(
            serde_json::to_value(&doc.metadata).unwrap(),
            json!({
                "generated_at": "2026-01-15T09:30:00.000Z",
                "source": "employees.json",
                "employee_count": 1,
                "node_count": 2,
                "edge_count": 1,
                "ai_enhanced": false
            })
        );
    }

    #[test]
    fn test_document_is_pure() {
        let a = GraphDocument::new(sample_graph(), "s", 1, true, fixed_time());
        let b = GraphDocument::new(sample_graph(), "s", 1, true, fixed_time());
        assert_eq!(a.to_json_pretty().unwrap(), b.to_json_pretty().unwrap());
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("graph.json");
        let doc = GraphDocument::new(sample_graph(), "s", 1, false, fixed_time());

        doc.write_json_file(&path).unwrap();
        assert!(!dir.path().join("out").join("graph.json.tmp").exists());

        let back = GraphDocument::from_json_file(&path).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.statistics(5).person_count, 1);
    }
}
