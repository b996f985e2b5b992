//! Deterministic graph assembly (phase 1)
//!
//! Builds person nodes, attribute nodes, person -> attribute dimension
//! edges, and pairwise `SHARES` overlap edges from employee records.
//! Identical input produces identical ids, labels, and ordering. Nothing
//! in this phase fails: absent fields are empty collections.

use crate::graph::{Category, Edge, NodeId, PersonNode, SharedAttributes, TalentGraph};
use crate::normalize::LabelNormalizer;
use crate::profile::{active_employees, Employee};
use rustc_hash::FxHashSet;
use tracing::{debug, info};

/// Dimensions compared for `SHARES`; motivations are excluded
const OVERLAP_CATEGORIES: [Category; 3] = [Category::Skill, Category::Value, Category::Interest];

/// Every unordered pair of positions `(i, j)` with `i < j`, skipping pairs
/// of records that share a name (they would map to the same person node).
pub fn employee_pairs(active: &[&Employee]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(active.len() * active.len().saturating_sub(1) / 2);
    for i in 0..active.len() {
        for j in (i + 1)..active.len() {
            if active[i].name == active[j].name {
                debug!("Skipping pair of duplicate name {}", active[i].name);
                continue;
            }
            pairs.push((i, j));
        }
    }
    pairs
}

/// Canonical overlap lists for one employee
#[derive(Debug, Default)]
struct CanonicalProfile {
    skills: Vec<String>,
    values: Vec<String>,
    interests: Vec<String>,
}

impl CanonicalProfile {
    fn list(&self, category: Category) -> &[String] {
        match category {
            Category::Skill => &self.skills,
            Category::Value => &self.values,
            Category::Interest => &self.interests,
            Category::Motivation => &[],
        }
    }
}

/// Phase-1 graph builder
pub struct GraphAssembler<'a> {
    normalizer: &'a LabelNormalizer,
}

impl<'a> GraphAssembler<'a> {
    pub fn new(normalizer: &'a LabelNormalizer) -> Self {
        Self { normalizer }
    }

    /// Build the base graph from the full record list
    pub fn assemble(&self, records: &[Employee]) -> TalentGraph {
        let active = active_employees(records);
        let mut graph = TalentGraph::new();

        for employee in &active {
            graph.add_person(PersonNode::from_employee(employee));
        }

        for category in Category::ALL {
            for employee in &active {
                self.add_dimension(&mut graph, employee, category);
            }
        }

        let shares = self.add_shares(&mut graph, &active);

        info!(
            "Assembled graph: {} people, {} attributes, {} edges ({} SHARES)",
            graph.person_count(),
            graph.attribute_count(),
            graph.edge_count(),
            shares
        );
        graph
    }

    fn add_dimension(&self, graph: &mut TalentGraph, employee: &Employee, category: Category) {
        let person = NodeId::person(&employee.name);
        for label in self.normalizer.canonical_set(employee.attributes(category)) {
            let id = NodeId::attribute(&self.normalizer.normalize_for_id(&label));
            let id = graph.upsert_attribute(id, &label, category, &employee.name);
            graph.link_dimension(&person, &id, category);
        }
    }

    fn canonical_profile(&self, employee: &Employee) -> CanonicalProfile {
        CanonicalProfile {
            skills: self.normalizer.canonical_set(employee.attributes(Category::Skill)),
            values: self.normalizer.canonical_set(employee.attributes(Category::Value)),
            interests: self.normalizer.canonical_set(employee.attributes(Category::Interest)),
        }
    }

    /// Overlap between two employees, lists in the first employee's order
    pub fn shared_attributes(&self, a: &Employee, b: &Employee) -> SharedAttributes {
        overlap(&self.canonical_profile(a), &self.canonical_profile(b))
    }

    fn add_shares(&self, graph: &mut TalentGraph, active: &[&Employee]) -> usize {
        let profiles: Vec<CanonicalProfile> =
            active.iter().map(|e| self.canonical_profile(e)).collect();

        let mut added = 0;
        for (i, j) in employee_pairs(active) {
            let shared = overlap(&profiles[i], &profiles[j]);
            if shared.is_empty() {
                continue;
            }
            graph.add_edge(Edge::shares(
                NodeId::person(&active[i].name),
                NodeId::person(&active[j].name),
                shared,
            ));
            added += 1;
        }
        added
    }
}

fn overlap(a: &CanonicalProfile, b: &CanonicalProfile) -> SharedAttributes {
    let [skills, values, interests] = OVERLAP_CATEGORIES.map(|category| {
        let other: FxHashSet<&str> = b.list(category).iter().map(String::as_str).collect();
        a.list(category)
            .iter()
            .filter(|label| other.contains(label.as_str()))
            .cloned()
            .collect::<Vec<String>>()
    });
    SharedAttributes {
        skills,
        values,
        interests,
    }
}
