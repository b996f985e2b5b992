//! Node implementation for the talent graph
//!
//! A node is either a person (one per active employee, immutable once
//! created) or an attribute (a canonical skill/value/interest/motivation
//! label shared across people, updated by union on every reference).

use super::types::{Category, NodeId};
use crate::profile::Employee;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A node in the talent graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Person(PersonNode),
    Attribute(AttributeNode),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Person(p) => &p.id,
            Node::Attribute(a) => &a.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Node::Person(p) => &p.label,
            Node::Attribute(a) => &a.label,
        }
    }

    pub fn as_person(&self) -> Option<&PersonNode> {
        match self {
            Node::Person(p) => Some(p),
            Node::Attribute(_) => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&AttributeNode> {
        match self {
            Node::Attribute(a) => Some(a),
            Node::Person(_) => None,
        }
    }
}

/// Person node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonNode {
    pub id: NodeId,
    /// Employee name
    pub label: String,
    pub job: String,
    pub summary: String,
    pub openness: u8,
    pub conscientiousness: u8,
    pub extraversion: u8,
    pub agreeableness: u8,
    pub neuroticism: u8,
}

impl PersonNode {
    /// Build the person node for an employee; absent scores become 0
    pub fn from_employee(employee: &Employee) -> Self {
        let traits = employee.traits();
        PersonNode {
            id: NodeId::person(&employee.name),
            label: employee.name.clone(),
            job: employee.job().to_string(),
            summary: employee.summary().unwrap_or_default().to_string(),
            openness: traits.openness.unwrap_or(0),
            conscientiousness: traits.conscientiousness.unwrap_or(0),
            extraversion: traits.extraversion.unwrap_or(0),
            agreeableness: traits.agreeableness.unwrap_or(0),
            neuroticism: traits.neuroticism.unwrap_or(0),
        }
    }
}

/// Attribute node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeNode {
    pub id: NodeId,
    /// Canonical label
    pub label: String,
    /// Every dimension this label was referenced under, first-seen order
    pub categories: IndexSet<Category>,
    /// Employees referencing this label, insertion order
    pub connected_people: IndexSet<String>,
}

impl AttributeNode {
    pub fn new(id: NodeId, label: impl Into<String>) -> Self {
        AttributeNode {
            id,
            label: label.into(),
            categories: IndexSet::new(),
            connected_people: IndexSet::new(),
        }
    }

    /// Union a reference into this node
    pub fn record_reference(&mut self, category: Category, person: &str) {
        self.categories.insert(category);
        if !self.connected_people.contains(person) {
            self.connected_people.insert(person.to_string());
        }
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }

    pub fn degree(&self) -> usize {
        self.connected_people.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::PersonalityTraits;
    use serde_json::json;

    #[test]
    fn test_person_from_employee_defaults() {
        let person = PersonNode::from_employee(&Employee::new("Alice"));
        assert_eq!(person.id.as_str(), "person:Alice");
        assert_eq!(person.label, "Alice");
        assert_eq!(person.job, "");
        assert_eq!(person.summary, "");
        assert_eq!(person.openness, 0);
        assert_eq!(person.neuroticism, 0);
    }

    #[test]
    fn test_person_from_employee_scores() {
        let employee = Employee::new("Bob")
            .with_job("Designer")
            .with_summary("Visual thinker")
            .with_traits(PersonalityTraits {
                openness: Some(9),
                extraversion: Some(4),
                ..Default::default()
            });
        let person = PersonNode::from_employee(&employee);
        assert_eq!(person.job, "Designer");
        assert_eq!(person.summary, "Visual thinker");
        assert_eq!(person.openness, 9);
        assert_eq!(person.extraversion, 4);
        assert_eq!(person.agreeableness, 0);
    }

    #[test]
    fn test_attribute_reference_union() {
        let mut node = AttributeNode::new(NodeId::attribute("成長"), "成長");
        node.record_reference(Category::Value, "A");
        node.record_reference(Category::Skill, "B");
        node.record_reference(Category::Value, "A");

        assert_eq!(
            node.categories.iter().copied().collect::<Vec<_>>(),
            vec![Category::Value, Category::Skill]
        );
        assert_eq!(
            node.connected_people.iter().cloned().collect::<Vec<_>>(),
            vec!["A".to_string(), "B".to_string()]
        );
        assert_eq!(node.degree(), 2);
    }

    #[test]
    fn test_node_serialization_shape() {
        let mut attr = AttributeNode::new(NodeId::attribute("aws"), "AWS");
        attr.record_reference(Category::Skill, "A");
        let value = serde_json::to_value(Node::Attribute(attr)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "attribute",
                "id": "attr:aws",
                "label": "AWS",
                "categories": ["skill"],
                "connectedPeople": ["A"]
            })
        );

        let person = Node::Person(PersonNode::from_employee(&Employee::new("A")));
        let value = serde_json::to_value(&person).unwrap();
        assert_eq!(value["type"], "person");
        assert_eq!(value["id"], "person:A");
        assert_eq!(value["openness"], 0);

        let back: Node = serde_json::from_value(value).unwrap();
        assert_eq!(back, person);
    }
}
