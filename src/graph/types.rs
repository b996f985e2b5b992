//! Core type definitions for the talent graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier (`person:<name>` or `attr:<slug>`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub const PERSON_PREFIX: &'static str = "person:";
    pub const ATTRIBUTE_PREFIX: &'static str = "attr:";

    /// Id of the person node for an employee name
    pub fn person(name: &str) -> Self {
        NodeId(format!("{}{}", Self::PERSON_PREFIX, name))
    }

    /// Id of an attribute node for an already-computed slug
    pub fn attribute(slug: &str) -> Self {
        NodeId(format!("{}{}", Self::ATTRIBUTE_PREFIX, slug))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_person(&self) -> bool {
        self.0.starts_with(Self::PERSON_PREFIX)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attribute dimension an employee associates with a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Skill,
    Value,
    Interest,
    Motivation,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Skill,
        Category::Value,
        Category::Interest,
        Category::Motivation,
    ];

    /// Edge type linking a person to an attribute of this dimension
    pub fn edge_type(self) -> EdgeType {
        match self {
            Category::Skill => EdgeType::HasSkill,
            Category::Value => EdgeType::Values,
            Category::Interest => EdgeType::InterestedIn,
            Category::Motivation => EdgeType::MotivatedBy,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Skill => "skill",
            Category::Value => "value",
            Category::Interest => "interest",
            Category::Motivation => "motivation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship type. The serialized names are read by the
/// documentation generators and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeType {
    HasSkill,
    Values,
    InterestedIn,
    MotivatedBy,
    Shares,
    Complements,
    MentoringFit,
    TeamSynergy,
}

impl EdgeType {
    pub const ALL: [EdgeType; 8] = [
        EdgeType::HasSkill,
        EdgeType::Values,
        EdgeType::InterestedIn,
        EdgeType::MotivatedBy,
        EdgeType::Shares,
        EdgeType::Complements,
        EdgeType::MentoringFit,
        EdgeType::TeamSynergy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeType::HasSkill => "HAS_SKILL",
            EdgeType::Values => "VALUES",
            EdgeType::InterestedIn => "INTERESTED_IN",
            EdgeType::MotivatedBy => "MOTIVATED_BY",
            EdgeType::Shares => "SHARES",
            EdgeType::Complements => "COMPLEMENTS",
            EdgeType::MentoringFit => "MENTORING_FIT",
            EdgeType::TeamSynergy => "TEAM_SYNERGY",
        }
    }

    /// Edges produced by the relationship inference pipeline
    pub fn is_ai_generated(self) -> bool {
        matches!(
            self,
            EdgeType::Complements | EdgeType::MentoringFit | EdgeType::TeamSynergy
        )
    }
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who would mentor whom in a `MENTORING_FIT` edge (A = source, B = target)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MentoringDirection {
    #[serde(rename = "A→B")]
    AToB,
    #[serde(rename = "B→A")]
    BToA,
    #[serde(rename = "mutual")]
    Mutual,
}

impl MentoringDirection {
    /// Lenient parse of a model-supplied direction; unknown strings are mutual
    pub fn parse(raw: &str) -> Self {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match compact.as_str() {
            "a→b" | "a->b" | "a=>b" => MentoringDirection::AToB,
            "b→a" | "b->a" | "b=>a" => MentoringDirection::BToA,
            _ => MentoringDirection::Mutual,
        }
    }
}
