//! Employee profile records
//!
//! The input to the graph build is a JSON array of employee records produced
//! by an upstream ingestion step. Every nested field is optional, and fields
//! of the wrong shape are tolerated: they read as empty rather than failing
//! the whole record.

mod lenient;

pub(crate) use lenient::score_from_value;

use crate::graph::Category;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while loading employee records
#[derive(Error, Debug)]
pub enum ProfileError {
    /// No employee data to process
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// The input exists but is not a JSON array of records
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type ProfileResult<T> = Result<T, ProfileError>;

/// One employee record
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Employee {
    /// Unique key; person node ids are derived from it
    pub name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub job: Option<String>,

    /// Active unless the input says exactly `false`
    #[serde(
        default = "lenient::default_active",
        rename = "isActive",
        deserialize_with = "lenient::active_flag"
    )]
    pub is_active: bool,

    #[serde(default, deserialize_with = "lenient::profile")]
    pub profile: Option<Profile>,
}

/// Nested profile block
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default, deserialize_with = "lenient::traits")]
    pub personality_traits: Option<PersonalityTraits>,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub dominant_strengths: Vec<String>,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub core_values: Vec<String>,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub recent_topics_of_interest: Vec<String>,

    #[serde(default, deserialize_with = "lenient::strings")]
    pub motivation_triggers: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string")]
    pub overall_summary: Option<String>,
}

/// Five personality scores on a 1-10 scale
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct PersonalityTraits {
    #[serde(default, deserialize_with = "lenient::score")]
    pub openness: Option<u8>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub conscientiousness: Option<u8>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub extraversion: Option<u8>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub agreeableness: Option<u8>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub neuroticism: Option<u8>,
}

impl PersonalityTraits {
    /// Named scores in a fixed order
    pub fn named(&self) -> [(&'static str, Option<u8>); 5] {
        [
            ("openness", self.openness),
            ("conscientiousness", self.conscientiousness),
            ("extraversion", self.extraversion),
            ("agreeableness", self.agreeableness),
            ("neuroticism", self.neuroticism),
        ]
    }
}

impl Employee {
    /// Create an active employee with an empty profile
    pub fn new(name: impl Into<String>) -> Self {
        Employee {
            name: name.into(),
            job: None,
            is_active: true,
            profile: None,
        }
    }

    pub fn with_job(mut self, job: impl Into<String>) -> Self {
        self.job = Some(job.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Replace the attribute list for one dimension
    pub fn with_attributes<I, S>(mut self, category: Category, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = items.into_iter().map(Into::into).collect();
        let profile = self.profile.get_or_insert_with(Profile::default);
        match category {
            Category::Skill => profile.dominant_strengths = items,
            Category::Value => profile.core_values = items,
            Category::Interest => profile.recent_topics_of_interest = items,
            Category::Motivation => profile.motivation_triggers = items,
        }
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.profile.get_or_insert_with(Profile::default).overall_summary = Some(summary.into());
        self
    }

    pub fn with_traits(mut self, traits: PersonalityTraits) -> Self {
        self.profile.get_or_insert_with(Profile::default).personality_traits = Some(traits);
        self
    }

    /// Raw attribute list for a dimension; empty when absent
    pub fn attributes(&self, category: Category) -> &[String] {
        let Some(profile) = &self.profile else {
            return &[];
        };
        match category {
            Category::Skill => &profile.dominant_strengths,
            Category::Value => &profile.core_values,
            Category::Interest => &profile.recent_topics_of_interest,
            Category::Motivation => &profile.motivation_triggers,
        }
    }

    pub fn job(&self) -> &str {
        self.job.as_deref().unwrap_or("")
    }

    pub fn summary(&self) -> Option<&str> {
        self.profile.as_ref().and_then(|p| p.overall_summary.as_deref())
    }

    /// Personality scores; all absent when the block is missing
    pub fn traits(&self) -> PersonalityTraits {
        self.profile
            .as_ref()
            .and_then(|p| p.personality_traits)
            .unwrap_or_default()
    }
}

/// Records that take part in the graph (anything not explicitly inactive)
pub fn active_employees(records: &[Employee]) -> Vec<&Employee> {
    records.iter().filter(|e| e.is_active).collect()
}

/// Parse a JSON array of employee records.
///
/// Records without a usable `name` cannot be keyed and are dropped with a
/// warning; every other shape problem is absorbed field by field.
pub fn parse_employees(json: &str) -> ProfileResult<Vec<Employee>> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| ProfileError::InvalidInput(format!("not valid JSON: {}", e)))?;

    let Value::Array(items) = value else {
        return Err(ProfileError::InvalidInput(
            "expected a JSON array of employee records".to_string(),
        ));
    };

    let mut employees = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().enumerate() {
        match Employee::deserialize(item) {
            Ok(employee) => employees.push(employee),
            Err(e) => warn!("Skipping employee record #{}: {}", position, e),
        }
    }

    debug!("Parsed {} employee records", employees.len());
    Ok(employees)
}

/// Load employee records from a JSON file
pub fn load_employees(path: impl AsRef<Path>) -> ProfileResult<Vec<Employee>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)
        .map_err(|e| ProfileError::MissingInput(format!("{}: {}", path.display(), e)))?;

    let employees = parse_employees(&json)?;
    info!("Loaded {} employee records from {:?}", employees.len(), path);
    Ok(employees)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_full_record() {
        let json = r#"[{
            "name": "Alice",
            "job": "Engineer",
            "isActive": true,
            "profile": {
                "personality_traits": {"openness": 8, "conscientiousness": 7,
                    "extraversion": 5, "agreeableness": 6, "neuroticism": 3},
                "dominant_strengths": ["AWS", "インフラ設計"],
                "core_values": ["自己成長"],
                "recent_topics_of_interest": ["生成AI"],
                "motivation_triggers": ["新しい技術"],
                "overall_summary": "Builds platforms"
            }
        }]"#;

        let employees = parse_employees(json).unwrap();
        assert_eq!(employees.len(), 1);

        let alice = &employees[0];
        assert_eq!(alice.name, "Alice");
        assert_eq!(alice.job(), "Engineer");
        assert!(alice.is_active);
        assert_eq!(alice.attributes(Category::Skill), ["AWS", "インフラ設計"]);
        assert_eq!(alice.attributes(Category::Value), ["自己成長"]);
        assert_eq!(alice.attributes(Category::Interest), ["生成AI"]);
        assert_eq!(alice.attributes(Category::Motivation), ["新しい技術"]);
        assert_eq!(alice.summary(), Some("Builds platforms"));
        assert_eq!(alice.traits().openness, Some(8));
        assert_eq!(alice.traits().neuroticism, Some(3));
    }

    #[test]
    fn test_is_active_only_false_deactivates() {
        let json = r#"[
            {"name": "A"},
            {"name": "B", "isActive": false},
            {"name": "C", "isActive": null},
            {"name": "D", "isActive": "false"},
            {"name": "E", "isActive": 0}
        ]"#;

        let employees = parse_employees(json).unwrap();
        let active: Vec<&str> = active_employees(&employees)
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(active, vec!["A", "C", "D", "E"]);
    }

    #[test]
    fn test_malformed_fields_read_as_empty() {
        let json = r#"[{
            "name": "Bob",
            "job": 42,
            "profile": {
                "personality_traits": "calm",
                "dominant_strengths": "AWS",
                "core_values": ["誠実", 7, null, "挑戦"],
                "recent_topics_of_interest": null,
                "overall_summary": ["not", "a", "string"]
            }
        }]"#;

        let employees = parse_employees(json).unwrap();
        let bob = &employees[0];
        assert_eq!(bob.job(), "");
        assert!(bob.attributes(Category::Skill).is_empty());
        assert_eq!(bob.attributes(Category::Value), ["誠実", "挑戦"]);
        assert!(bob.attributes(Category::Interest).is_empty());
        assert!(bob.attributes(Category::Motivation).is_empty());
        assert_eq!(bob.summary(), None);
        assert_eq!(bob.traits(), PersonalityTraits::default());
    }

    #[test]
    fn test_profile_of_wrong_shape() {
        let employees = parse_employees(r#"[{"name": "C", "profile": "n/a"}]"#).unwrap();
        assert_eq!(employees[0].profile, None);
        assert!(employees[0].attributes(Category::Skill).is_empty());
    }

    #[test]
    fn test_scores_accept_floats_and_strings() {
        let json = r#"[{"name": "D", "profile": {"personality_traits":
            {"openness": 7.6, "conscientiousness": "9", "extraversion": "high",
             "agreeableness": 14}}}]"#;
        let traits = parse_employees(json).unwrap()[0].traits();
        assert_eq!(traits.openness, Some(8));
        assert_eq!(traits.conscientiousness, Some(9));
        assert_eq!(traits.extraversion, None);
        assert_eq!(traits.agreeableness, Some(10));
        assert_eq!(traits.neuroticism, None);
    }

    #[test]
    fn test_record_without_name_is_skipped() {
        let json = r#"[{"job": "Ghost"}, {"name": 5}, {"name": "Real"}]"#;
        let employees = parse_employees(json).unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].name, "Real");
    }

    #[test]
    fn test_non_array_input_is_invalid() {
        assert!(matches!(
            parse_employees(r#"{"name": "A"}"#),
            Err(ProfileError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_employees("not json"),
            Err(ProfileError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_array() {
        assert!(parse_employees("[]").unwrap().is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_employees(dir.path().join("employees.json"));
        assert!(matches!(result, Err(ProfileError::MissingInput(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "A"}}, {{"name": "B", "isActive": false}}]"#).unwrap();

        let employees = load_employees(file.path()).unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(active_employees(&employees).len(), 1);
    }
}
