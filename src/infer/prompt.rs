//! Prompt rendering for relationship judgments

use super::PairDescriptor;
use crate::graph::Category;
use crate::profile::Employee;
use std::fmt::Write;

/// Stand-in for any profile field that is absent
pub const UNKNOWN: &str = "unknown";

pub const SYSTEM_PROMPT: &str = "You are an organizational psychologist who evaluates \
working relationships between employees from their profiles. \
You answer with strict JSON only.";

const INSTRUCTIONS: &str = r#"For every pair, judge three aspects on a 0-10 scale:
- complements: how well their strengths fill each other's gaps
- mentoring_fit: how well one could mentor the other; give the direction as "A→B" (A mentors B), "B→A", or "mutual"
- team_synergy: how well they would work together on one team

Return ONLY a JSON array with one object per pair, no markdown and no commentary:
[
  {
    "pair": 1,
    "complements": {"score": 0, "reason": "..."},
    "mentoring_fit": {"score": 0, "direction": "A→B", "reason": "..."},
    "team_synergy": {"score": 0, "reason": "..."}
  }
]
Keep each reason to one sentence."#;

fn list_or_unknown(items: &[String]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if items.is_empty() {
        UNKNOWN.to_string()
    } else {
        items.join(", ")
    }
}

fn text_or_unknown(text: Option<&str>) -> &str {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => UNKNOWN,
    }
}

/// Describe one employee; every field is present, absent ones as `unknown`
pub fn describe_employee(employee: &Employee) -> String {
    let mut out = String::new();
    let job = text_or_unknown(employee.job.as_deref());
    let _ = writeln!(out, "{} ({})", employee.name, job);
    let _ = writeln!(
        out,
        "    Strengths: {}",
        list_or_unknown(employee.attributes(Category::Skill))
    );
    let _ = writeln!(
        out,
        "    Values: {}",
        list_or_unknown(employee.attributes(Category::Value))
    );
    let _ = writeln!(
        out,
        "    Interests: {}",
        list_or_unknown(employee.attributes(Category::Interest))
    );
    let _ = writeln!(
        out,
        "    Motivators: {}",
        list_or_unknown(employee.attributes(Category::Motivation))
    );

    let traits: Vec<String> = employee
        .traits()
        .named()
        .iter()
        .map(|(name, score)| match score {
            Some(s) => format!("{} {}", name, s),
            None => format!("{} {}", name, UNKNOWN),
        })
        .collect();
    let _ = writeln!(out, "    Personality (1-10): {}", traits.join(", "));
    let _ = write!(out, "    Summary: {}", text_or_unknown(employee.summary()));
    out
}

/// Describe one pair
pub fn describe_pair(pair: &PairDescriptor<'_>) -> String {
    format!(
        "Pair {}:\n  A: {}\n  B: {}",
        pair.index,
        describe_employee(pair.a),
        describe_employee(pair.b)
    )
}

/// Full user prompt for a batch
pub fn render_batch(batch: &[PairDescriptor<'_>]) -> String {
    let pairs: Vec<String> = batch.iter().map(describe_pair).collect();
    format!(
        "Evaluate the following {} employee pairs.\n\n{}\n\n{}",
        batch.len(),
        pairs.join("\n\n"),
        INSTRUCTIONS
    )
}
