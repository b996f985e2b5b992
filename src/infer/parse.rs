//! Tolerant parsing of judge responses
//!
//! Models wrap JSON in markdown fences, add commentary, cut arrays short,
//! and drop fields. Anything recoverable is kept; a pair whose judgment is
//! unreadable simply yields no edges.

use super::{InferenceError, InferenceResult, Judgment, MentoringJudgment, PairJudgment};
use crate::graph::MentoringDirection;
use crate::profile::score_from_value;
use serde_json::Value;
use tracing::debug;

/// Parse a response into judgments for a batch of `batch_len` pairs.
///
/// Fails only when no judgment object can be recovered at all.
pub fn parse_judgments(response: &str, batch_len: usize) -> InferenceResult<Vec<PairJudgment>> {
    let body = strip_fences(response);
    if !body.contains('[') {
        return Err(InferenceError::ParseError(
            "response contains no JSON array".to_string(),
        ));
    }

    let items = match first_judgment_array(body) {
        Some(items) => items,
        None => {
            let salvaged = salvage_start(body)
                .map(|start| complete_objects(&body[start + 1..]))
                .unwrap_or_default();
            if salvaged.is_empty() {
                return Err(InferenceError::ParseError(
                    "response array is not valid JSON".to_string(),
                ));
            }
            debug!("Recovered {} judgments from a truncated array", salvaged.len());
            salvaged
        }
    };

    let mut judgments: Vec<PairJudgment> = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let Some(judgment) = judgment_from_value(item, position + 1) else {
            continue;
        };
        if judgment.pair == 0 || judgment.pair > batch_len {
            debug!("Judgment for pair {} is outside the batch", judgment.pair);
            continue;
        }
        if judgments.iter().any(|j| j.pair == judgment.pair) {
            debug!("Duplicate judgment for pair {}, keeping the first", judgment.pair);
            continue;
        }
        judgments.push(judgment);
    }
    Ok(judgments)
}

/// First complete JSON array in `body` that can hold judgments: empty, or
/// with at least one object. Commentary such as "[0-10]" before the real
/// array is skipped.
fn first_judgment_array(body: &str) -> Option<Vec<Value>> {
    body.match_indices('[').find_map(|(i, _)| {
        let mut stream = serde_json::Deserializer::from_str(&body[i..]).into_iter::<Vec<Value>>();
        match stream.next() {
            Some(Ok(items)) if items.is_empty() || items.iter().any(Value::is_object) => Some(items),
            _ => None,
        }
    })
}

/// Where a cut-off array of objects begins: the first `[` followed by `{`
fn salvage_start(body: &str) -> Option<usize> {
    body.match_indices('[')
        .map(|(i, _)| i)
        .find(|&i| body[i + 1..].trim_start().starts_with('{'))
}

/// Strip a surrounding markdown code fence, if any
fn strip_fences(response: &str) -> &str {
    let trimmed = response.trim();
    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // Skip language tag (e.g. "json\n")
        let code_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
        let code = &after_fence[code_start..];
        return match code.find("```") {
            Some(end) => code[..end].trim(),
            None => code.trim(),
        };
    }
    trimmed
}

/// Every complete top-level `{...}` object in a (possibly truncated) array body
fn complete_objects(body: &str) -> Vec<Value> {
    let mut objects = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in body.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => {
                if depth == 0 && c == '{' {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' | ']' => {
                if depth == 0 {
                    // end of the outer array
                    break;
                }
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        if let Ok(value) = serde_json::from_str(&body[s..=i]) {
                            objects.push(value);
                        }
                    }
                }
            }
            _ => {}
        }
    }
    objects
}

fn pair_index(item: &Value, position: usize) -> usize {
    match item.get("pair") {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0) as usize,
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => position,
    }
}

fn reason(aspect: &Value) -> String {
    aspect
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn scored(item: &Value, key: &str) -> Option<Judgment> {
    let aspect = item.get(key).filter(|a| a.is_object())?;
    Some(Judgment {
        score: aspect.get("score").and_then(score_from_value),
        reason: reason(aspect),
    })
}

fn mentoring(item: &Value) -> Option<MentoringJudgment> {
    let aspect = item.get("mentoring_fit").filter(|a| a.is_object())?;
    Some(MentoringJudgment {
        score: aspect.get("score").and_then(score_from_value),
        direction: aspect
            .get("direction")
            .and_then(Value::as_str)
            .map(MentoringDirection::parse)
            .unwrap_or(MentoringDirection::Mutual),
        reason: reason(aspect),
    })
}

fn judgment_from_value(item: &Value, position: usize) -> Option<PairJudgment> {
    if !item.is_object() {
        return None;
    }
    Some(PairJudgment {
        pair: pair_index(item, position),
        complements: scored(item, "complements"),
        mentoring_fit: mentoring(item),
        team_synergy: scored(item, "team_synergy"),
    })
}
