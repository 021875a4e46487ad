//! Strict parsing of model replies into oracle records

use serde::Deserialize;
use serde_json::Value;

use shared::{CritiqueResponse, PerspectiveResponse};
use crate::error::{OracleError, OracleResult};

/// Return the first balanced `{...}` in `text` that is a JSON object
///
/// Every `{` is tried in turn, so braces in surrounding prose do not hide a
/// valid object further on.
pub fn extract_json_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .filter_map(|(start, _)| balanced_prefix(&text[start..]))
        .find(|candidate| matches!(serde_json::from_str::<Value>(candidate), Ok(Value::Object(_))))
}

/// The balanced `{...}` prefix of `text`, skipping braces inside strings
fn balanced_prefix(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

fn parse_object(text: &str) -> OracleResult<Value> {
    let raw = extract_json_object(text)
        .ok_or_else(|| OracleError::malformed(format!("no JSON object in reply: {}", preview(text))))?;

    serde_json::from_str(raw).map_err(|e| OracleError::malformed(format!("invalid JSON object: {e}")))
}

/// Parse a selector reply. Scores must be integral and in range.
pub fn parse_selector_reply(text: &str) -> OracleResult<PerspectiveResponse> {
    let value = parse_object(text)?;

    let score = match value.get("score") {
        Some(Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i,
            (None, Some(f)) if f.fract() == 0.0 => f as i64,
            _ => return Err(OracleError::malformed(format!("score is not an integer: {n}"))),
        },
        Some(other) => return Err(OracleError::malformed(format!("score is not a number: {other}"))),
        None => return Err(OracleError::malformed("missing field 'score'")),
    };

    let reasoning = value
        .get("reasoning")
        .and_then(Value::as_str)
        .ok_or_else(|| OracleError::malformed("missing or non-string field 'reasoning'"))?;

    let confidence = value
        .get("confidence")
        .and_then(Value::as_f64)
        .ok_or_else(|| OracleError::malformed("missing or non-numeric field 'confidence'"))?;

    Ok(PerspectiveResponse::new(score, reasoning, confidence)?)
}

#[derive(Deserialize)]
struct RawCritique {
    #[serde(alias = "accepted")]
    is_valid: bool,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    issues: Vec<String>,
}

/// Parse a validator reply (`is_valid`, or its alias `accepted`, is required)
pub fn parse_validator_reply(text: &str) -> OracleResult<CritiqueResponse> {
    let value = parse_object(text)?;
    let raw: RawCritique = serde_json::from_value(value)
        .map_err(|e| OracleError::malformed(format!("unexpected validator reply: {e}")))?;

    Ok(CritiqueResponse {
        accepted: raw.is_valid,
        feedback: raw.feedback,
        issues: raw.issues,
    })
}

fn preview(text: &str) -> String {
    let mut shown: String = text.chars().take(80).collect();
    if text.chars().count() > 80 {
        shown.push_str("...");
    }
    shown
}
