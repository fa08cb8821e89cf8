use crate::error::{Error, Result};
use crate::models::ReviewScore;

pub fn parse_review_score(response: &str) -> Result<ReviewScore> {
    let json_str = extract_json(response)?;

    let score: ReviewScore = serde_json::from_str(&json_str)
        .map_err(|e| Error::ParseError(format!("Failed to parse review score: {}", e)))?;

    if !score.is_valid() {
        return Err(Error::ParseError(format!(
            "score {} outside {}..={}",
            score.score,
            ReviewScore::MIN,
            ReviewScore::MAX
        )));
    }

    Ok(score)
}

/// Pulls the first balanced JSON object out of a model answer.
fn extract_json(text: &str) -> Result<String> {
    let text = strip_code_fence(text);
    let start = text
        .find('{')
        .ok_or_else(|| Error::ParseError("No JSON object found in response".to_string()))?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text[start..].char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Ok(text[start..=start + i].to_string());
                }
            }
            _ => {}
        }
    }

    Err(Error::ParseError("Unbalanced JSON object in response".to_string()))
}

/// Body of the first fenced block, or the whole text when there is none.
fn strip_code_fence(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after = &text[open + 3..];
    // Drop the language tag line, e.g. ```json
    let body = after.find('\n').map_or(after, |i| &after[i + 1..]);
    body.find("```").map_or(body, |close| &body[..close])
}
