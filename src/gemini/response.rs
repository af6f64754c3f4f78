use crate::error::{GuruError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A moral task handed out by the guru
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoralTask {
    pub task: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Positivity verdict for a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteVerification {
    pub is_positive: bool,
    #[serde(default)]
    pub categories: Vec<String>,
    pub reason: String,
}

/// Parse a moral task from the model's raw output
pub fn parse_moral_task(raw: &str) -> Result<MoralTask> {
    let value = parse_object(raw, "moral task")?;
    let obj = as_object(&value, "moral task")?;

    Ok(MoralTask {
        task: required_text(obj, "task")?,
        categories: categories(obj)?,
    })
}

/// Parse a quote verification from the model's raw output
pub fn parse_quote_verification(raw: &str) -> Result<QuoteVerification> {
    let value = parse_object(raw, "quote verification")?;
    let obj = as_object(&value, "quote verification")?;

    let is_positive = match obj.get("isPositive") {
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            return Err(malformed(format!(
                "field 'isPositive' must be a boolean, got {}",
                kind(other)
            )))
        }
        None => return Err(malformed("missing field 'isPositive'")),
    };

    Ok(QuoteVerification {
        is_positive,
        categories: categories(obj)?,
        reason: required_text(obj, "reason")?,
    })
}

fn parse_object(raw: &str, what: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(malformed(format!("empty {} response", what)));
    }

    let whole_err = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(body) = fenced_body(trimmed) {
        return serde_json::from_str(body)
            .map_err(|e| malformed(format!("invalid {} JSON: {}", what, e)));
    }

    // Models sometimes wrap the object in prose; take the first embedded object that parses
    if let Some(value) = embedded_object(trimmed) {
        return Ok(value);
    }

    Err(malformed(format!("invalid {} JSON: {}", what, whole_err)))
}

fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| malformed(format!("{} must be a JSON object, got {}", what, kind(value))))
}

fn required_text(obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(malformed(format!("field '{}' is empty", field))),
        Some(other) => Err(malformed(format!(
            "field '{}' must be a string, got {}",
            field,
            kind(other)
        ))),
        None => Err(malformed(format!("missing field '{}'", field))),
    }
}

/// Categories are optional; when present they must be strings.
/// Blank entries are dropped and case-insensitive duplicates collapse to the first.
fn categories(obj: &Map<String, Value>) -> Result<Vec<String>> {
    let items = match obj.get("categories") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(malformed(format!(
                "field 'categories' must be an array, got {}",
                kind(other)
            )))
        }
    };

    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let s = item.as_str().ok_or_else(|| {
            malformed(format!("categories[{}] must be a string, got {}", i, kind(item)))
        })?;
        let s = s.trim();
        if s.is_empty() || out.iter().any(|c| c.eq_ignore_ascii_case(s)) {
            continue;
        }
        out.push(s.to_string());
    }
    Ok(out)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn malformed(message: impl Into<String>) -> GuruError {
    GuruError::MalformedResponse(message.into())
}

/// Body of a markdown code block that opens the response, without its language tag
fn fenced_body(trimmed: &str) -> Option<&str> {
    let after = trimmed.strip_prefix("```")?;
    let rest = &after[after.find('\n')? + 1..];
    let end = rest.rfind("```")?;
    Some(rest[..end].trim())
}

fn embedded_object(text: &str) -> Option<Value> {
    text.match_indices('{')
        .filter_map(|(start, _)| balanced_object(&text[start..]))
        .find_map(|candidate| serde_json::from_str::<Value>(candidate).ok().filter(Value::is_object))
}

/// Slice of `text` up to the brace closing its leading `{`, ignoring braces inside strings
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
