//! Frontmatter document codec.
//!
//! A ticket document is a YAML metadata block between `---` delimiter lines
//! followed by markdown body text. Decoding never fails: a missing or
//! malformed block yields an empty metadata mapping and the full text as
//! body, so every file in a tickets directory stays representable and broken
//! metadata surfaces later as a missing-id issue instead of a read error.
use serde_yaml::{Mapping, Value};

/// One decoded document: metadata block plus raw body text.
///
/// The body is kept as stored (including the surrounding blank lines the
/// encoder writes); display-level trimming happens when a [`crate::ticket::Ticket`]
/// is derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub meta: Mapping,
    pub body: String,
}

/// Split a raw document into its metadata block and body.
pub fn decode(raw: &str) -> Document {
    let Some((front, body)) = split_frontmatter(raw) else {
        return Document {
            meta: Mapping::new(),
            body: raw.to_string(),
        };
    };
    match serde_yaml::from_str::<Mapping>(front) {
        Ok(meta) => Document {
            meta,
            body: body.to_string(),
        },
        // Malformed YAML is recovered as absent metadata; the original text
        // survives in the body so a later repair rewrites it losslessly.
        Err(_) => Document {
            meta: Mapping::new(),
            body: raw.to_string(),
        },
    }
}

/// Encode a metadata block and body back into document text.
///
/// The body is written with exactly one leading and one trailing newline
/// (an empty body collapses to a single blank line), so repeated
/// decode/encode cycles are stable.
pub fn encode(meta: &Mapping, body: &str) -> Result<String, serde_yaml::Error> {
    let yaml = if meta.is_empty() {
        String::new()
    } else {
        serde_yaml::to_string(meta)?
    };
    let body = body.trim();
    let mut out = String::with_capacity(yaml.len() + body.len() + 16);
    out.push_str("---\n");
    out.push_str(&yaml);
    out.push_str("---\n\n");
    if !body.is_empty() {
        out.push_str(body);
        out.push('\n');
    }
    Ok(out)
}

/// Read a string-valued metadata field, coercing scalars the way the
/// original store did (`title: 42` still lists as "42").
pub fn str_field(meta: &Mapping, key: &str) -> Option<String> {
    match meta.get(Value::String(key.to_string()))? {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Read the `id` field as a positive integer; absent, non-numeric, zero, or
/// negative values all read as 0 ("unassigned/corrupt").
pub fn id_field(meta: &Mapping) -> u64 {
    match meta.get(Value::String("id".to_string())) {
        Some(Value::Number(number)) => number.as_u64().unwrap_or(0),
        Some(Value::String(text)) => text.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}

/// Read the `tags` field as a list of strings; non-list or non-string
/// entries are dropped rather than treated as errors.
pub fn tags_field(meta: &Mapping) -> Vec<String> {
    match meta.get(Value::String("tags".to_string())) {
        Some(Value::Sequence(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

/// Read a boolean metadata flag (used for the `board: true` marker).
pub fn bool_field(meta: &Mapping, key: &str) -> bool {
    matches!(
        meta.get(Value::String(key.to_string())),
        Some(Value::Bool(true))
    )
}

/// Set a metadata field, replacing any existing value in place.
pub fn set_field(meta: &mut Mapping, key: &str, value: Value) {
    meta.insert(Value::String(key.to_string()), value);
}

fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
#[path = "frontmatter_tests.rs"]
mod tests;
