//! Record cleaning: sentinel scrub, required-field enforcement, and
//! stable ID derivation for one raw export line.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::normalize::SENTINEL;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9-]").unwrap());

/// Soft rejection: the record is skipped with a warning, not counted as
/// an ingestion error.
#[derive(Debug, Error)]
#[error("line {line}: missing required field '{field}'")]
pub struct MissingRequiredField {
    pub line: u64,
    pub field: &'static str,
}

/// A raw record with every sentinel rewritten to an explicit absent
/// value. The sentinel string never survives past this type.
#[derive(Debug)]
pub struct CleanedRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub functional_area: Option<String>,
    pub current_industry: Option<String>,
    pub linkedin_url: Option<String>,
    pub expertise: Option<String>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
}

/// Convert one parsed line into a `CleanedRecord`, rejecting records
/// without a usable `first_name`/`last_name` pair.
pub fn clean(raw: Value, line: u64) -> Result<CleanedRecord, MissingRequiredField> {
    let mut fields = match raw {
        Value::Object(map) => map,
        _ => return Err(MissingRequiredField { line, field: "first_name" }),
    };

    for field in ["first_name", "last_name"] {
        if !has_required(&fields, field) {
            return Err(MissingRequiredField { line, field });
        }
    }

    scrub_sentinels(&mut fields);

    // Names that were the sentinel are now null; keep the record but
    // fall back to a placeholder so name_full stays well-formed.
    let first_name = take_string(&mut fields, "first_name").unwrap_or_else(|| "unknown".into());
    let last_name = take_string(&mut fields, "last_name").unwrap_or_else(|| "unknown".into());
    let linkedin_url = take_string(&mut fields, "linkedin_url");

    let id = match take_string(&mut fields, "id") {
        Some(supplied) => slugify(&supplied),
        None => slugify(&format!(
            "{}-{}-{}",
            first_name,
            last_name,
            linkedin_url.as_deref().unwrap_or(&line.to_string())
        )),
    };

    Ok(CleanedRecord {
        id,
        first_name,
        last_name,
        title: take_string(&mut fields, "title"),
        summary: take_string(&mut fields, "summary"),
        country: take_string(&mut fields, "country"),
        city: take_string(&mut fields, "city"),
        functional_area: take_string(&mut fields, "functional_area"),
        current_industry: take_string(&mut fields, "current_industry"),
        expertise: take_string(&mut fields, "expertise"),
        experience: take_value(&mut fields, "experience"),
        education: take_value(&mut fields, "education"),
        linkedin_url,
    })
}

/// Required fields must be present and non-empty; the sentinel counts as
/// present here and is scrubbed afterwards.
fn has_required(fields: &Map<String, Value>, key: &str) -> bool {
    match fields.get(key) {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

/// Rewrite every top-level `"NA"` / `["NA"]` field to null.
fn scrub_sentinels(fields: &mut Map<String, Value>) {
    for value in fields.values_mut() {
        if is_sentinel(value) {
            *value = Value::Null;
        }
    }
}

fn is_sentinel(value: &Value) -> bool {
    match value {
        Value::String(s) => s == SENTINEL,
        Value::Array(items) => {
            matches!(items.as_slice(), [Value::String(s)] if s == SENTINEL)
        }
        _ => false,
    }
}

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn take_value(fields: &mut Map<String, Value>, key: &str) -> Option<Value> {
    match fields.remove(key) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value),
    }
}

/// Lowercase and map every character outside `[a-z0-9-]` to `-`, so the
/// same inputs always derive the same ID.
fn slugify(raw: &str) -> String {
    NON_SLUG_RE.replace_all(&raw.to_lowercase(), "-").into_owned()
}

// ── Tests ──
