//! Assembles the flat search document the store indexes.

use serde::Serialize;
use serde_json::Value;

use crate::normalize;
use crate::record::CleanedRecord;

/// The shape submitted to the people collection. `experience` and
/// `education` keep their nested structure only as opaque JSON text;
/// the store has no nested fields for them.
#[derive(Debug, Clone, Serialize)]
pub struct PersonDocument {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub name_full: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functional_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    pub skills: Vec<String>,
    pub past_employers: Vec<String>,
    pub size_buckets: Vec<String>,
    pub education_signals: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seniority_guess: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<String>,
}

/// Combine the cleaned record with all derived signals. No error paths:
/// malformed nested fields just yield empty signals.
pub fn assemble(record: CleanedRecord) -> PersonDocument {
    let skills = normalize::skills(record.expertise.as_deref());
    let past_employers = normalize::past_employers(record.experience.as_ref());
    let size_buckets = normalize::size_buckets(record.experience.as_ref());
    let education_signals = normalize::education_signals(record.education.as_ref());
    let seniority_guess =
        normalize::infer_seniority(record.title.as_deref(), record.summary.as_deref())
            .map(str::to_owned);

    PersonDocument {
        name_full: format!("{} {}", record.first_name, record.last_name),
        experience: record.experience.as_ref().map(Value::to_string),
        education: record.education.as_ref().map(Value::to_string),
        id: record.id,
        first_name: record.first_name,
        last_name: record.last_name,
        title: record.title,
        summary: record.summary,
        country: record.country,
        city: record.city,
        functional_area: record.functional_area,
        current_industry: record.current_industry,
        linkedin_url: record.linkedin_url,
        skills,
        past_employers,
        size_buckets,
        education_signals,
        seniority_guess,
    }
}

// ── Tests ──
