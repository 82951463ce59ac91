//! Pure field normalizers: each one accepts whatever shape the export
//! actually contains (string, sentinel, array, array-of-objects, null)
//! and returns a well-typed default instead of failing.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Upstream export marker for "value absent".
pub const SENTINEL: &str = "NA";

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Seniority tiers tested in order; the first match wins, so a
/// "Senior Director" resolves to `director`.
static SENIORITY_TIERS: LazyLock<[(&'static str, Regex); 7]> = LazyLock::new(|| {
    [
        (
            "cxo/founder",
            Regex::new(r"\b(ceo|cto|coo|cfo|founder|co-founder|owner)\b").unwrap(),
        ),
        ("vp", Regex::new(r"\b(vp|vice president)\b").unwrap()),
        ("director", Regex::new(r"\b(director)\b").unwrap()),
        ("lead/manager", Regex::new(r"\b(lead|manager|head|chief)\b").unwrap()),
        ("senior", Regex::new(r"\b(senior|sr\.)\b").unwrap()),
        ("mid", Regex::new(r"\b(mid|intermediate)\b").unwrap()),
        ("junior", Regex::new(r"\b(junior|jr\.)\b").unwrap()),
    ]
});

const EDUCATION_SIGNALS: &[(&str, &[&str])] = &[
    ("mba", &["mba", "master of business administration"]),
    ("iit", &["iit", "indian institute of technology"]),
    (
        "computer-science",
        &["computer science", "software engineering", "information technology"],
    ),
];

const EDUCATION_TEXT_FIELDS: &[&str] = &["campus", "major", "specialization", "degree"];

/// One entry of the raw `experience` array, resolved once at this
/// boundary so nothing downstream has to inspect JSON shapes.
#[derive(Debug)]
pub enum ExperienceEntry {
    /// Object form: company name (when present) plus headcount estimate.
    Named {
        name: Option<String>,
        headcount: Option<i64>,
    },
    /// Bare string form.
    Text(String),
    /// Anything else (null, sentinel, numbers, nested arrays).
    Unrecognized,
}

impl ExperienceEntry {
    pub fn resolve(value: &Value) -> Self {
        match value {
            Value::Object(entry) => ExperienceEntry::Named {
                name: entry
                    .get("name")
                    .and_then(Value::as_str)
                    .filter(|s| *s != SENTINEL)
                    .map(collapse_whitespace)
                    .filter(|s| !s.is_empty()),
                headcount: entry.get("estimated_num_employees").and_then(headcount),
            },
            Value::String(s) if s != SENTINEL && !s.trim().is_empty() => {
                ExperienceEntry::Text(collapse_whitespace(s))
            }
            _ => ExperienceEntry::Unrecognized,
        }
    }
}

/// Split a comma-separated expertise string into lowercase skill tokens,
/// deduplicated preserving first occurrence.
pub fn skills(expertise: Option<&str>) -> Vec<String> {
    let Some(expertise) = expertise.filter(|s| *s != SENTINEL) else {
        return Vec::new();
    };
    let mut skills = Vec::new();
    for token in expertise.split(',') {
        push_unique(&mut skills, token.trim().to_lowercase());
    }
    skills
}

/// Deduplicated employer names from an experience list. Non-array input
/// yields empty; each entry independently yields a name or is dropped.
pub fn past_employers(experience: Option<&Value>) -> Vec<String> {
    let mut employers = Vec::new();
    for item in array_items(experience) {
        match ExperienceEntry::resolve(item) {
            ExperienceEntry::Named { name: Some(name), .. } => push_unique(&mut employers, name),
            ExperienceEntry::Text(text) => push_unique(&mut employers, text),
            _ => {}
        }
    }
    employers
}

/// Company-size bucket labels covered by the experience list. Entries
/// with missing or non-numeric headcounts are skipped silently.
pub fn size_buckets(experience: Option<&Value>) -> Vec<String> {
    let mut buckets = Vec::new();
    for item in array_items(experience) {
        if let ExperienceEntry::Named { headcount: Some(n), .. } = ExperienceEntry::resolve(item) {
            if let Some(label) = bucket_label(n) {
                push_unique(&mut buckets, label.to_string());
            }
        }
    }
    buckets
}

/// Education signals detected by case-insensitive substring matching over
/// the concatenated campus/major/specialization/degree text per entry.
/// One entry can set several signals at once.
pub fn education_signals(education: Option<&Value>) -> Vec<String> {
    let mut signals = Vec::new();
    for entry in array_items(education) {
        let text = education_text(entry);
        if text.is_empty() {
            continue;
        }
        for (label, needles) in EDUCATION_SIGNALS {
            if needles.iter().any(|needle| text.contains(needle)) {
                push_unique(&mut signals, label.to_string());
            }
        }
    }
    signals
}

/// Guess a seniority label from title and summary, or `None` if no tier
/// pattern matches.
pub fn infer_seniority(title: Option<&str>, summary: Option<&str>) -> Option<&'static str> {
    let text = [title, summary]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty() && *s != SENTINEL)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if text.is_empty() {
        return None;
    }
    SENIORITY_TIERS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&text))
        .map(|(label, _)| *label)
}

/// Lowercased text of one education entry: object fields joined with a
/// space, or the bare string itself.
fn education_text(entry: &Value) -> String {
    let mut parts: Vec<String> = Vec::new();
    match entry {
        Value::Object(fields) => {
            for key in EDUCATION_TEXT_FIELDS {
                if let Some(text) = fields.get(*key).and_then(Value::as_str) {
                    if text != SENTINEL {
                        parts.push(text.to_lowercase());
                    }
                }
            }
        }
        Value::String(s) if s != SENTINEL => parts.push(s.to_lowercase()),
        _ => {}
    }
    parts.join(" ")
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

fn array_items(value: Option<&Value>) -> &[Value] {
    match value {
        Some(Value::Array(items)) => items,
        _ => &[],
    }
}

fn bucket_label(headcount: i64) -> Option<&'static str> {
    match headcount {
        0..=9 => Some("0-9"),
        10..=49 => Some("10-49"),
        50..=199 => Some("50-199"),
        200..=499 => Some("200-499"),
        500..=999 => Some("500-999"),
        1000..=4999 => Some("1000-4999"),
        n if n >= 5000 => Some("5000+"),
        _ => None,
    }
}

/// Headcounts arrive as JSON numbers or numeric strings; anything else
/// is treated as unknown.
fn headcount(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skills_dedup_casefold_trim() {
        assert_eq!(skills(Some("Go, go , PYTHON,python")), vec!["go", "python"]);
    }

    #[test]
    fn skills_drop_empties_and_sentinel() {
        assert_eq!(skills(Some(",, ,")), Vec::<String>::new());
        assert_eq!(skills(Some(SENTINEL)), Vec::<String>::new());
        assert_eq!(skills(None), Vec::<String>::new());
    }

    #[test]
    fn employers_mixed_shapes() {
        let experience = json!([
            { "name": "Acme   Corp" },
            "Initech",
            { "name": "NA" },
            "NA",
            null,
            42,
            { "estimated_num_employees": 10 },
            "Initech"
        ]);
        assert_eq!(
            past_employers(Some(&experience)),
            vec!["Acme Corp", "Initech"]
        );
    }

    #[test]
    fn employers_non_array_is_empty() {
        assert!(past_employers(Some(&json!("not a list"))).is_empty());
        assert!(past_employers(Some(&json!({ "name": "Acme" }))).is_empty());
        assert!(past_employers(None).is_empty());
    }

    #[test]
    fn size_buckets_boundaries() {
        let experience = json!([
            { "estimated_num_employees": 5 },
            { "estimated_num_employees": 12000 },
            { "estimated_num_employees": "NA" }
        ]);
        assert_eq!(size_buckets(Some(&experience)), vec!["0-9", "5000+"]);
    }

    #[test]
    fn size_buckets_numeric_strings_and_duplicates() {
        let experience = json!([
            { "estimated_num_employees": "250" },
            { "estimated_num_employees": 300 },
            { "estimated_num_employees": -3 },
            { "name": "no headcount" }
        ]);
        assert_eq!(size_buckets(Some(&experience)), vec!["200-499"]);
    }

    #[test]
    fn education_signals_from_object_fields() {
        let education = json!([
            { "campus": "IIT Delhi", "major": "Computer Science" },
            { "degree": "MBA" }
        ]);
        assert_eq!(
            education_signals(Some(&education)),
            vec!["iit", "computer-science", "mba"]
        );
    }

    #[test]
    fn education_signals_from_plain_strings() {
        let education = json!(["Master of Business Administration, IIM", "NA"]);
        assert_eq!(education_signals(Some(&education)), vec!["mba"]);
    }

    #[test]
    fn education_signals_ambiguous_text_sets_several() {
        // substring matching: "bombay" carries "mba", so one entry can
        // light up more than one signal, in declaration order
        let education = json!([{ "campus": "IIT Bombay" }]);
        assert_eq!(education_signals(Some(&education)), vec!["mba", "iit"]);
    }

    #[test]
    fn education_signals_ignore_sentinel_fields() {
        let education = json!([{ "campus": "NA", "major": "NA" }]);
        assert!(education_signals(Some(&education)).is_empty());
    }

    #[test]
    fn seniority_basic_tiers() {
        assert_eq!(infer_seniority(Some("Director of Engineering"), None), Some("director"));
        assert_eq!(infer_seniority(Some("VP of Sales"), None), Some("vp"));
        assert_eq!(infer_seniority(Some("Co-Founder"), None), Some("cxo/founder"));
        assert_eq!(infer_seniority(Some("Junior Developer"), None), Some("junior"));
    }

    #[test]
    fn seniority_precedence_director_over_senior() {
        assert_eq!(infer_seniority(Some("Senior Director"), None), Some("director"));
    }

    #[test]
    fn seniority_falls_back_to_summary() {
        assert_eq!(
            infer_seniority(None, Some("Engineering manager with 10 years experience")),
            Some("lead/manager")
        );
    }

    #[test]
    fn seniority_unknown_without_match() {
        assert_eq!(infer_seniority(Some("Software Engineer"), None), None);
        assert_eq!(infer_seniority(None, None), None);
        assert_eq!(infer_seniority(Some(SENTINEL), Some(SENTINEL)), None);
    }

    #[test]
    fn seniority_word_boundaries() {
        // "leader" must not match the "lead" tier
        assert_eq!(infer_seniority(Some("Thought Leadership"), None), None);
    }
}
