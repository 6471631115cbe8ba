//! Question-set versions: naming, ordering, and resolving answer keys to the
//! question text of the version they were produced under.

use crate::models::{AnswerRecord, AnswerRow, DisplayVersion, QuestionCatalog, VersionFilter};
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

pub const QUESTION_NOT_FOUND: &str = "Question not found";
pub const UNKNOWN_QUESTION: &str = "Unknown question";

static QUESTION_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^q(\d+)$").expect("question key pattern"));

// ============================================================================
// Version Names
// ============================================================================

/// Version name without its `v` prefix: `"v2"` and `"2"` both give `"2"`.
pub fn canonical_version(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
}

pub fn same_version(a: &str, b: &str) -> bool {
    canonical_version(a) == canonical_version(b)
}

/// Trailing number of a version name (`"v12"` -> 12).
pub fn version_number(version: &str) -> Option<u32> {
    let trimmed = version.trim();
    let prefix = trimmed.trim_end_matches(|c: char| c.is_ascii_digit());
    trimmed[prefix.len()..].parse().ok()
}

/// Newest first. Versions without a number sort after numbered ones, by name.
pub fn compare_versions_desc(a: &str, b: &str) -> Ordering {
    match (version_number(a), version_number(b)) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

// ============================================================================
// Question Keys
// ============================================================================

/// 1-based question number of a key like `q3`.
pub fn question_number(key: &str) -> Option<usize> {
    let caps = QUESTION_KEY.captures(key.trim())?;
    caps.get(1)?.as_str().parse().ok()
}

/// Zero-based index into a version's question list.
pub fn question_index(key: &str) -> Option<usize> {
    question_number(key)?.checked_sub(1)
}

/// Question text for `key` under `version`.
///
/// Keys that don't parse and records without a version give
/// [`UNKNOWN_QUESTION`]; a version the catalog lacks or an index past the end
/// of its list gives [`QUESTION_NOT_FOUND`].
pub fn resolve_question<'a>(catalog: &'a QuestionCatalog, key: &str, version: &str) -> &'a str {
    if version.trim().is_empty() {
        return UNKNOWN_QUESTION;
    }
    let Some(number) = question_number(key) else {
        return UNKNOWN_QUESTION;
    };

    let questions = catalog.questions_for(version).unwrap_or(&[]);
    number
        .checked_sub(1)
        .and_then(|i| questions.get(i))
        .map(String::as_str)
        .unwrap_or(QUESTION_NOT_FOUND)
}

fn answer_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "N/A".to_string(),
        other => other.to_string(),
    }
}

/// Rows for one record, ordered by question number. Keys that don't parse go
/// last, in key order.
pub fn answer_rows(record: &AnswerRecord, catalog: &QuestionCatalog) -> Vec<AnswerRow> {
    let mut entries: Vec<(Option<usize>, &String, &serde_json::Value)> = record
        .answers_json
        .iter()
        .map(|(key, value)| (question_number(key), key, value))
        .collect();
    entries.sort_by(|(x, a, _), (y, b, _)| match (x, y) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    });

    entries
        .into_iter()
        .map(|(_, key, value)| AnswerRow {
            key: key.clone(),
            question: resolve_question(catalog, key, &record.questions_version).to_string(),
            answer: answer_text(value),
        })
        .collect()
}

// ============================================================================
// Versions to Display
// ============================================================================

/// Versions to render for the selected note.
///
/// - `Any`: every version the note has a record for, newest first.
/// - `AnyOf`: the versions the note has a record for that are also selected.
/// - `Single`: exactly the selected version, even with no record for it.
pub fn versions_to_display(records: &[AnswerRecord], filter: &VersionFilter) -> Vec<DisplayVersion> {
    if let VersionFilter::Single(wanted) = filter {
        return vec![DisplayVersion {
            version: wanted.clone(),
            records: records
                .iter()
                .filter(|r| same_version(&r.questions_version, wanted))
                .cloned()
                .collect(),
        }];
    }

    let mut grouped: Vec<DisplayVersion> = Vec::new();
    for record in records {
        if !filter.admits(std::slice::from_ref(&record.questions_version)) {
            continue;
        }
        match grouped
            .iter_mut()
            .find(|d| same_version(&d.version, &record.questions_version))
        {
            Some(existing) => existing.records.push(record.clone()),
            None => grouped.push(DisplayVersion {
                version: record.questions_version.clone(),
                records: vec![record.clone()],
            }),
        }
    }

    grouped.sort_by(|a, b| compare_versions_desc(&a.version, &b.version));
    grouped
}
