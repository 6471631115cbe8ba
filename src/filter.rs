//! Note filter/sort engine.
//!
//! Pure functions over the fetched collections: the same inputs always give
//! the same ordering, and ties keep their input order.

use crate::models::{AnswersIndex, Note, NoteFilters, SortDirection, VersionsIndex};
use crate::notes::parse_timestamp;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

#[cfg(test)]
#[path = "filter_test.rs"]
mod filter_test;

/// The indexes the filters consult besides the notes themselves.
#[derive(Debug, Clone, Copy)]
pub struct FilterIndexes<'a> {
    pub answers: &'a AnswersIndex,
    pub versions: &'a VersionsIndex,
}

// ============================================================================
// Filtering
// ============================================================================

/// True when `note` passes every active filter.
pub fn matches_filters(note: &Note, filters: &NoteFilters, indexes: FilterIndexes<'_>) -> bool {
    if filters.has_content && !note.has_content() {
        return false;
    }

    if filters.has_analysis && !indexes.answers.contains(&note.id) {
        return false;
    }

    let versions = indexes
        .versions
        .get(&note.id)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    filters.version.admits(versions)
}

pub fn filter_notes<'a>(
    notes: &'a [Note],
    filters: &NoteFilters,
    indexes: FilterIndexes<'_>,
) -> Vec<&'a Note> {
    notes
        .iter()
        .filter(|note| matches_filters(note, filters, indexes))
        .collect()
}

// ============================================================================
// Sorting
// ============================================================================

/// Order by last-edited time. A missing timestamp counts as the smallest
/// value ascending and the largest descending, so those notes always lead.
fn compare_edited(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    direction: SortDirection,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => x.cmp(&y),
            SortDirection::Desc => y.cmp(&x),
        },
    }
}

/// Stable sort by last-edited time.
pub fn sort_notes(notes: &mut Vec<&Note>, direction: SortDirection) {
    let mut keyed: Vec<(Option<DateTime<Utc>>, &Note)> = notes
        .iter()
        .map(|note| {
            let edited = note.last_edited_time.as_deref().and_then(parse_timestamp);
            (edited, *note)
        })
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_edited(*a, *b, direction));

    notes.clear();
    notes.extend(keyed.into_iter().map(|(_, note)| note));
}

/// Filter then sort: the list the explorer shows.
pub fn process_notes<'a>(
    notes: &'a [Note],
    filters: &NoteFilters,
    indexes: FilterIndexes<'_>,
    direction: SortDirection,
) -> Vec<&'a Note> {
    let mut filtered = filter_notes(notes, filters, indexes);
    sort_notes(&mut filtered, direction);
    filtered
}
