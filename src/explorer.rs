//! Explorer view-model.
//!
//! `ExplorerState` holds everything one viewer has loaded plus the current
//! view settings and selection. It is created on mount, mutated by request
//! handlers, and dropped on re-mount. Backend results arrive independently
//! and in any order; each one is committed on its own and every projection
//! tolerates the others being absent.

use crate::api::{ApiError, NotesApi};
use crate::catalog::load_catalog;
use crate::filter::{process_notes, FilterIndexes};
use crate::models::{
    AnswerRecord, AnswersIndex, Note, NoteDetail, NoteSummary, QuestionCatalog,
    ResolvedRecord, ResolvedVersion, ViewSettings, VersionsIndex,
};
use crate::notes::note_title;
use crate::versions::{answer_rows, versions_to_display};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub type ExplorerHandle = Arc<Mutex<ExplorerState>>;

pub fn lock(handle: &ExplorerHandle) -> MutexGuard<'_, ExplorerState> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Selection
// ============================================================================

/// Identifies one answers fetch. A response commits only if its ticket still
/// matches the current selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionTicket {
    pub note_id: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
struct Selection {
    ticket: SelectionTicket,
    answers: Vec<AnswerRecord>,
    pending: bool,
    loaded: bool,
}

// ============================================================================
// State
// ============================================================================

#[derive(Debug, Default)]
pub struct ExplorerState {
    notes: Option<Vec<Note>>,
    answers_index: Option<AnswersIndex>,
    versions_index: Option<VersionsIndex>,
    catalog: Option<QuestionCatalog>,
    view: ViewSettings,
    selection: Option<Selection>,
    generation: u64,
}

fn report_failure(what: &str, err: &ApiError) {
    log::warn!("[Explorer] Failed to load {}: {}", what, err);
}

impl ExplorerState {
    pub fn new() -> Self {
        Self::default()
    }

    // --- source data -------------------------------------------------------

    pub fn apply_notes(&mut self, result: Result<Vec<Note>, ApiError>) {
        match result {
            Ok(notes) => {
                log::info!("[Explorer] Loaded {} notes", notes.len());
                self.notes = Some(notes);
            }
            Err(e) => report_failure("notes", &e),
        }
    }

    pub fn apply_answers_index(&mut self, result: Result<AnswersIndex, ApiError>) {
        match result {
            Ok(index) => self.answers_index = Some(index),
            Err(e) => report_failure("answers index", &e),
        }
    }

    pub fn apply_versions_index(&mut self, result: Result<VersionsIndex, ApiError>) {
        match result {
            Ok(index) => self.versions_index = Some(index),
            Err(e) => report_failure("note versions index", &e),
        }
    }

    pub fn apply_catalog(&mut self, catalog: QuestionCatalog) {
        self.catalog = Some(catalog);
    }

    pub fn notes_loaded(&self) -> bool {
        self.notes.is_some()
    }

    pub fn catalog(&self) -> Option<&QuestionCatalog> {
        self.catalog.as_ref()
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.as_deref()?.iter().find(|n| n.id == id)
    }

    pub fn is_analyzed(&self, id: &str) -> bool {
        self.answers_index
            .as_ref()
            .map(|index| index.contains(id))
            .unwrap_or(false)
    }

    // --- view settings -----------------------------------------------------

    pub fn view(&self) -> &ViewSettings {
        &self.view
    }

    pub fn set_view(&mut self, view: ViewSettings) {
        self.view = view;
    }

    // --- selection ---------------------------------------------------------

    /// Select a note. Returns a ticket when a fresh answers fetch is needed.
    /// Re-selecting the current note reuses answers that loaded or are still
    /// in flight; a failed fetch is retried.
    pub fn select_note(&mut self, note_id: &str) -> Option<SelectionTicket> {
        if let Some(current) = &self.selection {
            if current.ticket.note_id == note_id && (current.pending || current.loaded) {
                return None;
            }
        }

        self.generation += 1;
        let ticket = SelectionTicket {
            note_id: note_id.to_string(),
            generation: self.generation,
        };
        self.selection = Some(Selection {
            ticket: ticket.clone(),
            answers: Vec::new(),
            pending: true,
            loaded: false,
        });
        Some(ticket)
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selection.as_ref().map(|s| s.ticket.note_id.as_str())
    }

    pub fn answers_pending(&self) -> bool {
        self.selection.as_ref().map(|s| s.pending).unwrap_or(false)
    }

    /// Commit an answers response. Returns false, leaving state untouched,
    /// when the selection has moved on since the ticket was issued.
    pub fn commit_answers(
        &mut self,
        ticket: &SelectionTicket,
        result: Result<Vec<AnswerRecord>, ApiError>,
    ) -> bool {
        let Some(selection) = self.selection.as_mut() else {
            log::debug!("[Explorer] Dropping answers for {}: nothing selected", ticket.note_id);
            return false;
        };
        if selection.ticket != *ticket {
            log::debug!(
                "[Explorer] Dropping stale answers for {} (selected: {})",
                ticket.note_id,
                selection.ticket.note_id
            );
            return false;
        }

        selection.pending = false;
        match result {
            Ok(records) => {
                selection.answers = records;
                selection.loaded = true;
            }
            Err(e) => report_failure(&format!("answers for {}", ticket.note_id), &e),
        }
        true
    }

    pub fn selected_answers(&self) -> &[AnswerRecord] {
        self.selection
            .as_ref()
            .map(|s| s.answers.as_slice())
            .unwrap_or(&[])
    }

    // --- projections -------------------------------------------------------

    /// Notes matching `view`, in display order.
    pub fn visible_notes_for(&self, view: &ViewSettings) -> Vec<&Note> {
        let empty_answers = AnswersIndex::new();
        let empty_versions = VersionsIndex::new();
        let indexes = FilterIndexes {
            answers: self.answers_index.as_ref().unwrap_or(&empty_answers),
            versions: self.versions_index.as_ref().unwrap_or(&empty_versions),
        };
        let notes = self.notes.as_deref().unwrap_or(&[]);
        process_notes(notes, &view.filters, indexes, view.sort)
    }

    pub fn visible_notes(&self) -> Vec<&Note> {
        self.visible_notes_for(&self.view)
    }

    pub fn summaries_for(&self, view: &ViewSettings) -> Vec<NoteSummary> {
        self.visible_notes_for(view)
            .into_iter()
            .map(|note| NoteSummary {
                id: note.id.clone(),
                title: note_title(note.content.as_deref()),
                last_edited_time: note.last_edited_time.clone(),
                analyzed: self.is_analyzed(&note.id),
            })
            .collect()
    }

    /// Selected note with its analysis resolved against the catalog. `None`
    /// when nothing is selected or the selected id is not among the notes.
    pub fn selected_detail(&self) -> Option<NoteDetail> {
        self.note_detail(self.selected_id()?)
    }

    /// Detail for `note_id`. Answers held for the current selection are used
    /// only when `note_id` is that selection; any other note gets none, so a
    /// page never shows another note's analysis.
    pub fn note_detail(&self, note_id: &str) -> Option<NoteDetail> {
        let note = self.note(note_id)?;
        let answers: &[AnswerRecord] = if self.selected_id() == Some(note_id) {
            self.selected_answers()
        } else {
            &[]
        };

        let versions = match &self.catalog {
            Some(catalog) => versions_to_display(answers, &self.view.filters.version)
                .into_iter()
                .map(|display| ResolvedVersion {
                    latest: catalog.is_latest(&display.version),
                    records: display
                        .records
                        .iter()
                        .map(|record| ResolvedRecord {
                            model: record.model.clone(),
                            date_executed: record.date_executed.clone(),
                            rows: answer_rows(record, catalog),
                        })
                        .collect(),
                    version: display.version,
                })
                .collect(),
            None => Vec::new(),
        };

        Some(NoteDetail {
            note: note.clone(),
            title: note_title(note.content.as_deref()),
            analyzed: self.is_analyzed(&note.id),
            questions_loading: self.catalog.is_none(),
            versions,
        })
    }
}

// ============================================================================
// Mounting and Fetching
// ============================================================================

/// Create a fresh state and start the four source fetches. Each task commits
/// into the state it was spawned for, so tasks outliving a re-mount write
/// into a dropped state and are harmless.
pub fn mount(api: &NotesApi) -> ExplorerHandle {
    let handle: ExplorerHandle = Arc::new(Mutex::new(ExplorerState::new()));
    log::info!("[Explorer] Mounting against {}", api.base_url());

    {
        let api = api.clone();
        let handle = handle.clone();
        tokio::spawn(async move {
            let result = api.notes().await;
            lock(&handle).apply_notes(result);
        });
    }
    {
        let api = api.clone();
        let handle = handle.clone();
        tokio::spawn(async move {
            let result = api.answers_index().await;
            lock(&handle).apply_answers_index(result);
        });
    }
    {
        let api = api.clone();
        let handle = handle.clone();
        tokio::spawn(async move {
            let result = api.note_versions_index().await;
            lock(&handle).apply_versions_index(result);
        });
    }
    {
        let api = api.clone();
        let handle = handle.clone();
        tokio::spawn(async move {
            let catalog = load_catalog(&api).await;
            lock(&handle).apply_catalog(catalog);
        });
    }

    handle
}

/// Make `note_id` the selection, fetching its answers when needed.
///
/// The fetch runs on its own task so the commit lands even if the caller is
/// dropped mid-request.
pub async fn select_and_fetch(api: &NotesApi, handle: &ExplorerHandle, note_id: Option<&str>) {
    let ticket = {
        let mut state = lock(handle);
        match note_id {
            Some(id) => state.select_note(id),
            None => {
                state.clear_selection();
                None
            }
        }
    };

    if let Some(ticket) = ticket {
        let api = api.clone();
        let handle = handle.clone();
        let task = tokio::spawn(async move {
            let result = api.answers(&ticket.note_id).await;
            lock(&handle).commit_answers(&ticket, result);
        });
        if let Err(e) = task.await {
            log::warn!("[Explorer] Answers task failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::bundled_catalog;
    use crate::models::{NoteFilters, SortDirection, VersionFilter};
    use serde_json::json;
    use std::io::Write;

    fn note(id: &str, content: &str, edited: &str) -> Note {
        Note {
            id: id.to_string(),
            content: Some(content.to_string()),
            created_time: None,
            last_edited_time: Some(edited.to_string()),
            parent_id: None,
        }
    }

    fn record(version: &str) -> AnswerRecord {
        AnswerRecord {
            note_id: None,
            questions_version: version.to_string(),
            model: "gemini".to_string(),
            date_executed: None,
            answers_json: json!({"q1": "x", "q2": "y"})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn loaded() -> ExplorerState {
        let mut state = ExplorerState::new();
        state.apply_notes(Ok(vec![
            note("a", "", "2024-01-01"),
            note("b", "# Hello", "2024-02-01"),
        ]));
        state.apply_answers_index(Ok(["b".to_string()].into_iter().collect()));
        state
    }

    #[test]
    fn test_projections_before_anything_loads() {
        let state = ExplorerState::new();
        assert!(state.visible_notes().is_empty());
        assert!(state.selected_detail().is_none());
        assert!(!state.is_analyzed("b"));
    }

    #[test]
    fn test_indexes_may_arrive_before_notes() {
        let mut state = ExplorerState::new();
        state.apply_versions_index(Ok(
            [("b".to_string(), vec!["v2".to_string()])].into_iter().collect()
        ));
        state.set_view(ViewSettings {
            filters: NoteFilters {
                version: VersionFilter::Single("v2".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });
        assert!(state.visible_notes().is_empty());

        state.apply_notes(Ok(vec![note("a", "x", "2024-01-01"), note("b", "y", "2024-01-02")]));
        let ids: Vec<&str> = state.visible_notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_failed_fetch_keeps_prior_value() {
        let mut state = loaded();
        state.apply_notes(Err(ApiError::Request("refused".to_string())));
        assert!(state.notes_loaded());
        assert_eq!(state.visible_notes().len(), 2);
    }

    #[test]
    fn test_default_view_is_newest_first() {
        let state = loaded();
        let ids: Vec<&str> = state.visible_notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);

        let asc = ViewSettings {
            sort: SortDirection::Asc,
            ..Default::default()
        };
        let summaries = state.summaries_for(&asc);
        assert_eq!(summaries[0].title, "Untitled");
        assert_eq!(summaries[1].title, "Hello");
        assert!(summaries[1].analyzed);
    }

    #[test]
    fn test_stale_answers_do_not_overwrite_newer_selection() {
        let mut state = loaded();
        let first = state.select_note("a").unwrap();
        let second = state.select_note("b").unwrap();

        assert!(state.commit_answers(&second, Ok(vec![record("v2")])));
        assert!(!state.commit_answers(&first, Ok(vec![record("v1"), record("v3")])));

        assert_eq!(state.selected_id(), Some("b"));
        assert_eq!(state.selected_answers().len(), 1);
        assert_eq!(state.selected_answers()[0].questions_version, "v2");
    }

    #[test]
    fn test_reselecting_a_note_after_switching_refetches() {
        let mut state = loaded();
        let first = state.select_note("a").unwrap();
        state.select_note("b");
        let again = state.select_note("a").unwrap();
        assert_eq!(again.note_id, first.note_id);
        assert_ne!(again.generation, first.generation);
        assert!(!state.commit_answers(&first, Ok(vec![record("v1")])));
        assert!(state.answers_pending());
    }

    #[test]
    fn test_same_selection_reuses_answers() {
        let mut state = loaded();
        let ticket = state.select_note("b").unwrap();
        state.commit_answers(&ticket, Ok(vec![record("v2")]));
        assert!(state.select_note("b").is_none());
        assert_eq!(state.selected_answers().len(), 1);
    }

    #[test]
    fn test_failed_answers_fetch_settles_empty() {
        let mut state = loaded();
        let ticket = state.select_note("b").unwrap();
        assert!(state.commit_answers(&ticket, Err(ApiError::Status {
            url: "http://localhost:8000/answers/b".to_string(),
            status: 500,
        })));
        assert!(!state.answers_pending());
        assert!(state.selected_answers().is_empty());
    }

    #[test]
    fn test_selected_detail_resolves_questions() {
        let mut state = loaded();
        let ticket = state.select_note("b").unwrap();
        state.commit_answers(&ticket, Ok(vec![record("v2"), record("v3")]));

        let pending = state.selected_detail().unwrap();
        assert!(pending.questions_loading);
        assert!(pending.versions.is_empty());

        state.apply_catalog(bundled_catalog());
        let detail = state.selected_detail().unwrap();
        assert_eq!(detail.title, "Hello");
        assert!(detail.analyzed);
        let versions: Vec<&str> = detail.versions.iter().map(|v| v.version.as_str()).collect();
        assert_eq!(versions, vec!["v3", "v2"]);
        assert!(detail.versions[0].latest);
        assert_eq!(
            detail.versions[1].records[0].rows[0].question,
            "What experiences triggered positive emotional responses?"
        );
    }

    #[test]
    fn test_failed_answers_are_refetched_on_reselect() {
        let mut state = loaded();
        let first = state.select_note("b").unwrap();
        assert!(state.select_note("b").is_none());

        state.commit_answers(&first, Err(ApiError::Request("refused".to_string())));
        let retry = state.select_note("b").unwrap();
        assert_ne!(retry.generation, first.generation);
        assert!(state.answers_pending());
    }

    #[test]
    fn test_note_detail_ignores_other_selection() {
        let mut state = loaded();
        state.apply_catalog(bundled_catalog());
        let ticket = state.select_note("b").unwrap();
        state.commit_answers(&ticket, Ok(vec![record("v2")]));

        let other = state.note_detail("a").unwrap();
        assert_eq!(other.note.id, "a");
        assert!(other.versions.is_empty());
        assert_eq!(state.note_detail("b").unwrap().versions.len(), 1);
        assert!(state.note_detail("missing").is_none());
    }

    #[tokio::test]
    async fn test_answers_commit_after_caller_is_dropped() {
        let mut server = mockito::Server::new_async().await;
        let _answers = server
            .mock("GET", "/answers/b")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(|w| {
                std::thread::sleep(std::time::Duration::from_millis(300));
                w.write_all(br#"[{"questions_version": "v2", "model": "gemini", "answers_json": {"q1": "x"}}]"#)
            })
            .create_async()
            .await;

        let api = NotesApi::new(&server.url());
        let handle: ExplorerHandle = Arc::new(Mutex::new(loaded()));

        let cut_short = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            select_and_fetch(&api, &handle, Some("b")),
        )
        .await;
        assert!(cut_short.is_err());
        assert!(lock(&handle).answers_pending());

        for _ in 0..100 {
            if !lock(&handle).answers_pending() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        let state = lock(&handle);
        assert!(!state.answers_pending());
        assert_eq!(state.selected_answers().len(), 1);
    }

    #[test]
    fn test_clear_selection_rejects_late_answers() {
        let mut state = loaded();
        let ticket = state.select_note("a").unwrap();
        state.clear_selection();
        assert!(!state.commit_answers(&ticket, Ok(vec![record("v1")])));
        assert!(state.selected_id().is_none());
    }
}
