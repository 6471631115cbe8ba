//! Note explorer library - re-exports for testing and external use.
//!
//! The explorer is a viewer over an external Notes API: it fetches notes and
//! their LLM analyses, filters and sorts the note list, and renders each note
//! next to its question/answer pairs for every question-set version.

use std::sync::RwLock;

pub mod api;
pub mod catalog;
pub mod explorer;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod notes;
pub mod templates;
pub mod versions;

use api::NotesApi;
use explorer::ExplorerHandle;

// ============================================================================
// Configuration
// ============================================================================

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the Notes API, without a trailing slash
    pub api_url: String,
    pub bind_addr: String,
}

impl Config {
    /// Read `NOTES_API_URL` and `EXPLORER_ADDR`, falling back to the local
    /// defaults. An unusable API URL is logged and replaced by the default.
    pub fn from_env() -> Self {
        let api_url = match std::env::var("NOTES_API_URL") {
            Ok(raw) => validate_api_url(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring NOTES_API_URL ({}), using {}", e, DEFAULT_API_URL);
                DEFAULT_API_URL.to_string()
            }),
            Err(_) => DEFAULT_API_URL.to_string(),
        };

        let bind_addr =
            std::env::var("EXPLORER_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        Self { api_url, bind_addr }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Check that `raw` is an absolute http(s) URL and strip any trailing slash.
pub fn validate_api_url(raw: &str) -> Result<String, String> {
    let parsed = url::Url::parse(raw.trim()).map_err(|e| format!("Invalid URL: {}", e))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("Unsupported scheme: {}", other)),
    }
    if parsed.host_str().is_none() {
        return Err("URL has no host".to_string());
    }

    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub config: Config,
    pub api: NotesApi,
    explorer: RwLock<ExplorerHandle>,
}

impl AppState {
    /// Build the state and mount the explorer. Must run inside a tokio runtime.
    pub fn new(config: Config) -> Self {
        let api = NotesApi::new(&config.api_url);
        let explorer = explorer::mount(&api);

        Self {
            config,
            api,
            explorer: RwLock::new(explorer),
        }
    }

    /// The currently mounted explorer.
    pub fn explorer(&self) -> ExplorerHandle {
        match self.explorer.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drop the mounted explorer and start over with fresh fetches.
    pub fn remount(&self) {
        let fresh = explorer::mount(&self.api);
        match self.explorer.write() {
            Ok(mut guard) => *guard = fresh,
            Err(poisoned) => *poisoned.into_inner() = fresh,
        }
    }
}

// Re-export commonly used types
pub use models::{
    AnswerRecord, AnswerRow, AnswersIndex, CatalogSource, DisplayVersion, Note, NoteDetail,
    NoteFilters, NoteSummary, QuestionCatalog, SortDirection, VersionFilter, VersionsIndex,
    ViewSettings, ViewTab,
};

pub use api::ApiError;

pub use catalog::{bundled_catalog, fetch_remote_catalog, infer_latest, load_catalog};

pub use explorer::{select_and_fetch, ExplorerState, SelectionTicket};

pub use filter::{filter_notes, matches_filters, process_notes, sort_notes, FilterIndexes};

pub use notes::{format_date, html_escape, note_title, parse_timestamp, render_markdown};

pub use versions::{
    answer_rows, question_index, resolve_question, same_version, version_number,
    versions_to_display, QUESTION_NOT_FOUND, UNKNOWN_QUESTION,
};
