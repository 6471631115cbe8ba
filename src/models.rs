//! Data models for the note explorer.
//!
//! This module contains the wire types returned by the Notes API, the question
//! catalog, and the view-state types derived from user input (filters, sort
//! direction, display tab) together with the projections rendered from them.

use crate::versions::{compare_versions_desc, same_version};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Note {
    /// True when the note has content that is not just whitespace.
    pub fn has_content(&self) -> bool {
        self.content
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}

/// One LLM analysis of a note under one question-set version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(default)]
    pub note_id: Option<String>,
    #[serde(default)]
    pub questions_version: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub date_executed: Option<String>,
    /// Question key (`q1`, `q2`, ...) to answer. Values are usually strings.
    #[serde(default)]
    pub answers_json: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestVersionResponse {
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsResponse {
    #[serde(default)]
    pub questions: Vec<String>,
}

/// Note ids with at least one analysis.
pub type AnswersIndex = HashSet<String>;

/// Note id to the question-set versions it has been analyzed under.
pub type VersionsIndex = HashMap<String, Vec<String>>;

// ============================================================================
// Question Catalog
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    Remote,
    Bundled,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionCatalog {
    pub versions: BTreeMap<String, Vec<String>>,
    pub latest: Option<String>,
    pub source: CatalogSource,
}

impl QuestionCatalog {
    /// Question list for a version. `"2"` and `"v2"` name the same version.
    pub fn questions_for(&self, version: &str) -> Option<&[String]> {
        if let Some(questions) = self.versions.get(version) {
            return Some(questions.as_slice());
        }
        self.versions
            .iter()
            .find(|(name, _)| same_version(name, version))
            .map(|(_, questions)| questions.as_slice())
    }

    /// Version names, newest first.
    pub fn version_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.versions.keys().map(String::as_str).collect();
        names.sort_by(|a, b| compare_versions_desc(a, b));
        names
    }

    pub fn is_latest(&self, version: &str) -> bool {
        self.latest
            .as_deref()
            .map(|latest| same_version(latest, version))
            .unwrap_or(false)
    }
}

// ============================================================================
// View State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Asc => "Oldest first",
            SortDirection::Desc => "Newest first",
        }
    }
}

/// Version constraint on the note list and the analysis panel.
///
/// `Single` and `AnyOf` are exclusive: a selection of exactly one version is a
/// `Single`, more than one is an `AnyOf`, none is `Any`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "mode", content = "versions", rename_all = "snake_case")]
pub enum VersionFilter {
    #[default]
    Any,
    Single(String),
    AnyOf(BTreeSet<String>),
}

impl VersionFilter {
    /// Build a filter from the versions the user ticked. Blank entries and
    /// the literal `any` are ignored.
    pub fn from_selection<I>(versions: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut selected: BTreeSet<String> = versions
            .into_iter()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("any"))
            .collect();

        match selected.len() {
            0 => VersionFilter::Any,
            1 => match selected.pop_first() {
                Some(v) => VersionFilter::Single(v),
                None => VersionFilter::Any,
            },
            _ => VersionFilter::AnyOf(selected),
        }
    }

    pub fn selected(&self) -> Vec<&str> {
        match self {
            VersionFilter::Any => Vec::new(),
            VersionFilter::Single(v) => vec![v.as_str()],
            VersionFilter::AnyOf(set) => set.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_selected(&self, version: &str) -> bool {
        self.selected().iter().any(|v| same_version(v, version))
    }

    /// True when `versions` satisfies this filter.
    pub fn admits(&self, versions: &[String]) -> bool {
        match self {
            VersionFilter::Any => true,
            VersionFilter::Single(wanted) => versions.iter().any(|v| same_version(v, wanted)),
            VersionFilter::AnyOf(wanted) => versions
                .iter()
                .any(|v| wanted.iter().any(|w| same_version(v, w))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NoteFilters {
    pub has_content: bool,
    pub has_analysis: bool,
    pub version: VersionFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewTab {
    #[default]
    All,
    Metadata,
    Content,
    Analysis,
}

impl ViewTab {
    pub const TABS: [ViewTab; 4] = [
        ViewTab::All,
        ViewTab::Metadata,
        ViewTab::Content,
        ViewTab::Analysis,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(ViewTab::All),
            "metadata" => Some(ViewTab::Metadata),
            "content" => Some(ViewTab::Content),
            "analysis" => Some(ViewTab::Analysis),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewTab::All => "all",
            ViewTab::Metadata => "metadata",
            ViewTab::Content => "content",
            ViewTab::Analysis => "analysis",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewTab::All => "All",
            ViewTab::Metadata => "Metadata",
            ViewTab::Content => "Content",
            ViewTab::Analysis => "Analysis",
        }
    }

    pub fn shows_metadata(self) -> bool {
        matches!(self, ViewTab::All | ViewTab::Metadata)
    }

    pub fn shows_content(self) -> bool {
        matches!(self, ViewTab::All | ViewTab::Content)
    }

    pub fn shows_analysis(self) -> bool {
        matches!(self, ViewTab::All | ViewTab::Analysis)
    }
}

/// Everything the user controls about the current view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewSettings {
    pub filters: NoteFilters,
    pub sort: SortDirection,
    pub tab: ViewTab,
}

// ============================================================================
// Display Projections
// ============================================================================

/// A version to render for the selected note, with the records found for it.
/// Several models may have answered the same version; all are kept in fetch
/// order. An empty list renders nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayVersion {
    pub version: String,
    pub records: Vec<AnswerRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerRow {
    pub key: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub last_edited_time: Option<String>,
    pub analyzed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedRecord {
    pub model: String,
    pub date_executed: Option<String>,
    pub rows: Vec<AnswerRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedVersion {
    pub version: String,
    pub latest: bool,
    pub records: Vec<ResolvedRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteDetail {
    pub note: Note,
    pub title: String,
    pub analyzed: bool,
    pub questions_loading: bool,
    pub versions: Vec<ResolvedVersion>,
}

// ============================================================================
// View Parameters
// ============================================================================

/// View settings plus the selected note, as carried in the query string:
/// `content=1`, `analysis=1`, `version=<v>` (repeatable), `sort=asc|desc`,
/// `note=<id>`, `tab=all|metadata|content|analysis`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub view: ViewSettings,
    pub note: Option<String>,
}

fn is_on(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

impl ViewParams {
    /// Unknown keys and unparseable values are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut view = ViewSettings::default();
        let mut versions = Vec::new();
        let mut note = None;

        for (key, value) in pairs {
            match key.as_str() {
                "content" => view.filters.has_content = is_on(value),
                "analysis" => view.filters.has_analysis = is_on(value),
                "version" => versions.push(value.clone()),
                "sort" => {
                    if let Some(direction) = SortDirection::parse(value) {
                        view.sort = direction;
                    }
                }
                "tab" => {
                    if let Some(tab) = ViewTab::parse(value) {
                        view.tab = tab;
                    }
                }
                "note" => {
                    let id = value.trim();
                    if !id.is_empty() {
                        note = Some(id.to_string());
                    }
                }
                _ => {}
            }
        }

        view.filters.version = VersionFilter::from_selection(versions);
        Self { view, note }
    }

    /// Link to the explorer page with these parameters. Defaults are omitted.
    pub fn href(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if self.view.filters.has_content {
            parts.push("content=1".to_string());
        }
        if self.view.filters.has_analysis {
            parts.push("analysis=1".to_string());
        }
        for version in self.view.filters.version.selected() {
            parts.push(format!("version={}", urlencoding::encode(version)));
        }
        if self.view.sort != SortDirection::default() {
            parts.push(format!("sort={}", self.view.sort.as_str()));
        }
        if let Some(note) = &self.note {
            parts.push(format!("note={}", urlencoding::encode(note)));
        }
        if self.view.tab != ViewTab::default() {
            parts.push(format!("tab={}", self.view.tab.as_str()));
        }

        if parts.is_empty() {
            "/".to_string()
        } else {
            format!("/?{}", parts.join("&"))
        }
    }

    pub fn with_note(&self, note_id: &str) -> Self {
        Self {
            note: Some(note_id.to_string()),
            ..self.clone()
        }
    }

    pub fn with_tab(&self, tab: ViewTab) -> Self {
        let mut next = self.clone();
        next.view.tab = tab;
        next
    }

    pub fn with_sort(&self, sort: SortDirection) -> Self {
        let mut next = self.clone();
        next.view.sort = sort;
        next
    }
}
