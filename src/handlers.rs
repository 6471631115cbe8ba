//! HTTP route handlers for the explorer.
//!
//! The HTML page and the JSON endpoints all read the same mounted explorer
//! state. View settings arrive in the query string on every request.

use crate::explorer::{lock, select_and_fetch};
use crate::models::{NoteDetail, NoteSummary, QuestionCatalog, ViewParams};
use crate::templates::{base_html, filter_bar, nav_bar, render_detail, render_note_list};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;

#[cfg(test)]
#[path = "handlers_test.rs"]
mod handlers_test;

/// Raw query pairs. `version` may repeat, which a struct extractor cannot take.
type QueryPairs = Query<Vec<(String, String)>>;

// ============================================================================
// Page
// ============================================================================

/// Everything the page needs, copied out of the state so rendering happens
/// without holding the lock.
pub struct PageData {
    pub api_url: String,
    pub catalog: Option<QuestionCatalog>,
    pub notes: Vec<NoteSummary>,
    pub notes_loading: bool,
    pub selected: Option<String>,
    pub detail: Option<NoteDetail>,
    pub answers_pending: bool,
}

pub fn render_page(data: &PageData, params: &ViewParams) -> String {
    let title = data
        .detail
        .as_ref()
        .map(|d| format!("{} - Notes Explorer", d.title))
        .unwrap_or_else(|| "Notes Explorer".to_string());

    let content = format!(
        r#"{filters}
        <div class="explorer">
            {list}
            {detail}
        </div>"#,
        filters = filter_bar(params, data.catalog.as_ref()),
        list = render_note_list(
            &data.notes,
            data.selected.as_deref(),
            params,
            data.notes_loading
        ),
        detail = render_detail(data.detail.as_ref(), params, data.answers_pending),
    );

    base_html(&title, &nav_bar(&data.api_url, data.catalog.as_ref()), &content)
}

pub async fn index(State(state): State<Arc<AppState>>, Query(pairs): QueryPairs) -> Html<String> {
    let params = ViewParams::from_pairs(&pairs);
    let handle = state.explorer();

    select_and_fetch(&state.api, &handle, params.note.as_deref()).await;

    let data = {
        let mut explorer = lock(&handle);
        explorer.set_view(params.view.clone());

        // A concurrent request may have moved the selection while this one
        // waited; the requested note then renders without answers.
        let (detail, answers_pending) = match params.note.as_deref() {
            Some(id) => {
                let current = explorer.selected_id() == Some(id);
                (explorer.note_detail(id), !current || explorer.answers_pending())
            }
            None => (None, false),
        };

        PageData {
            api_url: state.config.api_url.clone(),
            catalog: explorer.catalog().cloned(),
            notes: explorer.summaries_for(&params.view),
            notes_loading: !explorer.notes_loaded(),
            selected: params.note.clone(),
            detail,
            answers_pending,
        }
    };

    Html(render_page(&data, &params))
}

// ============================================================================
// JSON API
// ============================================================================

pub async fn api_notes(
    State(state): State<Arc<AppState>>,
    Query(pairs): QueryPairs,
) -> Json<Vec<NoteSummary>> {
    let params = ViewParams::from_pairs(&pairs);
    let handle = state.explorer();
    let explorer = lock(&handle);
    Json(explorer.summaries_for(&params.view))
}

pub async fn api_note_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(pairs): QueryPairs,
) -> Response {
    let params = ViewParams::from_pairs(&pairs);
    let handle = state.explorer();

    select_and_fetch(&state.api, &handle, Some(&id)).await;

    let mut explorer = lock(&handle);
    explorer.set_view(params.view);

    if explorer.selected_id() != Some(id.as_str()) {
        return (StatusCode::CONFLICT, "Selection changed").into_response();
    }
    match explorer.selected_detail() {
        Some(detail) => Json(detail).into_response(),
        None => (StatusCode::NOT_FOUND, "Note not found").into_response(),
    }
}

pub async fn api_catalog(State(state): State<Arc<AppState>>) -> Response {
    let handle = state.explorer();
    let explorer = lock(&handle);
    match explorer.catalog() {
        Some(catalog) => Json(catalog.clone()).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Catalog loading").into_response(),
    }
}

pub async fn refresh(State(state): State<Arc<AppState>>) -> Redirect {
    log::info!("[Explorer] Refresh requested");
    state.remount();
    Redirect::to("/")
}
