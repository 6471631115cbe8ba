//! Handler tests against a mock Notes API.

use super::*;
use crate::explorer::ExplorerState;
use crate::Config;
use axum::http::header::LOCATION;
use mockito::{Mock, ServerGuard};
use std::io::Write;
use std::time::Duration;

const NOTES: &str = r##"[
    {"id": "a", "content": "# Alpha\nfirst", "last_edited_time": "2024-01-01T00:00:00Z"},
    {"id": "b", "content": "# Beta\nsecond", "last_edited_time": "2024-02-01T00:00:00Z"}
]"##;

const ANSWERS_B: &str =
    r#"[{"questions_version": "v2", "model": "gemini", "answers_json": {"q1": "yes"}}]"#;

struct Backend {
    server: ServerGuard,
    _mocks: Vec<Mock>,
}

async fn json_mock(server: &mut ServerGuard, path: &str, body: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// Notes `a` and `b`; the question catalog is unavailable so the bundled one
/// loads. Answers for `a` take 300 ms, answers for `b` come back at once.
async fn backend() -> Backend {
    let mut server = mockito::Server::new_async().await;
    let mut mocks = vec![
        json_mock(&mut server, "/notes", NOTES).await,
        json_mock(&mut server, "/answers_index", r#"["b"]"#).await,
        json_mock(&mut server, "/note_versions_index", r#"{"b": ["v2"]}"#).await,
        json_mock(&mut server, "/answers/b", ANSWERS_B).await,
    ];
    mocks.push(
        server
            .mock("GET", "/question_versions")
            .with_status(500)
            .create_async()
            .await,
    );
    mocks.push(
        server
            .mock("GET", "/answers/a")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(300));
                w.write_all(b"[]")
            })
            .create_async()
            .await,
    );
    Backend {
        server,
        _mocks: mocks,
    }
}

fn app_state(server: &ServerGuard) -> Arc<AppState> {
    Arc::new(AppState::new(Config {
        api_url: server.url(),
        ..Config::default()
    }))
}

async fn wait_until(state: &AppState, ready: impl Fn(&ExplorerState) -> bool) {
    for _ in 0..100 {
        if ready(&lock(&state.explorer())) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("explorer never became ready");
}

fn query(pairs: &[(&str, &str)]) -> QueryPairs {
    Query(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    )
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_index_renders_requested_note_after_selection_moves() {
    let backend = backend().await;
    let state = app_state(&backend.server);
    wait_until(&state, |e| e.notes_loaded() && e.catalog().is_some()).await;

    let slow = tokio::spawn(index(State(state.clone()), query(&[("note", "a")])));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let Html(page_b) = index(State(state.clone()), query(&[("note", "b")])).await;
    let Html(page_a) = slow.await.unwrap();

    assert!(page_a.contains("ID: a"));
    assert!(!page_a.contains("ID: b"));
    assert!(page_a.contains("Loading analysis"));

    assert!(page_b.contains("ID: b"));
    assert!(page_b.contains("yes"));
}

#[tokio::test]
async fn test_index_retries_failed_answers() {
    let mut server = mockito::Server::new_async().await;
    let _notes = json_mock(&mut server, "/notes", NOTES).await;
    let failing = server
        .mock("GET", "/answers/a")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let state = app_state(&server);
    wait_until(&state, |e| e.notes_loaded()).await;

    let Html(first) = index(State(state.clone()), query(&[("note", "a")])).await;
    let Html(second) = index(State(state.clone()), query(&[("note", "a")])).await;

    failing.assert_async().await;
    assert!(first.contains("ID: a"));
    assert!(!second.contains("Loading analysis"));
}

#[tokio::test]
async fn test_note_detail_unknown_id_is_404() {
    let backend = backend().await;
    let state = app_state(&backend.server);
    wait_until(&state, |e| e.notes_loaded()).await;

    let response = api_note_detail(State(state), Path("zzz".to_string()), query(&[])).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_note_detail_conflicts_when_selection_moves() {
    let backend = backend().await;
    let state = app_state(&backend.server);
    wait_until(&state, |e| e.notes_loaded() && e.catalog().is_some()).await;

    let slow = tokio::spawn(api_note_detail(
        State(state.clone()),
        Path("a".to_string()),
        query(&[]),
    ));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let current = api_note_detail(State(state.clone()), Path("b".to_string()), query(&[])).await;
    let stale = slow.await.unwrap();

    assert_eq!(stale.status(), StatusCode::CONFLICT);
    assert_eq!(current.status(), StatusCode::OK);

    let detail = body_json(current).await;
    assert_eq!(detail["note"]["id"], "b");
    assert_eq!(detail["versions"][0]["version"], "v2");
}

#[tokio::test]
async fn test_catalog_unavailable_until_loaded() {
    let backend = backend().await;
    let state = app_state(&backend.server);

    let loading = api_catalog(State(state.clone())).await;
    assert_eq!(loading.status(), StatusCode::SERVICE_UNAVAILABLE);

    wait_until(&state, |e| e.catalog().is_some()).await;
    let loaded = api_catalog(State(state)).await;
    assert_eq!(loaded.status(), StatusCode::OK);
    let catalog = body_json(loaded).await;
    assert_eq!(catalog["source"], "bundled");
    assert_eq!(catalog["latest"], "v3");
}

#[tokio::test]
async fn test_api_notes_applies_view_params() {
    let backend = backend().await;
    let state = app_state(&backend.server);
    wait_until(&state, |e| e.notes_loaded() && e.is_analyzed("b")).await;

    let Json(all) = api_notes(State(state.clone()), query(&[("sort", "asc")])).await;
    let ids: Vec<&str> = all.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);

    let Json(analyzed) = api_notes(State(state), query(&[("analysis", "1")])).await;
    assert_eq!(analyzed.len(), 1);
    assert_eq!(analyzed[0].title, "Beta");
}

#[tokio::test]
async fn test_refresh_remounts_explorer() {
    let backend = backend().await;
    let state = app_state(&backend.server);
    wait_until(&state, |e| e.notes_loaded()).await;

    index(State(state.clone()), query(&[("note", "b")])).await;
    let before = state.explorer();
    assert_eq!(lock(&before).selected_id(), Some("b"));

    let response = refresh(State(state.clone())).await.into_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");

    let after = state.explorer();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(lock(&after).selected_id().is_none());
}
