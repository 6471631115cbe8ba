//! Question catalog loading.
//!
//! Two tiers: the remote catalog from the Question Versions API, and a
//! bundled catalog compiled into the binary. The bundled tier is selected
//! only when the remote tier fails; it is a degraded mode, not a cache.

use crate::api::{ApiError, NotesApi};
use crate::models::{CatalogSource, QuestionCatalog};
use crate::versions::compare_versions_desc;
use futures_util::future::join_all;
use std::collections::BTreeMap;

// ============================================================================
// Bundled Catalog
// ============================================================================

const BUNDLED_V1: &[&str] = &[
    "What positive emotions were mentioned?",
    "What negative emotions were mentioned?",
    "What behaviors do I admire?",
    "What topics am I interested in?",
    "What activities do I engage in?",
    "What problems am I trying to solve?",
    "What criteria did I use for decision making?",
    "Do I regret any decisions?",
    "What trade-offs did I consider?",
    "How do I describe myself?",
    "What aspects of myself do I want to change?",
    "What roles do I adopt?",
];

const BUNDLED_V2: &[&str] = &[
    "What experiences triggered positive emotional responses?",
    "What situations caused me to feel aligned with my actions?",
    "What situations caused me to feel misaligned with my actions?",
    "What behaviours or qualities do I admire in others?",
    "What behaviours or qualities do I criticise in others?",
    "What topics and activities am I interested in?",
    "What problems am I trying to solve?",
];

const BUNDLED_V3: &[&str] = &[
    "What experiences triggered positive emotional responses?",
    "What situations caused me to feel aligned with my actions?",
    "What situations caused me to feel misaligned with my actions?",
    "What behaviours or qualities do I admire in others?",
    "What behaviours or qualities do I criticise in others?",
    "What topics and activities am I interested in?",
    "Where do I invest my energy when nobody is directing me?",
    "What problems am I trying to solve?",
    "What criteria did I use to make choices?",
    "Was I satisfied with any decisions?",
    "Was I regretting any decisions?",
    "What trade-offs did I consider when making a decision?",
    "How do I describe myself in contrast to others?",
    "What aspects of myself do I question or want to change?",
    "What roles do I adopt?",
    "What is the main theme or focus of the note?",
];

pub fn bundled_catalog() -> QuestionCatalog {
    let versions: BTreeMap<String, Vec<String>> = [
        ("v1", BUNDLED_V1),
        ("v2", BUNDLED_V2),
        ("v3", BUNDLED_V3),
    ]
    .into_iter()
    .map(|(version, questions)| {
        (
            version.to_string(),
            questions.iter().map(|q| q.to_string()).collect(),
        )
    })
    .collect();

    let latest = infer_latest(versions.keys());
    QuestionCatalog {
        versions,
        latest,
        source: CatalogSource::Bundled,
    }
}

// ============================================================================
// Remote Catalog
// ============================================================================

/// The numerically highest version.
pub fn infer_latest<'a, I>(versions: I) -> Option<String>
where
    I: IntoIterator<Item = &'a String>,
{
    versions
        .into_iter()
        .min_by(|a, b| compare_versions_desc(a, b))
        .cloned()
}

/// Fetch every version's question list. Fails if the version list or any
/// per-version fetch fails, or if the backend reports no versions at all.
/// A failed latest-version lookup is not fatal; latest is inferred instead.
pub async fn fetch_remote_catalog(api: &NotesApi) -> Result<QuestionCatalog, ApiError> {
    let names = api.question_versions().await?;
    if names.is_empty() {
        return Err(ApiError::Empty("/question_versions".to_string()));
    }

    let fetches = names.iter().map(|name| api.questions(name));
    let (lists, reported_latest) =
        futures_util::join!(join_all(fetches), api.latest_question_version());

    let mut versions = BTreeMap::new();
    for (name, questions) in names.into_iter().zip(lists) {
        versions.insert(name, questions?);
    }

    let latest = match reported_latest {
        Ok(Some(version)) => Some(version),
        Ok(None) => infer_latest(versions.keys()),
        Err(e) => {
            log::warn!("[Catalog] Latest version lookup failed, inferring: {}", e);
            infer_latest(versions.keys())
        }
    };

    Ok(QuestionCatalog {
        versions,
        latest,
        source: CatalogSource::Remote,
    })
}

/// Remote catalog if it loads, bundled catalog otherwise.
pub async fn load_catalog(api: &NotesApi) -> QuestionCatalog {
    match fetch_remote_catalog(api).await {
        Ok(catalog) => {
            log::info!(
                "[Catalog] Loaded {} question versions (latest: {})",
                catalog.versions.len(),
                catalog.latest.as_deref().unwrap_or("none"),
            );
            catalog
        }
        Err(e) => {
            log::warn!("[Catalog] Using bundled questions: {}", e);
            bundled_catalog()
        }
    }
}
