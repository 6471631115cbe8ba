//! Shared HTML components: nav bar, filter bar, and the base page template.

use super::styles::STYLE;
use crate::models::{CatalogSource, QuestionCatalog, SortDirection, ViewParams};
use crate::notes::html_escape;

// ============================================================================
// Nav Bar
// ============================================================================

pub fn nav_bar(api_url: &str, catalog: Option<&QuestionCatalog>) -> String {
    let catalog_status = match catalog.map(|c| c.source) {
        Some(CatalogSource::Remote) => "questions: live",
        Some(CatalogSource::Bundled) => "questions: bundled (catalog unavailable)",
        None => "questions: loading…",
    };

    format!(
        r#"<nav class="nav-bar">
            <a href="/" class="brand">Notes Explorer</a>
            <span class="spacer"></span>
            <span class="status">{api} · {catalog_status}</span>
            <a href="/refresh">Refresh</a>
        </nav>"#,
        api = html_escape(api_url),
        catalog_status = catalog_status,
    )
}

// ============================================================================
// Filter Bar
// ============================================================================

/// Sort toggle plus the filter form. The form is a plain GET back to `/`, so
/// the selected note, sort direction and tab ride along as hidden fields.
pub fn filter_bar(params: &ViewParams, catalog: Option<&QuestionCatalog>) -> String {
    let view = &params.view;
    let toggled = params.with_sort(view.sort.toggled());
    let arrow = match view.sort {
        SortDirection::Asc => "↑",
        SortDirection::Desc => "↓",
    };

    let checked = |on: bool| if on { " checked" } else { "" };

    let version_html = match catalog {
        Some(catalog) => catalog
            .version_names()
            .into_iter()
            .map(|version| {
                let latest = if catalog.is_latest(version) {
                    r#" <span class="chip latest">latest</span>"#
                } else {
                    ""
                };
                format!(
                    r#"<label><input type="checkbox" name="version" value="{v}"{c}> {v}{latest}</label>"#,
                    v = html_escape(version),
                    c = checked(view.filters.version.is_selected(version)),
                    latest = latest,
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        None => r#"<span class="placeholder">Loading versions…</span>"#.to_string(),
    };

    let mut hidden = format!(
        r#"<input type="hidden" name="sort" value="{}"><input type="hidden" name="tab" value="{}">"#,
        view.sort.as_str(),
        view.tab.as_str(),
    );
    if let Some(note) = &params.note {
        hidden.push_str(&format!(
            r#"<input type="hidden" name="note" value="{}">"#,
            html_escape(note)
        ));
    }

    format!(
        r#"<div class="filter-bar">
            <div class="group">
                <span class="label">Sort:</span>
                <a class="sort-toggle" href="{toggle_href}" title="{label}">{arrow} {label}</a>
            </div>
            <form class="group" action="/" method="get">
                <span class="label">Filters:</span>
                <label><input type="checkbox" name="content" value="1"{content}> Has Content</label>
                <label><input type="checkbox" name="analysis" value="1"{analysis}> Has Analysis</label>
                <span class="label">Question Version:</span>
                {version_html}
                {hidden}
                <button type="submit">Apply</button>
            </form>
        </div>"#,
        toggle_href = html_escape(&toggled.href()),
        label = view.sort.label(),
        arrow = arrow,
        content = checked(view.filters.has_content),
        analysis = checked(view.filters.has_analysis),
        version_html = version_html,
        hidden = hidden,
    )
}

// ============================================================================
// Base HTML Template
// ============================================================================

pub fn base_html(title: &str, nav: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    {nav}
    <div class="container">
        {content}
    </div>
</body>
</html>"#,
        title = html_escape(title),
        STYLE = STYLE,
        nav = nav,
        content = content,
    )
}
