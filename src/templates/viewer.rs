//! Note list and note detail panels.

use crate::models::{NoteDetail, NoteSummary, ResolvedRecord, ViewParams, ViewTab};
use crate::notes::{format_date, html_escape, render_markdown};

const NOT_MENTIONED: &str = "Not mentioned.";

// ============================================================================
// Note List
// ============================================================================

pub fn render_note_list(
    notes: &[NoteSummary],
    selected: Option<&str>,
    params: &ViewParams,
    loading: bool,
) -> String {
    let mut html = format!(
        r#"<div class="list-panel">
            <div class="panel-header"><h2>Notes</h2><span class="count">Showing {}</span></div>"#,
        notes.len()
    );

    if notes.is_empty() {
        let message = if loading {
            "Loading notes…"
        } else {
            "No notes match your filters"
        };
        html.push_str(&format!(r#"<div class="empty">{}</div></div>"#, message));
        return html;
    }

    html.push_str(r#"<ul class="note-list">"#);
    for note in notes {
        let class = if selected == Some(note.id.as_str()) {
            "note-item selected"
        } else {
            "note-item"
        };
        let badge = if note.analyzed {
            r#"<span class="chip">Analyzed</span>"#
        } else {
            ""
        };

        html.push_str(&format!(
            r#"<li class="{class}">
                <span>
                    <a href="{href}" class="title">{title}</a>
                    <span class="meta">{edited}</span>
                </span>
                {badge}
            </li>"#,
            class = class,
            href = html_escape(&params.with_note(&note.id).href()),
            title = html_escape(&note.title),
            edited = format_date(note.last_edited_time.as_deref()),
            badge = badge,
        ));
    }
    html.push_str("</ul></div>");
    html
}

// ============================================================================
// Note Detail
// ============================================================================

fn render_tabs(params: &ViewParams) -> String {
    let links: Vec<String> = ViewTab::TABS
        .iter()
        .map(|tab| {
            let class = if *tab == params.view.tab { "active" } else { "" };
            format!(
                r#"<a class="{}" href="{}">{}</a>"#,
                class,
                html_escape(&params.with_tab(*tab).href()),
                tab.label()
            )
        })
        .collect();
    format!(r#"<nav class="tabs">{}</nav>"#, links.join(""))
}

fn meta_row(label: &str, value: &str) -> String {
    format!(
        r#"<div class="meta-row"><span class="meta-label">{}:</span><span class="meta-value">{}</span></div>"#,
        label,
        html_escape(value)
    )
}

fn render_record(version: &str, latest: bool, record: &ResolvedRecord) -> String {
    let latest_chip = if latest {
        r#"<span class="chip latest">latest</span>"#
    } else {
        ""
    };
    let when = record
        .date_executed
        .as_deref()
        .map(|d| format!(r#"<span class="when">{}</span>"#, format_date(Some(d))))
        .unwrap_or_default();

    let mut rows = String::new();
    for row in &record.rows {
        let text_class = if row.answer.trim() == NOT_MENTIONED {
            "text not-mentioned"
        } else {
            "text"
        };
        rows.push_str(&format!(
            r#"<div class="answer">
                <span class="key" title="{question}">{key}</span>
                <span class="{text_class}">{answer}</span>
            </div>"#,
            question = html_escape(&row.question),
            key = html_escape(&row.key.to_uppercase()),
            text_class = text_class,
            answer = html_escape(&row.answer),
        ));
    }

    format!(
        r#"<div class="analysis">
            <div class="analysis-header">
                <div class="chips">
                    <span class="chip">Version {version}</span>
                    <span class="chip model">{model}</span>
                    {latest_chip}
                </div>
                {when}
            </div>
            {rows}
        </div>"#,
        version = html_escape(version),
        model = html_escape(&record.model),
        latest_chip = latest_chip,
        when = when,
        rows = rows,
    )
}

fn render_analysis(detail: &NoteDetail, answers_pending: bool) -> String {
    let record_count: usize = detail.versions.iter().map(|v| v.records.len()).sum();
    let count_chip = if record_count > 0 {
        format!(
            r#"<span class="chip solid">{} {}</span>"#,
            record_count,
            if record_count == 1 { "Result" } else { "Results" }
        )
    } else {
        String::new()
    };

    let body = if detail.questions_loading {
        r#"<p class="placeholder">Loading questions…</p>"#.to_string()
    } else if answers_pending {
        r#"<p class="placeholder">Loading analysis…</p>"#.to_string()
    } else if record_count == 0 {
        r#"<p class="placeholder">No analysis found for this note.</p>"#.to_string()
    } else {
        detail
            .versions
            .iter()
            .flat_map(|v| {
                v.records
                    .iter()
                    .map(move |record| render_record(&v.version, v.latest, record))
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"<div class="section-title"><h2>Analysis</h2>{}</div>{}"#,
        count_chip, body
    )
}

pub fn render_detail(detail: Option<&NoteDetail>, params: &ViewParams, answers_pending: bool) -> String {
    let Some(detail) = detail else {
        let message = if params.note.is_some() {
            "Note not found."
        } else {
            "Select a note to view details."
        };
        return format!(
            r#"<div class="detail-panel"><div class="empty">{}</div></div>"#,
            message
        );
    };

    let note = &detail.note;
    let tab = params.view.tab;
    let mut sections = Vec::new();

    if tab.shows_metadata() {
        let mut rows = vec![
            meta_row("ID", &note.id),
            meta_row("Created", &format_date(note.created_time.as_deref())),
            meta_row("Last Edited", &format_date(note.last_edited_time.as_deref())),
        ];
        if let Some(parent) = &note.parent_id {
            rows.push(meta_row("Parent ID", parent));
        }
        sections.push(format!(
            r#"<div class="section">{}<div class="meta-block">{}</div></div>"#,
            if tab == ViewTab::All { "<h2>Metadata</h2>" } else { "" },
            rows.join("")
        ));
    }

    if tab.shows_content() {
        if let Some(content) = note.content.as_deref().filter(|c| !c.trim().is_empty()) {
            sections.push(format!(
                r#"<div class="section">{}<div class="content">{}</div></div>"#,
                if tab == ViewTab::All { "<h2>Content</h2>" } else { "" },
                render_markdown(content)
            ));
        }
    }

    if tab.shows_analysis() {
        sections.push(format!(
            r#"<div class="section">{}</div>"#,
            render_analysis(detail, answers_pending)
        ));
    }

    format!(
        r#"<div class="detail-panel">
            <div class="detail-header">
                <h1>{title}</h1>
                <div class="sub">
                    <span>ID: {id}</span>
                    <span>Created: {created} | Last Edited: {edited}</span>
                </div>
            </div>
            {tabs}
            <div class="detail-body">{sections}</div>
        </div>"#,
        title = html_escape(&detail.title),
        id = html_escape(&note.id),
        created = format_date(note.created_time.as_deref()),
        edited = format_date(note.last_edited_time.as_deref()),
        tabs = render_tabs(params),
        sections = sections.join("\n"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerRow, Note, ResolvedVersion};

    fn detail(versions: Vec<ResolvedVersion>) -> NoteDetail {
        NoteDetail {
            note: Note {
                id: "n1".to_string(),
                content: Some("# Trip <notes>\n\nbody".to_string()),
                created_time: Some("2024-01-01T00:00:00Z".to_string()),
                last_edited_time: None,
                parent_id: Some("root".to_string()),
            },
            title: "Trip <notes>".to_string(),
            analyzed: true,
            questions_loading: false,
            versions,
        }
    }

    fn version_with_answer(answer: &str) -> ResolvedVersion {
        ResolvedVersion {
            version: "v2".to_string(),
            latest: true,
            records: vec![ResolvedRecord {
                model: "gemini".to_string(),
                date_executed: None,
                rows: vec![AnswerRow {
                    key: "q1".to_string(),
                    question: "Q1 text".to_string(),
                    answer: answer.to_string(),
                }],
            }],
        }
    }

    #[test]
    fn test_list_empty_states() {
        let params = ViewParams::default();
        assert!(render_note_list(&[], None, &params, true).contains("Loading notes"));
        assert!(render_note_list(&[], None, &params, false).contains("No notes match your filters"));
    }

    #[test]
    fn test_list_marks_selection_and_analysis() {
        let notes = vec![NoteSummary {
            id: "n1".to_string(),
            title: "Hello".to_string(),
            last_edited_time: None,
            analyzed: true,
        }];
        let html = render_note_list(&notes, Some("n1"), &ViewParams::default(), false);
        assert!(html.contains("note-item selected"));
        assert!(html.contains("Analyzed"));
        assert!(html.contains("href=\"/?note=n1\""));
        assert!(html.contains("N/A"));
    }

    #[test]
    fn test_detail_escapes_and_shows_parent() {
        let html = render_detail(Some(&detail(Vec::new())), &ViewParams::default(), false);
        assert!(html.contains("Trip &lt;notes&gt;"));
        assert!(html.contains("Parent ID"));
        assert!(html.contains("No analysis found for this note."));
    }

    #[test]
    fn test_detail_analysis_rows() {
        let html = render_detail(
            Some(&detail(vec![version_with_answer("Not mentioned.")])),
            &ViewParams::default(),
            false,
        );
        assert!(html.contains("1 Result"));
        assert!(html.contains(r#"title="Q1 text""#));
        assert!(html.contains(">Q1<"));
        assert!(html.contains("not-mentioned"));
        assert!(html.contains("Version v2"));
    }

    #[test]
    fn test_detail_tab_limits_sections() {
        let params = ViewParams::default().with_tab(ViewTab::Metadata);
        let html = render_detail(Some(&detail(vec![version_with_answer("x")])), &params, false);
        assert!(html.contains("meta-block"));
        assert!(!html.contains("<h2>Analysis</h2>"));
        assert!(!html.contains(r#"class="content""#));
    }

    #[test]
    fn test_detail_placeholders() {
        assert!(render_detail(None, &ViewParams::default(), false).contains("Select a note"));
        let mut loading = detail(Vec::new());
        loading.questions_loading = true;
        let html = render_detail(Some(&loading), &ViewParams::default(), false);
        assert!(html.contains("Loading questions"));
    }
}
