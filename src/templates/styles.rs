//! CSS styles for the note explorer.
//!
//! Contains the main STYLE constant with all CSS for the web interface.

// ============================================================================
// CSS Styles
// ============================================================================

pub const STYLE: &str = r#"
/* Solarized Light Theme */
:root {
    --base01: #586e75;
    --base00: #657b83;
    --base1: #93a1a1;
    --base2: #eee8d5;
    --base3: #fdf6e3;

    --yellow: #b58900;
    --orange: #cb4b16;
    --violet: #6c71c4;
    --blue: #268bd2;
    --cyan: #2aa198;
    --green: #859900;

    --bg: var(--base3);
    --fg: var(--base00);
    --muted: var(--base1);
    --border: var(--base2);
    --link: var(--blue);
    --link-hover: var(--cyan);
    --accent: var(--base2);
    --code-bg: var(--base2);
    --highlight: #f7f2e2;
    --selected: #e8f1f8;
}

* { box-sizing: border-box; margin: 0; padding: 0; }

body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
    line-height: 1.6;
    color: var(--fg);
    background: var(--bg);
}

.container {
    max-width: 1200px;
    margin: 0 auto;
    padding: 1rem;
}

a { color: var(--link); text-decoration: none; }
a:hover { color: var(--link-hover); text-decoration: underline; }

h1, h2, h3 { font-weight: 600; margin-top: 1.5em; margin-bottom: 0.5em; }
h1 { font-size: 1.5rem; }
h2 { font-size: 1.2rem; }

.nav-bar {
    position: sticky;
    top: 0;
    background: var(--bg);
    border-bottom: 1px solid var(--border);
    padding: 0.5rem 1rem;
    display: flex;
    gap: 1rem;
    align-items: center;
    flex-wrap: wrap;
    z-index: 100;
}
.nav-bar .brand { font-weight: 600; color: var(--base01); }
.nav-bar .spacer { flex: 1; }
.nav-bar .status { font-size: 0.8rem; color: var(--muted); }

/* Filter bar */
.filter-bar {
    background: var(--highlight);
    border: 1px solid var(--border);
    border-radius: 6px;
    padding: 0.75rem 1rem;
    margin-bottom: 1rem;
    display: flex;
    gap: 1.5rem;
    align-items: center;
    flex-wrap: wrap;
    font-size: 0.9rem;
}
.filter-bar .group { display: flex; gap: 0.75rem; align-items: center; flex-wrap: wrap; }
.filter-bar .label { font-weight: 600; color: var(--base01); }
.filter-bar label { cursor: pointer; }
.filter-bar button {
    background: var(--bg);
    border: 1px solid var(--link);
    color: var(--link);
    border-radius: 4px;
    padding: 0.2rem 0.7rem;
    cursor: pointer;
}
.sort-toggle {
    border: 1px solid var(--link);
    border-radius: 4px;
    padding: 0.1rem 0.5rem;
}

/* Two-panel layout */
.explorer { display: flex; gap: 1.5rem; align-items: flex-start; }
.list-panel {
    flex: 1;
    max-width: 350px;
    max-height: calc(100vh - 200px);
    overflow: auto;
    border: 1px solid var(--border);
    border-radius: 6px;
}
.detail-panel {
    flex: 2;
    max-height: calc(100vh - 200px);
    overflow: auto;
    border: 1px solid var(--border);
    border-radius: 6px;
}
.panel-header {
    padding: 0.75rem 1rem;
    background: var(--accent);
    border-bottom: 1px solid var(--border);
    display: flex;
    justify-content: space-between;
    align-items: center;
}
.panel-header h2 { margin: 0; }
.count { font-size: 0.8rem; color: var(--muted); }

.note-list { list-style: none; }
.note-item {
    padding: 0.6rem 1rem;
    border-bottom: 1px solid var(--border);
    display: flex;
    justify-content: space-between;
    align-items: center;
    gap: 0.5rem;
}
.note-item:hover { background: var(--highlight); }
.note-item.selected { background: var(--selected); }
.note-item .title {
    display: block;
    font-weight: 500;
    white-space: nowrap;
    overflow: hidden;
    text-overflow: ellipsis;
    max-width: 230px;
}
.note-item .meta { font-size: 0.7rem; color: var(--muted); }
.empty { padding: 2rem 1rem; text-align: center; color: var(--muted); }

.chip {
    display: inline-block;
    font-size: 0.7rem;
    padding: 0.05rem 0.5rem;
    border-radius: 10px;
    border: 1px solid var(--link);
    color: var(--link);
    white-space: nowrap;
}
.chip.model { border-color: var(--violet); color: var(--violet); }
.chip.latest { border-color: var(--green); color: var(--green); }
.chip.solid { background: var(--link); color: var(--bg); }

/* Detail */
.detail-header { padding: 1rem 1.25rem; border-bottom: 1px solid var(--border); background: var(--highlight); }
.detail-header h1 { margin: 0; }
.detail-header .sub {
    display: flex;
    justify-content: space-between;
    font-size: 0.75rem;
    color: var(--muted);
    margin-top: 0.25rem;
    flex-wrap: wrap;
}
.tabs { display: flex; border-bottom: 1px solid var(--border); }
.tabs a {
    flex: 1;
    text-align: center;
    padding: 0.5rem;
    color: var(--fg);
    border-bottom: 2px solid transparent;
}
.tabs a.active { color: var(--link); border-bottom-color: var(--link); }
.detail-body { padding: 1rem 1.25rem; }
.section { margin-bottom: 1.5rem; }
.section-title { display: flex; justify-content: space-between; align-items: center; }

.meta-block {
    border: 1px solid var(--border);
    border-radius: 4px;
    padding: 0.75rem 1rem;
    font-size: 0.9rem;
}
.meta-block .meta-row { display: flex; }
.meta-block .meta-label { width: 120px; font-weight: 600; color: var(--muted); }
.meta-block .meta-value { font-family: "SF Mono", "Consolas", "Liberation Mono", monospace; font-size: 0.8rem; }

.content {
    border: 1px solid var(--border);
    border-radius: 4px;
    padding: 1rem;
}
.content p { margin-bottom: 0.8rem; }
.content ul, .content ol { margin: 0 0 0.8rem 1.5rem; }
.content code { background: var(--code-bg); padding: 0 0.25rem; border-radius: 3px; font-size: 0.85em; }
.content pre { background: var(--code-bg); padding: 0.75rem; border-radius: 4px; overflow-x: auto; margin-bottom: 0.8rem; }
.content pre code { padding: 0; }
.content table { border-collapse: collapse; margin-bottom: 0.8rem; }
.content th, .content td { border: 1px solid var(--border); padding: 0.25rem 0.5rem; }

/* Analysis */
.analysis {
    border: 1px solid var(--border);
    border-radius: 4px;
    margin-bottom: 1rem;
    background: var(--highlight);
}
.analysis-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 0.6rem 1rem;
    gap: 0.5rem;
    flex-wrap: wrap;
}
.analysis-header .chips { display: flex; gap: 0.4rem; flex-wrap: wrap; }
.analysis-header .when { font-size: 0.75rem; color: var(--muted); }
.answer {
    display: flex;
    gap: 0.75rem;
    padding: 0.6rem 1rem;
    border-top: 1px solid var(--border);
    background: var(--bg);
}
.answer:hover { background: var(--selected); }
.answer .key {
    font-weight: 600;
    color: var(--link);
    cursor: help;
    min-width: 2.5rem;
}
.answer .key:hover { text-decoration: underline; }
.answer .text { flex: 1; font-size: 0.9rem; white-space: pre-wrap; }
.answer .text.not-mentioned { font-style: italic; color: var(--muted); }
.placeholder { color: var(--muted); padding: 0.5rem 0; }

@media (max-width: 800px) {
    .explorer { flex-direction: column; }
    .list-panel { max-width: none; width: 100%; }
    .detail-panel { width: 100%; }
}
"#;
