//! HTML templates and styling for the note explorer.
//!
//! ## Module Structure
//!
//! - `styles` - CSS constants and theme definitions
//! - `components` - Shared HTML components (nav bar, filter bar, base template)
//! - `viewer` - Note list and note detail panels

mod components;
mod styles;
mod viewer;

pub use components::{base_html, filter_bar, nav_bar};
pub use styles::STYLE;
pub use viewer::{render_detail, render_note_list};
