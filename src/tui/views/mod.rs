use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Cell;

mod files;
mod help;
mod timeline;

pub use files::draw_files_view;
pub use help::draw_help_overlay;
pub use timeline::draw_timeline_view;

/// Convenience helper to build a styled table header cell.
pub(crate) fn header_cell(text: &str, color: Color) -> Cell<'static> {
    Cell::from(text.to_string()).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Keep the tail of a path within `max` chars, since the file name is the useful part.
pub(crate) fn truncate_left(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len > max {
        let keep = max.saturating_sub(3);
        let tail: String = s.chars().skip(len - keep).collect();
        format!("...{tail}")
    } else {
        s.to_string()
    }
}
