use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table};
use ratatui::Frame;

use crate::model::FileTimeline;
use crate::render::sparkline;
use crate::tui::draw::intensity_color;
use crate::tui::layout::visible_files;
use crate::tui::state::{SortMode, TuiState};

use super::{header_cell, truncate_left};

/// Render the scrollable list of files with their change totals.
pub fn draw_files_view(f: &mut Frame, area: Rect, timelines: &[FileTimeline], state: &TuiState) {
    let max_changes = timelines.iter().map(|t| t.total_changes()).max().unwrap_or(0);
    let path_width = area.width.saturating_sub(30) as usize;

    let rows: Vec<Row> = visible_files(timelines, state, area.height as usize)
        .into_iter()
        .map(|(timeline, selected)| {
            let total = timeline.total_changes();
            let row = Row::new(vec![
                Cell::from(truncate_left(&timeline.path, path_width.max(8))),
                Cell::from(format!("{total}")).style(intensity_color(total, max_changes)),
                Cell::from(sparkline(timeline)).style(Style::default().fg(Color::Green)),
            ]);
            if selected {
                row.style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            } else {
                row
            }
        })
        .collect();

    let sort = match state.sort {
        SortMode::Changes => "changes",
        SortMode::Path => "path",
    };
    let title = if state.search_mode || !state.search_query.is_empty() {
        format!("Files ({}/{}) /{}", state.filtered_indices.len(), timelines.len(), state.search_query)
    } else {
        format!("Files ({}) by {sort}", timelines.len())
    };

    let table = Table::new(
        rows,
        [Constraint::Min(8), Constraint::Length(8), Constraint::Length(20)],
    )
    .header(Row::new([
        header_cell("Path", Color::Yellow),
        header_cell("Changes", Color::Yellow),
        header_cell("Activity", Color::Yellow),
    ]))
    .block(Block::default().title(title).borders(Borders::ALL));

    f.render_widget(table, area);
}
