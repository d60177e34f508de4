use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::model::FileTimeline;
use crate::tui::draw::short_label;

/// Render the monthly bar chart for one file plus a table of its latest months.
pub fn draw_timeline_view(f: &mut Frame, area: Rect, timeline: Option<&FileTimeline>) {
    let Some(timeline) = timeline else {
        let empty = Paragraph::new("No file selected")
            .block(Block::default().title("Timeline").borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    // 7 columns per bar incl. gap; show the most recent months that fit
    let fits = (chunks[0].width.saturating_sub(2) / 7).max(1) as usize;
    let skip = timeline.buckets.len().saturating_sub(fits);
    let labels: Vec<String> = timeline.buckets[skip..]
        .iter()
        .map(|b| short_label(&b.label))
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&timeline.buckets[skip..])
        .map(|(label, b)| (label.as_str(), b.count))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!("{}: changes per month", timeline.path))
                .borders(Borders::ALL),
        )
        .data(data.as_slice())
        .bar_width(6)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green));
    f.render_widget(chart, chunks[0]);

    let rows: Vec<Row> = timeline
        .buckets
        .iter()
        .rev()
        .take(chunks[1].height.saturating_sub(3) as usize)
        .map(|b| {
            let activity = if b.count == 0 { "Quiet" } else { "" };
            Row::new(vec![
                Cell::from(b.label.clone()),
                Cell::from(format!("{}", b.count)),
                Cell::from(activity),
            ])
        })
        .collect();

    let summary = format!(
        "Total {} over {} months",
        timeline.total_changes(),
        timeline.buckets.len()
    );
    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(Row::new([
        Cell::from("Month").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("Changes").style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from("").style(Style::default().add_modifier(Modifier::BOLD)),
    ]))
    .block(Block::default().title(summary).borders(Borders::ALL));

    f.render_widget(table, chunks[1]);
}
