use std::io;
use std::time::Duration;

use crossterm::event::{poll, read, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Terminal;
use tracing::warn;

use crate::model::FileTimeline;

use super::events::handle_key_event;
use super::state::{sort_timelines, TuiState};
use super::views::{draw_files_view, draw_help_overlay, draw_timeline_view};

/// Browse file timelines interactively until the user quits.
pub fn run(mut timelines: Vec<FileTimeline>) -> io::Result<()> {
    let mut state = TuiState::new(&timelines);
    sort_timelines(&mut timelines, state.sort);

    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut state, &mut timelines);

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut TuiState,
    timelines: &mut [FileTimeline],
) -> io::Result<()> {
    loop {
        let (view, files): (&TuiState, &[FileTimeline]) = (&*state, &*timelines);
        let draw_result = terminal.draw(|f| {
            let size = f.size();

            if view.show_help {
                draw_help_overlay(f, size);
                return;
            }

            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(size);

            draw_files_view(f, chunks[0], files, view);
            draw_timeline_view(f, chunks[1], view.selected_timeline(files));
        });

        if let Err(e) = draw_result {
            warn!(error = %e, "TUI draw error");
        }

        if poll(Duration::from_millis(200))? {
            if let Event::Key(key_event) = read()? {
                if handle_key_event(key_event, state, timelines) {
                    return Ok(());
                }
            }
        }
    }
}
