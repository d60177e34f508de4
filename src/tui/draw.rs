use ratatui::style::{Color, Modifier, Style};

/// Chooses a style/color based on how busy a file is relative to the busiest one.
pub fn intensity_color(changes: u64, max: u64) -> Style {
    if max == 0 {
        return Style::default().fg(Color::White);
    }

    let ratio = changes as f64 / max as f64;
    if ratio > 0.8 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else if ratio > 0.6 {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if ratio > 0.4 {
        Style::default().fg(Color::Green)
    } else if ratio > 0.2 {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Blue)
    }
}

/// "March 2021" -> "Mar 21", for narrow chart axes.
pub fn short_label(label: &str) -> String {
    match label.split_once(' ') {
        Some((month, year)) => {
            let month: String = month.chars().take(3).collect();
            let year = year.get(year.len().saturating_sub(2)..).unwrap_or(year);
            format!("{month} {year}")
        }
        None => label.to_string(),
    }
}
