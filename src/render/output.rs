use crate::model::{FileTimeline, TimelineOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::io::Write;

const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn output_json<W: Write>(
    out: &mut W,
    timelines: &[FileTimeline],
    repository: &str,
    listing: &str,
) -> Result<()> {
    let output = TimelineOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository: repository.to_string(),
        listing: listing.to_string(),
        files: timelines.to_vec(),
    };

    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

pub fn output_ndjson<W: Write>(out: &mut W, timelines: &[FileTimeline]) -> Result<()> {
    for timeline in timelines {
        writeln!(out, "{}", serde_json::to_string(timeline)?)?;
    }
    Ok(())
}

/// One sparkline glyph per month, scaled to the file's busiest month.
pub fn sparkline(timeline: &FileTimeline) -> String {
    let peak = timeline.peak();
    timeline
        .buckets
        .iter()
        .map(|b| {
            if b.count == 0 || peak == 0 {
                ' '
            } else {
                let idx = ((b.count as f64 / peak as f64) * (LEVELS.len() - 1) as f64).round() as usize;
                LEVELS[idx.min(LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// Table of files sorted by total changes, busiest first.
pub fn output_table<W: Write>(out: &mut W, timelines: &[FileTimeline], top: usize) -> Result<()> {
    if timelines.is_empty() {
        writeln!(out, "No file history to display")?;
        return Ok(());
    }

    let mut ranked: Vec<&FileTimeline> = timelines.iter().collect();
    ranked.sort_by(|a, b| b.total_changes().cmp(&a.total_changes()).then_with(|| a.path.cmp(&b.path)));

    writeln!(
        out,
        "{:<48} {:>8} {:>6} {:<15} {:<15} {}",
        style("Path").bold(),
        style("Changes").bold(),
        style("Months").bold(),
        style("First").bold(),
        style("Last").bold(),
        style("Activity").bold()
    )?;
    writeln!(out, "{}", "─".repeat(110))?;

    for timeline in ranked.iter().take(top) {
        writeln!(
            out,
            "{:<48} {:>8} {:>6} {:<15} {:<15} {}",
            timeline.path,
            timeline.total_changes(),
            timeline.buckets.len(),
            timeline.first_label().unwrap_or("-"),
            timeline.last_label().unwrap_or("-"),
            style(sparkline(timeline)).green()
        )?;
    }

    if ranked.len() > top {
        writeln!(out, "\n... and {} more files", ranked.len() - top)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MonthBucket;

    fn timeline(path: &str, counts: &[u64]) -> FileTimeline {
        FileTimeline {
            path: path.to_string(),
            buckets: counts
                .iter()
                .enumerate()
                .map(|(i, &count)| MonthBucket {
                    label: format!("M{i}"),
                    count,
                })
                .collect(),
        }
    }

    #[test]
    fn sparkline_marks_quiet_months_blank() {
        let line = sparkline(&timeline("a", &[4, 0, 2]));
        let chars: Vec<char> = line.chars().collect();
        assert_eq!(chars.len(), 3);
        assert_eq!(chars[0], '█');
        assert_eq!(chars[1], ' ');
    }

    #[test]
    fn ndjson_is_one_timeline_per_line() {
        let mut buf = Vec::new();
        output_ndjson(&mut buf, &[timeline("a", &[1]), timeline("b", &[0, 1])]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let v: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(v["path"], "b");
        assert_eq!(v["buckets"][1]["count"], 1);
    }

    #[test]
    fn json_envelope_carries_version_and_files() {
        let mut buf = Vec::new();
        output_json(&mut buf, &[timeline("a", &[1])], "/repo", "tree").unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["version"], SCHEMA_VERSION);
        assert_eq!(v["listing"], "tree");
        assert_eq!(v["files"][0]["path"], "a");
    }

    #[test]
    fn table_truncates_to_top() {
        let mut buf = Vec::new();
        let data = [timeline("a", &[1]), timeline("b", &[3]), timeline("c", &[2])];
        output_table(&mut buf, &data, 2).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("... and 1 more files"));

        let rows: Vec<&str> = text.lines().skip(2).take(2).collect();
        assert!(rows[0].starts_with("b "));
        assert!(rows[1].starts_with("c "));
    }
}
