use crate::model::FileTimeline;
use std::io::{self, Write};
use std::path::Path;

const WIDTH: f64 = 720.0;
const HEIGHT: f64 = 200.0;
const PAD: f64 = 32.0;

/// Write a standalone HTML page with one line chart per file.
pub fn write_charts(path: &Path, timelines: &[FileTimeline]) -> io::Result<()> {
    let mut file = io::BufWriter::new(std::fs::File::create(path)?);
    file.write_all(render_page(timelines).as_bytes())?;
    file.flush()
}

pub fn render_page(timelines: &[FileTimeline]) -> String {
    let mut page = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>File change timelines</title>\n\
         <style>\nbody{font-family:sans-serif;background:#fafafa}\n\
         .chart{background:#fff;margin:16px;padding:8px;border:1px solid #ddd}\n\
         polyline{fill:none;stroke:#516b91;stroke-width:2}\n\
         circle{fill:#516b91}\ntext{font-size:10px;fill:#555}\n</style>\n</head>\n<body>\n",
    );
    for timeline in timelines {
        render_chart(&mut page, timeline);
    }
    page.push_str("</body>\n</html>\n");
    page
}

fn render_chart(page: &mut String, timeline: &FileTimeline) {
    let peak = timeline.peak().max(1) as f64;
    let n = timeline.buckets.len();
    let step = if n > 1 {
        (WIDTH - 2.0 * PAD) / (n - 1) as f64
    } else {
        0.0
    };

    let points: Vec<(f64, f64)> = timeline
        .buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            let x = PAD + step * i as f64;
            let y = HEIGHT - PAD - (b.count as f64 / peak) * (HEIGHT - 2.0 * PAD);
            (x, y)
        })
        .collect();

    page.push_str(&format!(
        "<div class=\"chart\">\n<h3>File: {}</h3>\n",
        escape(&timeline.path)
    ));
    page.push_str(&format!(
        "<svg width=\"{WIDTH}\" height=\"{HEIGHT}\" viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n"
    ));

    let polyline: Vec<String> = points.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
    page.push_str(&format!("<polyline points=\"{}\"/>\n", polyline.join(" ")));

    // label at most ~12 months so long histories stay legible
    let label_every = (n / 12).max(1);
    for (i, ((x, y), bucket)) in points.iter().zip(&timeline.buckets).enumerate() {
        page.push_str(&format!(
            "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\"><title>{}: {}</title></circle>\n",
            escape(&bucket.label),
            bucket.count
        ));
        if i % label_every == 0 || i + 1 == n {
            page.push_str(&format!(
                "<text x=\"{x:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
                HEIGHT - PAD / 3.0,
                escape(&bucket.label)
            ));
        }
    }
    page.push_str(&format!(
        "<text x=\"4\" y=\"{PAD}\">{}</text>\n</svg>\n</div>\n",
        timeline.peak()
    ));
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
