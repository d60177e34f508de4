use crate::cli::CommonArgs;
use crate::fetch::load_timelines;
use crate::render::{output_json, output_ndjson, output_table};
use std::io;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool, top: usize, interactive: bool) -> anyhow::Result<()> {
    let loaded = load_timelines(&common, !(json || ndjson))?;

    if interactive {
        return crate::tui::run(loaded.timelines).map_err(|e| anyhow::anyhow!(e));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        output_json(&mut out, &loaded.timelines, &loaded.repository, loaded.listing.as_str())
    } else if ndjson {
        output_ndjson(&mut out, &loaded.timelines)
    } else {
        output_table(&mut out, &loaded.timelines, top)
    }
}
