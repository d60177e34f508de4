use crate::cli::CommonArgs;
use crate::fetch::load_timelines;
use crate::render::write_charts;
use anyhow::Context;
use console::style;
use std::path::Path;

pub fn exec(common: CommonArgs, output: &Path) -> anyhow::Result<()> {
    let loaded = load_timelines(&common, true)?;

    write_charts(output, &loaded.timelines)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} charts to {}",
        style(loaded.timelines.len()).cyan(),
        style(output.display()).bold()
    );
    Ok(())
}
