pub mod html;
pub mod output;

pub use html::{render_page, write_charts};
pub use output::{output_json, output_ndjson, output_table, sparkline};
