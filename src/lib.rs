pub mod cache;
pub mod chart;
pub mod cli;
pub mod collector;
pub mod error;
pub mod fetch;
pub mod git;
pub mod model;
pub mod render;
pub mod report;
pub mod source;
pub mod timeline;
pub mod tui;

pub use collector::{collect, collect_with};
pub use error::{CollectionError, GmonthError, Result};
pub use model::{CommitEvent, FileHistory, FileTimeline, MonthBucket, YearMonth};
pub use source::HistorySource;
pub use timeline::{bucketize, build_timelines};
