use chrono::{DateTime, Datelike, FixedOffset, Month, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const SCHEMA_VERSION: u32 = 1;

/// Commit timestamps per file path, each in its author's own offset.
pub type FileHistory = BTreeMap<String, Vec<DateTime<FixedOffset>>>;

/// One file touched by one commit, stamped with the commit's author time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitEvent {
    pub path: String,
    pub timestamp: DateTime<FixedOffset>,
}

impl CommitEvent {
    pub fn new(path: impl Into<String>, timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            path: path.into(),
            timestamp,
        }
    }
}

/// A calendar month of a specific year. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based, January is 1.
    pub month: u32,
}

impl YearMonth {
    /// The month on the calendar of `timestamp`'s own timezone.
    pub fn of<Tz: TimeZone>(timestamp: &DateTime<Tz>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// The following month, wrapping December into January of the next year.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn name(self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }

    pub fn label(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub label: String,
    pub count: u64,
}

impl MonthBucket {
    pub fn new(month: YearMonth, count: u64) -> Self {
        Self {
            label: month.label(),
            count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTimeline {
    pub path: String,
    pub buckets: Vec<MonthBucket>,
}

impl FileTimeline {
    pub fn total_changes(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn peak(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn first_label(&self) -> Option<&str> {
        self.buckets.first().map(|b| b.label.as_str())
    }

    pub fn last_label(&self) -> Option<&str> {
        self.buckets.last().map(|b| b.label.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub listing: String,
    pub files: Vec<FileTimeline>,
}
