use crate::model::{FileHistory, FileTimeline, MonthBucket, YearMonth};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;

/// Turn ascending commit timestamps into one bucket per calendar month,
/// from the earliest month through the latest, zero months included.
///
/// Months are read on each author's local calendar, so the earliest
/// instant need not fall in the earliest month. Empty input yields no buckets.
pub fn bucketize(timestamps: &[DateTime<FixedOffset>]) -> Vec<MonthBucket> {
    let mut counts: BTreeMap<YearMonth, u64> = BTreeMap::new();
    for ts in timestamps {
        *counts.entry(YearMonth::of(ts)).or_insert(0) += 1;
    }

    let (Some(&start), Some(&end)) = (counts.keys().next(), counts.keys().next_back()) else {
        return Vec::new();
    };

    let mut current = start;
    let mut buckets = Vec::new();
    loop {
        let count = counts.get(&current).copied().unwrap_or(0);
        buckets.push(MonthBucket::new(current, count));
        if current == end {
            break;
        }
        current = current.succ();
    }

    buckets
}

/// Bucketize every file, in path order.
pub fn build_timelines(history: &FileHistory) -> Vec<FileTimeline> {
    history
        .iter()
        .map(|(path, timestamps)| FileTimeline {
            path: path.clone(),
            buckets: bucketize(timestamps),
        })
        .collect()
}
