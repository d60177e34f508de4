use crate::error::CollectionError;
use crate::model::FileHistory;
use crate::source::HistorySource;

/// Walk all history reachable from HEAD and gather commit timestamps per file.
pub fn collect<S: HistorySource>(source: &S) -> Result<FileHistory, CollectionError> {
    collect_with(source, |_| {})
}

/// Like [`collect`], calling `on_commit` after each commit has been read.
pub fn collect_with<S, F>(source: &S, mut on_commit: F) -> Result<FileHistory, CollectionError>
where
    S: HistorySource,
    F: FnMut(&S::CommitId),
{
    let head = source.resolve_head()?;
    let log = source.log_from(head)?;

    let mut history = FileHistory::new();
    for commit in log {
        let commit = commit?;
        for event in source.files_touched(&commit)? {
            history.entry(event.path).or_default().push(event.timestamp);
        }
        on_commit(&commit);
    }

    // Vec::sort is stable, so equal timestamps keep encounter order.
    for timestamps in history.values_mut() {
        timestamps.sort();
    }

    Ok(history)
}
