use crate::error::CollectionError;
use crate::model::CommitEvent;
use std::fmt::Display;

pub type CommitLog<'a, Id> = Box<dyn Iterator<Item = Result<Id, CollectionError>> + 'a>;

/// A read-only view of a repository's history.
///
/// The collector only needs these three capabilities; branches, tags and
/// diffs are the implementor's business.
pub trait HistorySource {
    type CommitId: Clone + Display;

    fn resolve_head(&self) -> Result<Self::CommitId, CollectionError>;

    /// Lazily yields every commit reachable from `head`, each exactly once.
    fn log_from(&self, head: Self::CommitId) -> Result<CommitLog<'_, Self::CommitId>, CollectionError>;

    /// Files touched by `commit`, each paired with the commit's author time.
    fn files_touched(&self, commit: &Self::CommitId) -> Result<Vec<CommitEvent>, CollectionError>;
}

impl<S: HistorySource + ?Sized> HistorySource for &S {
    type CommitId = S::CommitId;

    fn resolve_head(&self) -> Result<Self::CommitId, CollectionError> {
        (**self).resolve_head()
    }

    fn log_from(&self, head: Self::CommitId) -> Result<CommitLog<'_, Self::CommitId>, CollectionError> {
        (**self).log_from(head)
    }

    fn files_touched(&self, commit: &Self::CommitId) -> Result<Vec<CommitEvent>, CollectionError> {
        (**self).files_touched(commit)
    }
}
