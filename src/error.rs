use thiserror::Error;

pub type Result<T> = std::result::Result<T, GmonthError>;

/// Failures while walking commit history. Any of these aborts the whole
/// collection; no partial history is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("Cannot resolve HEAD: {0}")]
    HeadUnresolvable(String),
    #[error("Commit history unavailable: {0}")]
    LogUnavailable(String),
    #[error("Commit {commit} unreadable: {reason}")]
    CommitUnreadable { commit: String, reason: String },
}

impl CollectionError {
    pub fn unreadable(commit: impl ToString, reason: impl ToString) -> Self {
        CollectionError::CommitUnreadable {
            commit: commit.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Short name of the stage that failed, used in log fields.
    pub fn stage(&self) -> &'static str {
        match self {
            CollectionError::HeadUnresolvable(_) => "head",
            CollectionError::LogUnavailable(_) => "log",
            CollectionError::CommitUnreadable { .. } => "commit",
        }
    }
}

#[derive(Error, Debug)]
pub enum GmonthError {
    #[error("Git error: {0}")]
    Git(#[from] Box<gix::open::Error>),
    #[error("Git discover error: {0}")]
    GitDiscover(#[from] Box<gix::discover::Error>),
    #[error("Clone error: {0}")]
    Clone(String),
    #[error("{0}")]
    Collection(#[from] CollectionError),
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Manual From implementations for unboxed to boxed conversions
impl From<gix::open::Error> for GmonthError {
    fn from(err: gix::open::Error) -> Self {
        GmonthError::Git(Box::new(err))
    }
}

impl From<gix::discover::Error> for GmonthError {
    fn from(err: gix::discover::Error) -> Self {
        GmonthError::GitDiscover(Box::new(err))
    }
}

impl From<gix::clone::Error> for GmonthError {
    fn from(err: gix::clone::Error) -> Self {
        GmonthError::Clone(err.to_string())
    }
}

impl From<gix::clone::fetch::Error> for GmonthError {
    fn from(err: gix::clone::fetch::Error) -> Self {
        GmonthError::Clone(err.to_string())
    }
}
