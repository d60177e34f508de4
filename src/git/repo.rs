use crate::error::{CollectionError, Result};
use crate::model::CommitEvent;
use crate::source::{CommitLog, HistorySource};
use chrono::{DateTime, FixedOffset};
use gix::object::tree::diff::ChangeDetached;
use gix::traverse::tree::Recorder;
use gix::{discover, ObjectId, Repository};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;
use tracing::{debug, info};

/// Which paths count as touched by a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FileListing {
    /// Every file in the commit's tree snapshot
    #[default]
    Tree,
    /// Only files that differ from the first parent
    Changed,
}

impl FileListing {
    pub fn as_str(self) -> &'static str {
        match self {
            FileListing::Tree => "tree",
            FileListing::Changed => "changed",
        }
    }
}

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
    listing: FileListing,
    // keeps a cloned repository alive for as long as we read from it
    _scratch: Option<TempDir>,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!(path = %path.display(), "opened repository");

        Ok(Self {
            repo,
            path,
            listing: FileListing::default(),
            _scratch: None,
        })
    }

    /// Bare-clone `url` into a temporary directory removed on drop.
    pub fn clone_url(url: &str) -> Result<Self> {
        let scratch = tempfile::Builder::new().prefix("gmonth-").tempdir()?;
        info!(url, dest = %scratch.path().display(), "cloning repository");

        let mut prepare = gix::prepare_clone_bare(url, scratch.path())?;
        let (repo, _outcome) =
            prepare.fetch_only(gix::progress::Discard, &AtomicBool::new(false))?;
        let path = repo.path().to_path_buf();

        Ok(Self {
            repo,
            path,
            listing: FileListing::default(),
            _scratch: Some(scratch),
        })
    }

    pub fn with_listing(mut self, listing: FileListing) -> Self {
        self.listing = listing;
        self
    }

    pub fn listing(&self) -> FileListing {
        self.listing
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn author_time(&self, commit: &gix::Commit<'_>) -> std::result::Result<DateTime<FixedOffset>, CollectionError> {
        let id = commit.id;
        let author = commit
            .author()
            .map_err(|e| CollectionError::unreadable(id, e))?;
        let time = author
            .time()
            .map_err(|e| CollectionError::unreadable(id, e))?;
        author_local_time(time.seconds, time.offset)
            .ok_or_else(|| CollectionError::unreadable(id, format!("invalid timestamp {} {:+}", time.seconds, time.offset)))
    }

    fn tree_paths(&self, commit: &gix::Commit<'_>) -> std::result::Result<Vec<String>, CollectionError> {
        let id = commit.id;
        let tree = commit
            .tree()
            .map_err(|e| CollectionError::unreadable(id, e))?;

        let mut recorder = Recorder::default();
        tree.traverse()
            .breadthfirst(&mut recorder)
            .map_err(|e| CollectionError::unreadable(id, e))?;

        Ok(recorder
            .records
            .into_iter()
            .filter(|entry| !entry.mode.is_tree() && !entry.mode.is_commit())
            .map(|entry| entry.filepath.to_string())
            .collect())
    }

    fn changed_paths(&self, commit: &gix::Commit<'_>) -> std::result::Result<Vec<String>, CollectionError> {
        let id = commit.id;
        let commit_tree = commit
            .tree()
            .map_err(|e| CollectionError::unreadable(id, e))?;

        let parent_tree = match commit.parent_ids().next() {
            Some(parent_id) => {
                let parent = self
                    .repo
                    .find_commit(parent_id)
                    .map_err(|e| CollectionError::unreadable(id, e))?;
                Some(parent.tree().map_err(|e| CollectionError::unreadable(id, e))?)
            }
            None => None,
        };

        let changes: Vec<ChangeDetached> = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)
            .map_err(|e| CollectionError::unreadable(id, e))?;

        let mut paths = Vec::new();
        let mut seen = HashSet::new();
        for change in changes {
            for path in changed_locations(change) {
                if seen.insert(path.clone()) {
                    paths.push(path);
                }
            }
        }
        Ok(paths)
    }
}

/// `offset` is in seconds east of UTC, as git records it.
fn author_local_time(seconds: i64, offset: i32) -> Option<DateTime<FixedOffset>> {
    let tz = FixedOffset::east_opt(offset)?;
    DateTime::from_timestamp(seconds, 0).map(|utc| utc.with_timezone(&tz))
}

fn changed_locations(change: ChangeDetached) -> Vec<String> {
    match change {
        ChangeDetached::Addition { location, entry_mode, .. }
        | ChangeDetached::Deletion { location, entry_mode, .. }
        | ChangeDetached::Modification { location, entry_mode, .. } => {
            if entry_mode.is_tree() || entry_mode.is_commit() {
                Vec::new()
            } else {
                vec![location.to_string()]
            }
        }
        ChangeDetached::Rewrite {
            source_location,
            location,
            entry_mode,
            copy,
            ..
        } => {
            if entry_mode.is_tree() || entry_mode.is_commit() {
                Vec::new()
            } else if copy {
                vec![location.to_string()]
            } else {
                vec![source_location.to_string(), location.to_string()]
            }
        }
    }
}

impl HistorySource for GitRepo {
    type CommitId = ObjectId;

    fn resolve_head(&self) -> std::result::Result<ObjectId, CollectionError> {
        let head = self
            .repo
            .head_id()
            .map_err(|e| CollectionError::HeadUnresolvable(e.to_string()))?;
        Ok(head.detach())
    }

    fn log_from(&self, head: ObjectId) -> std::result::Result<CommitLog<'_, ObjectId>, CollectionError> {
        self.repo
            .find_commit(head)
            .map_err(|e| CollectionError::LogUnavailable(format!("{head}: {e}")))?;
        Ok(Box::new(CommitWalk::new(&self.repo, head)))
    }

    fn files_touched(&self, id: &ObjectId) -> std::result::Result<Vec<CommitEvent>, CollectionError> {
        let commit = self
            .repo
            .find_commit(*id)
            .map_err(|e| CollectionError::unreadable(id, e))?;
        let timestamp = self.author_time(&commit)?;

        let paths = match self.listing {
            FileListing::Tree => self.tree_paths(&commit)?,
            FileListing::Changed => self.changed_paths(&commit)?,
        };

        Ok(paths
            .into_iter()
            .map(|path| CommitEvent::new(path, timestamp))
            .collect())
    }
}

/// Depth-first walk over every parent, visiting each commit once.
pub struct CommitWalk<'repo> {
    repo: &'repo Repository,
    stack: Vec<ObjectId>,
    seen: HashSet<ObjectId>,
}

impl<'repo> CommitWalk<'repo> {
    pub fn new(repo: &'repo Repository, head: ObjectId) -> Self {
        Self {
            repo,
            stack: vec![head],
            seen: HashSet::new(),
        }
    }
}

impl Iterator for CommitWalk<'_> {
    type Item = std::result::Result<ObjectId, CollectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(commit_id) = self.stack.pop() {
            if !self.seen.insert(commit_id) {
                continue;
            }

            let commit = match self.repo.find_commit(commit_id) {
                Ok(commit) => commit,
                Err(e) => {
                    self.stack.clear();
                    return Some(Err(CollectionError::unreadable(commit_id, e)));
                }
            };

            for pid in commit.parent_ids() {
                let pid = pid.detach();
                if !self.seen.contains(&pid) {
                    self.stack.push(pid);
                }
            }

            return Some(Ok(commit_id));
        }
        None
    }
}
