use crate::cache::{Cache, CachedSource};
use crate::cli::CommonArgs;
use crate::collector::collect_with;
use crate::error::CollectionError;
use crate::git::{FileListing, GitRepo};
use crate::model::{FileHistory, FileTimeline};
use crate::source::HistorySource;
use crate::timeline::build_timelines;
use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info, warn};

pub struct Loaded {
    pub repository: String,
    pub listing: FileListing,
    pub timelines: Vec<FileTimeline>,
}

pub fn open_repo(common: &CommonArgs) -> anyhow::Result<GitRepo> {
    let repo = match &common.url {
        Some(url) => GitRepo::clone_url(url).with_context(|| format!("Failed to clone {url}"))?,
        None => GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?,
    };
    Ok(repo.with_listing(common.listing))
}

/// Open the repository, collect its history and bucketize every file.
pub fn load_timelines(common: &CommonArgs, show_progress: bool) -> anyhow::Result<Loaded> {
    let repo = open_repo(common)?;
    let repository = common
        .url
        .clone()
        .unwrap_or_else(|| repo.path().to_string_lossy().to_string());

    let pb = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg} {pos}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Reading commits...");
        pb
    } else {
        ProgressBar::hidden()
    };

    let history = match open_cache(common, &repo) {
        Some(cache) => {
            let source = CachedSource::new(&repo, cache, repo.listing().as_str());
            let history = collect_history(&source, &pb);
            debug!(hits = source.hits(), misses = source.misses(), "cache usage");
            history
        }
        None => collect_history(&repo, &pb),
    };
    pb.finish_and_clear();

    let history = history.context("Failed to collect file history")?;
    let timelines = build_timelines(&history);
    info!(files = timelines.len(), "built timelines");

    Ok(Loaded {
        repository,
        listing: repo.listing(),
        timelines,
    })
}

fn open_cache(common: &CommonArgs, repo: &GitRepo) -> Option<Cache> {
    if common.no_cache || (common.url.is_some() && common.cache.is_none()) {
        return None;
    }
    match Cache::new(common.cache.as_deref(), repo.path()) {
        Ok(cache) => Some(cache),
        Err(e) => {
            warn!(error = %e, "cache unavailable, reading repository directly");
            None
        }
    }
}

fn collect_history<S: HistorySource>(source: &S, pb: &ProgressBar) -> Result<FileHistory, CollectionError> {
    let result = collect_with(source, |_| pb.inc(1));
    match &result {
        Ok(history) => info!(commits = pb.position(), files = history.len(), "collected history"),
        Err(e) => error!(stage = e.stage(), error = %e, "history collection failed"),
    }
    result
}
