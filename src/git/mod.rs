mod repo;

pub use repo::{CommitWalk, FileListing, GitRepo};
