pub mod log;
pub mod repo;

pub use log::{CommitSource, GitLog};
pub use repo::GitRepo;
