use crate::error::{DigestError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A validated repository location.
pub struct GitRepo {
    path: PathBuf,
    name: String,
}

impl GitRepo {
    /// Open the repository rooted exactly at `path`.
    ///
    /// Parent directories are not searched: pointing at a subdirectory of a
    /// work tree is treated the same as pointing at a plain directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let requested = path.as_ref();
        let not_found = || DigestError::RepositoryNotFound {
            path: requested.display().to_string(),
        };

        if !requested.is_dir() {
            return Err(not_found());
        }

        let repo = gix::open(requested).map_err(|e| {
            debug!(path = %requested.display(), error = %e, "gix refused to open repository");
            not_found()
        })?;

        let root = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        let path = std::fs::canonicalize(&root)?;
        let name = repository_name(&path).ok_or_else(not_found)?;

        Ok(Self { path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Whether the repository at `path` has no commits on its current branch.
///
/// Answered from the repository itself rather than from git's localised error
/// output. A path gix cannot open is reported as not unborn, leaving the
/// error to whoever runs git next.
pub fn head_is_unborn(path: &Path) -> bool {
    match gix::open(path) {
        Ok(repo) => repo.head().map(|head| head.is_unborn()).unwrap_or(false),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "could not inspect HEAD");
            false
        }
    }
}

/// Last path component, with a bare repository's `.git` suffix dropped.
fn repository_name(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_string_lossy();
    let name = file_name.strip_suffix(".git").unwrap_or(&file_name);
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn name_is_last_component() {
        assert_eq!(repository_name(Path::new("/src/my-project")).as_deref(), Some("my-project"));
        assert_eq!(repository_name(Path::new("/srv/git/tools.git")).as_deref(), Some("tools"));
        assert_eq!(repository_name(Path::new("/")), None);
    }

    #[test]
    fn fresh_repository_has_unborn_head() {
        let dir = tempfile::tempdir().unwrap();
        gix::init(dir.path()).unwrap();
        assert!(head_is_unborn(dir.path()));
    }

    #[test]
    fn plain_directory_has_no_unborn_head() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!head_is_unborn(dir.path()));
    }

    #[test]
    fn plain_directory_is_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitRepo::open(dir.path()).err().unwrap();
        assert!(matches!(err, DigestError::RepositoryNotFound { .. }));
    }

    #[test]
    fn missing_directory_is_not_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitRepo::open(dir.path().join("nope")).err().unwrap();
        assert!(matches!(err, DigestError::RepositoryNotFound { .. }));
    }
}
