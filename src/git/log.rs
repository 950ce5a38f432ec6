use super::repo::head_is_unborn;
use crate::error::{DigestError, Result};
use crate::model::CommitRecord;
use chrono::DateTime;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

const FIELD_SEPARATOR: char = '\u{1f}';
const LOG_FORMAT: &str = "--pretty=format:%h%x1f%an%x1f%aI%x1f%s";

/// Lists commits for a repository, optionally restricted to some authors.
pub trait CommitSource {
    fn list_commits(&self, repo_path: &Path, authors: &[String]) -> Result<Vec<CommitRecord>>;
}

/// [`CommitSource`] backed by the `git log` subprocess.
pub struct GitLog {
    program: OsString,
}

impl GitLog {
    pub fn new() -> Self {
        Self { program: OsString::from("git") }
    }

    /// Use a different git executable.
    pub fn with_program<S: Into<OsString>>(program: S) -> Self {
        Self { program: program.into() }
    }

    fn command(&self, repo_path: &Path, authors: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        // Keep git's messages untranslated so failures read the same everywhere.
        cmd.env("LC_ALL", "C").env_remove("LANGUAGE");
        // Author names are matched literally, whatever grep.patternType says.
        cmd.arg("-C")
            .arg(repo_path)
            .args(["log", "--no-color", "--fixed-strings", LOG_FORMAT]);
        for author in authors {
            cmd.arg(format!("--author={author}"));
        }
        cmd
    }
}

impl Default for GitLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitSource for GitLog {
    fn list_commits(&self, repo_path: &Path, authors: &[String]) -> Result<Vec<CommitRecord>> {
        if head_is_unborn(repo_path) {
            debug!(path = %repo_path.display(), "repository has no commits yet");
            return Ok(Vec::new());
        }

        let mut cmd = self.command(repo_path, authors);
        debug!(?cmd, "running git log");

        let output = cmd.output().map_err(|e| {
            DigestError::Extraction(format!("could not run {}: {e}", self.program.to_string_lossy()))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_unborn_head(&stderr) {
                debug!("repository has no commits yet");
                return Ok(Vec::new());
            }
            return Err(DigestError::Extraction(format!(
                "git log failed for {} ({}): {}",
                repo_path.display(),
                output.status,
                stderr.trim()
            )));
        }

        parse_log(&String::from_utf8_lossy(&output.stdout))
    }
}

fn is_unborn_head(stderr: &str) -> bool {
    stderr.contains("does not have any commits yet") || stderr.contains("bad default revision 'HEAD'")
}

/// Parse `git log` output produced with [`LOG_FORMAT`].
pub fn parse_log(output: &str) -> Result<Vec<CommitRecord>> {
    let mut commits = Vec::new();
    for (idx, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        commits.push(parse_line(line).map_err(|reason| {
            DigestError::Extraction(format!("unparseable log line {}: {reason}: {line:?}", idx + 1))
        })?);
    }
    trace!(count = commits.len(), "parsed git log");
    Ok(commits)
}

fn parse_line(line: &str) -> std::result::Result<CommitRecord, String> {
    let mut fields = line.splitn(4, FIELD_SEPARATOR);
    let (Some(hash), Some(author), Some(date), Some(message)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err("expected 4 fields".to_string());
    };

    if hash.is_empty() {
        return Err("empty commit hash".to_string());
    }

    let timestamp = DateTime::parse_from_rfc3339(date)
        .map_err(|e| format!("invalid date '{date}': {e}"))?;

    Ok(CommitRecord {
        hash: hash.to_string(),
        author: author.to_string(),
        timestamp,
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ffi::OsStr;

    fn line(hash: &str, author: &str, date: &str, message: &str) -> String {
        [hash, author, date, message].join("\u{1f}")
    }

    #[test]
    fn parses_lines_in_order() {
        let output = format!(
            "{}\n{}\n",
            line("c3d4", "Jane", "2024-01-02T09:30:00+01:00", "add feature"),
            line("a1b2", "Jane", "2024-01-01T10:00:00+00:00", "fix bug"),
        );
        let commits = parse_log(&output).unwrap();
        let hashes: Vec<_> = commits.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["c3d4", "a1b2"]);
        assert_eq!(commits[0].timestamp.offset().local_minus_utc(), 3600);
        assert_eq!(commits[1].message, "fix bug");
    }

    #[test]
    fn empty_output_is_empty_history() {
        assert!(parse_log("").unwrap().is_empty());
        assert!(parse_log("\n\n").unwrap().is_empty());
    }

    #[test]
    fn message_keeps_pipes_and_separators() {
        let output = line("a1b2", "Jane", "2024-01-01T10:00:00+00:00", "fix: a | b \u{1f} c");
        let commits = parse_log(&output).unwrap();
        assert_eq!(commits[0].message, "fix: a | b \u{1f} c");
    }

    #[test]
    fn empty_subject_is_allowed() {
        let output = line("a1b2", "Jane", "2024-01-01T10:00:00+00:00", "");
        assert_eq!(parse_log(&output).unwrap()[0].message, "");
    }

    #[test]
    fn missing_fields_are_extraction_errors() {
        let err = parse_log("a1b2 | Jane | fix bug").unwrap_err();
        assert!(matches!(err, DigestError::Extraction(_)));
    }

    #[test]
    fn bad_dates_are_extraction_errors() {
        let output = line("a1b2", "Jane", "yesterday", "fix bug");
        let err = parse_log(&output).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn one_author_option_per_name() {
        let authors = vec!["Jane".to_string(), "dependabot[bot]".to_string(), "C++ Bot".to_string()];
        let cmd = GitLog::new().command(Path::new("/tmp/repo"), &authors);
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-C",
                "/tmp/repo",
                "log",
                "--no-color",
                "--fixed-strings",
                LOG_FORMAT,
                "--author=Jane",
                "--author=dependabot[bot]",
                "--author=C++ Bot",
            ]
        );
    }

    #[test]
    fn git_runs_untranslated() {
        let cmd = GitLog::new().command(Path::new("/tmp/repo"), &[]);
        let envs: Vec<_> = cmd.get_envs().collect();
        assert!(envs.contains(&(OsStr::new("LC_ALL"), Some(OsStr::new("C")))));
        assert!(envs.contains(&(OsStr::new("LANGUAGE"), None)));
    }

    #[test]
    fn unborn_head_is_empty_without_running_git() {
        let dir = tempfile::tempdir().unwrap();
        gix::init(dir.path()).unwrap();
        // The program does not exist, so reaching git would be an error.
        let source = GitLog::with_program("definitely-not-a-git-binary");
        assert!(source.list_commits(dir.path(), &[]).unwrap().is_empty());
    }

    #[test]
    fn missing_program_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = GitLog::with_program("definitely-not-a-git-binary");
        let err = source.list_commits(dir.path(), &[]).unwrap_err();
        assert!(matches!(err, DigestError::Extraction(_)));
    }

    #[test]
    fn unborn_head_message_is_recognised() {
        assert!(is_unborn_head(
            "fatal: your current branch 'main' does not have any commits yet\n"
        ));
        assert!(!is_unborn_head("fatal: not a git repository"));
    }
}
