use crate::config::Settings;
use crate::model::{CommitRecord, Report};
use std::fmt::Write;

/// Matches git's default `--date` rendering, e.g. `Mon Jan 1 10:00:00 2024 +0000`.
const GIT_DATE_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";
const RULE_WIDTH: usize = 80;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Render commits as one line each under a `Repository:` header.
///
/// The output ends with a blank line and is header-only when there are no
/// commits.
pub fn format_commits(repository: &str, commits: &[CommitRecord]) -> String {
    let mut out = format!("Repository: {repository}\n");
    for c in commits {
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "{} | {} | {} | {}",
            c.hash,
            c.author,
            c.timestamp.format(GIT_DATE_FORMAT),
            c.message
        );
    }
    out.push('\n');
    out
}

/// Render the full report file body.
pub fn render_report(timestamp: &str, report: &Report, settings: &Settings) -> String {
    let mut out = format!("Timestamp: {timestamp}\n{}\n\n", rule());
    out.push_str(&report.commit_text);

    if let Some(summary) = &report.summary_text {
        let _ = write!(
            out,
            "{rule}\nSummary\nModel Used: {model}\nPrompt Used:\n{system}\n\n{user}\n{rule}\n\n{summary}\n",
            rule = rule(),
            model = settings.model,
            system = settings.system_prompt,
            user = settings.user_prompt,
        );
    } else if let Some(reason) = &report.summary_warning {
        let _ = writeln!(out, "Summary unavailable: {reason}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    fn commit(hash: &str, author: &str, date: &str, message: &str) -> CommitRecord {
        CommitRecord {
            hash: hash.to_string(),
            author: author.to_string(),
            timestamp: DateTime::parse_from_rfc3339(date).unwrap(),
            message: message.to_string(),
        }
    }

    fn sample() -> Vec<CommitRecord> {
        vec![
            commit("a1b2", "Jane", "2024-01-01T10:00:00+00:00", "fix bug"),
            commit("c3d4", "Jane", "2024-01-02T10:00:00+00:00", "add feature"),
        ]
    }

    #[test]
    fn formats_one_line_per_commit() {
        let text = format_commits("/work/demo", &sample());
        assert_eq!(
            text,
            "Repository: /work/demo\n\
             a1b2 | Jane | Mon Jan 1 10:00:00 2024 +0000 | fix bug\n\
             c3d4 | Jane | Tue Jan 2 10:00:00 2024 +0000 | add feature\n\
             \n"
        );
    }

    #[test]
    fn empty_history_is_header_only() {
        assert_eq!(format_commits("demo", &[]), "Repository: demo\n\n");
    }

    #[test]
    fn formatting_is_deterministic() {
        let commits = sample();
        assert_eq!(format_commits("demo", &commits), format_commits("demo", &commits));
    }

    #[test]
    fn keeps_author_offset() {
        let c = commit("e5f6", "Ana", "2024-03-10T23:15:00-05:00", "late fix");
        let text = format_commits("demo", &[c]);
        assert!(text.contains("Sun Mar 10 23:15:00 2024 -0500"));
    }

    #[test]
    fn report_without_summary_has_no_summary_section() {
        let report = Report::new(format_commits("demo", &sample()));
        let body = render_report("2024-01-03_12-00-00", &report, &Settings::default());
        assert!(body.starts_with("Timestamp: 2024-01-03_12-00-00\n"));
        assert!(body.contains("a1b2 | Jane"));
        assert!(!body.contains("Summary"));
    }

    #[test]
    fn report_with_summary_records_model_and_prompt() {
        let mut report = Report::new(format_commits("demo", &sample()));
        report.summary_text = Some("Two changes by Jane.".to_string());
        let settings = Settings::default().with_model(Some("test-model".into()));
        let body = render_report("ts", &report, &settings);
        assert!(body.contains("Model Used: test-model"));
        assert!(body.contains(&settings.system_prompt));
        assert!(body.ends_with("Two changes by Jane.\n"));
        assert!(body.find("fix bug").unwrap() < body.find("Summary").unwrap());
    }

    #[test]
    fn failed_summary_leaves_a_notice() {
        let mut report = Report::new(format_commits("demo", &sample()));
        report.summary_warning = Some("API key is not configured".to_string());
        let body = render_report("ts", &report, &Settings::default());
        assert!(body.ends_with("Summary unavailable: API key is not configured\n"));
    }
}
