pub mod format;
pub mod writer;

pub use format::{format_commits, render_report};
pub use writer::ReportWriter;
