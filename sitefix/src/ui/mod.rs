//! Terminal presentation: themes, status messages, summaries and diffs.

pub mod diff_viewer;
pub mod output_format;
pub mod summary;
pub mod theme;
