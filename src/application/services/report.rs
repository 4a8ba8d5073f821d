//! Dependency tree report service
//!
//! Locates the tree printed by `mvn -B dependency:tree` inside a build log and
//! rebuilds it as a forest.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, enabled, instrument, Level};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{DependencyNode, TreeBuilder, TreeNodeConvert};
use crate::infrastructure::traits::FileSystem;

/// Lines strictly between the start marker line and the separator line.
///
/// Returns None if no line starts with `start_marker`. A missing separator
/// extends the section to the end of the text.
pub fn extract_tree_section<'a>(
    text: &'a str,
    start_marker: &str,
    separator: &str,
) -> Option<Vec<&'a str>> {
    let mut lines = text.lines();
    lines.by_ref().find(|line| line.starts_with(start_marker))?;
    Some(
        lines
            .take_while(|line| !line.starts_with(separator))
            .collect(),
    )
}

/// Service turning report files into dependency forests.
pub struct ReportService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ReportService {
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Read a report file and rebuild its dependency forest.
    #[instrument(level = "debug", skip(self))]
    pub fn load_forest(&self, report: &Path) -> ApplicationResult<Vec<DependencyNode>> {
        let text = self
            .fs
            .read_to_string(report)
            .with_path_context("read dependency tree", report)?;
        self.parse(&text, report)
    }

    /// Rebuild the forest from report text; `source` is only used in errors.
    pub fn parse(&self, text: &str, source: &Path) -> ApplicationResult<Vec<DependencyNode>> {
        let report = &self.settings.report;
        let section = extract_tree_section(text, &report.start_marker, &report.separator)
            .ok_or_else(|| ApplicationError::SectionNotFound {
                marker: report.start_marker.clone(),
                path: source.to_path_buf(),
            })?;
        debug!("tree section has {} lines", section.len());

        let lines = section
            .into_iter()
            .map(|line| strip_line_prefix(line, &report.line_prefix))
            .filter(|line| !line.is_empty());
        let forest = TreeBuilder::build(lines, self.settings.strict_indentation)?;

        if enabled!(Level::DEBUG) {
            debug!("#################### dependency tree ####################");
            for root in &forest {
                debug!("\n{}", root.to_tree_string());
            }
        }
        Ok(forest)
    }
}

/// Trim a report line and remove the log level prefix.
fn strip_line_prefix<'a>(line: &'a str, prefix: &str) -> &'a str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix(prefix)
        .or_else(|| trimmed.strip_prefix(prefix.trim_end()))
        .unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: &str = "[INFO] io.xc5:xvsa-maven-plugin:maven-plugin";
    const SEPARATOR: &str = "[INFO] ------";

    #[test]
    fn given_report_when_extract_then_returns_lines_between_markers() {
        let text = "\
[INFO] Scanning for projects...
[INFO] io.xc5:xvsa-maven-plugin:maven-plugin:1.0
[INFO] +- a
[INFO] \\- b
[INFO] ------------------------------------------------------------------------
[INFO] BUILD SUCCESS
";
        let section = extract_tree_section(text, START, SEPARATOR).unwrap();
        assert_eq!(section, vec!["[INFO] +- a", "[INFO] \\- b"]);
    }

    #[test]
    fn given_no_separator_when_extract_then_runs_to_end() {
        let text = "[INFO] io.xc5:xvsa-maven-plugin:maven-plugin\n[INFO] +- a\n";
        let section = extract_tree_section(text, START, SEPARATOR).unwrap();
        assert_eq!(section, vec!["[INFO] +- a"]);
    }

    #[test]
    fn given_no_start_marker_when_extract_then_none() {
        let text = "[INFO] +- a\n[INFO] ------\n";
        assert!(extract_tree_section(text, START, SEPARATOR).is_none());
    }

    #[test]
    fn given_prefixed_lines_when_strip_then_keeps_indentation() {
        assert_eq!(
            strip_line_prefix("[INFO] |  \\- g:a:jar:1:compile  ", "[INFO] "),
            "|  \\- g:a:jar:1:compile"
        );
        assert_eq!(strip_line_prefix("[INFO]   \n", "[INFO] "), "");
        assert_eq!(
            strip_line_prefix("+- g:a:jar:1:compile", "[INFO] "),
            "+- g:a:jar:1:compile"
        );
    }
}
