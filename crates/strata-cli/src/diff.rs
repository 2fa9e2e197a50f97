//! Line diff between two rendered documents.
//!
//! Uses `similar` (Myers) with three lines of context per hunk.

use colored::Colorize;
use similar::{ChangeTag, TextDiff};

/// A single line in a rendered diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiffLine {
    /// Start of a hunk, `@@ -old +new @@`.
    Header(String),
    Context(String),
    Added(String),
    Removed(String),
}

/// Diff `old` against `new`. Identical inputs produce no lines.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let text_diff = TextDiff::from_lines(old, new);
    let mut lines = Vec::new();

    for hunk in text_diff.grouped_ops(3) {
        let (Some(first), Some(last)) = (hunk.first(), hunk.last()) else {
            continue;
        };
        lines.push(DiffLine::Header(format!(
            "@@ -{},{} +{},{} @@",
            first.old_range().start + 1,
            last.old_range().end - first.old_range().start,
            first.new_range().start + 1,
            last.new_range().end - first.new_range().start,
        )));

        for op in &hunk {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                lines.push(match change.tag() {
                    ChangeTag::Equal => DiffLine::Context(text),
                    ChangeTag::Insert => DiffLine::Added(text),
                    ChangeTag::Delete => DiffLine::Removed(text),
                });
            }
        }
    }
    lines
}

/// Print a colored diff to stderr.
pub fn print_diff(lines: &[DiffLine]) {
    if lines.is_empty() {
        eprintln!("{}", "No changes.".dimmed());
        return;
    }
    for line in lines {
        match line {
            DiffLine::Header(h) => eprintln!("{}", h.cyan()),
            DiffLine::Context(l) => eprintln!(" {l}"),
            DiffLine::Added(l) => eprintln!("{}", format!("+{l}").green()),
            DiffLine::Removed(l) => eprintln!("{}", format!("-{l}").red()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_have_no_diff() {
        assert!(diff_lines("a\nb\n", "a\nb\n").is_empty());
    }

    #[test]
    fn single_line_change() {
        let lines = diff_lines("a\nb\nc\n", "a\nB\nc\n");
        assert_eq!(
            lines,
            vec![
                DiffLine::Header("@@ -1,3 +1,3 @@".into()),
                DiffLine::Context("a".into()),
                DiffLine::Removed("b".into()),
                DiffLine::Added("B".into()),
                DiffLine::Context("c".into()),
            ]
        );
    }

    #[test]
    fn pure_addition() {
        let lines = diff_lines("a\n", "a\nb\n");
        assert!(lines.contains(&DiffLine::Added("b".into())));
        assert!(!lines.iter().any(|l| matches!(l, DiffLine::Removed(_))));
    }
}
