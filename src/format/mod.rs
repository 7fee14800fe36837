//! Completion response sanitization
//!
//! Raw model output is rarely insertable as-is: it tends to arrive wrapped
//! in markdown fences and padded with commentary the editor should never
//! see. This module turns it into a plain code fragment indented for the
//! cursor position.

use crate::language::LanguageSpec;

/// What to do with lines that contain nothing but a comment.
///
/// `Strip` is the default: comment-only lines are dropped entirely.
/// `KeepLeading(n)` keeps the first `n` of them, re-prefixed with the
/// language's own comment marker, and drops the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPolicy {
    Strip,
    KeepLeading(usize),
}

impl Default for CommentPolicy {
    fn default() -> Self {
        CommentPolicy::Strip
    }
}

/// Formats raw model output into an insertable code fragment
#[derive(Debug, Clone, Default)]
pub struct CompletionFormatter {
    policy: CommentPolicy,
}

impl CompletionFormatter {
    pub fn new(policy: CommentPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CommentPolicy {
        self.policy
    }

    /// Sanitize `raw` for insertion at a cursor whose line starts with
    /// `cursor_indent`. Returns `None` when nothing insertable remains.
    ///
    /// Line handling:
    /// - markdown fence lines are dropped
    /// - blank lines are preserved
    /// - comment-only lines follow the configured [`CommentPolicy`]
    /// - code lines lose trailing inline comments; lines emptied by that are
    ///   dropped
    /// - code lines with no leading whitespace inherit `cursor_indent`,
    ///   lines with their own indentation keep it
    pub fn format(&self, raw: &str, lang: &LanguageSpec, cursor_indent: &str) -> Option<String> {
        let mut lines: Vec<String> = Vec::new();
        let mut comments_kept = 0usize;

        for line in raw.lines() {
            let trimmed = line.trim();

            if trimmed.starts_with("```") {
                continue;
            }
            if trimmed.is_empty() {
                lines.push(String::new());
                continue;
            }
            if let Some(body) = comment_body(trimmed) {
                if let CommentPolicy::KeepLeading(max) = self.policy {
                    if comments_kept < max {
                        comments_kept += 1;
                        lines.push(format!("{}{} {}", cursor_indent, lang.comment_prefix, body));
                    }
                }
                continue;
            }

            let code = strip_inline_comment(line);
            if code.trim().is_empty() {
                continue;
            }
            if line.starts_with(char::is_whitespace) {
                lines.push(code.trim_end().to_string());
            } else {
                lines.push(format!("{}{}", cursor_indent, code.trim()));
            }
        }

        while lines.first().map_or(false, |l| l.is_empty()) {
            lines.remove(0);
        }
        while lines.last().map_or(false, |l| l.is_empty()) {
            lines.pop();
        }

        if lines.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }
}

/// Text of a comment-only line, with its marker removed
fn comment_body(trimmed: &str) -> Option<&str> {
    trimmed
        .strip_prefix("//")
        .or_else(|| trimmed.strip_prefix('#'))
        .map(str::trim)
}

/// Cut a line at its first inline comment marker
fn strip_inline_comment(line: &str) -> &str {
    match (line.find("//"), line.find('#')) {
        (Some(slash), Some(hash)) => &line[..slash.min(hash)],
        (Some(slash), None) => &line[..slash],
        (None, Some(hash)) => &line[..hash],
        (None, None) => line,
    }
}
