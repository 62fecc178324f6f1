//! Compiler log analysis. Turns a pdflatex log into a short, human-readable
//! summary for the caller. The full log only ever goes to the repair prompt.

use serde::Serialize;

use crate::render::compiler::TIMEOUT_MARKER;

const MAX_SUMMARY_LINES: usize = 5;
const MAX_LINE_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompileErrorKind {
    UndefinedCommand,
    SyntaxError,
    PackageError,
    FontError,
    Timeout,
    General,
}

impl CompileErrorKind {
    pub fn description(self) -> &'static str {
        match self {
            CompileErrorKind::UndefinedCommand => "LaTeX command not recognized",
            CompileErrorKind::SyntaxError => "LaTeX syntax error (missing delimiters)",
            CompileErrorKind::PackageError => "LaTeX package error",
            CompileErrorKind::FontError => "Font not found",
            CompileErrorKind::Timeout => "Compilation timed out",
            CompileErrorKind::General => "LaTeX compilation error",
        }
    }

    /// Next steps for whoever edits the returned source by hand.
    pub fn fix_hints(self) -> &'static [&'static str] {
        match self {
            CompileErrorKind::UndefinedCommand => &[
                "Check LaTeX command syntax",
                "Verify every command's package is loaded in the preamble",
            ],
            CompileErrorKind::SyntaxError => &[
                "Check for unbalanced braces and missing $ delimiters",
                "Escape special characters such as %, & and _",
            ],
            CompileErrorKind::PackageError => &[
                "Remove packages that a basic TeX install does not ship",
                "Install the missing package with tlmgr",
            ],
            CompileErrorKind::FontError => &[
                "Drop custom fonts and use the default Computer Modern font",
            ],
            CompileErrorKind::Timeout => &[
                "Simplify the document; very long tables or loops can stall pdflatex",
            ],
            CompileErrorKind::General => &[
                "Check LaTeX syntax and spacing",
                "Verify the template is valid",
                "Try a simpler LaTeX template first",
            ],
        }
    }
}

pub fn classify(log: &str) -> CompileErrorKind {
    let lower = log.to_lowercase();

    if log.starts_with(TIMEOUT_MARKER) {
        CompileErrorKind::Timeout
    } else if lower.contains("! undefined control sequence") {
        CompileErrorKind::UndefinedCommand
    } else if lower.contains("! missing") {
        CompileErrorKind::SyntaxError
    } else if lower.contains("! package") || lower.contains(".sty' not found") {
        CompileErrorKind::PackageError
    } else if lower.contains("font") && (lower.contains("not found") || lower.contains("error")) {
        CompileErrorKind::FontError
    } else {
        CompileErrorKind::General
    }
}

/// Lines TeX flags as errors (`! ...`). Falls back to any line mentioning
/// "error" when the log has no `!` lines.
pub fn error_lines(log: &str) -> Vec<&str> {
    let bang: Vec<&str> = log
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with('!'))
        .collect();
    if !bang.is_empty() {
        return bang;
    }

    log.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && l.to_lowercase().contains("error"))
        .collect()
}

/// One-line summary: the error class plus the first few flagged lines.
pub fn summarize(log: &str) -> String {
    let kind = classify(log);
    if kind == CompileErrorKind::Timeout {
        return log.lines().next().unwrap_or(kind.description()).to_string();
    }

    let lines: Vec<String> = error_lines(log)
        .into_iter()
        .take(MAX_SUMMARY_LINES)
        .map(|l| l.chars().take(MAX_LINE_CHARS).collect())
        .collect();

    if lines.is_empty() {
        kind.description().to_string()
    } else {
        format!("{}: {}", kind.description(), lines.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNDEFINED_LOG: &str = "This is pdfTeX, Version 3.141592653\n\
        (./resume.tex\n\
        ! Undefined control sequence.\n\
        l.42 \\resumeItm\n\
        {Built things}\n";

    #[test]
    fn test_classify_undefined_command() {
        assert_eq!(classify(UNDEFINED_LOG), CompileErrorKind::UndefinedCommand);
    }

    #[test]
    fn test_classify_missing_package() {
        let log = "! LaTeX Error: File `fontawesome5.sty' not found.";
        assert_eq!(classify(log), CompileErrorKind::PackageError);
    }

    #[test]
    fn test_classify_missing_delimiter() {
        assert_eq!(classify("! Missing } inserted."), CompileErrorKind::SyntaxError);
    }

    #[test]
    fn test_classify_timeout() {
        let log = format!("{TIMEOUT_MARKER} after 60s; the compiler process was killed.");
        assert_eq!(classify(&log), CompileErrorKind::Timeout);
        assert_eq!(summarize(&log), log);
    }

    #[test]
    fn test_summary_contains_bang_lines_only() {
        let summary = summarize(UNDEFINED_LOG);
        assert_eq!(
            summary,
            "LaTeX command not recognized: ! Undefined control sequence."
        );
    }

    #[test]
    fn test_summary_caps_line_count() {
        let log = "! one\n! two\n! three\n! four\n! five\n! six\n! seven";
        let summary = summarize(log);
        assert!(summary.contains("! five"));
        assert!(!summary.contains("! six"));
    }

    #[test]
    fn test_summary_falls_back_to_error_mentions() {
        let log = "pdflatex: fatal error occurred, no output PDF file produced";
        assert!(summarize(log).contains("fatal error occurred"));
    }

    #[test]
    fn test_every_kind_has_fix_hints() {
        for kind in [
            CompileErrorKind::UndefinedCommand,
            CompileErrorKind::SyntaxError,
            CompileErrorKind::PackageError,
            CompileErrorKind::FontError,
            CompileErrorKind::Timeout,
            CompileErrorKind::General,
        ] {
            assert!(!kind.fix_hints().is_empty(), "{kind:?} has no hints");
        }
        assert_eq!(
            CompileErrorKind::UndefinedCommand.fix_hints()[0],
            "Check LaTeX command syntax"
        );
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(CompileErrorKind::UndefinedCommand).unwrap(),
            "undefined_command"
        );
    }

    #[test]
    fn test_summary_of_empty_log_is_description() {
        assert_eq!(summarize(""), "LaTeX compilation error");
    }
}
