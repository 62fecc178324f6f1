//! Post-processing of raw model replies into LaTeX source.
//!
//! Accepted wrappers: an optional leading code fence (```` ``` ````, optionally
//! tagged `latex`, `LaTeX`, `tex` or `TeX`) and an optional trailing fence.
//! Anything else around the document is a rejection.

use thiserror::Error;

pub const DOCUMENT_START: &str = "\\documentclass";
pub const DOCUMENT_END: &str = "\\end{document}";

const FENCE: &str = "```";
/// Longest tags first so `latex` is not half-matched as `la...`.
const FENCE_LANGUAGE_TAGS: [&str; 4] = ["latex", "LaTeX", "tex", "TeX"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedLatex {
    #[error("model reply is empty")]
    Empty,

    #[error("model reply does not start with \\documentclass")]
    MissingDocumentClass,

    #[error("model reply does not end with \\end{{document}}")]
    MissingEndDocument,
}

/// Removes surrounding whitespace and markdown code fences.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        text = FENCE_LANGUAGE_TAGS
            .iter()
            .find_map(|tag| rest.strip_prefix(tag))
            .unwrap_or(rest);
    }

    if let Some(rest) = text.trim_end().strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Strips fences and checks the document envelope. The single rejection path
/// callers react to with their fallback policy.
pub fn extract_document(raw: &str) -> Result<String, MalformedLatex> {
    let text = strip_code_fences(raw);

    if text.is_empty() {
        return Err(MalformedLatex::Empty);
    }
    if !text.starts_with(DOCUMENT_START) {
        return Err(MalformedLatex::MissingDocumentClass);
    }
    if !text.ends_with(DOCUMENT_END) {
        return Err(MalformedLatex::MissingEndDocument);
    }

    Ok(text.to_string())
}

pub fn is_complete_document(source: &str) -> bool {
    let source = source.trim();
    source.starts_with(DOCUMENT_START) && source.ends_with(DOCUMENT_END)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\\documentclass{article}\n\\begin{document}\nHi\n\\end{document}";

    #[test]
    fn test_plain_document_accepted() {
        assert_eq!(extract_document(DOC).unwrap(), DOC);
    }

    #[test]
    fn test_latex_tagged_fence_stripped() {
        let raw = format!("```latex\n{DOC}\n```");
        assert_eq!(extract_document(&raw).unwrap(), DOC);
    }

    #[test]
    fn test_tex_tagged_fence_stripped() {
        let raw = format!("```tex\n{DOC}\n```\n");
        assert_eq!(extract_document(&raw).unwrap(), DOC);
    }

    #[test]
    fn test_untagged_fence_stripped() {
        let raw = format!("```\n{DOC}```");
        assert_eq!(extract_document(&raw).unwrap(), DOC);
    }

    #[test]
    fn test_leading_prose_rejected() {
        let raw = format!("Here is your tailored resume:\n{DOC}");
        assert_eq!(
            extract_document(&raw),
            Err(MalformedLatex::MissingDocumentClass)
        );
    }

    #[test]
    fn test_truncated_document_rejected() {
        let raw = "\\documentclass{article}\n\\begin{document}\nHalf a resu";
        assert_eq!(
            extract_document(raw),
            Err(MalformedLatex::MissingEndDocument)
        );
    }

    #[test]
    fn test_trailing_commentary_rejected() {
        let raw = format!("{DOC}\n\nLet me know if you want changes!");
        assert_eq!(
            extract_document(&raw),
            Err(MalformedLatex::MissingEndDocument)
        );
    }

    #[test]
    fn test_empty_and_fence_only_rejected() {
        assert_eq!(extract_document("   "), Err(MalformedLatex::Empty));
        assert_eq!(extract_document("```latex\n```"), Err(MalformedLatex::Empty));
    }

    #[test]
    fn test_strip_code_fences_leaves_unfenced_text() {
        assert_eq!(strip_code_fences("  \\section{A}  "), "\\section{A}");
    }
}
