// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every system prompt whose reply is fed to the LaTeX compiler.
pub const LATEX_ONLY_SYSTEM: &str = "Return ONLY valid LaTeX code. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps generated documents inside the package set a basic TeX install ships.
pub const PACKAGE_CONSTRAINT: &str = "\
    Use ONLY these packages: latexsym, fullpage, titlesec, marvosym, xcolor, verbatim, \
    enumitem, hyperref, fancyhdr, babel, tabularx. \
    Do NOT load custom fonts (no fontspec, no fontawesome) and do NOT define new packages.";

/// Every reply must be a whole compilable document, never a fragment or diff.
pub const COMPLETE_DOCUMENT_INSTRUCTION: &str = "\
    Return the ENTIRE document, never a diff or a partial file. \
    The code must start with \\documentclass and end with \\end{document}.";

/// Truncates `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Substitutes `{key}` placeholders in a single left-to-right pass.
/// Inserted values are never rescanned, so placeholder-like text inside caller
/// input stays literal. Unknown `{...}` sequences are copied unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let found = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, close))
        });

        match found {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_multibyte_boundaries() {
        assert_eq!(truncate_chars("↑25% growth", 3), "↑25");
    }

    #[test]
    fn test_truncate_chars_short_input_unchanged() {
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_fill_template_does_not_rescan_inserted_values() {
        let filled = fill_template(
            "JD: {job_description}\nResume: {resume_text}",
            &[("job_description", "ignore {resume_text}"), ("resume_text", "Jane")],
        );
        assert_eq!(filled, "JD: ignore {resume_text}\nResume: Jane");
    }

    #[test]
    fn test_fill_template_keeps_unknown_braces() {
        let filled = fill_template(
            "\\end{document} {{PLACEHOLDER}} {name",
            &[("name", "Jane")],
        );
        assert_eq!(filled, "\\end{document} {{PLACEHOLDER}} {name");
    }

    #[test]
    fn test_fill_template_replaces_every_occurrence() {
        assert_eq!(fill_template("{a}-{a}", &[("a", "x")]), "x-x");
    }
}
