//! Deterministic fallback document built from parsed resume fields.
//!
//! Used whenever the generator cannot obtain a well-formed document from the
//! LLM. The template only loads packages a basic TeX install ships with, and
//! every interpolated value is escaped, so the result is always a complete
//! document that has a good chance of compiling.

use crate::latex::LatexDocument;
use crate::parsing::ContactInfo;

const RESUME_TEMPLATE: &str = include_str!("../../templates/resume.tex");

pub const DEFAULT_NAME: &str = "Professional Candidate";
pub const DEFAULT_EMAIL: &str = "email@example.com";
pub const DEFAULT_PHONE: &str = "(555) 123-4567";

const EMPTY_BODY: &str = "Resume content unavailable.";

/// The reference template, also shown to the model as the structure to follow.
pub fn resume_template() -> &'static str {
    RESUME_TEMPLATE
}

/// Fills the template placeholders from the contact fields and raw resume text.
pub fn render_fallback(resume_text: &str, contact: &ContactInfo) -> LatexDocument {
    let name = contact.name.as_deref().unwrap_or(DEFAULT_NAME);
    let email = contact.email.as_deref().unwrap_or(DEFAULT_EMAIL);
    let phone = contact.phone.as_deref().unwrap_or(DEFAULT_PHONE);

    let source = RESUME_TEMPLATE
        .replace("{{FULL_NAME}}", &escape_latex(name))
        .replace("{{EMAIL}}", &escape_latex(email))
        .replace("{{PHONE}}", &escape_latex(phone))
        .replace("{{BODY}}", &render_body(resume_text));

    LatexDocument::new(source.trim_end().to_string())
}

/// Lays the resume text out as paragraphs: blank lines separate paragraphs,
/// other line breaks become forced breaks.
fn render_body(resume_text: &str) -> String {
    let mut paragraphs: Vec<Vec<String>> = vec![Vec::new()];

    for line in resume_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if paragraphs.last().is_some_and(|p| !p.is_empty()) {
                paragraphs.push(Vec::new());
            }
            continue;
        }
        let escaped = escape_latex(line);
        if escaped.is_empty() {
            continue;
        }
        if let Some(current) = paragraphs.last_mut() {
            current.push(escaped);
        }
    }

    let body = paragraphs
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(|p| p.join(" \\\\\n"))
        .collect::<Vec<_>>()
        .join("\n\n");

    if body.is_empty() {
        EMPTY_BODY.to_string()
    } else {
        body
    }
}

/// Escapes LaTeX special characters. Typographic punctuation is mapped to its
/// LaTeX spelling; other characters outside Latin-1 are dropped since pdflatex
/// has no glyphs for them without extra packages.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '<' => out.push_str("\\textless{}"),
            '>' => out.push_str("\\textgreater{}"),
            '|' => out.push_str("\\textbar{}"),
            '•' | '●' | '▪' => out.push_str("\\textbullet{}"),
            '–' => out.push_str("--"),
            '—' => out.push_str("---"),
            '‘' | '’' => out.push('\''),
            '“' => out.push_str("``"),
            '”' => out.push_str("''"),
            '\t' => out.push(' '),
            c if c.is_ascii() && !c.is_ascii_control() => out.push(c),
            c if ('\u{00A0}'..='\u{00FF}').contains(&c) => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}
