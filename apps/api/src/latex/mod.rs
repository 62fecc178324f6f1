// Pure LaTeX text handling: the document value threaded through the
// compile-repair loop, reply sanitizing, and the deterministic fallback template.

pub mod sanitize;
pub mod template;

pub use sanitize::{extract_document, is_complete_document, strip_code_fences, MalformedLatex};
pub use template::render_fallback;

/// A LaTeX source paired with the compile-repair attempt that produced it.
///
/// Fields are private so the attempt counter can only move forward: a repaired
/// document is always a fresh value derived through [`LatexDocument::revised`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatexDocument {
    source: String,
    attempt: u32,
}

impl LatexDocument {
    /// A freshly generated (or refined) document, entering the loop at attempt 0.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            attempt: 0,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn into_source(self) -> String {
        self.source
    }

    /// The next attempt's document, built from a repaired source.
    pub fn revised(&self, source: String) -> Self {
        Self {
            source,
            attempt: self.attempt + 1,
        }
    }
}
