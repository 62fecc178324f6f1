use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize, Serializer};

use crate::render::compiler::INSTALL_INSTRUCTIONS;
use crate::render::diagnostics::CompileErrorKind;
use crate::render::{LoopOutcome, RepairReport};

/// Input for a first-time enhancement. Immutable once built.
#[derive(Debug, Clone, Deserialize)]
pub struct EnhancementRequest {
    pub resume_text: String,
    pub job_description: String,
}

/// Follow-up edit of a previously returned document. The caller always
/// supplies the prior artifact; nothing is looked up server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct RefinementRequest {
    pub latex_code: String,
    pub feedback: String,
    #[serde(default)]
    pub job_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PdfStatus {
    Compiled,
    /// Repair budget spent; LaTeX only.
    CompileFailed,
    /// No usable compiler on this host; LaTeX only.
    Unavailable,
    /// Refinement failed before any compile was attempted.
    NotAttempted,
}

/// What every enhancement and refinement call returns. Always well-formed,
/// whatever failed underneath.
#[derive(Debug, Clone, Serialize)]
pub struct EnhancementResult {
    pub success: bool,
    pub latex_code: String,
    #[serde(rename = "pdf_base64", serialize_with = "serialize_pdf")]
    pub pdf_bytes: Option<Vec<u8>>,
    pub suggestions: Vec<String>,
    pub error: Option<String>,
    pub pdf_status: PdfStatus,
    pub compile_attempts: u32,
    /// LLM repair calls spent by the compile-repair loop.
    pub repair_attempts: u32,
    /// Class of the last compile failure when no PDF was produced.
    pub error_kind: Option<CompileErrorKind>,
    /// What to try next when the PDF is missing.
    pub error_hints: Vec<String>,
}

impl EnhancementResult {
    /// Maps a finished compile-repair loop onto the result. Every loop outcome
    /// is a success: exhausted and unavailable compilers degrade to LaTeX only.
    pub fn from_report(report: RepairReport, suggestions: Vec<String>) -> Self {
        let compile_attempts = report.compile_calls;
        let repair_attempts = report.repair_calls;
        let latex_code = report.document.into_source();

        let (pdf_bytes, error, pdf_status, error_kind, error_hints) = match report.outcome {
            LoopOutcome::Compiled { pdf_bytes } => {
                (Some(pdf_bytes), None, PdfStatus::Compiled, None, Vec::new())
            }
            LoopOutcome::Exhausted { last_error, kind } => (
                None,
                Some(last_error),
                PdfStatus::CompileFailed,
                Some(kind),
                owned_hints(kind.fix_hints()),
            ),
            LoopOutcome::CompilerUnavailable { reason } => (
                None,
                Some(format!("{reason}. Only the LaTeX source is available.")),
                PdfStatus::Unavailable,
                None,
                owned_hints(&INSTALL_INSTRUCTIONS),
            ),
        };

        Self {
            success: true,
            latex_code,
            pdf_bytes,
            suggestions,
            error,
            pdf_status,
            compile_attempts,
            repair_attempts,
            error_kind,
            error_hints,
        }
    }

    /// A refinement that could not be applied: the caller's document comes
    /// back byte-for-byte.
    pub fn refinement_failed(original_latex: String, error: String) -> Self {
        Self {
            success: false,
            latex_code: original_latex,
            pdf_bytes: None,
            suggestions: Vec::new(),
            error: Some(error),
            pdf_status: PdfStatus::NotAttempted,
            compile_attempts: 0,
            repair_attempts: 0,
            error_kind: None,
            error_hints: Vec::new(),
        }
    }
}

fn owned_hints(hints: &[&str]) -> Vec<String> {
    hints.iter().map(|h| h.to_string()).collect()
}

fn serialize_pdf<S: Serializer>(pdf: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match pdf {
        Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
        None => serializer.serialize_none(),
    }
}
