//! Compile-repair loop: drives a LaTeX document to a PDF, asking the LLM to
//! fix the source whenever compilation fails.
//!
//! # States
//! `COMPILING → SUCCEEDED` ends the loop with the PDF.
//! `COMPILING → COMPILE_FAILED → REPAIRING → COMPILING` repeats while
//! `attempt < max_attempts`; each repair yields a fresh `LatexDocument` at
//! `attempt + 1`.
//! `COMPILE_FAILED` at `attempt == max_attempts` is `EXHAUSTED`: the last
//! source is kept and reported as a LaTeX-only result.
//!
//! A compiler that cannot run at all ends the loop immediately as
//! `CompilerUnavailable`; repairing the source cannot help there. An I/O error
//! around a single run (temp dir, spawn, pipes) spends one attempt and retries
//! the same source without asking the LLM.
//!
//! # Guarantees
//! - At most `max_attempts` repairs, so at most `max_attempts + 1` compiles.
//! - Strictly sequential: one compile in flight per call.
//! - Repaired output is fence-stripped only. The compiler is the validator.

use std::time::Duration;

use tracing::{info, warn};

use crate::latex::{is_complete_document, strip_code_fences, LatexDocument};
use crate::llm_client::prompts::{
    fill_template, truncate_chars, COMPLETE_DOCUMENT_INSTRUCTION, LATEX_ONLY_SYSTEM,
    PACKAGE_CONSTRAINT,
};
use crate::llm_client::{CallOptions, LlmProvider};
use crate::render::compiler::{CompileOutcome, CompilerError, LatexCompiler};
use crate::render::diagnostics::{self, CompileErrorKind};
use crate::render::prompts::{REPAIR_PROMPT_TEMPLATE, REPAIR_SYSTEM};

/// Low temperature: repairs should be surgical, not creative.
pub const REPAIR_TEMPERATURE: f32 = 0.1;
const REPAIR_MAX_TOKENS: u32 = 4000;
/// The start of the log carries the first (causal) error.
const MAX_ERROR_LOG_CHARS: usize = 2000;

#[derive(Debug, Clone, Copy)]
pub struct RepairPolicy {
    /// Repair budget. Attempt indices run `0..=max_attempts`.
    pub max_attempts: u32,
    pub llm_timeout: Duration,
}

/// Terminal state of one pass through the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    Compiled { pdf_bytes: Vec<u8> },
    /// Every attempt failed. `last_error` is a short summary, not the full log;
    /// `kind` classifies the last failure.
    Exhausted {
        last_error: String,
        kind: CompileErrorKind,
    },
    CompilerUnavailable { reason: String },
}

#[derive(Debug, Clone)]
pub struct RepairReport {
    /// The last document handed to the compiler.
    pub document: LatexDocument,
    pub outcome: LoopOutcome,
    pub compile_calls: u32,
    pub repair_calls: u32,
}

/// Runs the compile-repair state machine on `document` until it compiles, the
/// repair budget is spent, or the compiler turns out to be unavailable.
pub async fn run_compile_repair_loop(
    document: LatexDocument,
    compiler: &dyn LatexCompiler,
    llm: &dyn LlmProvider,
    policy: &RepairPolicy,
) -> RepairReport {
    let mut document = document;
    let mut compile_calls = 0u32;
    let mut repair_calls = 0u32;

    loop {
        compile_calls += 1;

        let mut io_failure = false;
        let error_log = match compiler.compile(&document).await {
            Ok(CompileOutcome::Success { pdf_bytes }) => {
                info!(
                    attempt = document.attempt(),
                    outcome = "succeeded",
                    pdf_bytes = pdf_bytes.len(),
                    "LaTeX compiled"
                );
                return RepairReport {
                    document,
                    outcome: LoopOutcome::Compiled { pdf_bytes },
                    compile_calls,
                    repair_calls,
                };
            }
            Ok(CompileOutcome::Failure { error_log }) => error_log,
            Err(CompilerError::Io(e)) => {
                io_failure = true;
                format!("Compiler I/O error: {e}")
            }
            Err(e @ CompilerError::Unavailable(_)) => {
                warn!(
                    attempt = document.attempt(),
                    outcome = "compiler_unavailable",
                    "Cannot compile LaTeX: {e}"
                );
                return RepairReport {
                    document,
                    outcome: LoopOutcome::CompilerUnavailable {
                        reason: e.to_string(),
                    },
                    compile_calls,
                    repair_calls,
                };
            }
        };

        let summary = diagnostics::summarize(&error_log);
        warn!(
            attempt = document.attempt(),
            max_attempts = policy.max_attempts,
            outcome = "compile_failed",
            "LaTeX compilation failed: {summary}"
        );

        if document.attempt() >= policy.max_attempts || (!io_failure && !llm.is_configured()) {
            warn!(
                compile_calls,
                repair_calls, "Compile-repair budget exhausted; returning LaTeX without PDF"
            );
            return RepairReport {
                document,
                outcome: LoopOutcome::Exhausted {
                    last_error: format!(
                        "LaTeX compilation failed after {compile_calls} attempt(s). {summary}"
                    ),
                    kind: diagnostics::classify(&error_log),
                },
                compile_calls,
                repair_calls,
            };
        }

        if io_failure {
            document = document.revised(document.source().to_string());
            continue;
        }

        repair_calls += 1;
        document = repair_document(&document, &error_log, llm, policy).await;
    }
}

/// One REPAIRING step. Always yields the next attempt's document: if the LLM
/// fails or returns nothing, the failing source is carried forward unchanged.
async fn repair_document(
    document: &LatexDocument,
    error_log: &str,
    llm: &dyn LlmProvider,
    policy: &RepairPolicy,
) -> LatexDocument {
    let prompt = build_repair_prompt(document.source(), error_log);
    let system = format!("{REPAIR_SYSTEM} {LATEX_ONLY_SYSTEM}");
    let options = CallOptions::new(REPAIR_TEMPERATURE, REPAIR_MAX_TOKENS, policy.llm_timeout);

    info!(attempt = document.attempt(), "Sending failing LaTeX to the LLM for repair");

    match llm.complete(&prompt, &system, &options).await {
        Ok(reply) => {
            let repaired = strip_code_fences(&reply);
            if repaired.is_empty() {
                warn!(attempt = document.attempt(), "Repair reply was empty; retrying unchanged source");
                document.revised(document.source().to_string())
            } else {
                if !is_complete_document(repaired) {
                    warn!(
                        attempt = document.attempt(),
                        "Repair reply is not a complete document; compiling it anyway"
                    );
                }
                document.revised(repaired.to_string())
            }
        }
        Err(e) => {
            warn!(attempt = document.attempt(), "Repair LLM call failed: {e}");
            document.revised(document.source().to_string())
        }
    }
}

pub(crate) fn build_repair_prompt(latex_code: &str, error_log: &str) -> String {
    fill_template(
        REPAIR_PROMPT_TEMPLATE,
        &[
            ("error_log", truncate_chars(error_log, MAX_ERROR_LOG_CHARS)),
            ("package_constraint", PACKAGE_CONSTRAINT),
            ("complete_document", COMPLETE_DOCUMENT_INSTRUCTION),
            ("latex_code", latex_code),
        ],
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
