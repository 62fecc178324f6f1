//! Refinement: applies user feedback to an existing document via the LLM.
//!
//! Unlike generation there is no template fallback here. A failed revision
//! leaves the caller's document untouched; see `ResumePipeline::refine`.

use std::time::Duration;

use thiserror::Error;
use tracing::info;

use crate::generation::prompts::{REFINE_PROMPT_TEMPLATE, REFINE_SYSTEM};
use crate::latex::{extract_document, LatexDocument, MalformedLatex};
use crate::llm_client::prompts::{
    fill_template, truncate_chars, COMPLETE_DOCUMENT_INSTRUCTION, LATEX_ONLY_SYSTEM,
    PACKAGE_CONSTRAINT,
};
use crate::llm_client::{CallOptions, LlmError, LlmProvider};

pub const REFINEMENT_TEMPERATURE: f32 = 0.2;
const REFINEMENT_MAX_TOKENS: u32 = 4000;
const MAX_JOB_DESCRIPTION_CHARS: usize = 1000;
const NO_JOB_DESCRIPTION: &str = "(not provided)";

#[derive(Debug, Error)]
pub enum RefinementFailure {
    #[error("Refinement request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Refinement produced invalid LaTeX: {0}")]
    Malformed(#[from] MalformedLatex),
}

/// Asks the model for a revised document. On success the revision enters the
/// compile-repair loop fresh, at attempt 0.
pub async fn request_revision(
    latex_code: &str,
    feedback: &str,
    job_description: Option<&str>,
    llm: &dyn LlmProvider,
    timeout: Duration,
) -> Result<LatexDocument, RefinementFailure> {
    let prompt = build_refine_prompt(latex_code, feedback, job_description);
    let system = format!("{REFINE_SYSTEM} {LATEX_ONLY_SYSTEM}");
    let options = CallOptions::new(REFINEMENT_TEMPERATURE, REFINEMENT_MAX_TOKENS, timeout);

    let reply = llm.complete(&prompt, &system, &options).await?;
    let source = extract_document(&reply)?;

    info!(chars = source.len(), "Refined LaTeX document");
    Ok(LatexDocument::new(source))
}

fn build_refine_prompt(latex_code: &str, feedback: &str, job_description: Option<&str>) -> String {
    let job_description = job_description
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .map(|jd| truncate_chars(jd, MAX_JOB_DESCRIPTION_CHARS))
        .unwrap_or(NO_JOB_DESCRIPTION);

    fill_template(
        REFINE_PROMPT_TEMPLATE,
        &[
            ("package_constraint", PACKAGE_CONSTRAINT),
            ("complete_document", COMPLETE_DOCUMENT_INSTRUCTION),
            ("job_description", job_description),
            ("feedback", feedback),
            ("latex_code", latex_code),
        ],
    )
}
