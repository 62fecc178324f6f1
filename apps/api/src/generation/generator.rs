//! LaTeX Generator: one structured LLM call that turns resume text and a job
//! description into a complete LaTeX document.
//!
//! Never fails. Any LLM error, timeout or malformed reply falls back to the
//! deterministic template so the compile-repair loop always has a complete
//! document to work on.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::generation::prompts::{GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM};
use crate::latex::template::{resume_template, DEFAULT_EMAIL, DEFAULT_NAME, DEFAULT_PHONE};
use crate::latex::{extract_document, render_fallback, LatexDocument, MalformedLatex};
use crate::llm_client::prompts::{
    fill_template, truncate_chars, COMPLETE_DOCUMENT_INSTRUCTION, LATEX_ONLY_SYSTEM,
    PACKAGE_CONSTRAINT,
};
use crate::llm_client::{CallOptions, LlmError, LlmProvider};
use crate::parsing::ContactInfo;

pub const GENERATION_TEMPERATURE: f32 = 0.3;
const GENERATION_MAX_TOKENS: u32 = 4000;
const MAX_RESUME_CHARS: usize = 2000;
const MAX_JOB_DESCRIPTION_CHARS: usize = 1500;

/// Why the LLM path was abandoned. Logged, never surfaced to the caller.
#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Malformed LaTeX from model: {0}")]
    Malformed(#[from] MalformedLatex),
}

/// Generates the attempt-0 document. The result always starts with
/// `\documentclass` and ends with `\end{document}`.
pub async fn generate(
    resume_text: &str,
    job_description: &str,
    contact: &ContactInfo,
    llm: &dyn LlmProvider,
    timeout: Duration,
) -> LatexDocument {
    match generate_with_llm(resume_text, job_description, contact, llm, timeout).await {
        Ok(document) => {
            info!(chars = document.source().len(), "Generated LaTeX document");
            document
        }
        Err(e) => {
            warn!("LaTeX generation failed, using template fallback: {e}");
            render_fallback(resume_text, contact)
        }
    }
}

async fn generate_with_llm(
    resume_text: &str,
    job_description: &str,
    contact: &ContactInfo,
    llm: &dyn LlmProvider,
    timeout: Duration,
) -> Result<LatexDocument, GenerationFailure> {
    let prompt = build_generation_prompt(resume_text, job_description, contact);
    let system = format!("{GENERATION_SYSTEM} {LATEX_ONLY_SYSTEM}");
    let options = CallOptions::new(GENERATION_TEMPERATURE, GENERATION_MAX_TOKENS, timeout);

    let reply = llm.complete(&prompt, &system, &options).await?;
    let source = extract_document(&reply)?;

    Ok(LatexDocument::new(source))
}

fn build_generation_prompt(
    resume_text: &str,
    job_description: &str,
    contact: &ContactInfo,
) -> String {
    fill_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            ("package_constraint", PACKAGE_CONSTRAINT),
            ("complete_document", COMPLETE_DOCUMENT_INSTRUCTION),
            ("template", resume_template()),
            ("full_name", contact.name.as_deref().unwrap_or(DEFAULT_NAME)),
            ("email", contact.email.as_deref().unwrap_or(DEFAULT_EMAIL)),
            ("phone", contact.phone.as_deref().unwrap_or(DEFAULT_PHONE)),
            (
                "job_description",
                truncate_chars(job_description, MAX_JOB_DESCRIPTION_CHARS),
            ),
            ("resume_text", truncate_chars(resume_text, MAX_RESUME_CHARS)),
        ],
    )
}
