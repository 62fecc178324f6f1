//! Enhancement pipeline: generation → compile-repair loop → suggestions.
//!
//! Requests share nothing but the compiler's concurrency cap. Every document
//! value is owned by the request handling it, and a refinement receives the
//! prior artifact explicitly from the caller.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::generation::generator::generate;
use crate::generation::refinement::request_revision;
use crate::generation::suggestions::suggest;
use crate::llm_client::LlmProvider;
use crate::models::enhancement::{EnhancementRequest, EnhancementResult, RefinementRequest};
use crate::parsing::{extract_contact_info, ContactInfo};
use crate::render::{run_compile_repair_loop, CompilerStatus, LatexCompiler, RepairPolicy};

#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    pub compiler: CompilerStatus,
    pub llm_configured: bool,
    pub max_repair_attempts: u32,
}

pub struct ResumePipeline {
    llm: Arc<dyn LlmProvider>,
    compiler: Arc<dyn LatexCompiler>,
    policy: RepairPolicy,
    suggestion_timeout: Duration,
}

impl ResumePipeline {
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        compiler: Arc<dyn LatexCompiler>,
        policy: RepairPolicy,
        suggestion_timeout: Duration,
    ) -> Self {
        Self {
            llm,
            compiler,
            policy,
            suggestion_timeout,
        }
    }

    /// Full first-time flow. Contact fields are recovered from the text.
    pub async fn enhance(&self, request: &EnhancementRequest) -> EnhancementResult {
        let contact = extract_contact_info(&request.resume_text);
        self.enhance_with_contact(request, &contact).await
    }

    /// Same as [`ResumePipeline::enhance`] for callers that already parsed the
    /// contact fields out of an uploaded document.
    pub async fn enhance_with_contact(
        &self,
        request: &EnhancementRequest,
        contact: &ContactInfo,
    ) -> EnhancementResult {
        let span = info_span!("enhance", request_id = %Uuid::new_v4());
        self.run_enhance(request, contact).instrument(span).await
    }

    async fn run_enhance(
        &self,
        request: &EnhancementRequest,
        contact: &ContactInfo,
    ) -> EnhancementResult {
        let document = generate(
            &request.resume_text,
            &request.job_description,
            contact,
            self.llm.as_ref(),
            self.policy.llm_timeout,
        )
        .await;

        let report = run_compile_repair_loop(
            document,
            self.compiler.as_ref(),
            self.llm.as_ref(),
            &self.policy,
        )
        .await;

        let suggestions = self
            .suggest(report.document.source(), &request.job_description)
            .await;

        let result = EnhancementResult::from_report(report, suggestions);
        info!(
            pdf_status = ?result.pdf_status,
            compile_attempts = result.compile_attempts,
            repair_attempts = result.repair_attempts,
            error_kind = ?result.error_kind,
            "Enhancement finished"
        );
        result
    }

    /// Applies feedback to the caller's document. A failed revision returns
    /// the input unchanged with `success = false`; a successful one runs the
    /// compile-repair loop with a fresh budget.
    pub async fn refine(&self, request: &RefinementRequest) -> EnhancementResult {
        let span = info_span!("refine", request_id = %Uuid::new_v4());
        self.run_refine(request).instrument(span).await
    }

    async fn run_refine(&self, request: &RefinementRequest) -> EnhancementResult {
        let job_description = request.job_description.as_deref();

        let document = match request_revision(
            &request.latex_code,
            &request.feedback,
            job_description,
            self.llm.as_ref(),
            self.policy.llm_timeout,
        )
        .await
        {
            Ok(document) => document,
            Err(e) => {
                warn!("Refinement failed, returning the original document: {e}");
                return EnhancementResult::refinement_failed(
                    request.latex_code.clone(),
                    format!("Could not apply the requested changes. {e}"),
                );
            }
        };

        let report = run_compile_repair_loop(
            document,
            self.compiler.as_ref(),
            self.llm.as_ref(),
            &self.policy,
        )
        .await;

        let suggestions = self
            .suggest(report.document.source(), job_description.unwrap_or_default())
            .await;

        EnhancementResult::from_report(report, suggestions)
    }

    pub async fn suggest(&self, latex_code: &str, job_description: &str) -> Vec<String> {
        suggest(
            latex_code,
            job_description,
            self.llm.as_ref(),
            self.suggestion_timeout,
        )
        .await
    }

    pub fn status(&self) -> PipelineStatus {
        PipelineStatus {
            compiler: self.compiler.status(),
            llm_configured: self.llm.is_configured(),
            max_repair_attempts: self.policy.max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::suggestions::default_suggestions;
    use crate::latex::is_complete_document;
    use crate::llm_client::LlmError;
    use crate::models::enhancement::PdfStatus;
    use crate::render::compiler::INSTALL_INSTRUCTIONS;
    use crate::render::diagnostics::CompileErrorKind;
    use crate::testing::{
        compile_failure, compiled_pdf, ScriptedCompiler, ScriptedLlm, VALID_LATEX,
    };

    fn pipeline(llm: ScriptedLlm, compiler: ScriptedCompiler, max_attempts: u32) -> ResumePipeline {
        ResumePipeline::new(
            Arc::new(llm),
            Arc::new(compiler),
            RepairPolicy {
                max_attempts,
                llm_timeout: Duration::from_secs(5),
            },
            Duration::from_secs(5),
        )
    }

    fn request() -> EnhancementRequest {
        EnhancementRequest {
            resume_text: "Jane Doe\njane@example.com\nBuilt payment systems.".to_string(),
            job_description: "Senior Rust engineer".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_try_success_returns_pdf_without_error() {
        let llm = ScriptedLlm::new(vec![
            Ok(VALID_LATEX.to_string()),
            Ok("1. Add metrics".to_string()),
        ]);
        let compiler = ScriptedCompiler::new(vec![Ok(compiled_pdf())]);
        let result = pipeline(llm, compiler, 5).enhance(&request()).await;

        assert!(result.success);
        assert!(result.pdf_bytes.is_some_and(|pdf| !pdf.is_empty()));
        assert!(result.error.is_none());
        assert_eq!(result.compile_attempts, 1);
        assert_eq!(result.repair_attempts, 0);
        assert_eq!(result.suggestions, vec!["Add metrics"]);
    }

    #[tokio::test]
    async fn test_two_failures_then_success_with_budget_five() {
        let repaired = VALID_LATEX.replace("Hello", "Repaired");
        let llm = ScriptedLlm::new(vec![
            Ok(VALID_LATEX.to_string()),
            Ok(repaired.clone()),
            Ok(repaired.clone()),
            Ok("1. Add metrics".to_string()),
        ]);
        let compiler = ScriptedCompiler::new(vec![
            Ok(compile_failure("! Undefined control sequence.")),
            Ok(compile_failure("! Undefined control sequence.")),
            Ok(compiled_pdf()),
        ]);
        let result = pipeline(llm, compiler, 5).enhance(&request()).await;

        assert!(result.success);
        assert!(result.pdf_bytes.is_some());
        assert_eq!(result.compile_attempts, 3);
        assert_eq!(result.repair_attempts, 2);
        assert_eq!(result.latex_code, repaired);
    }

    #[tokio::test]
    async fn test_all_attempts_fail_is_degraded_success() {
        let mut replies = vec![Ok(VALID_LATEX.to_string())];
        replies.extend((0..5).map(|_| Ok(VALID_LATEX.replace("Hello", "Still broken"))));
        let llm = ScriptedLlm::new(replies);
        let compiler = ScriptedCompiler::always_failing("! Missing } inserted.");

        let result = pipeline(llm, compiler, 5).enhance(&request()).await;

        assert!(result.success);
        assert!(result.pdf_bytes.is_none());
        assert!(!result.latex_code.is_empty());
        assert!(result.error.is_some_and(|e| e.contains("Missing } inserted")));
        assert_eq!(result.pdf_status, PdfStatus::CompileFailed);
        assert_eq!(result.compile_attempts, 6);
        assert_eq!(result.repair_attempts, 5);
        assert_eq!(result.error_kind, Some(CompileErrorKind::SyntaxError));
        assert!(!result.error_hints.is_empty());
        // Suggestion call found the script exhausted.
        assert_eq!(result.suggestions, default_suggestions());
    }

    #[tokio::test]
    async fn test_nothing_configured_still_returns_latex() {
        let result = pipeline(ScriptedLlm::unconfigured(), ScriptedCompiler::unavailable(), 3)
            .enhance(&request())
            .await;

        assert!(result.success);
        assert!(is_complete_document(&result.latex_code));
        assert_eq!(result.pdf_status, PdfStatus::Unavailable);
        assert!(result
            .error
            .is_some_and(|e| e.starts_with("PDF generation unavailable")));
        assert_eq!(result.error_hints, INSTALL_INSTRUCTIONS);
        assert_eq!(result.suggestions, default_suggestions());
    }

    #[tokio::test]
    async fn test_refinement_with_failing_llm_returns_input_unchanged() {
        let llm = ScriptedLlm::new(vec![Err(LlmError::Timeout(Duration::from_secs(60)))]);
        let compiler = ScriptedCompiler::new(vec![]);
        let pipeline = pipeline(llm, compiler, 3);

        let original = "\\documentclass{article}% user edits\n\\begin{document}x\\end{document}";
        let result = pipeline
            .refine(&RefinementRequest {
                latex_code: original.to_string(),
                feedback: "shorter".to_string(),
                job_description: None,
            })
            .await;

        assert!(!result.success);
        assert_eq!(result.latex_code, original);
        assert!(result.error.is_some());
        assert_eq!(result.pdf_status, PdfStatus::NotAttempted);
    }

    #[tokio::test]
    async fn test_refinement_success_resets_repair_budget() {
        let revised = VALID_LATEX.replace("Hello", "Refined");
        let llm = ScriptedLlm::new(vec![
            Ok(revised.clone()),
            Ok(revised.clone()),
            Ok("- Mention Kafka".to_string()),
        ]);
        let compiler = ScriptedCompiler::new(vec![
            Ok(compile_failure("! Undefined control sequence.")),
            Ok(compiled_pdf()),
        ]);
        let result = pipeline(llm, compiler, 1)
            .refine(&RefinementRequest {
                latex_code: VALID_LATEX.to_string(),
                feedback: "Refine it".to_string(),
                job_description: Some("Platform engineer".to_string()),
            })
            .await;

        assert!(result.success);
        assert!(result.pdf_bytes.is_some());
        assert_eq!(result.latex_code, revised);
        assert_eq!(result.compile_attempts, 2);
        assert_eq!(result.suggestions, vec!["Mention Kafka"]);
    }

    #[test]
    fn test_status_reports_collaborators() {
        let status = pipeline(ScriptedLlm::unconfigured(), ScriptedCompiler::new(vec![]), 3).status();
        assert!(status.compiler.available);
        assert!(!status.llm_configured);
        assert_eq!(status.max_repair_attempts, 3);
    }
}
