// Scripted test doubles for the LLM and compiler seams.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::latex::LatexDocument;
use crate::llm_client::{CallOptions, LlmError, LlmProvider};
use crate::render::compiler::{CompileOutcome, CompilerError, CompilerStatus, LatexCompiler};

pub const VALID_LATEX: &str = "\\documentclass{article}\n\\begin{document}\nHello\n\\end{document}";

pub fn compiled_pdf() -> CompileOutcome {
    CompileOutcome::Success {
        pdf_bytes: b"%PDF-1.5\n%fake\n%%EOF".to_vec(),
    }
}

pub fn compile_failure(log: &str) -> CompileOutcome {
    CompileOutcome::Failure {
        error_log: log.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub system: String,
    pub options: CallOptions,
}

/// Replies with queued results in order; errors once the queue runs dry.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    configured: bool,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            configured: true,
        }
    }

    /// Behaves like a client without an API key.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new(vec![])
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(
        &self,
        prompt: &str,
        system: &str,
        options: &CallOptions,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            system: system.to_string(),
            options: *options,
        });

        if !self.configured {
            return Err(LlmError::MissingApiKey);
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

/// Returns queued outcomes in order, then fails every later compile with
/// `fallback_log`.
pub struct ScriptedCompiler {
    outcomes: Mutex<VecDeque<Result<CompileOutcome, CompilerError>>>,
    fallback_log: String,
    compiled: Mutex<Vec<LatexDocument>>,
    available: bool,
}

impl ScriptedCompiler {
    pub fn new(outcomes: Vec<Result<CompileOutcome, CompilerError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            fallback_log: "! Emergency stop.".to_string(),
            compiled: Mutex::new(Vec::new()),
            available: true,
        }
    }

    pub fn always_failing(log: &str) -> Self {
        Self {
            fallback_log: log.to_string(),
            ..Self::new(vec![])
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(vec![])
        }
    }

    pub fn compiled(&self) -> Vec<LatexDocument> {
        self.compiled.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.compiled.lock().unwrap().len()
    }
}

#[async_trait]
impl LatexCompiler for ScriptedCompiler {
    async fn compile(&self, document: &LatexDocument) -> Result<CompileOutcome, CompilerError> {
        self.compiled.lock().unwrap().push(document.clone());

        if !self.available {
            return Err(CompilerError::Unavailable(
                "pdflatex is not installed on this server".to_string(),
            ));
        }

        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(compile_failure(&self.fallback_log)))
    }

    fn status(&self) -> CompilerStatus {
        CompilerStatus {
            available: self.available,
            binary: self.available.then(|| "/usr/bin/pdflatex".to_string()),
            version: self.available.then(|| "pdfTeX 3.141592653".to_string()),
        }
    }
}
