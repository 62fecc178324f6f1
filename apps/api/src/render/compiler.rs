//! LaTeX compiler seam and the `pdflatex` implementation.
//!
//! The binary is located once at startup. A missing binary is an
//! infrastructure condition (`CompilerError::Unavailable`), reported separately
//! from a document that fails to compile (`CompileOutcome::Failure`).
//!
//! Each attempt gets its own temporary directory, so concurrent requests never
//! share compiler input or output. The child is spawned with
//! `kill_on_drop(true)`: when the per-attempt timeout fires, or the request
//! future is dropped because the caller went away, the process is killed.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::latex::LatexDocument;

const JOB_NAME: &str = "resume";
/// Two passes so cross-references and page counts settle.
const DEFAULT_PASSES: u8 = 2;
const VERSION_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

pub const TIMEOUT_MARKER: &str = "Compilation timed out";

/// Shown by the status endpoint and on LaTeX-only results when no compiler
/// could be found.
pub const INSTALL_INSTRUCTIONS: [&str; 4] = [
    "Install a TeX distribution that provides pdflatex",
    "Debian/Ubuntu: apt-get install texlive-latex-base texlive-latex-extra",
    "macOS: brew install --cask basictex, then sudo tlmgr update --self",
    "Restart the service, or set PDFLATEX_PATH to the binary",
];

/// Checked after `PATH`, for installs that do not put TeX on it.
const WELL_KNOWN_PATHS: [&str; 6] = [
    "/usr/local/texlive/2025basic/bin/universal-darwin/pdflatex",
    "/usr/local/texlive/2024basic/bin/universal-darwin/pdflatex",
    "/Library/TeX/texbin/pdflatex",
    "/usr/local/bin/pdflatex",
    "/opt/local/bin/pdflatex",
    "/usr/bin/pdflatex",
];

/// Result of one compile attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    /// The complete PDF, read only after the compiler exited successfully.
    Success { pdf_bytes: Vec<u8> },
    Failure { error_log: String },
}

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("PDF generation unavailable: {0}")]
    Unavailable(String),

    #[error("Compiler I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Installation report for the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CompilerStatus {
    pub available: bool,
    pub binary: Option<String>,
    pub version: Option<String>,
}

#[async_trait]
pub trait LatexCompiler: Send + Sync {
    async fn compile(&self, document: &LatexDocument) -> Result<CompileOutcome, CompilerError>;

    fn status(&self) -> CompilerStatus;
}

/// `pdflatex` run as a child process, one temp directory per attempt.
pub struct PdfLatexCompiler {
    binary: Option<PathBuf>,
    version: Option<String>,
    timeout: Duration,
    passes: u8,
    permits: Arc<Semaphore>,
}

impl PdfLatexCompiler {
    /// Locates the compiler (explicit path first, then `PATH`, then well-known
    /// install locations) and checks its version. A binary that cannot report
    /// its version is treated as absent.
    pub async fn detect(
        explicit: Option<PathBuf>,
        timeout: Duration,
        max_concurrent: usize,
    ) -> Self {
        let candidate = match explicit {
            Some(path) if path.is_file() => Some(path),
            Some(path) => {
                warn!("PDFLATEX_PATH {} does not exist", path.display());
                None
            }
            None => find_pdflatex(),
        };

        let (binary, version) = match candidate {
            Some(path) => match query_version(&path).await {
                Some(version) => (Some(path), Some(version)),
                None => {
                    warn!("{} did not answer --version; PDF output disabled", path.display());
                    (None, None)
                }
            },
            None => (None, None),
        };

        match (&binary, &version) {
            (Some(path), Some(version)) => info!("LaTeX compiler: {} ({version})", path.display()),
            _ => warn!("pdflatex not found: only LaTeX source will be returned"),
        }

        Self {
            binary,
            version,
            timeout,
            passes: DEFAULT_PASSES,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    async fn run_passes(&self, binary: &Path, workdir: &Path) -> std::io::Result<Output> {
        let mut last = None;
        for pass in 0..self.passes {
            let output = Command::new(binary)
                .arg("-interaction=nonstopmode")
                .arg("-halt-on-error")
                .arg("-output-directory")
                .arg(workdir)
                .arg(format!("{JOB_NAME}.tex"))
                .current_dir(workdir)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output()
                .await?;

            debug!(pass, status = ?output.status, "pdflatex pass finished");
            let failed = !output.status.success();
            last = Some(output);
            if failed {
                break;
            }
        }
        last.ok_or_else(|| std::io::Error::other("compiler configured with zero passes"))
    }
}

#[async_trait]
impl LatexCompiler for PdfLatexCompiler {
    async fn compile(&self, document: &LatexDocument) -> Result<CompileOutcome, CompilerError> {
        let binary = self.binary.as_deref().ok_or_else(|| {
            CompilerError::Unavailable("pdflatex is not installed on this server".to_string())
        })?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| CompilerError::Unavailable("compiler pool closed".to_string()))?;

        let workdir = tempfile::Builder::new()
            .prefix("ats-builder-latex-")
            .tempdir()?;
        let tex_path = workdir.path().join(format!("{JOB_NAME}.tex"));
        tokio::fs::write(&tex_path, document.source()).await?;

        let output = match tokio::time::timeout(self.timeout, self.run_passes(binary, workdir.path())).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CompilerError::Unavailable(format!(
                    "{} could not be started",
                    binary.display()
                )));
            }
            Ok(Err(e)) => return Err(CompilerError::Io(e)),
            Err(_) => {
                return Ok(CompileOutcome::Failure {
                    error_log: format!(
                        "{TIMEOUT_MARKER} after {}s; the compiler process was killed.",
                        self.timeout.as_secs()
                    ),
                });
            }
        };

        let pdf_path = workdir.path().join(format!("{JOB_NAME}.pdf"));
        if output.status.success() {
            if let Ok(pdf_bytes) = tokio::fs::read(&pdf_path).await {
                if !pdf_bytes.is_empty() {
                    return Ok(CompileOutcome::Success { pdf_bytes });
                }
            }
        }

        let log_path = workdir.path().join(format!("{JOB_NAME}.log"));
        let error_log = match tokio::fs::read(&log_path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::from_utf8_lossy(&output.stdout).into_owned(),
        };

        Ok(CompileOutcome::Failure { error_log })
    }

    fn status(&self) -> CompilerStatus {
        CompilerStatus {
            available: self.binary.is_some(),
            binary: self.binary.as_ref().map(|p| p.display().to_string()),
            version: self.version.clone(),
        }
    }
}

fn find_pdflatex() -> Option<PathBuf> {
    let exe = if cfg!(windows) { "pdflatex.exe" } else { "pdflatex" };

    std::env::var_os("PATH")
        .into_iter()
        .flat_map(|paths| std::env::split_paths(&paths).collect::<Vec<_>>())
        .map(|dir| dir.join(exe))
        .chain(WELL_KNOWN_PATHS.iter().map(PathBuf::from))
        .find(|candidate| candidate.is_file())
}

/// First line of `pdflatex --version`, or `None` if the binary does not run.
async fn query_version(binary: &Path) -> Option<String> {
    let output = Command::new(binary)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(VERSION_CHECK_TIMEOUT, output).await {
        Ok(Ok(output)) if output.status.success() => String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .map(|l| l.trim().to_string()),
        _ => None,
    }
}
