// LaTeX → PDF rendering: the external compiler process and the
// compile-repair loop that drives it.
// Compilation is a child process; the calling task only awaits it.

pub mod compiler;
pub mod diagnostics;
pub mod prompts;
pub mod repair_loop;

pub use compiler::{CompilerStatus, LatexCompiler, PdfLatexCompiler};
pub use repair_loop::{run_compile_repair_loop, LoopOutcome, RepairPolicy, RepairReport};
