// LLM prompt constants for the compile-repair loop.

/// System prompt for the repair step. Combined with `LATEX_ONLY_SYSTEM` at call time.
pub const REPAIR_SYSTEM: &str = "You are an expert LaTeX debugger. \
    Fix compilation errors in LaTeX code and change nothing else.";

/// Repair prompt template.
/// Replace: {error_log}, {latex_code}, {package_constraint}, {complete_document}
pub const REPAIR_PROMPT_TEMPLATE: &str = r#"This LaTeX code doesn't compile. Fix it.

ERROR LOG:
{error_log}

BROKEN LATEX CODE:
{latex_code}

INSTRUCTIONS:
1. Analyze the error messages carefully
2. Fix ONLY what is broken: syntax errors, undefined commands, misused packages
3. Keep the content, wording and section structure exactly as they are
4. {package_constraint}
5. {complete_document}
6. Do NOT wrap the code in triple backticks or add explanations

Return the corrected LaTeX code now:"#;
