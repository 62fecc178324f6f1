// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for first-time generation. Combined with `LATEX_ONLY_SYSTEM`.
pub const GENERATION_SYSTEM: &str = "You are an expert resume writer and LaTeX specialist. \
    Generate professional, ATS-optimized resumes in LaTeX format.";

/// Generation prompt template.
/// Replace: {template}, {full_name}, {email}, {phone}, {resume_text},
/// {job_description}, {package_constraint}, {complete_document}
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Generate a complete, professional LaTeX resume tailored to the job description below.

1. Use the EXACT LaTeX template structure provided
2. Tailor the content to match the job description
3. Keep all LaTeX formatting and commands intact
4. Write compelling, ATS-friendly bullet points
5. Optimize keywords for the target role

LATEX TEMPLATE TO USE (do not modify its structure):
{template}

APPLICANT INFORMATION:
Name: {full_name}
Email: {email}
Phone: {phone}

CURRENT RESUME CONTENT:
{resume_text}

TARGET JOB DESCRIPTION:
{job_description}

REQUIREMENTS:
- Replace ALL {{PLACEHOLDER}} markers with real content from the resume
- Write 3-4 bullet points per role using strong action verbs
- Include relevant projects if the resume has any
- Order the technical skills by relevance to the target role
- Quantify achievements where the resume supports it; never invent facts
- {package_constraint}
- {complete_document}
- Do NOT wrap the code in triple backticks or add any other text"#;

/// System prompt for refinement. Combined with `LATEX_ONLY_SYSTEM`.
pub const REFINE_SYSTEM: &str = "You are an expert resume editor. \
    Modify LaTeX resumes based on user feedback while keeping them professional and ATS-compatible.";

/// Refinement prompt template.
/// Replace: {latex_code}, {feedback}, {job_description}, {package_constraint}, {complete_document}
pub const REFINE_PROMPT_TEMPLATE: &str = r#"Apply the user's feedback to this LaTeX resume.

1. Apply ONLY the requested change; leave everything else as it is
2. Keep the LaTeX structure and formatting intact
3. Keep the resume ATS-friendly and aligned with the target job
4. Preserve every working LaTeX command

CURRENT LATEX RESUME:
{latex_code}

USER FEEDBACK:
{feedback}

JOB DESCRIPTION (for context):
{job_description}

{package_constraint}
{complete_document}"#;

/// System prompt for improvement suggestions. Plain text reply, not LaTeX.
pub const SUGGESTIONS_SYSTEM: &str = "You are a professional resume coach. \
    Give specific, actionable feedback to improve resumes for target positions. Be concise.";

/// Suggestions prompt template. Replace: {latex_code}, {job_description}
pub const SUGGESTIONS_PROMPT_TEMPLATE: &str = r#"Analyze this LaTeX resume against the job description and give 4 specific, actionable improvement suggestions.

LATEX RESUME:
{latex_code}

JOB DESCRIPTION:
{job_description}

Format your response as a numbered list, one concise suggestion per line:
1. [Specific suggestion]
2. [Specific suggestion]
3. [Specific suggestion]
4. [Specific suggestion]

Return only the numbered list."#;
