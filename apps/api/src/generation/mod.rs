// Resume generation engine.
// Implements: LaTeX generation, refinement, suggestions and the pipeline that
// drives them through the compile-repair loop.
// All LLM calls go through the LlmProvider trait, never a concrete client.

pub mod generator;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod refinement;
pub mod suggestions;

pub use pipeline::ResumePipeline;
