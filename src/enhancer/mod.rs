//! Prompt enhancement - local text-generation model wrapper

pub mod model;
pub mod prompt_enhancer;

pub use model::{CompletionServer, TextGenerator};
pub use prompt_enhancer::PromptEnhancer;
