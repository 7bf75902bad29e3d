//! Prompt Enhancer - instruction wrapping and completion post-processing
//!
//! Asks a local text-generation model to improve a short idea into a single
//! prompt sentence. Post-processing is deliberately best-effort: the echoed
//! instruction is stripped and the text is cut at the first period, which can
//! yield an empty suggestion for some model outputs. Callers fall back to
//! the raw idea in that case.

use tracing::info;

use crate::error::EnhanceError;

use super::model::TextGenerator;

/// Instruction prepended to the user's idea.
pub const ENHANCE_INSTRUCTION: &str = "Improve this art prompt in one short sentence:";

/// Output cap passed to the model, in tokens.
const MAX_NEW_TOKENS: u32 = 25;

/// Prompt Enhancer
///
/// Stateless beyond the owned model handle; the caller stores the suggestion.
pub struct PromptEnhancer {
    model: Box<dyn TextGenerator>,
}

impl PromptEnhancer {
    pub fn new(model: Box<dyn TextGenerator>) -> Self {
        Self { model }
    }

    /// Enhance a short idea into a suggested prompt sentence.
    ///
    /// Fails with `ModelUnavailable` when the underlying model cannot be
    /// reached; never fails on the shape of the model's output.
    pub async fn enhance(&self, idea: &str) -> Result<String, EnhanceError> {
        let instruction = format!("{} {}", ENHANCE_INSTRUCTION, idea);

        info!("Enhancing prompt idea");
        let raw = self.model.complete(&instruction, MAX_NEW_TOKENS).await?;

        Ok(trim_completion(&raw))
    }
}

/// Keep only the improved sentence: drop the echoed instruction if the model
/// repeats it, then truncate at the first period.
fn trim_completion(raw: &str) -> String {
    let stripped = raw.replace(ENHANCE_INSTRUCTION, "");
    let stripped = stripped.trim();
    stripped
        .split('.')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_strips_echoed_instruction() {
        let raw = format!(
            "{} boy studying at desk. A focused boy at a wooden desk.",
            ENHANCE_INSTRUCTION
        );
        let trimmed = trim_completion(&raw);
        assert_eq!(trimmed, "boy studying at desk");
        assert!(!trimmed.contains(ENHANCE_INSTRUCTION));
    }

    #[test]
    fn test_trim_truncates_at_first_period() {
        assert_eq!(
            trim_completion("A focused boy at a desk. Warm light."),
            "A focused boy at a desk"
        );
    }

    #[test]
    fn test_trim_without_period_keeps_whole_text() {
        assert_eq!(
            trim_completion("  a quiet library scene  "),
            "a quiet library scene"
        );
    }

    #[test]
    fn test_trim_may_yield_empty_string() {
        // Best-effort contract: a completion that is only the echoed
        // instruction and a period trims to nothing.
        assert_eq!(trim_completion(&format!("{}.", ENHANCE_INSTRUCTION)), "");
    }
}
