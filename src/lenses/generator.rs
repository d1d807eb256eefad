//! AI-powered lens generation.
//!
//! Turns a free-text description of a thinking style into a structured lens
//! definition with a single, non-streaming LLM call.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::LensError;
use crate::llm::{GenerationRequest, LlmProvider, Message};

/// Meta-prompt instructing the model to emit a structured lens definition.
const META_PROMPT: &str = r#"You are a cognitive lens generator. Given a description of a thinking style or perspective, generate a structured lens definition.

Return ONLY a JSON object with these fields:
- name: A short, catchy name (2-4 words)
- description: A one-sentence description (under 100 chars)
- prompt: Detailed instructions for how to apply this lens (200-500 words)

The prompt should be specific, actionable, and guide the AI to think from this perspective.

Return ONLY valid JSON, no markdown formatting, no explanations."#;

/// A lens definition produced by the generator, before it is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedLens {
    pub name: String,
    pub description: String,
    pub prompt: String,
}

/// Assistant for generating custom lenses from descriptions.
pub struct LensAssistant {
    /// The LLM provider to use for generation.
    client: Arc<dyn LlmProvider>,
}

impl LensAssistant {
    /// Create a new lens assistant with the given LLM provider.
    pub fn new(client: Arc<dyn LlmProvider>) -> Self {
        Self { client }
    }

    /// Generate a lens definition from a free-text description.
    ///
    /// # Errors
    ///
    /// Returns [`LensError::GenerationFailed`] when the LLM call fails, the
    /// response is empty, the JSON does not parse, or a required field is
    /// missing.
    pub async fn generate_from_description(
        &self,
        description: &str,
    ) -> Result<GeneratedLens, LensError> {
        let description = description.trim();
        if description.len() < 10 {
            return Err(LensError::InvalidField {
                field: "description".to_string(),
                message: "must be at least 10 characters".to_string(),
            });
        }

        tracing::info!(
            description_length = description.len(),
            "Generating lens from description"
        );

        let request = GenerationRequest::new(
            "",
            vec![Message::system(META_PROMPT), Message::user(description)],
        );

        let response = self
            .client
            .generate(request)
            .await
            .map_err(|e| LensError::GenerationFailed(e.to_string()))?;

        let content = response
            .first_content()
            .ok_or_else(|| LensError::GenerationFailed("Empty response from LLM".to_string()))?;

        let lens = parse_generated_lens(content)?;

        tracing::info!(name = %lens.name, "Lens generation completed");
        Ok(lens)
    }
}

/// Parses an LLM response into a lens definition, tolerating markdown fences.
fn parse_generated_lens(content: &str) -> Result<GeneratedLens, LensError> {
    let cleaned = strip_code_fences(content);

    let lens: GeneratedLens = serde_json::from_str(cleaned).map_err(|e| {
        LensError::GenerationFailed(format!("Failed to parse generated lens JSON: {}", e))
    })?;

    if lens.name.trim().is_empty()
        || lens.description.trim().is_empty()
        || lens.prompt.trim().is_empty()
    {
        return Err(LensError::GenerationFailed(
            "Generated lens missing required fields".to_string(),
        ));
    }

    Ok(lens)
}

/// Strips a surrounding markdown code fence, with or without a `json` tag.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::{Choice, GenerationResponse};
    use async_trait::async_trait;

    /// Mock LLM provider returning a fixed response.
    struct MockLlmProvider {
        response: String,
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn generate(
            &self,
            _request: GenerationRequest,
        ) -> Result<GenerationResponse, LlmError> {
            Ok(GenerationResponse {
                id: "mock-0".to_string(),
                model: "mock-model".to_string(),
                choices: vec![Choice {
                    index: 0,
                    message: Message::assistant(self.response.clone()),
                    finish_reason: Some("stop".to_string()),
                }],
                usage: None,
            })
        }
    }

    fn assistant_with(response: &str) -> LensAssistant {
        LensAssistant::new(Arc::new(MockLlmProvider {
            response: response.to_string(),
        }))
    }

    const VALID_JSON: &str = r#"{"name": "Systems Thinker", "description": "Sees feedback loops everywhere.", "prompt": "Analyze every situation as a system of stocks, flows, and feedback loops."}"#;

    #[tokio::test]
    async fn test_generate_parses_raw_json() {
        let assistant = assistant_with(VALID_JSON);
        let lens = assistant
            .generate_from_description("someone who thinks in systems and feedback loops")
            .await
            .expect("generation should succeed");

        assert_eq!(lens.name, "Systems Thinker");
        assert!(lens.prompt.contains("feedback loops"));
    }

    #[tokio::test]
    async fn test_generate_strips_markdown_fences() {
        let fenced = format!("```json\n{}\n```", VALID_JSON);
        let assistant = assistant_with(&fenced);
        let lens = assistant
            .generate_from_description("someone who thinks in systems and feedback loops")
            .await
            .expect("generation should succeed");
        assert_eq!(lens.name, "Systems Thinker");
    }

    #[tokio::test]
    async fn test_generate_rejects_short_description() {
        let assistant = assistant_with(VALID_JSON);
        let result = assistant.generate_from_description("short").await;
        assert!(matches!(result, Err(LensError::InvalidField { .. })));
    }

    #[tokio::test]
    async fn test_generate_rejects_invalid_json() {
        let assistant = assistant_with("not json at all");
        let result = assistant
            .generate_from_description("a perfectly reasonable description")
            .await;
        assert!(matches!(result, Err(LensError::GenerationFailed(_))));
    }

    #[tokio::test]
    async fn test_generate_rejects_missing_fields() {
        let assistant =
            assistant_with(r#"{"name": "X", "description": "", "prompt": "something"}"#);
        let result = assistant
            .generate_from_description("a perfectly reasonable description")
            .await;
        assert!(matches!(result, Err(LensError::GenerationFailed(_))));
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{\"a\":1}\n```"), "{\"a\":1}");
    }
}
