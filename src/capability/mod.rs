//! External reasoning capabilities.
//!
//! The driver only knows two traits: [`StepGenerator`] proposes the next
//! reasoning step, [`AnswerGenerator`] turns the finished chain into a
//! structured result. Results are bound to a [`ResultSchema`] and are
//! validated before the caller sees them; anything that does not fit the
//! schema is a [`CapabilityError`].
//!
//! [`PipeGenerator`] implements both on top of Langbase Pipes.

mod pipe;

pub use pipe::PipeGenerator;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{CapabilityError, CapabilityResult};

/// Descriptor of the structured shape a capability must return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSchema {
    pub name: String,
    pub description: String,
    /// JSON-Schema style description of the object's fields.
    pub parameters: Value,
}

impl ResultSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A type that can be requested from a capability as structured output.
pub trait StructuredOutput: DeserializeOwned + Serialize + Send {
    /// The schema sent along with the request.
    fn schema() -> ResultSchema;

    /// Semantic checks beyond what deserialization enforces.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Deserialize `value` into `T` and run its validation.
pub fn decode_answer<T: StructuredOutput>(value: Value) -> CapabilityResult<T> {
    let schema_error = |message: String| CapabilityError::Schema {
        schema: T::schema().name,
        message,
    };

    let decoded: T = serde_json::from_value(value).map_err(|e| schema_error(e.to_string()))?;
    decoded.validate().map_err(schema_error)?;
    Ok(decoded)
}

/// One generated reasoning step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// Next logical step or intermediate result.
    pub step: String,
    /// Whether the chain of thought is finished after this step.
    pub finished: bool,
}

impl ReasoningStep {
    pub fn new(step: impl Into<String>, finished: bool) -> Self {
        Self {
            step: step.into(),
            finished,
        }
    }
}

impl StructuredOutput for ReasoningStep {
    fn schema() -> ResultSchema {
        ResultSchema::new(
            "ReasoningStep",
            "The next reasoning step and whether the chain is complete",
            json!({
                "type": "object",
                "properties": {
                    "step": {
                        "type": "string",
                        "description": "Next logical step or intermediate result to advance the solution."
                    },
                    "finished": {
                        "type": "boolean",
                        "description": "Whether the chain-of-thought is finished after the generated step"
                    }
                },
                "required": ["step", "finished"]
            }),
        )
    }
}

/// Proposes the next reasoning step.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StepGenerator: Send + Sync {
    async fn generate_step(
        &self,
        problem: &str,
        prior_steps: &[String],
    ) -> CapabilityResult<ReasoningStep>;
}

/// Produces the final answer for a finished chain.
///
/// Returns the raw JSON object; use [`decode_answer`] to bind it to a type.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate_answer(
        &self,
        problem: &str,
        steps: &[String],
        output_format: &str,
        schema: &ResultSchema,
    ) -> CapabilityResult<Value>;
}

/// Extract JSON from a completion string, handling markdown code blocks.
///
/// Tries raw JSON first, then a ```json fenced block, then any ``` block.
pub(crate) fn extract_json_from_completion(completion: &str) -> Result<&str, String> {
    let trimmed = completion.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(trimmed);
    }

    if completion.contains("```json") {
        return completion
            .split("```json")
            .nth(1)
            .and_then(|s| s.split("```").next())
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "Found ```json block but content was empty or malformed".to_string());
    }

    if completion.contains("```") {
        return completion
            .split("```")
            .nth(1)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "Found ``` block but content was empty or malformed".to_string());
    }

    Err(format!(
        "No JSON found in response. First 100 chars: '{}'",
        completion.chars().take(100).collect::<String>()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_reasoning_step() {
        let step: ReasoningStep =
            decode_answer(json!({"step": "Apply rule 5", "finished": true})).unwrap();
        assert_eq!(step, ReasoningStep::new("Apply rule 5", true));
    }

    #[test]
    fn test_decode_missing_field_is_schema_error() {
        let err = decode_answer::<ReasoningStep>(json!({"step": "x"})).unwrap_err();
        match err {
            CapabilityError::Schema { schema, message } => {
                assert_eq!(schema, "ReasoningStep");
                assert!(message.contains("finished"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_blank_step_is_accepted() {
        let step: ReasoningStep =
            decode_answer(json!({"step": "  ", "finished": false})).unwrap();
        assert_eq!(step, ReasoningStep::new("  ", false));
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Percent {
        value: u32,
    }

    impl StructuredOutput for Percent {
        fn schema() -> ResultSchema {
            ResultSchema::new("Percent", "A percentage", json!({"type": "object"}))
        }

        fn validate(&self) -> Result<(), String> {
            if self.value > 100 {
                return Err(format!("{} is above 100", self.value));
            }
            Ok(())
        }
    }

    #[test]
    fn test_decode_runs_validation() {
        assert_eq!(decode_answer::<Percent>(json!({"value": 40})).unwrap().value, 40);

        let err = decode_answer::<Percent>(json!({"value": 140})).unwrap_err();
        match err {
            CapabilityError::Schema { schema, message } => {
                assert_eq!(schema, "Percent");
                assert_eq!(message, "140 is above 100");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reasoning_step_schema_requires_both_fields() {
        let schema = ReasoningStep::schema();
        assert_eq!(schema.name, "ReasoningStep");
        assert_eq!(schema.parameters["required"], json!(["step", "finished"]));
    }

    #[test]
    fn test_extract_json_raw() {
        let input = r#"  {"step": "a"}  "#;
        assert_eq!(extract_json_from_completion(input).unwrap(), r#"{"step": "a"}"#);
    }

    #[test]
    fn test_extract_json_fenced() {
        let input = "Here you go:\n```json\n{\"finished\": true}\n```\n";
        assert_eq!(
            extract_json_from_completion(input).unwrap(),
            "{\"finished\": true}"
        );

        let input = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_from_completion(input).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_missing() {
        let err = extract_json_from_completion("I think the answer is proved").unwrap_err();
        assert!(err.contains("No JSON found"));

        let err = extract_json_from_completion("```json\n```").unwrap_err();
        assert!(err.contains("empty or malformed"));
    }
}
