use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{
    decode_answer, extract_json_from_completion, AnswerGenerator, ReasoningStep, ResultSchema,
    StepGenerator, StructuredOutput,
};
use crate::config::PipeConfig;
use crate::error::{CapabilityError, CapabilityResult};
use crate::langbase::{LangbaseClient, Message, PipeRequest};
use crate::prompts::{answer_prompt, step_prompt, ANSWER_SYSTEM_PROMPT, STEP_SYSTEM_PROMPT};

/// Step and answer generator backed by two Langbase pipes.
#[derive(Clone)]
pub struct PipeGenerator {
    langbase: LangbaseClient,
    pipes: PipeConfig,
}

impl PipeGenerator {
    pub fn new(langbase: LangbaseClient, pipes: PipeConfig) -> Self {
        Self { langbase, pipes }
    }

    /// Run `pipe` with a system and a user prompt and bind the completion
    /// to `T`.
    pub async fn invoke<T: StructuredOutput>(
        &self,
        pipe: &str,
        system_prompt: &str,
        prompt: String,
    ) -> CapabilityResult<T> {
        let value = self.invoke_value(pipe, system_prompt, prompt).await?;
        decode_answer(value)
    }

    async fn invoke_value(
        &self,
        pipe: &str,
        system_prompt: &str,
        prompt: String,
    ) -> CapabilityResult<Value> {
        let request = PipeRequest::new(
            pipe,
            vec![Message::system(system_prompt), Message::user(prompt)],
        );
        let response = self.langbase.call_pipe(request).await?;

        if !response.success {
            return Err(CapabilityError::InvalidResponse {
                message: format!("Pipe {} reported failure", pipe),
            });
        }

        let json = extract_json_from_completion(&response.completion)
            .map_err(|message| CapabilityError::InvalidResponse { message })?;

        serde_json::from_str(json).map_err(|e| CapabilityError::InvalidResponse {
            message: format!("Completion is not valid JSON: {}", e),
        })
    }
}

#[async_trait]
impl StepGenerator for PipeGenerator {
    async fn generate_step(
        &self,
        problem: &str,
        prior_steps: &[String],
    ) -> CapabilityResult<ReasoningStep> {
        debug!(
            pipe = %self.pipes.step,
            prior_steps = prior_steps.len(),
            "Requesting next reasoning step"
        );
        self.invoke(
            &self.pipes.step,
            STEP_SYSTEM_PROMPT,
            step_prompt(problem, prior_steps),
        )
        .await
    }
}

#[async_trait]
impl AnswerGenerator for PipeGenerator {
    async fn generate_answer(
        &self,
        problem: &str,
        steps: &[String],
        output_format: &str,
        schema: &ResultSchema,
    ) -> CapabilityResult<Value> {
        debug!(
            pipe = %self.pipes.answer,
            schema = %schema.name,
            steps = steps.len(),
            "Requesting final answer"
        );
        self.invoke_value(
            &self.pipes.answer,
            ANSWER_SYSTEM_PROMPT,
            answer_prompt(problem, steps, output_format, schema),
        )
        .await
    }
}
