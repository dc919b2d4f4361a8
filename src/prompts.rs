//! Centralized prompt definitions for the step and answer pipes
//!
//! System prompts are installed on the Langbase pipes at startup and also
//! sent with every request; the user prompts are built per call.

use crate::capability::ResultSchema;

/// System prompt for the step-generation pipe.
pub const STEP_SYSTEM_PROMPT: &str = r#"You are an expert reasoner who thinks in structured trees of possibilities before deciding.

Your response MUST be valid JSON in this exact format:
{
  "step": "next logical step or intermediate result",
  "finished": false
}

Guidelines:
- Produce exactly one new step that advances the solution
- Build on the previous steps; do not repeat them
- Set "finished" to true only when the chain of thought is complete after this step

Always respond with valid JSON only, no other text."#;

/// System prompt for the answer-generation pipe.
pub const ANSWER_SYSTEM_PROMPT: &str = r#"You are an expert at problem solving.

You are given a problem and the reasoning steps taken so far. Produce the final result.

Your response MUST be a single JSON object that matches the result schema given in the request.
Always respond with valid JSON only, no other text."#;

/// Number the steps one per line (`"1. a\n2. b\n"`), or `"N/A"` when there
/// are none.
pub fn format_steps(steps: &[String]) -> String {
    if steps.is_empty() {
        return "N/A".to_string();
    }

    steps
        .iter()
        .enumerate()
        .map(|(idx, step)| format!("{}. {}\n", idx + 1, step))
        .collect()
}

/// User prompt asking for the next reasoning step.
pub fn step_prompt(problem: &str, prior_steps: &[String]) -> String {
    format!(
        "Solve the problem: {}\nPrevious steps: {}\nState the next logical step or intermediate result to advance the solution. Indicate if the reasoning chain ends here.\n",
        problem,
        format_steps(prior_steps)
    )
}

/// User prompt asking for the final structured result.
pub fn answer_prompt(
    problem: &str,
    steps: &[String],
    output_format: &str,
    schema: &ResultSchema,
) -> String {
    format!(
        "Given the problem: {}\nFollowing the reasoning steps:\n{}\nWhat is the result of the problem?\n{}\n\nRespond with a JSON object for \"{}\" ({}) matching this schema:\n{}\n",
        problem,
        format_steps(steps),
        output_format,
        schema.name,
        schema.description,
        schema.parameters
    )
}
