//! Linear chain-of-thought driver.
//!
//! The driver asks a [`StepGenerator`] for one step at a time until the
//! generator reports the chain finished or the depth cap is hit, then asks
//! an [`AnswerGenerator`] once for the structured result.
//!
//! ```text
//! Accumulating --(finished || depth > max_depth)--> Finished --answer--> Answered
//! ```
//!
//! Calls are strictly sequential. Nothing is retried: the first capability
//! error ends the run and the accumulated steps are dropped.

mod recorder;

pub use recorder::TreeRecorder;

use tracing::{debug, info};

use crate::capability::{decode_answer, AnswerGenerator, StepGenerator, StructuredOutput};
use crate::config::DriverConfig;
use crate::error::AppResult;

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Collecting steps
    Accumulating,
    /// The generator signalled completion or the depth cap was reached
    Finished,
    /// The answer generator returned a validated result
    Answered,
}

/// Receives every step as soon as it is produced.
pub trait StepObserver {
    /// `index` is zero-based; `finished` is the flag returned with the step.
    fn on_step(&mut self, index: usize, step: &str, finished: bool);
}

impl<F> StepObserver for F
where
    F: FnMut(usize, &str, bool),
{
    fn on_step(&mut self, index: usize, step: &str, finished: bool) {
        self(index, step, finished)
    }
}

/// Observer that ignores every step.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StepObserver for NoopObserver {
    fn on_step(&mut self, _index: usize, _step: &str, _finished: bool) {}
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutcome<T> {
    /// Step texts in generation order
    pub steps: Vec<String>,
    /// Validated structured answer
    pub answer: T,
    /// Number of step-generator calls made
    pub step_calls: usize,
    /// False when the run stopped at the depth cap
    pub finished_naturally: bool,
}

/// Drives a single linear chain of reasoning steps to an answer.
pub struct ChainDriver<S, A> {
    steps: S,
    answers: A,
    config: DriverConfig,
}

impl<S, A> ChainDriver<S, A>
where
    S: StepGenerator,
    A: AnswerGenerator,
{
    pub fn new(steps: S, answers: A, config: DriverConfig) -> Self {
        Self {
            steps,
            answers,
            config,
        }
    }

    pub fn config(&self) -> DriverConfig {
        self.config
    }

    /// Solve `problem`, returning an answer bound to `T`.
    pub async fn solve<T: StructuredOutput>(
        &self,
        problem: &str,
        output_format: &str,
    ) -> AppResult<ChainOutcome<T>> {
        self.solve_with_observer(problem, output_format, &mut NoopObserver)
            .await
    }

    /// Like [`solve`](Self::solve), reporting each step to `observer`.
    pub async fn solve_with_observer<T, O>(
        &self,
        problem: &str,
        output_format: &str,
        observer: &mut O,
    ) -> AppResult<ChainOutcome<T>>
    where
        T: StructuredOutput,
        O: StepObserver + ?Sized,
    {
        let max_depth = self.config.max_depth;
        let mut state = DriverState::Accumulating;
        let mut steps: Vec<String> = Vec::new();
        let mut depth = 0usize;
        let mut finished = false;

        while state == DriverState::Accumulating {
            let step = self.steps.generate_step(problem, &steps).await?;
            finished = step.finished;

            debug!(
                index = depth,
                finished = finished,
                chars = step.step.len(),
                "Reasoning step generated"
            );

            observer.on_step(depth, &step.step, finished);
            steps.push(step.step);
            depth += 1;

            if finished || depth > max_depth {
                state = DriverState::Finished;
            }
        }

        debug!(
            state = ?state,
            steps = steps.len(),
            finished_naturally = finished,
            "Step accumulation complete"
        );

        let schema = T::schema();
        let value = self
            .answers
            .generate_answer(problem, &steps, output_format, &schema)
            .await?;
        let answer: T = decode_answer(value)?;
        state = DriverState::Answered;

        info!(
            state = ?state,
            steps = steps.len(),
            finished_naturally = finished,
            schema = %schema.name,
            "Reasoning chain answered"
        );

        Ok(ChainOutcome {
            step_calls: depth,
            steps,
            answer,
            finished_naturally: finished,
        })
    }
}
