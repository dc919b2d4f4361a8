//! # Thought Chain Reasoning
//!
//! A small harness for chain-of-thought reasoning with a large language
//! model: ask the model for the next reasoning step until it says the chain
//! is done, then ask it for a final structured answer.
//!
//! ## Features
//!
//! - **Chain driver**: sequential step generation with a depth cap
//! - **Structured output**: answers bound to a typed schema and validated
//! - **Thought tree**: in-memory tree of reasoning nodes with a JSON debug export
//! - **Langbase Pipes**: HTTP-backed step and answer generators
//!
//! ## Architecture
//!
//! ```text
//! ChainDriver → StepGenerator  ─┐
//!             → AnswerGenerator ┴→ PipeGenerator → Langbase Pipes (HTTP)
//!      ↓
//! StepObserver → TreeRecorder → ThoughtTree
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use thought_chain_reasoning::{Config, ChainDriver, PipeGenerator};
//! use thought_chain_reasoning::langbase::LangbaseClient;
//! use thought_chain_reasoning::verdict::{VerdictAnswer, VERDICT_OUTPUT_FORMAT};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let langbase = LangbaseClient::new(&config.langbase, config.request.clone())?;
//!     let generator = PipeGenerator::new(langbase, config.pipes.clone());
//!     let driver = ChainDriver::new(generator.clone(), generator, config.driver);
//!     let outcome = driver
//!         .solve::<VerdictAnswer>("Does the finch shout at the mermaid?", VERDICT_OUTPUT_FORMAT)
//!         .await?;
//!     println!("{}", outcome.answer.solution);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// External step/answer generators and structured output binding.
pub mod capability;
/// Configuration loaded from the environment and the credential file.
pub mod config;
/// Linear chain driver and step observers.
pub mod driver;
/// Error types and result aliases for the application.
pub mod error;
/// Langbase API client and types for pipe communication.
pub mod langbase;
/// System prompts and prompt templates.
pub mod prompts;
/// In-memory thought tree and its JSON export.
pub mod tree;
/// Proved/disproved/unknown answer schema.
pub mod verdict;

pub use capability::{
    AnswerGenerator, PipeGenerator, ReasoningStep, ResultSchema, StepGenerator, StructuredOutput,
};
pub use config::Config;
pub use driver::{ChainDriver, ChainOutcome, DriverState, StepObserver, TreeRecorder};
pub use error::{AppError, AppResult, CapabilityError, ConfigError};
pub use tree::{Node, ThoughtTree};
