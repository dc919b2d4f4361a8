//! Langbase Pipes adapter: the HTTP transport behind both generators.

mod client;
mod types;


pub use client::LangbaseClient;
pub use types::*;
