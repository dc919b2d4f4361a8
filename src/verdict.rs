//! Truth-value answer schema for rule-based puzzles.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::capability::{ResultSchema, StructuredOutput};

/// Output-format instruction paired with [`VerdictAnswer`].
pub const VERDICT_OUTPUT_FORMAT: &str = "Answer 'proved' if it can be proved, 'disproved' if it can be disproved, and 'unknown' if it can neither be proved nor disproved.";

/// Truth value of a statement given facts and rules.
///
/// Serialized with the canonical spelling. `"unproved"` and `"disaproved"`
/// are accepted on input because models echo them back from older prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Proved,
    #[serde(alias = "unproved", alias = "disaproved")]
    Disproved,
    Unknown,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Proved => "proved",
            Verdict::Disproved => "disproved",
            Verdict::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured answer carrying a [`Verdict`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictAnswer {
    pub solution: Verdict,
}

impl StructuredOutput for VerdictAnswer {
    fn schema() -> ResultSchema {
        ResultSchema::new(
            "Result",
            "Truth value of the statement in question",
            json!({
                "type": "object",
                "properties": {
                    "solution": {
                        "type": "string",
                        "enum": ["proved", "disproved", "unknown"]
                    }
                },
                "required": ["solution"]
            }),
        )
    }
}
