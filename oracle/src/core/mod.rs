//! Oracle core logic: prompt framing and reply parsing

pub mod parser;
pub mod prompt;

pub use parser::{extract_json_object, parse_selector_reply, parse_validator_reply};
pub use prompt::{ChatMessage, PromptHandler};
