//! Completion gateway - provider client and response parsing

pub mod client;
pub mod parse;

pub use client::{
    AnthropicClient, CompletionClient, CompletionError, CompletionRequest, RESPONSE_SENTINEL,
};
pub use parse::{parse, ParsedResponse, REVISION_DELIMITER};
