//! AI completion backend
//!
//! Prompt composition and the Groq chat-completions client used to generate
//! code suggestions.

pub mod groq;
pub mod prompt;

pub use groq::{GroqClient, GroqConfig};
pub use prompt::build_prompt;
