//! Ghostline Library
//!
//! This library implements an LSP server that offers AI-generated code
//! completions: a per-document debounce gate, prompt composition from the
//! text surrounding the cursor, a Groq chat-completions client, and a
//! formatter that turns raw model output into insertable code.

pub mod ai;
pub mod completion;
pub mod config;
pub mod debounce;
pub mod format;
pub mod language;
pub mod server;
pub mod text_sync;

// Re-export commonly used types for convenience
pub use ai::groq::{GroqClient, GroqConfig};
pub use completion::CompletionEngine;
pub use debounce::{Admission, DebounceGate};
pub use format::{CommentPolicy, CompletionFormatter};
pub use language::LanguageSpec;
pub use text_sync::{DocumentStore, TrackedDocument};
