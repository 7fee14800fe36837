//! Completion engine
//!
//! Orchestrates one completion request end to end, from the debounce gate
//! through the Groq call to response formatting. Failures never leave this
//! module as errors; every path that cannot produce a suggestion resolves to
//! an empty list.

use std::sync::Arc;
use std::time::Duration;

use tower_lsp::lsp_types::Position;

use crate::ai::groq::GroqClient;
use crate::ai::prompt;
use crate::debounce::{Admission, DebounceGate};
use crate::format::{CommentPolicy, CompletionFormatter};
use crate::language;
use crate::text_sync::DocumentStore;

pub struct CompletionEngine {
    gate: DebounceGate,
    formatter: CompletionFormatter,
    groq: Option<Arc<GroqClient>>,
    store: Arc<DocumentStore>,
}

impl CompletionEngine {
    pub fn new(
        store: Arc<DocumentStore>,
        groq: Option<Arc<GroqClient>>,
        idle_delay: Duration,
        policy: CommentPolicy,
    ) -> Self {
        Self {
            gate: DebounceGate::new(idle_delay),
            formatter: CompletionFormatter::new(policy),
            groq,
            store,
        }
    }

    pub fn has_client(&self) -> bool {
        self.groq.is_some()
    }

    pub fn idle_delay(&self) -> Duration {
        self.gate.delay()
    }

    /// Abort any pending request for a document (called on close)
    pub fn cancel(&self, uri: &str) {
        self.gate.cancel(uri);
    }

    /// Produce zero or one suggestion for the cursor position.
    ///
    /// No network call is made when the request is superseded at the gate,
    /// when the document (or the text around the cursor) is blank, or when
    /// no client is configured.
    pub async fn suggest(&self, uri: &str, position: Position) -> Vec<String> {
        if self.gate.admit(uri).await == Admission::Superseded {
            tracing::debug!("Completion request superseded for {}", uri);
            return Vec::new();
        }

        // Re-read the document after the idle delay; it may have changed
        // or closed while we slept
        let Some(doc) = self.store.get(uri) else {
            tracing::debug!("Document not tracked: {}", uri);
            return Vec::new();
        };

        if doc.content().trim().is_empty() {
            return Vec::new();
        }

        let (prefix, suffix) = match doc.split_at(position) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::debug!("Cursor position invalid for {}: {}", uri, e);
                return Vec::new();
            }
        };

        if prefix.trim().is_empty() && suffix.trim().is_empty() {
            return Vec::new();
        }

        let Some(client) = &self.groq else {
            return Vec::new();
        };

        let lang = language::lookup(doc.language_id());
        let file_name = uri.rsplit('/').next().unwrap_or(uri);
        let request = prompt::build_prompt(file_name, lang, &prefix, &suffix);

        tracing::debug!("Requesting completion for {} ({})", uri, lang.id);

        let raw = match client.complete(&request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Completion request failed for {}: {:#}", uri, e);
                return Vec::new();
            }
        };

        let indent = doc.line_indent(position.line);
        match self.formatter.format(&raw, lang, indent) {
            Some(text) => vec![text],
            None => {
                tracing::debug!("Completion for {} was empty after formatting", uri);
                Vec::new()
            }
        }
    }
}
