//! LSP server backend
//!
//! Registers a completion provider for every file type and wires the
//! document store and completion engine to the protocol. Completion results
//! are a list of zero or one plain-text items; anything that goes wrong
//! upstream surfaces here as an empty list, never as an error response.

use std::sync::Arc;
use std::time::Duration;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use crate::ai::groq::{GroqClient, GroqConfig};
use crate::completion::CompletionEngine;
use crate::config::Config;
use crate::text_sync::DocumentStore;

pub struct GhostlineLsp {
    client: Client,
    engine: Arc<CompletionEngine>,
    store: Arc<DocumentStore>,
    model: String,
}

impl GhostlineLsp {
    pub fn new(client: Client, config: Config) -> Self {
        let store = Arc::new(DocumentStore::new());

        // AI completions stay disabled without a key; the server still runs
        let groq = match std::env::var("GROQ_API_KEY") {
            Ok(api_key) => {
                let groq_config = GroqConfig {
                    api_key,
                    endpoint: config.groq.endpoint.clone(),
                    model: config.groq.model.clone(),
                    max_tokens: config.groq.max_tokens,
                    temperature: config.groq.temperature,
                    timeout_ms: config.groq.timeout_ms,
                };
                match GroqClient::new(groq_config) {
                    Ok(client) => Some(Arc::new(client)),
                    Err(e) => {
                        tracing::warn!("Failed to initialize Groq client: {}", e);
                        None
                    }
                }
            }
            Err(_) => {
                tracing::info!("GROQ_API_KEY not set, AI completions disabled");
                None
            }
        };

        let engine = Arc::new(CompletionEngine::new(
            store.clone(),
            groq,
            Duration::from_millis(config.debounce.idle_delay_ms),
            config.comment_policy(),
        ));

        Self {
            client,
            engine,
            store,
            model: config.groq.model,
        }
    }

    pub fn engine(&self) -> &CompletionEngine {
        &self.engine
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for GhostlineLsp {
    async fn initialize(&self, _: InitializeParams) -> Result<InitializeResult> {
        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Options(
                    TextDocumentSyncOptions {
                        open_close: Some(true),
                        change: Some(TextDocumentSyncKind::INCREMENTAL),
                        will_save: None,
                        will_save_wait_until: None,
                        save: None,
                    },
                )),
                completion_provider: Some(CompletionOptions::default()),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "Ghostline".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let status = if self.engine.has_client() {
            format!("Ghostline ready ({})", self.model)
        } else {
            "Ghostline ready (no GROQ_API_KEY, completions disabled)".to_string()
        };
        self.client.log_message(MessageType::INFO, status).await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        tracing::debug!("Opened {}", params.text_document.uri);
        self.store.did_open(params);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        if let Err(e) = self.store.did_change(params) {
            tracing::warn!("Failed to apply change to {}: {}", uri, e);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        self.engine.cancel(&uri);
        self.store.did_close(params);
    }

    async fn completion(&self, params: CompletionParams) -> Result<Option<CompletionResponse>> {
        let uri = params.text_document_position.text_document.uri.to_string();
        let position = params.text_document_position.position;

        let items: Vec<CompletionItem> = self
            .engine
            .suggest(&uri, position)
            .await
            .into_iter()
            .map(|text| CompletionItem {
                label: text.lines().next().unwrap_or_default().trim().to_string(),
                kind: Some(CompletionItemKind::TEXT),
                detail: Some(format!("Groq ({})", self.model)),
                insert_text: Some(text),
                ..Default::default()
            })
            .collect();

        Ok(Some(CompletionResponse::Array(items)))
    }
}

/// Serve LSP over stdio until the client disconnects
pub async fn run(config: Config) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| GhostlineLsp::new(client, config));

    Server::new(stdin, stdout, socket).serve(service).await;
}
