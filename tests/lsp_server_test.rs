//! Server-level tests driving the LSP backend directly

use ghostline::config::{Config, DebounceConfig};
use ghostline::server::GhostlineLsp;
use tower_lsp::lsp_types::*;
use tower_lsp::{LanguageServer, LspService};

fn test_config() -> Config {
    Config {
        // Keep tests fast; the production default is 3000ms
        debounce: DebounceConfig { idle_delay_ms: 20 },
        ..Default::default()
    }
}

fn backend() -> (LspService<GhostlineLsp>, tower_lsp::ClientSocket) {
    std::env::remove_var("GROQ_API_KEY");
    LspService::new(|client| GhostlineLsp::new(client, test_config()))
}

#[tokio::test]
async fn test_initialize_advertises_completions() {
    let (service, _socket) = backend();

    let result = service
        .inner()
        .initialize(InitializeParams::default())
        .await
        .unwrap();

    assert!(result.capabilities.completion_provider.is_some());
    assert!(matches!(
        result.capabilities.text_document_sync,
        Some(TextDocumentSyncCapability::Options(_))
    ));

    let info = result.server_info.unwrap();
    assert_eq!(info.name, "Ghostline");
}

#[tokio::test]
async fn test_document_lifecycle() {
    let (service, _socket) = backend();
    let backend = service.inner();
    let uri: Url = "file:///lifecycle.rs".parse().unwrap();

    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "rust".to_string(),
                version: 1,
                text: "fn main() {}".to_string(),
            },
        })
        .await;
    assert!(backend.store().get(uri.as_str()).is_some());

    backend
        .did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
        })
        .await;
    assert!(backend.store().get(uri.as_str()).is_none());
}

#[tokio::test]
async fn test_completion_without_client_returns_empty_list() {
    let (service, _socket) = backend();
    let backend = service.inner();
    let uri: Url = "file:///quiet.rs".parse().unwrap();

    backend
        .did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "rust".to_string(),
                version: 1,
                text: "fn main() {}".to_string(),
            },
        })
        .await;

    let response = backend
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri },
                position: Position::new(0, 11),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        })
        .await
        .unwrap();

    match response {
        Some(CompletionResponse::Array(items)) => assert!(items.is_empty()),
        other => panic!("expected an empty completion array, got {:?}", other),
    }
}

#[tokio::test]
async fn test_completion_for_unopened_document_returns_empty_list() {
    let (service, _socket) = backend();

    let response = service
        .inner()
        .completion(CompletionParams {
            text_document_position: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier {
                    uri: "file:///never-opened.py".parse().unwrap(),
                },
                position: Position::new(0, 0),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
            context: None,
        })
        .await
        .unwrap();

    match response {
        Some(CompletionResponse::Array(items)) => assert!(items.is_empty()),
        other => panic!("expected an empty completion array, got {:?}", other),
    }
}

#[tokio::test]
async fn test_shutdown() {
    let (service, _socket) = backend();
    assert!(service.inner().shutdown().await.is_ok());
}
