//! Document tracking
//!
//! Keeps the text and language tag of every open document, applies
//! incremental LSP changes, and answers the two questions the completion
//! engine asks: what surrounds the cursor, and how is the cursor line
//! indented.

use anyhow::Result;
use tower_lsp::lsp_types::*;

/// An open document with its language tag and a line-offset index
#[derive(Debug, Clone)]
pub struct TrackedDocument {
    uri: String,
    language_id: String,
    content: String,
    version: i32,
    line_offsets: Vec<usize>,
}

impl TrackedDocument {
    pub fn new(uri: String, language_id: String, content: String, version: i32) -> Self {
        let line_offsets = compute_line_offsets(&content);
        Self {
            uri,
            language_id,
            content,
            version,
            line_offsets,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Apply a batch of LSP content changes (incremental or full)
    pub fn apply_changes(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) -> Result<()> {
        self.version = version;

        for change in changes {
            match change.range {
                Some(range) => self.splice(range, &change.text)?,
                None => {
                    self.content = change.text;
                    self.line_offsets = compute_line_offsets(&self.content);
                }
            }
        }

        Ok(())
    }

    fn splice(&mut self, range: Range, new_text: &str) -> Result<()> {
        let start = self.position_to_offset(range.start)?;
        let end = self.position_to_offset(range.end)?;

        self.content.replace_range(start..end, new_text);
        self.line_offsets = compute_line_offsets(&self.content);

        Ok(())
    }

    /// Byte offset of an LSP position.
    ///
    /// A character index past the end of its line clamps to the line end;
    /// a line past the end of the document is an error.
    pub fn position_to_offset(&self, position: Position) -> Result<usize> {
        let line = position.line as usize;
        let line_start = *self
            .line_offsets
            .get(line)
            .ok_or_else(|| anyhow::anyhow!("Line {} is out of bounds for {}", line, self.uri))?;

        let rest = &self.content[line_start..];
        let mut offset = line_start;
        let mut remaining = position.character as usize;

        for ch in rest.chars() {
            if ch == '\n' || remaining == 0 {
                break;
            }
            offset += ch.len_utf8();
            remaining -= 1;
        }

        Ok(offset)
    }

    /// Split the document text at the cursor into (prefix, suffix)
    pub fn split_at(&self, position: Position) -> Result<(String, String)> {
        let offset = self.position_to_offset(position)?;
        Ok((
            self.content[..offset].to_string(),
            self.content[offset..].to_string(),
        ))
    }

    /// Leading whitespace of the line the cursor is on
    pub fn line_indent(&self, line: u32) -> &str {
        let Some(&start) = self.line_offsets.get(line as usize) else {
            return "";
        };
        let rest = &self.content[start..];
        let end = rest
            .find(|c: char| c == '\n' || !c.is_whitespace())
            .unwrap_or(rest.len());
        &rest[..end]
    }
}

fn compute_line_offsets(content: &str) -> Vec<usize> {
    let mut offsets = vec![0];
    for (idx, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            offsets.push(idx + 1);
        }
    }
    offsets
}

/// Concurrent store of open documents, keyed by URI
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: dashmap::DashMap<String, TrackedDocument>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        let doc = TrackedDocument::new(
            uri.clone(),
            params.text_document.language_id,
            params.text_document.text,
            params.text_document.version,
        );
        self.documents.insert(uri, doc);
    }

    pub fn did_change(&self, params: DidChangeTextDocumentParams) -> Result<()> {
        let uri = params.text_document.uri.to_string();
        let mut doc = self
            .documents
            .get_mut(&uri)
            .ok_or_else(|| anyhow::anyhow!("Document not found: {}", uri))?;
        doc.apply_changes(params.content_changes, params.text_document.version)
    }

    pub fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.documents.remove(&params.text_document.uri.to_string());
    }

    pub fn get(&self, uri: &str) -> Option<TrackedDocument> {
        self.documents.get(uri).map(|doc| doc.clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> TrackedDocument {
        TrackedDocument::new(
            "file:///test.rs".to_string(),
            "rust".to_string(),
            content.to_string(),
            1,
        )
    }

    #[test]
    fn test_line_offsets() {
        let doc = doc("one\ntwo\nthree");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.position_to_offset(Position::new(1, 0)).unwrap(), 4);
        assert_eq!(doc.position_to_offset(Position::new(2, 3)).unwrap(), 11);
    }

    #[test]
    fn test_character_clamps_to_line_end() {
        let doc = doc("ab\ncd");
        assert_eq!(doc.position_to_offset(Position::new(0, 99)).unwrap(), 2);
    }

    #[test]
    fn test_line_out_of_bounds_errors() {
        let doc = doc("ab");
        assert!(doc.position_to_offset(Position::new(5, 0)).is_err());
    }

    #[test]
    fn test_split_at_cursor() {
        let doc = doc("fn main() {\n    \n}");
        let (prefix, suffix) = doc.split_at(Position::new(1, 4)).unwrap();
        assert_eq!(prefix, "fn main() {\n    ");
        assert_eq!(suffix, "\n}");
    }

    #[test]
    fn test_line_indent() {
        let doc = doc("fn main() {\n    let x = 1;\n\tindent\n}");
        assert_eq!(doc.line_indent(0), "");
        assert_eq!(doc.line_indent(1), "    ");
        assert_eq!(doc.line_indent(2), "\t");
        assert_eq!(doc.line_indent(99), "");
    }

    #[test]
    fn test_incremental_change() {
        let mut doc = doc("line1\nline2\nline3");
        let change = TextDocumentContentChangeEvent {
            range: Some(Range {
                start: Position::new(1, 0),
                end: Position::new(1, 5),
            }),
            range_length: None,
            text: "HELLO".to_string(),
        };

        doc.apply_changes(vec![change], 2).unwrap();
        assert_eq!(doc.content(), "line1\nHELLO\nline3");
        assert_eq!(doc.version(), 2);
    }

    #[test]
    fn test_full_document_sync() {
        let mut doc = doc("old content");
        let change = TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new\ncontent".to_string(),
        };

        doc.apply_changes(vec![change], 2).unwrap();
        assert_eq!(doc.content(), "new\ncontent");
        assert_eq!(doc.line_count(), 2);
    }

    #[test]
    fn test_multibyte_positions() {
        let doc = doc("héllo\nwörld");
        // 'é' is two bytes; character counts stay in chars
        assert_eq!(doc.position_to_offset(Position::new(0, 2)).unwrap(), 3);
        let (prefix, _) = doc.split_at(Position::new(1, 2)).unwrap();
        assert_eq!(prefix, "héllo\nwö");
    }

    #[test]
    fn test_store_open_change_close() {
        let store = DocumentStore::new();
        let uri: Url = "file:///demo.py".parse().unwrap();

        store.did_open(DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: uri.clone(),
                language_id: "python".to_string(),
                version: 1,
                text: "x = 1".to_string(),
            },
        });

        let doc = store.get(uri.as_str()).unwrap();
        assert_eq!(doc.language_id(), "python");
        assert_eq!(doc.content(), "x = 1");

        store
            .did_change(DidChangeTextDocumentParams {
                text_document: VersionedTextDocumentIdentifier {
                    uri: uri.clone(),
                    version: 2,
                },
                content_changes: vec![TextDocumentContentChangeEvent {
                    range: None,
                    range_length: None,
                    text: "x = 2".to_string(),
                }],
            })
            .unwrap();
        assert_eq!(store.get(uri.as_str()).unwrap().content(), "x = 2");

        store.did_close(DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier { uri: uri.clone() },
        });
        assert!(store.get(uri.as_str()).is_none());
    }

    #[test]
    fn test_change_for_unknown_document_errors() {
        let store = DocumentStore::new();
        let result = store.did_change(DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: "file:///missing.rs".parse().unwrap(),
                version: 1,
            },
            content_changes: vec![],
        });
        assert!(result.is_err());
    }
}
