//! Download payloads for the two logical documents.

use crate::document::{DocumentKind, DocumentStore, EditingSurface};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedFile {
    pub file_name: String,
    pub text: String,
}

impl DocumentStore {
    /// Current text of `kind` under its tracked filename.
    ///
    /// Flushes first when `kind` is active. Empty text exports as the kind's
    /// empty text.
    pub fn export_document(
        &mut self,
        kind: DocumentKind,
        surface: &dyn EditingSurface,
    ) -> ExportedFile {
        let mut text = self.read(kind, surface);
        if text.is_empty() {
            text = kind.empty_text().to_string();
        }

        ExportedFile {
            file_name: self.document(kind).file_name.clone(),
            text,
        }
    }

    /// Both documents, style configuration first
    pub fn export_project(&mut self, surface: &dyn EditingSurface) -> Vec<ExportedFile> {
        vec![
            self.export_document(DocumentKind::StyleConfig, surface),
            self.export_document(DocumentKind::ProgramSource, surface),
        ]
    }
}
