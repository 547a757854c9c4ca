//! # Dual-Document Store
//!
//! One physical editing surface stands in for two logical documents: the
//! program source and the style configuration. Exactly one of them is
//! *active* (bound to the surface) at any time; the other lives in the store.
//!
//! ## Protocol
//!
//! ```text
//! switch_active_to(target)
//!   flush: surface.read()  → active document
//!   bind:  active          = target
//!   load:  target document → surface.write()
//! ```
//!
//! The flush always precedes the load, so a switch never loses content.
//! Reads of the active document flush first as well, so the store's view is
//! current whenever anything reads through it.

use crate::config::EditorConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutable text buffer owned by the UI layer
pub trait EditingSurface {
    fn read(&self) -> String;
    fn write(&mut self, text: &str);
}

/// In-memory surface for headless drivers and tests
#[derive(Debug, Default, Clone)]
pub struct BufferSurface {
    text: String,
}

impl BufferSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl EditingSurface for BufferSurface {
    fn read(&self) -> String {
        self.text.clone()
    }

    fn write(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

/// Which logical document a payload belongs to (and which one is active)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentKind {
    ProgramSource,
    StyleConfig,
}

impl DocumentKind {
    pub fn other(self) -> Self {
        match self {
            DocumentKind::ProgramSource => DocumentKind::StyleConfig,
            DocumentKind::StyleConfig => DocumentKind::ProgramSource,
        }
    }

    /// Text a document of this kind reads as before it is ever populated
    pub fn empty_text(self) -> &'static str {
        match self {
            DocumentKind::ProgramSource => "",
            DocumentKind::StyleConfig => "{}",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::ProgramSource => f.write_str("program source"),
            DocumentKind::StyleConfig => f.write_str("style configuration"),
        }
    }
}

/// Named text payload
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalDocument {
    pub kind: DocumentKind,

    /// Filename used for downloads; replaced on import
    pub file_name: String,

    /// `None` until the document is populated by an import or a flush
    text: Option<String>,
}

impl LogicalDocument {
    pub fn new(kind: DocumentKind, file_name: impl Into<String>) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            text: None,
        }
    }

    /// Stored text, or the kind's empty text if never populated
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or(self.kind.empty_text())
    }

    pub fn is_populated(&self) -> bool {
        self.text.is_some()
    }

    fn set_text(&mut self, text: String) {
        self.text = Some(text);
    }
}

/// Two-slot store mediating the editing surface
#[derive(Debug, Clone)]
pub struct DocumentStore {
    program: LogicalDocument,
    style: LogicalDocument,
    active: DocumentKind,
}

impl DocumentStore {
    pub fn new(program_file_name: impl Into<String>, style_file_name: impl Into<String>) -> Self {
        Self {
            program: LogicalDocument::new(DocumentKind::ProgramSource, program_file_name),
            style: LogicalDocument::new(DocumentKind::StyleConfig, style_file_name),
            active: DocumentKind::ProgramSource,
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(&config.program_file_name, &config.style_file_name)
    }

    pub fn active(&self) -> DocumentKind {
        self.active
    }

    /// Stored document, without consulting the surface
    pub fn document(&self, kind: DocumentKind) -> &LogicalDocument {
        match kind {
            DocumentKind::ProgramSource => &self.program,
            DocumentKind::StyleConfig => &self.style,
        }
    }

    fn document_mut(&mut self, kind: DocumentKind) -> &mut LogicalDocument {
        match kind {
            DocumentKind::ProgramSource => &mut self.program,
            DocumentKind::StyleConfig => &mut self.style,
        }
    }

    /// Bind `target` to the surface, flushing the current document first
    pub fn switch_active_to(&mut self, target: DocumentKind, surface: &mut dyn EditingSurface) {
        if target == self.active {
            return;
        }

        self.flush(surface);
        tracing::debug!("Switching editing surface from {} to {}", self.active, target);
        self.active = target;
        surface.write(self.document(target).text());
    }

    /// Flush the surface into the active document and return its text
    pub fn read_active(&mut self, surface: &dyn EditingSurface) -> String {
        self.flush(surface);
        self.document(self.active).text().to_string()
    }

    pub fn read_program_source(&mut self, surface: &dyn EditingSurface) -> String {
        self.read(DocumentKind::ProgramSource, surface)
    }

    pub fn read_style_config(&mut self, surface: &dyn EditingSurface) -> String {
        self.read(DocumentKind::StyleConfig, surface)
    }

    /// Current text of `kind`; flushes first when `kind` is active
    pub fn read(&mut self, kind: DocumentKind, surface: &dyn EditingSurface) -> String {
        if kind == self.active {
            self.read_active(surface)
        } else {
            self.document(kind).text().to_string()
        }
    }

    /// Store `text` as `kind`'s content, mirroring it onto the surface if
    /// `kind` is active
    pub fn store(&mut self, kind: DocumentKind, text: String, surface: &mut dyn EditingSurface) {
        if kind == self.active {
            surface.write(&text);
        }
        self.document_mut(kind).set_text(text);
    }

    /// Overwrite `kind` and bind it to the surface without flushing.
    ///
    /// Whatever the surface held for the previously active document is
    /// discarded unless it was flushed earlier.
    pub(crate) fn replace(
        &mut self,
        kind: DocumentKind,
        file_name: String,
        text: String,
        surface: &mut dyn EditingSurface,
    ) {
        surface.write(&text);
        let document = self.document_mut(kind);
        document.file_name = file_name;
        document.set_text(text);
        self.active = kind;
    }

    pub(crate) fn flush(&mut self, surface: &dyn EditingSurface) {
        let text = surface.read();
        self.document_mut(self.active).set_text(text);
    }
}
