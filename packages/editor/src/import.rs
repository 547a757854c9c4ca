//! File import classification.
//!
//! Imported files are routed by filename suffix. A recognized file overwrites
//! its document and takes over the editing surface directly, bypassing the
//! flush-then-load of a switch. Unrecognized files are skipped.

use crate::config::EditorConfig;
use crate::document::{DocumentKind, DocumentStore, EditingSurface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedFile {
    pub name: String,
    pub text: String,
}

impl ImportedFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Loaded { kind: DocumentKind, file_name: String },
    /// Suffix matched neither document kind; nothing was mutated
    Ignored { file_name: String },
}

/// Document kind for `file_name`, if its suffix is recognized
pub fn classify(file_name: &str, config: &EditorConfig) -> Option<DocumentKind> {
    let has_suffix = |extension: &str| {
        file_name
            .strip_suffix(extension)
            .is_some_and(|stem| stem.ends_with('.'))
    };

    if has_suffix(&config.program_extension) {
        Some(DocumentKind::ProgramSource)
    } else if has_suffix(&config.style_extension) {
        Some(DocumentKind::StyleConfig)
    } else {
        None
    }
}

impl DocumentStore {
    pub fn import_file(
        &mut self,
        file: ImportedFile,
        config: &EditorConfig,
        surface: &mut dyn EditingSurface,
    ) -> ImportOutcome {
        let Some(kind) = classify(&file.name, config) else {
            tracing::warn!("Ignoring imported file with unrecognized type: {}", file.name);
            return ImportOutcome::Ignored { file_name: file.name };
        };

        if config.flush_before_import {
            self.flush(surface);
        }

        tracing::debug!("Imported {} as {}", file.name, kind);
        self.replace(kind, file.name.clone(), file.text, surface);

        ImportOutcome::Loaded {
            kind,
            file_name: file.name,
        }
    }

    /// Import a batch in order; the last recognized file ends up active
    pub fn import_files(
        &mut self,
        files: impl IntoIterator<Item = ImportedFile>,
        config: &EditorConfig,
        surface: &mut dyn EditingSurface,
    ) -> Vec<ImportOutcome> {
        let mut outcomes = Vec::new();
        for file in files {
            outcomes.push(self.import_file(file, config, surface));
        }
        outcomes
    }
}
