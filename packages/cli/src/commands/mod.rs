pub mod export;
pub mod prepare;

pub use export::{export, ExportArgs};
pub use prepare::{prepare, PrepareArgs};

use anyhow::{anyhow, Result};
use colored::Colorize;
use manimdsl_editor::{
    BufferSurface, CenteredFrameTransform, EditorConfig, ImportOutcome, ImportedFile, Workflow,
    WorkflowState,
};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Headless stand-in for the editor page
pub struct Session {
    pub workflow: Workflow<CenteredFrameTransform>,
    pub state: WorkflowState,
    pub surface: BufferSurface,
}

impl Session {
    /// Load config from `cwd` and import `inputs` as the file picker would
    pub fn open(cwd: &Path, inputs: &[PathBuf]) -> Result<Self> {
        let config = EditorConfig::load(cwd)?;
        tracing::debug!("Using editor config {:?}", config);
        let workflow = Workflow::new(config.clone(), config.frame_transform());
        let mut state = workflow.new_state();
        let mut surface = BufferSurface::new();

        let files = collect_files(cwd, inputs)?;
        for outcome in workflow.import_files(&mut state, files, &mut surface) {
            match outcome {
                ImportOutcome::Loaded { kind, file_name } => {
                    eprintln!("   {} {} ({})", "✓".green(), file_name, kind);
                }
                ImportOutcome::Ignored { file_name } => {
                    eprintln!("   {} {} (unrecognized, skipped)", "-".yellow(), file_name);
                }
            }
        }

        Ok(Self {
            workflow,
            state,
            surface,
        })
    }
}

/// Files named by `inputs`, with directories expanded in file-name order
fn collect_files(cwd: &Path, inputs: &[PathBuf]) -> Result<Vec<ImportedFile>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = cwd.join(input);
        if path.is_dir() {
            for entry in WalkDir::new(&path)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() {
                    paths.push(entry.into_path());
                }
            }
        } else if path.is_file() {
            paths.push(path);
        } else {
            return Err(anyhow!("Input path does not exist: {}", path.display()));
        }
    }

    paths
        .into_iter()
        .map(|path| -> Result<ImportedFile> {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let text = String::from_utf8_lossy(&fs::read(&path)?).into_owned();
            Ok(ImportedFile::new(name, text))
        })
        .collect()
}
