use super::Session;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Program files, style configurations or directories to import
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Set `hideCode` in the style configuration before exporting
    #[arg(long)]
    pub hide_code: bool,
}

/// Write both documents under their tracked filenames
pub fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let Session {
        workflow,
        mut state,
        mut surface,
    } = Session::open(cwd, &args.inputs)?;

    if args.hide_code {
        workflow.set_hide_code(&mut state, true, &mut surface);
    }

    let out_dir = cwd.join(&args.out_dir);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    for file in state.documents_mut().export_project(&surface) {
        let path = out_dir.join(&file.file_name);
        fs::write(&path, &file.text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("   {} {}", "✓".green(), path.display());
    }

    eprintln!("✨ {} Project exported", "Done".green().bold());
    Ok(())
}
