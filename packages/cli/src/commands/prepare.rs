use super::Session;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use manimdsl_editor::{BoundaryResponse, CompileRequest, PlacementBoundary, Quality};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct PrepareArgs {
    /// Program files, style configurations or directories to import
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Ask the compile service for a Python file as well
    #[arg(long)]
    pub generate_python: bool,

    /// Set `hideCode` in the style configuration
    #[arg(long)]
    pub hide_code: bool,

    /// Video quality (low, medium, high)
    #[arg(short, long, default_value = "low")]
    pub quality: Quality,

    /// Placement rectangles (JSON: id → {x, y, width, height}); the request
    /// is then built from the placement view
    #[arg(short, long)]
    pub placement: Option<PathBuf>,

    /// Pretty-print the request
    #[arg(long)]
    pub pretty: bool,
}

/// Print the compile request the page would submit for `args.inputs`
pub fn prepare(args: PrepareArgs, cwd: &Path) -> Result<()> {
    eprintln!("{}", "🔨 Preparing compile request...".bright_blue().bold());

    let request = build_request(&args, cwd)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&request)?
    } else {
        serde_json::to_string(&request)?
    };
    println!("{}", json);

    Ok(())
}

/// Import the inputs, apply the options and build the request, going through
/// the placement view when a placement file is given
pub fn build_request(args: &PrepareArgs, cwd: &Path) -> Result<CompileRequest> {
    let Session {
        workflow,
        mut state,
        mut surface,
    } = Session::open(cwd, &args.inputs)?;

    if args.generate_python {
        workflow.toggle_generate_python(&mut state);
    }
    workflow.set_quality(&mut state, args.quality);
    if args.hide_code {
        workflow.set_hide_code(&mut state, true, &mut surface);
    }

    let request = match &args.placement {
        Some(path) => {
            let path = cwd.join(path);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read placement file {}", path.display()))?;
            let boundary: PlacementBoundary = serde_json::from_str(&content)
                .with_context(|| format!("Invalid placement file {}", path.display()))?;

            workflow.finish_advanced_placement(&mut state, Ok(BoundaryResponse { data: boundary }))?;
            workflow.begin_confirm_placement(&mut state, &surface)?
        }
        None => workflow.begin_compile(&mut state, &surface)?,
    };

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn args(inputs: &[&str]) -> PrepareArgs {
        PrepareArgs {
            inputs: inputs.iter().map(PathBuf::from).collect(),
            generate_python: false,
            hide_code: false,
            quality: Quality::Low,
            placement: None,
            pretty: false,
        }
    }

    #[test]
    fn test_hide_code_reaches_request() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.manimdsl"), "let a = 1").unwrap();

        let request = build_request(
            &PrepareArgs {
                hide_code: true,
                ..args(&["a.manimdsl"])
            },
            dir.path(),
        )
        .unwrap();

        assert_eq!(request.program, "let a = 1");
        assert_eq!(request.style, "{\n    \"hideCode\": true\n}");
        assert_eq!(request.quality, Quality::Low);
        assert!(!request.generate_python);
    }

    #[test]
    fn test_prepare_with_placement_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.manimdsl"), "let a = 1").unwrap();
        fs::write(dir.path().join("style.json"), r#"{"codeTracking": "stepOver"}"#).unwrap();
        fs::write(
            dir.path().join("placement.json"),
            r#"{"a": {"x": 0, "y": 0, "width": 700, "height": 400}}"#,
        )
        .unwrap();

        let request = build_request(
            &PrepareArgs {
                generate_python: true,
                quality: Quality::High,
                placement: Some(PathBuf::from("placement.json")),
                ..args(&["a.manimdsl", "style.json"])
            },
            dir.path(),
        )
        .unwrap();

        assert_eq!(request.quality, Quality::High);
        assert!(request.generate_python);

        let style: Value = serde_json::from_str(&request.style).unwrap();
        assert_eq!(style["codeTracking"], "stepOver");
        let a = &style["positions"]["a"];
        assert_eq!(a["x"], -64.0 / 9.0);
        assert_eq!(a["y"], -4.0);
        assert_eq!(a["height"], 8.0);
        assert!((a["width"].as_f64().unwrap() - 128.0 / 9.0).abs() < 1e-9);

        let serialized: Value = serde_json::to_value(&request).unwrap();
        assert_eq!(serialized["generatePython"], true);
        assert_eq!(serialized["quality"], "high");
    }

    #[test]
    fn test_invalid_placement_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.manimdsl"), "let a = 1").unwrap();
        fs::write(dir.path().join("placement.json"), "not json").unwrap();

        let result = build_request(
            &PrepareArgs {
                placement: Some(PathBuf::from("placement.json")),
                ..args(&["a.manimdsl"])
            },
            dir.path(),
        );

        assert!(result.is_err());
    }
}
