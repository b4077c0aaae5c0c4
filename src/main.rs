//! E-Reader View - Entry Point
//!
//! Loads a page description, runs the reader over it and prints a JSON report
//! of the reader's state after each scripted step.

use clap::Parser;
use ereader_view::dom::MemoryDom;
use ereader_view::model::ReaderError;
use ereader_view::simulate::parse_script;
use ereader_view::Simulation;
use std::path::PathBuf;
use tracing::info;

/// E-Reader View - paginate a page description and replay a reading session
#[derive(Parser, Debug)]
#[command(name = "ereader-view")]
#[command(version)]
#[command(about = "Paginated e-ink reader view over a JSON page description")]
pub struct Args {
    /// Path to the JSON page description
    pub document: PathBuf,

    /// Override the viewport height reported by the page (CSS pixels)
    #[arg(long)]
    pub viewport_height: Option<f64>,

    /// Fraction of the viewport reserved at top and bottom, in [0, 0.5)
    #[arg(short, long)]
    pub margins: Option<f64>,

    /// Start in focused-column mode instead of full width
    #[arg(long)]
    pub focused: bool,

    /// Steps to replay, comma or space separated, e.g. "next,next,key:h,wait:2000"
    #[arg(short, long, default_value = "")]
    pub script: String,

    /// Read additional steps from a file (appended after --script)
    #[arg(long)]
    pub script_file: Option<PathBuf>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

fn load_document(args: &Args) -> Result<MemoryDom, ReaderError> {
    let document_error = |reason: String| ReaderError::Document {
        path: args.document.clone(),
        reason,
    };
    let json = std::fs::read_to_string(&args.document).map_err(|e| document_error(e.to_string()))?;
    let mut dom = MemoryDom::from_json(&json).map_err(|e| document_error(e.to_string()))?;
    if let Some(height) = args.viewport_height {
        dom.set_viewport_height(height);
    }
    Ok(dom)
}

fn load_script(args: &Args) -> Result<String, ReaderError> {
    let mut script = args.script.clone();
    if let Some(path) = &args.script_file {
        let extra = std::fs::read_to_string(path).map_err(|e| ReaderError::Document {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        script.push('\n');
        script.push_str(&extra);
    }
    Ok(script)
}

fn run(args: Args) -> Result<(), ReaderError> {
    // Defaults → Config File → Env Vars → CLI Args
    let full_width_override = if args.focused { Some(false) } else { None };
    let config = ereader_view::config::resolve(args.config.clone(), args.margins, full_width_override)?;

    ereader_view::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let steps = parse_script(&load_script(&args)?)?;
    let dom = load_document(&args)?;

    let mut simulation = Simulation::start(dom, config);
    if let Some(e) = simulation.reader().init_error() {
        eprintln!("ereader-view: reader stayed inactive: {}", e);
    }
    let report = simulation.run_script(&steps);

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run(Args::parse())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["ereader-view", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["ereader-view", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_document_is_required() {
        let result = Args::try_parse_from(["ereader-view"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["ereader-view", "page.json"]);
        assert_eq!(args.document, PathBuf::from("page.json"));
        assert_eq!(args.viewport_height, None);
        assert_eq!(args.margins, None);
        assert!(!args.focused);
        assert_eq!(args.script, "");
        assert_eq!(args.script_file, None);
        assert!(!args.pretty);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_margins_short_and_long() {
        let short = Args::parse_from(["ereader-view", "p.json", "-m", "0.05"]);
        let long = Args::parse_from(["ereader-view", "p.json", "--margins", "0.05"]);
        assert_eq!(short.margins, Some(0.05));
        assert_eq!(long.margins, Some(0.05));
    }

    #[test]
    fn test_margins_must_be_numeric() {
        let result = Args::try_parse_from(["ereader-view", "p.json", "--margins", "wide"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_script_and_flags() {
        let args = Args::parse_from([
            "ereader-view",
            "p.json",
            "--focused",
            "--viewport-height",
            "1024",
            "-s",
            "next key:h wait:2000",
            "--pretty",
        ]);
        assert!(args.focused);
        assert_eq!(args.viewport_height, Some(1024.0));
        assert_eq!(args.script, "next key:h wait:2000");
        assert!(args.pretty);
    }

    #[test]
    fn test_config_path() {
        let args = Args::parse_from(["ereader-view", "p.json", "--config", "/tmp/ev.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/ev.toml")));
    }

    #[test]
    fn test_missing_document_reports_path() {
        let args = Args::parse_from(["ereader-view", "/nonexistent/page.json"]);
        match load_document(&args) {
            Err(ReaderError::Document { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/page.json"))
            }
            other => panic!("Expected Document error, got {:?}", other.map(|_| ())),
        }
    }
}
