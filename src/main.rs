// ABOUTME: CLI entry point: argument handling and repl/executor dispatch

use clap::Parser;
use sigmaf::config;
use sigmaf::env::Environment;
use sigmaf::error::ReplError;
use sigmaf::repl;
use std::path::{Path, PathBuf};

/// SigmaF interpreter: execute a `.sf` file or start an interactive REPL
#[derive(Parser, Debug)]
#[command(name = "sigmaf")]
#[command(about = "The SigmaF programming language")]
#[command(disable_version_flag = true)]
struct CliArgs {
    /// Path to the SigmaF file
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Show the version of SigmaF
    #[arg(short = 'v', long = "version")]
    version: bool,

    /// Start the repl (after executing the file, when a path is given)
    #[arg(short = 'r', long = "repl")]
    repl: bool,

    /// Show the cover of SigmaF
    #[arg(short = 'c', long = "cover", conflicts_with = "ncover")]
    cover: bool,

    /// Don't show the cover of SigmaF
    #[arg(short = 'n', long = "ncover")]
    ncover: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    if args.version {
        println!("SigmaF v{}", config::VERSION);
        return Ok(());
    }

    if let Some(path) = &args.path {
        if let Err(error) = validate_path(path) {
            eprintln!("{}", error);
            std::process::exit(1);
        }
    }

    if args.cover {
        println!("{}", config::cover());
    } else if !args.ncover {
        println!("{}", config::head_line());
    }

    match (args.path, args.repl) {
        (Some(path), true) => {
            let env = repl::execute_file(&path)?;
            repl::start(Some(path), env)?;
        }
        (Some(path), false) => {
            repl::execute_file(&path)?;
        }
        (None, _) => {
            repl::start(None, Environment::new())?;
        }
    }

    Ok(())
}

/// A given path must exist and carry the `.sf` extension.
fn validate_path(path: &Path) -> Result<(), ReplError> {
    if !path.is_file() {
        return Err(ReplError::PathDoesNotExist {
            path: path.display().to_string(),
        });
    }
    if path.extension().and_then(|e| e.to_str()) != Some("sf") {
        return Err(ReplError::NotASigmaFFile {
            path: path.display().to_string(),
        });
    }
    Ok(())
}
