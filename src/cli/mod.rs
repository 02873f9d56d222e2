//! CLI command definitions and handlers

mod analyze;
mod init;
mod patterns;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// slop-detector - find AI-generated filler in Python code
#[derive(Parser, Debug)]
#[command(name = "slop-detector")]
#[command(
    version,
    about = "Score Python files for logic density, jargon inflation and unused dependencies",
    after_help = "\
Examples:
  slop-detector .                             Analyze the current directory
  slop-detector analyze src/app.py            Analyze one file
  slop-detector analyze . --fail-on critical  Exit code 1 on a critical verdict (CI mode)
  slop-detector patterns                      List the built-in patterns
  slop-detector init                          Write a default slop-detector.toml"
)]
pub struct Cli {
    /// File or directory to analyze (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Explicit config file (default: discover in the project root)
    #[arg(long, short = 'c', global = true, env = "SLOP_DETECTOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of parallel workers (1-64)
    #[arg(long, global = true, default_value = "8", value_parser = parse_workers)]
    pub workers: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a file or project and print the result as JSON
    Analyze {
        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,

        /// Roll a single file up as a one-file project
        #[arg(long)]
        project: bool,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Exit with code 1 when the verdict is at least this bad
        #[arg(long, value_parser = ["critical", "suspicious"])]
        fail_on: Option<String>,
    },

    /// List built-in patterns
    Patterns {
        /// JSON output for scripting
        #[arg(long)]
        json: bool,
    },

    /// Write a slop-detector.toml with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Analyze {
            compact,
            project,
            output,
            fail_on,
        }) => analyze::run(analyze::AnalyzeOptions {
            path: &cli.path,
            config: cli.config.as_deref(),
            workers: cli.workers,
            compact,
            project,
            output: output.as_deref(),
            fail_on,
        }),

        Some(Commands::Patterns { json }) => patterns::run(&cli.path, cli.config.as_deref(), json),

        Some(Commands::Init { force }) => init::run(&cli.path, force),

        None => analyze::run(analyze::AnalyzeOptions {
            path: &cli.path,
            config: cli.config.as_deref(),
            workers: cli.workers,
            compact: false,
            project: false,
            output: None,
            fail_on: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_workers_bounds() {
        assert_eq!(parse_workers("4"), Ok(4));
        assert!(parse_workers("0").is_err());
        assert!(parse_workers("65").is_err());
        assert!(parse_workers("many").is_err());
    }

    #[test]
    fn test_default_command_is_analysis_of_cwd() {
        let cli = Cli::try_parse_from(["slop-detector"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.path, PathBuf::from("."));
        assert_eq!(cli.workers, 8);
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::try_parse_from([
            "slop-detector",
            "analyze",
            "src/app.py",
            "--compact",
            "--fail-on",
            "critical",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Analyze { compact, fail_on, .. }) => {
                assert!(compact);
                assert_eq!(fail_on.as_deref(), Some("critical"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.path, PathBuf::from("src/app.py"));
    }

    #[test]
    fn test_fail_on_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["slop-detector", "analyze", "--fail-on", "meh"]).is_err());
    }
}
