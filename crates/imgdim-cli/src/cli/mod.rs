//! CLI for imgdim.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use imgdim_core::config::{self, ContextPolicy};
use std::path::PathBuf;

use commands::{
    run_completions, run_dimensions, run_extract, run_insert, run_man, run_menus, InsertArgs,
};

/// Top-level CLI for imgdim.
#[derive(Debug, Parser)]
#[command(name = "imgdim")]
#[command(
    about = "Insert CSS width/height for the image referenced at a cursor position",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Command-line spelling of [`ContextPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Insert at the cursor current when the image finishes loading.
    Resolve,
    /// Insert at the cursor captured when the command ran.
    Capture,
}

impl From<PolicyArg> for ContextPolicy {
    fn from(p: PolicyArg) -> Self {
        match p {
            PolicyArg::Resolve => ContextPolicy::ResolveAtCompletion,
            PolicyArg::Capture => ContextPolicy::CaptureAtInvocation,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Insert the dimensions of the image referenced at LINE:COLUMN into FILE.
    Insert {
        /// Text file (CSS, HTML, JS...) to edit in place.
        file: PathBuf,
        /// Zero-based cursor line.
        #[arg(long)]
        line: usize,
        /// Zero-based cursor column.
        #[arg(long)]
        column: usize,
        /// Line of the other selection anchor (defaults to --line).
        #[arg(long, value_name = "LINE")]
        end_line: Option<usize>,
        /// Column of the other selection anchor (defaults to --column).
        #[arg(long, value_name = "COLUMN")]
        end_column: Option<usize>,
        /// Override the configured context policy.
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
        /// Print the edited text instead of writing the file.
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the filename found at LINE:COLUMN and the path it resolves to.
    Extract {
        file: PathBuf,
        #[arg(long)]
        line: usize,
        #[arg(long)]
        column: usize,
    },

    /// Print the natural size of an image as WIDTHxHEIGHT.
    Dimensions {
        /// Path to a png, jpeg, gif or svg file.
        path: PathBuf,
        /// Print the CSS snippet instead.
        #[arg(long)]
        css: bool,
    },

    /// Show the menu entries the extension registers.
    Menus,

    /// Generate shell completions.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Render the man page to stdout.
    Man,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Insert {
                file,
                line,
                column,
                end_line,
                end_column,
                policy,
                dry_run,
            } => {
                let mut cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                if let Some(p) = policy {
                    cfg.context_policy = p.into();
                }
                let args = InsertArgs {
                    file,
                    line,
                    column,
                    end_line,
                    end_column,
                    dry_run,
                };
                run_insert(&cfg, &args).await?;
            }
            CliCommand::Extract { file, line, column } => run_extract(&file, line, column)?,
            CliCommand::Dimensions { path, css } => run_dimensions(&path, css).await?,
            CliCommand::Menus => run_menus()?,
            CliCommand::Completions { shell } => run_completions(shell),
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
