pub mod commands;
pub mod errors;
pub mod output;

use crate::config::ConfigArgs;
use crate::model::{PatternKind, ReplaceMode};
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "file-replace",
    version,
    about = "Find and replace text in files"
)]
pub struct Cli {
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    pub format: OutputFormat,

    #[arg(long, global = true)]
    pub compact: bool,

    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Replace {
        file: PathBuf,
        from: String,
        to: String,
        #[arg(long, value_enum, default_value_t = ReplaceMode::All)]
        mode: ReplaceMode,
        #[arg(long, value_enum, default_value_t = PatternKind::Literal)]
        pattern: PatternKind,
    },
    Preview {
        file: PathBuf,
        from: String,
        #[arg(long, value_enum, default_value_t = PatternKind::Literal)]
        pattern: PatternKind,
        #[arg(long)]
        max_matches: Option<usize>,
    },
    Batch {
        glob: String,
        from: String,
        to: String,
        #[arg(long, value_enum, default_value_t = ReplaceMode::All)]
        mode: ReplaceMode,
        #[arg(long, value_enum, default_value_t = PatternKind::Literal)]
        pattern: PatternKind,
    },
    List {
        #[arg(long)]
        glob: Option<String>,
    },
}

pub async fn run_command(config: ConfigArgs, command: Commands) -> Result<Value> {
    match command {
        Commands::Replace {
            file,
            from,
            to,
            mode,
            pattern,
        } => commands::write::replace(config, file, from, to, mode, pattern).await,
        Commands::Preview {
            file,
            from,
            pattern,
            max_matches,
        } => commands::read::preview(config, file, from, pattern, max_matches).await,
        Commands::Batch {
            glob,
            from,
            to,
            mode,
            pattern,
        } => commands::write::batch(config, glob, from, to, mode, pattern).await,
        Commands::List { glob } => commands::read::list(config, glob).await,
    }
}
