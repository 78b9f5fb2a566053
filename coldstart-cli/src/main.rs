//! coldstart CLI tool

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::cognitive_complexity)]
#![allow(clippy::multiple_crate_versions)]

mod commands;
mod prompts;
mod repl;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use commands::{
    AddModuleCommand, ExportCommand, ExtractRulesCommand, InitCommand, InitConfigCommand,
    InjectCommand, ListCommand, ListKind, ProcessCommand, UpdateRulesCommand,
};

#[derive(Parser)]
#[command(name = "coldstart")]
#[command(version)]
#[command(about = "Bootstrap AI-assistant rule and plan documents", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Target project directory for the interactive shell
    target_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect the stack and stage the plan documents (stage 1)
    Init(InitArgs),
    /// Render a library module's rules into a project
    Inject {
        /// Target project directory
        target_dir: PathBuf,
        /// Module id; prompted when omitted
        module: Option<String>,
    },
    /// Write project.json for a project scaffolded without the pipeline
    InitConfig {
        /// Target project directory
        target_dir: PathBuf,
    },
    /// Regenerate the technology rule set from project.json
    UpdateRules {
        /// Target project directory
        target_dir: PathBuf,
    },
    /// Copy generalizable rules back into the template library
    ExtractRules {
        /// Target project directory
        target_dir: PathBuf,
    },
    /// Scaffold a new module in the template library
    AddModule,
    /// Show the catalog and installed modules
    List {
        /// What to list; everything when omitted
        #[arg(value_enum)]
        kind: Option<ListKind>,
    },
}

/// `init` doubles as a command group: bare (with an optional target) it runs
/// stage 1, `init process` and `init export` run the later stages.
#[derive(Args)]
#[command(args_conflicts_with_subcommands = true)]
struct InitArgs {
    #[command(subcommand)]
    command: Option<InitCommands>,

    /// Target project directory remembered for the export hint
    target_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum InitCommands {
    /// Render every applicable rule template into staging (stage 2)
    Process,
    /// Copy the staged tree into the target project (stage 3)
    Export {
        /// Target project directory
        target_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(command) => run_command(command),
        None => repl::run(cli.target_dir),
    }
}

fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Init(args) => match args.command {
            Some(InitCommands::Process) => ProcessCommand::execute(),
            Some(InitCommands::Export { target_dir }) => ExportCommand::new(target_dir).execute(),
            None => InitCommand::new(args.target_dir).execute(),
        },
        Commands::Inject { target_dir, module } => InjectCommand::new(target_dir, module).execute(),
        Commands::InitConfig { target_dir } => InitConfigCommand::new(target_dir).execute(),
        Commands::UpdateRules { target_dir } => UpdateRulesCommand::new(target_dir).execute(),
        Commands::ExtractRules { target_dir } => ExtractRulesCommand::new(target_dir).execute(),
        Commands::AddModule => AddModuleCommand::execute(),
        Commands::List { kind } => ListCommand::new(kind).execute(),
    }
}
