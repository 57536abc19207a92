//! timeplan CLI - project and stage tracker
//!
//! Projects are kept in a spreadsheet file (`TimePlan.xlsx` by default).
//! Without a subcommand the interactive shell starts.

mod app;
mod config;
mod shell;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use timeplan_core::parse_date;
use timeplan_store::ProjectStore;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::{Action, App, Outcome};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "timeplan")]
#[command(author, version, about = "Project and stage tracker", long_about = None)]
struct Cli {
    /// Project spreadsheet (overrides the config file)
    #[arg(short, long, global = true, env = "TIMEPLAN_FILE", value_name = "PATH")]
    file: Option<PathBuf>,

    /// Config file (default: ./timeplan.toml if present)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all projects
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Add a project
    AddProject {
        name: String,
        /// Start date (DD/MM/YYYY)
        start: String,
        /// End date (DD/MM/YYYY)
        end: String,
    },

    /// Add a stage to a project (kept for this run only)
    AddStage {
        project: String,
        stage: String,
        /// Start date (DD/MM/YYYY)
        start: String,
        /// End date (DD/MM/YYYY)
        end: String,
    },

    /// Change the end date of a stage
    UpdateStage {
        project: String,
        stage: String,
        /// New end date (DD/MM/YYYY)
        end: String,
    },

    /// Show stages that ended on or before a date
    Completed {
        /// Reference date (DD/MM/YYYY), today when omitted
        #[arg(long, value_name = "DATE")]
        as_of: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Interactive menu
    Shell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::discover(cli.config.as_deref())?;

    init_tracing(cli.verbose, config.log.filter.as_deref());

    let path = cli.file.unwrap_or(config.storage.path);
    let store = ProjectStore::open(&path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let mut app = App::new(store);

    match cli.command {
        None | Some(Commands::Shell) => {
            let stdin = std::io::stdin();
            shell::run(&mut app, stdin.lock(), std::io::stdout())?;
        }
        Some(Commands::List {
            format: OutputFormat::Json,
        }) => {
            println!("{}", serde_json::to_string_pretty(app.store().projects())?);
        }
        Some(Commands::List {
            format: OutputFormat::Text,
        }) => print(&app.execute(Action::ListProjects)?)?,
        Some(Commands::AddProject { name, start, end }) => {
            print(&app.execute(Action::AddProject { name, start, end })?)?;
        }
        Some(Commands::AddStage {
            project,
            stage,
            start,
            end,
        }) => print(&app.execute(Action::AddStage {
            project,
            stage,
            start,
            end,
        })?)?,
        Some(Commands::UpdateStage {
            project,
            stage,
            end,
        }) => print(&app.execute(Action::UpdateStage {
            project,
            stage,
            end,
        })?)?,
        Some(Commands::Completed {
            as_of,
            format: OutputFormat::Json,
        }) => {
            let reference = match as_of {
                Some(text) => parse_date(&text)?,
                None => chrono::Local::now().date_naive(),
            };
            let groups = app.store().completed_groups(reference);
            println!("{}", serde_json::to_string_pretty(&groups)?);
        }
        Some(Commands::Completed {
            as_of,
            format: OutputFormat::Text,
        }) => print(&app.execute(Action::CompletedStages { as_of })?)?,
    }

    Ok(())
}

/// Filter precedence: `RUST_LOG`, then `-v`, then config `log.filter`, then `warn`
fn init_tracing(verbose: u8, configured: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directive = match verbose {
            0 => configured.unwrap_or("warn"),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::new(directive)
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn print(outcome: &Outcome) -> Result<()> {
    shell::print_outcome(&mut std::io::stdout().lock(), outcome)
}
