pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "fyndy",
    about = "Fyndy operator CLI",
    long_about = "Run the decision engine locally, inspect configuration, and check service readiness.",
    after_help = "Examples:\n  fyndy decide Grohe S240\n  fyndy decide --explain \"table basse bois\"\n  fyndy config\n  fyndy doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Classify and score a query, printing the same payload the API returns")]
    Decide {
        #[arg(required = true, num_args = 1.., help = "Product query (words are joined with spaces)")]
        query: Vec<String>,
        #[arg(long, help = "Include the seed and which precision signals fired")]
        explain: bool,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, access-control mode, and engine self-test")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Decide { query, explain } => commands::decide::run(&query.join(" "), explain),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
