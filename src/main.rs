//! jira-repl - interactive JQL search against JIRA.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use jira_helper::api::JiraClient;
use jira_helper::config::Config;
use jira_helper::error::{AppError, Result};
use jira_helper::logging;
use jira_helper::prompt::TerminalPrompter;
use jira_helper::repl::{KeyReader, Repl};
use jira_helper::store::Stores;

/// Compose and run JQL searches against JIRA.
///
/// Connection settings come from JIRA_URL, JIRA_API_USER and JIRA_API_TOKEN
/// or the config file; there are no flags.
#[derive(Debug, Parser)]
#[command(name = "jira-repl", version, about)]
struct Cli {}

fn main() -> ExitCode {
    let _cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: could not initialize logging: {}", e);
    }

    let code = match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "jira-repl failed");
            report(&e);
            ExitCode::FAILURE
        }
    };

    logging::shutdown();
    code
}

fn run() -> Result<()> {
    let config = Config::load()?;
    let client = JiraClient::connect(&config.server)?;
    let stores = Stores::open_default()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut repl = Repl::new(
        client,
        config.fields,
        stores,
        TerminalPrompter::new(),
        io::stdout(),
    )?;
    runtime.block_on(repl.run(&mut KeyReader::new()))
}

fn report(error: &AppError) {
    eprintln!("Error: {}", error.user_message());
    if let Some(action) = error.suggested_action() {
        eprintln!("{}", action);
    }
    if let Some(url) = error.help_url() {
        eprintln!("Create an API token at {}", url);
    }
}
