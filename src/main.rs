//! zsh-warrior - natural language in, one shell command out.
//!
//! Sends the query to a local Ollama model and prints the single command
//! extracted from its reply, or a one-line `Error: ...` message.

mod ask;
mod config;
mod extract;
mod logging;
mod ollama;
mod protocol;

use anyhow::Result;
use ask::AskError;
use clap::Parser;
use config::Config;
use ollama::OllamaClient;
use std::io::{ErrorKind, Write};
use std::process::ExitCode;
use tracing::{debug, error};

const MISSING_QUERY: &str =
    "Error: No user query provided. Please provide a query as an argument.";

/// Every argument is query text: `--help` and `--version` are not flags here,
/// so any invocation still prints exactly one line.
#[derive(Parser)]
#[command(name = "zsh-warrior")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Cli {
    /// What you want the command to do; anything after the first argument is ignored
    #[arg(value_name = "QUERY", trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _log = logging::init(config::log_file().as_deref());

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            error!("Failed to parse arguments: {}", e);
            emit(&format!("Error: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let mut args = cli.query.into_iter();
    let Some(query) = args.next() else {
        error!("No user query provided. Usage: zsh-warrior '<query>'");
        emit(MISSING_QUERY);
        return ExitCode::FAILURE;
    };
    let ignored = args.count();
    if ignored > 0 {
        debug!("Ignoring {} extra argument(s)", ignored);
    }

    let config = Config::from_env();
    let line = match run(&query, &config).await {
        Ok(line) => line,
        Err(e) => {
            error!("Unexpected error in main execution: {:#}", e);
            format!("Error: {:#}", e)
        }
    };

    emit(&line);
    ExitCode::SUCCESS
}

/// Print `line` as a single stdout line. A closed stdout is not a crash.
fn emit(line: &str) {
    let mut stdout = std::io::stdout().lock();
    let written = writeln!(stdout, "{}", extract::collapse_whitespace(line))
        .and_then(|()| stdout.flush());
    if let Err(e) = written {
        if e.kind() != ErrorKind::BrokenPipe {
            error!("Failed to write to stdout: {}", e);
        }
    }
}

/// Produce the line to print: the command, or a recovered failure.
async fn run(query: &str, config: &Config) -> Result<String> {
    let client = OllamaClient::new(config)?;

    let line = match ask::ask(&client, query).await {
        Ok(command) => command,
        Err(e @ AskError::NoCommand) => {
            error!("No valid Zsh command found in Ollama response.");
            format!("Error: {}", e)
        }
        Err(e @ AskError::Upstream(_)) => {
            let line = format!("Error: {}", e);
            error!("Error while contacting Ollama API: {:#}", anyhow::Error::new(e));
            line
        }
    };
    Ok(line)
}
