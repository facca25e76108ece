use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};

mod client;
mod cmd;
mod config;
mod models;
mod resource;
mod utils;

use client::ApiClient;
use cmd::DocArgs;
use config::Config;

/// resctl - manage typed resources on a REST backend
///
/// Command layout (one branch per resource type):
///   resctl <resource> list   [-a ATTR...] [-w WIDTH...] [-p PACK] [-t TOKEN] [-j]
///   resctl <resource> get    <name-or-id | ref-or-id> [-a ATTR...] [-t TOKEN] [-j]
///   resctl <resource> create <FILE> [-t TOKEN] [-j]
///   resctl <resource> update <name-or-id | ref-or-id> <FILE> [-t TOKEN] [-j]
///   resctl <resource> delete <name-or-id | ref-or-id> [-t TOKEN] [-j]
///   resctl doc <escape|unescape> <FILE>
///
/// Resources:
///   action, rule        - pack scoped, read/write
///   sensor, trigger     - pack scoped, read only
///   key                 - key value pairs, by name or id
///
/// Global flags / env:
///   -v / -vv            Increase verbosity (logs go to stderr)
///   -q / --quiet        Errors only
///   -u / --url          Backend endpoint (or RESCTL_API_URL, or config file)
///   -c / --config       Config file (default: <config dir>/resctl/config.yaml)
///   RESCTL_AUTH_TOKEN   Token used when a command has no -t/--token
///
/// Examples:
///   resctl action list -p core -a ref name
///   resctl action get core.local
///   resctl rule update core.my_rule rule.json
///   resctl key delete api_key
#[derive(Parser, Debug)]
#[command(
    name = "resctl",
    version,
    author,
    about = "resctl - manage typed resources on a REST backend",
    propagate_version = true,
    disable_help_subcommand = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Backend endpoint URL
    #[arg(short = 'u', long = "url", global = true, value_name = "URL")]
    url: Option<String>,

    /// Configuration file
    #[arg(short = 'c', long = "config", global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Built-in commands; resource branches are registered at runtime.
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Escape or unescape reserved characters in document keys
    Doc(DocArgs),
}

fn main() -> Result<()> {
    let branches = models::branches();

    let mut root = Cli::command();
    for branch in &branches {
        root = root.subcommand(branch.command());
    }
    let matches = root.get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(Commands::Doc(args)) = cli.command {
        return cmd::execute_doc(args, &mut out);
    }

    let (name, sub) = matches.subcommand().context("No command given")?;
    let branch = branches
        .iter()
        .find(|b| b.name() == name)
        .with_context(|| format!("Unknown resource '{name}'"))?;

    let config = Config::load(cli.config.as_deref())?;

    // Determine effective endpoint (CLI flag > RESCTL_API_URL env > config > default)
    let api_url = config.effective_url(cli.url.as_deref());
    if let Err(e) = client::parse_endpoint(&api_url) {
        eprintln!("Invalid endpoint '{}': {e}", api_url);
        std::process::exit(2);
    }

    let client = Arc::new(ApiClient::new(&api_url)?);
    tracing::debug!("using endpoint {}", client.base_url());
    let managers = models::rest_managers(&client);
    tracing::debug!("{} resource managers registered", managers.len());

    branch.dispatch(sub, config.effective_token().as_deref(), &managers, &mut out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> clap::Command {
        let mut root = Cli::command();
        for branch in models::branches() {
            root = root.subcommand(branch.command());
        }
        root
    }

    #[test]
    fn command_tree_is_consistent() {
        root().debug_assert();
    }

    #[test]
    fn globals_reach_resource_commands() {
        let matches = root()
            .try_get_matches_from(["resctl", "action", "get", "core.local", "-vv", "--url", "http://h/v1"])
            .unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.url.as_deref(), Some("http://h/v1"));
        assert!(cli.command.is_none());

        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "action");
        let (cmd_name, cmd) = sub.subcommand().unwrap();
        assert_eq!(cmd_name, "get");
        let args = cmd::CommandArgs::from_matches(cmd);
        assert_eq!(args.identifier(), "core.local");
    }

    #[test]
    fn read_only_branches_reject_mutations() {
        assert!(root().try_get_matches_from(["resctl", "sensor", "delete", "x"]).is_err());
        assert!(root().try_get_matches_from(["resctl", "key", "delete", "x"]).is_ok());
    }

    #[test]
    fn doc_command_parses() {
        let matches = root()
            .try_get_matches_from(["resctl", "doc", "escape", "in.json"])
            .unwrap();
        let cli = Cli::from_arg_matches(&matches).unwrap();
        assert!(matches!(cli.command, Some(Commands::Doc(_))));
    }
}
