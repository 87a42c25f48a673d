//! CLI command definitions for the `catchpost` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod drafts;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use catchpost_types::ids::UserId;

/// Telegram catch-report bot with moderation handoff.
#[derive(Parser)]
#[command(name = "catchpost", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug, -vvv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server.
    Serve {
        /// Address to bind (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config and PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Inspect and manage stored drafts.
    Drafts {
        #[command(subcommand)]
        action: DraftsCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum DraftsCommand {
    /// List stored drafts, most recently updated first.
    #[command(alias = "ls")]
    List,

    /// Show a draft as it would be posted, plus its raw JSON.
    Show {
        /// Telegram user id.
        user_id: UserId,
    },

    /// Delete a stored draft.
    #[command(alias = "rm")]
    Delete {
        /// Telegram user id.
        user_id: UserId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_drafts_show() {
        let cli = Cli::try_parse_from(["catchpost", "--json", "drafts", "show", "42"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Drafts {
                action: DraftsCommand::Show { user_id },
            } => assert_eq!(user_id, UserId(42)),
            _ => panic!("expected drafts show"),
        }
    }

    #[test]
    fn rejects_non_numeric_user_id() {
        assert!(Cli::try_parse_from(["catchpost", "drafts", "rm", "vasya"]).is_err());
    }
}
