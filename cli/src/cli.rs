//! # CLI Interface
//!
//! Command-line structure for `delegato`, defined with `clap` derive.
//! Network-facing subcommands share the `--address` and `--chain-id`
//! globals, which can also come from the environment.

use clap::{Parser, Subcommand, ValueEnum};

use delegato_protocol::config::{ApiConfig, DEFAULT_ADDRESS, DEFAULT_CHAIN_ID};
use delegato_protocol::crypto::KeyRole;

use crate::logging::LogFormat;

/// Delegato chain client.
///
/// Derives account keys, inspects chain state and casts votes against a
/// Delegato API node.
#[derive(Parser, Debug)]
#[command(
    name = "delegato",
    about = "Delegato chain client",
    version,
    propagate_version = true
)]
pub struct DelegatoCli {
    /// Websocket address of the API node.
    #[arg(long, global = true, env = "DELEGATO_ADDRESS", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Hex chain id to sign transactions for.
    #[arg(long, global = true, env = "DELEGATO_CHAIN_ID", default_value = DEFAULT_CHAIN_ID)]
    pub chain_id: String,

    /// Log output format. Logs always go to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter, overridden by `RUST_LOG` when set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

impl DelegatoCli {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            address: self.address.clone(),
            chain_id: self.chain_id.clone(),
        }
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive a key from account credentials and print it.
    Key(KeyArgs),
    /// Print the node's dynamic global properties as JSON.
    Props,
    /// Vote for a poll variant.
    Vote(VoteArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `key` subcommand.
#[derive(Parser, Debug)]
pub struct KeyArgs {
    /// Account login (email).
    #[arg(long)]
    pub account: String,

    /// Account password, at least 12 characters.
    #[arg(long, env = "DELEGATO_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Which authority to derive.
    #[arg(long, value_enum, default_value_t = Role::Active)]
    pub role: Role,
}

/// Arguments for the `vote` subcommand.
#[derive(Parser, Debug)]
pub struct VoteArgs {
    /// Voting account, e.g. `1.2.17`.
    #[arg(long)]
    pub account_id: String,

    /// Chosen poll variant, e.g. `1.11.4`.
    #[arg(long)]
    pub variant: String,

    /// Account login (email), used to derive the active key.
    #[arg(long)]
    pub email: String,

    /// Account password.
    #[arg(long, env = "DELEGATO_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Key role as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    Active,
    Owner,
}

impl From<Role> for KeyRole {
    fn from(role: Role) -> Self {
        match role {
            Role::Active => KeyRole::Active,
            Role::Owner => KeyRole::Owner,
        }
    }
}
