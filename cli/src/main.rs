// Copyright (c) 2026 Delegato Contributors. MIT License.
// See LICENSE for details.

//! # Delegato CLI
//!
//! Entry point for the `delegato` binary. Parses arguments, initializes
//! logging, and runs one of:
//!
//! - `key`     derive and print an account key
//! - `props`   print the dynamic global properties
//! - `vote`    sign and broadcast a poll vote
//! - `version` print build version information

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;

use delegato_protocol::api::Api;
use delegato_protocol::codec::ObjectId;
use delegato_protocol::crypto::{KeyRole, PrivateKey};
use delegato_protocol::transaction::{PollVote, SignedTransaction};

use cli::{Commands, DelegatoCli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = DelegatoCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    match &cli.command {
        Commands::Key(args) => derive_key(args),
        Commands::Props => print_properties(&cli).await,
        Commands::Vote(args) => vote(&cli, args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn derive_key(args: &cli::KeyArgs) -> Result<()> {
    let role = KeyRole::from(args.role);
    let key = PrivateKey::derive(&args.account, &args.password, role)
        .context("failed to derive key from credentials")?;
    let public = key.public_key();

    println!("Role        : {role}");
    println!("Private key : {}", key.to_wif());
    println!("Public key  : {}", public.to_wif());
    println!("Address     : {}", public.address());
    Ok(())
}

async fn connect(cli: &DelegatoCli) -> Result<Api> {
    let api = Api::new(cli.api_config());
    api.connect()
        .await
        .with_context(|| format!("failed to connect to {}", api.address()))?;
    Ok(api)
}

async fn print_properties(cli: &DelegatoCli) -> Result<()> {
    let api = connect(cli).await?;
    let properties = api
        .database()
        .get_dynamic_global_properties()
        .await
        .context("get_dynamic_global_properties failed")?;
    api.disconnect();

    println!("{}", serde_json::to_string_pretty(&properties)?);
    Ok(())
}

async fn vote(cli: &DelegatoCli, args: &cli::VoteArgs) -> Result<()> {
    let account: ObjectId = args
        .account_id
        .parse()
        .with_context(|| format!("invalid account id {}", args.account_id))?;
    let variant: ObjectId = args
        .variant
        .parse()
        .with_context(|| format!("invalid variant id {}", args.variant))?;
    let key = PrivateKey::derive(&args.email, &args.password, KeyRole::Active)
        .context("failed to derive active key")?;

    let api = connect(cli).await?;
    let unsigned = api
        .transaction([PollVote { account, variant }.into()])
        .await
        .context("failed to build transaction")?;
    let signed: SignedTransaction = api
        .sign_transaction(unsigned, &[&key])
        .context("failed to sign transaction")?;
    tracing::info!(%account, %variant, "casting vote");

    let result = signed.broadcast(&api).await.context("broadcast failed");
    api.disconnect();

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

fn print_version() {
    println!("delegato {}", env!("CARGO_PKG_VERSION"));
    println!("rustc    {}", option_env!("RUSTC_VERSION").unwrap_or("unknown"));
}
