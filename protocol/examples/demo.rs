//! Offline walkthrough of the Delegato client pipeline.
//!
//! Derives an account's keys from its credentials, prepares a registration,
//! a poll and a vote, signs the vote for the public chain and checks that
//! every signature recovers its signer. Nothing touches the network.
//!
//! Run with:
//!   cargo run --example demo --release

use std::time::Instant;

use delegato_protocol::codec::{ChainTime, ChainValue, UInt16, UInt64};
use delegato_protocol::config::DEFAULT_CHAIN_ID;
use delegato_protocol::crypto::{KeyRole, PrivateKey};
use delegato_protocol::transaction::signing::signing_message;
use delegato_protocol::transaction::{
    localized, AccountCreate, Language, Operation, PollCreate, PollVariant, PollVote,
    SecretAnswer, TransactionBuilder,
};

// ---------------------------------------------------------------------------
// ANSI color constants
// ---------------------------------------------------------------------------

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const WHITE: &str = "\x1b[37m";

// ---------------------------------------------------------------------------
// Display helpers
// ---------------------------------------------------------------------------

fn section(num: u32, title: &str) {
    println!();
    println!("{BOLD}{CYAN}[{num}] {WHITE}{title}{RESET}");
}

fn success(text: &str) {
    println!("{GREEN}  [OK] {text}{RESET}");
}

fn info(label: &str, value: &str) {
    println!("{WHITE}  {BOLD}{label}:{RESET} {YELLOW}{value}{RESET}");
}

fn timing(label: &str, elapsed: std::time::Duration) {
    let ms = elapsed.as_secs_f64() * 1000.0;
    println!("{DIM}  [{label}: {ms:.2} ms]{RESET}");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    const EMAIL: &str = "ion.popescu@example.md";
    const PASSWORD: &str = "correct horse battery staple";

    section(1, "Keys from credentials");
    let started = Instant::now();
    let active = PrivateKey::derive(EMAIL, PASSWORD, KeyRole::Active)?;
    let owner = PrivateKey::derive(EMAIL, PASSWORD, KeyRole::Owner)?;
    timing("derive", started.elapsed());
    info("active WIF", &active.to_wif());
    info("active public", &active.public_key().to_wif());
    info("owner public", &owner.public_key().to_wif());
    info("address", &active.public_key().address());

    section(2, "Account registration");
    let registration: Operation = AccountCreate {
        first_name: "Ion".into(),
        last_name: "Popescu".into(),
        birth: UInt16::new(1990),
        idnp: UInt64::new(2_002_001_234_567),
        email: EMAIL.into(),
        locality: "1.10.12".parse()?,
        secret_question: "First school?".into(),
        secret_answer: SecretAnswer::digest("Liceul 1"),
        owner: owner.public_key().clone(),
        active: active.public_key().clone(),
    }
    .into();
    info("opcode", &format!("0x{:02x}", registration.opcode()));
    info("bytes", &registration.bytes());

    section(3, "A poll and a vote");
    let poll: Operation = PollCreate {
        account: "1.2.5".parse()?,
        title: localized([
            (Language::Romanian, "Parcul central"),
            (Language::English, "Central park"),
        ])?,
        topic: "1.9.1".parse()?,
        start_date: ChainTime::from_unix_seconds(1_600_000_000),
        end_date: ChainTime::from_unix_seconds(1_600_604_800),
        content: localized([(Language::English, "Should the park get a playground?")])?,
        variants: vec![
            PollVariant::new(localized([(Language::English, "Yes")])?, 1)?,
            PollVariant::new(localized([(Language::English, "No")])?, 1)?,
        ]
        .into(),
        delegation_allowed: true.into(),
        sign_required: false.into(),
    }
    .into();
    println!("{DIM}{}{RESET}", serde_json::to_string_pretty(&poll.value())?);

    let vote = PollVote {
        account: "1.2.5".parse()?,
        variant: "1.11.7".parse()?,
    };

    section(4, "Build and sign");
    let unsigned = TransactionBuilder::new(42, "0000002a1122334455667788")?
        .expiration(ChainTime::from_unix_seconds(1_600_000_010))
        .operation(vote)
        .build()?;
    info("unsigned bytes", &unsigned.bytes());
    let message = signing_message(DEFAULT_CHAIN_ID, &unsigned.to_bytes())?;

    let started = Instant::now();
    let signed = unsigned.sign(DEFAULT_CHAIN_ID, &[&active, &owner])?;
    timing("sign", started.elapsed());
    for signature in signed.signatures() {
        info("signature", &signature.bytes());
    }

    section(5, "Recover signers");
    for (signature, key) in signed.signatures().iter().zip([&active, &owner]) {
        match signature.recover_public_key(&message) {
            Some(recovered) if &recovered == key.public_key() => {
                success(&format!("recovered {}", recovered.to_wif()))
            }
            other => return Err(format!("recovered {other:?}").into()),
        }
    }

    println!();
    println!("{DIM}{}{RESET}", serde_json::to_string_pretty(&signed.value())?);
    Ok(())
}
