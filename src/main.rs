mod config;
mod format;
mod protocol;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use config::AppConfig;
use format::{accept_id_input, format_amount_display, format_id_display, IdKind};
use protocol::{generate_payload, verify_payload, AmountInput};

#[derive(Parser)]
#[command(name = "promptpay", about = "Generate PromptPay QR payloads")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a payload for an identifier and optional amount
    Generate {
        /// National ID or mobile number; defaults to the configured one
        id: Option<String>,
        /// Amount in baht; omit for an open-amount payload
        #[arg(short, long)]
        amount: Option<String>,
        /// Identifier kind (citizen or phone); detected from the digit count by default
        #[arg(short, long)]
        kind: Option<IdKind>,
        /// Print a JSON object instead of the bare payload
        #[arg(long)]
        json: bool,
        /// Remember the identifier as the default
        #[arg(long)]
        save: bool,
    },
    /// Check a payload's checksum and decode its fields
    Verify {
        payload: String,
        #[arg(long)]
        json: bool,
    },
    /// Print a payload for each configured quick amount
    Presets {
        /// Identifier to use instead of the configured one
        id: Option<String>,
    },
}

#[derive(Serialize)]
struct GenerateOutput<'a> {
    payload: &'a str,
    identifier: String,
    kind: IdKind,
    amount: Option<String>,
    checksum: &'a str,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the payload
    let level = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("promptpay={}", level).parse()?);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load();

    match cli.command {
        Command::Generate {
            id,
            amount,
            kind,
            json,
            save,
        } => run_generate(config, id, amount, kind, json, save),
        Command::Verify { payload, json } => run_verify(&payload, json),
        Command::Presets { id } => run_presets(&config, id),
    }
}

fn resolve_identifier(config: &AppConfig, id: Option<String>) -> Result<String> {
    match id.or_else(|| config.default_identifier.clone()) {
        Some(id) => Ok(id),
        None => bail!(
            "No identifier given and none configured in {}",
            AppConfig::path().display()
        ),
    }
}

fn resolve_kind(config: &AppConfig, id: &str, kind: Option<IdKind>) -> IdKind {
    if let Some(kind) = kind {
        return kind;
    }
    IdKind::detect(id).unwrap_or_else(|| {
        warn!(
            "Identifier is neither 13 nor 10 digits; it is encoded without the country prefix"
        );
        config.id_kind
    })
}

fn run_generate(
    mut config: AppConfig,
    id: Option<String>,
    amount: Option<String>,
    kind: Option<IdKind>,
    json: bool,
    save: bool,
) -> Result<()> {
    let id = resolve_identifier(&config, id)?;
    let kind = resolve_kind(&config, &id, kind);
    if accept_id_input(kind, &id).is_none() {
        warn!(
            "Identifier has more than {} digits for a {} number ({})",
            kind.max_digits(),
            kind,
            kind.placeholder()
        );
    }

    let amount = AmountInput::from(amount);
    if !matches!(amount, AmountInput::Absent) && amount.payable().is_none() {
        warn!("Amount {:?} is not a positive number; generating an open-amount payload", amount);
    }

    let payload = generate_payload(&id, amount.clone());
    let checksum = &payload[payload.len() - protocol::tags::CRC_LEN..];

    info!(
        "{} {} / {}",
        kind,
        format_id_display(kind, &id),
        format_amount_display(amount.payable())
    );

    if json {
        let out = GenerateOutput {
            payload: &payload,
            identifier: format_id_display(kind, &id),
            kind,
            amount: amount.payable().map(protocol::format_amount),
            checksum,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", payload);
    }

    if save {
        config.default_identifier = Some(id.chars().filter(|c| c.is_ascii_digit()).collect());
        config.id_kind = kind;
        config.save()?;
    }
    Ok(())
}

fn run_verify(payload: &str, json: bool) -> Result<()> {
    let decoded = verify_payload(payload).context("Payload verification failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded)?);
        return Ok(());
    }

    for field in &decoded.fields {
        println!("{} {:02} {}", field.tag, field.length, field.value);
    }
    println!("checksum OK ({})", decoded.checksum);
    if let Some(id) = &decoded.identifier {
        println!("identifier: {}", id);
    }
    match &decoded.amount {
        Some(amount) => println!("amount: {}", amount),
        None => println!("amount: open"),
    }
    Ok(())
}

fn run_presets(config: &AppConfig, id: Option<String>) -> Result<()> {
    let id = resolve_identifier(config, id)?;
    for &amount in &config.quick_amounts {
        println!("{:>6}  {}", amount, generate_payload(&id, amount));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "promptpay",
            "generate",
            "081-234-5678",
            "--amount",
            "50",
            "--kind",
            "phone",
        ])
        .unwrap();
        match cli.command {
            Command::Generate {
                id, amount, kind, ..
            } => {
                assert_eq!(id.as_deref(), Some("081-234-5678"));
                assert_eq!(amount.as_deref(), Some("50"));
                assert_eq!(kind, Some(IdKind::Phone));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["promptpay", "generate", "1", "--kind", "bank"]).is_err());
    }

    #[test]
    fn test_resolve_identifier_falls_back_to_config() {
        let config = AppConfig {
            default_identifier: Some("0812345678".into()),
            ..AppConfig::default()
        };
        assert_eq!(resolve_identifier(&config, None).unwrap(), "0812345678");
        assert_eq!(
            resolve_identifier(&config, Some("1234567890123".into())).unwrap(),
            "1234567890123"
        );
        assert!(resolve_identifier(&AppConfig::default(), None).is_err());
    }

    #[test]
    fn test_resolve_kind() {
        let config = AppConfig::default();
        assert_eq!(resolve_kind(&config, "0812345678", None), IdKind::Phone);
        assert_eq!(resolve_kind(&config, "1234567890123", None), IdKind::Citizen);
        assert_eq!(resolve_kind(&config, "123", None), config.id_kind);
        assert_eq!(
            resolve_kind(&config, "1234567890123", Some(IdKind::Phone)),
            IdKind::Phone
        );
    }
}
