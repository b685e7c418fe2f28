use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;
use tracing::{error, info};

use evidence_manager::config::AppConfig;
use evidence_manager::integrity::DigestInput;
use evidence_manager::store::EvidenceStore;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("verify-evidence")
        .version("1.0.0")
        .about("Check stored evidence against its recorded SHA-256 digests")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Configuration file"),
        )
        .arg(
            Arg::new("id")
                .short('i')
                .long("id")
                .value_name("ID")
                .value_parser(clap::value_parser!(u64))
                .help("Verify a single evidence record instead of all of them"),
        )
        .arg(
            Arg::new("decoded")
                .long("decoded")
                .action(ArgAction::SetTrue)
                .help("Hash the decoded file bytes instead of the stored data URL text"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    tracing_subscriber::fmt()
        .with_max_level(if verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let config_path = matches.get_one::<String>("config").map(PathBuf::from);
    let mut config = AppConfig::load(config_path.as_deref())?;
    if matches.get_flag("decoded") {
        config.integrity.digest_input = DigestInput::Decoded;
    }
    info!("Configuration loaded (store: {:?})", config.store.evidence_path);

    if let Err(e) = run(&config, matches.get_one::<u64>("id").copied(), verbose).await {
        error!("Evidence verification failed: {}", e);
        std::process::exit(1);
    }

    println!("✓ Evidence verification completed successfully");
    Ok(())
}

async fn run(config: &AppConfig, id: Option<u64>, verbose: bool) -> Result<()> {
    let store = config.open_store();
    let records = match id {
        Some(id) => vec![store
            .get_evidence(id)
            .await?
            .ok_or_else(|| anyhow!("Evidence {} not found", id))?],
        None => store.get_all_evidence().await?,
    };

    if records.is_empty() {
        return Err(anyhow!("No evidence in {:?}", store.evidence_path()));
    }

    info!("Verifying {} evidence records", records.len());
    let outcomes = config.verifier().verify_all(records).await;

    let mut tampered = Vec::new();
    let mut unreadable = Vec::new();
    for (id, outcome) in &outcomes {
        match outcome {
            Ok(report) if report.is_intact() => {
                if verbose {
                    println!("✓ {} {}", id, report.verification.computed);
                }
            }
            Ok(report) => {
                println!(
                    "✗ {} recorded {} computed {}",
                    id, report.verification.recorded, report.verification.computed
                );
                tampered.push(*id);
            }
            Err(e) => {
                println!("? {} {}", id, e);
                unreadable.push(*id);
            }
        }
    }

    if verbose {
        println!("\nVerification Summary:");
        println!("  Checked:    {}", outcomes.len());
        println!("  Tampered:   {}", tampered.len());
        println!("  Unreadable: {}", unreadable.len());
    }

    if !tampered.is_empty() || !unreadable.is_empty() {
        return Err(anyhow!(
            "{} tampered, {} unreadable",
            tampered.len(),
            unreadable.len()
        ));
    }

    Ok(())
}
