use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evidence_manager::config::AppConfig;
use evidence_manager::dashboard::DashboardSession;
use evidence_manager::evidence::EvidenceRecord;
use evidence_manager::export::{export_file_name, ExportDocument, ExportFormat};
use evidence_manager::presentation::{
    file_icon, format_file_size, highlight_term, short_digest, status_badge_class,
};
use evidence_manager::query::{Query, QueryParams};
use evidence_manager::store::EvidenceStore;
use evidence_manager::upload::{prepare_submission, UploadForm, UploadedFile};

#[derive(Parser)]
#[command(name = "evidence-manager")]
#[command(about = "Search, verify and export evidence records")]
struct Cli {
    /// Configuration file (defaults to ./evidence.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Account to act as
    #[arg(short, long, global = true, default_value = "")]
    account: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct SearchArgs {
    /// Free-text search over title, description, case id and file name
    #[arg(short, long, default_value = "")]
    term: String,

    /// pending, approved, rejected or under_review
    #[arg(long, default_value = "")]
    status: String,

    /// Evidence type, matched exactly
    #[arg(long = "type", default_value = "")]
    evidence_type: String,

    /// Earliest submission date, YYYY-MM-DD
    #[arg(long, default_value = "")]
    from: String,

    /// Latest submission date, YYYY-MM-DD (whole day included)
    #[arg(long, default_value = "")]
    to: String,

    /// title, timestamp, type or any record field name
    #[arg(long, default_value = "timestamp")]
    sort_by: String,

    /// asc or desc
    #[arg(long, default_value = "desc")]
    order: String,
}

impl SearchArgs {
    fn to_query(&self) -> Result<Query> {
        let params = QueryParams {
            term: self.term.clone(),
            status: self.status.clone(),
            evidence_type: self.evidence_type.clone(),
            date_from: self.from.clone(),
            date_to: self.to.clone(),
            sort_by: self.sort_by.clone(),
            sort_order: self.order.clone(),
        };
        Ok(Query::from_params(&params)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List evidence matching a search
    List {
        #[command(flatten)]
        search: SearchArgs,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one evidence record
    Show { id: u64 },
    /// Write a record's original file
    Download {
        id: u64,

        /// Output path (defaults to the stored file name)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Recompute a record's digest and compare it with the recorded one
    Verify { id: u64 },
    /// Verify every record in the store
    VerifyAll,
    /// Submit a file as new evidence
    Submit {
        file: PathBuf,

        #[arg(long)]
        case_id: String,

        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        #[arg(long = "type")]
        evidence_type: String,

        /// MIME type; guessed from the file extension when omitted
        #[arg(long)]
        mime: Option<String>,
    },
    /// Export matching evidence to a file
    Export {
        #[command(flatten)]
        search: SearchArgs,

        /// json or yaml
        #[arg(long, default_value = "json")]
        format: String,

        /// Output path (defaults to evidence-export-<date>.<ext>)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show collection totals
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Configuration loaded (store: {:?})", config.store.evidence_path);

    let store: Arc<dyn EvidenceStore> = Arc::new(config.open_store());
    let mut session = DashboardSession::open(store.clone(), config.verifier(), &cli.account)
        .await
        .context("Error loading evidence")?;

    match cli.command {
        Commands::List { search, json } => {
            let results = session.search(search.to_query()?);
            if json {
                println!("{}", serde_json::to_string_pretty(&results.records)?);
            } else {
                for record in &results.records {
                    print_summary(record, &search.term);
                }
                println!("{}", session.results_summary());
            }
        }
        Commands::Show { id } => {
            let record = session.evidence(id).await?;
            print_details(&record);
        }
        Commands::Download { id, out } => {
            let path = session.download(id, out.as_deref()).await?;
            println!("Evidence downloaded successfully to {}", path.display());
        }
        Commands::Verify { id } => {
            let report = session.verify_integrity(id).await?;
            if report.is_intact() {
                println!("✅ File integrity verified - Evidence has not been tampered with");
            } else {
                println!("❌ File integrity check failed - Evidence may have been modified");
                println!("  Recorded: {}", report.verification.recorded);
                println!("  Computed: {}", report.verification.computed);
                std::process::exit(1);
            }
        }
        Commands::VerifyAll => {
            let records = session.snapshot().as_ref().clone();
            let outcomes = config.verifier().verify_all(records).await;
            let mut failures = 0;
            for (id, outcome) in outcomes {
                match outcome {
                    Ok(report) if report.is_intact() => println!("✅ {} {}", id, report.file_name),
                    Ok(report) => {
                        failures += 1;
                        println!("❌ {} {} digest mismatch", id, report.file_name);
                    }
                    Err(e) => {
                        failures += 1;
                        println!("⚠️ {} could not be verified: {}", id, e);
                    }
                }
            }
            if failures > 0 {
                error!("{} records failed verification", failures);
                std::process::exit(1);
            }
        }
        Commands::Submit {
            file,
            case_id,
            title,
            description,
            evidence_type,
            mime,
        } => {
            let upload = UploadedFile::from_path(&file, mime.as_deref())?;
            let form = UploadForm {
                case_id,
                title,
                description,
                evidence_type,
            };
            let submission = prepare_submission(
                &config.upload_policy(),
                &config.verifier(),
                form,
                upload,
                &cli.account,
            )
            .await?;
            let id = store.save_evidence(submission).await?;
            println!("Evidence uploaded successfully! ID: {}", id);
        }
        Commands::Export {
            search,
            format,
            out,
        } => {
            let format: ExportFormat = format.parse()?;
            session.search(search.to_query()?);
            let path = out.unwrap_or_else(|| {
                PathBuf::from(export_file_name(Utc::now().date_naive(), format))
            });
            ExportDocument::from_session(&session).write_to(&path, format)?;
            println!("Data exported successfully to {}", path.display());
        }
        Commands::Stats => {
            println!("{} Evidence Items", session.total_count());
            if let Some(user) = session.user() {
                println!("Signed in as {} ({})", user.short_account(), user.role.name());
            }
        }
    }

    info!("Done");
    Ok(())
}

fn print_summary(record: &EvidenceRecord, term: &str) {
    println!(
        "#{} {} [{}]",
        record.id,
        highlight_term(&record.title, term),
        record.status
    );
    println!(
        "    case {} | {} | {} {} ({}) | {} | {}",
        highlight_term(&record.case_id, term),
        record.evidence_type,
        file_icon(&record.mime_type),
        record.file_name,
        format_file_size(record.file_size),
        short_digest(&record.digest),
        record.timestamp.format("%Y-%m-%d"),
    );
}

fn print_details(record: &EvidenceRecord) {
    println!("Evidence: {}", record.title);
    println!("  Case ID:        {}", record.case_id);
    println!("  Type:           {}", record.evidence_type);
    println!(
        "  Status:         {} ({})",
        record.status,
        status_badge_class(record.status)
    );
    println!("  Filename:       {}", record.file_name);
    println!("  Size:           {}", format_file_size(record.file_size));
    println!(
        "  MIME type:      {}",
        if record.mime_type.is_empty() {
            "Unknown"
        } else {
            &record.mime_type
        }
    );
    println!("  SHA-256 Hash:   {}", record.digest);
    println!("  Submitted By:   {}", record.submitted_by);
    println!("  Submitted:      {}", record.timestamp.to_rfc3339());
    println!(
        "  IP Address:     {}",
        record.submission_ip.as_deref().unwrap_or("Not recorded")
    );
    if !record.description.is_empty() {
        println!("  Description:    {}", record.description);
    }
}
