use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_invoicer::layout::DocumentStyle;
use pdf_invoicer::{Invoice, export, pdf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pdf-invoicer")]
#[command(version, about = "Render invoice records as paginated PDF documents")]
struct Cli {
    /// Write logs as JSON lines instead of text.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an invoice record and render it to PDF.
    Render {
        /// Invoice record (JSON).
        #[arg(long)]
        invoice: PathBuf,
        /// Destination PDF; replaced only if rendering succeeds.
        #[arg(long)]
        output: PathBuf,
        /// Document style (JSON); omitted fields keep their defaults.
        #[arg(long)]
        style: Option<PathBuf>,
    },
    /// Check an invoice record and print its totals.
    Validate {
        #[arg(long)]
        invoice: PathBuf,
    },
    /// Rewrite an invoice record with recomputed amounts.
    Export {
        #[arg(long)]
        invoice: PathBuf,
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Err(e) = init_tracing(cli.log_json) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    match cli.command {
        Commands::Render {
            invoice,
            output,
            style,
        } => {
            let record = load_invoice(&invoice)?;
            let style = match style {
                Some(path) => load_style(&path)?,
                None => DocumentStyle::default(),
            };
            let report = pdf::generate_pdf(&record, &style, &output)
                .with_context(|| format!("rendering invoice {}", record.number()))?;
            println!(
                "{}: {} page(s), {} item row(s)",
                output.display(),
                report.pages,
                report.rows.len()
            );
        }
        Commands::Validate { invoice } => {
            let record = load_invoice(&invoice)?;
            let totals = record.totals();
            println!(
                "invoice {} is valid: {} item(s), net {}, VAT {}, gross {}",
                record.number(),
                record.items().len(),
                totals.net_total,
                totals.vat_total,
                totals.gross_total
            );
        }
        Commands::Export { invoice, output } => {
            let record = load_invoice(&invoice)?;
            export::write_json(&record, &output)
                .with_context(|| format!("exporting invoice {}", record.number()))?;
            println!("{}", output.display());
        }
    }

    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing the log subscriber")
}

fn load_invoice(path: &Path) -> Result<Invoice> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading invoice record {}", path.display()))?;
    export::from_json(&json).with_context(|| format!("loading invoice record {}", path.display()))
}

fn load_style(path: &Path) -> Result<DocumentStyle> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading style {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing style {}", path.display()))
}
