//! `handover`: vehicle handover documents for ecological scrapping.
//!
//! Settings come from the environment (or `.env`); see `handover_core::Config`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use handover_cli::{init_tracing, print_json, ConfirmShare, Intake};
use handover_core::{
    compute_cz_iban, make_spd_payload, Amount, Config, ErrorMetadata, HandoverError, LogLevel,
    RendererKind,
};
use handover_processing::{HandoverPipeline, QrRenderer};
use handover_share::create_share_target;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "handover", about = "Vehicle handover protocol generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Czech account number (`number/bank`) to an IBAN
    Iban {
        account: String,
    },
    /// Build the SPD payment payload and optionally its QR code
    Payment {
        #[arg(long)]
        account: String,
        #[arg(long)]
        amount: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Defaults to PAYMENT_CURRENCY
        #[arg(long)]
        currency: Option<String>,
        /// Write the QR code as PNG
        #[arg(long)]
        qr_png: Option<PathBuf>,
        /// Draw the QR code in the terminal
        #[arg(long)]
        terminal: bool,
    },
    /// Validate an intake file and print the normalized records
    Validate {
        intake: PathBuf,
    },
    /// Produce and share both documents from an intake file
    Generate {
        intake: PathBuf,
        /// Overrides OUTPUT_DIR
        #[arg(long)]
        out_dir: Option<PathBuf>,
        /// Keep HTML instead of converting to PDF
        #[arg(long)]
        html_only: bool,
        /// Ask before every share
        #[arg(long)]
        confirm: bool,
    },
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Commands::Iban { account } => {
            println!("{}", compute_cz_iban(&account).map_err(HandoverError::from)?);
        }
        Commands::Payment {
            account,
            amount,
            first_name,
            last_name,
            currency,
            qr_png,
            terminal,
        } => {
            let iban = compute_cz_iban(&account).map_err(HandoverError::from)?;
            let amount = Amount::parse(&amount).map_err(HandoverError::from)?;
            let currency = currency.unwrap_or_else(|| config.payment_currency().to_string());
            let payload = make_spd_payload(&iban, &first_name, &last_name, &amount, &currency)
                .map_err(HandoverError::from)?;
            println!("{}", payload);

            if let Some(path) = qr_png {
                let png = QrRenderer::new(config.qr_size_px()).render_png(&payload)?;
                tokio::fs::write(&path, png)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                tracing::info!(path = %path.display(), "QR code written");
            }
            if terminal {
                println!("{}", QrRenderer::render_terminal(&payload)?);
            }
        }
        Commands::Validate { intake } => {
            let wizard = Intake::load(&intake)
                .await?
                .into_wizard(config.payment_currency())?;
            let missing: Vec<&str> = wizard.photos().missing().iter().map(|s| s.key()).collect();
            print_json(&serde_json::json!({
                "seller": wizard.seller(),
                "vehicle": wizard.vehicle(),
                "missing_photos": missing,
            }))?;
        }
        Commands::Generate {
            intake,
            out_dir,
            html_only,
            confirm,
        } => {
            if let Some(dir) = out_dir {
                config.0.output_dir = dir;
            }
            if html_only {
                config.0.pdf_renderer = RendererKind::Html;
            }

            let mut wizard = Intake::load(&intake)
                .await?
                .into_wizard(config.payment_currency())?;

            let mut share = create_share_target(&config).await?;
            if confirm {
                share = Arc::new(ConfirmShare::new(share));
            }
            let pipeline = HandoverPipeline::from_config(&config, share)?;

            let inputs = wizard.ready_for_documents()?;
            let report = pipeline
                .finish(inputs.seller, inputs.vehicle, inputs.photos)
                .await?;
            wizard.mark_complete()?;

            print_json(&report)?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        match err.downcast_ref::<HandoverError>() {
            Some(handover) => {
                let code = handover.error_code();
                match handover.log_level() {
                    LogLevel::Debug => tracing::debug!(code, error = %handover, "Input rejected"),
                    LogLevel::Warn => {
                        tracing::warn!(code, error = %handover.detailed_message(), "Handover failed")
                    }
                    LogLevel::Error => {
                        tracing::error!(code, error = %handover.detailed_message(), "Handover failed")
                    }
                }
                eprintln!("{}", handover.user_message());
            }
            None => eprintln!("{:#}", err),
        }
        std::process::exit(1);
    }
}
