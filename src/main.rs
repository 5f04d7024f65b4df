use bikeshare_billing::application::processor::ChargeProcessor;
use bikeshare_billing::application::worker::ChargeWorker;
use bikeshare_billing::config::{DEFAULT_OVERDUE_HOURS, ProcessorConfig};
use bikeshare_billing::domain::ports::{AuthorizerRef, ChargeStoreBox, NotifierRef};
use bikeshare_billing::error::BillingError;
use bikeshare_billing::infrastructure::authorizer::SimulatedAuthorizer;
use bikeshare_billing::infrastructure::in_memory::InMemoryChargeStore;
use bikeshare_billing::infrastructure::notifier::LogNotifier;
use bikeshare_billing::interfaces::csv::charge_reader::ChargeReader;
use bikeshare_billing::interfaces::csv::charge_writer::ChargeWriter;
use chrono::TimeDelta;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input charges CSV file
    input: PathBuf,

    /// Hours a charge may stay pending before it is overdue
    #[arg(long, default_value_t = DEFAULT_OVERDUE_HOURS)]
    overdue_hours: u32,

    /// Refuse to execute charges above this amount
    #[arg(long)]
    max_amount: Option<Decimal>,

    /// Timeout for a single authorization call, in milliseconds
    #[arg(long, default_value_t = 5000)]
    auth_timeout_ms: u64,
}

impl Cli {
    fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            overdue_threshold: TimeDelta::try_hours(i64::from(self.overdue_hours))
                .unwrap_or(TimeDelta::MAX),
            max_charge_amount: self.max_amount,
            authorization_timeout: Duration::from_millis(self.auth_timeout_ms),
            ..ProcessorConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bikeshare_billing=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();

    let store: ChargeStoreBox = Box::new(InMemoryChargeStore::new());
    let authorizer: AuthorizerRef = Arc::new(SimulatedAuthorizer::new());
    let notifier: NotifierRef = Arc::new(LogNotifier::new());
    let (processor, queue) =
        ChargeProcessor::new(store, authorizer, notifier, cli.processor_config());
    let processor = Arc::new(processor);

    // Load charges
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = ChargeReader::new(file);
    let mut charges = Vec::new();
    for charge_result in reader.charges() {
        match charge_result {
            Ok(charge) => charges.push(charge),
            Err(e) => eprintln!("Error reading charge: {}", e),
        }
    }
    info!(count = charges.len(), "charges loaded");
    processor.load_charges(charges).await.into_diagnostic()?;

    // Execute pending charges
    for charge in processor.charges().await.into_diagnostic()? {
        if charge.is_pending() {
            processor.enqueue(&charge).into_diagnostic()?;
        }
    }
    let mut worker = ChargeWorker::new(processor.clone(), queue);
    for (id, result) in worker.drain().await {
        match result {
            Ok(_) => {}
            Err(BillingError::PaymentNotAuthorized) => eprintln!("Charge {} not authorized", id),
            Err(e) => eprintln!("Error processing charge {}: {}", id, e),
        }
    }

    // Notify riders of overdue charges
    let sent = processor.notify_overdue().await.into_diagnostic()?;
    info!(sent, "overdue notices sent");

    // Output final state
    let charges = processor.charges().await.into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = ChargeWriter::new(stdout.lock());
    writer.write_charges(&charges).into_diagnostic()?;

    Ok(())
}
