//! pawwatch CLI
//!
//! Watches an adoption listing page and emails an alert for each newly
//! listed animal. Runs until interrupted.

use std::sync::Arc;

use clap::Parser;
use pawwatch::{
    config::{SmtpCredential, WatchConfig},
    error::Result,
    models::{DetailSelectors, ListingSelectors},
    pipeline::WatchLoop,
    services::{HttpFetcher, MailTransport, Notifier, PageFetcher, RecordParser, SmtpMailer},
};

/// pawwatch - adoption listing watcher
#[derive(Parser, Debug)]
#[command(name = "pawwatch", version, about = "Emails alerts for new adoption listings")]
struct Cli {
    /// Sender address for alert mail
    #[arg(long)]
    sender: String,

    /// Recipient addresses for alert mail
    #[arg(long, num_args = 1.., required = true)]
    recipients: Vec<String>,

    /// SMTP server hostname
    #[arg(long)]
    smtp_server: Option<String>,

    /// SMTP submission port
    #[arg(long)]
    smtp_port: Option<u16>,

    /// Seconds to wait between watch cycles
    #[arg(long)]
    delay: Option<u64>,

    /// Listing page URL override
    #[arg(long)]
    listing_url: Option<String>,

    /// Base URL override for resolving relative links
    #[arg(long)]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Build the immutable configuration from CLI flags.
fn build_config(cli: &Cli) -> WatchConfig {
    let mut config = WatchConfig::new(cli.sender.clone(), cli.recipients.clone());
    if let Some(host) = &cli.smtp_server {
        config.smtp.host = host.clone();
    }
    if let Some(port) = cli.smtp_port {
        config.smtp.port = port;
    }
    if let Some(delay) = cli.delay {
        config.delay_secs = delay;
    }
    if let Some(url) = &cli.listing_url {
        config.site.listing_url = url.clone();
    }
    if let Some(url) = &cli.base_url {
        config.site.base_url = url.clone();
    }
    config
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("pawwatch starting...");

    let config = build_config(&cli);
    config.validate()?;

    // Password comes from the environment only; without it there is no
    // point entering the loop
    let credential = SmtpCredential::from_env()?;

    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.http)?);
    let parser = RecordParser::new(
        Arc::clone(&fetcher),
        &ListingSelectors::default(),
        &DetailSelectors::default(),
        &config,
    )?;
    let mailer: Arc<dyn MailTransport> =
        Arc::new(SmtpMailer::new(&config.smtp, &config.sender, &credential)?);
    let notifier = Notifier::new(mailer, Arc::clone(&fetcher), &config)?;

    let mut watch_loop = WatchLoop::new(Arc::clone(&fetcher), parser, notifier, &config);

    let (stop_tx, stop_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stop_tx.send(true);
        }
    });

    watch_loop.run(stop_rx).await;

    log::info!("Done!");

    Ok(())
}
