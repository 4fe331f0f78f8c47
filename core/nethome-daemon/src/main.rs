//! nethome daemon entrypoint.
//!
//! A small, single-worker service: one timer loop scans the kernel neighbor
//! table for configured hardware addresses and mirrors sustained presence
//! into a single in-flight event in the journal. A failed scan or store
//! write is logged and retried on the next tick; it never stops the loop.

use clap::Parser;
use nethome_core::{
    ArpProvider, ControllerConfig, IdentityMap, PresenceController, TickOutcome,
};
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod journal;
mod signal;
mod ticker;

use journal::JournalStore;
use ticker::Ticker;

const STOP_POLL_INTERVAL_MS: u64 = 200;

#[derive(Parser)]
#[command(name = "nethome-daemon")]
#[command(about = "Neighbor-table presence tracker")]
#[command(version)]
struct Cli {
    /// Kernel neighbor table to scan
    #[arg(long, default_value = "/proc/net/arp")]
    arp_file: PathBuf,

    /// Seconds between presence scans
    #[arg(long, default_value_t = 60)]
    interval_secs: u64,

    /// Hardware address that marks presence (e.g. 00:01:02:aa:bb:cc)
    #[arg(long)]
    mac: Option<String>,

    /// JSON file mapping hardware addresses to identity names
    #[arg(long)]
    identities_file: Option<PathBuf>,

    /// Title of the tracked event
    #[arg(long, default_value = "Present")]
    event_title: String,

    /// Color id of the tracked event
    #[arg(long, default_value = "11")]
    event_color_id: String,

    /// Consecutive absent scans tolerated before the event is dropped
    #[arg(long, default_value_t = 5)]
    grace_threshold: u32,

    /// Event journal path (default: ~/.nethome/events.json)
    #[arg(long)]
    journal_file: Option<PathBuf>,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let identities = match build_identities(&cli) {
        Ok(identities) if !identities.is_empty() => identities,
        Ok(_) => {
            error!("No identities configured; pass --mac and/or --identities-file");
            std::process::exit(1);
        }
        Err(err) => {
            error!(error = %err, "Failed to load identity configuration");
            std::process::exit(1);
        }
    };

    let journal_path = match cli.journal_file.clone().map(Ok).unwrap_or_else(default_journal_path) {
        Ok(path) => path,
        Err(err) => {
            error!(error = %err, "Failed to resolve journal path");
            std::process::exit(1);
        }
    };

    let store = match JournalStore::open(&journal_path) {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "Failed to open event journal");
            std::process::exit(1);
        }
    };

    let provider = ArpProvider::new(&cli.arp_file, identities);
    let config = ControllerConfig {
        event_title: cli.event_title.clone(),
        event_color_id: cli.event_color_id.clone(),
        grace_threshold: cli.grace_threshold,
    };
    // The provider already filters to configured identities, so presence is
    // simply "any configured device seen this scan".
    let mut controller = PresenceController::new(
        provider,
        store,
        config,
        Box::new(|sample: &[String]| !sample.is_empty()),
    );

    signal::install();
    let (ticker, shutdown) = Ticker::new(Duration::from_secs(cli.interval_secs));
    thread::spawn(move || {
        while !signal::stop_requested() {
            thread::sleep(Duration::from_millis(STOP_POLL_INTERVAL_MS));
        }
        shutdown.shutdown();
    });

    info!(
        arp_file = %cli.arp_file.display(),
        journal = %journal_path.display(),
        interval_secs = cli.interval_secs,
        grace_threshold = cli.grace_threshold,
        "nethome daemon started"
    );

    ticker.run(|| match controller.tick() {
        Ok(outcome) => log_outcome(outcome),
        Err(err) => warn!(error = %err, "Tick failed; retrying on next scan"),
    });

    info!("nethome daemon stopped");
}

fn log_outcome(outcome: TickOutcome) {
    match outcome {
        TickOutcome::Created => info!("Presence confirmed; event created"),
        TickOutcome::Extended => debug!("Presence confirmed; event extended"),
        TickOutcome::Ended => info!("Grace window exhausted; event dropped"),
        TickOutcome::Graced { consecutive_misses } => {
            debug!(consecutive_misses, "Absent; event within grace window");
        }
        TickOutcome::Idle => debug!("Absent; nothing tracked"),
    }
}

fn init_logging() {
    let debug_enabled = env::var("NETHOME_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_identities(cli: &Cli) -> nethome_core::Result<IdentityMap> {
    let mut identities = match &cli.identities_file {
        Some(path) => IdentityMap::load(path)?,
        None => IdentityMap::new(),
    };
    if let Some(mac) = &cli.mac {
        identities.insert(mac.clone(), cli.event_title.clone());
    }
    Ok(identities)
}

fn default_journal_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or_else(|| "Home directory not found".to_string())?;
    Ok(home.join(".nethome").join("events.json"))
}
