//! Palm-Scan Payment Client CLI
//!
//! Demonstrates the capture pipeline end to end with mock camera
//! input: permission request, per-frame presence scoring, gated (or
//! timed) capture, and registry resolution to a palm code. Ctrl-C
//! cancels the scan and releases the stream.

use clap::{Parser, ValueEnum};
use palmpay::capture::{CaptureDevice, FileConfig, FramePattern, MockCamera};
use palmpay::identity::{JsonFileStore, MemoryStore, PalmRegistry, SampleStore};
use palmpay::session::{CaptureSession, ScanPolicy, StopToken};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// Quality-gated capture with registry matching.
    Gated,
    /// Fixed countdown emitting a demo code.
    Timed,
}

#[derive(Debug, Parser)]
#[command(name = "palmpay", version, about = "Palm-scan payment client demo")]
struct Args {
    /// Configuration file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scan policy to demonstrate.
    #[arg(long, value_enum, default_value_t = PolicyArg::Gated)]
    policy: PolicyArg,

    /// Synthetic frame pattern fed to the mock camera.
    #[arg(long, value_enum, default_value_t = PatternArg::Hand)]
    pattern: PatternArg,

    /// Keep the registry in memory instead of on disk.
    #[arg(long)]
    ephemeral: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PatternArg {
    Hand,
    Dark,
    Noise,
}

impl From<PatternArg> for FramePattern {
    fn from(value: PatternArg) -> Self {
        match value {
            PatternArg::Hand => Self::Hand,
            PatternArg::Dark => Self::Dark,
            PatternArg::Noise => Self::Noise,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    info!("Palm-Scan Payment Client v{}", palmpay::VERSION);
    info!("This is a demonstration using mock camera input");

    let config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config: {}", e);
                std::process::exit(1);
            }
        },
        None => FileConfig::default(),
    };

    let device = CaptureDevice::new(
        MockCamera::with_pattern(args.pattern.into()),
        config.capture.clone(),
    );

    let policy = match args.policy {
        PolicyArg::Gated => ScanPolicy::Gated,
        PolicyArg::Timed => ScanPolicy::Timed {
            countdown: Duration::from_secs(config.session.countdown_secs),
        },
    };

    let stop = StopToken::new();
    let handler_stop = stop.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        handler_stop.trigger();
    }) {
        warn!("failed to install interrupt handler: {}", e);
    }

    let outcome = if args.ephemeral {
        let registry = PalmRegistry::open(MemoryStore::new());
        scan(device, registry, &config, policy, &stop).await
    } else {
        let store = match config.registry.path.clone() {
            Some(path) => JsonFileStore::new(path),
            None => match JsonFileStore::at_default_location() {
                Some(store) => store,
                None => {
                    warn!("no data directory available, keeping registry in memory");
                    let registry = PalmRegistry::open(MemoryStore::new());
                    report(scan(device, registry, &config, policy, &stop).await);
                    return;
                }
            },
        };
        info!("palm registry at {}", store.path().display());
        let registry = PalmRegistry::open(store);
        scan(device, registry, &config, policy, &stop).await
    };

    report(outcome);
}

async fn scan<S: SampleStore>(
    device: CaptureDevice<MockCamera>,
    registry: PalmRegistry<S>,
    config: &FileConfig,
    policy: ScanPolicy,
    stop: &StopToken,
) -> Option<(String, bool)> {
    let mut session = CaptureSession::with_config(device, registry, &config.session);

    let state = session.begin().clone();
    if !matches!(state, palmpay::PermissionState::Granted) {
        eprintln!("Camera not available: {:?}", state);
        std::process::exit(1);
    }

    match session.run(policy, stop).await {
        Ok(Some(outcome)) => Some((outcome.code, outcome.recognized)),
        Ok(None) => {
            info!("scan cancelled before completion");
            None
        }
        Err(e) => {
            warn!("scan failed: {}", e);
            None
        }
    }
}

fn report(outcome: Option<(String, bool)>) {
    match outcome {
        Some((code, recognized)) => {
            info!(
                "scan complete ({})",
                if recognized {
                    "recognized returning palm"
                } else {
                    "new palm registered"
                }
            );
            println!("Palm code: {}", code);
        }
        None => println!("No palm code produced."),
    }
}
