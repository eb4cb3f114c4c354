//! ordering-probe - run the start orderings against the simulated platform
//! and print what the session negotiated.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use env_logger::Env;
use log::info;

use audio_lifecycle_core::{LifecycleConfiguration, StartOrdering, StartRequest};
use audio_lifecycle_sim::{run_probe_with, FaultPlan, ProbeError, SimCoordinator, SimulatedPlatform};

#[derive(Parser, Debug)]
#[command(name = "ordering-probe", version, about = "Probe audio start orderings")]
struct Cli {
    /// Ordering to run (default: all four)
    #[arg(long)]
    ordering: Option<StartOrdering>,

    /// Request plain capture instead of voice processing
    #[arg(long)]
    no_voice_processing: bool,

    /// JSON lifecycle configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print reports as JSON lines
    #[arg(long)]
    json: bool,

    /// Keep each run in Running for this long before stopping
    #[arg(long, default_value_t = 0)]
    hold_ms: u64,

    /// Session readout interval while holding
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    /// Register the bundled sample as undecodable
    #[arg(long)]
    corrupt_sample: bool,

    /// Report the platform as lacking voice-processing support
    #[arg(long)]
    no_voice_processing_support: bool,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("ordering-probe: {}", e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<LifecycleConfiguration, ProbeError> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            LifecycleConfiguration::from_json(&json).map_err(ProbeError::Config)
        }
        None => Ok(LifecycleConfiguration::default()),
    }
}

fn hold_and_poll(coordinator: &SimCoordinator, hold: Duration, interval: Duration) {
    if hold.is_zero() {
        return;
    }
    let running = Arc::new(AtomicBool::new(true));
    let observer = coordinator.session_observer();
    let poll_running = Arc::clone(&running);

    let poller = thread::Builder::new()
        .name("session-readout".into())
        .spawn(move || {
            while poll_running.load(Ordering::SeqCst) {
                println!("{}\n", observer.snapshot().readout());
                thread::sleep(interval);
            }
        });

    thread::sleep(hold);
    running.store(false, Ordering::SeqCst);
    match poller {
        Ok(handle) => {
            if handle.join().is_err() {
                log::warn!("session readout thread panicked");
            }
        }
        Err(e) => log::warn!("failed to spawn readout thread: {}", e),
    }
}

fn run(cli: Cli) -> Result<(), ProbeError> {
    let config = load_config(cli.config.as_ref())?;
    let orderings: Vec<StartOrdering> = match cli.ordering {
        Some(o) => vec![o],
        None => StartOrdering::ALL.to_vec(),
    };
    let hold = Duration::from_millis(cli.hold_ms);
    let interval = Duration::from_millis(cli.poll_ms.max(1));

    info!("ordering-probe v{}", env!("CARGO_PKG_VERSION"));

    for ordering in orderings {
        let platform = SimulatedPlatform::new().with_resource(&config.resource_name, !cli.corrupt_sample);
        platform.set_faults(FaultPlan {
            voice_processing_unsupported: cli.no_voice_processing_support,
            ..Default::default()
        });

        let request = StartRequest::new(ordering, !cli.no_voice_processing);
        let report = run_probe_with(&platform, config.clone(), request, |c| {
            hold_and_poll(c, hold, interval)
        })?;

        if cli.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("{}", report.summary());
        }
    }

    Ok(())
}
