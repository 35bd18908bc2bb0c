//! # Cellular Driver Binary
//!
//! Brings up every module listed in a board configuration against the
//! simulation port backend, reports the handles and tears down again.
//!
//! # Usage
//!
//! ```bash
//! # Default configuration path
//! cell_driver
//!
//! # Explicit board file, verbose, instance summary as JSON
//! cell_driver --config config/cell.toml -v --summary-json
//!
//! # JSON log output
//! cell_driver --config config/cell.toml --json
//! ```

use cell_common::config::{CellConfig, ConfigLoader, LogLevel};
use cell_common::consts::DEFAULT_CONFIG_PATH;
use cell_common::port::AtHandle;
use cell_driver::drivers::simulation::{SimAtClient, SimGpioPort};
use cell_driver::{CellDriver, HandleRange, PinAssignment, TracingObserver};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Cellular driver - module instance bring-up
#[derive(Parser, Debug)]
#[command(name = "cell_driver")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Cellular module instance bring-up against a board configuration")]
#[command(long_about = None)]
struct Args {
    /// Path to the board configuration file (cell.toml)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,

    /// Print the live instances as JSON before tearing down
    #[arg(long)]
    summary_json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logging is set up from the config file, so load errors go to stderr.
    let config = match CellConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.config.display(), e);
            std::process::exit(1);
        }
    };
    setup_tracing(&args, config.shared.log_level);

    if let Err(e) = run(&args, &config) {
        error!("Cellular driver failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run(args: &Args, config: &CellConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Cellular driver v{} starting...", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from {:?}", args.config);
    config.validate()?;
    info!(
        "Service '{}': {} module(s) configured",
        config.shared.service_name,
        config.modules.len()
    );

    let range = HandleRange::new(config.driver.handle_min, config.driver.handle_max)?;
    let driver = CellDriver::new(SimGpioPort::new())
        .with_handle_range(range)
        .with_observer(Arc::new(TracingObserver));
    driver.init()?;

    let mut failed = 0;
    for module in &config.modules {
        let module_type = module.module_type()?;
        let at = AtHandle::new(Arc::new(SimAtClient::new(module.at_channel.as_str())));
        let pins = PinAssignment {
            enable_power: module.enable_power(),
            pwr_on: module.pwr_on(),
            vint: module.vint(),
        };
        match driver.add(module_type, &at, pins, module.leave_power_alone) {
            Ok(handle) => info!(
                "Module {} on '{}' is instance {}",
                module_type, module.at_channel, handle
            ),
            Err(e) => {
                warn!(
                    "Module {} on '{}' not added: {} (code {})",
                    module_type,
                    module.at_channel,
                    e,
                    e.code()
                );
                failed += 1;
            }
        }
    }

    info!(
        "{} instance(s) live, handles {:?}",
        driver.instance_count(),
        driver.handles()
    );
    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&driver.summaries())?);
    }

    driver.deinit();
    info!("Cellular driver shutdown complete");

    if failed > 0 {
        return Err(format!("{failed} module(s) failed to come up").into());
    }
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
///
/// `RUST_LOG` overrides both.
fn setup_tracing(args: &Args, log_level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        log_level.as_directive()
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
