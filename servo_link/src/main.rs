//! # Servo Link Simulator
//!
//! Runs a master and a slave board against a simulated two-wire bus and
//! prints what crossed it.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (two-byte encoding, synchronous delivery, 500 periods)
//! servo_link
//!
//! # From a configuration file, overriding the encoding
//! servo_link --config config/servo_link.toml --encoding three-byte
//!
//! # Machine-readable report and JSON logs
//! servo_link --periods 2000 --json
//! ```

use clap::{Parser, ValueEnum};
use servo_common::bus::Encoding;
use servo_common::config::{ConfigLoader, LogLevel, SharedConfig};
use servo_link::sim::{LinkConfig, Simulation};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Wire encoding selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EncodingArg {
    TwoByte,
    ThreeByte,
}

impl From<EncodingArg> for Encoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::TwoByte => Encoding::TwoByte,
            EncodingArg::ThreeByte => Encoding::ThreeByte,
        }
    }
}

/// Servo Link - two-wire servo command transport simulator
#[derive(Parser, Debug)]
#[command(name = "servo_link")]
#[command(version)]
#[command(about = "Simulates the two-wire servo command transport between master and slave boards")]
#[command(long_about = None)]
struct Args {
    /// Path to the configuration file (servo_link.toml). Built-in defaults
    /// are used when omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of PWM periods to simulate (overrides the config file)
    #[arg(short, long)]
    periods: Option<u32>,

    /// Wire encoding (overrides the config file)
    #[arg(short, long, value_enum)]
    encoding: Option<EncodingArg>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs and the report in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    if let Err(e) = run() {
        error!("servo link simulation failed: {}", e);
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LinkConfig::load(path)?,
        None => default_config(),
    };

    setup_tracing(&args, config.shared.log_level);
    info!("Servo Link v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        info!("Loaded configuration from {}", path.display());
    }

    if let Some(periods) = args.periods {
        config.simulation.periods = periods;
    }
    if let Some(encoding) = args.encoding {
        config.bus.encoding = encoding.into();
    }
    config.validate()?;

    let report = Simulation::new(config.bus, config.simulation).run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    info!("{} finished", config.shared.service_name);
    Ok(())
}

fn default_config() -> LinkConfig {
    LinkConfig {
        shared: SharedConfig {
            log_level: LogLevel::default(),
            service_name: "servo-link-sim".to_string(),
        },
        bus: Default::default(),
        simulation: Default::default(),
    }
}

/// Setup tracing subscriber based on CLI arguments and the configured level.
fn setup_tracing(args: &Args, level: LogLevel) {
    let directive = if args.verbose {
        LogLevel::Debug.as_directive()
    } else {
        level.as_directive()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
