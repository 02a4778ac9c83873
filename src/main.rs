//! sanctum - cast spells over event energy
//!
//! Also exposes the zlmp codec directly for inspecting wire buffers.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use clap::{Parser, Subcommand};
use colored::Colorize;
use sanctum_core::{spell, Caster, Config, Energy};
use sanctum_zlmp::size_of_bounded;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sanctum")]
#[command(about = "Event-processing platform that casts spells over dynamic event records")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, env = "SANCTUM_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cast a spell over seed energy and print the resulting energy
    Cast {
        /// Spell name
        spell: String,

        /// Seed energy JSON file
        #[arg(short, long)]
        seed: Option<PathBuf>,

        /// Maximum number of steps (overrides config)
        #[arg(short = 'n', long)]
        steps: Option<u64>,
    },

    /// Encode a JSON value (or @file.json) into a wire buffer
    Pack {
        /// Value JSON
        value: String,

        /// Print hex instead of base64
        #[arg(long)]
        hex: bool,
    },

    /// Decode a wire buffer and print it as JSON
    Unpack {
        /// Base64-encoded wire buffer
        packet: String,

        /// Input is hex instead of base64
        #[arg(long)]
        hex: bool,
    },

    /// Print the exact encoded size of a JSON value (or @file.json)
    Size {
        /// Value JSON
        value: String,
    },

    /// List built-in spells
    Spells,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String, Box<dyn std::error::Error>> {
    let mut config = Config::load_from(cli.config.as_ref())?;
    if let Some(ref path) = cli.config {
        tracing::info!("Loaded config from {}", path.display());
    }

    match cli.command {
        Commands::Cast { spell, seed, steps } => {
            if let Some(n) = steps {
                config.cast.max_steps = n;
                config.validate()?;
            }
            let seed = match seed {
                Some(path) => Energy::from_json_str(&std::fs::read_to_string(&path)?)?,
                None => Energy::default(),
            };
            let mut spell = spell::by_name(&spell)?;
            let caster = Caster::new(&config.codec, &config.cast);
            let report = caster.cast(spell.as_mut(), seed)?;
            tracing::debug!(
                "Last packet: {}",
                BASE64.encode(report.last_packet.as_bytes())
            );
            Ok(serde_json::to_string(&report.energy.to_json())?)
        }
        Commands::Pack { value, hex } => {
            let energy = Energy::from_json_str(&read_arg(&value)?)?;
            let packet = config.codec.encoder().encode(energy.value())?;
            tracing::debug!("Packed {} bytes", packet.len());
            if hex {
                Ok(hex::encode(packet.as_bytes()))
            } else {
                Ok(BASE64.encode(packet.as_bytes()))
            }
        }
        Commands::Unpack { packet, hex } => {
            let raw = if hex {
                hex::decode(packet.trim())?
            } else {
                BASE64.decode(packet.trim())?
            };
            let value = config.codec.decoder().decode(&raw)?;
            Ok(serde_json::to_string(&Energy::new(value).to_json())?)
        }
        Commands::Size { value } => {
            let energy = Energy::from_json_str(&read_arg(&value)?)?;
            let size = size_of_bounded(energy.value(), config.codec.max_depth)?;
            Ok(size.to_string())
        }
        Commands::Spells => Ok(spell::names().join("\n")),
    }
}

/// Reads a JSON argument, or the file it names when prefixed with '@'.
fn read_arg(arg: &str) -> Result<String, std::io::Error> {
    match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path),
        None => Ok(arg.to_string()),
    }
}
