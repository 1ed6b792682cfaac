//! flatbean CLI - inspect and check flat bean records
//!
//! Parses record text into its pairs, canonicalizes single scalar values and
//! validates codec configuration files.

use clap::{Parser, Subcommand};
use flatbean::{CodecConfig, RawRecord, ScalarCodec, ScalarKind, TextEncoding};
use std::io::Read;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flatbean")]
#[command(version, about = "Inspect and check flat delimited bean records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a record into its name/value pairs and print them as JSON
    Inspect {
        /// Record text (read from stdin when omitted)
        text: Option<String>,

        /// YAML codec configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the pair separator
        #[arg(short, long)]
        separator: Option<char>,

        /// Override the name/value associator
        #[arg(short, long)]
        associator: Option<char>,
    },

    /// Decode a value as a scalar kind and print its canonical text
    Scalar {
        /// Scalar kind (text, int, decimal, timestamp, date, ...)
        #[arg(short, long)]
        kind: String,

        /// Value text
        text: String,

        /// Text encoding for byte values
        #[arg(short, long, default_value = "utf-8")]
        encoding: String,
    },

    /// Load and validate a codec configuration file
    CheckConfig {
        /// Path to the YAML configuration file
        #[arg(short, long, default_value = "flatbean.yaml")]
        config: PathBuf,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { text, config, separator, associator } => {
            inspect(text, config, separator, associator)
        }
        Commands::Scalar { kind, text, encoding } => {
            canonicalize_scalar(&kind, &text, &encoding)
        }
        Commands::CheckConfig { config } => {
            check_config(config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Resolve configuration with precedence: CLI flags > config file > FLATBEAN_* env > defaults
fn resolve_config(
    path: Option<PathBuf>,
    separator: Option<char>,
    associator: Option<char>,
) -> Result<CodecConfig, String> {
    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading codec config from {}", path.display());
            CodecConfig::load_from_file(&path)
                .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?
        }
        None => CodecConfig::from_env().map_err(|e| e.to_string())?,
    };

    if let Some(separator) = separator {
        config = config.with_separator(separator);
    }
    if let Some(associator) = associator {
        config = config.with_associator(associator);
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn inspect(
    text: Option<String>,
    config: Option<PathBuf>,
    separator: Option<char>,
    associator: Option<char>,
) -> Result<(), String> {
    let config = resolve_config(config, separator, associator)?;

    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            buf.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    let record = RawRecord::parse(&text, &config).map_err(|e| e.to_string())?;
    tracing::debug!("Parsed {} pairs", record.len());

    let json = serde_json::to_string_pretty(&record)
        .map_err(|e| format!("Failed to serialize record: {}", e))?;
    println!("{}", json);
    Ok(())
}

fn canonicalize_scalar(kind: &str, text: &str, encoding: &str) -> Result<(), String> {
    let kind: ScalarKind = kind.parse().map_err(|e: flatbean::CodecError| e.to_string())?;
    let encoding: TextEncoding = encoding.parse()?;
    let codec = ScalarCodec::new(encoding);

    let value = codec.decode(Some(text), kind).map_err(|e| e.to_string())?;
    match value {
        Some(value) => {
            let canonical = codec.encode(Some(&value)).map_err(|e| e.to_string())?;
            println!("{}", canonical);
        }
        None => println!("(null)"),
    }
    Ok(())
}

fn check_config(path: PathBuf) -> Result<(), String> {
    let config = CodecConfig::load_from_file(&path)
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

    println!("✓ {} is valid", path.display());
    let yaml = serde_yaml::to_string(&config)
        .map_err(|e| format!("Failed to render config: {}", e))?;
    print!("{}", yaml);
    Ok(())
}
