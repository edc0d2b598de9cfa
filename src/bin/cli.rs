//! BitKV CLI
//!
//! One-shot command-line access to a BitKV data directory.

use clap::{Parser, Subcommand};
use bitkv::{Config, Engine, OverwritePolicy};
use tracing_subscriber::{fmt, EnvFilter};

/// BitKV CLI
#[derive(Parser, Debug)]
#[command(name = "bitkv-cli")]
#[command(about = "CLI for the BitKV bit-chain store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./bitkv_data")]
    data_dir: String,

    /// Free the old chain when a store replaces an entry
    #[arg(long)]
    reclaim: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a value under its first character
    Store {
        /// The value to store
        value: String,
    },

    /// Get the value stored under a character
    Get {
        /// Leading character of the entry
        key: char,
    },

    /// Delete the entry under a character
    Delete {
        /// Leading character of the entry
        key: char,
    },

    /// List entries with their bit strings
    List,

    /// Print engine statistics as JSON
    Status,

    /// Find entries whose bits contain a pattern
    Search {
        /// Pattern of '0' and '1'
        pattern: String,
    },

    /// Rewrite the snapshot
    Sync,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,bitkv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let policy = if args.reclaim {
        OverwritePolicy::Reclaim
    } else {
        OverwritePolicy::Orphan
    };
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .overwrite_policy(policy)
        .build();

    let mut engine = match Engine::open(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&mut engine, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = engine.close() {
        tracing::error!("Failed to close engine: {}", e);
        std::process::exit(1);
    }
}

fn run(engine: &mut Engine, command: Commands) -> bitkv::Result<()> {
    match command {
        Commands::Store { value } => {
            engine.store(&value)?;
            println!("Stored {:?}", value);
        }
        Commands::Get { key } => match engine.retrieve(key)? {
            Some(value) => println!("{}", value),
            None => println!("No entry starting with {:?}", key),
        },
        Commands::Delete { key } => {
            if engine.delete(key)? {
                println!("Deleted entry {:?}", key);
            } else {
                println!("No entry starting with {:?}", key);
            }
        }
        Commands::List => {
            let keys = engine.list_entries();
            if keys.is_empty() {
                println!("Database is empty");
            }
            for key in keys {
                if let Some(bits) = engine.bits_of(key)? {
                    println!("{} {}", key, bits);
                }
            }
        }
        Commands::Status => {
            let status = engine.status()?;
            let json = serde_json::to_string_pretty(&status)
                .map_err(|e| bitkv::BitKvError::Serialization(e.to_string()))?;
            println!("{}", json);
        }
        Commands::Search { pattern } => {
            let matches = engine.search_bits(&pattern)?;
            if matches.is_empty() {
                println!("No matches for bit pattern {}", pattern);
            }
            for (n, m) in matches.iter().enumerate() {
                let offsets: Vec<String> = m.offsets.iter().map(|o| format!("bit {}", o)).collect();
                println!("{}. Entry {:?}: {:?}", n + 1, m.key, m.value);
                println!("   found at: {}", offsets.join(", "));
            }
        }
        Commands::Sync => engine.sync()?,
    }
    Ok(())
}
