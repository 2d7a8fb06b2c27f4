//! multikv CLI
//!
//! Command-line interface for a multikv store on the local filesystem.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use multikv::{Config, EntryKind, Kv, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// multikv CLI
#[derive(Parser, Debug)]
#[command(name = "multikv")]
#[command(about = "Hierarchical key-value store on the local filesystem")]
#[command(version)]
struct Args {
    /// Root directory of the store
    #[arg(short, long, default_value = "./multikv_data")]
    root: PathBuf,

    /// Fail instead of creating a missing root directory
    #[arg(long)]
    no_create: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a value under a key
    Put {
        /// The key to set
        key: String,

        /// The value to store
        #[arg(required_unless_present = "file", conflicts_with = "file")]
        value: Option<String>,

        /// Read the value from a file instead
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print the value of a key
    Get {
        /// The key to get
        key: String,
    },

    /// Print the metadata of a key as JSON
    Info {
        /// The key to inspect
        key: String,
    },

    /// Delete a key and everything below it
    Delete {
        /// The key to delete
        key: String,
    },

    /// List the children of a container
    List {
        /// Container path (root when omitted)
        #[arg(default_value = "")]
        path: String,

        /// Show whether each child is a key or a container
        #[arg(short, long)]
        long: bool,
    },
}

fn main() {
    // Initialize tracing/logging (stderr, stdout is for values)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,multikv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder()
        .root_dir(&args.root)
        .create_root(!args.no_create)
        .build();
    let kv = Kv::open(config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Put { key, value, file } => {
            let bytes = match (value, file) {
                (_, Some(file)) => std::fs::read(file)?,
                (Some(value), None) => value.into_bytes(),
                (None, None) => Vec::new(),
            };
            kv.put(&key, &bytes)?;
        }
        Commands::Get { key } => {
            out.write_all(&kv.get(&key)?)?;
        }
        Commands::Info { key } => {
            let info = kv.get_info(&key)?;
            let json = serde_json::to_string_pretty(&info)
                .map_err(|e| multikv::KvError::Serialization(e.to_string()))?;
            writeln!(out, "{}", json)?;
        }
        Commands::Delete { key } => {
            kv.delete(&key)?;
        }
        Commands::List { path, long } => {
            if long {
                for entry in kv.list_entries(&path)? {
                    let kind = match entry.kind {
                        EntryKind::Leaf => "key",
                        EntryKind::Container => "dir",
                    };
                    writeln!(out, "{}\t{}", kind, entry.name)?;
                }
            } else {
                for name in kv.list(&path)? {
                    writeln!(out, "{}", name)?;
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}
