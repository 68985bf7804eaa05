//! recordstore CLI
//!
//! Runs one command against a snapshot backend and prints the JSON response.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use recordstore::protocol::{Command, Response};
use recordstore::{Config, Engine, RecordId, StoreError, Target};
use tracing_subscriber::{fmt, EnvFilter};

/// recordstore CLI
#[derive(Parser, Debug)]
#[command(name = "recordstore-cli")]
#[command(about = "Apply record mutations to stored snapshots")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./recordstore_data")]
    data_dir: PathBuf,

    /// Snapshot backend
    #[arg(short, long, value_enum, default_value_t = Backend::File)]
    backend: Backend,

    /// Document collection name (document backend only)
    #[arg(short, long, default_value = "snapshots")]
    collection: String,

    /// Skip fsync after writes
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Backend {
    File,
    Document,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a snapshot file (creates or refreshes it)
    Upload {
        /// Local file to upload; its file name becomes the snapshot name
        file: PathBuf,

        /// Store under this name instead of the file name
        #[arg(long)]
        name: Option<String>,
    },

    /// Create a record
    Create {
        snapshot: String,
        #[arg(long)]
        id: RecordId,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// Content to initialize the snapshot from if it is not stored yet
        #[arg(long)]
        upload: Option<PathBuf>,
    },

    /// Overwrite email and name of a record
    Update {
        snapshot: String,
        #[arg(long)]
        id: RecordId,
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        upload: Option<PathBuf>,
    },

    /// Overwrite only the given fields of a record
    Patch {
        snapshot: String,
        #[arg(long)]
        id: RecordId,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        upload: Option<PathBuf>,
    },

    /// Delete a record
    Delete {
        snapshot: String,
        #[arg(long)]
        id: RecordId,
        #[arg(long)]
        upload: Option<PathBuf>,
    },

    /// Show snapshot metadata
    Describe { snapshot: String },

    /// Print the records of a snapshot
    Records { snapshot: String },

    /// List stored snapshots, newest first
    List,

    /// Delete a whole snapshot
    Drop { snapshot: String },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,recordstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("recordstore CLI v{}", recordstore::VERSION);
    tracing::debug!("Data directory: {}", args.data_dir.display());

    let config = Config::builder()
        .data_dir(&args.data_dir)
        .collection(&args.collection)
        .sync_writes(!args.no_sync)
        .build();

    let engine = match args.backend {
        Backend::File => Engine::open_file(&config),
        Backend::Document => Engine::open_document(&config),
    };
    let engine = match engine {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Failed to open {:?} backend: {}", args.backend, e);
            return ExitCode::FAILURE;
        }
    };

    let response = match run(&engine, args.command) {
        Ok(response) => response,
        Err(e) => Response::error(&e),
    };

    println!("{}", response.to_json());

    if response.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Translate a subcommand into engine calls
fn run(engine: &Engine, command: Commands) -> Result<Response, StoreError> {
    let (snapshot, upload, command) = match command {
        Commands::Upload { file, name } => {
            let name = match name {
                Some(name) => name,
                None => file_name(&file)?,
            };
            (name, Some(file), Command::Upload)
        }
        Commands::Create {
            snapshot,
            id,
            email,
            name,
            upload,
        } => (snapshot, upload, Command::Create { id, email, name }),
        Commands::Update {
            snapshot,
            id,
            email,
            name,
            upload,
        } => (snapshot, upload, Command::Update { id, email, name }),
        Commands::Patch {
            snapshot,
            id,
            email,
            name,
            upload,
        } => (snapshot, upload, Command::Patch { id, email, name }),
        Commands::Delete {
            snapshot,
            id,
            upload,
        } => (snapshot, upload, Command::Delete { id }),
        Commands::Describe { snapshot } => (snapshot, None, Command::Describe),
        Commands::Records { snapshot } => {
            let records = engine.records(&snapshot)?;
            return Ok(Response::ok(serde_json::json!({
                "snapshot": snapshot,
                "count": records.len(),
                "records": records,
            })));
        }
        Commands::List => {
            let snapshots = engine.list_snapshots()?;
            return Ok(Response::ok(serde_json::json!({
                "count": snapshots.len(),
                "snapshots": snapshots,
            })));
        }
        Commands::Drop { snapshot } => {
            engine.drop_snapshot(&snapshot)?;
            return Ok(Response::ok(serde_json::json!({
                "message": format!("Snapshot dropped: {}", snapshot),
            })));
        }
    };

    let bytes = match upload {
        Some(path) => Some(std::fs::read(&path)?),
        None => None,
    };
    let target = Target {
        name: &snapshot,
        upload: bytes.as_deref(),
    };

    let result = engine.execute(target, &command);
    Ok(Response::from_result(&command, &result))
}

fn file_name(path: &std::path::Path) -> Result<String, StoreError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidName {
            name: path.display().to_string(),
        })
}
