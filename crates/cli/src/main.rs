//! TecHealth CLI - Credential and record file management.
//!
//! # Usage
//!
//! ```bash
//! # Add a clinic sidebar login
//! techealth-cli credentials add clinic -i ana@techealth.es -s secreto
//!
//! # Check a portal Students login
//! techealth-cli credentials check portal -i bob -s x1
//!
//! # Print the registered professionals
//! techealth-cli records list professionals
//!
//! # Write the exercise catalog from YAML
//! techealth-cli seed exercises catalog.yaml
//!
//! # Write the HR Analytics download template
//! techealth-cli seed template
//! ```
//!
//! Every command works on the `.xlsx` files in `--data-dir` (default: the
//! current directory), the same directory the dashboards read.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::{CommandError, credentials::CredentialFile, records::RecordFile};

#[derive(Parser)]
#[command(name = "techealth-cli")]
#[command(author, version, about = "TecHealth CLI tools")]
struct Cli {
    /// Directory holding the dashboards' workbooks
    #[arg(short, long, global = true, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage plaintext credential files
    Credentials {
        #[command(subcommand)]
        action: CredentialAction,
    },
    /// Inspect record files
    Records {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Write reference workbooks
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum CredentialAction {
    /// Append a credential row, creating the file if needed
    Add {
        /// Credential file (`clinic`, `patients` or `portal`)
        file: CredentialFile,

        /// Email, username or patient name
        #[arg(short, long)]
        identifier: String,

        /// Password or DNI
        #[arg(short, long)]
        secret: String,
    },
    /// Check whether a credential pair would be accepted
    Check {
        /// Credential file (`clinic`, `patients` or `portal`)
        file: CredentialFile,

        #[arg(short, long)]
        identifier: String,

        #[arg(short, long)]
        secret: String,
    },
}

#[derive(Subcommand)]
enum RecordAction {
    /// Print every row of a record file
    List {
        /// Record file (`sessions`, `professionals`, `clients` or `exercises`)
        file: RecordFile,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Write `ejercicios_pacientes.xlsx` from a YAML catalog
    Exercises {
        /// YAML file with `position` / `exercises` groups
        path: PathBuf,

        /// Overwrite an existing catalog
        #[arg(short, long)]
        force: bool,
    },
    /// Write the HR Analytics `template.xlsx`
    Template {
        /// Overwrite an existing template
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let data_dir = cli.data_dir;
    match cli.command {
        Commands::Credentials { action } => match action {
            CredentialAction::Add {
                file,
                identifier,
                secret,
            } => commands::credentials::add(&data_dir, file, identifier, secret).await?,
            CredentialAction::Check {
                file,
                identifier,
                secret,
            } => commands::credentials::check(&data_dir, file, identifier, secret).await?,
        },
        Commands::Records { action } => match action {
            RecordAction::List { file } => {
                commands::records::list(&data_dir, file).await?;
            }
        },
        Commands::Seed { target } => match target {
            SeedTarget::Exercises { path, force } => {
                commands::seed::exercises(&data_dir, &path, force).await?;
            }
            SeedTarget::Template { force } => commands::seed::template(&data_dir, force).await?,
        },
    }
    Ok(())
}
