pub mod config;
pub mod export;
pub mod summary;

use clap::{ArgAction, Parser, Subcommand};

use crate::layout::Paper;

#[derive(Parser)]
#[command(name = "infocam", about = "Statistical PDF reports for InfoCam cameras and incidents.")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a report to PDF.
    Export {
        #[command(subcommand)]
        command: ExportCommands,
    },
    /// Print the aggregated statistics of a record dump.
    Summary {
        #[command(subcommand)]
        command: SummaryCommands,
    },
    /// Show or update settings.
    Settings {
        /// Default directory for exported reports
        #[arg(long = "export-dir")]
        export_dir: Option<String>,
        /// Paper size: a4 or letter
        #[arg(long)]
        paper: Option<Paper>,
    },
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Incident report: type distribution pie, top types bars and detail table.
    Incidents {
        /// JSON array of incidents as returned by the API
        file: String,
        /// Output file path (default: <export_dir>/incidencias-YYYY-MM-DD.pdf)
        #[arg(long)]
        output: Option<String>,
        /// Paper size for this report: a4 or letter
        #[arg(long)]
        paper: Option<Paper>,
    },
    /// Camera report: active/inactive pie and status table.
    Cameras {
        /// JSON array of cameras as returned by the API
        file: String,
        /// Output file path (default: <export_dir>/camaras-YYYY-MM-DD.pdf)
        #[arg(long)]
        output: Option<String>,
        /// Paper size for this report: a4 or letter
        #[arg(long)]
        paper: Option<Paper>,
    },
}

#[derive(Subcommand)]
pub enum SummaryCommands {
    /// Incidents grouped by type.
    Incidents {
        /// JSON array of incidents
        file: String,
    },
    /// Cameras grouped by status.
    Cameras {
        /// JSON array of cameras
        file: String,
    },
}

pub fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
