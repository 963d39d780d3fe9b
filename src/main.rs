mod aggregate;
mod charts;
mod cli;
mod compose;
mod document;
mod error;
mod fmt;
mod layout;
mod models;
mod pdf;
mod settings;
mod table;

use clap::Parser;

use cli::{Cli, Commands, ExportCommands, SummaryCommands};

fn main() {
    let cli = Cli::parse();
    cli::setup_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Export { command } => match command {
            ExportCommands::Incidents {
                file,
                output,
                paper,
            } => cli::export::incidents(&file, output, paper),
            ExportCommands::Cameras {
                file,
                output,
                paper,
            } => cli::export::cameras(&file, output, paper),
        },
        Commands::Summary { command } => match command {
            SummaryCommands::Incidents { file } => cli::summary::incidents(&file),
            SummaryCommands::Cameras { file } => cli::summary::cameras(&file),
        },
        Commands::Settings { export_dir, paper } => cli::config::run(export_dir, paper),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
