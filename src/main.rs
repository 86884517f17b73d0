mod cli_main;

use std::process::ExitCode;

use bammart::error::Result;
use bammart::mart::BiomartClient;
use bammart::pipeline::{helper, run_helper, run_query};
use clap::Parser;
use cli_main::{Cli, Commands, HelperArgs, QueryArgs, ReportFormat};
use tracing::info;
use tracing_subscriber::FmtSubscriber;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Setting tracing default failed: {}", e);
    }

    let result = match &cli.command {
        Commands::Query(args) => query(args),
        Commands::Helper(args) => search(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn query(args: &QueryArgs) -> Result<()> {
    println!("Running BioMart query pipeline");
    let config = args.to_config();
    let client = BiomartClient::new(config.target.clone())?;
    let summary = run_query(&config, &client)?;

    println!(
        "BioMart queries complete: {} ids from {} files, {} rows written to {}",
        summary.identifiers,
        summary.files,
        summary.rows_written,
        summary.output.display()
    );
    Ok(())
}

fn search(args: &HelperArgs) -> Result<()> {
    let config = args.to_config();
    let client = BiomartClient::new(config.target.clone())?;
    let matches = run_helper(&config, &client)?;

    match args.format {
        ReportFormat::Text => print!("{}", helper::render_text(&matches)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&matches)?),
    }
    info!(
        "{} attributes and {} filters matched '{}'",
        matches.attributes.len(),
        matches.filters.len(),
        matches.term
    );
    Ok(())
}
