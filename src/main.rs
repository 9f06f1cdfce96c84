use anyhow::Context;
use clap::Parser;
use climate_store::cli::args::{Args, Commands};
use climate_store::cli::commands;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    match run(args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let command_name = match &args.command {
        Some(Commands::Init) => "init",
        Some(Commands::Query(_)) => "query",
        Some(Commands::Summary(_)) => "summary",
        Some(Commands::Check(_)) => "check",
        None => "help",
    };
    commands::run(args).with_context(|| format!("{} failed", command_name))
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Climate Store - Monitoring Network Record Store");
    println!("===============================================");
    println!();
    println!("Inspect the delimited data files of a climate monitoring network:");
    println!("cities, operators, monitoring centres and weather observations.");
    println!();
    println!("USAGE:");
    println!("    climate-store <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    init        Create missing data files with their header rows");
    println!("    query       Query one collection with FIELD=VALUE conditions");
    println!("    summary     Summarize the weather observations of one city");
    println!("    check       Load every collection and report skipped lines");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -c, --config <FILE>     Configuration file (TOML)");
    println!("    -d, --data-dir <DIR>    Directory holding the data files");
    println!("    -h, --help              Show help information");
    println!("    -V, --version           Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Find cities named Milan (case-insensitive) near latitude 45.8:");
    println!("    climate-store query city -w name=milan -w latitude=45.8");
    println!();
    println!("    # Observations for two cities as JSON:");
    println!("    climate-store query weather -w cityID=3173435,3165524 --format json");
    println!();
    println!("    # Per-category averages for one city:");
    println!("    climate-store summary --city 3173435");
    println!();
    println!("    # List every skipped line in the data files:");
    println!("    climate-store check --detailed");
    println!();
    println!("For detailed help on any command, use:");
    println!("    climate-store <COMMAND> --help");
}
