//! Command implementations for the climate store CLI
//!
//! Each subcommand loads the configuration, opens the store and prints its
//! result to stdout. Logging goes to stderr so that JSON output stays clean.

use crate::app::models::{City, MonitoringCenter, Operator, RecordKind, WeatherRecord};
use crate::app::services::operations::WeatherSummary;
use crate::app::services::record_store::{
    Condition, LoadReport, RecordStore, Stored, WeatherField,
};
use crate::cli::args::{Args, CheckArgs, Commands, Entity, OutputFormat, QueryArgs, SummaryArgs};
use crate::config::StoreConfig;
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

/// Main command runner for the climate store
///
/// Dispatches to the subcommand handler after logging and configuration are
/// set up.
pub fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let command = args
        .command
        .clone()
        .ok_or_else(|| Error::configuration("No command given"))?;

    let config = StoreConfig::load_layered(args.config_file.as_deref(), args.data_dir.clone())?;
    debug!("Loaded configuration: {:?}", config);

    match command {
        Commands::Init => run_init(config),
        Commands::Query(query_args) => run_query(config, &query_args),
        Commands::Summary(summary_args) => run_summary(config, &summary_args),
        Commands::Check(check_args) => run_check(config, &check_args),
    }
}

/// Set up structured logging to stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("climate_store={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Open the store and log a one-line warning if anything was skipped
fn open_store(config: StoreConfig) -> Result<(RecordStore, LoadReport)> {
    let (store, report) = RecordStore::open(config)?;
    if report.has_errors() || report.has_warnings() {
        warn!(
            "Store loaded with problems ({}); run 'climate-store check' for details",
            report.summary()
        );
    }
    Ok((store, report))
}

// =============================================================================
// init
// =============================================================================

fn run_init(config: StoreConfig) -> Result<()> {
    config.validate()?;
    let store = RecordStore::new(config);
    let (created, errors) = store.initialize_files();

    for path in &created {
        println!("{} {}", "Created".bright_green().bold(), path.display());
    }
    if created.is_empty() && errors.is_empty() {
        println!(
            "All data files already exist in {}",
            store.config().data_dir.display()
        );
    }
    for error in &errors {
        println!("{} {}", "Failed".bright_red().bold(), error);
    }

    if errors.is_empty() {
        info!("Initialized {} data files", created.len());
        Ok(())
    } else {
        Err(Error::configuration(format!(
            "{} data files could not be created",
            errors.len()
        )))
    }
}

// =============================================================================
// query
// =============================================================================

fn run_query(config: StoreConfig, args: &QueryArgs) -> Result<()> {
    let (store, _) = open_store(config)?;
    let kind = RecordKind::from(args.entity);

    match args.entity {
        Entity::City => print_query::<City>(&store, args, describe_city),
        Entity::Operator => print_query::<Operator>(&store, args, describe_operator),
        Entity::Center => print_query::<MonitoringCenter>(&store, args, describe_center),
        Entity::Weather => print_query::<WeatherRecord>(&store, args, describe_weather),
    }
    .inspect(|count| info!("Query on {} matched {} records", kind, count))
    .map(|_| ())
}

/// Run the conditions against one collection and print the matches
fn print_query<T: Stored + Serialize>(
    store: &RecordStore,
    args: &QueryArgs,
    describe: fn(&T) -> String,
) -> Result<usize> {
    let conditions = args
        .conditions
        .iter()
        .map(|expression| Condition::<T::Field>::parse(expression))
        .collect::<Result<Vec<_>>>()?;
    let records = store.collection::<T>().get_by(&conditions)?;

    match args.output_format {
        OutputFormat::Json => println!("{}", to_json(&records)?),
        OutputFormat::Human => {
            for record in &records {
                println!("{}", describe(record));
            }
            println!(
                "\n{} {} records",
                records.len().to_string().bright_white().bold(),
                RecordKind::from(args.entity)
            );
        }
    }
    Ok(records.len())
}

fn describe_city(city: &City) -> String {
    format!(
        "{:>8}  {} ({}, {})  {}, {}",
        city.id().to_string().bright_white().bold(),
        city.name(),
        city.country_code(),
        city.country_name().unwrap_or("-"),
        city.latitude(),
        city.longitude()
    )
}

fn describe_operator(operator: &Operator) -> String {
    let center = operator
        .center_id()
        .map_or_else(|| "no centre".to_string(), |id| format!("centre {}", id));
    format!(
        "{:>4}  {} <{}>  user '{}', {}",
        operator.id().to_string().bright_white().bold(),
        operator.full_name(),
        operator.email(),
        operator.username(),
        center
    )
}

fn describe_center(center: &MonitoringCenter) -> String {
    let cities: Vec<String> = center.city_ids().iter().map(|id| id.to_string()).collect();
    format!(
        "{:>4}  {}  {} {}, {} {} ({})  cities: {}",
        center.id().to_string().bright_white().bold(),
        center.name(),
        center.street(),
        center.street_number(),
        center.postal_code(),
        center.town(),
        center.district(),
        cities.join(", ")
    )
}

fn describe_weather(record: &WeatherRecord) -> String {
    let scores: Vec<String> = record
        .iter_scores()
        .filter_map(|(category, score)| {
            score
                .score()
                .map(|value| format!("{}={}", category.key(), value))
        })
        .collect();
    format!(
        "{:>6}  {}  city {} centre {}  {}",
        record.id().to_string().bright_white().bold(),
        record.date(),
        record.city_id(),
        record.center_id(),
        scores.join(" ")
    )
}

// =============================================================================
// summary
// =============================================================================

fn run_summary(config: StoreConfig, args: &SummaryArgs) -> Result<()> {
    let (store, _) = open_store(config)?;

    let city = store
        .cities()
        .get_by_id(args.city_id)?
        .ok_or_else(|| Error::record_not_found(RecordKind::City, args.city_id))?;
    let records = store
        .weather()
        .get_by(&[Condition::new(WeatherField::CityId, args.city_id)])?;
    let summary = WeatherSummary::from_records(records.iter().copied());

    match args.output_format {
        OutputFormat::Json => {
            let mut categories = serde_json::Map::new();
            for (category, entry) in summary.iter() {
                categories.insert(category.key().to_string(), json!(entry));
            }
            let report = json!({
                "city": city,
                "observations": records.len(),
                "categories": categories,
            });
            println!("{}", to_json(&report)?);
        }
        OutputFormat::Human => {
            println!(
                "\n{} {} ({}), {} observations",
                "Weather summary for".bright_green().bold(),
                city.name(),
                city.country_code(),
                records.len().to_string().bright_white().bold()
            );
            for (category, entry) in summary.iter() {
                let average = entry
                    .average
                    .map_or_else(|| "-".to_string(), |value| value.to_string());
                println!(
                    "  {:<20} {:>3}  ({} scored)",
                    category.label(),
                    average.bright_white().bold(),
                    entry.count
                );
                for comment in &entry.comments {
                    println!("      {}", comment.dimmed());
                }
            }
        }
    }
    Ok(())
}

// =============================================================================
// check
// =============================================================================

fn run_check(config: StoreConfig, args: &CheckArgs) -> Result<()> {
    let (_, report) = RecordStore::open(config)?;

    println!("\n{}", "Load Report".bright_green().bold());
    for path in &report.created_files {
        println!("  {} {}", "created".bright_yellow(), path.display());
    }
    for error in &report.errors {
        println!("  {} {}", "failed".bright_red().bold(), error);
    }

    for stats in &report.collections {
        let status = if stats.has_errors() {
            "ERROR".bright_red().bold()
        } else if stats.has_warnings() {
            "WARN".bright_yellow().bold()
        } else {
            "OK".bright_green().bold()
        };
        println!("  {:<5} {}", status, stats.summary());

        if args.detailed {
            for skipped in &stats.skipped {
                println!(
                    "        {}:{} {}",
                    stats.path.display(),
                    skipped.line_number,
                    skipped.reason
                );
            }
            for id in &stats.duplicate_ids {
                println!("        duplicate ID {} ignored", id);
            }
        }
    }
    println!("\n{}", report.summary());

    if report.has_errors() {
        Err(Error::data_validation(
            "one or more data files could not be loaded",
        ))
    } else {
        Ok(())
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| Error::configuration(format!("Failed to serialize output: {}", e)))
}
