use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use engine::context::FetchContext;
use engine::fetch::{BoundedFetcher, FetchRequest};
use engine::profile::ReaderProfile;
use engine::readers::{alarms, devices, events, measurements};
use engine::selection::SourceSelection;
use engine::source::ItemPages;
use engine::writers::{AlarmWriter, EventWriter, MeasurementWriter};
use model::fetch::{RowBudget, TimeRange};
use platform::client::CotClient;
use platform::config::{ConnectionSettings, PlatformConfig};
use platform::secret;
use tracing::debug;

use crate::error::CliError;
use crate::input;
use crate::output::{self, OutputFormat};
use crate::shutdown::ShutdownCoordinator;

#[derive(Debug, Parser)]
#[command(
    name = "weir",
    version,
    about = "Bounded reader and writer for Cumulocity IoT collections"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Path to the connection file (default: ~/.weir/connection.toml)"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "List managed objects (devices)")]
    Devices(DeviceArgs),

    #[command(about = "Read measurement series from selected devices")]
    Measurements(MeasurementArgs),

    #[command(about = "Read events")]
    Events(CollectionArgs),

    #[command(about = "Read alarms")]
    Alarms(CollectionArgs),

    #[command(subcommand, about = "Create items on the platform from a CSV file")]
    Create(CreateCommands),

    #[command(about = "Check that the platform answers with the stored connection")]
    Ping,

    #[command(subcommand, about = "Manage stored secrets")]
    Secret(SecretCommands),

    #[command(subcommand, about = "Inspect the connection configuration")]
    Config(ConfigCommands),
}

#[derive(Debug, Args)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv, help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, help = "Write output to this file instead of stdout")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[arg(long, help = "Stop after this many rows (omit for all)")]
    pub rows: Option<i64>,

    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Remote page size (default depends on the collection)"
    )]
    pub page_size: Option<u32>,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Args)]
pub struct CollectionArgs {
    #[arg(
        long = "device",
        help = "Restrict to this managed object id; repeat for several"
    )]
    pub devices: Vec<String>,

    #[arg(
        long,
        value_parser = parse_timestamp,
        help = "Only items at or after this RFC 3339 timestamp"
    )]
    pub from: Option<DateTime<Utc>>,

    #[arg(
        long,
        value_parser = parse_timestamp,
        help = "Only items up to this RFC 3339 timestamp"
    )]
    pub to: Option<DateTime<Utc>>,

    #[arg(long, help = "Stop after this many rows (omit for all)")]
    pub rows: Option<i64>,

    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Remote page size (default depends on the collection)"
    )]
    pub page_size: Option<u32>,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Args)]
pub struct MeasurementArgs {
    #[arg(
        long = "device",
        required = true,
        help = "Managed object id to read from; repeat for several"
    )]
    pub devices: Vec<String>,

    #[arg(
        long,
        value_parser = parse_timestamp,
        help = "Only items at or after this RFC 3339 timestamp"
    )]
    pub from: Option<DateTime<Utc>>,

    #[arg(
        long,
        value_parser = parse_timestamp,
        help = "Only items up to this RFC 3339 timestamp"
    )]
    pub to: Option<DateTime<Utc>>,

    #[arg(long, help = "Stop after this many rows (omit for all)")]
    pub rows: Option<i64>,

    #[arg(
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Remote page size (default depends on the collection)"
    )]
    pub page_size: Option<u32>,

    #[command(flatten)]
    pub out: OutputArgs,
}

#[derive(Debug, Subcommand)]
pub enum CreateCommands {
    #[command(about = "Create events from a CSV file")]
    Events(CreateArgs),

    #[command(about = "Raise alarms from a CSV file")]
    Alarms(CreateArgs),

    #[command(about = "Create measurements from a CSV file")]
    Measurements(CreateArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    #[arg(long, help = "CSV file with one item per row")]
    pub input: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum SecretCommands {
    #[command(about = "Obfuscate a password for the connection file")]
    Encrypt {
        #[arg(help = "Plain text value to obfuscate")]
        value: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Load the connection file and check that it is usable")]
    Check,
}

pub async fn run(cli: Cli, shutdown: &ShutdownCoordinator) -> Result<(), CliError> {
    let Cli { config, command } = cli;
    let config = config.as_deref();
    let ctx = FetchContext::new(shutdown.token());

    match command {
        Commands::Devices(args) => {
            let client = connect_lenient(config)?;
            let pages = devices::DevicePages::new(&client);
            fetch_collection(
                devices::profile(),
                &pages,
                SourceSelection::All,
                TimeRange::unbounded(),
                args.rows,
                args.page_size,
                &args.out,
                &ctx,
            )
            .await
        }
        Commands::Measurements(args) => {
            let client = connect_lenient(config)?;
            let pages = measurements::MeasurementPages::new(&client);
            fetch_collection(
                measurements::profile(),
                &pages,
                SourceSelection::from_ids(args.devices),
                TimeRange::new(args.from, args.to)?,
                args.rows,
                args.page_size,
                &args.out,
                &ctx,
            )
            .await
        }
        Commands::Events(args) => {
            let client = connect_lenient(config)?;
            let pages = events::EventPages::new(&client);
            fetch_collection(
                events::profile(),
                &pages,
                SourceSelection::from_ids(args.devices),
                TimeRange::new(args.from, args.to)?,
                args.rows,
                args.page_size,
                &args.out,
                &ctx,
            )
            .await
        }
        Commands::Alarms(args) => {
            let client = connect_lenient(config)?;
            let pages = alarms::AlarmPages::new(&client);
            fetch_collection(
                alarms::profile(),
                &pages,
                SourceSelection::from_ids(args.devices),
                TimeRange::new(args.from, args.to)?,
                args.rows,
                args.page_size,
                &args.out,
                &ctx,
            )
            .await
        }
        Commands::Create(create) => {
            let client = connect_lenient(config)?;
            match create {
                CreateCommands::Events(args) => {
                    let table = input::read_table(&args.input)?;
                    let report = EventWriter::new(&client).write(&table, &ctx).await?;
                    debug!(?report, "Event write finished.");
                }
                CreateCommands::Alarms(args) => {
                    let table = input::read_table(&args.input)?;
                    let report = AlarmWriter::new(&client).write(&table, &ctx).await?;
                    debug!(?report, "Alarm write finished.");
                }
                CreateCommands::Measurements(args) => {
                    let table = input::read_table(&args.input)?;
                    let report = MeasurementWriter::new(&client).write(&table, &ctx).await?;
                    debug!(?report, "Measurement write finished.");
                }
            }
            Ok(())
        }
        Commands::Ping => {
            let settings = load_settings(config)?;
            let client = CotClient::connect(&settings)?;
            client.ping().await?;
            if client.tenant().is_empty() {
                println!("Platform answered: {}.", client.base_url());
            } else {
                println!(
                    "Platform answered: {} (tenant {}).",
                    client.base_url(),
                    client.tenant()
                );
            }
            Ok(())
        }
        Commands::Secret(SecretCommands::Encrypt { value }) => {
            println!("{}", secret::encrypt(&value, &secret::active_key()));
            Ok(())
        }
        Commands::Config(ConfigCommands::Check) => {
            let settings = load_settings(config)?;
            settings.validate()?;
            let credentials = settings.resolve_credentials()?;
            let tenant = if settings.tenant.is_empty() {
                "(none)"
            } else {
                settings.tenant.as_str()
            };
            println!("Connection file OK.");
            println!("  url:    {}", settings.url);
            println!("  tenant: {}", tenant);
            println!("  user:   {}", credentials.username);
            Ok(())
        }
    }
}

async fn fetch_collection<T, P>(
    mut profile: ReaderProfile<T>,
    pages: &P,
    selection: SourceSelection,
    range: TimeRange,
    rows: Option<i64>,
    page_size: Option<u32>,
    out: &OutputArgs,
    ctx: &FetchContext,
) -> Result<(), CliError>
where
    T: Send + Sync,
    P: ItemPages<Item = T>,
{
    if let Some(size) = page_size {
        profile.page_size = size;
    }
    let fetcher = BoundedFetcher::new(profile);
    let mut sink = output::open_sink(out.format, out.output.as_deref())?;
    let request = FetchRequest {
        selection,
        range,
        budget: RowBudget::from_limit(rows),
    };
    fetcher.run(pages, request, &mut sink, ctx).await?;

    let snapshot = ctx.metrics().snapshot();
    debug!(?snapshot, "Fetch metrics.");
    Ok(())
}

/// Client for data commands. Follows the stored-connection convention of
/// degrading to dummy defaults instead of failing outright; the dummy tenant
/// then surfaces as a fetch error with a clear root cause.
fn connect_lenient(config: Option<&Path>) -> Result<CotClient, CliError> {
    let settings = load_settings(config)?;
    Ok(CotClient::connect_lenient(&settings))
}

fn load_settings(explicit: Option<&Path>) -> Result<ConnectionSettings, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => default_config_path().ok_or(CliError::NoConfig)?,
    };
    Ok(PlatformConfig::load(&path)?.connection)
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".weir").join("connection.toml"))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| format!("'{raw}' is not an RFC 3339 timestamp: {err}"))
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_a_full_measurement_query() {
        let cli = Cli::parse_from([
            "weir",
            "measurements",
            "--device",
            "4711",
            "--device",
            "4712",
            "--from",
            "2024-03-01T00:00:00Z",
            "--rows",
            "500",
            "--page-size",
            "300",
        ]);
        match cli.command {
            Commands::Measurements(args) => {
                assert_eq!(args.devices, vec!["4711", "4712"]);
                assert!(args.from.is_some());
                assert!(args.to.is_none());
                assert_eq!(args.rows, Some(500));
                assert_eq!(args.page_size, Some(300));
                assert_eq!(args.out.format, OutputFormat::Csv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_a_zero_page_size() {
        let result = Cli::try_parse_from(["weir", "alarms", "--page-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn measurements_require_at_least_one_device() {
        assert!(Cli::try_parse_from(["weir", "measurements"]).is_err());
        assert!(Cli::try_parse_from(["weir", "events"]).is_ok());
    }

    #[test]
    fn rejects_a_malformed_timestamp() {
        let result = Cli::try_parse_from(["weir", "events", "--from", "yesterday"]);
        assert!(result.is_err());
    }
}
