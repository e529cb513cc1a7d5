//! trip-query command-line client.
//!
//! Looks up the trips between two locations with a named provider and
//! prints them to stdout. Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trip_query::domain::{FormatError, parse_when};
use trip_query::format::{OutputFormat, render};
use trip_query::provider::{
    Provider, ProviderError, ProviderManager, ProviderSettings, TripOptions,
};
use trip_query::query::{QueryConfig, QueryContext, QueryError, QueryOrchestrator, QueryState};

/// Query trips between two locations
#[derive(Debug, Parser)]
#[command(name = "trip-query")]
#[command(version, about = "Query trips between two locations", long_about = None)]
struct Cli {
    /// Where the trip starts
    #[arg(required_unless_present = "list_providers")]
    from: Option<String>,

    /// Where the trip ends
    #[arg(required_unless_present = "list_providers")]
    to: Option<String>,

    /// Provider to query
    #[arg(short, long, env = "TRIP_QUERY_PROVIDER", default_value = "de-db")]
    provider: String,

    /// Output style
    #[arg(long, value_enum, default_value_t = OutputFormat::Terse)]
    format: OutputFormat,

    /// Departure time as YYYY-MM-DDTHH:MM (default: now)
    #[arg(long)]
    when: Option<String>,

    /// Treat --when as the arrival time
    #[arg(long)]
    arrival: bool,

    /// Deadline for the whole query in seconds
    #[arg(long, env = "TRIP_QUERY_TIMEOUT", default_value_t = 20)]
    timeout: u64,

    /// Fixture file for the `fixture` provider
    #[arg(long, env = "TRIP_QUERY_FIXTURE")]
    fixture: Option<PathBuf>,

    /// Override the provider endpoint
    #[arg(long, env = "TRIP_QUERY_BASE_URL")]
    base_url: Option<String>,

    /// Print the available providers and exit
    #[arg(long)]
    list_providers: bool,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn provider_settings(&self) -> ProviderSettings {
        let mut settings = ProviderSettings::default();
        if let Some(url) = &self.base_url {
            settings = settings.with_base_url(url.clone());
        }
        if let Some(path) = &self.fixture {
            settings = settings.with_fixture(path.clone());
        }
        settings
    }

    fn query_config(&self) -> QueryConfig {
        QueryConfig::new(Duration::from_secs(self.timeout))
            .with_trip_options(TripOptions::default().by_arrival(self.arrival))
    }
}

/// Failures reported as `Error: <message>`.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl CliError {
    /// Query failures are reported in-band; bad input and unusable
    /// providers are usage errors.
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Query(_) => 0,
            CliError::Format(_) | CliError::Provider(_) => 1,
        }
    }
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter_from_verbosity(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// `Start:`/`End:` line for the state a query just entered.
fn progress_line(state: QueryState, context: &QueryContext) -> Option<String> {
    match state {
        QueryState::AwaitingEndLocation => {
            context.start.as_ref().map(|start| format!("Start: {}", start.name))
        }
        QueryState::AwaitingTrips => context.end.as_ref().map(|end| format!("End: {}", end.name)),
        _ => None,
    }
}

async fn run(cli: &Cli, from: &str, to: &str) -> Result<(), CliError> {
    let when = parse_when(cli.when.as_deref())?;

    let manager = ProviderManager::new(cli.provider_settings());
    let provider = manager.activate(&cli.provider)?;
    println!("Loaded provider {}", provider.name());

    let config = cli.query_config();
    let context = QueryContext::new(from, to, when);
    let print_progress = |state, ctx: &QueryContext| {
        if let Some(line) = progress_line(state, ctx) {
            println!("{line}");
        }
    };
    let mut query =
        QueryOrchestrator::new(&provider, &config, context).on_transition(print_progress);

    let trips = query.run().await?;
    print!("{}", render(&trips, cli.format));
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version end up here too
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    init_logging(cli.verbose);

    if cli.list_providers {
        for name in ProviderManager::available_providers() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }

    let (Some(from), Some(to)) = (cli.from.as_deref(), cli.to.as_deref()) else {
        println!("Usage: trip-query <FROM> <TO>");
        return ExitCode::FAILURE;
    };

    match run(&cli, from, to).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("Error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
