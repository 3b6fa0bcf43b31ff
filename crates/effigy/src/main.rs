//! effigy osquery extension
//!
//! Reports the latest EFI firmware, OS version and build number known to
//! the efigy.io advisory service next to the values installed on this Mac.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use effigy_client::{AdvisoryClient, ReqwestTransport};
use effigy_core::{EXTENSION_NAME, Effigy, QueryContext, TABLE_NAME};
use effigy_exec::LocalExecutor;
use effigy_inventory::{ExtensionManagerSource, InventorySource, OsqueryClient};
use eyre::bail;
use tokio::runtime::Handle;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod extension;
mod host;

use config::{Config, parse_duration};
use extension::ExtensionTable;
use host::OneShotHost;

#[derive(Parser)]
#[command(name = "effigy", version)]
#[command(about = "osquery extension comparing installed firmware and OS versions with efigy.io advisories", long_about = None)]
struct Cli {
    /// osquery extension socket, used to host the table and read inventory
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Timeout for inventory queries (e.g. 3, 5s, 500ms); 0 waits indefinitely
    #[arg(long, value_parser = parse_duration, default_value = "0")]
    timeout: Duration,

    /// Extension health check interval; accepted for osquery compatibility
    #[arg(long, value_parser = parse_duration)]
    interval: Option<Duration>,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Path to an effigy.toml config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the advisory endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Query the table once through osqueryi and print the rows as JSON
    #[arg(long, conflicts_with = "socket")]
    once: bool,

    /// Print the table schema instead of querying it
    #[arg(long)]
    schema: bool,
}

/// What the process was started to do
#[derive(Debug, PartialEq, Eq)]
enum Mode {
    /// Register with osquery at the socket and serve the table
    Serve(PathBuf),
    /// Generate the table once and print it
    Once,
    /// Print the table schema
    Schema,
}

impl Cli {
    fn mode(&self) -> Result<Mode> {
        if self.schema {
            return Ok(Mode::Schema);
        }
        if self.once {
            return Ok(Mode::Once);
        }
        match &self.socket {
            Some(socket) => Ok(Mode::Serve(socket.clone())),
            None => bail!("--socket is required unless --once or --schema is given"),
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Advisory client for the configured endpoint; `--endpoint` wins over the file
fn advisory_client(cli: &Cli, config: &Config) -> Result<AdvisoryClient> {
    let transport = match config.advisory.request_timeout_secs {
        Some(secs) => ReqwestTransport::with_timeout(Duration::from_secs(secs))?,
        None => ReqwestTransport::new(),
    };
    let endpoint = cli
        .endpoint
        .as_deref()
        .unwrap_or(config.advisory.endpoint.as_str());
    Ok(AdvisoryClient::with_transport(Arc::new(transport))?.with_endpoint(endpoint)?)
}

/// Inventory through `osqueryi`, for running outside osquery
fn osqueryi(cli: &Cli, config: &Config) -> OsqueryClient {
    OsqueryClient::new(Arc::new(LocalExecutor::new()))
        .with_binary(config.extension.osqueryi.as_str())
        .with_timeout(cli.timeout)
}

/// The effigy table over `source`, configured from flags and file
fn build(cli: &Cli, config: &Config, source: Arc<dyn InventorySource>) -> Result<Effigy> {
    let mut table = Effigy::new(source, advisory_client(cli, config)?);
    if let Some(fields) = &config.placeholders {
        table = table.with_unsourced_fields(Arc::new(fields.clone()));
    }
    Ok(table)
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(Config::find);
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.extension.log_level.as_str()
    };
    init_tracing(log_level);

    match &config_path {
        Some(path) => info!(path = %path.display(), "loaded config"),
        None => debug!("no config file found, using defaults"),
    }
    if let Some(interval) = cli.interval {
        debug!(?interval, "ignoring health check interval");
    }

    match cli.mode()? {
        Mode::Serve(socket) => {
            let source = ExtensionManagerSource::connect(&socket)?.with_timeout(cli.timeout);
            let table = build(&cli, &config, Arc::new(source))?;
            let table = ExtensionTable::new(Arc::new(table), Handle::current());

            tokio::task::spawn_blocking(move || extension::serve(EXTENSION_NAME, &socket, table))
                .await??;
        }
        Mode::Once | Mode::Schema => {
            let source = osqueryi(&cli, &config);
            let mut host = OneShotHost::new(EXTENSION_NAME);
            host.register(Box::new(build(&cli, &config, Arc::new(source))?));

            let mut stdout = io::stdout();
            if cli.schema {
                host.write_schema(TABLE_NAME, &mut stdout)?;
            } else {
                host.write_rows(TABLE_NAME, &QueryContext::default(), &mut stdout)
                    .await?;
            }
        }
    }

    Ok(())
}
