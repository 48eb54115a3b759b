//! reqkit command line.
//!
//! Sends one request and prints the response body to stdout. Dump records go
//! wherever the dump flags or config file point them.
//!
//! ```text
//! reqkit --dump head https://example.com/
//! reqkit -X POST -H 'Content-Type: application/json' -d '{"a":1}' \
//!     --debug http://localhost:8080/items
//! reqkit --config client.toml --dump-file exchange.log --dump-async https://example.com/
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use reqkit::observability::init_tracing;
use reqkit::{load_config, Client, ClientConfig, DumpPreset, ProxyPolicy, TracingLogger};

/// How long to wait for async dump records before exiting.
const DUMP_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Parser)]
#[command(name = "reqkit")]
#[command(
    about = "Send an HTTP request with optional request/response dumps",
    long_about = None
)]
struct Cli {
    /// Target URL
    url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Extra header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME: VALUE")]
    headers: Vec<String>,

    /// Request body
    #[arg(short = 'd', long)]
    data: Option<String>,

    /// TOML client configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dump everything, decode text, browser user agent
    #[arg(long)]
    debug: bool,

    /// Like --debug, but discard response bodies
    #[arg(long, conflicts_with = "debug")]
    test: bool,

    /// Dump preset: all, head, body, request or response
    #[arg(long, value_name = "PRESET")]
    dump: Option<DumpPreset>,

    /// Write dump records to this file
    #[arg(long)]
    dump_file: Option<PathBuf>,

    /// Write dump records from a background worker
    #[arg(long)]
    dump_async: bool,

    /// Overall request timeout in seconds, 0 for none
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Ignore proxy environment variables
    #[arg(long)]
    no_proxy: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing("reqkit=info");

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Request failed");
            eprintln!("reqkit: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if cli.no_proxy {
        config.transport.proxy = ProxyPolicy::Disabled;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeouts.request_secs = secs;
    }

    let mut client = Client::from_config(&config)?;
    client.logger(Some(Arc::new(TracingLogger)));

    if cli.test {
        client.test_mode();
    } else if cli.debug {
        client.debug_mode();
    }
    if let Some(preset) = cli.dump {
        client.dump_preset(preset);
    }
    if let Some(path) = &cli.dump_file {
        client.dump_to_file(path);
    }
    if cli.dump_async {
        client.dump_async();
    }

    tracing::info!(
        method = %cli.method,
        url = %cli.url,
        dump = client.is_dump_enabled(),
        "Sending request"
    );

    let mut request = client.r().method_name(&cli.method).url(&cli.url);
    for raw in &cli.headers {
        let (name, value) = parse_header(raw)?;
        request = request.header(name, value);
    }
    if let Some(data) = cli.data {
        request = request.body(data);
    }

    let result = request.send().await;
    if !client.flush_dump(DUMP_FLUSH_TIMEOUT).await {
        tracing::warn!("Dump queue not drained before exit");
    }
    let response = result?;

    tracing::info!(
        status = %response.status(),
        bytes = response.bytes().len(),
        discarded = response.is_discarded(),
        "Response received"
    );

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(response.bytes())?;
    stdout.flush()?;
    Ok(())
}

fn parse_header(raw: &str) -> Result<(&str, &str), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid header '{raw}', expected 'Name: value'"))?;
    Ok((name.trim(), value.trim()))
}
