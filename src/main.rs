//! CLI entry point for the session client.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use sessionclient_core::Client;
use tracing::{debug, info};

mod cli;

use cli::{Args, HttpMethod};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(
        endpoint = %args.endpoint,
        method = ?args.method,
        path = %args.path,
        "CLI arguments parsed"
    );

    let config = args.client_config()?;
    let client = Client::new(args.endpoint.clone(), config)
        .with_context(|| format!("cannot create client for {}", args.endpoint))?;

    let body = args.body.as_deref().unwrap_or_default();
    let response = match args.method {
        HttpMethod::Get => client.http_get_with_response(&args.path).await,
        HttpMethod::Post => client.http_post_with_response(&args.path, body).await,
        HttpMethod::Put => client.http_put_with_response(&args.path, body).await,
        HttpMethod::Delete => client.http_delete_with_response(&args.path).await,
    }
    .with_context(|| format!("{:?} {} failed", args.method, args.path))?;

    let client_id = client.client_id().await;
    info!(
        status = %response.status,
        bytes = response.body.len(),
        client_id = %client_id,
        "Request complete"
    );

    let mut stdout = io::stdout().lock();
    stdout.write_all(&response.body)?;
    if !response.body.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    Ok(())
}
