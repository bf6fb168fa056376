use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use common::DEFAULT_HORIZON_DAYS;
use forecast::{DEFAULT_UPSTREAM_TIMEOUT, DEFAULT_UPSTREAM_URL};
use std::time::Duration;

pub mod commands;

use commands::{forecast_once, serve};
use crate::config::GatewayConfig;

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(about = "Stock forecast gateway and command line client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Where and how to reach the prediction service
#[derive(Args, Debug, Clone)]
pub struct UpstreamArgs {
    /// Prediction service endpoint
    ///
    /// The service receives `POST {"ticker": "...", "days": N}`.
    #[arg(long, env = "FORECAST_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Timeout for a single prediction call, in seconds
    #[arg(long, env = "FORECAST_UPSTREAM_TIMEOUT_SECS", default_value_t = DEFAULT_UPSTREAM_TIMEOUT.as_secs())]
    pub upstream_timeout_secs: u64,
}

impl UpstreamArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the forecast gateway
    Serve {
        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3001, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3001")]
        bind_address: String,

        #[command(flatten)]
        upstream: UpstreamArgs,

        /// Origins allowed to call the gateway (comma separated); empty allows any
        #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
        allowed_origins: Vec<String>,
    },
    /// Request one forecast from the prediction service and print it as JSON
    Forecast {
        /// Stock symbol, e.g. AAPL
        ticker: String,

        /// Forecast horizon in days
        #[arg(short, long, default_value_t = DEFAULT_HORIZON_DAYS)]
        days: u32,

        #[command(flatten)]
        upstream: UpstreamArgs,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve {
                bind_address,
                upstream,
                allowed_origins,
            } => {
                let config = GatewayConfig {
                    bind_address,
                    upstream_timeout: upstream.timeout(),
                    upstream_url: upstream.upstream_url,
                    allowed_origins,
                };
                serve(&config).await?;
            }
            Commands::Forecast {
                ticker,
                days,
                upstream,
            } => {
                forecast_once(&ticker, days, &upstream).await?;
            }
        }
        Ok(())
    }
}
