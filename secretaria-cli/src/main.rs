//! `secretaria` entry point.

mod app;
mod cli;
mod error;
mod telemetry;

use std::process::ExitCode;
use std::sync::Arc;

use secretaria_client::{ClientConfig, RestClient};
use tracing::error;

use crate::app::App;
use crate::cli::parse_command;
use crate::error::CliResult;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "command failed");
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CliResult<String> {
    let command = parse_command(std::env::args().skip(1))?;
    let config = ClientConfig::load()?;
    telemetry::init_tracing(config.log_format)?;

    let backend = Arc::new(RestClient::new(&config)?);
    let app = App::new(&config, backend);
    app.run(command).await
}
