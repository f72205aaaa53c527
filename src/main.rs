use awsm_dashboard::adapters::http_client::HttpResourceClient;
use awsm_dashboard::cli::Cli;
use awsm_dashboard::config::Settings;
use clap::Parser;
use std::process::ExitCode;
use std::rc::Rc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration before logging so log.level can apply
    let settings = Settings::new_with_cli(&cli)?;
    awsm_dashboard::init_tracing(&settings.log.level);

    info!(
        base_url = %settings.api.base_url,
        timeout_secs = settings.api.timeout_secs,
        "Using class management API"
    );

    let client = Rc::new(HttpResourceClient::from_settings(&settings.api)?);
    let mut stdout = std::io::stdout();

    match awsm_dashboard::run(&cli.command, client, &mut stdout).await {
        Ok(true) => Ok(ExitCode::SUCCESS),
        Ok(false) => Ok(ExitCode::FAILURE),
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}
