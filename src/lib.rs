//! # awsm-dashboard
//!
//! Native host for the asset class editors. The editor lifecycle itself lives
//! in [`awsm_dashboard_engine`]; this crate adds the pieces a terminal needs:
//!
//! - **CLI**: `classes`, `options` and `edit` subcommands
//! - **Configuration**: file, environment and flag layers with validation
//! - **HTTP**: a `reqwest` implementation of the resource client
//! - **Sessions**: headless editor runs that save or delete classes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use awsm_dashboard::config::{Settings, DEFAULT_CONFIG_FILE};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_file(Path::new(DEFAULT_CONFIG_FILE))?;
//!     println!("API at {}", settings.api.base_url);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod session;

use crate::cli::Command;
use awsm_dashboard_engine::{Phase, ResourceClient};
use std::io::Write;
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute one command. Returns `false` when an editor session ended in
/// the Error phase.
pub async fn run(
    command: &Command,
    client: Rc<dyn ResourceClient>,
    out: &mut dyn Write,
) -> anyhow::Result<bool> {
    match command {
        Command::Classes { api_type } => {
            let catalog = session::fetch_catalog(client.as_ref(), api_type).await?;
            if catalog.is_empty() {
                writeln!(out, "no {} classes", api_type)?;
            }
            for name in catalog.names() {
                writeln!(out, "{}", name)?;
            }
            Ok(true)
        }
        Command::Options { api_type } => {
            let options = session::fetch_options(client.as_ref(), api_type).await?;
            for (group, choices) in options.groups() {
                writeln!(out, "{}: {}", group, choices.join(", "))?;
            }
            Ok(true)
        }
        Command::Edit(args) => {
            let status = session::run_edit(client, args, out).await?;
            Ok(status.phase != Phase::Error)
        }
    }
}
