use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Asset class dashboard - manage image, launch configuration and snapshot classes
#[derive(Parser, Debug, Clone)]
#[command(name = "awsm-dashboard", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "AWSM_DASHBOARD_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Base URL of the class management API
    #[arg(long)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List the existing classes of a type
    Classes {
        /// images, launchconfigurations or snapshots
        api_type: String,
    },
    /// Print the select choices offered for a class type
    Options { api_type: String },
    /// Open a class in a headless editor session
    Edit(EditArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EditArgs {
    pub api_type: String,

    pub class_name: String,

    /// Read the stored class from a JSON file instead of the API
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Edit one field; repeatable
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Save the class once the edits are applied
    #[arg(long, conflicts_with = "delete")]
    pub save: bool,

    /// Delete the class
    #[arg(long)]
    pub delete: bool,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["awsm-dashboard", "classes", "images"]);
        assert_eq!(cli.config, PathBuf::from("awsm-dashboard.toml"));
        assert!(cli.api_url.is_none());
        assert!(cli.timeout_secs.is_none());
        assert_eq!(
            cli.command,
            Command::Classes {
                api_type: "images".to_string()
            }
        );
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "awsm-dashboard",
            "--config",
            "custom.toml",
            "--api-url",
            "http://10.0.0.5:8081/api",
            "--timeout-secs",
            "10",
            "edit",
            "snapshots",
            "nightly",
            "--set",
            "rotate=true",
            "--set",
            "retain=5",
            "--save",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.api_url, Some("http://10.0.0.5:8081/api".to_string()));
        assert_eq!(cli.timeout_secs, Some(10));

        let Command::Edit(args) = cli.command else {
            panic!("expected edit command");
        };
        assert_eq!(args.api_type, "snapshots");
        assert_eq!(args.class_name, "nightly");
        assert_eq!(
            args.set,
            vec![
                ("rotate".to_string(), "true".to_string()),
                ("retain".to_string(), "5".to_string())
            ]
        );
        assert!(args.save);
        assert!(!args.delete);
    }

    #[test]
    fn test_save_and_delete_conflict() {
        let result = Cli::try_parse_from([
            "awsm-dashboard",
            "edit",
            "images",
            "golden",
            "--save",
            "--delete",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("propagateRegions=us-east-1,us-west-2"),
            Ok((
                "propagateRegions".to_string(),
                "us-east-1,us-west-2".to_string()
            ))
        );
        assert_eq!(
            parse_assignment("volumeID="),
            Ok(("volumeID".to_string(), String::new()))
        );
        assert!(parse_assignment("rotate").is_err());
        assert!(parse_assignment("=true").is_err());
    }
}
