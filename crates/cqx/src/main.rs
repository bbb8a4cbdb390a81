//! CQX - Entry Point
//!
//! Configuration tooling for applications composed with CQX.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cqx config show` | Print the effective configuration (defaults, file, environment) |
//! | `cqx config init [PATH]` | Write a default `cqx.toml` |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cqx_infrastructure::config::{AppConfig, ConfigLoader};
use cqx_infrastructure::constants::DEFAULT_CONFIG_FILENAME;
use cqx_infrastructure::logging::init_logging;

/// Command line interface for CQX
#[derive(Parser, Debug)]
#[command(name = "cqx")]
#[command(about = "CQX - composition configuration tooling")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// `cqx config` subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Write a default configuration file
    Init {
        /// Destination file
        #[arg(default_value = DEFAULT_CONFIG_FILENAME)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn loader(config: Option<PathBuf>) -> ConfigLoader {
    match config {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let loader = loader(cli.config);

    match cli.command {
        Command::Config(ConfigCommand::Show) => {
            let config = loader.load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Command::Config(ConfigCommand::Init { path, force }) => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists, pass --force to overwrite",
                    path.display()
                )
                .into());
            }
            let config = AppConfig::default();
            init_logging(&config.logging)?;
            loader.save_to_file(&config, &path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}
