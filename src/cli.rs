// File: src/cli.rs
//! Flags shared by the `npt` and `npt_stdio` binaries.
use crate::config::Config;
use crate::error::Result;
use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "npt.toml";

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// TOML config file; missing means defaults
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// override the dump file used for loading and saving
    #[arg(short, long)]
    pub dump_path: Option<PathBuf>,

    /// start empty instead of importing the dump file
    #[arg(long)]
    pub fresh: bool,

    /// log debug events to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(&self.config)?;
        if let Some(path) = &self.dump_path {
            config.storage.dump_path = path.clone();
        }
        if self.fresh {
            config.storage.load_on_start = false;
        }
        Ok(config)
    }

    /// Logs go to stderr so stdout carries only program output.
    pub fn init_tracing(&self) {
        let level = if self.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();
    }
}
