//! SolarWinds Observability command-line interface.

pub mod cli;
pub mod config;
pub mod run;
pub mod signal;

pub use cli::{Cli, Command, GetArgs, LogsCommand};
pub use config::{Config, ConfigError};
pub use run::LogsGet;
