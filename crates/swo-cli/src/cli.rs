//! Command-line surface.

use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

/// SolarWinds Observability Command-Line Interface
#[derive(Debug, Parser)]
#[command(name = "swo", version, about)]
pub struct Cli {
    /// URL of the SWO API [default: https://api.na-01.cloud.solarwinds.com]
    #[arg(long = "api-url", global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// API token
    #[arg(long = "api-token", global = true, value_name = "TOKEN")]
    pub api_token: Option<String>,

    /// Path to config
    #[arg(short = 'c', long = "config", global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Enable verbose output (shows API URLs and debug info)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Command-line search for SolarWinds Observability log management service
    Logs {
        #[command(subcommand)]
        command: LogsCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// Search logs
    #[command(after_help = GET_EXAMPLES)]
    Get(GetArgs),
}

const GET_EXAMPLES: &str = "\
EXAMPLES:
   swo logs get something
   swo logs get 1.2.3 Failure
   swo logs get -s ns1 \"connection refused\"
   swo logs get -f \"(www OR db) (nginx OR pgsql) -accepted\"
   swo logs get -f -g <SWO_GROUP_NAME> \"(nginx OR pgsql) -accepted\"
   swo logs get --min-time 'yesterday at noon' --max-time 'today at 4am' -g <SWO_GROUP_NAME>
   swo logs get -- -redis";

#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Group name to search
    #[arg(short = 'g', long)]
    pub group: Option<String>,

    /// Earliest time to search from
    #[arg(long = "min-time", default_value = "1 hour ago")]
    pub min_time: String,

    /// Latest time to search from
    #[arg(long = "max-time")]
    pub max_time: Option<String>,

    /// System to search
    #[arg(short = 's', long)]
    pub system: Option<String>,

    /// Output raw JSON
    #[arg(short = 'j', long)]
    pub json: bool,

    /// Enable live tailing
    #[arg(short = 'f', long)]
    pub follow: bool,

    /// Search terms, passed to the API verbatim
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    pub query: Vec<String>,
}
