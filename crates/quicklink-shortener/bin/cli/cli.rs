use clap::{Parser, Subcommand, ValueEnum};
use quicklink_core::DEFAULT_NAMESPACE;
use std::path::PathBuf;

pub const STORE_PATH_ENV: &str = "QUICKLINK_STORE_PATH";
pub const NAMESPACE_ENV: &str = "QUICKLINK_NAMESPACE";
pub const LOG_FORMAT_ENV: &str = "QUICKLINK_LOG_FORMAT";

pub const DEFAULT_STORE_PATH: &str = "urlMappings.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "quicklink", version, about = "Shorten URLs into a local mapping file")]
pub struct CLI {
    #[arg(long, env = STORE_PATH_ENV, default_value = DEFAULT_STORE_PATH)]
    pub store: PathBuf,

    #[arg(long, env = NAMESPACE_ENV, default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Mint a short key for URL and print it
    Shorten { url: String },
    /// Print the original URL behind KEY
    Resolve { key: String },
    /// Print every stored mapping
    List {
        #[arg(long)]
        json: bool,
    },
}
