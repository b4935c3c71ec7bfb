use clap::{Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use std::fmt::{Display, Formatter};

pub const MACHINE_ID_ENV: &str = "SHORTLINK_MACHINE_ID";
pub const EPOCH_ENV: &str = "SHORTLINK_EPOCH";
pub const STORAGE_BACKEND_ENV: &str = "SHORTLINK_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "SHORTLINK_MYSQL_DSN";
pub const PAGE_SIZE_ENV: &str = "SHORTLINK_PAGE_SIZE";
pub const STORE_TIMEOUT_MS_ENV: &str = "SHORTLINK_STORE_TIMEOUT_MS";
pub const BASE_URL_ENV: &str = "SHORTLINK_BASE_URL";
pub const LOG_FORMAT_ENV: &str = "SHORTLINK_LOG_FORMAT";

pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2_000;
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Allocate identifiers and print them with their tokens.
    Generate {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Encode an identifier into its token.
    Encode { identifier: u64 },
    /// Decode a token back into its identifier.
    Decode { token: String },
    /// Shorten one or more URLs and persist the records.
    Shorten {
        #[arg(required = true)]
        urls: Vec<String>,
    },
    /// Resolve a token to its original URL.
    Resolve { token: String },
}

#[derive(Debug, Parser)]
#[command(name = "shortlink")]
pub struct Cli {
    #[arg(long, env = MACHINE_ID_ENV, default_value_t = 0)]
    pub machine_id: u16,

    /// Zero point of the identifier time field, e.g. `2014-09-01T00:00:00Z`.
    #[arg(long, env = EPOCH_ENV)]
    pub epoch: Option<Timestamp>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = PAGE_SIZE_ENV, default_value_t = shortlink_storage::DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = DEFAULT_STORE_TIMEOUT_MS)]
    pub store_timeout_ms: u64,

    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}
