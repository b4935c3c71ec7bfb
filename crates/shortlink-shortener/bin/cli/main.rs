mod cli;

use crate::cli::{Cli, Command, LogFormat, StorageBackendArg};
use anyhow::Context;
use clap::Parser;
use shortlink_core::{Base62Codec, IndexedTable, TokenCodec};
use shortlink_flake::{Flake, FlakeSettings, DEFAULT_EPOCH};
use shortlink_generator::IdentifierSource;
use shortlink_shortener::{Shortener, ShortenerService};
use shortlink_storage::{InMemoryTable, MySqlTable, PagedRecordStore, TimeoutTable};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    init_tracing(config.log_format);

    match &config.command {
        Command::Encode { identifier } => {
            println!("{}", Base62Codec.encode(*identifier));
        }
        Command::Decode { token } => {
            let identifier = Base62Codec.decode(token)?;
            println!("{identifier}");
        }
        Command::Generate { count } => {
            let flake = build_flake(&config)?;
            for _ in 0..*count {
                let identifier = flake.next()?;
                println!("{identifier}\t{}", Base62Codec.encode(identifier));
            }
        }
        Command::Shorten { urls } => {
            let shortener = build_shortener(&config).await?;
            for url in urls {
                let record = shortener.shorten(url).await?;
                let output = serde_json::json!({
                    "identifier": record.identifier,
                    "token": record.token,
                    "originalUrl": record.original_url,
                    "shortUrl": record.token.to_url(&config.base_url),
                });
                println!("{output}");
            }
        }
        Command::Resolve { token } => {
            if config.storage == StorageBackendArg::InMemory {
                warn!("in-memory storage starts empty, every token resolves to not found");
            }
            let shortener = build_shortener(&config).await?;
            println!("{}", shortener.resolve(token).await?);
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn build_flake(config: &Cli) -> anyhow::Result<Flake<shortlink_flake::SystemClock>> {
    let settings = FlakeSettings::builder()
        .machine_id(config.machine_id)
        .start_epoch(config.epoch.unwrap_or(DEFAULT_EPOCH))
        .build();
    Ok(Flake::new(settings)?)
}

async fn build_shortener(config: &Cli) -> anyhow::Result<Box<dyn Shortener>> {
    info!(
        machine_id = config.machine_id,
        storage_backend = %config.storage,
        page_size = config.page_size,
        store_timeout_ms = config.store_timeout_ms,
        "starting shortlink"
    );

    match config.storage {
        StorageBackendArg::InMemory => shortener_over(config, InMemoryTable::new()),
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .as_deref()
                .context("mysql dsn is required when storage backend is mysql")?;
            let table = MySqlTable::connect(mysql_dsn).await?;
            shortener_over(config, table)
        }
    }
}

fn shortener_over<T: IndexedTable>(config: &Cli, table: T) -> anyhow::Result<Box<dyn Shortener>> {
    let table = TimeoutTable::new(table, Duration::from_millis(config.store_timeout_ms));
    let store = PagedRecordStore::new(table, Base62Codec).with_page_size(config.page_size);
    Ok(Box::new(ShortenerService::new(
        store,
        build_flake(config)?,
        Base62Codec,
    )))
}
