use anyhow::Result;
use migrato::{ConfigBuilder, FsCatalog, Panel, SqliteHistory, Tree};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{env, str::FromStr};
use tracing_subscriber::{
    prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Prints the migration tree of a project.
///
/// - `MIGRATO_DSN` - sqlite database holding the history (`sqlite://app.db`)
/// - `MIGRATO_PATHS` - comma separated migration directories (`./migrations`)
/// - `MIGRATO_TABLE` - history table (`migration`)
/// - `MIGRATO_EXTENSION` - migration file extension (`php`)
/// - `MIGRATO_NEWEST_FIRST` - `true` to list recent migrations first
/// - `MIGRATO_FORMAT` - `text` or `json`
#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::from_str("error,migrato=info,migrato_store=info"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();

    let dsn = env::var("MIGRATO_DSN").unwrap_or_else(|_| "sqlite://app.db".to_owned());
    let paths = env::var("MIGRATO_PATHS").unwrap_or_else(|_| "./migrations".to_owned());
    let table = env::var("MIGRATO_TABLE").unwrap_or_else(|_| "migration".to_owned());
    let extension = env::var("MIGRATO_EXTENSION").unwrap_or_else(|_| "php".to_owned());
    let newest_first = env::var("MIGRATO_NEWEST_FIRST")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let json = env::var("MIGRATO_FORMAT").map(|v| v == "json").unwrap_or(false);

    let mut catalog = FsCatalog::new().extension(extension);
    for path in paths.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        catalog = catalog.path(path);
    }

    let options = SqliteConnectOptions::from_str(&dsn)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    let history = SqliteHistory::from(pool).table(table);

    let config = ConfigBuilder::new().newest_first(newest_first).build();
    let mut panel = Panel::new(catalog, history)
        .config(config)
        .renderer(move |tree: &Tree| {
            if json {
                match serde_json::to_string_pretty(&tree.nodes()) {
                    Ok(output) => println!("{output}"),
                    Err(e) => tracing::error!("{e}"),
                }
            } else {
                print!("{tree}");
            }
        });

    panel.activate().await;

    Ok(())
}
