use std::{env, num::ParseIntError};

use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pexels::Client;

#[derive(Debug, Error)]
enum Error {
    #[error("{0}")]
    Pexels(#[from] pexels::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("You must set PEXELS_API_KEY in the environment or in a .env file")]
    MissingApiKey,

    #[error("Invalid {name}: {source}")]
    InvalidNumber {
        name: &'static str,
        #[source]
        source: ParseIntError,
    },
}

type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Clone)]
struct Config {
    api_key: String,
    per_page: u32,
    page: u32,
}

impl Config {
    fn from_env() -> Result<Self> {
        let api_key = env::var("PEXELS_API_KEY").map_err(|_| Error::MissingApiKey)?;

        Ok(Self {
            api_key,
            per_page: number_from_env("PEXELS_PER_PAGE", 15)?,
            page: number_from_env("PEXELS_PAGE", 1)?,
        })
    }
}

fn number_from_env(name: &'static str, default: u32) -> Result<u32> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|source| Error::InvalidNumber { name, source }),

        Err(_) => Ok(default),
    }
}

fn init_tracing() {
    let fmt_layer = fmt::layer().with_target(true).with_level(true);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

async fn print_curated(config: &Config) -> Result<()> {
    let client = Client::new(&config.api_key)?;

    let result = client.curated_photos(config.per_page, config.page).await?;
    if result.photos.is_empty() {
        println!("No photos found");
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&result)?);
    tracing::info!(
        remaining = client.remaining_requests(),
        "requests left in the current window"
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        init_tracing();

        let config = Config::from_env()?;
        print_curated(&config).await
    }

    if let Err(e) = run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
