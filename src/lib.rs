pub mod cli;
pub mod config;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod model_gateway;
pub mod providers;
pub mod schema;

use anyhow::{Context, Result};
use reqwest::Client;
use std::io;
use tracing::info;

use cli::Args;
use config::Config;
use lookup::lookup_country;
use model_gateway::HostModelGateway;

pub async fn run(args: Args) -> Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = logging::init();

    info!(
        service_type = args.service_type.as_str(),
        country = %args.country,
        "starting country lookup"
    );
    let cfg = Config::resolve(&args)?;
    info!(
        service_type = cfg.service_type.as_str(),
        model = %cfg.model,
        base_url = %cfg.base_url,
        max_tokens = cfg.max_tokens,
        reply_policy = cfg.reply_policy.as_str(),
        "loaded runtime configuration"
    );

    let client = Client::builder()
        .build()
        .context("Failed to initialize HTTP client")?;
    let gateway = HostModelGateway::new(&client, &cfg);

    lookup_country(&gateway, &cfg.country, cfg.reply_policy, &mut io::stdout()).await?;
    Ok(())
}
