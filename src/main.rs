use anyhow::Result;
use clap::Parser;

use countryinfo::cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    countryinfo::run(Args::parse()).await
}
