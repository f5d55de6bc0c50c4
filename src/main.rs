//! Rendite - Euro stablecoin yield tracker

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (RPC keys go here, not in the config file)
    dotenvy::dotenv().ok();

    let app = rendite::adapters::cli::init();
    rendite::adapters::cli::execute(app).await
}
