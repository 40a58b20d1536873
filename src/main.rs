//! Runs one cleanliness check configured from environment variables and
//! prints the report.
//!
//! Exit status is 0 when the model answered, including when its reply could
//! not be parsed as a verdict (the parse error and raw text are printed).
//! Configuration errors, unreadable images and inference failures exit
//! non-zero. That includes a completion with no choices, which aborts the
//! check instead of printing nothing.

use anyhow::Context;
use purecheck::{CheckConfig, InferenceClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = CheckConfig::from_env().context("Failed to load configuration")?;
    log::debug!("Using {:?}", config.azure);

    let client = InferenceClient::new(&config.azure);
    let report = purecheck::check_image(&client, &config).await?;

    // A reply that fails to parse is reported, not treated as a process failure.
    println!("{}", report);
    Ok(())
}
