// Re-export modules
pub mod browser;
pub mod classify;
pub mod config;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod resize;
pub mod resolver;
pub mod results;
pub mod sink;
pub mod storage;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{HarvestConfig, QualityTier, SearchSession, SinkTarget};
pub use error::{Result, ScrapeError};
pub use pipeline::Pipeline;
pub use results::{HarvestReport, PersistedImage};

use browser::{SnapshotPage, WebDriverPage};
use fetch::HttpFetcher;
use sink::ImageSink;
use std::path::Path;

/// Harvest images for a session using a live WebDriver browser
///
/// The sink and HTTP client are prepared before the browser is contacted, and
/// the browser session is closed whether or not the run succeeds.
pub async fn harvest(session: &SearchSession, config: &HarvestConfig) -> Result<HarvestReport> {
    let sink = ImageSink::open(session.sink(), &config.images_dir)?;
    let fetcher = HttpFetcher::new(config.fetch_timeout())?;

    let page = WebDriverPage::connect(config).await?;
    let result = Pipeline::new(&page, &fetcher, &sink, config)
        .run(session)
        .await;

    if let Err(e) = page.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }
    result
}

/// Harvest images from a results page saved as HTML
pub async fn harvest_snapshot(
    session: &SearchSession,
    config: &HarvestConfig,
    snapshot: impl AsRef<Path>,
) -> Result<HarvestReport> {
    let sink = ImageSink::open(session.sink(), &config.images_dir)?;
    let fetcher = HttpFetcher::new(config.fetch_timeout())?;
    let page = SnapshotPage::from_file(snapshot)?;

    Pipeline::new(&page, &fetcher, &sink, config)
        .run(session)
        .await
}
