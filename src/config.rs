use crate::error::{Result, ScrapeError};
use crate::utils;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings for the browser and the pacing of page interactions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a visible window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Folder receiving images (and staging uploads for object storage)
    #[serde(default = "default_images_dir")]
    pub images_dir: PathBuf,

    /// Number of results one scroll is expected to reveal
    #[serde(default = "default_results_per_screen")]
    pub results_per_screen: usize,

    /// Upper bound on waiting for the page to finish loading after navigation
    #[serde(default = "default_wait_ms")]
    pub settle_timeout_ms: u64,

    /// Upper bound on waiting for new results after each scroll
    #[serde(default = "default_wait_ms")]
    pub scroll_pause_ms: u64,

    /// Upper bound on waiting for the detail view after clicking a thumbnail
    #[serde(default = "default_wait_ms")]
    pub detail_timeout_ms: u64,

    /// Interval between readiness checks while waiting
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Timeout for a single image download
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_images_dir() -> PathBuf {
    PathBuf::from("images")
}

fn default_results_per_screen() -> usize {
    20
}

fn default_wait_ms() -> u64 {
    3000
}

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            images_dir: default_images_dir(),
            results_per_screen: default_results_per_screen(),
            settle_timeout_ms: default_wait_ms(),
            scroll_pause_ms: default_wait_ms(),
            detail_timeout_ms: default_wait_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
        }
    }
}

impl HarvestConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply the `WEBDRIVER_URL` environment override if it is set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    pub fn detail_timeout(&self) -> Duration {
        Duration::from_millis(self.detail_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Which variant of each result is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Persist the thumbnail as it appears in the grid
    Low,
    /// Open each result and persist the larger image from its detail view
    Standard,
}

/// Where finished images are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    LocalFolder { path: PathBuf },
    ObjectStore { credentials: PathBuf, bucket: String },
}

/// One harvesting run, validated at construction and read-only afterwards
#[derive(Debug, Clone)]
pub struct SearchSession {
    url: String,
    count: usize,
    quality: QualityTier,
    sink: SinkTarget,
    thumbnail_class: String,
    modal_class: Option<String>,
    upscale: bool,
}

impl SearchSession {
    pub fn builder() -> SearchSessionBuilder {
        SearchSessionBuilder::default()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn quality(&self) -> QualityTier {
        self.quality
    }

    pub fn sink(&self) -> &SinkTarget {
        &self.sink
    }

    pub fn thumbnail_class(&self) -> &str {
        &self.thumbnail_class
    }

    /// Selector for the larger image; always present in Standard tier
    pub fn modal_class(&self) -> Option<&str> {
        self.modal_class.as_deref()
    }

    /// Whether fetched images are enlarged before persisting
    pub fn upscale(&self) -> bool {
        self.upscale
    }
}

/// Builder for [`SearchSession`]
#[derive(Debug, Default)]
pub struct SearchSessionBuilder {
    url: Option<String>,
    count: usize,
    quality: Option<QualityTier>,
    sink: Option<SinkTarget>,
    thumbnail_class: Option<String>,
    modal_class: Option<String>,
    upscale: Option<bool>,
}

impl SearchSessionBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn quality(mut self, quality: QualityTier) -> Self {
        self.quality = Some(quality);
        self
    }

    pub fn sink(mut self, sink: SinkTarget) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn thumbnail_class(mut self, class: impl Into<String>) -> Self {
        self.thumbnail_class = Some(class.into());
        self
    }

    pub fn modal_class(mut self, class: impl Into<String>) -> Self {
        self.modal_class = Some(class.into());
        self
    }

    /// Override the tier default (enlarge in Standard, keep as-is in Low)
    pub fn upscale(mut self, upscale: bool) -> Self {
        self.upscale = Some(upscale);
        self
    }

    pub fn build(self) -> Result<SearchSession> {
        let url = self.url.unwrap_or_default().trim().to_string();
        if !utils::is_valid_url(&url) {
            return Err(ScrapeError::InvalidInput(format!(
                "'{}' is not a valid page URL",
                url
            )));
        }

        if self.count == 0 {
            return Err(ScrapeError::InvalidInput(
                "count must be at least 1".to_string(),
            ));
        }

        let sink = self
            .sink
            .ok_or_else(|| ScrapeError::InvalidInput("no output sink selected".to_string()))?;
        validate_sink(&sink)?;

        let thumbnail_class = non_empty(self.thumbnail_class, "thumbnail class name")?;

        let quality = self.quality.unwrap_or(QualityTier::Low);
        let modal_class = match quality {
            QualityTier::Standard => Some(non_empty(self.modal_class, "modal image class name")?),
            QualityTier::Low => None,
        };

        Ok(SearchSession {
            url,
            count: self.count,
            quality,
            sink,
            thumbnail_class,
            modal_class,
            upscale: self.upscale.unwrap_or(quality == QualityTier::Standard),
        })
    }
}

/// Checks the sink settings that can be verified without touching storage
pub fn validate_sink(sink: &SinkTarget) -> Result<()> {
    match sink {
        SinkTarget::LocalFolder { path } => {
            if path.as_os_str().is_empty() {
                return Err(ScrapeError::InvalidInput(
                    "output folder must not be empty".to_string(),
                ));
            }
        }
        SinkTarget::ObjectStore {
            credentials,
            bucket,
        } => {
            if credentials.as_os_str().is_empty() || bucket.trim().is_empty() {
                return Err(ScrapeError::InvalidInput(
                    "credentials and bucket must be specified when using gcs as output"
                        .to_string(),
                ));
            }
        }
    }
    Ok(())
}

fn non_empty(value: Option<String>, what: &str) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ScrapeError::InvalidInput(format!("{} must not be empty", what))),
    }
}
