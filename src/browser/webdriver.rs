use super::PageDriver;
use crate::config::HarvestConfig;
use crate::error::{Result, ScrapeError};
use crate::utils;
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";
const READY_STATE_SCRIPT: &str = "return document.readyState;";

/// A live browser session driven over WebDriver
pub struct WebDriverPage {
    client: Client,
}

impl WebDriverPage {
    /// Connect to the configured WebDriver server, trying common local ports as fallbacks
    pub async fn connect(config: &HarvestConfig) -> Result<Self> {
        let capabilities = browser_capabilities(config.headless);

        match connect_to(&config.webdriver_url, &capabilities).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", config.webdriver_url);
                return Ok(Self { client });
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    config.webdriver_url,
                    e
                );
            }
        }

        let fallback_urls = [
            "http://localhost:9515", // ChromeDriver default
            "http://localhost:4444", // Selenium / geckodriver default
            "http://127.0.0.1:4444", // Try with IP instead of localhost
        ];

        for url in fallback_urls.iter() {
            if *url == config.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = connect_to(url, &capabilities).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self { client });
            }
        }

        Err(ScrapeError::WebDriverConnect(format!(
            "no WebDriver server reachable at {} or fallbacks; \
             start one or set the WEBDRIVER_URL environment variable",
            config.webdriver_url
        )))
    }

    /// End the browser session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

async fn connect_to(url: &str, capabilities: &Map<String, Value>) -> Result<Client> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder
        .connect(url)
        .await
        .map_err(|e| ScrapeError::WebDriverConnect(e.to_string()))
}

fn browser_capabilities(headless: bool) -> Map<String, Value> {
    let mut capabilities = Map::new();
    if headless {
        capabilities.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": ["--headless", "--window-size=1920,1080"] }),
        );
        capabilities.insert(
            "moz:firefoxOptions".to_string(),
            json!({ "args": ["-headless"] }),
        );
    }
    capabilities
}

#[async_trait]
impl PageDriver for WebDriverPage {
    type Element = Element;

    async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn maximize(&self) -> Result<()> {
        // Headless sessions may refuse to maximize; the window size argument covers that case
        if let Err(e) = self.client.maximize_window().await {
            ::log::debug!("Could not maximize window: {}", e);
        }
        Ok(())
    }

    async fn is_loaded(&self) -> Result<bool> {
        let state = self.client.execute(READY_STATE_SCRIPT, vec![]).await?;
        Ok(state.as_str() == Some("complete"))
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.client.execute(SCROLL_SCRIPT, vec![]).await?;
        Ok(())
    }

    async fn find_by_class(&self, class_name: &str) -> Result<Vec<Element>> {
        let selector = utils::class_selector(class_name);
        Ok(self.client.find_all(Locator::Css(&selector)).await?)
    }

    async fn attribute(&self, element: &Element, name: &str) -> Result<Option<String>> {
        Ok(element.attr(name).await?)
    }

    async fn click(&self, element: &Element) -> Result<()> {
        element.click().await?;
        Ok(())
    }
}
