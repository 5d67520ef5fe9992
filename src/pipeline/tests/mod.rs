mod reveal_page;

use crate::config::HarvestConfig;
use crate::error::Result;
use crate::fetch::{HttpResponse, ImageFetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Config with every wait disabled
pub(super) fn fast_config() -> HarvestConfig {
    HarvestConfig {
        settle_timeout_ms: 0,
        scroll_pause_ms: 0,
        detail_timeout_ms: 0,
        poll_interval_ms: 0,
        ..HarvestConfig::default()
    }
}

/// Fetcher answering from a fixed table; unknown URLs get a 404
#[derive(Default)]
pub(super) struct TableFetcher {
    responses: HashMap<String, HttpResponse>,
    requested: Mutex<Vec<String>>,
}

impl TableFetcher {
    pub(super) fn with(mut self, url: &str, status: u16, content_type: &str, body: &[u8]) -> Self {
        self.responses.insert(
            url.to_string(),
            HttpResponse {
                status,
                content_type: Some(content_type.to_string()),
                body: body.to_vec(),
            },
        );
        self
    }

    pub(super) fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for TableFetcher {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.requested.lock().unwrap().push(url.to_string());
        Ok(self.responses.get(url).cloned().unwrap_or(HttpResponse {
            status: 404,
            content_type: None,
            body: Vec::new(),
        }))
    }
}
