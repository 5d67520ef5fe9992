use super::{ElementSet, PageDriver};
use crate::config::HarvestConfig;
use crate::error::{Result, ScrapeError};
use crate::utils;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of a locator query
#[derive(Debug)]
pub enum Located<E> {
    Found(ElementSet<E>),
    /// The query matched nothing; not an error
    NoElementsFound,
}

/// Bounded polling budget for "wait, then proceed" steps
pub(crate) struct Deadline {
    end: Instant,
    poll: Duration,
}

impl Deadline {
    pub(crate) fn new(timeout: Duration, poll: Duration) -> Self {
        Self {
            end: Instant::now() + timeout,
            poll,
        }
    }

    /// Sleep until the next check; returns false once the deadline has passed
    pub(crate) async fn tick(&self) -> bool {
        let now = Instant::now();
        if now >= self.end {
            return false;
        }
        tokio::time::sleep(self.poll.min(self.end - now)).await;
        true
    }
}

/// Navigate to the results page and wait for it to settle
pub async fn load_page<D: PageDriver>(driver: &D, url: &str, config: &HarvestConfig) -> Result<()> {
    if !utils::is_valid_url(url) {
        return Err(ScrapeError::InvalidInput(format!(
            "'{}' is not a valid page URL",
            url
        )));
    }

    ::log::info!("Loading page: {}", url);
    driver.goto(url).await?;
    driver.maximize().await?;

    let deadline = Deadline::new(config.settle_timeout(), config.poll_interval());
    loop {
        if driver.is_loaded().await? {
            ::log::debug!("Page reported ready: {}", url);
            break;
        }
        if !deadline.tick().await {
            ::log::warn!("Page did not report ready in time, continuing: {}", url);
            break;
        }
    }
    Ok(())
}

/// Number of scrolls needed to reveal `count` results
pub fn scroll_times(count: usize, results_per_screen: usize) -> usize {
    count.div_ceil(results_per_screen.max(1)).max(1)
}

/// Scroll repeatedly so lazy-loaded results exist for the requested count
pub async fn scroll<D: PageDriver>(
    driver: &D,
    count: usize,
    class_name: &str,
    config: &HarvestConfig,
) -> Result<()> {
    let times = scroll_times(count, config.results_per_screen);
    ::log::info!("Scrolling page {} time(s), please wait...", times);

    for i in 0..times {
        let before = driver.find_by_class(class_name).await?.len();
        driver.scroll_to_bottom().await?;

        // Wait until new results appear and their number stops changing
        let deadline = Deadline::new(config.scroll_pause(), config.poll_interval());
        let mut last = before;
        while deadline.tick().await {
            let current = driver.find_by_class(class_name).await?.len();
            if current != before && current == last {
                break;
            }
            last = current;
        }
        ::log::debug!("Scroll {}/{}: {} -> {} results", i + 1, times, before, last);
    }

    ::log::info!("Page ready...");
    Ok(())
}

/// Query the page for elements with the given class name
pub async fn locate<D: PageDriver>(driver: &D, class_name: &str) -> Result<Located<D::Element>> {
    let elements = driver.find_by_class(class_name).await?;
    if elements.is_empty() {
        return Ok(Located::NoElementsFound);
    }
    ::log::debug!("Located {} elements with class {}", elements.len(), class_name);
    Ok(Located::Found(ElementSet::new(class_name, elements)))
}
