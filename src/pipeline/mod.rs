use crate::browser::{ElementSet, ImageCandidate, Located, PageDriver, load_page, locate, scroll};
use crate::classify::{ClassifiedSource, classify};
use crate::config::{HarvestConfig, QualityTier, SearchSession};
use crate::error::Result;
use crate::fetch::{self, ImageFetcher};
use crate::resize;
use crate::resolver::{self, Resolution};
use crate::results::{HarvestReport, PersistedImage};
use crate::sink::ImageSink;

#[cfg(test)]
mod tests;

/// Number of persisted images, bounded by the requested count
#[derive(Debug, Clone, Copy)]
pub struct ProgressCounter {
    count: usize,
    limit: usize,
}

impl ProgressCounter {
    pub fn new(limit: usize) -> Self {
        Self { count: 0, limit }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_done(&self) -> bool {
        self.count >= self.limit
    }

    /// Record one persisted image; has no effect once the limit is reached
    pub fn increment(&mut self) {
        if !self.is_done() {
            self.count += 1;
        }
    }

    pub fn percent(&self) -> usize {
        if self.limit == 0 {
            return 100;
        }
        ((self.count as f64 / self.limit as f64) * 100.0).round() as usize
    }
}

/// Result of processing one candidate
#[derive(Debug)]
enum Outcome {
    Written(PersistedImage),
    Skipped,
}

/// Runs a session against a page, one candidate at a time
pub struct Pipeline<'a, D: PageDriver, F: ImageFetcher + ?Sized> {
    driver: &'a D,
    fetcher: &'a F,
    sink: &'a ImageSink,
    config: &'a HarvestConfig,
}

impl<'a, D: PageDriver, F: ImageFetcher + ?Sized> Pipeline<'a, D, F> {
    pub fn new(driver: &'a D, fetcher: &'a F, sink: &'a ImageSink, config: &'a HarvestConfig) -> Self {
        Self {
            driver,
            fetcher,
            sink,
            config,
        }
    }

    /// Load the results page, reveal lazy results and persist up to `count` images
    pub async fn run(&self, session: &SearchSession) -> Result<HarvestReport> {
        load_page(self.driver, session.url(), self.config).await?;
        scroll(
            self.driver,
            session.count(),
            session.thumbnail_class(),
            self.config,
        )
        .await?;

        match locate(self.driver, session.thumbnail_class()).await? {
            Located::Found(elements) => self.process_elements(session, &elements).await,
            Located::NoElementsFound => {
                ::log::info!(
                    "Elements with class name {} not found. Exiting...",
                    session.thumbnail_class()
                );
                Ok(HarvestReport::new(session.count()))
            }
        }
    }

    /// Persist images from located elements until the count is reached or elements run out
    pub async fn process_elements(
        &self,
        session: &SearchSession,
        elements: &ElementSet<D::Element>,
    ) -> Result<HarvestReport> {
        ::log::info!(
            "Starting process with {} images of class {}.",
            elements.len(),
            elements.class_name()
        );
        if session.quality() == QualityTier::Standard {
            ::log::info!("Standard quality images will take longer to fetch...");
        }

        let mut report = HarvestReport::new(session.count());
        let mut counter = ProgressCounter::new(session.count());

        for index in 0..elements.len() {
            ::log::info!(
                "Image count: {}, {}% completed",
                counter.count(),
                counter.percent()
            );
            if counter.is_done() {
                break;
            }
            let Some(element) = elements.get(index) else {
                break;
            };

            report.candidates += 1;
            match self.process(session, element, index).await? {
                Outcome::Written(image) => {
                    counter.increment();
                    report.written.push(image);
                }
                Outcome::Skipped => report.skipped += 1,
            }
        }

        if counter.is_done() {
            ::log::info!("Image count: {}, 100% completed", counter.count());
        } else {
            ::log::warn!(
                "Ran out of results after {} of {} requested images",
                counter.count(),
                session.count()
            );
        }
        Ok(report)
    }

    async fn process(
        &self,
        session: &SearchSession,
        thumbnail: &D::Element,
        index: usize,
    ) -> Result<Outcome> {
        let resolution = match session.modal_class() {
            Some(modal_class) if session.quality() == QualityTier::Standard => {
                resolver::resolve_larger(self.driver, thumbnail, modal_class, self.config).await?
            }
            _ => Resolution::Thumbnail,
        };
        let element = match &resolution {
            Resolution::Thumbnail => thumbnail,
            Resolution::Larger(larger) => larger,
        };

        let candidate = ImageCandidate::read(self.driver, element, index).await?;
        let source = classify(candidate.src.as_deref());
        ::log::debug!("Candidate {} has a {} source", candidate.index, source.kind());
        let mut image = match source {
            ClassifiedSource::Empty => {
                ::log::info!("Empty src attribute on result {}, skipping.", candidate.index);
                return Ok(Outcome::Skipped);
            }
            ClassifiedSource::Indeterminate => {
                ::log::info!(
                    "Unsupported inline image encoding on result {}, skipping.",
                    candidate.index
                );
                return Ok(Outcome::Skipped);
            }
            ClassifiedSource::InlineEncoded { encoding, payload } => {
                ::log::info!("Saving from base 64: {}", candidate.alt);
                fetch::decode_inline(encoding, &payload, &candidate.alt)?
            }
            ClassifiedSource::RemoteUrl(url) => {
                ::log::info!("Downloading: {}", candidate.alt);
                match fetch::fetch_remote(self.fetcher, &url, &candidate.alt).await {
                    Ok(image) => image,
                    Err(e) if e.is_recoverable() => {
                        ::log::warn!(
                            "Skipping result {} due to invalid response from server: {}",
                            candidate.index,
                            e
                        );
                        return Ok(Outcome::Skipped);
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        if session.upscale() {
            ::log::info!("Resizing...");
            resize::upscale(&mut image)?;
        }

        let persisted = self.sink.persist(&image).await?;
        ::log::debug!("Persisted candidate {} as {}", candidate.index, persisted.location);
        Ok(Outcome::Written(persisted))
    }
}
