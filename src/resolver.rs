use crate::browser::PageDriver;
use crate::browser::page::Deadline;
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::utils;
use std::collections::BTreeSet;

/// Which element supplies the final image for a candidate
#[derive(Debug)]
pub enum Resolution<E> {
    /// Keep the grid thumbnail
    Thumbnail,
    /// The single larger image revealed by the detail view
    Larger(E),
}

/// Open a thumbnail's detail view and pick its larger image
///
/// The detail panel stays open between clicks, so the sources it shows before
/// the click are recorded and the wait only ends once they change. Falls back
/// to the thumbnail when the panel shows no larger image, several plausible
/// ones, or never moves off the previous result. Only browser failures are
/// errors.
pub async fn resolve_larger<D: PageDriver>(
    driver: &D,
    thumbnail: &D::Element,
    modal_class: &str,
    config: &HarvestConfig,
) -> Result<Resolution<D::Element>> {
    let previous = source_set(&with_absolute_src(driver, modal_class).await?);
    driver.click(thumbnail).await?;

    let deadline = Deadline::new(config.detail_timeout(), config.poll_interval());
    let (mut candidates, updated) = loop {
        let found = with_absolute_src(driver, modal_class).await?;
        let updated = !found.is_empty() && source_set(&found) != previous;
        if updated || !deadline.tick().await {
            break (found, updated);
        }
    };

    if !updated && !candidates.is_empty() {
        ::log::info!("Detail view still shows the previous result, using thumbnail");
        return Ok(Resolution::Thumbnail);
    }

    match candidates.len() {
        0 => {
            ::log::info!("This element does not have a higher quality image, using thumbnail");
            Ok(Resolution::Thumbnail)
        }
        1 => Ok(Resolution::Larger(candidates.remove(0).0)),
        n => {
            ::log::info!("Found {} possible larger images, using thumbnail", n);
            Ok(Resolution::Thumbnail)
        }
    }
}

/// Elements of `class_name` whose `src` is an absolute URL with a host
async fn with_absolute_src<D: PageDriver>(
    driver: &D,
    class_name: &str,
) -> Result<Vec<(D::Element, String)>> {
    let elements = driver.find_by_class(class_name).await?;
    let mut kept = Vec::with_capacity(elements.len());
    for element in elements {
        if let Some(src) = driver.attribute(&element, "src").await? {
            if utils::is_valid_url(&src) {
                kept.push((element, src));
            }
        }
    }
    Ok(kept)
}

fn source_set<E>(found: &[(E, String)]) -> BTreeSet<String> {
    found.iter().map(|(_, src)| src.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::SnapshotPage;

    fn fast_config() -> HarvestConfig {
        HarvestConfig {
            detail_timeout_ms: 0,
            poll_interval_ms: 0,
            ..HarvestConfig::default()
        }
    }

    async fn resolve(html: &str) -> (SnapshotPage, Resolution<crate::browser::snapshot::SnapshotElement>) {
        let page = SnapshotPage::from_html(html);
        let thumbs = page.find_by_class("thumb").await.unwrap();
        let resolution = resolve_larger(&page, &thumbs[0], "big", &fast_config())
            .await
            .unwrap();
        (page, resolution)
    }

    #[tokio::test]
    async fn test_unchanged_panel_falls_back() {
        // A saved page shows the same detail image before and after the click
        let (page, resolution) = resolve(
            r#"<img class="thumb" src="data:image/jpeg;base64,AAAA">
               <img class="big" src="data:image/jpeg;base64,BBBB">
               <img class="big" src="https://cdn.example.com/full.jpg" alt="full">"#,
        )
        .await;
        assert_eq!(page.clicks(), 1);
        assert!(matches!(resolution, Resolution::Thumbnail));
    }

    #[tokio::test]
    async fn test_no_larger_image_falls_back() {
        let (page, resolution) = resolve(r#"<img class="thumb" src="https://a.com/t.jpg">"#).await;
        assert_eq!(page.clicks(), 1);
        assert!(matches!(resolution, Resolution::Thumbnail));
    }

    #[tokio::test]
    async fn test_ambiguous_larger_images_fall_back() {
        let (_, resolution) = resolve(
            r#"<img class="thumb" src="https://a.com/t.jpg">
               <img class="big" src="https://a.com/1.jpg">
               <img class="big" src="https://a.com/2.jpg">"#,
        )
        .await;
        assert!(matches!(resolution, Resolution::Thumbnail));
    }

    #[tokio::test]
    async fn test_only_invalid_sources_fall_back() {
        let (_, resolution) = resolve(
            r#"<img class="thumb" src="https://a.com/t.jpg">
               <img class="big" src="/relative.jpg">
               <img class="big">"#,
        )
        .await;
        assert!(matches!(resolution, Resolution::Thumbnail));
    }
}
