use super::PageDriver;
use crate::error::{Result, ScrapeError};
use crate::utils;
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Attributes of an element captured from a saved page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotElement {
    attrs: HashMap<String, String>,
}

/// A results page saved to HTML, served through [`PageDriver`]
///
/// Scrolling and clicking are recorded but do not change the document, so a
/// detail view is only found if the saved markup already contains it.
#[derive(Debug)]
pub struct SnapshotPage {
    html: String,
    visited: Mutex<Option<String>>,
    scrolls: AtomicUsize,
    clicks: AtomicUsize,
}

impl SnapshotPage {
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            visited: Mutex::new(None),
            scrolls: AtomicUsize::new(0),
            clicks: AtomicUsize::new(0),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_html(std::fs::read_to_string(path)?))
    }

    /// Last URL passed to `goto`
    pub fn visited(&self) -> Option<String> {
        self.visited.lock().ok().and_then(|v| v.clone())
    }

    pub fn scrolls(&self) -> usize {
        self.scrolls.load(Ordering::SeqCst)
    }

    pub fn clicks(&self) -> usize {
        self.clicks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageDriver for SnapshotPage {
    type Element = SnapshotElement;

    async fn goto(&self, url: &str) -> Result<()> {
        if let Ok(mut visited) = self.visited.lock() {
            *visited = Some(url.to_string());
        }
        Ok(())
    }

    async fn maximize(&self) -> Result<()> {
        Ok(())
    }

    async fn is_loaded(&self) -> Result<bool> {
        Ok(true)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        self.scrolls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_class(&self, class_name: &str) -> Result<Vec<SnapshotElement>> {
        let css = utils::class_selector(class_name);
        let selector = Selector::parse(&css).map_err(|e| {
            ScrapeError::InvalidInput(format!("invalid class name '{}': {}", class_name, e))
        })?;

        let doc = Html::parse_document(&self.html);
        let elements = doc
            .select(&selector)
            .map(|e| SnapshotElement {
                attrs: e
                    .value()
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            })
            .collect::<Vec<_>>();

        ::log::trace!("Snapshot matched {} elements for {}", elements.len(), css);
        Ok(elements)
    }

    async fn attribute(&self, element: &SnapshotElement, name: &str) -> Result<Option<String>> {
        Ok(element.attrs.get(name).cloned())
    }

    async fn click(&self, _element: &SnapshotElement) -> Result<()> {
        self.clicks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_attributes_in_document_order() {
        let page = SnapshotPage::from_html(
            r#"<div><img class="t" src="a.png" alt="first"><img class="t" alt="second"></div>"#,
        );
        let elements = page.find_by_class("t").await.unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(
            page.attribute(&elements[0], "alt").await.unwrap().as_deref(),
            Some("first")
        );
        assert_eq!(page.attribute(&elements[1], "src").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_class_name() {
        let page = SnapshotPage::from_html("<p></p>");
        let err = page.find_by_class("1[").await.unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidInput(_)));
    }
}
