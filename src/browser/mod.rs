pub mod page;
pub mod snapshot;
pub mod webdriver;

pub use page::{Located, load_page, locate, scroll};
pub use snapshot::SnapshotPage;
pub use webdriver::WebDriverPage;

use crate::error::Result;
use async_trait::async_trait;

/// The operations the harvester needs from a rendered page
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Handle to an element of the current page; invalid once the page changes
    type Element: Send + Sync;

    /// Navigate to a URL
    async fn goto(&self, url: &str) -> Result<()>;

    /// Maximize the browser window
    async fn maximize(&self) -> Result<()>;

    /// Whether the document has finished loading
    async fn is_loaded(&self) -> Result<bool>;

    /// Scroll to the bottom of the page to trigger lazy loading
    async fn scroll_to_bottom(&self) -> Result<()>;

    /// All elements carrying the given class name(s), in document order
    async fn find_by_class(&self, class_name: &str) -> Result<Vec<Self::Element>>;

    /// Read an attribute of an element
    async fn attribute(&self, element: &Self::Element, name: &str) -> Result<Option<String>>;

    /// Simulate a user click on an element
    async fn click(&self, element: &Self::Element) -> Result<()>;
}

/// Elements observed by a single locator pass
#[derive(Debug)]
pub struct ElementSet<E> {
    class_name: String,
    elements: Vec<E>,
}

impl<E> ElementSet<E> {
    pub fn new(class_name: &str, elements: Vec<E>) -> Self {
        Self {
            class_name: class_name.to_string(),
            elements,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.elements.get(index)
    }
}

/// Attributes read from one result element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    /// Position in the [`ElementSet`] this candidate was read from
    pub index: usize,
    pub src: Option<String>,
    pub alt: String,
}

impl ImageCandidate {
    /// Read `src` and `alt` from an element
    pub async fn read<D: PageDriver>(driver: &D, element: &D::Element, index: usize) -> Result<Self> {
        let src = driver.attribute(element, "src").await?;
        let alt = driver.attribute(element, "alt").await?.unwrap_or_default();
        Ok(Self { index, src, alt })
    }
}
