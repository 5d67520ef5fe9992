use crate::browser::PageDriver;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

pub(crate) const THUMB_CLASS: &str = "thumb";
pub(crate) const MODAL_CLASS: &str = "modal";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FakeElement {
    Thumb(usize),
    Modal(usize),
}

/// Detail panel state; a click only shows up after `lag` panel queries
#[derive(Default)]
struct Panel {
    shown: Option<usize>,
    pending: Option<usize>,
    remaining: usize,
}

/// Page whose detail view shows a larger image once a thumbnail is clicked
pub(crate) struct RevealPage {
    thumbs: Vec<(Option<String>, String)>,
    larger: HashMap<usize, Vec<String>>,
    lag: usize,
    panel: Mutex<Panel>,
    panel_queries: AtomicUsize,
}

impl RevealPage {
    pub(crate) fn new() -> Self {
        Self {
            thumbs: Vec::new(),
            larger: HashMap::new(),
            lag: 0,
            panel: Mutex::new(Panel::default()),
            panel_queries: AtomicUsize::new(0),
        }
    }

    /// Keep showing the previously opened result for `polls` queries after each click
    pub(crate) fn lagging(mut self, polls: usize) -> Self {
        self.lag = polls;
        self
    }

    pub(crate) fn panel_queries(&self) -> usize {
        self.panel_queries.load(Ordering::SeqCst)
    }

    /// Add a thumbnail and the larger sources its detail view reveals
    pub(crate) fn thumb(mut self, src: Option<&str>, alt: &str, larger: &[&str]) -> Self {
        let index = self.thumbs.len();
        self.thumbs.push((src.map(str::to_string), alt.to_string()));
        self.larger
            .insert(index, larger.iter().map(|s| s.to_string()).collect());
        self
    }
}

#[async_trait]
impl PageDriver for RevealPage {
    type Element = FakeElement;

    async fn goto(&self, _url: &str) -> Result<()> {
        Ok(())
    }

    async fn maximize(&self) -> Result<()> {
        Ok(())
    }

    async fn is_loaded(&self) -> Result<bool> {
        Ok(true)
    }

    async fn scroll_to_bottom(&self) -> Result<()> {
        Ok(())
    }

    async fn find_by_class(&self, class_name: &str) -> Result<Vec<FakeElement>> {
        match class_name {
            THUMB_CLASS => Ok((0..self.thumbs.len()).map(FakeElement::Thumb).collect()),
            MODAL_CLASS => {
                self.panel_queries.fetch_add(1, Ordering::SeqCst);
                let mut panel = self.panel.lock().unwrap();
                if panel.pending.is_some() {
                    if panel.remaining == 0 {
                        panel.shown = panel.pending.take();
                    } else {
                        panel.remaining -= 1;
                    }
                }
                Ok(panel
                    .shown
                    .and_then(|i| self.larger.get(&i))
                    .map(|sources| (0..sources.len()).map(FakeElement::Modal).collect())
                    .unwrap_or_default())
            }
            _ => Ok(Vec::new()),
        }
    }

    async fn attribute(&self, element: &FakeElement, name: &str) -> Result<Option<String>> {
        let value = match (element, name) {
            (FakeElement::Thumb(i), "src") => self.thumbs[*i].0.clone(),
            (FakeElement::Thumb(i), "alt") => Some(self.thumbs[*i].1.clone()),
            (FakeElement::Modal(j), "src") => {
                let shown = self.panel.lock().unwrap().shown.unwrap_or_default();
                self.larger.get(&shown).and_then(|s| s.get(*j).cloned())
            }
            (FakeElement::Modal(_), "alt") => Some("larger".to_string()),
            _ => None,
        };
        Ok(value)
    }

    async fn click(&self, element: &FakeElement) -> Result<()> {
        if let FakeElement::Thumb(i) = element {
            let mut panel = self.panel.lock().unwrap();
            panel.pending = Some(*i);
            panel.remaining = self.lag;
        }
        Ok(())
    }
}
