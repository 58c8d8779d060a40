//! The last known good list of cards.
//!
//! Backed by a `tokio::sync::watch` channel holding an `Arc<[CardData]>`, so a
//! replace is a single pointer swap: readers hold either the old list or the
//! new one, never a mix.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::cards::CardData;

/// Ordered, immutable snapshot of the display list.
pub type DisplayList = Arc<[CardData]>;

#[derive(Debug, Clone)]
pub struct DisplayListStore {
    tx: Arc<watch::Sender<DisplayList>>,
}

impl DisplayListStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(DisplayList::from(Vec::new()));
        Self { tx: Arc::new(tx) }
    }

    /// Swap in a new list wholesale. Subscribers are notified.
    pub fn replace(&self, items: Vec<CardData>) {
        let count = items.len();
        self.tx.send_replace(DisplayList::from(items));
        debug!(event = "core.store.replaced", count = count);
    }

    /// Read-only snapshot of the current list. Empty before first population.
    pub fn current(&self) -> DisplayList {
        Arc::clone(&self.tx.borrow())
    }

    /// Receiver that observes every replace. The current list is marked seen.
    pub fn subscribe(&self) -> watch::Receiver<DisplayList> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }
}

impl Default for DisplayListStore {
    fn default() -> Self {
        Self::new()
    }
}
