//! Catalog store: the in-memory collection mirrored into one persistent slot.

use anyhow::Context as _;
use photodb_core::{Catalog, Item, ItemTemplate, sample_items};
use photodb_storage::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Persisted,
    Samples,
}

#[derive(Debug)]
pub struct CatalogStore<S> {
    slot: S,
    catalog: Catalog,
    source: LoadSource,
    last_persist_error: Option<String>,
}

impl<S: Slot> CatalogStore<S> {
    /// Hydrates from the slot. A missing, unreadable or unparsable payload
    /// yields the sample set; none of these are reported to the caller.
    pub fn load(slot: S) -> Self {
        let (items, source) = match slot.read() {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str::<Vec<Item>>(&raw) {
                Ok(items) => (items, LoadSource::Persisted),
                Err(err) => {
                    tracing::warn!(error = %err, "persisted catalog is unparsable; using samples");
                    (sample_items(), LoadSource::Samples)
                }
            },
            Ok(_) => {
                tracing::info!("no persisted catalog; using samples");
                (sample_items(), LoadSource::Samples)
            }
            Err(err) => {
                tracing::warn!(error = %format!("{err:#}"), "catalog read failed; using samples");
                (sample_items(), LoadSource::Samples)
            }
        };

        let (catalog, dropped) = Catalog::from_items(items);
        if dropped > 0 {
            tracing::warn!(dropped, "dropped items with duplicate ids");
        }
        tracing::debug!(items = catalog.len(), ?source, "catalog loaded");

        Self {
            slot,
            catalog,
            source,
            last_persist_error: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn items(&self) -> &[Item] {
        self.catalog.items()
    }

    pub fn get(&self, id: u32) -> Option<&Item> {
        self.catalog.get(id)
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    pub fn into_slot(self) -> S {
        self.slot
    }

    /// Error text of the most recent failed write, cleared by the next
    /// successful one.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Serializes the whole collection into the slot.
    pub fn persist(&mut self) -> anyhow::Result<()> {
        let result = serde_json::to_string(self.catalog.items())
            .context("serialize catalog")
            .and_then(|json| self.slot.write(&json));
        match &result {
            Ok(()) => self.last_persist_error = None,
            Err(err) => {
                let msg = format!("{err:#}");
                tracing::warn!(error = %msg, "catalog write failed; keeping in-memory state");
                self.last_persist_error = Some(msg);
            }
        }
        result
    }

    fn persist_best_effort(&mut self) {
        let _ = self.persist();
    }

    /// Returns `None` when the id or item-number space is used up; nothing is
    /// written then.
    pub fn add(&mut self, template: ItemTemplate) -> Option<Item> {
        let Some(item) = self.catalog.add(template).cloned() else {
            tracing::warn!("add refused: no id or item number left");
            return None;
        };
        tracing::info!(id = item.id, item_number = item.item_number, "item added");
        self.persist_best_effort();
        Some(item)
    }

    /// Returns `false` when no item has `edited.id`; nothing is written then.
    pub fn update(&mut self, edited: Item) -> bool {
        let id = edited.id;
        if !self.catalog.update(edited) {
            tracing::debug!(id, "update skipped: no such item");
            return false;
        }
        tracing::info!(id, "item updated");
        self.persist_best_effort();
        true
    }

    /// Returns `false` when no item has `id`; nothing is written then.
    pub fn remove(&mut self, id: u32) -> bool {
        if self.catalog.remove(id).is_none() {
            tracing::debug!(id, "remove skipped: no such item");
            return false;
        }
        tracing::info!(id, "item removed");
        self.persist_best_effort();
        true
    }
}
