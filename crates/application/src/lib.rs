//! Application orchestration layer for photodb.

use photodb_core::{Item, Settings};
use photodb_storage::Slot;

pub mod controller;
pub mod store;

pub use controller::{Controller, Mode, Rejected};
pub use store::{CatalogStore, LoadSource};

/// Everything the presentation reads from and drives.
#[derive(Debug)]
pub struct AppContext<S> {
    pub settings: Settings,
    pub store: CatalogStore<S>,
    pub controller: Controller,
    pub status: Option<String>,
}

impl<S: Slot> AppContext<S> {
    pub fn new(settings: Settings, store: CatalogStore<S>) -> Self {
        let controller = Controller::new(store.catalog());
        Self {
            settings,
            store,
            controller,
            status: None,
        }
    }

    /// Adds an item seeded with the configured default image, the placeholder
    /// description and today's date.
    pub fn add_item(&mut self) -> Result<Item, Rejected> {
        let template = self
            .settings
            .new_item_template(photodb_core::today());
        let item = self.controller.add(&mut self.store, template)?;
        self.note_persist_outcome(format!("Added #{}", item.item_number));
        Ok(item)
    }

    pub fn save_edit(&mut self) -> Result<bool, Rejected> {
        let applied = self.controller.save(&mut self.store)?;
        let msg = if applied {
            "Saved".to_string()
        } else {
            "Item no longer exists; edit discarded".to_string()
        };
        self.note_persist_outcome(msg);
        Ok(applied)
    }

    pub fn delete_selected(&mut self) -> Result<bool, Rejected> {
        let id = self
            .controller
            .selected_id()
            .ok_or(Rejected::NothingSelected)?;
        let removed = self.controller.delete(&mut self.store, id)?;
        self.note_persist_outcome(format!("Deleted item {id}"));
        Ok(removed)
    }

    /// Selects the item `offset` rows away from the current one in list order,
    /// clamped to the ends of the list.
    pub fn select_relative(&mut self, offset: isize) -> Result<(), Rejected> {
        let items = self.store.items();
        if items.is_empty() {
            return Err(Rejected::NothingSelected);
        }
        let current = self
            .controller
            .selected_id()
            .and_then(|id| self.store.catalog().position(id))
            .unwrap_or(0);
        let target = current
            .saturating_add_signed(offset)
            .min(items.len() - 1);
        let id = items[target].id;
        self.controller.select(self.store.catalog(), id)
    }

    pub fn selected_position(&self) -> Option<usize> {
        self.controller
            .selected_id()
            .and_then(|id| self.store.catalog().position(id))
    }

    pub fn displayed_item(&self) -> Option<&Item> {
        self.controller.displayed_item(self.store.catalog())
    }

    fn note_persist_outcome(&mut self, done: String) {
        self.status = Some(match self.store.last_persist_error() {
            Some(err) => format!("{done} (not persisted: {err})"),
            None => done,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use photodb_storage::MemorySlot;

    fn context(raw: &str) -> AppContext<MemorySlot> {
        AppContext::new(
            Settings::default(),
            CatalogStore::load(MemorySlot::with_value(raw)),
        )
    }

    #[test]
    fn add_item_uses_settings_and_today() {
        let mut ctx = context("[]");
        ctx.settings.default_image = "https://example.com/seed.png".to_string();
        let item = ctx.add_item().unwrap();
        assert_eq!(item.images, vec!["https://example.com/seed.png".to_string()]);
        assert_eq!(item.description, photodb_core::NEW_ITEM_DESCRIPTION);
        assert_eq!(item.date_created, photodb_core::today());
        assert_eq!(ctx.status.as_deref(), Some("Added #101"));
    }

    #[test]
    fn persist_failure_is_shown_in_status() {
        let slot = MemorySlot {
            fail_writes: true,
            ..MemorySlot::default()
        };
        let mut ctx = AppContext::new(Settings::default(), CatalogStore::load(slot));
        ctx.delete_selected().unwrap();
        let status = ctx.status.clone().unwrap_or_default();
        assert!(status.starts_with("Deleted item 1"));
        assert!(status.contains("not persisted"));
        assert_eq!(ctx.controller.selected_id(), Some(2));
    }

    #[test]
    fn select_relative_clamps_to_list_ends() {
        let mut ctx = context("");
        assert_eq!(ctx.selected_position(), Some(0));
        ctx.select_relative(-1).unwrap();
        assert_eq!(ctx.selected_position(), Some(0));
        ctx.select_relative(5).unwrap();
        assert_eq!(ctx.selected_position(), Some(1));
        assert_eq!(ctx.displayed_item().map(|i| i.id), Some(2));
    }

    #[test]
    fn select_relative_on_empty_catalog_is_refused() {
        let mut ctx = context("[]");
        assert_eq!(ctx.select_relative(1), Err(Rejected::NothingSelected));
        assert_eq!(ctx.controller.mode(), &Mode::Empty);
    }
}
