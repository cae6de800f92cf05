//! Selection and edit-session state machine.

use photodb_core::{Catalog, EditTicket, InvalidDate, Item, ItemTemplate, UploadBatch};
use photodb_storage::Slot;

use crate::store::CatalogStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Empty,
    Viewing {
        selected: u32,
    },
    Editing {
        selected: u32,
        scratch: Item,
        ticket: EditTicket,
    },
}

/// Why a transition was refused. The state is unchanged whenever one is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    NotViewing,
    NotEditing,
    NothingSelected,
    UnknownItem(u32),
    StaleBatch(EditTicket),
    InvalidDate(InvalidDate),
    CatalogFull,
}

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejected::NotViewing => f.write_str("not allowed while editing"),
            Rejected::NotEditing => f.write_str("only allowed while editing"),
            Rejected::NothingSelected => f.write_str("no item selected"),
            Rejected::UnknownItem(id) => write!(f, "no item with id {id}"),
            Rejected::StaleBatch(ticket) => write!(f, "upload for {ticket} arrived after the edit ended"),
            Rejected::InvalidDate(err) => write!(f, "{err}"),
            Rejected::CatalogFull => f.write_str("no item ids or numbers left"),
        }
    }
}

impl std::error::Error for Rejected {}

#[derive(Debug, Clone)]
pub struct Controller {
    mode: Mode,
    image_index: usize,
    last_ticket: EditTicket,
}

impl Controller {
    /// Starts viewing the first item, or empty when there is none.
    pub fn new(catalog: &Catalog) -> Self {
        let mode = match catalog.first() {
            Some(item) => Mode::Viewing { selected: item.id },
            None => Mode::Empty,
        };
        Self {
            mode,
            image_index: 0,
            last_ticket: EditTicket(0),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing { .. })
    }

    pub fn selected_id(&self) -> Option<u32> {
        match self.mode {
            Mode::Empty => None,
            Mode::Viewing { selected } | Mode::Editing { selected, .. } => Some(selected),
        }
    }

    pub fn scratch(&self) -> Option<&Item> {
        match &self.mode {
            Mode::Editing { scratch, .. } => Some(scratch),
            _ => None,
        }
    }

    pub fn edit_ticket(&self) -> Option<EditTicket> {
        match self.mode {
            Mode::Editing { ticket, .. } => Some(ticket),
            _ => None,
        }
    }

    pub fn image_index(&self) -> usize {
        self.image_index
    }

    /// The scratch copy while editing, otherwise the selected stored item.
    pub fn displayed_item<'a>(&'a self, catalog: &'a Catalog) -> Option<&'a Item> {
        match &self.mode {
            Mode::Empty => None,
            Mode::Viewing { selected } => catalog.get(*selected),
            Mode::Editing { scratch, .. } => Some(scratch),
        }
    }

    pub fn active_images<'a>(&'a self, catalog: &'a Catalog) -> &'a [String] {
        self.displayed_item(catalog)
            .map(|item| item.images.as_slice())
            .unwrap_or(&[])
    }

    pub fn current_image<'a>(&'a self, catalog: &'a Catalog) -> Option<&'a str> {
        self.active_images(catalog)
            .get(self.image_index)
            .map(String::as_str)
    }

    pub fn select(&mut self, catalog: &Catalog, id: u32) -> Result<(), Rejected> {
        if self.is_editing() {
            return Err(Rejected::NotViewing);
        }
        if !catalog.contains(id) {
            return Err(Rejected::UnknownItem(id));
        }
        self.mode = Mode::Viewing { selected: id };
        self.image_index = 0;
        Ok(())
    }

    pub fn begin_edit(&mut self, catalog: &Catalog) -> Result<EditTicket, Rejected> {
        let selected = match self.mode {
            Mode::Viewing { selected } => selected,
            Mode::Editing { .. } => return Err(Rejected::NotViewing),
            Mode::Empty => return Err(Rejected::NothingSelected),
        };
        let scratch = catalog
            .get(selected)
            .cloned()
            .ok_or(Rejected::UnknownItem(selected))?;
        let ticket = self.last_ticket.next();
        self.last_ticket = ticket;
        self.mode = Mode::Editing {
            selected,
            scratch,
            ticket,
        };
        self.image_index = 0;
        tracing::debug!(id = selected, %ticket, "edit started");
        Ok(ticket)
    }

    /// Drops the scratch copy; the store is not touched.
    pub fn cancel_edit(&mut self) -> Result<(), Rejected> {
        let Mode::Editing {
            selected, ticket, ..
        } = self.mode
        else {
            return Err(Rejected::NotEditing);
        };
        self.mode = Mode::Viewing { selected };
        self.image_index = 0;
        tracing::debug!(id = selected, %ticket, "edit cancelled");
        Ok(())
    }

    /// Writes the scratch copy back and views the saved item. Returns whether
    /// the store had a matching item to replace.
    pub fn save<S: Slot>(&mut self, store: &mut CatalogStore<S>) -> Result<bool, Rejected> {
        let scratch = match &self.mode {
            Mode::Editing { scratch, .. } => scratch.clone(),
            _ => return Err(Rejected::NotEditing),
        };
        let id = scratch.id;
        let applied = store.update(scratch);
        if applied {
            self.mode = Mode::Viewing { selected: id };
        } else {
            self.reselect_first(store.catalog());
        }
        self.image_index = 0;
        Ok(applied)
    }

    /// Removes `id` and always leaves edit mode, even when another item was
    /// being edited. Returns whether anything was removed.
    pub fn delete<S: Slot>(&mut self, store: &mut CatalogStore<S>, id: u32) -> Result<bool, Rejected> {
        let selected = self.selected_id().ok_or(Rejected::NothingSelected)?;
        let removed = store.remove(id);

        if selected == id || !store.catalog().contains(selected) {
            self.reselect_first(store.catalog());
            self.image_index = 0;
        } else {
            self.mode = Mode::Viewing { selected };
            self.clamp_image_index(store.catalog());
        }
        Ok(removed)
    }

    /// Creates an item from `template` and selects it.
    pub fn add<S: Slot>(
        &mut self,
        store: &mut CatalogStore<S>,
        template: ItemTemplate,
    ) -> Result<Item, Rejected> {
        if self.is_editing() {
            return Err(Rejected::NotViewing);
        }
        let item = store.add(template).ok_or(Rejected::CatalogFull)?;
        self.mode = Mode::Viewing { selected: item.id };
        self.image_index = 0;
        Ok(item)
    }

    pub fn next_image(&mut self, catalog: &Catalog) {
        let len = self.active_images(catalog).len();
        if len == 0 {
            return;
        }
        self.image_index = (self.image_index + 1) % len;
    }

    pub fn prev_image(&mut self, catalog: &Catalog) {
        let len = self.active_images(catalog).len();
        if len == 0 {
            return;
        }
        self.image_index = if self.image_index == 0 {
            len - 1
        } else {
            (self.image_index - 1).min(len - 1)
        };
    }

    /// Jumps to a thumbnail. Out-of-range indices are ignored.
    pub fn show_image(&mut self, catalog: &Catalog, index: usize) -> bool {
        if index >= self.active_images(catalog).len() {
            return false;
        }
        self.image_index = index;
        true
    }

    /// Appends an upload batch to the scratch images. Batches requested by an
    /// edit session that has since ended are refused.
    pub fn add_images(&mut self, batch: UploadBatch) -> Result<usize, Rejected> {
        match &mut self.mode {
            Mode::Editing {
                scratch, ticket, ..
            } if *ticket == batch.ticket => {
                let added = batch.images.len();
                scratch.images.extend(batch.images);
                Ok(added)
            }
            _ => Err(Rejected::StaleBatch(batch.ticket)),
        }
    }

    /// Removes one scratch image. Returns `false` for an out-of-range index.
    pub fn remove_image(&mut self, index: usize) -> Result<bool, Rejected> {
        let Mode::Editing { scratch, .. } = &mut self.mode else {
            return Err(Rejected::NotEditing);
        };
        if index >= scratch.images.len() {
            return Ok(false);
        }
        scratch.images.remove(index);
        let len = scratch.images.len();
        self.image_index = self.image_index.min(len.saturating_sub(1));
        Ok(true)
    }

    pub fn set_item_number(&mut self, input: &str) -> Result<u32, Rejected> {
        let scratch = self.scratch_mut()?;
        scratch.item_number = photodb_core::parse_item_number(input);
        Ok(scratch.item_number)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> Result<(), Rejected> {
        self.scratch_mut()?.description = description.into();
        Ok(())
    }

    pub fn set_date_created(&mut self, input: &str) -> Result<(), Rejected> {
        let scratch = self.scratch_mut()?;
        scratch.date_created = photodb_core::parse_date(input).map_err(Rejected::InvalidDate)?;
        Ok(())
    }

    fn scratch_mut(&mut self) -> Result<&mut Item, Rejected> {
        match &mut self.mode {
            Mode::Editing { scratch, .. } => Ok(scratch),
            _ => Err(Rejected::NotEditing),
        }
    }

    fn reselect_first(&mut self, catalog: &Catalog) {
        self.mode = match catalog.first() {
            Some(item) => Mode::Viewing { selected: item.id },
            None => Mode::Empty,
        };
    }

    fn clamp_image_index(&mut self, catalog: &Catalog) {
        let len = self.active_images(catalog).len();
        self.image_index = self.image_index.min(len.saturating_sub(1));
    }
}
