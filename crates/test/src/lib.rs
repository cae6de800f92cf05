//! Test helpers and fixtures.

use std::path::{Path, PathBuf};

use photodb_application::{AppContext, CatalogStore};
use photodb_core::{Item, Settings};
use photodb_storage::MemorySlot;

pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

pub fn make_item(id: u32, item_number: u32) -> Item {
    Item {
        id,
        item_number,
        images: vec![format!("https://example.com/{id}.jpg")],
        description: format!("item {id}"),
        date_created: "2024-03-01".to_string(),
    }
}

/// Slot pre-filled with `items` serialized the way the store writes them.
pub fn memory_slot(items: &[Item]) -> anyhow::Result<MemorySlot> {
    Ok(MemorySlot::with_value(serde_json::to_string(items)?))
}

pub fn memory_context(items: &[Item]) -> anyhow::Result<AppContext<MemorySlot>> {
    let store = CatalogStore::load(memory_slot(items)?);
    Ok(AppContext::new(Settings::default(), store))
}

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use anyhow::Context as _;
    use photodb_application::{LoadSource, Mode, Rejected};
    use photodb_core::{UploadBatch, sample_items};
    use photodb_ingest::IngestWorker;
    use photodb_storage::{Slot as _, Storage};

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn deleting_selected_item_selects_the_next_remaining() -> anyhow::Result<()> {
        let mut ctx = memory_context(&[make_item(1, 101), make_item(2, 102)])?;
        assert_eq!(ctx.controller.selected_id(), Some(1));

        assert!(ctx.delete_selected()?);
        let ids: Vec<u32> = ctx.store.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(ctx.controller.selected_id(), Some(2));

        let persisted: Vec<Item> =
            serde_json::from_str(ctx.store.slot().value.as_deref().unwrap_or_default())?;
        assert_eq!(persisted, vec![make_item(2, 102)]);
        Ok(())
    }

    #[test]
    fn deleting_the_last_item_empties_the_view() -> anyhow::Result<()> {
        let mut ctx = memory_context(&[make_item(4, 140)])?;
        assert!(ctx.delete_selected()?);
        assert_eq!(ctx.controller.mode(), &Mode::Empty);
        assert!(ctx.displayed_item().is_none());
        assert_eq!(ctx.delete_selected(), Err(Rejected::NothingSelected));
        Ok(())
    }

    #[test]
    fn adding_to_empty_catalog_starts_numbering() -> anyhow::Result<()> {
        let mut ctx = memory_context(&[])?;
        assert_eq!(ctx.store.source(), LoadSource::Persisted);
        assert_eq!(ctx.controller.mode(), &Mode::Empty);

        let item = ctx.add_item()?;
        assert_eq!((item.id, item.item_number), (1, 101));
        assert_eq!(ctx.controller.selected_id(), Some(1));
        assert_eq!(ctx.store.slot().writes, 1);
        Ok(())
    }

    #[test]
    fn upload_keeps_only_images_in_pick_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let first = write_file(dir.path(), "one.png", PNG_BYTES)?;
        let second = write_file(dir.path(), "two.txt", b"shopping list")?;
        let third = write_file(dir.path(), "three.jpg", JPEG_BYTES)?;

        let mut ctx = memory_context(&[make_item(1, 101)])?;
        let ticket = ctx.controller.begin_edit(ctx.store.catalog())?;

        let mut worker = IngestWorker::spawn()?;
        worker.submit(ticket, vec![first, second, third])?;
        let batch = worker.recv_timeout(WAIT).context("batch not delivered")?;
        assert_eq!(ctx.controller.add_images(batch)?, 2);

        let scratch = ctx.controller.scratch().context("edit session")?;
        assert_eq!(scratch.images.len(), 3);
        assert!(scratch.images[1].starts_with("data:image/png;base64,"));
        assert!(scratch.images[2].starts_with("data:image/jpeg;base64,"));

        assert!(ctx.save_edit()?);
        assert_eq!(ctx.store.get(1).map(|i| i.images.len()), Some(3));
        Ok(())
    }

    #[test]
    fn batch_arriving_after_cancel_changes_nothing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let png = write_file(dir.path(), "late.png", PNG_BYTES)?;

        let mut ctx = memory_context(&[make_item(1, 101)])?;
        let ticket = ctx.controller.begin_edit(ctx.store.catalog())?;
        let mut worker = IngestWorker::spawn()?;
        worker.submit(ticket, vec![png])?;
        ctx.controller.cancel_edit()?;

        let batch = worker.recv_timeout(WAIT).context("batch not delivered")?;
        let before_mode = ctx.controller.mode().clone();
        let before_items = ctx.store.items().to_vec();
        assert_eq!(
            ctx.controller.add_images(batch),
            Err(Rejected::StaleBatch(ticket))
        );
        assert_eq!(ctx.controller.mode(), &before_mode);
        assert_eq!(ctx.store.items(), before_items.as_slice());
        assert_eq!(ctx.store.slot().writes, 0);
        Ok(())
    }

    #[test]
    fn batch_from_an_earlier_session_is_refused() -> anyhow::Result<()> {
        let mut ctx = memory_context(&[make_item(1, 101)])?;
        let first = ctx.controller.begin_edit(ctx.store.catalog())?;
        ctx.controller.cancel_edit()?;
        ctx.controller.begin_edit(ctx.store.catalog())?;

        let stale = UploadBatch {
            ticket: first,
            images: vec!["data:image/png;base64,AAAA".to_string()],
        };
        assert!(ctx.controller.add_images(stale).is_err());
        assert_eq!(
            ctx.controller.scratch().map(|i| i.images.len()),
            Some(1)
        );
        Ok(())
    }

    #[test]
    fn removing_shown_last_image_clamps_index() -> anyhow::Result<()> {
        let mut item = make_item(1, 101);
        item.images.push("https://example.com/extra.jpg".to_string());
        let mut ctx = memory_context(&[item])?;
        ctx.controller.begin_edit(ctx.store.catalog())?;
        assert!(ctx.controller.show_image(ctx.store.catalog(), 1));

        assert!(ctx.controller.remove_image(1)?);
        assert_eq!(ctx.controller.image_index(), 0);
        assert!(ctx.controller.remove_image(0)?);
        assert_eq!(ctx.controller.image_index(), 0);
        assert!(ctx.controller.current_image(ctx.store.catalog()).is_none());
        Ok(())
    }

    #[test]
    fn catalog_survives_database_reopen() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("photodb.db");
        let settings = Settings::default();

        {
            let slot = Storage::open(&db_path)?.into_slot(settings.storage_key.clone());
            let mut ctx = AppContext::new(settings.clone(), CatalogStore::load(slot));
            assert_eq!(ctx.store.source(), LoadSource::Samples);
            ctx.add_item()?;
            ctx.delete_selected()?;
            assert!(ctx.store.last_persist_error().is_none());
        }

        let slot = Storage::open(&db_path)?.into_slot(settings.storage_key.clone());
        let store = CatalogStore::load(slot);
        assert_eq!(store.source(), LoadSource::Persisted);
        assert_eq!(store.items(), sample_items().as_slice());
        Ok(())
    }

    #[test]
    fn corrupt_slot_loads_samples() -> anyhow::Result<()> {
        let storage = Storage::open_in_memory()?;
        storage.set_item(photodb_core::STORAGE_KEY, "{not json")?;
        let store = CatalogStore::load(storage.into_slot(photodb_core::STORAGE_KEY));
        assert_eq!(store.source(), LoadSource::Samples);
        assert_eq!(store.items(), sample_items().as_slice());
        assert_eq!(store.slot().read()?.as_deref(), Some("{not json"));
        Ok(())
    }

    #[test]
    fn ids_stay_unique_across_mutations() -> anyhow::Result<()> {
        let mut ctx = memory_context(&[make_item(1, 101), make_item(2, 102)])?;
        ctx.add_item()?;
        ctx.delete_selected()?;
        ctx.add_item()?;
        ctx.select_relative(-10)?;
        ctx.delete_selected()?;
        ctx.add_item()?;

        let mut ids: Vec<u32> = ctx.store.items().iter().map(|i| i.id).collect();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
        assert_eq!(ids, vec![2, 4, 5]);
        Ok(())
    }
}
