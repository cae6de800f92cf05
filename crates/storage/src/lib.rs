//! Sqlite-backed key-value persistence.

use std::path::Path;

use anyhow::Context as _;
use photodb_core::Settings;
use rusqlite::{Connection, OptionalExtension as _};

/// One key of a key-value store. The catalog is persisted as a whole into a
/// single slot.
pub trait Slot {
    fn read(&self) -> anyhow::Result<Option<String>>;
    fn write(&mut self, value: &str) -> anyhow::Result<()>;
}

#[derive(Debug)]
pub struct Storage {
    conn: Connection,
}

impl Storage {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("open sqlite db at {}", path.as_ref().display()))?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
        let storage = Self { conn };
        storage.migrate()?;
        Ok(storage)
    }

    fn migrate(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (unixepoch())
            );

            CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                storage_key TEXT NOT NULL,
                default_image TEXT NOT NULL
            );
            "#,
        )?;

        let defaults = Settings::default();
        self.conn.execute(
            "INSERT OR IGNORE INTO settings (id, storage_key, default_image) VALUES (1, ?, ?)",
            (&defaults.storage_key, &defaults.default_image),
        )?;

        match self.conn.execute(
            "ALTER TABLE settings ADD COLUMN new_item_description TEXT NOT NULL DEFAULT ''",
            [],
        ) {
            Ok(_) => {}
            Err(err) => {
                let msg = err.to_string();
                if !msg.contains("duplicate column name") {
                    return Err(err).context("add settings.new_item_description column");
                }
            }
        }

        Ok(())
    }

    pub fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .with_context(|| format!("read kv key {key}"))?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
                INSERT INTO kv (key, value, updated_at) VALUES (?, ?, unixepoch())
                ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
                "#,
                (key, value),
            )
            .with_context(|| format!("write kv key {key}"))?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> anyhow::Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?", [key])
            .with_context(|| format!("delete kv key {key}"))?;
        Ok(removed > 0)
    }

    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        let row = self
            .conn
            .query_row(
                "SELECT storage_key, default_image, new_item_description FROM settings WHERE id = 1",
                [],
                |row| {
                    let storage_key: String = row.get(0)?;
                    let default_image: String = row.get(1)?;
                    let new_item_description: String = row.get(2)?;
                    Ok((storage_key, default_image, new_item_description))
                },
            )
            .optional()?;

        let mut settings = match row {
            Some((storage_key, default_image, new_item_description)) => Settings {
                storage_key,
                default_image,
                new_item_description,
            },
            None => Settings::default(),
        };
        settings.normalize();
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &Settings) -> anyhow::Result<()> {
        let mut settings = settings.clone();
        settings.normalize();

        self.conn.execute(
            "UPDATE settings SET storage_key = ?, default_image = ?, new_item_description = ? WHERE id = 1",
            (
                &settings.storage_key,
                &settings.default_image,
                &settings.new_item_description,
            ),
        )?;
        Ok(())
    }

    pub fn into_slot(self, key: impl Into<String>) -> SqliteSlot {
        SqliteSlot {
            storage: self,
            key: key.into(),
        }
    }
}

#[derive(Debug)]
pub struct SqliteSlot {
    storage: Storage,
    key: String,
}

impl SqliteSlot {
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

impl Slot for SqliteSlot {
    fn read(&self) -> anyhow::Result<Option<String>> {
        self.storage.get_item(&self.key)
    }

    fn write(&mut self, value: &str) -> anyhow::Result<()> {
        self.storage.set_item(&self.key, value)
    }
}

/// Volatile slot, used when no database is wanted and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    pub value: Option<String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

impl MemorySlot {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> anyhow::Result<Option<String>> {
        if self.fail_reads {
            anyhow::bail!("memory slot read refused");
        }
        Ok(self.value.clone())
    }

    fn write(&mut self, value: &str) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("memory slot write refused");
        }
        self.value = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }
}
