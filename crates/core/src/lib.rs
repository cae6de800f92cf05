//! Core domain types for photodb.

use serde::{Deserialize, Serialize};

mod catalog;

pub use catalog::Catalog;

/// Key of the slot holding the serialized catalog.
pub const STORAGE_KEY: &str = "photoDatabaseItems";
pub const DEFAULT_IMAGE: &str =
    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400";
pub const NEW_ITEM_DESCRIPTION: &str = "New item description";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// New item numbers start above this floor.
pub const ITEM_NUMBER_FLOOR: u32 = 100;
pub const ITEM_NUMBER_MAX: u32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: u32,
    pub item_number: u32,
    pub images: Vec<String>,
    pub description: String,
    pub date_created: String,
}

/// Seed values for an item created through the add action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTemplate {
    pub images: Vec<String>,
    pub description: String,
    pub date_created: String,
}

impl ItemTemplate {
    pub fn from_settings(settings: &Settings, date_created: String) -> Self {
        Self {
            images: vec![settings.default_image.clone()],
            description: settings.new_item_description.clone(),
            date_created,
        }
    }
}

/// Generation number of one edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditTicket(pub u64);

impl EditTicket {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for EditTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "edit#{}", self.0)
    }
}

/// Decoded images of one upload, in the order the files were picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadBatch {
    pub ticket: EditTicket,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage_key: String,
    pub default_image: String,
    pub new_item_description: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            default_image: DEFAULT_IMAGE.to_string(),
            new_item_description: NEW_ITEM_DESCRIPTION.to_string(),
        }
    }
}

impl Settings {
    pub fn normalize(&mut self) {
        let defaults = Settings::default();
        normalize_field(&mut self.storage_key, defaults.storage_key);
        normalize_field(&mut self.default_image, defaults.default_image);
        normalize_field(&mut self.new_item_description, defaults.new_item_description);
    }

    pub fn new_item_template(&self, date_created: String) -> ItemTemplate {
        ItemTemplate::from_settings(self, date_created)
    }
}

fn normalize_field(value: &mut String, fallback: String) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        *value = fallback;
    } else if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Parses item-number input the way the edit form does: anything that is not
/// an integer becomes 0, and the result is clamped into `0..=999`.
pub fn parse_item_number(input: &str) -> u32 {
    match input.trim().parse::<i64>() {
        Ok(value) => value.clamp(0, i64::from(ITEM_NUMBER_MAX)) as u32,
        Err(_) => 0,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDate(pub String);

impl std::fmt::Display for InvalidDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date {:?}, expected YYYY-MM-DD", self.0)
    }
}

impl std::error::Error for InvalidDate {}

pub fn parse_date(input: &str) -> Result<String, InvalidDate> {
    let trimmed = input.trim();
    chrono::NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .map_err(|_| InvalidDate(input.to_string()))
}

pub fn today() -> String {
    chrono::Local::now()
        .date_naive()
        .format(DATE_FORMAT)
        .to_string()
}

/// Built-in collection used when nothing usable is persisted.
pub fn sample_items() -> Vec<Item> {
    vec![
        Item {
            id: 1,
            item_number: 101,
            images: vec![DEFAULT_IMAGE.to_string()],
            description: "Beautiful mountain landscape at sunset with snow-capped peaks and alpine meadows."
                .to_string(),
            date_created: "2024-01-15".to_string(),
        },
        Item {
            id: 2,
            item_number: 102,
            images: vec![
                "https://images.unsplash.com/photo-1511300636408-a63a89df3482?w=400".to_string(),
                "https://images.unsplash.com/photo-1505142468610-359e7d316be0?w=400".to_string(),
            ],
            description: "Coastal view with dramatic cliffs and ocean waves crashing against rocks."
                .to_string(),
            date_created: "2024-02-20".to_string(),
        },
    ]
}
