use crate::{ITEM_NUMBER_FLOOR, Item, ItemTemplate};

/// Ordered item collection. Order is insertion order; ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
    // Highest id handed out this session, so deleted ids are not reissued.
    id_high_water: u32,
}

impl Catalog {
    /// Builds a catalog, dropping any item whose id was already seen.
    /// Returns the catalog and the number of dropped duplicates.
    pub fn from_items(items: Vec<Item>) -> (Self, usize) {
        let total = items.len();
        let mut seen = std::collections::HashSet::new();
        let items: Vec<Item> = items
            .into_iter()
            .filter(|item| seen.insert(item.id))
            .collect();
        let dropped = total - items.len();
        let id_high_water = items.iter().map(|item| item.id).max().unwrap_or(0);
        (
            Self {
                items,
                id_high_water,
            },
            dropped,
        )
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub fn position(&self, id: u32) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn first(&self) -> Option<&Item> {
        self.items.first()
    }

    /// `None` once `u32::MAX` has been handed out.
    pub fn next_id(&self) -> Option<u32> {
        let max = self.items.iter().map(|item| item.id).max().unwrap_or(0);
        max.max(self.id_high_water).checked_add(1)
    }

    pub fn next_item_number(&self) -> Option<u32> {
        let max = self
            .items
            .iter()
            .map(|item| item.item_number)
            .max()
            .unwrap_or(0);
        max.max(ITEM_NUMBER_FLOOR).checked_add(1)
    }

    /// Appends a new item. Returns `None`, leaving the catalog untouched, when
    /// no id or item number above the existing ones is left.
    pub fn add(&mut self, template: ItemTemplate) -> Option<&Item> {
        let item = Item {
            id: self.next_id()?,
            item_number: self.next_item_number()?,
            images: template.images,
            description: template.description,
            date_created: template.date_created,
        };
        self.id_high_water = item.id;
        self.items.push(item);
        self.items.last()
    }

    /// Replaces the item with the same id in place. Returns `false` when no
    /// item matches; the collection is left untouched in that case.
    pub fn update(&mut self, edited: Item) -> bool {
        match self.items.iter_mut().find(|item| item.id == edited.id) {
            Some(slot) => {
                *slot = edited;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: u32) -> Option<Item> {
        let idx = self.position(id)?;
        Some(self.items.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_items;

    fn template() -> ItemTemplate {
        ItemTemplate {
            images: vec!["https://example.com/a.jpg".to_string()],
            description: "fresh".to_string(),
            date_created: "2025-01-01".to_string(),
        }
    }

    fn item(id: u32, item_number: u32) -> Item {
        Item {
            id,
            item_number,
            images: Vec::new(),
            description: format!("item {id}"),
            date_created: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn add_to_empty_catalog_starts_above_floor() {
        let mut catalog = Catalog::default();
        let added = catalog.add(template()).cloned().unwrap();
        assert_eq!(added.id, 1);
        assert_eq!(added.item_number, 101);
        assert_eq!(added.description, "fresh");
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn add_allocates_past_existing_maxima() {
        let (mut catalog, _) = Catalog::from_items(vec![item(4, 250), item(2, 90)]);
        let added = catalog.add(template()).cloned().unwrap();
        assert_eq!(added.id, 5);
        assert_eq!(added.item_number, 251);
        assert_eq!(catalog.items().last(), Some(&added));
    }

    #[test]
    fn low_item_numbers_use_floor() {
        let (mut catalog, _) = Catalog::from_items(vec![item(1, 5), item(2, 7)]);
        assert_eq!(catalog.add(template()).map(|i| i.item_number), Some(101));
    }

    #[test]
    fn deleted_max_id_is_not_reissued() {
        let (mut catalog, _) = Catalog::from_items(vec![item(1, 101), item(2, 102)]);
        assert!(catalog.remove(2).is_some());
        assert_eq!(catalog.add(template()).map(|i| i.id), Some(3));
    }

    #[test]
    fn exhausted_id_space_refuses_add() {
        let (mut catalog, _) = Catalog::from_items(vec![item(u32::MAX, 101)]);
        let before = catalog.clone();
        assert_eq!(catalog.next_id(), None);
        assert!(catalog.add(template()).is_none());
        assert_eq!(catalog, before);
    }

    #[test]
    fn exhausted_item_numbers_refuse_add() {
        let (mut catalog, _) = Catalog::from_items(vec![item(1, u32::MAX)]);
        let before = catalog.clone();
        assert_eq!(catalog.next_item_number(), None);
        assert!(catalog.add(template()).is_none());
        assert_eq!(catalog, before);
    }

    #[test]
    fn update_replaces_in_place() {
        let (mut catalog, _) = Catalog::from_items(sample_items());
        let mut edited = catalog.get(1).cloned().unwrap();
        edited.description = "changed".to_string();
        assert!(catalog.update(edited.clone()));
        assert_eq!(catalog.items()[0], edited);
        assert_eq!(catalog.items()[1], sample_items()[1]);
    }

    #[test]
    fn update_missing_id_is_reported() {
        let (mut catalog, _) = Catalog::from_items(sample_items());
        let before = catalog.clone();
        assert!(!catalog.update(item(99, 500)));
        assert_eq!(catalog, before);
    }

    #[test]
    fn remove_missing_id_is_reported() {
        let (mut catalog, _) = Catalog::from_items(sample_items());
        let before = catalog.clone();
        assert_eq!(catalog.remove(42), None);
        assert_eq!(catalog, before);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let (catalog, dropped) =
            Catalog::from_items(vec![item(1, 101), item(1, 500), item(2, 102)]);
        assert_eq!(dropped, 1);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).map(|i| i.item_number), Some(101));
    }

    #[test]
    fn ids_stay_unique_across_mixed_operations() {
        let (mut catalog, _) = Catalog::from_items(sample_items());
        for round in 0..20u32 {
            let id = catalog.add(template()).unwrap().id;
            if round % 3 == 0 {
                catalog.remove(id);
            }
            if round % 5 == 0 {
                if let Some(first) = catalog.first().cloned() {
                    catalog.remove(first.id);
                }
            }
        }
        let mut ids: Vec<u32> = catalog.items().iter().map(|i| i.id).collect();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }
}
