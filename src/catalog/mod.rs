//! Discovered-item catalog.

pub mod item;

pub use item::Item;

use std::collections::HashSet;

/// Insertion-ordered, deduplicated set of discovered items.
///
/// Grows monotonically during the crawl and is read-only afterwards. No two
/// items ever share a canonical key.
#[derive(Debug, Default)]
pub struct Catalog {
    items: Vec<Item>,
    keys: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `item` unless its canonical key is already present.
    ///
    /// First-seen wins: a later duplicate is dropped, not overwritten.
    /// Returns true when the item was new.
    pub fn insert(&mut self, item: Item) -> bool {
        if self.keys.contains(&item.canonical_key) {
            return false;
        }
        self.keys.insert(item.canonical_key.clone());
        self.items.push(item);
        true
    }

    /// Merge one collection pass, returning how many items were new.
    pub fn merge(&mut self, items: Vec<Item>) -> usize {
        let mut added = 0;
        for item in items {
            if self.insert(item) {
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    /// Items in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(key: &str, name: &str) -> Item {
        Item {
            canonical_key: key.to_string(),
            source_url: format!("{key}?sig=x"),
            display_name: name.to_string(),
        }
    }

    #[test]
    fn test_one_item_per_key_regardless_of_merge_order() {
        let mut catalog = Catalog::new();
        catalog.merge(vec![item("https://v.test/file/1", "a"), item("https://v.test/file/2", "b")]);
        catalog.merge(vec![item("https://v.test/file/2", "b"), item("https://v.test/file/3", "c")]);
        catalog.merge(vec![item("https://v.test/file/1", "a")]);

        assert_eq!(catalog.len(), 3);
        let keys: Vec<_> = catalog.iter().map(|i| i.canonical_key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "https://v.test/file/1",
                "https://v.test/file/2",
                "https://v.test/file/3"
            ]
        );
    }

    #[test]
    fn test_first_seen_display_name_wins() {
        let mut catalog = Catalog::new();
        catalog.insert(item("https://v.test/file/1", "original.pdf"));
        catalog.insert(item("https://v.test/file/1", "renamed.pdf"));

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.iter().next().unwrap().display_name, "original.pdf");
    }

    #[test]
    fn test_merge_reports_only_new_items() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.merge(vec![item("https://v.test/file/1", "a")]), 1);
        assert_eq!(
            catalog.merge(vec![
                item("https://v.test/file/1", "a"),
                item("https://v.test/file/2", "b")
            ]),
            1
        );
        assert!(catalog.contains_key("https://v.test/file/2"));
    }
}
