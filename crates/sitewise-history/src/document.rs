#![forbid(unsafe_code)]

//! Ordered, id-keyed item collection.
//!
//! A [`Document`] is the full set of annotations on one canvas at one point
//! in time. Order is z-order: index 0 is drawn first, the last item is on
//! top. Lookups are linear; a canvas holds tens to low hundreds of items.

use serde::{Deserialize, Serialize};

use crate::item::HistoryItem;

/// Ordered sequence of items. Serializes as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(deserialize = "T: HistoryItem"))]
pub struct Document<T> {
    items: Vec<T>,
}

impl<T> Default for Document<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: HistoryItem> Document<T> {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Items in z-order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the item with `id`, if present.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// First id that occurs more than once, if any.
    #[must_use]
    pub fn first_duplicate_id(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::with_capacity(self.items.len());
        self.items
            .iter()
            .map(HistoryItem::id)
            .find(|id| !seen.insert(*id))
    }

    pub(crate) fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> T {
        self.items.remove(index)
    }

    pub(crate) fn replace_at(&mut self, index: usize, item: T) {
        self.items[index] = item;
    }

    /// Move the item at `index` to the top of the z-order.
    pub(crate) fn raise_to_top(&mut self, index: usize) {
        let item = self.items.remove(index);
        self.items.push(item);
    }

    /// Move the item at `index` to the bottom of the z-order.
    pub(crate) fn lower_to_bottom(&mut self, index: usize) {
        let item = self.items.remove(index);
        self.items.insert(0, item);
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: HistoryItem> FromIterator<T> for Document<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Document<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::RawItem;

    fn doc(ids: &[&str]) -> Document<RawItem> {
        ids.iter().map(|id| RawItem::new(*id)).collect()
    }

    fn ids(d: &Document<RawItem>) -> Vec<&str> {
        d.items().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn lookup_by_id() {
        let d = doc(&["a", "b", "c"]);
        assert_eq!(d.position("b"), Some(1));
        assert!(d.contains("c"));
        assert!(d.get("zz").is_none());
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn z_order_moves() {
        let mut d = doc(&["a", "b", "c"]);
        d.raise_to_top(0);
        assert_eq!(ids(&d), ["b", "c", "a"]);
        d.lower_to_bottom(2);
        assert_eq!(ids(&d), ["a", "b", "c"]);
    }

    #[test]
    fn duplicate_detection() {
        assert_eq!(doc(&["a", "b"]).first_duplicate_id(), None);
        assert_eq!(doc(&["a", "b", "a"]).first_duplicate_id(), Some("a"));
    }

    #[test]
    fn serializes_as_array() {
        let d = doc(&["a"]);
        assert_eq!(serde_json::to_string(&d).unwrap(), r#"[{"id":"a"}]"#);
        let back: Document<RawItem> = serde_json::from_str(r#"[{"id":"a"}]"#).unwrap();
        assert_eq!(back, d);
    }
}
