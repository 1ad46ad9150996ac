//! Case-insensitive title → row index lookup.

use std::collections::HashMap;

use crate::models::Item;

/// Maps lowercase titles to corpus row indices.
///
/// Normalization is `to_lowercase()` only: no trimming, no punctuation
/// stripping. When two items share a normalized title the later one wins.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    map: HashMap<String, usize>,
}

/// Normalize a title for indexing and lookup.
pub fn normalize_title(title: &str) -> String {
    title.to_lowercase()
}

impl TitleIndex {
    pub fn build(items: &[Item]) -> Self {
        let mut map = HashMap::with_capacity(items.len());
        for item in items {
            if let Some(prev) = map.insert(normalize_title(&item.title), item.row_index) {
                tracing::debug!(
                    title = %item.title,
                    previous_row = prev,
                    row = item.row_index,
                    "duplicate title, keeping later row"
                );
            }
        }
        Self { map }
    }

    pub fn lookup(&self, title: &str) -> Option<usize> {
        self.map.get(&normalize_title(title)).copied()
    }

    /// Number of distinct normalized titles.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
