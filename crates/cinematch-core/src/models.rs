//! Core data models shared by the vectorizer, index, and recommender.

use serde::Serialize;

/// A single corpus entry.
///
/// Created once by the corpus loader and never mutated. `row_index` is the
/// item's 0-based position in the corpus and aligns it with its TF-IDF
/// row, its similarity row, and its display record.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub row_index: usize,
    pub id: i64,
    pub title: String,
    /// Free-text description. Missing descriptions are stored as `""`.
    pub description: String,
    pub rating: f64,
}

impl Item {
    pub fn new(
        row_index: usize,
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        rating: f64,
    ) -> Self {
        Self {
            row_index,
            id,
            title: title.into(),
            description: description.into(),
            rating,
        }
    }

    /// Project this item into a result row carrying `score`.
    pub fn summary(&self, score: f64) -> ItemSummary {
        ItemSummary {
            title: self.title.clone(),
            description: self.description.clone(),
            rating: self.rating,
            score,
        }
    }
}

/// A recommendation result, in display field order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub title: String,
    pub description: String,
    pub rating: f64,
    /// Similarity between this item and the query item.
    pub score: f64,
}
