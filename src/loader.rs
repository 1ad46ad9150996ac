//! JSON corpus loader.
//!
//! Reads a movies table and an optional credits table, joins them on the
//! numeric movie id, and produces the deduplicated, row-indexed
//! [`Item`] list the recommender is built from.
//!
//! # Normalization
//!
//! - `id` may be a JSON integer or a numeric string; rows whose id cannot
//!   be parsed are skipped.
//! - The display title is `original_title` when present, else `title`.
//! - A missing or `null` `overview` becomes `""`.
//! - A missing or `null` `vote_average` becomes `0.0`.
//! - With a credits table, only movies whose id appears in it are kept.
//! - Duplicate ids keep their first occurrence.

use anyhow::{Context, Result};
use cinematch_core::models::Item;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::config::CorpusConfig;

#[derive(Debug, Deserialize)]
struct MovieRecord {
    id: Value,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    original_title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CreditRecord {
    movie_id: Value,
}

/// Parse an id the way a lenient numeric coercion would: integers,
/// integral floats, and numeric strings are accepted.
fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Load the corpus described by `config`.
pub fn load_corpus(config: &CorpusConfig) -> Result<Vec<Item>> {
    let movies: Vec<MovieRecord> = read_json(&config.movies)?;
    let credits = match &config.credits {
        Some(path) => {
            let rows: Vec<CreditRecord> = read_json(path)?;
            Some(
                rows.iter()
                    .filter_map(|r| coerce_id(&r.movie_id))
                    .collect::<HashSet<i64>>(),
            )
        }
        None => None,
    };
    Ok(build_items(movies, credits.as_ref()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus file: {}", path.display()))
}

fn build_items(movies: Vec<MovieRecord>, credits: Option<&HashSet<i64>>) -> Vec<Item> {
    let total = movies.len();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut items = Vec::with_capacity(total);
    let mut skipped = 0usize;

    for record in movies {
        let Some(id) = coerce_id(&record.id) else {
            skipped += 1;
            continue;
        };
        if credits.is_some_and(|c| !c.contains(&id)) || !seen.insert(id) {
            skipped += 1;
            continue;
        }
        let Some(title) = record.original_title.or(record.title) else {
            skipped += 1;
            continue;
        };
        items.push(Item::new(
            items.len(),
            id,
            title,
            record.overview.unwrap_or_default(),
            record.vote_average.unwrap_or(0.0),
        ));
    }

    tracing::info!(rows = total, items = items.len(), skipped, "corpus loaded");
    items
}
