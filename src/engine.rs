//! One-time build of the shared [`Recommender`] from configuration.
//!
//! Loads the corpus, then hands it to the core builder with the configured
//! vectorizer, kernel, and self-exclusion policy. Everything expensive
//! happens here, once, before the CLI or HTTP server answers a query.

use anyhow::{Context, Result};
use cinematch_core::models::Item;
use cinematch_core::recommend::{Recommender, RecommenderBuilder};
use std::time::Instant;

use crate::config::Config;
use crate::loader;
use crate::progress::{BuildProgressEvent, ProgressReporter, ScoringObserver};

/// Load the configured corpus and build a [`Recommender`] from it.
pub fn build_recommender(config: &Config, reporter: &dyn ProgressReporter) -> Result<Recommender> {
    let items = loader::load_corpus(&config.corpus)?;
    reporter.report(BuildProgressEvent::Loaded {
        items: items.len() as u64,
    });
    build_from_items(config, items, reporter)
}

/// Build a [`Recommender`] from an already-loaded corpus.
pub fn build_from_items(
    config: &Config,
    items: Vec<Item>,
    reporter: &dyn ProgressReporter,
) -> Result<Recommender> {
    let started = Instant::now();
    let total = items.len();
    reporter.report(BuildProgressEvent::Vectorizing {
        items: total as u64,
    });

    let mut observer = ScoringObserver::new(reporter, total);
    let recommender = RecommenderBuilder::new()
        .vectorizer(config.vectorizer.params())
        .kernel(config.kernel.kernel())
        .self_exclusion(config.recommend.self_exclusion)
        .build_with_observer(items, &mut observer)
        .with_context(|| {
            format!(
                "Failed to build recommender from {}",
                config.corpus.movies.display()
            )
        })?;

    tracing::info!(
        items = recommender.len(),
        vocabulary = recommender.vocabulary_size(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "build complete"
    );
    Ok(recommender)
}
