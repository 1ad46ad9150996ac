//! Content-based recommender over a precomputed similarity matrix.
//!
//! A [`Recommender`] is built once by [`RecommenderBuilder`] and is
//! immutable afterwards: it owns the corpus, the TF-IDF vocabulary, the
//! similarity matrix, and the title index. Queries are read-only and
//! `O(n log n)`, so a single instance can be shared across threads
//! (e.g. behind an `Arc` in the HTTP server) without locking.
//!
//! # Query Algorithm
//!
//! 1. Resolve the query title through the case-insensitive [`TitleIndex`].
//! 2. Read the query item's full similarity row.
//! 3. Stable-sort `(row, score)` pairs by score descending; exact ties
//!    keep ascending row order.
//! 4. Remove the query item itself (see [`SelfExclusion`]).
//! 5. Take `top_n` entries and project them to [`ItemSummary`].

use serde::Deserialize;

use crate::error::RecommendError;
use crate::index::TitleIndex;
use crate::models::{Item, ItemSummary};
use crate::similarity::{compute_with_observer, BuildObserver, NoObserver, SigmoidKernel, SimilarityMatrix};
use crate::vectorize::{self, VectorizerParams, Vocabulary};

/// How the query item is removed from its own result list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelfExclusion {
    /// Remove the entry whose row equals the query row, wherever it sorted.
    #[default]
    ByRow,
    /// Drop the first sorted entry unconditionally.
    ///
    /// Matches the positional behaviour of earlier versions. When the query
    /// row does not sort first (ties, empty descriptions) this removes a
    /// different item and keeps the query in its own results.
    DropFirst,
}

/// Configures and runs the one-time build of a [`Recommender`].
#[derive(Debug, Clone, Default)]
pub struct RecommenderBuilder {
    params: VectorizerParams,
    kernel: SigmoidKernel,
    self_exclusion: SelfExclusion,
}

impl RecommenderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vectorizer(mut self, params: VectorizerParams) -> Self {
        self.params = params;
        self
    }

    pub fn kernel(mut self, kernel: SigmoidKernel) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn self_exclusion(mut self, policy: SelfExclusion) -> Self {
        self.self_exclusion = policy;
        self
    }

    /// Vectorize `items`, compute the similarity matrix, and index titles.
    pub fn build(self, items: Vec<Item>) -> Result<Recommender, RecommendError> {
        self.build_with_observer(items, &mut NoObserver)
    }

    /// Like [`build`](Self::build), reporting similarity rows to `observer`.
    ///
    /// Items are renumbered so that `row_index` equals their position.
    pub fn build_with_observer(
        self,
        mut items: Vec<Item>,
        observer: &mut dyn BuildObserver,
    ) -> Result<Recommender, RecommendError> {
        if items.is_empty() {
            return Err(RecommendError::EmptyCorpus);
        }
        for (row, item) in items.iter_mut().enumerate() {
            item.row_index = row;
        }

        let descriptions: Vec<&str> = items.iter().map(|i| i.description.as_str()).collect();
        let (vocabulary, matrix) = vectorize::build(&descriptions, &self.params);
        if vocabulary.is_empty() {
            return Err(RecommendError::EmptyVocabulary {
                min_df: self.params.min_df,
            });
        }

        let similarity = compute_with_observer(&matrix, &self.kernel, observer)
            .ok_or(RecommendError::Cancelled)?;
        let index = TitleIndex::build(&items);

        tracing::info!(
            items = items.len(),
            vocabulary = vocabulary.len(),
            titles = index.len(),
            "recommender built"
        );

        Ok(Recommender {
            items,
            vocabulary,
            similarity,
            index,
            params: self.params,
            kernel: self.kernel,
            self_exclusion: self.self_exclusion,
        })
    }
}

/// Immutable recommendation context.
#[derive(Debug, Clone)]
pub struct Recommender {
    items: Vec<Item>,
    vocabulary: Vocabulary,
    similarity: SimilarityMatrix,
    index: TitleIndex,
    params: VectorizerParams,
    kernel: SigmoidKernel,
    self_exclusion: SelfExclusion,
}

impl Recommender {
    /// Return up to `top_n` items most similar to `query_title`.
    ///
    /// The result has exactly `min(top_n, len() - 1)` entries, ordered by
    /// descending score. Fails with [`RecommendError::NotFound`] when the
    /// title is unknown and [`RecommendError::InvalidTopN`] when `top_n` is 0.
    pub fn recommend(&self, query_title: &str, top_n: usize) -> Result<Vec<ItemSummary>, RecommendError> {
        if top_n == 0 {
            return Err(RecommendError::InvalidTopN);
        }
        let idx = self
            .index
            .lookup(query_title)
            .ok_or_else(|| RecommendError::NotFound {
                query: query_title.to_string(),
            })?;

        let ranked = self.ranked(idx);
        let selected: Vec<(usize, f64)> = match self.self_exclusion {
            SelfExclusion::ByRow => ranked
                .into_iter()
                .filter(|(row, _)| *row != idx)
                .take(top_n)
                .collect(),
            SelfExclusion::DropFirst => ranked.into_iter().skip(1).take(top_n).collect(),
        };

        Ok(selected
            .into_iter()
            .map(|(row, score)| self.items[row].summary(score))
            .collect())
    }

    /// Every row paired with its similarity to `idx`, best first.
    fn ranked(&self, idx: usize) -> Vec<(usize, f64)> {
        let mut scored: Vec<(usize, f64)> = self.similarity.row(idx).iter().copied().enumerate().collect();
        // sort_by is stable: equal scores stay in row order.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    /// Number of items in the corpus.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Display titles in row order.
    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.items.iter().map(|item| item.title.as_str())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, row: usize) -> Option<&Item> {
        self.items.get(row)
    }

    /// Resolve a title to its row, case-insensitively.
    pub fn lookup(&self, title: &str) -> Option<usize> {
        self.index.lookup(title)
    }

    pub fn similarity(&self, i: usize, j: usize) -> f64 {
        self.similarity.get(i, j)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }

    pub fn kernel(&self) -> &SigmoidKernel {
        &self.kernel
    }

    pub fn self_exclusion(&self) -> SelfExclusion {
        self.self_exclusion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ops::ControlFlow;

    fn corpus(entries: &[(&str, &str)]) -> Vec<Item> {
        entries
            .iter()
            .enumerate()
            .map(|(i, (title, desc))| Item::new(i, i as i64 + 1, *title, *desc, 5.0 + i as f64))
            .collect()
    }

    fn build(entries: &[(&str, &str)], min_df: usize) -> Recommender {
        RecommenderBuilder::new()
            .vectorizer(VectorizerParams {
                min_df,
                ..Default::default()
            })
            .build(corpus(entries))
            .unwrap()
    }

    fn movies() -> Recommender {
        build(
            &[
                ("Avatar", "marine on alien planet pandora joins alien tribe"),
                ("Alien", "crew of spaceship hunted by alien creature"),
                ("Aliens", "marine squad returns to alien planet to fight alien creature"),
                ("Julie & Julia", "cooking blog inspired by french chef recipes"),
                ("Chef", "chef starts food truck cooking cuban recipes"),
                ("Heat", "detective hunts crew of professional thieves in los angeles"),
                ("Ronin", "crew of mercenaries hunts mysterious case in france"),
            ],
            2,
        )
    }

    #[test]
    fn test_three_item_scenario_ranks_shared_vocabulary_first() {
        let rec = build(
            &[
                ("A", "space adventure aliens"),
                ("B", "space war aliens"),
                ("C", "cooking recipes desserts"),
            ],
            1,
        );
        let results = rec.recommend("A", 2).unwrap();
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "C"]);
        assert!(results[0].score > results[1].score);
    }

    #[test]
    fn test_never_includes_query_item() {
        let rec = movies();
        for item in rec.items() {
            for query in [item.title.clone(), item.title.to_uppercase()] {
                let results = rec.recommend(&query, 10).unwrap();
                assert!(
                    results.iter().all(|r| r.title != item.title),
                    "{} recommended itself",
                    item.title
                );
            }
        }
    }

    #[test]
    fn test_result_length() {
        let rec = movies();
        for top_n in [1, 3, 6, 7, 50] {
            let results = rec.recommend("Heat", top_n).unwrap();
            assert_eq!(results.len(), top_n.min(rec.len() - 1));
        }
    }

    #[test]
    fn test_scores_non_increasing() {
        let rec = movies();
        for item in rec.items() {
            let results = rec.recommend(&item.title, 10).unwrap();
            for pair in results.windows(2) {
                assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    #[test]
    fn test_identical_descriptions_score_as_self() {
        let rec = build(
            &[
                ("Original", "bank heist crew vault"),
                ("Remake", "bank heist crew vault"),
                ("Other", "farm life story"),
                ("Another", "bank robbery"),
            ],
            1,
        );
        let self_sim = rec.similarity(0, 0);
        assert!((rec.similarity(0, 1) - self_sim).abs() < 1e-12);
        let results = rec.recommend("original", 1).unwrap();
        assert_eq!(results[0].title, "Remake");
        assert!((results[0].score - self_sim).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_title_is_not_found() {
        let rec = movies();
        let err = rec.recommend("nonexistent-title-xyz", 10).unwrap_err();
        assert_eq!(
            err,
            RecommendError::NotFound {
                query: "nonexistent-title-xyz".to_string()
            }
        );
    }

    #[test]
    fn test_case_insensitive_queries_match() {
        let rec = movies();
        assert_eq!(
            rec.recommend("AVATAR", 5).unwrap(),
            rec.recommend("avatar", 5).unwrap()
        );
    }

    #[test]
    fn test_related_items_rank_first() {
        let rec = movies();
        let results = rec.recommend("Aliens", 2).unwrap();
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert!(titles.contains(&"Avatar"));
        assert!(titles.contains(&"Alien"));
    }

    #[test]
    fn test_idempotent() {
        let rec = movies();
        let a = rec.recommend("Chef", 10).unwrap();
        let b = rec.recommend("Chef", 10).unwrap();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.title, y.title);
            assert_eq!(x.score.to_bits(), y.score.to_bits());
        }
    }

    #[test]
    fn test_ties_keep_row_order() {
        let rec = build(
            &[
                ("Query", "lighthouse keeper"),
                ("First", "desert racing"),
                ("Second", "jungle expedition"),
                ("Third", ""),
                ("Fourth", "submarine mutiny"),
            ],
            1,
        );
        let results = rec.recommend("query", 10).unwrap();
        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third", "Fourth"]);
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn test_drop_first_diverges_when_self_does_not_sort_first() {
        let entries = [
            ("Storm", "thunder storm chasers"),
            ("Tornado", "thunder storm tornado"),
            ("Blank", ""),
        ];
        let by_row = build(&entries, 1);
        let drop_first = RecommenderBuilder::new()
            .vectorizer(VectorizerParams {
                min_df: 1,
                ..Default::default()
            })
            .self_exclusion(SelfExclusion::DropFirst)
            .build(corpus(&entries))
            .unwrap();

        let titles = |r: Vec<ItemSummary>| r.into_iter().map(|s| s.title).collect::<Vec<_>>();

        // Blank's row is all zeros, so its self entry ties and sorts last.
        assert_eq!(titles(by_row.recommend("blank", 5).unwrap()), vec!["Storm", "Tornado"]);
        assert_eq!(titles(drop_first.recommend("blank", 5).unwrap()), vec!["Tornado", "Blank"]);

        // When self sorts first both policies agree.
        assert_eq!(
            by_row.recommend("storm", 5).unwrap(),
            drop_first.recommend("storm", 5).unwrap()
        );
    }

    #[test]
    fn test_duplicate_titles_resolve_to_later_row() {
        let rec = build(
            &[
                ("Heat", "cop chases thief"),
                ("Blizzard", "snow storm strands town"),
                ("HEAT", "snow storm strands village"),
            ],
            1,
        );
        let results = rec.recommend("heat", 2).unwrap();
        assert_eq!(results[0].title, "Blizzard");
        assert_eq!(results[1].title, "Heat");
    }

    #[test]
    fn test_summary_projects_display_fields() {
        let rec = movies();
        let results = rec.recommend("Julie & Julia", 1).unwrap();
        assert_eq!(results[0].title, "Chef");
        assert_eq!(results[0].description, "chef starts food truck cooking cuban recipes");
        assert_eq!(results[0].rating, 9.0);
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let rec = movies();
        assert_eq!(rec.recommend("Heat", 0).unwrap_err(), RecommendError::InvalidTopN);
    }

    #[test]
    fn test_single_item_corpus_returns_empty() {
        let rec = build(&[("Solo", "lonely astronaut")], 1);
        assert!(rec.recommend("solo", 10).unwrap().is_empty());
    }

    #[test]
    fn test_empty_corpus_error() {
        let err = RecommenderBuilder::new().build(Vec::new()).unwrap_err();
        assert_eq!(err, RecommendError::EmptyCorpus);
    }

    #[test]
    fn test_empty_vocabulary_error() {
        // Default min_df = 3: no term appears in three descriptions.
        let err = RecommenderBuilder::new()
            .build(corpus(&[
                ("A", "space adventure aliens"),
                ("B", "space war aliens"),
                ("C", "cooking recipes desserts"),
            ]))
            .unwrap_err();
        assert_eq!(err, RecommendError::EmptyVocabulary { min_df: 3 });
    }

    #[test]
    fn test_cancelled_build() {
        let mut stop = |_row: usize, _total: usize| ControlFlow::Break(());
        let err = RecommenderBuilder::new()
            .vectorizer(VectorizerParams {
                min_df: 1,
                ..Default::default()
            })
            .build_with_observer(corpus(&[("A", "x y"), ("B", "y z")]), &mut stop)
            .unwrap_err();
        assert_eq!(err, RecommendError::Cancelled);
    }

    #[test]
    fn test_rows_renumbered() {
        let items = vec![
            Item::new(7, 1, "A", "alpha beta", 1.0),
            Item::new(3, 2, "B", "beta gamma", 1.0),
        ];
        let rec = RecommenderBuilder::new()
            .vectorizer(VectorizerParams {
                min_df: 1,
                ..Default::default()
            })
            .build(items)
            .unwrap();
        assert_eq!(rec.item(1).unwrap().row_index, 1);
        assert_eq!(rec.lookup("b"), Some(1));
    }

    #[test]
    fn test_titles_in_row_order() {
        let rec = movies();
        let titles: Vec<&str> = rec.titles().collect();
        assert_eq!(titles.len(), rec.len());
        assert_eq!(titles[0], "Avatar");
        assert_eq!(titles[6], "Ronin");
    }

    #[test]
    fn test_non_finite_kernel_still_ranks_deterministically() {
        let rec = RecommenderBuilder::new()
            .vectorizer(VectorizerParams {
                min_df: 1,
                ..Default::default()
            })
            .kernel(SigmoidKernel {
                coef: f64::NAN,
                intercept: 0.0,
            })
            .build(corpus(&[
                ("Storm", "thunder storm chasers"),
                ("Twister", "storm chasers tornado"),
                ("Blank", ""),
                ("Cook", "pastry chef"),
            ]))
            .unwrap();
        let names = |results: Vec<ItemSummary>| -> Vec<String> {
            results.into_iter().map(|r| r.title).collect()
        };
        let first = names(rec.recommend("storm", 10).unwrap());
        let second = names(rec.recommend("storm", 10).unwrap());
        assert_eq!(first.len(), 3);
        assert!(!first.contains(&"Storm".to_string()));
        assert_eq!(first, second);
    }

    #[test]
    fn test_recommender_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Recommender>();
    }
}
