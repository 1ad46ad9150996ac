//! # cinematch Core
//!
//! Pure recommendation logic for cinematch: item models, the TF-IDF
//! vectorizer, the sigmoid-kernel similarity matrix, the title index,
//! and the recommender that ties them together.
//!
//! This crate contains no async runtime, filesystem I/O, or HTTP
//! dependencies. Loading a corpus and presenting results is the job of
//! the `cinematch` app crate.
//!
//! # Example
//!
//! ```rust
//! use cinematch_core::models::Item;
//! use cinematch_core::recommend::RecommenderBuilder;
//! use cinematch_core::vectorize::VectorizerParams;
//!
//! let items = vec![
//!     Item::new(0, 1, "A", "space adventure aliens", 7.0),
//!     Item::new(1, 2, "B", "space war aliens", 6.5),
//!     Item::new(2, 3, "C", "cooking recipes desserts", 5.0),
//! ];
//! let recommender = RecommenderBuilder::new()
//!     .vectorizer(VectorizerParams { min_df: 1, ..Default::default() })
//!     .build(items)
//!     .unwrap();
//!
//! let results = recommender.recommend("a", 2).unwrap();
//! assert_eq!(results[0].title, "B");
//! ```

pub mod error;
pub mod index;
pub mod models;
pub mod recommend;
pub mod similarity;
pub mod text;
pub mod vectorize;
