//! # cinematch
//!
//! Content-based movie recommendations: "people who liked this overview
//! will like these overviews".
//!
//! cinematch loads a movie corpus, weights every overview with TF-IDF over
//! 1- to 3-grams, scores every pair of movies with a sigmoid kernel, and
//! answers "movies like *X*" queries from the precomputed matrix via a CLI
//! and a JSON HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌──────────────┐
//! │   Loader   │──▶│  Vectorizer  │──▶│  Similarity  │
//! │ JSON files │   │ TF-IDF 1..3g │   │ tanh(x·y)    │
//! └────────────┘   └──────────────┘   └──────┬───────┘
//!                                            │
//!                      ┌─────────────────────┤
//!                      ▼                     ▼
//!                 ┌──────────┐         ┌──────────┐
//!                 │   CLI    │         │   HTTP   │
//!                 └──────────┘         └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! cinematch stats
//! cinematch recommend "Avatar" --top-n 5
//! cinematch serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`loader`] | JSON corpus loading and cleanup |
//! | [`engine`] | One-time recommender build |
//! | [`progress`] | Build progress on stderr |
//! | [`recommend_cmd`] | `recommend` command output |
//! | [`stats`] | `stats` command output |
//! | [`server`] | HTTP API |

pub mod config;
pub mod engine;
pub mod loader;
pub mod progress;
pub mod recommend_cmd;
pub mod server;
pub mod stats;
