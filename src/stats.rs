//! Corpus and model statistics.
//!
//! Gives a quick summary of what was built: corpus size, vocabulary size,
//! vectorizer and kernel parameters. Used by `cinematch stats` to confirm a
//! corpus and config produce a usable model before serving it.

use cinematch_core::recommend::Recommender;
use serde::Serialize;

#[derive(Debug, Serialize, PartialEq)]
pub struct Stats {
    pub items: usize,
    pub vocabulary: usize,
    pub empty_descriptions: usize,
    pub min_df: usize,
    pub ngram_range: (usize, usize),
    pub kernel_coef: f64,
    pub kernel_intercept: f64,
}

pub fn collect(recommender: &Recommender) -> Stats {
    let params = recommender.params();
    let kernel = recommender.kernel();
    Stats {
        items: recommender.len(),
        vocabulary: recommender.vocabulary_size(),
        empty_descriptions: recommender
            .items()
            .iter()
            .filter(|i| i.description.trim().is_empty())
            .count(),
        min_df: params.min_df,
        ngram_range: params.ngram_range,
        kernel_coef: kernel.coef,
        kernel_intercept: kernel.intercept,
    }
}

pub fn run_stats(recommender: &Recommender, json: bool) -> anyhow::Result<()> {
    let stats = collect(recommender);
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("cinematch — Model Stats");
    println!("=======================");
    println!();
    println!("  Items:         {}", stats.items);
    println!("  Vocabulary:    {} terms", stats.vocabulary);
    println!("  No overview:   {}", stats.empty_descriptions);
    println!("  min_df:        {}", stats.min_df);
    println!(
        "  n-grams:       {}..={}",
        stats.ngram_range.0, stats.ngram_range.1
    );
    println!(
        "  Kernel:        tanh({} * dot + {})",
        stats.kernel_coef, stats.kernel_intercept
    );
    Ok(())
}
