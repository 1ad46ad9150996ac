//! `cinematch recommend` — query the recommender from the command line.
//!
//! Human output mirrors a results page: one block per recommendation with
//! `Title (rating/10)`, the overview, and a separator line. `--json` prints
//! the structured result instead.

use anyhow::Result;
use cinematch_core::error::RecommendError;
use cinematch_core::models::ItemSummary;
use cinematch_core::recommend::Recommender;
use serde::Serialize;

/// JSON shape shared by `--json` output and `GET /recommend`.
#[derive(Debug, Serialize)]
pub struct RecommendResponse<'a> {
    pub query: &'a str,
    pub results: Vec<ItemSummary>,
}

/// Outcome of a CLI query. Not-found is a normal outcome, not an error.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Found(usize),
    NotFound,
}

pub fn run_recommend(
    recommender: &Recommender,
    title: &str,
    top_n: usize,
    json: bool,
) -> Result<Outcome> {
    let results = match recommender.recommend(title, top_n) {
        Ok(results) => results,
        Err(err @ RecommendError::NotFound { .. }) => {
            if json {
                let body = serde_json::json!({
                    "error": { "code": err.code(), "message": err.to_string() }
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                eprintln!("{}", err);
            }
            return Ok(Outcome::NotFound);
        }
        Err(err) => return Err(err.into()),
    };

    if json {
        let response = RecommendResponse {
            query: title,
            results,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(Outcome::Found(response.results.len()));
    }

    println!("Recommendations based on: {}", title);
    println!();
    if results.is_empty() {
        println!("No other movies in the corpus.");
    }
    for item in &results {
        print!("{}", format_item(item));
    }
    Ok(Outcome::Found(results.len()))
}

fn format_item(item: &ItemSummary) -> String {
    format!(
        "{} ({:.1}/10)\n{}\n---\n",
        item.title, item.rating, item.description
    )
}
