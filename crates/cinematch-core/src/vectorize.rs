//! TF-IDF vectorizer over item descriptions.
//!
//! Builds a shared [`Vocabulary`] of 1- to 3-gram terms and one sparse,
//! L2-normalized TF-IDF row per description. This is a batch transform:
//! IDF needs corpus-wide document frequencies, so all descriptions are
//! processed in a single call.
//!
//! # Algorithm
//!
//! 1. Tokenize each description (accents stripped, lowercase word runs, stop
//!    words removed).
//! 2. Expand tokens into n-grams in `ngram_range`.
//! 3. Count document frequency per term; keep terms with `df >= min_df`.
//! 4. Optionally keep only the `max_features` most frequent terms.
//! 5. Sort surviving terms; their sorted position is their column index.
//! 6. Weight each cell `count × (ln((1 + n) / (1 + df)) + 1)`.
//! 7. L2-normalize every non-empty row.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::text::{ngrams, tokenize};

/// Vectorizer tuning parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorizerParams {
    /// Minimum number of distinct descriptions a term must occur in.
    pub min_df: usize,
    /// Inclusive n-gram length range.
    pub ngram_range: (usize, usize),
    /// Keep at most this many terms (highest corpus count first).
    pub max_features: Option<usize>,
    /// Remove English stop words before building n-grams.
    pub stop_words: bool,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            min_df: 3,
            ngram_range: (1, 3),
            max_features: None,
            stop_words: true,
        }
    }
}

/// Ordered set of retained terms with their IDF weights.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    idf: Vec<f64>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in column order (lexicographic).
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Column index of `term`, if it survived filtering.
    pub fn column(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    /// IDF weight of the term in `column`.
    pub fn idf(&self, column: usize) -> f64 {
        self.idf[column]
    }
}

/// One sparse row: `(column, weight)` pairs sorted by column.
pub type SparseRow = Vec<(usize, f64)>;

/// Sparse TF-IDF matrix, one row per item in corpus order.
#[derive(Debug, Clone, Default)]
pub struct TfidfMatrix {
    rows: Vec<SparseRow>,
    n_cols: usize,
}

impl TfidfMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn row(&self, i: usize) -> &[(usize, f64)] {
        &self.rows[i]
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    /// Dot product of rows `i` and `j` (sorted-merge over sparse entries).
    pub fn dot(&self, i: usize, j: usize) -> f64 {
        sparse_dot(&self.rows[i], &self.rows[j])
    }
}

/// Dot product of two column-sorted sparse rows.
pub fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let (mut x, mut y) = (0, 0);
    let mut sum = 0.0;
    while x < a.len() && y < b.len() {
        match a[x].0.cmp(&b[y].0) {
            std::cmp::Ordering::Less => x += 1,
            std::cmp::Ordering::Greater => y += 1,
            std::cmp::Ordering::Equal => {
                sum += a[x].1 * b[y].1;
                x += 1;
                y += 1;
            }
        }
    }
    sum
}

/// Build the vocabulary and TF-IDF matrix for `descriptions`.
///
/// Never fails: an empty input or an input where no term survives yields
/// an empty vocabulary and all-zero rows. Callers decide whether that is
/// an error.
pub fn build<S: AsRef<str>>(descriptions: &[S], params: &VectorizerParams) -> (Vocabulary, TfidfMatrix) {
    let (min_n, max_n) = params.ngram_range;
    let n_docs = descriptions.len();

    let doc_terms: Vec<Vec<String>> = descriptions
        .iter()
        .map(|d| ngrams(&tokenize(d.as_ref(), params.stop_words), min_n, max_n))
        .collect();

    let mut df: HashMap<&str, usize> = HashMap::new();
    let mut corpus_count: HashMap<&str, usize> = HashMap::new();
    for terms in &doc_terms {
        let mut seen: HashSet<&str> = HashSet::new();
        for t in terms {
            *corpus_count.entry(t.as_str()).or_insert(0) += 1;
            if seen.insert(t.as_str()) {
                *df.entry(t.as_str()).or_insert(0) += 1;
            }
        }
    }

    let mut kept: Vec<&str> = df
        .iter()
        .filter(|(_, count)| **count >= params.min_df)
        .map(|(t, _)| *t)
        .collect();

    if let Some(max) = params.max_features {
        if kept.len() > max {
            kept.sort_by(|a, b| corpus_count[b].cmp(&corpus_count[a]).then(a.cmp(b)));
            kept.truncate(max);
        }
    }
    kept.sort_unstable();

    let terms: Vec<String> = kept.iter().map(|t| t.to_string()).collect();
    let idf: Vec<f64> = kept
        .iter()
        .map(|t| ((1.0 + n_docs as f64) / (1.0 + df[t] as f64)).ln() + 1.0)
        .collect();
    let index: HashMap<String, usize> = terms
        .iter()
        .enumerate()
        .map(|(i, t)| (t.clone(), i))
        .collect();

    let vocab = Vocabulary { terms, idf, index };

    let rows: Vec<SparseRow> = doc_terms
        .iter()
        .map(|terms| weigh_row(terms, &vocab))
        .collect();

    tracing::debug!(
        documents = n_docs,
        vocabulary = vocab.len(),
        min_df = params.min_df,
        "built tf-idf matrix"
    );

    let matrix = TfidfMatrix {
        rows,
        n_cols: vocab.len(),
    };
    (vocab, matrix)
}

fn weigh_row(terms: &[String], vocab: &Vocabulary) -> SparseRow {
    let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
    for t in terms {
        if let Some(col) = vocab.column(t) {
            *counts.entry(col).or_insert(0.0) += 1.0;
        }
    }

    let mut row: SparseRow = counts
        .into_iter()
        .map(|(col, tf)| (col, tf * vocab.idf(col)))
        .collect();

    let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, w) in row.iter_mut() {
            *w /= norm;
        }
    }
    row
}
