use anyhow::{Context, Result};
use cinematch_core::recommend::SelfExclusion;
use cinematch_core::similarity::SigmoidKernel;
use cinematch_core::vectorize::VectorizerParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub vectorizer: VectorizerConfig,
    #[serde(default)]
    pub kernel: KernelConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// JSON array of movies (`id`, `title`, `overview`, `vote_average`).
    pub movies: PathBuf,
    /// Optional JSON array of credits rows joined on `movie_id`.
    #[serde(default)]
    pub credits: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VectorizerConfig {
    #[serde(default = "default_min_df")]
    pub min_df: usize,
    #[serde(default = "default_ngram_min")]
    pub ngram_min: usize,
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
    #[serde(default)]
    pub max_features: Option<usize>,
    #[serde(default = "default_stop_words")]
    pub stop_words: bool,
}

fn default_min_df() -> usize {
    3
}
fn default_ngram_min() -> usize {
    1
}
fn default_ngram_max() -> usize {
    3
}
fn default_stop_words() -> bool {
    true
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            min_df: default_min_df(),
            ngram_min: default_ngram_min(),
            ngram_max: default_ngram_max(),
            max_features: None,
            stop_words: default_stop_words(),
        }
    }
}

impl VectorizerConfig {
    pub fn params(&self) -> VectorizerParams {
        VectorizerParams {
            min_df: self.min_df,
            ngram_range: (self.ngram_min, self.ngram_max),
            max_features: self.max_features,
            stop_words: self.stop_words,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KernelConfig {
    #[serde(default = "default_coef")]
    pub coef: f64,
    #[serde(default)]
    pub intercept: f64,
}

fn default_coef() -> f64 {
    1.0
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            coef: default_coef(),
            intercept: 0.0,
        }
    }
}

impl KernelConfig {
    pub fn kernel(&self) -> SigmoidKernel {
        SigmoidKernel {
            coef: self.coef,
            intercept: self.intercept,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendConfig {
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    #[serde(default)]
    pub self_exclusion: SelfExclusion,
}

fn default_top_n() -> usize {
    10
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            self_exclusion: SelfExclusion::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    // Relative corpus paths are resolved against the config file's directory.
    if let Some(base) = path.parent() {
        config.corpus.movies = base.join(&config.corpus.movies);
        config.corpus.credits = config.corpus.credits.as_ref().map(|c| base.join(c));
    }

    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &Config) -> Result<()> {
    let v = &config.vectorizer;
    if v.min_df == 0 {
        anyhow::bail!("vectorizer.min_df must be >= 1");
    }
    if v.ngram_min == 0 || v.ngram_min > v.ngram_max {
        anyhow::bail!("vectorizer ngram range must satisfy 1 <= ngram_min <= ngram_max");
    }
    if v.max_features == Some(0) {
        anyhow::bail!("vectorizer.max_features must be > 0 when set");
    }

    if !config.kernel.coef.is_finite() || !config.kernel.intercept.is_finite() {
        anyhow::bail!("kernel.coef and kernel.intercept must be finite numbers");
    }

    if config.recommend.default_top_n == 0 {
        anyhow::bail!("recommend.default_top_n must be >= 1");
    }

    Ok(())
}
