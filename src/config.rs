//! TOML configuration.
//!
//! Every section is optional; missing keys fall back to the defaults below,
//! and a missing file falls back to [`Config::minimal`]. Invalid values are
//! rejected by [`load_config`] before any command runs.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use rag_advisor_core::chunk::{Chunker, DEFAULT_MAX_CHARS, DEFAULT_OVERLAP_CHARS};
use rag_advisor_core::pipeline::RetrievalPipeline;
use rag_advisor_core::rank::DEFAULT_TOP_K;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            overlap_chars: DEFAULT_OVERLAP_CHARS,
        }
    }
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}
fn default_overlap_chars() -> usize {
    DEFAULT_OVERLAP_CHARS
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
        }
    }
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

/// Which files under a `--docs` directory are loaded.
#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec![
        "**/*.pdf".to_string(),
        "**/*.md".to_string(),
        "**/*.txt".to_string(),
    ]
}

/// OpenAI-compatible chat completion endpoint (OpenRouter by default).
#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}
fn default_model() -> String {
    "deepseek/deepseek-chat-v3-0324:free".to_string()
}
fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    1500
}
fn default_timeout_secs() -> u64 {
    60
}
fn default_max_retries() -> u32 {
    2
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// The chunker described by `[chunking]`.
    pub fn chunker(&self) -> Result<Chunker> {
        Chunker::new(self.chunking.max_chars, self.chunking.overlap_chars)
            .context("Invalid [chunking] configuration")
    }

    /// A fresh pipeline with no corpus.
    pub fn pipeline(&self) -> Result<RetrievalPipeline> {
        RetrievalPipeline::new(self.chunker()?, self.retrieval.top_k)
            .context("Invalid [retrieval] configuration")
    }

    pub fn validate(&self) -> Result<()> {
        self.pipeline()?;

        let generation = &self.generation;
        if generation.base_url.trim().is_empty() {
            bail!("generation.base_url must not be empty");
        }
        if generation.model.trim().is_empty() {
            bail!("generation.model must not be empty");
        }
        if !(0.0..=2.0).contains(&generation.temperature) {
            bail!("generation.temperature must be in [0.0, 2.0]");
        }
        if generation.max_tokens == 0 {
            bail!("generation.max_tokens must be >= 1");
        }
        if generation.timeout_secs == 0 {
            bail!("generation.timeout_secs must be >= 1");
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

/// [`load_config`] if `path` exists, otherwise [`Config::minimal`].
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        Ok(Config::minimal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("advisor.toml");
        fs::write(&path, content).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let (_tmp, path) = write_config("");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.chunking.max_chars, 1000);
        assert_eq!(cfg.chunking.overlap_chars, 200);
        assert_eq!(cfg.retrieval.top_k, 3);
        assert_eq!(cfg.generation.model, "deepseek/deepseek-chat-v3-0324:free");
        assert_eq!(cfg.generation.max_tokens, 1500);
        assert!((cfg.generation.temperature - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_partial_sections() {
        let (_tmp, path) = write_config(
            r#"
[chunking]
max_chars = 400

[retrieval]
top_k = 5

[generation]
model = "openai/gpt-4o-mini"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.chunking.max_chars, 400);
        assert_eq!(cfg.chunking.overlap_chars, 200);
        assert_eq!(cfg.retrieval.top_k, 5);
        assert_eq!(cfg.generation.model, "openai/gpt-4o-mini");
        assert_eq!(cfg.generation.base_url, "https://openrouter.ai/api/v1");
    }

    #[test]
    fn test_rejects_overlap_not_below_size() {
        let (_tmp, path) = write_config("[chunking]\nmax_chars = 100\noverlap_chars = 100\n");
        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("overlap"));
    }

    #[test]
    fn test_rejects_zero_top_k() {
        let (_tmp, path) = write_config("[retrieval]\ntop_k = 0\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_rejects_bad_temperature() {
        let (_tmp, path) = write_config("[generation]\ntemperature = 3.5\n");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let (_tmp, path) = write_config("[chunking\nmax_chars = ");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_example_config_parses() {
        let cfg: Config = toml::from_str(include_str!("../config/advisor.example.toml")).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.documents.include_globs.len(), 3);
        assert_eq!(cfg.generation.api_key_env, "OPENROUTER_API_KEY");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_config_or_default(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.retrieval.top_k, 3);
        assert!(load_config(&tmp.path().join("nope.toml")).is_err());
    }
}
