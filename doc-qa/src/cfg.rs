//! Runtime configuration loaded from environment variables.

use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::error::QaError;

pub const DEFAULT_ASSETS_ROOT: &str = "assets";
pub const DEFAULT_MAX_WORDS: usize = 512;
pub const DEFAULT_OVERLAP_SENTENCES: usize = 50;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;

/// Config bag for the pipeline. All fields have defaults via `from_env`.
#[derive(Clone, Debug, PartialEq)]
pub struct QaConfig {
    /// Directory that holds one sub-directory per product.
    pub assets_root: PathBuf,
    /// Word budget per window.
    pub max_words: usize,
    /// Trailing sentences of a closed window that seed the next one.
    pub overlap_sentences: usize,
    /// How long a loaded corpus stays cached.
    pub cache_ttl: Duration,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            assets_root: PathBuf::from(DEFAULT_ASSETS_ROOT),
            max_words: DEFAULT_MAX_WORDS,
            overlap_sentences: DEFAULT_OVERLAP_SENTENCES,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl QaConfig {
    /// Build from environment variables with defaults.
    ///
    /// - `ASSETS_ROOT` (default `assets`)
    /// - `CHUNK_MAX_WORDS` (default 512, must be > 0)
    /// - `CHUNK_OVERLAP_SENTENCES` (default 50)
    /// - `CORPUS_CACHE_TTL_SECS` (default 300, must be > 0)
    ///
    /// # Errors
    /// [`QaError::Config`] for unparsable or out-of-range values.
    pub fn from_env() -> Result<Self, QaError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`QaConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QaError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cfg = Self {
            assets_root: env(&lookup, "ASSETS_ROOT", DEFAULT_ASSETS_ROOT).into(),
            max_words: parse(&lookup, "CHUNK_MAX_WORDS", DEFAULT_MAX_WORDS)?,
            overlap_sentences: parse(&lookup, "CHUNK_OVERLAP_SENTENCES", DEFAULT_OVERLAP_SENTENCES)?,
            cache_ttl: Duration::from_secs(parse(
                &lookup,
                "CORPUS_CACHE_TTL_SECS",
                DEFAULT_CACHE_TTL_SECS,
            )?),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), QaError> {
        if self.max_words == 0 {
            return Err(QaError::Config("CHUNK_MAX_WORDS must be > 0".into()));
        }
        if self.cache_ttl.is_zero() {
            return Err(QaError::Config("CORPUS_CACHE_TTL_SECS must be > 0".into()));
        }
        Ok(())
    }
}

fn env<F>(lookup: &F, k: &str, dflt: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(k)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| dflt.to_string())
}

fn parse<F, T>(lookup: &F, k: &str, dflt: T) -> Result<T, QaError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(k).filter(|v| !v.trim().is_empty()) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| QaError::Config(format!("{k} has an invalid value: {v:?}"))),
        None => Ok(dflt),
    }
}
