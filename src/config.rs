use crate::checklist::DEFAULT_OPTIONS_PER_GROUP;
use crate::seed::check_word_count;
use crate::shamir::ShareScheme;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuizConfig {
    pub options_per_group: usize,
    /// One quiz group for every this many words.
    pub words_per_check: usize,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            options_per_group: DEFAULT_OPTIONS_PER_GROUP,
            words_per_check: 3,
        }
    }
}

impl QuizConfig {
    pub fn number_of_checks(&self, total_words: usize) -> usize {
        total_words / self.words_per_check.max(1)
    }
}

/// Fees and minimums in CSPR.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub cspr_transfer_fee: f64,
    pub min_cspr_transfer: f64,
    pub token_transfer_fee: f64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            cspr_transfer_fee: 0.1,
            min_cspr_transfer: 2.5,
            token_transfer_fee: 1.0,
        }
    }
}

/// Built once at startup and handed to whatever needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub share_scheme: ShareScheme,
    pub quiz: QuizConfig,
    pub default_word_count: usize,
    /// Lets the keyphrase check pass without answers. Development only.
    pub debug_bypass: bool,
    pub fees: FeeConfig,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            share_scheme: ShareScheme::default(),
            quiz: QuizConfig::default(),
            default_word_count: 12,
            debug_bypass: false,
            fees: FeeConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {}: {}", key, value))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        if Path::new(".env").exists() {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from defaults overridden by whatever `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(v) = lookup("SHARE_TOTAL") {
            config.share_scheme.total_shares = parse("SHARE_TOTAL", &v)?;
        }
        if let Some(v) = lookup("SHARE_THRESHOLD") {
            config.share_scheme.threshold = parse("SHARE_THRESHOLD", &v)?;
        }
        if let Some(v) = lookup("SHARE_VERSION") {
            config.share_scheme.version = parse("SHARE_VERSION", &v)?;
        }
        if let Some(v) = lookup("WORDLIST_LANGUAGE") {
            config.share_scheme.language = parse("WORDLIST_LANGUAGE", &v)?;
        }
        if let Some(v) = lookup("QUIZ_OPTIONS") {
            config.quiz.options_per_group = parse("QUIZ_OPTIONS", &v)?;
        }
        if let Some(v) = lookup("QUIZ_WORDS_PER_CHECK") {
            config.quiz.words_per_check = parse("QUIZ_WORDS_PER_CHECK", &v)?;
        }
        if let Some(v) = lookup("RECOVERY_WORDS") {
            config.default_word_count = parse("RECOVERY_WORDS", &v)?;
        }
        if let Some(v) = lookup("DEBUG_ENV") {
            config.debug_bypass = parse("DEBUG_ENV", &v)?;
        }
        if let Some(v) = lookup("CSPR_TRANSFER_FEE") {
            config.fees.cspr_transfer_fee = parse("CSPR_TRANSFER_FEE", &v)?;
        }
        if let Some(v) = lookup("MIN_CSPR_TRANSFER") {
            config.fees.min_cspr_transfer = parse("MIN_CSPR_TRANSFER", &v)?;
        }
        if let Some(v) = lookup("TOKEN_TRANSFER_FEE") {
            config.fees.token_transfer_fee = parse("TOKEN_TRANSFER_FEE", &v)?;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.share_scheme
            .validate()
            .context("invalid share configuration")?;
        check_word_count(self.default_word_count).context("invalid RECOVERY_WORDS")?;
        if self.quiz.words_per_check == 0 {
            anyhow::bail!("QUIZ_WORDS_PER_CHECK must be at least 1");
        }
        Ok(())
    }
}
