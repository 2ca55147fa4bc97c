//! Quiz configuration: TOML file, then environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const ENV_API_URL: &str = "QUIZ_API_URL";
pub const ENV_API_TOKEN: &str = "QUIZ_API_TOKEN";
pub const ENV_LANGUAGE: &str = "QUIZ_LANGUAGE";
pub const ENV_SECONDS_PER_QUESTION: &str = "QUIZ_SECONDS_PER_QUESTION";
pub const ENV_TIME_LIMIT_SECS: &str = "QUIZ_TIME_LIMIT_SECS";
pub const ENV_DB_URL: &str = "QUIZ_DB_URL";

/// Top-level quiz configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub api: ApiConfig,
    pub quiz: QuizSettings,
    pub timer: TimerConfig,
    pub storage: StorageConfig,
}

/// Evaluation service connection.
///
/// Note: custom Debug impl masks the token.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            token: None,
            request_timeout_secs: 300,
        }
    }
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// What to ask the question service for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    pub language: String,
    pub num_questions: u32,
    /// Share of multiple-choice questions; the rest are open-text.
    pub mcq_weight: f64,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            language: "French".to_string(),
            num_questions: 10,
            mcq_weight: 0.5,
        }
    }
}

/// Countdown length. `total_secs` wins over `seconds_per_question`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub seconds_per_question: u64,
    pub total_secs: Option<u64>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            seconds_per_question: 60,
            total_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_url: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_url: "sqlite://quiz.sqlite3".to_string(),
        }
    }
}

impl QuizConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for malformed TOML or out-of-range values.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if given (defaults otherwise), then apply `QUIZ_*` variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or if a
    /// resulting value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a numeric variable does not parse.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(token) = get(ENV_API_TOKEN) {
            self.api.token = Some(token);
        }
        if let Some(language) = get(ENV_LANGUAGE) {
            self.quiz.language = language;
        }
        if let Some(raw) = get(ENV_SECONDS_PER_QUESTION) {
            self.timer.seconds_per_question = parse_secs(ENV_SECONDS_PER_QUESTION, &raw)?;
        }
        if let Some(raw) = get(ENV_TIME_LIMIT_SECS) {
            self.timer.total_secs = Some(parse_secs(ENV_TIME_LIMIT_SECS, &raw)?);
        }
        if let Some(db_url) = get(ENV_DB_URL) {
            self.storage.db_url = db_url;
        }
        Ok(())
    }

    /// Check value ranges and the base URL.
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base_url()?;
        if !(0.0..=1.0).contains(&self.quiz.mcq_weight) {
            return Err(ConfigError::InvalidValue {
                key: "quiz.mcq_weight",
                raw: self.quiz.mcq_weight.to_string(),
            });
        }
        if self.quiz.num_questions == 0 {
            return Err(ConfigError::InvalidValue {
                key: "quiz.num_questions",
                raw: "0".to_string(),
            });
        }
        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "api.request_timeout_secs",
                raw: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Parsed evaluation service base URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `api.base_url` is not a URL.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&self.api.base_url)?)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    /// Countdown length for a quiz of `question_count` questions.
    #[must_use]
    pub fn time_limit(&self, question_count: usize) -> Duration {
        let secs = self.timer.total_secs.unwrap_or_else(|| {
            let count = u64::try_from(question_count).unwrap_or(u64::MAX);
            self.timer.seconds_per_question.saturating_mul(count)
        });
        Duration::from_secs(secs)
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_apply_to_missing_sections() {
        let config = QuizConfig::from_toml_str("[quiz]\nlanguage = \"English\"\n").unwrap();
        assert_eq!(config.quiz.language, "English");
        assert_eq!(config.quiz.num_questions, 10);
        assert_eq!(config.api.request_timeout_secs, 300);
        assert_eq!(config.storage.db_url, "sqlite://quiz.sqlite3");
        assert_eq!(config.time_limit(5), Duration::from_secs(300));
    }

    #[test]
    fn fixed_total_overrides_per_question_limit() {
        let config = QuizConfig::from_toml_str("[timer]\ntotal_secs = 90\n").unwrap();
        assert_eq!(config.time_limit(20), Duration::from_secs(90));
    }

    #[test]
    fn environment_overrides_file_values() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_URL, "https://grader.example.test"),
            (ENV_API_TOKEN, "secret"),
            (ENV_SECONDS_PER_QUESTION, "30"),
            (ENV_LANGUAGE, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = QuizConfig::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.api.base_url, "https://grader.example.test");
        assert_eq!(config.api.token.as_deref(), Some("secret"));
        assert_eq!(config.quiz.language, "French");
        assert_eq!(config.time_limit(2), Duration::from_secs(60));
    }

    #[test]
    fn bad_numeric_override_is_rejected() {
        let mut config = QuizConfig::default();
        let err = config
            .apply_overrides(|key| (key == ENV_TIME_LIMIT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key: ENV_TIME_LIMIT_SECS, .. }
        ));
    }

    #[test]
    fn out_of_range_weight_fails_validation() {
        let err = QuizConfig::from_toml_str("[quiz]\nmcq_weight = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "quiz.mcq_weight", .. }));
    }

    #[test]
    fn invalid_base_url_fails_validation() {
        let err = QuizConfig::from_toml_str("[api]\nbase_url = \"not a url\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl(_)));
    }

    #[test]
    fn debug_masks_the_token() {
        let mut config = QuizConfig::default();
        config.api.token = Some("super-secret".into());
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }
}
