use std::path::PathBuf;
use std::time::Duration;

use crate::store::models::TriggerCase;

/// What a non-admin sees when invoking an admin-only command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialPolicy {
    /// Drop the command without any reply.
    Silent,
    /// Answer with a short "admins only" message.
    Notify,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub openai_api_key: String,
    pub openai_model: String,
    /// Base URL of an OpenAI-compatible API, without the trailing `/chat/completions`
    pub openai_base_url: String,

    /// JSON file holding the trigger => response pairs
    pub replies_path: PathBuf,
    pub trigger_case: TriggerCase,

    /// Upper bound for a single completion call
    pub completion_timeout: Duration,
    pub denial: DenialPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let trigger_case = match get("REPLY_TRIGGER_CASE").as_deref() {
            None | Some("sensitive") => TriggerCase::Sensitive,
            Some("insensitive") => TriggerCase::Insensitive,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "REPLY_TRIGGER_CASE",
                    value: other.to_string(),
                })
            }
        };

        let denial = match get("PERMISSION_DENIAL").as_deref() {
            None | Some("silent") => DenialPolicy::Silent,
            Some("notify") => DenialPolicy::Notify,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "PERMISSION_DENIAL",
                    value: other.to_string(),
                })
            }
        };

        let timeout_secs = match get("COMPLETION_TIMEOUT_SECS") {
            None => 30,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "COMPLETION_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
        };

        Ok(Self {
            bot_token: required("BOT_TOKEN")?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: get("OPENAI_MODEL").unwrap_or_else(|| "gpt-3.5-turbo".to_string()),
            openai_base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
                .trim_end_matches('/')
                .to_string(),
            replies_path: get("REPLIES_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("replies.json")),
            trigger_case,
            completion_timeout: Duration::from_secs(timeout_secs),
            denial,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secrets_are_set() {
        let config =
            AppConfig::from_lookup(lookup(&[("BOT_TOKEN", "123:abc"), ("OPENAI_API_KEY", "sk-x")]))
                .unwrap();

        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.openai_model, "gpt-3.5-turbo");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.replies_path, PathBuf::from("replies.json"));
        assert_eq!(config.trigger_case, TriggerCase::Sensitive);
        assert_eq!(config.completion_timeout, Duration::from_secs(30));
        assert_eq!(config.denial, DenialPolicy::Silent);
    }

    #[test]
    fn missing_bot_token_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&[("OPENAI_API_KEY", "sk-x")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BOT_TOKEN")));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = AppConfig::from_lookup(lookup(&[("BOT_TOKEN", "t"), ("OPENAI_API_KEY", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn optional_settings_are_parsed() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("OPENAI_API_KEY", "k"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1/"),
            ("REPLY_TRIGGER_CASE", "insensitive"),
            ("COMPLETION_TIMEOUT_SECS", "5"),
            ("PERMISSION_DENIAL", "notify"),
            ("REPLIES_FILE", "/data/replies.json"),
        ]))
        .unwrap();

        assert_eq!(config.openai_base_url, "http://localhost:8080/v1");
        assert_eq!(config.trigger_case, TriggerCase::Insensitive);
        assert_eq!(config.completion_timeout, Duration::from_secs(5));
        assert_eq!(config.denial, DenialPolicy::Notify);
        assert_eq!(config.replies_path, PathBuf::from("/data/replies.json"));
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let err = AppConfig::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("OPENAI_API_KEY", "k"),
            ("PERMISSION_DENIAL", "loud"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PERMISSION_DENIAL", .. }));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = AppConfig::from_lookup(lookup(&[
            ("BOT_TOKEN", "t"),
            ("OPENAI_API_KEY", "k"),
            ("COMPLETION_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "COMPLETION_TIMEOUT_SECS", .. }));
    }
}
