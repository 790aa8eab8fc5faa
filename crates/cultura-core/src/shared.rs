//! Configuration shared by the core, the remote clients and the gateway.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::chat::ScoringWeights;
use crate::error::ConfigurationError;
use crate::translation::CacheConfig;

/// Env var naming the TOML config file.
pub const ENV_CONFIG_PATH: &str = "CULTURA_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/cultura.toml";

/// Plain credential env vars, honoured when the prefixed `CULTURA__...` form is absent.
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_BHASHINI_USER_ID: &str = "BHASHINI_USER_ID";
pub const ENV_BHASHINI_API_KEY: &str = "BHASHINI_API_KEY";

/// Retry/timeout policy for the remote translation pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            timeout_secs: 10,
        }
    }
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Remote LLM settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// "live" attempts the remote model; "offline" always answers from the knowledge base.
    pub mode: String,
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            mode: "live".to_string(),
            api_url: "https://api.anthropic.com".to_string(),
            model: "claude-3-5-sonnet-20241022".to_string(),
            max_tokens: 1024,
            timeout_secs: 10,
            api_key: None,
        }
    }
}

/// Endpoints and credentials for the translation services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub bhashini_pipeline_url: String,
    pub bhashini_compute_url: String,
    pub bhashini_pipeline_id: String,
    #[serde(skip_serializing)]
    pub bhashini_user_id: Option<String>,
    #[serde(skip_serializing)]
    pub bhashini_api_key: Option<String>,
    /// Best-effort public lookup endpoint. Empty disables the lookup.
    pub public_lookup_url: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            bhashini_pipeline_url:
                "https://meity-auth.ulcacontrib.org/ulca/apis/v0/model/getModelsPipeline".to_string(),
            bhashini_compute_url: "https://meity-auth.ulcacontrib.org/ulca/apis/v0/model/compute"
                .to_string(),
            bhashini_pipeline_id: "64392f96daac500b55c543cd".to_string(),
            bhashini_user_id: None,
            bhashini_api_key: None,
            public_lookup_url: "https://api.mymemory.translated.net/get".to_string(),
        }
    }
}

impl ServiceSettings {
    /// Both BHASHINI credentials, if present and non-empty.
    pub fn bhashini_credentials(&self) -> Option<(&str, &str)> {
        let user = self.bhashini_user_id.as_deref().filter(|s| !s.trim().is_empty())?;
        let key = self.bhashini_api_key.as_deref().filter(|s| !s.trim().is_empty())?;
        Some((user, key))
    }
}

/// Global application configuration. Load from TOML or env.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    pub app_name: String,
    /// HTTP port for the gateway.
    pub port: u16,
    /// Optional JSON dataset replacing the bundled cultural records.
    #[serde(default)]
    pub data_path: Option<String>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub scoring: ScoringWeights,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub services: ServiceSettings,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_name: "CULTURA".to_string(),
            port: 8001,
            data_path: None,
            cache: CacheConfig::default(),
            retry: RetrySettings::default(),
            scoring: ScoringWeights::default(),
            llm: LlmSettings::default(),
            services: ServiceSettings::default(),
        }
    }
}

impl CoreConfig {
    /// Load config from file and environment. Precedence: `CULTURA__*` env > env `CULTURA_CONFIG`
    /// path (or `config/cultura.toml`) > defaults. Bare credential env vars fill any gaps.
    pub fn load() -> Result<Self, ConfigurationError> {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = Self::load_from(Path::new(&config_path))?;
        cfg.fill_credentials_from_env();
        Ok(cfg)
    }

    /// Like [`CoreConfig::load`] with an explicit file path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigurationError> {
        let builder = config::Config::builder()
            .set_default("app_name", "CULTURA")?
            .set_default("port", 8001_i64)?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix("CULTURA").separator("__"))
            .build()?;

        Ok(built.try_deserialize()?)
    }

    fn fill_credentials_from_env(&mut self) {
        fn env_if_missing(slot: &mut Option<String>, var: &str) {
            if slot.as_deref().map_or(true, |s| s.trim().is_empty()) {
                *slot = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
            }
        }
        env_if_missing(&mut self.llm.api_key, ENV_ANTHROPIC_API_KEY);
        env_if_missing(&mut self.services.bhashini_user_id, ENV_BHASHINI_USER_ID);
        env_if_missing(&mut self.services.bhashini_api_key, ENV_BHASHINI_API_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_observed_constants() {
        let cfg = CoreConfig::default();
        assert_eq!(cfg.cache.max_entries, 1000);
        assert_eq!(cfg.cache.ttl_secs, 3600);
        assert_eq!(cfg.retry.max_retries, 3);
        assert_eq!(cfg.retry.base_delay(), Duration::from_secs(1));
        assert_eq!(cfg.retry.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.scoring.min_score, 25);
        assert_eq!(cfg.llm.max_tokens, 1024);
        assert_eq!(cfg.llm.timeout_secs, 10);
    }

    #[test]
    fn toml_file_overrides_nested_sections() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "app_name = \"CULTURA Test\"\nport = 9100\n\n[cache]\nmax_entries = 5\n\n[scoring]\nmin_score = 40\n"
        )
        .unwrap();

        let cfg = CoreConfig::load_from(file.path()).unwrap();
        assert_eq!(cfg.app_name, "CULTURA Test");
        assert_eq!(cfg.port, 9100);
        assert_eq!(cfg.cache.max_entries, 5);
        assert_eq!(cfg.cache.ttl_secs, 3600);
        assert_eq!(cfg.scoring.min_score, 40);
        assert_eq!(cfg.scoring.exact_weight, 100);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = CoreConfig::load_from(Path::new("/nonexistent/cultura.toml")).unwrap();
        assert_eq!(cfg.port, 8001);
        assert_eq!(cfg.services.bhashini_pipeline_id, "64392f96daac500b55c543cd");
    }

    #[test]
    fn blank_credentials_are_not_credentials() {
        let mut services = ServiceSettings::default();
        services.bhashini_user_id = Some("user".into());
        services.bhashini_api_key = Some("  ".into());
        assert!(services.bhashini_credentials().is_none());
        services.bhashini_api_key = Some("key".into());
        assert_eq!(services.bhashini_credentials(), Some(("user", "key")));
    }
}
