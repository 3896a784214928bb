use serde::{Deserialize, Serialize};

/// Main configuration structure loaded from sdg_insights.toml and environment variables
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// System-level configuration for the annotator and upload handling
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub annotator_provider: String,
    pub annotator_url: Option<String>,
    pub upload_dir: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            annotator_provider: "lexicon".to_string(),
            annotator_url: None,
            upload_dir: "/tmp".to_string(),
        }
    }
}

/// Pipeline tuning for locating, windowing, and summarizing goal discussions
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sentences taken past a match when no later match bounds the window
    pub window_span: usize,
    /// Upper bound on sentences per goal summary
    pub summary_sentences: usize,
    /// Sentences with this many tokens or more never qualify as matches
    pub max_sentence_tokens: usize,
    /// Historical mode: windows accumulate across goals instead of resetting
    pub carry_over_sentences: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_span: 50,
            summary_sentences: 3,
            max_sentence_tokens: 100,
            carry_over_sentences: false,
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub http_bind: std::net::SocketAddr,
    pub log_level: String,
    pub annotate_timeout_ms: u64,
    pub annotate_retries: u32,
    pub retry_delay_ms: u64,
    pub max_upload_bytes: usize,
    pub http_request_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            http_bind: "127.0.0.1:8055"
                .parse()
                .expect("default bind address should parse"),
            log_level: "sdg_insights=info".to_string(),
            annotate_timeout_ms: 30_000,
            annotate_retries: 3,
            retry_delay_ms: 200,
            max_upload_bytes: 32 * 1024 * 1024,
            http_request_timeout_ms: 120_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            pipeline: PipelineConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses SDG_INSIGHTS_CONFIG environment variable or defaults to "sdg_insights.toml"
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, preferring an explicit config file path over the
    /// SDG_INSIGHTS_CONFIG environment variable
    pub fn load_from(config_override: Option<&str>) -> anyhow::Result<Self> {
        // Load environment variables with smart fallbacks:
        // 1) SDG_ENV_FILE if set
        // 2) ./.env
        // 3) ../.env (repo root when running from crate dir)
        if let Ok(env_path) = std::env::var("SDG_ENV_FILE") {
            let _ = dotenvy::from_path(env_path);
        } else {
            let _ = dotenvy::from_path(".env");
            let core_present = std::env::var("SDG_ANNOTATOR_PROVIDER").is_ok()
                || std::env::var("SDG_HTTP_BIND").is_ok();
            if !core_present {
                let _ = dotenvy::from_path("../.env");
            }
        }

        let config_path = config_override
            .map(str::to_string)
            .or_else(|| std::env::var("SDG_INSIGHTS_CONFIG").ok())
            .unwrap_or_else(|| "sdg_insights.toml".to_string());

        let mut config: Config = if let Ok(content) = std::fs::read_to_string(&config_path) {
            toml::from_str(&content)?
        } else if config_override.is_some() {
            return Err(anyhow::anyhow!("Config file {} not found", config_path));
        } else {
            tracing::warn!("Config file {} not found, using defaults", config_path);
            Self::default()
        };

        // Apply env overrides (env-first)
        if let Ok(provider) = std::env::var("SDG_ANNOTATOR_PROVIDER") {
            config.system.annotator_provider = provider;
        }
        if let Ok(url) = std::env::var("SDG_ANNOTATOR_URL") {
            config.system.annotator_url = Some(url);
        }
        if let Ok(dir) = std::env::var("SDG_UPLOAD_DIR") {
            config.system.upload_dir = dir;
        }
        if let Some(span) = std::env::var("SDG_WINDOW_SPAN")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.pipeline.window_span = span;
        }
        if let Some(n) = std::env::var("SDG_SUMMARY_SENTENCES")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.pipeline.summary_sentences = n;
        }
        if let Some(max) = std::env::var("SDG_MAX_SENTENCE_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.pipeline.max_sentence_tokens = max;
        }
        if let Ok(carry) = std::env::var("SDG_CARRY_OVER_SENTENCES") {
            config.pipeline.carry_over_sentences =
                carry == "1" || carry.eq_ignore_ascii_case("true");
        }

        // Load runtime configuration from environment variables
        config.runtime = RuntimeConfig::load_from_env();

        // Validate and clamp pipeline knobs
        if config.pipeline.window_span == 0 {
            tracing::warn!("window_span 0 is degenerate, clamping to 1");
            config.pipeline.window_span = 1;
        }
        if config.pipeline.summary_sentences == 0 {
            tracing::warn!("summary_sentences 0 would drop every summary, clamping to 1");
            config.pipeline.summary_sentences = 1;
        } else if config.pipeline.summary_sentences > 10 {
            tracing::warn!(
                "summary_sentences {} exceeds max 10, clamping to 10",
                config.pipeline.summary_sentences
            );
            config.pipeline.summary_sentences = 10;
        }
        if config.pipeline.max_sentence_tokens < 2 {
            tracing::warn!(
                "max_sentence_tokens {} rejects every sentence, clamping to 2",
                config.pipeline.max_sentence_tokens
            );
            config.pipeline.max_sentence_tokens = 2;
        }
        if config.runtime.annotate_retries == 0 {
            config.runtime.annotate_retries = 1;
        } else if config.runtime.annotate_retries > 10 {
            tracing::warn!(
                "annotate_retries {} exceeds max 10, clamping to 10",
                config.runtime.annotate_retries
            );
            config.runtime.annotate_retries = 10;
        }

        // Validate provider coherence
        match config.system.annotator_provider.as_str() {
            "lexicon" => {}
            "remote" => {
                if config.system.annotator_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "annotator_provider 'remote' requires annotator_url (or SDG_ANNOTATOR_URL)"
                    ));
                }
            }
            other => tracing::warn!(
                "Unknown annotator provider '{}', falling back to 'lexicon' at startup",
                other
            ),
        }

        Ok(config)
    }
}

impl RuntimeConfig {
    /// Load runtime configuration from environment variables
    pub fn load_from_env() -> Self {
        let mut cfg = Self {
            log_level: std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "sdg_insights=info".to_string()),
            annotate_timeout_ms: std::env::var("SDG_ANNOTATE_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30_000),
            annotate_retries: std::env::var("SDG_ANNOTATE_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            retry_delay_ms: std::env::var("SDG_RETRY_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            max_upload_bytes: std::env::var("SDG_MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(32 * 1024 * 1024),
            http_request_timeout_ms: std::env::var("SDG_HTTP_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120_000),
            ..Self::default()
        };

        if let Ok(v) = std::env::var("SDG_HTTP_BIND")
            && let Ok(bind) = v.parse::<std::net::SocketAddr>()
        {
            cfg.http_bind = bind;
        }

        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_contract() {
        let config = Config::default();
        assert_eq!(config.pipeline.window_span, 50);
        assert_eq!(config.pipeline.summary_sentences, 3);
        assert_eq!(config.pipeline.max_sentence_tokens, 100);
        assert!(!config.pipeline.carry_over_sentences);
        assert_eq!(config.system.annotator_provider, "lexicon");
        assert_eq!(config.system.upload_dir, "/tmp");
        assert_eq!(config.runtime.http_bind.port(), 8055);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[pipeline]\nwindow_span = 10\n").unwrap();
        assert_eq!(config.pipeline.window_span, 10);
        assert_eq!(config.pipeline.summary_sentences, 3);
        assert_eq!(config.system.annotator_provider, "lexicon");
    }

    #[test]
    fn test_config_loading() {
        // Environment-dependent, but the method must not panic either way
        let config = Config::load();
        assert!(config.is_ok() || config.is_err());
    }
}
