use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "ourstreet.toml",
    "config/ourstreet.toml",
    "crates/config/ourstreet.toml",
    "../ourstreet.toml",
    "../config/ourstreet.toml",
    "backend/ourstreet.toml",
    "backend/config/ourstreet.toml",
];

/// Agent used when no `voice.agent_id` is configured.
pub const DEFAULT_AGENT_ID: &str = "agent_8701kfjzrrhcf408keqd06k3pryw";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://ourstreet.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Settings for the bearer tokens that identify a session.
///
/// ```
/// use ourstreet_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.issuer, "ourstreet");
/// assert_eq!(auth.token_ttl_seconds, 86_400);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_secret")]
    pub jwt_secret: String,
    #[serde(default = "AuthConfig::default_issuer")]
    pub issuer: String,
    #[serde(default = "AuthConfig::default_audience")]
    pub audience: String,
    #[serde(default = "AuthConfig::default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    fn default_secret() -> String {
        "ourstreet-development-secret-change-me".to_string()
    }

    fn default_issuer() -> String {
        "ourstreet".to_string()
    }

    fn default_audience() -> String {
        "ourstreet-web".to_string()
    }

    const fn default_token_ttl() -> u64 {
        86_400
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Self::default_secret(),
            issuer: Self::default_issuer(),
            audience: Self::default_audience(),
            token_ttl_seconds: Self::default_token_ttl(),
        }
    }
}

/// Voice agent the client connects to, plus telemetry polling cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "VoiceConfig::default_agent_id")]
    pub agent_id: String,
    #[serde(default = "VoiceConfig::default_agent_name")]
    pub agent_name: String,
    #[serde(default = "VoiceConfig::default_agent_description")]
    pub agent_description: String,
    #[serde(default = "VoiceConfig::default_connection_type")]
    pub connection_type: String,
    #[serde(default = "VoiceConfig::default_volume_poll_interval")]
    pub volume_poll_interval_ms: u64,
}

impl VoiceConfig {
    fn default_agent_id() -> String {
        DEFAULT_AGENT_ID.to_string()
    }

    fn default_agent_name() -> String {
        "City Assistant".to_string()
    }

    fn default_agent_description() -> String {
        "Your AI-powered civic assistant".to_string()
    }

    fn default_connection_type() -> String {
        "webrtc".to_string()
    }

    const fn default_volume_poll_interval() -> u64 {
        50
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            agent_id: Self::default_agent_id(),
            agent_name: Self::default_agent_name(),
            agent_description: Self::default_agent_description(),
            connection_type: Self::default_connection_type(),
            volume_poll_interval_ms: Self::default_volume_poll_interval(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use ourstreet_config::load;
///
/// std::env::remove_var("OURSTREET_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let token_ttl = i64::try_from(defaults.auth.token_ttl_seconds).unwrap_or(i64::MAX);
    let poll_interval = i64::try_from(defaults.voice.volume_poll_interval_ms).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("http.allowed_origins", Vec::<String>::new())?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default("database.max_connections", i64::from(defaults.database.max_connections))?
        .set_default("auth.jwt_secret", defaults.auth.jwt_secret.clone())?
        .set_default("auth.issuer", defaults.auth.issuer.clone())?
        .set_default("auth.audience", defaults.auth.audience.clone())?
        .set_default("auth.token_ttl_seconds", token_ttl)?
        .set_default("voice.agent_id", defaults.voice.agent_id.clone())?
        .set_default("voice.agent_name", defaults.voice.agent_name.clone())?
        .set_default("voice.agent_description", defaults.voice.agent_description.clone())?
        .set_default("voice.connection_type", defaults.voice.connection_type.clone())?
        .set_default("voice.volume_poll_interval_ms", poll_interval)?;

    let environment_overrides = config::Environment::with_prefix("OURSTREET").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("OURSTREET_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via OURSTREET_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let mut config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    if config.auth.token_ttl_seconds > i64::MAX as u64 {
        config.auth.token_ttl_seconds = i64::MAX as u64;
    }

    if config.voice.agent_id.trim().is_empty() {
        config.voice.agent_id = DEFAULT_AGENT_ID.to_string();
    }

    debug!(
        address = %config.http.address,
        port = config.http.port,
        database = %config.database.url,
        agent = %config.voice.agent_id,
        "loaded backend configuration"
    );
    Ok(config)
}
