use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cors::CorsPolicy;
use crate::engine::{DictionaryLoader, EngineHandle, EngineLoader};

/// Production origin allowed to read responses cross-origin.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://kana2chat.pages.dev";
/// Reading dictionary fetched on first use.
pub const DEFAULT_DICT_URL: &str = "https://kana2chat.pages.dev/dict/readings.tsv";
/// Pause between streamed character events.
pub const DEFAULT_STREAM_DELAY_MS: u64 = 10;

/// Initialize dotenv and structured tracing based on RUST_LOG.
///
/// - Supports an explicit env file path via ENV_FILE or DOTENV_PATH
/// - Falls back to default .env discovery
/// - Logs the source used
pub fn init_tracing() {
    let mut env_source: String = "none".into();
    for key in ["ENV_FILE", "DOTENV_PATH"] {
        if let Ok(p) = std::env::var(key) {
            let p = p.trim();
            if !p.is_empty()
                && std::path::Path::new(p).is_file()
                && dotenvy::from_filename(p).is_ok()
            {
                env_source = format!("{p} ({key})");
                break;
            }
        }
    }

    if env_source == "none" {
        if let Ok(path) = dotenvy::dotenv() {
            env_source = path.display().to_string();
        }
    }

    // Initialize tracing (respects RUST_LOG potentially provided by the env file)
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".into());
    let subscriber = fmt().with_env_filter(EnvFilter::new(filter)).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    tracing::info!("Environment loaded from: {}", env_source);
}

/// Runtime settings, read from the environment.
///
/// Environment:
/// - BIND_ADDR                        -> listen address (default 0.0.0.0:8088)
/// - KANA2CHAT_ALLOWED_ORIGIN         -> the single CORS origin
/// - KANA2CHAT_DICT_URL               -> reading dictionary (http(s) URL or local path)
/// - KANA2CHAT_STREAM_DELAY_MS        -> pause between streamed characters (u64)
/// - KANA2CHAT_HTTP_TIMEOUT_SECONDS   -> dictionary download timeout (u64)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub allowed_origin: String,
    pub dict_url: String,
    pub stream_delay: Duration,
    pub http_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8088".into(),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.into(),
            dict_url: DEFAULT_DICT_URL.into(),
            stream_delay: Duration::from_millis(DEFAULT_STREAM_DELAY_MS),
            http_timeout: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();
        Self {
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            allowed_origin: get("KANA2CHAT_ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            dict_url: get("KANA2CHAT_DICT_URL").unwrap_or(defaults.dict_url),
            stream_delay: get("KANA2CHAT_STREAM_DELAY_MS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.stream_delay),
            http_timeout: get("KANA2CHAT_HTTP_TIMEOUT_SECONDS")
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs),
        }
    }
}

/// Build the HTTP client used for the dictionary download.
pub fn build_http_client(config: &ServiceConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.http_timeout {
        builder = builder.timeout(timeout);
    }
    // User-Agent for observability
    builder = builder.user_agent(format!("kana2chat/{}", env!("CARGO_PKG_VERSION")));
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

/// Shared application state used by the HTTP server and handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EngineHandle>,
    pub cors: CorsPolicy,
    pub stream_delay: Duration,
}

impl AppState {
    /// State backed by the dictionary engine described by `config`.
    pub fn from_config(config: &ServiceConfig) -> anyhow::Result<Self> {
        let loader = DictionaryLoader::new(build_http_client(config), config.dict_url.clone());
        let cors = CorsPolicy::new(&config.allowed_origin)?;
        Ok(Self::with_loader(Arc::new(loader), cors).with_stream_delay(config.stream_delay))
    }

    pub fn with_loader(loader: Arc<dyn EngineLoader>, cors: CorsPolicy) -> Self {
        Self {
            engine: Arc::new(EngineHandle::new(loader)),
            cors,
            stream_delay: Duration::from_millis(DEFAULT_STREAM_DELAY_MS),
        }
    }

    pub fn with_stream_delay(mut self, delay: Duration) -> Self {
        self.stream_delay = delay;
        self
    }
}

/// Current Unix time in seconds.
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs()
}
