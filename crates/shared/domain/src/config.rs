use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level API configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: StorageConfig,
    pub media: MediaConfig,
    pub cors: CorsConfig,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
    pub activity: ActivityConfig,
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
    pub site: SiteConfig,
}

/// Arc-wrapped config, cheap to clone into every subsystem.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    pub ssl: Option<SslConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SslConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// `SurrealDB` connection configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    /// Root credentials; not needed for `mem://`.
    pub credentials: Option<DatabaseCredentials>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseCredentials {
    pub username: String,
    pub password: String,
}

/// Where uploaded files live and under which URL prefix they are served.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub uploads_dir: PathBuf,
    pub public_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub max_upload_bytes: usize,
    /// Exact mimetypes or `type/*` wildcards.
    pub accepted_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Storefront and admin origins.
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Bearer token for admin mutations. Unset means admin routes are open.
    pub admin_token: Option<String>,
}

/// Per-client request budget on `/api/` routes, refilled evenly over `window_secs`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub max_requests: u32,
    pub window_secs: u64,
    /// Key clients by the first `X-Forwarded-For` hop. Only safe behind a trusted proxy.
    pub trust_forwarded_for: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ActivityConfig {
    /// Newest entries kept in the activity log; older ones are pruned as new ones arrive.
    pub retention: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub path: Option<PathBuf>,
    pub json: bool,
}

/// Seeds sample vehicles and brands into an empty catalog.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub happy_customers: u64,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 5000, ssl: None }
    }
}

impl Default for SslConfig {
    fn default() -> Self {
        Self { cert: PathBuf::from("cert.pem"), key: PathBuf::from("key.pem") }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mem://".to_owned(),
            namespace: "autoani".to_owned(),
            database: "catalog".to_owned(),
            credentials: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { uploads_dir: PathBuf::from("uploads"), public_url: "/uploads".to_owned() }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            accepted_types: vec!["image/*".to_owned(), "video/*".to_owned(), "application/pdf".to_owned()],
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self { origins: vec!["http://localhost:3000".to_owned(), "http://localhost:3001".to_owned()] }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { enabled: true, max_requests: 100, window_secs: 15 * 60, trust_forwarded_for: false }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self { retention: 1000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), path: None, json: false }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { happy_customers: 5000 }
    }
}

impl MediaConfig {
    /// Whether `mimetype` matches one of the accepted patterns.
    #[must_use]
    pub fn accepts(&self, mimetype: &str) -> bool {
        let mimetype = mimetype.trim().to_ascii_lowercase();
        self.accepted_types.iter().any(|pattern| {
            let pattern = pattern.trim().to_ascii_lowercase();
            pattern.strip_suffix("/*").map_or(pattern == mimetype, |major| {
                mimetype.split_once('/').is_some_and(|(m, _)| m == major)
            })
        })
    }
}
