/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, PRODUCT_NAME, CDN, Auth 設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - dev/test 環境の判定 (DATABASE_URL の一致で判断)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Third-party payment API credentials.
#[derive(Clone)]
pub struct CryptoPayCredentials {
    pub app_id: String,
    pub app_key: String,
}

impl fmt::Debug for CryptoPayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // only the last 4 chars of a long key are printed
        let chars: Vec<char> = self.app_key.chars().collect();
        let tail: String = match chars.len() {
            n if n > 8 => chars[n - 4..].iter().collect(),
            _ => String::new(),
        };
        f.debug_struct("CryptoPayCredentials")
            .field("app_id", &self.app_id)
            .field("app_key", &format_args!("***{tail}"))
            .finish()
    }
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub dev_env_database_url: Option<String>,
    pub test_env_database_url: Option<String>,
    pub database_max_connections: u32,

    pub product_name: String,
    pub oss_bucket_cdn: String,

    pub auth_token_secret: String,
    pub auth_token_ttl_seconds: u64,

    pub cryptopay: Option<CryptoPayCredentials>,

    pub cors_allowed_origins: Vec<String>,
    pub request_body_limit_bytes: usize,
    pub request_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print secrets or connection strings
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("product_name", &self.product_name)
            .field("oss_bucket_cdn", &self.oss_bucket_cdn)
            .field("auth_token_ttl_seconds", &self.auth_token_ttl_seconds)
            .field("cryptopay", &self.cryptopay)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("request_body_limit_bytes", &self.request_body_limit_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(v) if !v.trim().is_empty() => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        _ => Ok(default),
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (env vars in production, a map in tests).
    pub fn from_source<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = parse_or(get("PORT"), "PORT", 3000)?;
        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        let database_url =
            non_empty(get("DATABASE_URL")).ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let dev_env_database_url = non_empty(get("DEV_ENV_DATABASE_URL"));
        let test_env_database_url = non_empty(get("TEST_ENV_DATABASE_URL"));
        let database_max_connections =
            parse_or(get("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 5)?;

        let product_name =
            non_empty(get("PRODUCT_NAME")).ok_or(ConfigError::Missing("PRODUCT_NAME"))?;
        let oss_bucket_cdn = get("OSS_BUCKET_CDN").unwrap_or_default();

        let auth_token_secret =
            non_empty(get("AUTH_TOKEN_SECRET")).ok_or(ConfigError::Missing("AUTH_TOKEN_SECRET"))?;
        let auth_token_ttl_seconds =
            parse_or(get("AUTH_TOKEN_TTL_SECONDS"), "AUTH_TOKEN_TTL_SECONDS", 86_400)?; // 1 day
        if auth_token_ttl_seconds == 0 {
            return Err(ConfigError::Invalid("AUTH_TOKEN_TTL_SECONDS"));
        }

        let cryptopay = match (
            non_empty(get("CRYPTOPAY_APP_ID")),
            non_empty(get("CRYPTOPAY_APP_KEY")),
        ) {
            (Some(app_id), Some(app_key)) => Some(CryptoPayCredentials { app_id, app_key }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("CRYPTOPAY_APP_KEY")),
            (None, Some(_)) => return Err(ConfigError::Missing("CRYPTOPAY_APP_ID")),
        };

        let cors_allowed_origins = get("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_body_limit_bytes = parse_or(
            get("REQUEST_BODY_LIMIT_BYTES"),
            "REQUEST_BODY_LIMIT_BYTES",
            1024 * 1024,
        )?;
        let request_timeout_seconds =
            parse_or(get("REQUEST_TIMEOUT_SECONDS"), "REQUEST_TIMEOUT_SECONDS", 30)?;

        Ok(Self {
            addr,
            app_env,
            database_url,
            dev_env_database_url,
            test_env_database_url,
            database_max_connections,
            product_name,
            oss_bucket_cdn,
            auth_token_secret,
            auth_token_ttl_seconds,
            cryptopay,
            cors_allowed_origins,
            request_body_limit_bytes,
            request_timeout_seconds,
        })
    }

    /// True when the app is wired to the dev or the test database.
    pub fn is_dev_or_test_env(&self) -> bool {
        let matches = |candidate: &Option<String>| {
            candidate
                .as_deref()
                .is_some_and(|url| url == self.database_url)
        };
        matches(&self.dev_env_database_url) || matches(&self.test_env_database_url)
    }
}
