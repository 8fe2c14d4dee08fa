use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except secrets have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Google OAuth client credentials.
    pub google: GoogleOAuthConfig,
    /// Object storage bucket/region.
    pub storage: StorageConfig,
    /// Redis connection URL for the session store.
    pub redis_url: String,
    /// SMTP settings; `None` disables outgoing email.
    pub smtp: Option<SmtpConfig>,
}

/// Google OAuth client credentials.
#[derive(Debug, Clone)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Object storage (S3) settings.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
}

/// SMTP settings for the mailer.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// From address, e.g. `Drawstory <hello@drawstory.ai>`.
    pub from: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Required | Default                 |
    /// |------------------------|----------|-------------------------|
    /// | `HOST`                 | no       | `0.0.0.0`               |
    /// | `PORT`                 | no       | `3000`                  |
    /// | `CORS_ORIGINS`         | no       | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `30`                    |
    /// | `JWT_SECRET`           | **yes**  | --                      |
    /// | `JWT_EXPIRY_HOURS`     | no       | `24`                    |
    /// | `GOOGLE_CLIENT_ID`     | **yes**  | --                      |
    /// | `GOOGLE_CLIENT_SECRET` | **yes**  | --                      |
    /// | `S3_BUCKET`            | **yes**  | --                      |
    /// | `S3_REGION`            | no       | `us-east-1`             |
    /// | `REDIS_URL`            | **yes**  | --                      |
    /// | `SMTP_HOST`            | no       | -- (email disabled)     |
    /// | `SMTP_USERNAME`        | no       | empty                   |
    /// | `SMTP_PASSWORD`        | no       | empty                   |
    /// | `SMTP_FROM`            | no       | `hello@drawstory.ai`    |
    ///
    /// # Panics
    ///
    /// Panics when a required variable is missing -- misconfiguration should
    /// fail fast at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let google = GoogleOAuthConfig {
            client_id: std::env::var("GOOGLE_CLIENT_ID")
                .expect("GOOGLE_CLIENT_ID must be set in the environment"),
            client_secret: std::env::var("GOOGLE_CLIENT_SECRET")
                .expect("GOOGLE_CLIENT_SECRET must be set in the environment"),
        };

        let storage = StorageConfig {
            bucket: std::env::var("S3_BUCKET").expect("S3_BUCKET must be set in the environment"),
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };

        let redis_url =
            std::env::var("REDIS_URL").expect("REDIS_URL must be set in the environment");

        let smtp = std::env::var("SMTP_HOST").ok().map(|smtp_host| SmtpConfig {
            host: smtp_host,
            username: std::env::var("SMTP_USERNAME").unwrap_or_default(),
            password: std::env::var("SMTP_PASSWORD").unwrap_or_default(),
            from: std::env::var("SMTP_FROM").unwrap_or_else(|_| "hello@drawstory.ai".into()),
        });

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            google,
            storage,
            redis_url,
            smtp,
        }
    }
}
