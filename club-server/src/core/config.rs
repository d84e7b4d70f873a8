use std::path::PathBuf;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | ./work_dir | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP port |
/// | ENVIRONMENT | development | development / staging / production |
/// | DATABASE_PATH | `<WORK_DIR>/database/club.db` | SQLite file |
/// | LOG_LEVEL | info | Default log level (RUST_LOG wins) |
/// | LOG_JSON | false in development | JSON log lines |
/// | LOG_DIR | `<WORK_DIR>/logs` in production | File log directory |
/// | LOG_RETENTION_DAYS | 14 | Application log retention |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | DUES_MONTHLY_FEE | 10.00 | Fee of a freshly initialized dues month |
/// | BOOTSTRAP_ADMIN_USERNAME | admin | Seeded admin when no user exists |
/// | BOOTSTRAP_ADMIN_NAME | Administrator | Display name of the seeded admin |
/// | BOOTSTRAP_ADMIN_PASSWORD | (random) | Credential of the seeded admin |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/club HTTP_PORT=8080 cargo run -p club-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and logs
    pub work_dir: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// Explicit database file; defaults under `work_dir`
    pub database_path: Option<String>,
    pub log_level: String,
    pub log_json: bool,
    pub log_dir: Option<String>,
    pub log_retention_days: u64,
    pub request_timeout_ms: u64,
    /// Amount of a dues month when a member's year is first initialized
    pub dues_monthly_fee: f64,
    pub bootstrap_admin: BootstrapAdmin,
}

/// Admin account seeded into an empty user table
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub display_name: String,
    pub password: Option<String>,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("display_name", &self.display_name)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into());
        let is_production = environment == "production";

        let log_dir = std::env::var("LOG_DIR").ok().or_else(|| {
            is_production.then(|| PathBuf::from(&work_dir).join("logs").to_string_lossy().into_owned())
        });

        Self {
            http_port: env_parse("HTTP_PORT").unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(is_production),
            log_dir,
            log_retention_days: env_parse("LOG_RETENTION_DAYS").unwrap_or(14),
            request_timeout_ms: env_parse("REQUEST_TIMEOUT_MS").unwrap_or(30000),
            dues_monthly_fee: env_parse::<f64>("DUES_MONTHLY_FEE")
                .filter(|f| f.is_finite() && *f >= 0.0)
                .unwrap_or(10.0),
            bootstrap_admin: BootstrapAdmin {
                username: std::env::var("BOOTSTRAP_ADMIN_USERNAME")
                    .unwrap_or_else(|_| "admin".into()),
                display_name: std::env::var("BOOTSTRAP_ADMIN_NAME")
                    .unwrap_or_else(|_| "Administrator".into()),
                password: std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok(),
            },
            environment,
            work_dir,
        }
    }

    /// Override the working directory (and drop any explicit database path)
    ///
    /// Used by tests to point the server at a temp dir.
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = None;
        config.log_dir = None;
        config
    }

    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// Resolved SQLite file path
    pub fn database_file(&self) -> PathBuf {
        match &self.database_path {
            Some(p) => PathBuf::from(p),
            None => self.database_dir().join("club.db"),
        }
    }

    /// Create the work dir and the database file's parent directory
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.work_dir)?;
        if let Some(parent) = self.database_file().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
