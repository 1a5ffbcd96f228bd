use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

/// Deployment environment; selects log format and default verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Dev,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub env: Environment,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            shutdown_grace_secs: default_shutdown_grace(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_shutdown_grace() -> u64 { 2 }

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. When empty it is assembled from the discrete fields below.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default)]
    pub db_name: String,
    #[serde(default)]
    pub db_username: String,
    #[serde(default)]
    pub db_password: String,
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            host: String::new(),
            port: default_db_port(),
            db_name: String::new(),
            db_username: String::new(),
            db_password: String::new(),
            sslmode: default_sslmode(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

const SSL_MODES: [&str; 6] = ["disable", "allow", "prefer", "require", "verify-ca", "verify-full"];

fn default_db_port() -> u16 { 5432 }
fn default_sslmode() -> String { "disable".into() }
fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("cannot read config file {path}: {e}"))?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// Fill `url` when the file gives neither a URL nor a host: `DATABASE_URL` wins.
    pub fn normalize_from_env(&mut self) {
        if self.url.trim().is_empty() && self.host.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    /// Connection URL, either given verbatim or assembled from the discrete fields.
    pub fn connection_url(&self) -> String {
        if !self.url.trim().is_empty() {
            return self.url.clone();
        }
        let credentials = if self.db_password.is_empty() {
            urlencoding::encode(&self.db_username).into_owned()
        } else {
            format!(
                "{}:{}",
                urlencoding::encode(&self.db_username),
                urlencoding::encode(&self.db_password)
            )
        };
        format!(
            "postgres://{}@{}:{}/{}?sslmode={}",
            credentials, self.host, self.port, self.db_name, self.sslmode
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            if self.host.trim().is_empty() {
                return Err(anyhow!("database.host is empty; set it in the config file or provide DATABASE_URL"));
            }
            if self.db_name.trim().is_empty() {
                return Err(anyhow!("database.db_name is empty"));
            }
            if self.db_username.trim().is_empty() {
                return Err(anyhow!("database.db_username is empty"));
            }
            if self.port == 0 {
                return Err(anyhow!("database.port must be within 1..=65535"));
            }
            if !SSL_MODES.contains(&self.sslmode.as_str()) {
                return Err(anyhow!("database.sslmode must be one of {}", SSL_MODES.join(", ")));
            }
        } else {
            let lower = self.url.to_lowercase();
            if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
                return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
            }
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
env = "prod"

[server]
host = "0.0.0.0"
port = 9000

[database]
host = "db"
port = 5433
db_name = "subs"
db_username = "app"
db_password = "p@ss word"
sslmode = "require"
"#;

    #[test]
    fn parses_full_file() {
        let mut cfg = parse(SAMPLE).expect("parse");
        cfg.normalize_and_validate().expect("valid");
        assert_eq!(cfg.env, Environment::Prod);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.worker_threads, Some(4));
        assert_eq!(cfg.server.shutdown_grace_secs, 2);
        assert_eq!(cfg.database.max_connections, 10);
    }

    #[test]
    fn connection_url_encodes_credentials() {
        let cfg = parse(SAMPLE).expect("parse");
        assert_eq!(
            cfg.database.connection_url(),
            "postgres://app:p%40ss%20word@db:5433/subs?sslmode=require"
        );
    }

    #[test]
    fn explicit_url_is_used_verbatim() {
        let cfg = parse("[database]\nurl = \"postgres://u:p@h:5432/d\"\n").expect("parse");
        assert_eq!(cfg.database.connection_url(), "postgres://u:p@h:5432/d");
        cfg.database.validate().expect("valid");
    }

    #[test]
    fn env_defaults_to_dev() {
        let cfg = parse("").expect("parse");
        assert_eq!(cfg.env, Environment::Dev);
        assert_eq!(cfg.env.as_str(), "dev");
        assert_eq!(cfg.server.port, 8080);
    }

    #[test]
    fn rejects_unknown_env() {
        assert!(parse("env = \"staging\"").is_err());
    }

    #[test]
    fn rejects_bad_sslmode() {
        let mut db = DatabaseConfig {
            host: "h".into(),
            db_name: "d".into(),
            db_username: "u".into(),
            sslmode: "sometimes".into(),
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
        db.sslmode = "prefer".into();
        assert!(db.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_pool_bounds() {
        let db = DatabaseConfig {
            url: "postgres://u@h/d".into(),
            min_connections: 5,
            max_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(db.validate().is_err());
    }

    #[test]
    fn rejects_zero_port() {
        let mut cfg = parse("[server]\nport = 0\n").expect("parse");
        assert!(cfg.server.normalize().is_err());
    }
}
