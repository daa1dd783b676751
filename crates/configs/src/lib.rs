use std::net::SocketAddr;
use std::path::Path;

use anyhow::anyhow;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "0.0.0.0".into(), port: 3000, worker_threads: Some(4) }
    }
}

/// Embedded key-value store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Create the store file when it does not exist yet.
    #[serde(default = "default_true")]
    pub create_if_absent: bool,
    /// Fill a freshly created store with generated merchants.
    #[serde(default = "default_true")]
    pub seed_on_create: bool,
    #[serde(default = "default_seed_merchants")]
    pub seed_merchants: usize,
    #[serde(default = "default_seed_members")]
    pub seed_members_per_merchant: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            create_if_absent: true,
            seed_on_create: true,
            seed_merchants: default_seed_merchants(),
            seed_members_per_merchant: default_seed_members(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { per_page: default_per_page() }
    }
}

fn default_storage_path() -> String { "data/merchants.redb".to_string() }
fn default_true() -> bool { true }
fn default_seed_merchants() -> usize { 5 }
fn default_seed_members() -> usize { 200 }
fn default_per_page() -> u32 { 20 }

/// `$CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    AppConfig::from_toml_str(&content)
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(content)?;
        Ok(cfg)
    }

    /// Load `config.toml` (or `$CONFIG_PATH`) when it exists, otherwise start from defaults
    /// and overlay environment variables. The result is always validated.
    pub fn load_or_env() -> Result<Self> {
        Self::load_or_env_at(&config_path())
    }

    pub fn load_or_env_at(path: &str) -> Result<Self> {
        let mut cfg = if Path::new(path).exists() {
            load_from_file(path)?
        } else {
            let mut cfg = AppConfig::default();
            cfg.apply_env();
            cfg
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Overlay `SERVER_HOST`, `SERVER_PORT`, `TOKIO_WORKER_THREADS` and `STORAGE_PATH`.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Ok(path) = std::env::var("STORAGE_PATH") {
            self.storage.path = path;
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.storage.validate()?;
        self.pagination.validate()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.server.host, self.server.port).parse()?)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "0.0.0.0".to_string();
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

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.path.trim().is_empty() {
            return Err(anyhow!("storage.path is empty; set it in config.toml or via STORAGE_PATH"));
        }
        Ok(())
    }
}

impl PaginationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.per_page) {
            return Err(anyhow!("pagination.per_page must be within 1..=100"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let mut cfg = AppConfig::from_toml_str("").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.storage.path, "data/merchants.redb");
        assert!(cfg.storage.create_if_absent);
        assert_eq!(cfg.storage.seed_merchants, 5);
        assert_eq!(cfg.storage.seed_members_per_merchant, 200);
        assert_eq!(cfg.pagination.per_page, 20);
    }

    #[test]
    fn partial_sections_fill_missing_fields() {
        let cfg = AppConfig::from_toml_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8081

            [storage]
            path = "/tmp/m.redb"
            seed_on_create = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.bind_addr().unwrap().port(), 8081);
        assert_eq!(cfg.storage.path, "/tmp/m.redb");
        assert!(!cfg.storage.seed_on_create);
        assert!(cfg.storage.create_if_absent);
    }

    #[test]
    fn rejects_invalid_values() {
        let mut cfg = AppConfig::from_toml_str("[pagination]\nper_page = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::from_toml_str("[storage]\npath = \"  \"\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());

        let mut cfg = AppConfig::from_toml_str("[server]\nhost = \"\"\nport = 0\n").unwrap();
        assert!(cfg.normalize_and_validate().is_err());
    }

    #[test]
    fn file_is_read_and_validated_when_present() {
        let path = std::env::temp_dir().join(format!("merchant_cfg_{}.toml", std::process::id()));
        std::fs::write(&path, "[pagination]\nper_page = 50\n").unwrap();
        let cfg = AppConfig::load_or_env_at(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.pagination.per_page, 50);
        assert_eq!(cfg.server.worker_threads, Some(4));

        std::fs::write(&path, "[pagination]\nper_page = 500\n").unwrap();
        assert!(AppConfig::load_or_env_at(path.to_str().unwrap()).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = AppConfig::load_or_env_at("/nonexistent/merchant-config.toml").unwrap();
        assert_eq!(cfg.pagination.per_page, 20);
        assert!(cfg.storage.seed_on_create);
    }

    #[test]
    fn zero_worker_threads_fall_back() {
        let mut cfg = AppConfig::from_toml_str("[server]\nhost = \"\"\nport = 80\nworker_threads = 0\n").unwrap();
        cfg.normalize_and_validate().unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.worker_threads, Some(4));
    }
}
