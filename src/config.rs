//! Runtime configuration, layered from a TOML file with CLI overrides on top.

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tinta", about = "A personal blog server")]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding the database and uploaded images
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadsConfig,
    pub auth: AuthConfig,
    pub mail: MailConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on request bodies; post forms carry image uploads.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct UploadsConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// Username for the admin account seeded on first start.
    pub admin_username: String,
    /// Password for the seeded admin. When unset, a random one is generated
    /// and logged once at startup.
    pub admin_password: Option<String>,
    pub session_hours: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password: None,
            session_hours: 720,
        }
    }
}

/// Outbound relay for the contact form. When `relay_url` is unset, contact
/// messages are logged instead of sent.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct MailConfig {
    pub relay_url: Option<String>,
    pub auth_token: Option<String>,
    pub sender: Option<String>,
    pub recipient: Option<String>,
}

impl Config {
    /// Read the config file if one exists, then apply CLI overrides and
    /// fill in the paths that default to the data directory.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            toml::from_str(&std::fs::read_to_string(&config_path)?)?
        } else {
            Config::default()
        };

        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }

        config.database.path.get_or_insert(data_dir.join("tinta.db"));
        config.uploads.path.get_or_insert(data_dir.join("uploads"));

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        match &cli.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::home_dir()
                .expect("Could not determine home directory")
                .join(".tinta"),
        }
    }

    /// Database file location. Always set once `load` has run.
    pub fn db_path(&self) -> &PathBuf {
        self.database.path.as_ref().expect("config not loaded")
    }

    /// Directory uploaded images are written to. Always set once `load`
    /// has run.
    pub fn uploads_path(&self) -> &PathBuf {
        self.uploads.path.as_ref().expect("config not loaded")
    }
}
