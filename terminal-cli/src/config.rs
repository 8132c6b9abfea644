use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use bitcli_client::RpcConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

const DEFAULT_LOG_LEVEL: &str = "info";

/// On-disk settings; anything left out falls back to the defaults.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedConfig {
    pub rpc_host: Option<String>,
    pub rpc_port: Option<u16>,
    pub rpc_user: Option<String>,
    pub rpc_password: Option<String>,
    pub log_level: Option<String>,
}

/// Resolved startup settings.
#[derive(Debug)]
pub struct Settings {
    pub rpc: RpcConfig,
    pub log_level: Level,
}

impl PersistedConfig {
    pub fn resolve(&self) -> Result<Settings> {
        let defaults = RpcConfig::default();
        let rpc = RpcConfig {
            host: self.rpc_host.clone().unwrap_or(defaults.host),
            port: self.rpc_port.unwrap_or(defaults.port),
            user: self.rpc_user.clone().unwrap_or(defaults.user),
            password: self.rpc_password.clone().unwrap_or(defaults.password),
        };
        let level = self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL);
        let log_level = Level::from_str(level).map_err(|_| anyhow!("invalid log_level {level:?}"))?;
        Ok(Settings { rpc, log_level })
    }

    /// Write the resolved values back so the file lists every knob.
    pub fn fill_from(&mut self, settings: &Settings) {
        self.rpc_host = Some(settings.rpc.host.clone());
        self.rpc_port = Some(settings.rpc.port);
        self.rpc_user = Some(settings.rpc.user.clone());
        self.rpc_password = Some(settings.rpc.password.clone());
        self.log_level = Some(settings.log_level.to_string().to_lowercase());
    }
}

/// Load, resolve and persist the config in one go.
pub fn load_settings() -> Result<Settings> {
    let mut cfg = load_config()?.unwrap_or_default();
    let settings = cfg.resolve()?;
    cfg.fill_from(&settings);
    save_config(&cfg)?;
    Ok(settings)
}

/// `Ok(None)` when there is no config file yet; a file that exists but does not
/// parse is an error rather than something to overwrite.
pub fn load_config() -> Result<Option<PersistedConfig>> {
    let Some(path) = config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = serde_json::from_slice(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(Some(cfg))
}

pub fn save_config(cfg: &PersistedConfig) -> Result<()> {
    if let Some(path) = config_path() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(path, data)?;
    }
    Ok(())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("org", "bitcli", "bitcli")
}

fn config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.json"))
}

pub fn log_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().join("bitcli.log"))
}

/// Route `tracing` output to the log file; the terminal belongs to the UI.
pub fn init_logging(level: Level) -> Result<Option<PathBuf>> {
    let (writer, path) = match log_path() {
        Some(path) => {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open {}", path.display()))?;
            (BoxMakeWriter::new(Mutex::new(file)), Some(path))
        }
        None => (BoxMakeWriter::new(std::io::sink), None),
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(path)
}
