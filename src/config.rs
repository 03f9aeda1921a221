use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use argon2::{Algorithm, Argon2, Params, Version};
use config::{Config, File};
use serde::Deserialize;

use crate::api::MAX_SESSION_TTL;

const DEFAULT_CONFIG_PATH: &str = "settings.yml";
const APP_PORT_ENV: &str = "APP_PORT";
const SEED_DEMO_DATA_ENV: &str = "SEED_DEMO_DATA";

pub struct Settings {
    pub port: u16,
    pub session_ttl: Duration,
    pub session_sweep_interval: Duration,
    pub seed_demo_data: bool,
    pub public_dir: String,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
}

impl Settings {
    /// Password hasher built from the configured argon2id cost
    pub fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(
            self.hash_memory_kib,
            self.hash_iterations,
            self.hash_parallelism,
            None,
        )
        .map_err(|e| anyhow!("invalid password hashing parameters: {e}"))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for Settings {
    fn default() -> Self {
        FileConfig::default().into()
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct FileConfig {
    app_port: u16,
    session_ttl_secs: u64,
    session_sweep_interval_secs: u64,
    seed_demo_data: bool,
    public_dir: String,
    hash_memory_kib: u32,
    hash_iterations: u32,
    hash_parallelism: u32,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            app_port: 8080,
            session_ttl_secs: 24 * 60 * 60,
            session_sweep_interval_secs: 10 * 60,
            seed_demo_data: false,
            public_dir: "public".to_string(),
            hash_memory_kib: Params::DEFAULT_M_COST,
            hash_iterations: Params::DEFAULT_T_COST,
            hash_parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl From<FileConfig> for Settings {
    fn from(config: FileConfig) -> Self {
        Settings {
            port: config.app_port,
            session_ttl: Duration::from_secs(config.session_ttl_secs),
            session_sweep_interval: Duration::from_secs(config.session_sweep_interval_secs),
            seed_demo_data: config.seed_demo_data,
            public_dir: config.public_dir,
            hash_memory_kib: config.hash_memory_kib,
            hash_iterations: config.hash_iterations,
            hash_parallelism: config.hash_parallelism,
        }
    }
}

fn load_file_config() -> Result<FileConfig> {
    let settings = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_PATH).required(false))
        .build()
        .map_err(|e| anyhow!("Failed to read config file: {e}"))?;

    settings
        .try_deserialize::<FileConfig>()
        .map_err(|e| anyhow!("Failed to deserialize config file: {e}"))
}

/// Try to parse env variable. If it's not set, return None. If it's invalid, treat it as an error.
fn try_from_env<T, F>(env_var: &str, f: F) -> Result<Option<T>>
where
    F: FnOnce(String) -> Result<T>,
{
    match std::env::var(env_var) {
        Ok(raw) => {
            let val = f(raw).map_err(|_| anyhow!("Failed to parse {}", env_var))?;
            Ok(Some(val))
        }
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(_) => bail!("Could not read {env_var} from env"),
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("`{other}` is not a boolean"),
    }
}

/// Load configuration from the optional config file, then apply env overrides.
pub fn load() -> Result<Settings> {
    let mut config = load_file_config()?;

    if let Some(port) = try_from_env(APP_PORT_ENV, |env_str| {
        env_str.parse::<u16>().map_err(|e| e.into())
    })? {
        config.app_port = port;
    } else {
        tracing::debug!("{APP_PORT_ENV} is not set, using {}", config.app_port);
    }

    if let Some(seed) = try_from_env(SEED_DEMO_DATA_ENV, |env_str| parse_flag(&env_str))? {
        config.seed_demo_data = seed;
    }

    validate(&config)?;

    Ok(config.into())
}

fn validate(config: &FileConfig) -> Result<()> {
    let max_ttl = MAX_SESSION_TTL.as_secs();
    if config.session_ttl_secs == 0 || config.session_ttl_secs > max_ttl {
        bail!("session_ttl_secs must be between 1 and {max_ttl}");
    }
    if config.session_sweep_interval_secs == 0 {
        bail!("session_sweep_interval_secs must be positive");
    }

    Ok(())
}
