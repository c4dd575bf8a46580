use std::env;
use std::fmt;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub sled_path: String,
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
}

#[derive(Clone)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Quiet period after a burst of local mutations before one push fires.
    pub debounce_ms: u64,
    /// Period of the background reconciliation pass.
    pub interval_secs: u64,
    /// A successful sync older than this counts as stale.
    pub staleness_secs: u64,
    /// Attempts per remote operation before giving up on this cycle.
    pub max_retries: u32,
    /// First backoff delay; doubles per attempt.
    pub retry_base_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 2000,
            interval_secs: 60,
            staleness_secs: 3600,
            max_retries: 3,
            retry_base_ms: 500,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("log_level", &self.log_level)
            .field("enable_file_logs", &self.enable_file_logs)
            .field("log_dir", &self.log_dir)
            .field("sled_path", &self.sled_path)
            .field("remote", &self.remote)
            .field("sync", &self.sync)
            .finish()
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"***REDACTED***")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            sled_path: env_or("SLED_PATH", "./data/progress.sled"),
            remote: RemoteConfig {
                base_url: env_or("REMOTE_BASE_URL", ""),
                api_key: env_or("REMOTE_API_KEY", ""),
                timeout_secs: env_or_parse("REMOTE_TIMEOUT_SECS", 15_u64),
            },
            sync: SyncConfig {
                debounce_ms: env_or_parse("SYNC_DEBOUNCE_MS", 2000_u64),
                interval_secs: env_or_parse("SYNC_INTERVAL_SECS", 60_u64),
                staleness_secs: env_or_parse("SYNC_STALENESS_SECS", 3600_u64),
                max_retries: env_or_parse("SYNC_MAX_RETRIES", 3_u32),
                retry_base_ms: env_or_parse("SYNC_RETRY_BASE_MS", 500_u64),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use super::*;

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    fn managed_keys() -> &'static [&'static str] {
        &[
            "RUST_LOG",
            "SLED_PATH",
            "SYNC_DEBOUNCE_MS",
            "SYNC_MAX_RETRIES",
            "REMOTE_TIMEOUT_SECS",
        ]
    }

    fn clear_keys(keys: &[&str]) {
        for key in keys {
            env::remove_var(key);
        }
    }

    #[test]
    fn loads_defaults_when_missing() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let cfg = Config::from_env();
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.sync.debounce_ms, 2000);
        assert_eq!(cfg.sync.max_retries, 3);
        assert_eq!(cfg.remote.timeout_secs, 15);
    }

    #[test]
    fn parses_numeric_values() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("SYNC_DEBOUNCE_MS", "250");
        env::set_var("SYNC_MAX_RETRIES", "5");

        let cfg = Config::from_env();
        assert_eq!(cfg.sync.debounce_ms, 250);
        assert_eq!(cfg.sync.max_retries, 5);
    }

    #[test]
    fn invalid_values_fall_back() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        env::set_var("SYNC_DEBOUNCE_MS", "soon");
        env::set_var("REMOTE_TIMEOUT_SECS", "x");

        let cfg = Config::from_env();
        assert_eq!(cfg.sync.debounce_ms, 2000);
        assert_eq!(cfg.remote.timeout_secs, 15);
    }

    #[test]
    fn debug_redacts_api_key() {
        let _guard = env_lock().lock().expect("env lock");
        clear_keys(managed_keys());

        let mut cfg = Config::from_env();
        cfg.remote.api_key = "secret".to_string();
        let rendered = format!("{:?}", cfg);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
