use clap::Parser;
use std::path::PathBuf;

/// WireGuard status dashboard
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Listen address (e.g. 0.0.0.0:8123)
    #[arg(long, env = "WG_DASH_BIND", default_value = "0.0.0.0:8123")]
    pub bind: String,

    /// Number of tokio worker threads
    #[arg(long, env = "WG_DASH_WORKERS", default_value_t = 2)]
    pub workers: usize,

    /// Public keys are truncated to this many characters in responses
    #[arg(long, env = "WG_DASH_KEY_DISPLAY_LEN", default_value_t = 44)]
    pub key_display_len: usize,

    /// Seconds a fetched snapshot stays valid before the next `wg show` run
    #[arg(long, env = "WG_DASH_CACHE_TTL", default_value_t = 5)]
    pub cache_ttl: u64,

    /// Directory holding wg0.conf with the peer name annotations
    #[arg(long, env = "WG_DASH_CONFIG_DIR", default_value = "/wg-config")]
    pub config_dir: PathBuf,

    /// Directory with the static dashboard files, served at / when present
    #[arg(long, env = "WG_DASH_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,
}

impl Args {
    pub fn peer_config_path(&self) -> PathBuf {
        self.config_dir.join("wg0.conf")
    }
}
