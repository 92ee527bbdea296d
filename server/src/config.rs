use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Default location of the persisted snapshot.
pub const DEFAULT_STATE_PATH: &str = "data/state.json";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// JSON snapshot written by save and read by load.
    pub state_path: PathBuf,
    /// Save after every accepted roll and every reset.
    pub autosave: bool,
    /// Load the snapshot into memory before serving.
    pub restore_on_start: bool,
    /// Fixed dice seed; OS entropy when unset.
    pub dice_seed: Option<u64>,
    pub http_body_limit_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 5000,
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            autosave: false,
            restore_on_start: true,
            dice_seed: None,
            http_body_limit_bytes: Some(16 * 1024),
        }
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
