use std::net::SocketAddr;

use geekplay_trust::config::{ConfigError, TrustConfig, listen_addr_from_env};

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub trust: TrustConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let trust = TrustConfig::from_env()?;
        let addr = listen_addr_from_env("FORUM_PORT", 3003)?;

        Ok(Self { addr, trust })
    }
}
