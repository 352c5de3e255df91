use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::errors::ConfigError;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Root server the referral walk starts from, as an IP literal or `ip:port`.
    #[serde(default = "default_root_server")]
    pub root_server: String,

    /// Port used for every server learned from a referral.
    #[serde(default = "default_upstream_port")]
    pub upstream_port: u16,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Extra attempts per upstream exchange after a timeout.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Upper bound on upstream queries in a single referral walk.
    #[serde(default = "default_max_referral_hops")]
    pub max_referral_hops: usize,

    /// Upper bound on nested CNAME / nameserver-name resolutions.
    #[serde(default = "default_max_chase_depth")]
    pub max_chase_depth: usize,

    #[serde(default = "default_true")]
    pub drop_additional_on_cname: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_server: default_root_server(),
            upstream_port: default_upstream_port(),
            query_timeout_ms: default_query_timeout_ms(),
            retries: default_retries(),
            max_referral_hops: default_max_referral_hops(),
            max_chase_depth: default_max_chase_depth(),
            drop_additional_on_cname: true,
        }
    }
}

impl ResolverConfig {
    pub fn root_server_addr(&self) -> Result<SocketAddr, ConfigError> {
        let root = self.root_server.trim();
        if let Ok(addr) = root.parse::<SocketAddr>() {
            return Ok(addr);
        }
        root.parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.upstream_port))
            .map_err(|_| {
                ConfigError::Validation(format!("Invalid root server address '{}'", root))
            })
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }
}

fn default_root_server() -> String {
    // a.root-servers.net
    "198.41.0.4".to_string()
}

fn default_upstream_port() -> u16 {
    53
}

fn default_query_timeout_ms() -> u64 {
    2000
}

fn default_retries() -> u32 {
    1
}

fn default_max_referral_hops() -> usize {
    32
}

fn default_max_chase_depth() -> usize {
    8
}

fn default_true() -> bool {
    true
}
