use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 8080;

/// Where the HTTP server binds. An explicit port (from `serve <port>`) wins
/// over `PORT`; `BIND_HOST` picks the interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env(port_override: Option<u16>) -> Self {
        Self::from_lookup(port_override, |key| env::var(key).ok())
    }

    fn from_lookup(port_override: Option<u16>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = port_override
            .or_else(|| lookup("PORT").and_then(|v| parse_or_warn("PORT", &v)))
            .unwrap_or(DEFAULT_PORT);
        let host = lookup("BIND_HOST")
            .and_then(|v| parse_or_warn("BIND_HOST", &v))
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        Self { host, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(key, raw, "ignoring unparsable environment value");
    }
    parsed
}
