use anyhow::Context;
use std::net::SocketAddr;

pub(crate) const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub(crate) struct ServiceConfig {
    pub(crate) bind_addr: SocketAddr,
    /// Single allowed browser origin; any origin when unset.
    pub(crate) cors_origin: Option<String>,
}

impl ServiceConfig {
    /// Reads `MINTVERSE_BIND_ADDR` and `MINTVERSE_CORS_ORIGIN`.
    pub(crate) fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("MINTVERSE_BIND_ADDR")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind_addr
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid MINTVERSE_BIND_ADDR: {bind_addr}"))?;

        let cors_origin = lookup("MINTVERSE_CORS_ORIGIN")
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .filter(|value| !value.is_empty());

        Ok(Self { bind_addr, cors_origin })
    }
}
