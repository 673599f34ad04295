//! Endpoint addresses derived from the configured API base.

use anyhow::{Context, Result};
use url::Url;

/// Resolved API base plus the URLs derived from it.
///
/// The push channel mirrors the transport security of the base:
/// `http` becomes `ws`, `https` becomes `wss`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
    ws: Url,
}

impl Endpoints {
    /// Validate `base`, normalise it through `Url`, and strip trailing slashes.
    pub fn new(base: &str) -> Result<Self> {
        let parsed =
            Url::parse(base.trim()).with_context(|| format!("invalid API base URL: {base}"))?;
        let ws_scheme = match parsed.scheme() {
            "http" => "ws",
            "https" => "wss",
            other => anyhow::bail!("API base must be http or https, got {other}: {base}"),
        };
        if parsed.host_str().is_none() {
            anyhow::bail!("API base URL has no host: {base}");
        }

        let mut ws = parsed.clone();
        ws.set_scheme(ws_scheme)
            .map_err(|()| anyhow::anyhow!("cannot derive {ws_scheme} URL from {base}"))?;
        let ws_path = format!("{}/ws", parsed.path().trim_end_matches('/'));
        ws.set_path(&ws_path);
        ws.set_query(None);
        ws.set_fragment(None);

        Ok(Self {
            base: parsed.as_str().trim_end_matches('/').to_string(),
            ws,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `<base>/<path>`.
    pub fn http_url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub fn upload_url(&self) -> String {
        self.http_url("/upload")
    }

    /// `<ws-scheme>://<host and path of base>/ws`.
    pub fn ws_url(&self) -> String {
        self.ws.to_string()
    }
}
