//! Server address handling.
//!
//! Users type anything from `piju` to `https://piju.lan:8080/`.  Everything is
//! normalised into a root URL with a scheme, an explicit port and a trailing
//! slash, so that endpoint paths can be joined onto it.

use url::Url;

use crate::error::ClientResult;

pub const DEFAULT_PORT: u16 = 5000;
pub const PUSH_PATH: &str = "ws";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerHost {
    root: Url,
}

impl ServerHost {
    pub fn parse(input: &str) -> ClientResult<Self> {
        let input = input.trim();
        let with_scheme = if input.starts_with("http://") || input.starts_with("https://") {
            input.to_string()
        } else {
            format!("http://{}", input)
        };

        let mut root = Url::parse(&with_scheme)?;
        // `port()` is None both when absent and when it equals the scheme default.
        if root.port().is_none() && !has_explicit_port(&with_scheme) {
            // Only fails for cannot-be-a-base URLs, which http(s) never are.
            let _ = root.set_port(Some(DEFAULT_PORT));
        }
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        root.set_query(None);
        root.set_fragment(None);

        Ok(Self { root })
    }

    /// Root URL, the poll endpoint.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Push endpoint: same host and port, `ws`/`wss` scheme, fixed path.
    pub fn push_url(&self) -> ClientResult<Url> {
        let mut url = self.root.join(PUSH_PATH)?;
        let scheme = if self.root.scheme() == "https" { "wss" } else { "ws" };
        // http -> ws and https -> wss are both special-to-special switches.
        let _ = url.set_scheme(scheme);
        Ok(url)
    }

    /// Web UI address for the link panel: same scheme and host, no port.
    pub fn web_url(&self) -> Url {
        let mut url = self.root.clone();
        // http(s) URLs always accept a port change.
        let _ = url.set_port(None);
        url.set_path("/");
        url
    }

    /// Command endpoint such as `player/pause`.
    pub fn endpoint(&self, suffix: &str) -> ClientResult<Url> {
        Ok(self.root.join(suffix)?)
    }

    /// Resolve a `CurrentArtwork` reference.  Root-relative paths are served
    /// by this host; absolute URIs are used as-is.
    pub fn resolve_artwork(&self, uri: &str) -> ClientResult<Url> {
        if uri.starts_with('/') {
            return Ok(self.root.join(uri)?);
        }
        match Url::parse(uri) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(self.root.join(uri)?),
            Err(e) => Err(e.into()),
        }
    }
}

fn has_explicit_port(url: &str) -> bool {
    let authority = url
        .split_once("://")
        .map_or(url, |(_, rest)| rest)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    match authority.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

impl std::fmt::Display for ServerHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_gets_scheme_port_and_slash() {
        let host = ServerHost::parse("piju").unwrap();
        assert_eq!(host.root().as_str(), "http://piju:5000/");
    }

    #[test]
    fn test_explicit_port_is_kept() {
        let host = ServerHost::parse("localhost:8080").unwrap();
        assert_eq!(host.root().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_explicit_default_port_is_not_replaced() {
        let host = ServerHost::parse("http://piju:80").unwrap();
        assert_eq!(host.root().as_str(), "http://piju/");
        let host = ServerHost::parse("[::1]").unwrap();
        assert_eq!(host.root().as_str(), "http://[::1]:5000/");
    }

    #[test]
    fn test_full_url() {
        let host = ServerHost::parse("https://piju.lan:8443").unwrap();
        assert_eq!(host.root().as_str(), "https://piju.lan:8443/");
        assert_eq!(host.push_url().unwrap().as_str(), "wss://piju.lan:8443/ws");
    }

    #[test]
    fn test_push_url() {
        let host = ServerHost::parse("192.168.1.20").unwrap();
        assert_eq!(host.push_url().unwrap().as_str(), "ws://192.168.1.20:5000/ws");
    }

    #[test]
    fn test_web_url_drops_port_and_path() {
        let host = ServerHost::parse("piju").unwrap();
        assert_eq!(host.web_url().as_str(), "http://piju/");
        let host = ServerHost::parse("https://piju.lan:8443/api/").unwrap();
        assert_eq!(host.web_url().as_str(), "https://piju.lan/");
    }

    #[test]
    fn test_endpoint() {
        let host = ServerHost::parse("http://piju:5000/").unwrap();
        assert_eq!(
            host.endpoint("player/pause").unwrap().as_str(),
            "http://piju:5000/player/pause"
        );
    }

    #[test]
    fn test_resolve_artwork() {
        let host = ServerHost::parse("piju").unwrap();
        assert_eq!(
            host.resolve_artwork("/artwork/42").unwrap().as_str(),
            "http://piju:5000/artwork/42"
        );
        assert_eq!(
            host.resolve_artwork("https://cdn.example.com/a.jpg").unwrap().as_str(),
            "https://cdn.example.com/a.jpg"
        );
    }

    #[test]
    fn test_garbage_host_is_rejected() {
        assert!(ServerHost::parse("http://[::1").is_err());
    }
}
