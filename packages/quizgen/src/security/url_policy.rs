//! Network-safety policy for article URLs (SSRF protection).

use std::collections::HashSet;
use std::net::IpAddr;

use ipnet::IpNet;
use tracing::warn;
use url::Url;

use crate::error::{SecurityError, SecurityResult};

/// Validates URLs before any network call is made.
///
/// Rejects non-http(s) schemes, loopback and metadata hostnames, and any
/// literal IP inside a private, loopback or link-local range.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    allowed_schemes: HashSet<String>,
    blocked_hosts: HashSet<String>,
    blocked_cidrs: Vec<IpNet>,
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn cidr(s: &str) -> IpNet {
    s.parse().expect("static CIDR literal")
}

impl UrlValidator {
    /// Create a new URL validator with default security rules.
    pub fn new() -> Self {
        Self {
            allowed_schemes: ["http", "https"].into_iter().map(String::from).collect(),
            blocked_hosts: [
                "localhost",
                "127.0.0.1",
                "0.0.0.0",
                "::1",
                "metadata.google.internal",
                "metadata.gke.internal",
                "metadata",
                "instance-data",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            blocked_cidrs: vec![
                cidr("0.0.0.0/8"),
                cidr("10.0.0.0/8"),
                cidr("172.16.0.0/12"),
                cidr("192.168.0.0/16"),
                cidr("169.254.0.0/16"), // Link-local / cloud metadata
                cidr("127.0.0.0/8"),    // Loopback
                cidr("::1/128"),        // IPv6 loopback
                cidr("fc00::/7"),       // IPv6 private
                cidr("fe80::/10"),      // IPv6 link-local
            ],
        }
    }

    /// Block an additional host.
    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into().to_lowercase());
        self
    }

    /// Block an additional CIDR range.
    pub fn block_cidr(mut self, cidr: IpNet) -> Self {
        self.blocked_cidrs.push(cidr);
        self
    }

    /// Validate a URL for safety. Never touches the network.
    pub fn validate(&self, url: &str) -> SecurityResult<Url> {
        let parsed = Url::parse(url.trim())?;

        if !self.allowed_schemes.contains(parsed.scheme()) {
            warn!(url = %url, scheme = parsed.scheme(), "Rejected URL scheme");
            return Err(SecurityError::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed
            .host_str()
            .ok_or(SecurityError::NoHost)?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_lowercase();

        if self.blocked_hosts.contains(&host) || host.ends_with(".localhost") {
            warn!(url = %url, host = %host, "Rejected blocked host");
            return Err(SecurityError::BlockedHost(host));
        }

        if let Ok(ip) = host.parse::<IpAddr>() {
            let ip = match ip {
                IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
                v4 => v4,
            };
            if self.blocked_cidrs.iter().any(|cidr| cidr.contains(&ip)) {
                warn!(url = %url, ip = %ip, "Rejected private network address");
                return Err(SecurityError::BlockedCidr(ip.to_string()));
            }
        }

        Ok(parsed)
    }
}
