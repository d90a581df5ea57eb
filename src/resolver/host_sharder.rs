//! CDN host selection.
//!
//! Asset URLs are protocol-relative (`//host/path`). With hash sharding the
//! host is picked by path length, and the first digit in the host's first
//! label becomes a `{n}` placeholder the client loader fills from its own
//! host pool.

use crate::constants::HOST_PLACEHOLDER;

/// Maps absolute deployment paths onto configured CDN hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostSharder {
    hosts: Vec<String>,
}

impl HostSharder {
    /// Sharder over `hosts`. Trailing slashes are trimmed and blank hosts dropped.
    #[must_use]
    pub fn new(hosts: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().trim_end_matches('/').to_string())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Whether any host is configured.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.hosts.is_empty()
    }

    /// Configured hosts in order.
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    /// Turn `absolute_path` into a protocol-relative URL.
    ///
    /// Returns the path unchanged when no host is configured.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use facade_cli::resolver::host_sharder::HostSharder;
    ///
    /// let sharder = HostSharder::new(["a1.cdn.com", "a2.cdn.com"]);
    /// assert_eq!(sharder.shard("/x.js", false), "//a1.cdn.com/x.js");
    /// // "/x.js".len() == 5, 5 % 2 == 1
    /// assert_eq!(sharder.shard("/x.js", true), "//a{n}.cdn.com/x.js");
    /// ```
    #[must_use]
    pub fn shard(&self, absolute_path: &str, use_hash_sharding: bool) -> String {
        if self.hosts.is_empty() {
            return absolute_path.to_string();
        }

        let host = if use_hash_sharding {
            let index = absolute_path.chars().count() % self.hosts.len();
            with_placeholder(&self.hosts[index])
        } else {
            self.hosts[0].clone()
        };

        if absolute_path.starts_with('/') {
            format!("//{host}{absolute_path}")
        } else {
            format!("//{host}/{absolute_path}")
        }
    }
}

/// Replace the first ASCII digit of the host's first label with the placeholder.
fn with_placeholder(host: &str) -> String {
    let label_end = host.find('.').unwrap_or(host.len());
    match host[..label_end].find(|c: char| c.is_ascii_digit()) {
        Some(i) => format!("{}{HOST_PLACEHOLDER}{}", &host[..i], &host[i + 1..]),
        None => host.to_string(),
    }
}
