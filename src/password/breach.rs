//! Breach lookup against the Pwned Passwords range API.
//!
//! Uses the k-anonymity model: only the first five hex characters of the
//! password's SHA-1 hash leave the machine.  The API answers with every
//! known hash suffix in that range and the comparison happens locally.
//!
//! Network access is behind the `breach-check` cargo feature.  Without
//! it, `default_checker` returns a checker that always reports `Unknown`.

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

use crate::errors::Result;

/// Outcome of a breach lookup, stored inside credential annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BreachStatus {
    /// The password appears in known breaches this many times.
    Breached { occurrences: u64 },
    /// The password is not in the breach corpus.
    NotFound,
    /// No lookup was made or it did not complete.
    Unknown,
}

impl BreachStatus {
    pub fn is_breached(&self) -> bool {
        matches!(self, Self::Breached { .. })
    }
}

/// Something that can tell whether a password has been breached.
pub trait BreachChecker {
    fn check(&self, password: &str) -> Result<BreachStatus>;
}

/// A checker that never touches the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineChecker;

impl BreachChecker for OfflineChecker {
    fn check(&self, _password: &str) -> Result<BreachStatus> {
        Ok(BreachStatus::Unknown)
    }
}

/// The checker the CLI should use for this build.
pub fn default_checker() -> Box<dyn BreachChecker> {
    #[cfg(feature = "breach-check")]
    {
        Box::new(PwnedPasswords::default())
    }
    #[cfg(not(feature = "breach-check"))]
    {
        Box::new(OfflineChecker)
    }
}

/// Uppercase hex SHA-1 of `password`, split into (5-char prefix, suffix).
pub fn hash_range(password: &str) -> (String, String) {
    let digest = Sha1::digest(password.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02X}")).collect();
    let (prefix, suffix) = hex.split_at(5);
    (prefix.to_string(), suffix.to_string())
}

/// Find `suffix` in a range response body (`SUFFIX:COUNT` per line).
///
/// Padding entries with a count of zero count as not found.
pub fn parse_range_response(body: &str, suffix: &str) -> BreachStatus {
    for line in body.lines() {
        let Some((candidate, count)) = line.trim().split_once(':') else {
            continue;
        };
        if !candidate.eq_ignore_ascii_case(suffix) {
            continue;
        }
        return match count.trim().parse::<u64>() {
            Ok(0) => BreachStatus::NotFound,
            Ok(occurrences) => BreachStatus::Breached { occurrences },
            Err(_) => BreachStatus::Unknown,
        };
    }
    BreachStatus::NotFound
}

#[cfg(feature = "breach-check")]
pub use online::PwnedPasswords;

#[cfg(feature = "breach-check")]
mod online {
    use std::time::Duration;

    use tracing::debug;

    use super::{hash_range, parse_range_response, BreachChecker, BreachStatus};
    use crate::errors::{PassVaultError, Result};

    const DEFAULT_ENDPOINT: &str = "https://api.pwnedpasswords.com/range";

    /// HTTP client for `api.pwnedpasswords.com`.
    #[derive(Debug, Clone)]
    pub struct PwnedPasswords {
        endpoint: String,
        timeout: Duration,
    }

    impl Default for PwnedPasswords {
        fn default() -> Self {
            Self {
                endpoint: DEFAULT_ENDPOINT.to_string(),
                timeout: Duration::from_secs(10),
            }
        }
    }

    impl PwnedPasswords {
        /// Point the checker at a different range endpoint (e.g. a mirror).
        pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
            Self {
                endpoint: endpoint.into(),
                ..Self::default()
            }
        }
    }

    impl BreachChecker for PwnedPasswords {
        fn check(&self, password: &str) -> Result<BreachStatus> {
            let (prefix, suffix) = hash_range(password);
            let url = format!("{}/{prefix}", self.endpoint.trim_end_matches('/'));
            debug!(%url, "querying breach range");

            let agent: ureq::Agent = ureq::Agent::config_builder()
                .timeout_global(Some(self.timeout))
                .build()
                .into();

            let mut response = agent
                .get(&url)
                .header(
                    "User-Agent",
                    &format!("passvault/{}", env!("CARGO_PKG_VERSION")),
                )
                .header("Add-Padding", "true")
                .call()
                .map_err(|e| PassVaultError::BreachCheckFailed(e.to_string()))?;

            let body = response
                .body_mut()
                .read_to_string()
                .map_err(|e| PassVaultError::BreachCheckFailed(format!("reading response: {e}")))?;

            Ok(parse_range_response(&body, &suffix))
        }
    }
}
