//! Repository layout and environment configuration
//!
//! The metadata directory lives at `<root>/.twig`:
//!
//! ```text
//! .twig/
//!   HEAD            ref: refs/heads/<current branch>
//!   index           staged additions, removals and untracked names
//!   objects/xx/...  zlib-compressed blobs and commits
//!   refs/heads/...  one file per branch holding its commit id
//! ```

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Timelike};

/// Name of the metadata directory inside the working tree
pub const METADATA_DIR: &str = ".twig";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

/// Message of the root commit
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Overrides the timestamp recorded on new commits
pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

/// Timestamp of the root commit: the Unix epoch seen from UTC-8
const EPOCH_TIMESTAMP: &str = "Wed, 31 Dec 1969 16:00:00 -0800";

/// The fixed timestamp every root commit carries
pub fn epoch_timestamp() -> anyhow::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(EPOCH_TIMESTAMP).context("Invalid epoch timestamp")
}

/// Timestamp for a new commit
///
/// Reads `TWIG_COMMIT_DATE` (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`) and falls back
/// to the current local time. Sub-second precision is dropped because commits
/// only record whole seconds.
pub fn commit_timestamp() -> DateTime<FixedOffset> {
    let timestamp = std::env::var(COMMIT_DATE_ENV).ok().and_then(|date_str| {
        DateTime::parse_from_rfc2822(&date_str)
            .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
            .ok()
    });

    let timestamp = timestamp.unwrap_or_else(|| chrono::Local::now().fixed_offset());
    timestamp.with_nanosecond(0).unwrap_or(timestamp)
}
