//! Hybrid Logical Clock timestamps for `created_at` / `updated_at`.
//!
//! Physical milliseconds plus a logical counter, so two edits made on the same
//! device within one millisecond still order strictly, and a device whose wall
//! clock lags behind a peer never produces an `updated_at` older than state it
//! has already observed.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

/// A Hybrid Logical Clock timestamp.
///
/// Ordered by `wall_time`, then `logical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HybridTimestamp {
    /// Milliseconds since the Unix epoch.
    wall_time: u64,
    /// Counter disambiguating events within the same millisecond.
    logical: u32,
}

fn physical_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

impl HybridTimestamp {
    /// Creates a timestamp at the current wall time.
    #[must_use]
    pub fn now() -> Self {
        Self {
            wall_time: physical_now(),
            logical: 0,
        }
    }

    /// Creates a timestamp from components.
    #[must_use]
    pub const fn new(wall_time: u64, logical: u32) -> Self {
        Self { wall_time, logical }
    }

    /// Creates a timestamp at an explicit wall time with a zero counter.
    #[must_use]
    pub const fn from_millis(wall_time: u64) -> Self {
        Self::new(wall_time, 0)
    }

    /// Milliseconds since the Unix epoch.
    #[must_use]
    pub const fn wall_time(&self) -> u64 {
        self.wall_time
    }

    /// Logical counter.
    #[must_use]
    pub const fn logical(&self) -> u32 {
        self.logical
    }

    /// Next timestamp for a local edit. Always strictly greater than `self`.
    #[must_use]
    pub fn tick(&self) -> Self {
        let now = physical_now();
        if now > self.wall_time {
            Self::from_millis(now)
        } else {
            Self::new(self.wall_time, self.logical.saturating_add(1))
        }
    }

    /// Advances the clock past a timestamp received from another replica.
    ///
    /// The result is strictly greater than both `self` and `remote`.
    #[must_use]
    pub fn observe(&self, remote: &Self) -> Self {
        let now = physical_now();
        let wall = now.max(self.wall_time).max(remote.wall_time);

        let logical = match (wall == self.wall_time, wall == remote.wall_time) {
            (true, true) => self.logical.max(remote.logical).saturating_add(1),
            (true, false) => self.logical.saturating_add(1),
            (false, true) => remote.logical.saturating_add(1),
            (false, false) => 0,
        };

        Self::new(wall, logical)
    }
}

impl Default for HybridTimestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl PartialOrd for HybridTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HybridTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wall_time
            .cmp(&other.wall_time)
            .then(self.logical.cmp(&other.logical))
    }
}

impl fmt::Display for HybridTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.wall_time, self.logical)
    }
}

impl FromStr for HybridTimestamp {
    type Err = crate::Error;

    /// Parses the `wall.logical` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (wall, logical) = s
            .split_once('.')
            .ok_or_else(|| crate::Error::InvalidTimestamp(s.to_string()))?;
        let wall = wall
            .parse()
            .map_err(|_| crate::Error::InvalidTimestamp(s.to_string()))?;
        let logical = logical
            .parse()
            .map_err(|_| crate::Error::InvalidTimestamp(s.to_string()))?;
        Ok(Self::new(wall, logical))
    }
}
