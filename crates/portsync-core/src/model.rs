//! Port, session, and outcome types shared by the reconciler and its adapters.

use std::fmt::{self, Display, Formatter};
use std::num::NonZeroU16;

/// A validated TCP/UDP port in the range 1-65535.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Port(NonZeroU16);

impl Port {
    /// Build a port from a `u16`, rejecting zero.
    #[must_use]
    pub const fn new(value: u16) -> Option<Self> {
        match NonZeroU16::new(value) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Validate a raw integer observed from an external source.
    #[must_use]
    pub fn from_raw(value: i64) -> Option<Self> {
        u16::try_from(value).ok().and_then(Self::new)
    }

    /// Numeric value of the port.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Whether a raw listening port reported by the client equals this port.
    #[must_use]
    pub fn matches(self, raw: i64) -> bool {
        raw == i64::from(self.get())
    }
}

impl Display for Port {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, formatter)
    }
}

/// Session credential issued by the torrent client for a single cycle.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    sid: String,
}

impl Session {
    /// Wrap the `SID` cookie value returned by the login endpoint.
    #[must_use]
    pub fn new(sid: impl Into<String>) -> Self {
        Self { sid: sid.into() }
    }

    /// Raw session identifier.
    #[must_use]
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Value for the `Cookie` request header.
    #[must_use]
    pub fn cookie_header(&self) -> String {
        format!("SID={}", self.sid)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("sid", &"<redacted>")
            .finish()
    }
}

/// Result of a successful reconciliation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The listening port differed and was rewritten.
    Updated {
        /// Listening port reported before the update.
        previous: i64,
        /// Forwarded port now applied.
        current: Port,
    },
    /// The listening port already matched the forwarded port.
    UpToDate {
        /// The shared port value.
        port: Port,
    },
}

impl CycleOutcome {
    /// Whether the cycle wrote to the torrent client.
    #[must_use]
    pub const fn is_update(&self) -> bool {
        matches!(self, Self::Updated { .. })
    }
}

impl Display for CycleOutcome {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated { previous, current } => write!(formatter, "{previous} -> {current}"),
            Self::UpToDate { port } => write!(formatter, "{port} already up to date"),
        }
    }
}
