use std::fmt;
use std::time::Duration;

/// A candidate mirror, identified only by its base URL
/// (e.g. "https://mirror.example.org/archlinux").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Mirror {
    pub url: String,
}

impl Mirror {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
        }
    }
}

impl fmt::Display for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Why a single probe attempt did not count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Connection failure, DNS error, timeout...
    Network(String),
    /// The mirror answered, but not with 200 OK.
    Status(u16),
    /// Every probe came back, but the measured total was zero.
    NotResponding,
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFailure::Network(reason) => write!(f, "network error: {}", reason),
            ProbeFailure::Status(code) => write!(f, "status code {}", code),
            ProbeFailure::NotResponding => f.write_str("not responding"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Success { average_latency: Duration },
    Failed(ProbeFailure),
}

/// Outcome of probing one mirror. `order` is the mirror's position in the
/// parsed list and is only used to break latency ties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub order: usize,
    pub mirror: Mirror,
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn average_latency(&self) -> Option<Duration> {
        match self.outcome {
            ProbeOutcome::Success { average_latency } => Some(average_latency),
            ProbeOutcome::Failed(_) => None,
        }
    }
}

/// One entry of the final selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedMirror {
    pub mirror: Mirror,
    pub latency: Duration,
}
