use crate::error::Result;
use crate::types::ProbeFailure;
use async_trait::async_trait;

/// MirrorSource: where the raw mirror list comes from
#[async_trait]
pub trait MirrorSource: Sync + Send {
    /// URL of the list (used in log and error messages)
    fn url(&self) -> &str;

    /// Fetch the raw listing text.
    /// Any failure here must surface as `MirrorError::SourceUnavailable`.
    async fn fetch(&self) -> Result<String>;
}

/// Pinger: one timed request against one mirror
///
/// Timing is done by the caller; an implementation only has to report
/// whether the round trip counted.
#[async_trait]
pub trait Pinger: Sync + Send {
    async fn ping(&self, url: &str) -> std::result::Result<(), ProbeFailure>;
}
