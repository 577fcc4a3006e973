use crate::error::{MirrorError, Result};
use crate::types::{ProbeResult, RankedMirror};

/// Pick the `count` fastest mirrors that answered.
///
/// Failed probes are ignored. Equal latencies keep list order, so the same
/// results always produce the same selection. Fewer than `count` successes
/// is an error, never a shorter list.
pub fn select_fastest(results: Vec<ProbeResult>, count: usize) -> Result<Vec<RankedMirror>> {
    let mut successes: Vec<_> = results
        .into_iter()
        .filter_map(|r| r.average_latency().map(|latency| (r.order, r.mirror, latency)))
        .collect();

    if successes.len() < count {
        return Err(MirrorError::InsufficientMirrors {
            requested: count,
            available: successes.len(),
        });
    }

    successes.sort_by(|a, b| a.2.cmp(&b.2).then(a.0.cmp(&b.0)));

    Ok(successes
        .into_iter()
        .take(count)
        .map(|(_, mirror, latency)| RankedMirror { mirror, latency })
        .collect())
}
