use serde::Serialize;

use crate::params::Lane;

/// Identifies one issued request. Only the newest token of a lane may
/// commit its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RequestToken {
    pub lane: Lane,
    pub seq: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RequestTracker {
    latest: [u64; Lane::ALL.len()],
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// New token for `lane`, superseding every earlier one.
    pub fn issue(&mut self, lane: Lane) -> RequestToken {
        let slot = &mut self.latest[lane.index()];
        *slot += 1;
        RequestToken { lane, seq: *slot }
    }

    pub fn is_latest(&self, token: RequestToken) -> bool {
        self.latest[token.lane.index()] == token.seq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_token_supersedes_older() {
        let mut tracker = RequestTracker::new();
        let a = tracker.issue(Lane::Series);
        assert!(tracker.is_latest(a));
        let b = tracker.issue(Lane::Series);
        assert!(!tracker.is_latest(a));
        assert!(tracker.is_latest(b));
    }

    #[test]
    fn lanes_are_independent() {
        let mut tracker = RequestTracker::new();
        let series = tracker.issue(Lane::Series);
        let news = tracker.issue(Lane::News);
        tracker.issue(Lane::Financials);
        assert!(tracker.is_latest(series));
        assert!(tracker.is_latest(news));
        assert_eq!(series.seq, 1);
        assert_eq!(news.seq, 1);
    }
}
