/// Generation guard for comment-list reloads.
///
/// Every mutation triggers a full re-fetch; two rapid actions can leave
/// two reloads in flight, and nothing guarantees their responses arrive
/// in order. Each reload takes a generation from `begin`, and only the
/// response carrying the latest issued generation is admitted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RefreshGuard {
    issued: u64,
}

impl RefreshGuard {
    pub fn new() -> RefreshGuard {
        RefreshGuard::default()
    }

    /// Starts a reload, invalidating every response still in flight
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Whether a response from reload `generation` may be applied
    pub fn admit(&self, generation: u64) -> bool {
        let stale = generation < self.issued;
        if stale {
            tracing::debug!(
                generation,
                latest = self.issued,
                "dropping stale comment refresh"
            );
        }
        !stale
    }
}
