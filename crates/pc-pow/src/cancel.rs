use std::sync::{
    atomic::{AtomicU8, Ordering},
    Arc,
};

/// Why a proof search was asked to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// The chain tip moved (a block was appended or the chain was replaced),
    /// so the search is working on a stale previous proof.
    Superseded,

    /// The host explicitly asked mining to stop.
    Aborted,
}

const LIVE: u8 = 0;
const SUPERSEDED: u8 = 1;
const ABORTED: u8 = 2;

/// Shared cooperative cancellation flag for [`crate::ProofOfWork::find_proof`].
///
/// Clones observe the same flag.  Once cancelled the token stays cancelled
/// and the first reason recorded wins.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicU8>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.  Returns `true` if this call set the reason.
    pub fn cancel(&self, reason: CancelReason) -> bool {
        let code = match reason {
            CancelReason::Superseded => SUPERSEDED,
            CancelReason::Aborted => ABORTED,
        };
        self.0
            .compare_exchange(LIVE, code, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn reason(&self) -> Option<CancelReason> {
        match self.0.load(Ordering::Acquire) {
            SUPERSEDED => Some(CancelReason::Superseded),
            ABORTED => Some(CancelReason::Aborted),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.reason().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());

        token.cancel(CancelReason::Aborted);
        assert_eq!(observer.reason(), Some(CancelReason::Aborted));
    }

    #[test]
    fn first_reason_wins() {
        let token = CancelToken::new();
        assert!(token.cancel(CancelReason::Superseded));
        assert!(!token.cancel(CancelReason::Aborted));
        assert_eq!(token.reason(), Some(CancelReason::Superseded));
    }
}
