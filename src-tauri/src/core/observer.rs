use serde::Serialize;

use super::fields::Profile;
use super::wallet::WalletStatus;

/// Where the form currently is in its connect / load / save cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Disconnected,
    Loading,
    Idle,
    Saving,
}

/// Point-in-time copy of the controller state handed to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    /// Increases by one with every state change.
    pub revision: u64,
    pub wallet: WalletStatus,
    pub profile: Profile,
    pub saved: bool,
    pub phase: Phase,
}

impl ProfileSnapshot {
    pub fn address(&self) -> Option<&str> {
        self.wallet.address()
    }
}

/// One-way listener notified after every controller state change.
///
/// Observers run on the caller's task after the state lock is released, so
/// they may read the controller but must not block.  Changes made on
/// different threads can be delivered out of order; an observer must ignore
/// a snapshot whose `revision` is not newer than the last one it applied.
pub trait ProfileObserver: Send + Sync {
    fn profile_changed(&self, snapshot: &ProfileSnapshot);
}

impl<F> ProfileObserver for F
where
    F: Fn(&ProfileSnapshot) + Send + Sync,
{
    fn profile_changed(&self, snapshot: &ProfileSnapshot) {
        self(snapshot)
    }
}
