//! Profile sync controller.
//!
//! Keeps three local text fields in step with the identity service:
//!
//! - a newly reported wallet address triggers one load;
//! - `save` writes all three fields and adopts whatever the service echoes;
//! - a disconnect while a favorite color is set clears the fields.
//!
//! Load and save failures are logged and swallowed.  Nothing is retried,
//! cancelled or serialised: concurrent saves race and the last response to
//! arrive wins.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info};

use super::adapter::IdentityAdapter;
use super::errors::{AdapterError, SyncError};
use super::fields::{FieldValue, Profile, ProfileField};
use super::observer::{Phase, ProfileObserver, ProfileSnapshot};
use super::wallet::WalletStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(Profile),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The service acknowledged the write; holds the echoed values.
    Saved(Profile),
    Failed,
    /// No wallet address, nothing sent.
    Skipped,
}

#[derive(Debug, Default)]
struct State {
    revision: u64,
    wallet: WalletStatus,
    profile: Profile,
    saved: bool,
    loads_in_flight: usize,
    saves_in_flight: usize,
}

impl State {
    fn phase(&self) -> Phase {
        if self.wallet.address().is_none() {
            Phase::Disconnected
        } else if self.saves_in_flight > 0 {
            Phase::Saving
        } else if self.loads_in_flight > 0 {
            Phase::Loading
        } else {
            Phase::Idle
        }
    }

    fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            revision: self.revision,
            wallet: self.wallet.clone(),
            profile: self.profile.clone(),
            saved: self.saved,
            phase: self.phase(),
        }
    }

    /// Clear the fields when the wallet is gone and a favorite color is
    /// still set.  Without a color the fields are left as they are.
    fn reset_if_disconnected(&mut self) {
        if self.wallet.is_disconnected && !self.profile.favorite_color.is_empty() {
            debug!("wallet disconnected, clearing profile fields");
            self.profile = Profile::default();
        }
    }
}

pub struct ProfileController {
    adapter: Arc<dyn IdentityAdapter>,
    state: Mutex<State>,
    observers: Vec<Arc<dyn ProfileObserver>>,
}

impl ProfileController {
    pub fn new(adapter: Arc<dyn IdentityAdapter>) -> Self {
        Self {
            adapter,
            state: Mutex::new(State::default()),
            observers: Vec::new(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ProfileObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `f` to the state, run the disconnect guard, bump the revision,
    /// then notify observers with the lock released.
    fn apply<T>(&self, f: impl FnOnce(&mut State) -> T) -> (T, ProfileSnapshot) {
        let (out, snapshot) = {
            let mut state = self.lock();
            let out = f(&mut state);
            state.reset_if_disconnected();
            state.revision += 1;
            (out, state.snapshot())
        };
        for observer in &self.observers {
            observer.profile_changed(&snapshot);
        }
        (out, snapshot)
    }

    fn update<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        self.apply(f).0
    }

    // ── Wallet ──────────────────────────────────────────────────────────

    /// Record a wallet status report.  When it carries an address different
    /// from the previous one, the profile for that address is loaded before
    /// returning.
    pub async fn wallet_changed(&self, status: WalletStatus) -> Option<LoadOutcome> {
        let to_load = self.update(|state| {
            let previous = state.wallet.address().map(str::to_string);
            state.wallet = status;
            match state.wallet.address() {
                Some(next) if previous.as_deref() != Some(next) => Some(next.to_string()),
                _ => None,
            }
        });

        match to_load {
            Some(address) => Some(self.load(&address).await),
            None => None,
        }
    }

    // ── Input Binding ───────────────────────────────────────────────────

    /// Replace one local field with user input.
    pub fn edit(&self, field: ProfileField, value: impl Into<String>) -> ProfileSnapshot {
        let value = value.into();
        self.apply(|state| state.profile.set(field, value)).1
    }

    // ── Load ────────────────────────────────────────────────────────────

    /// Fetch the three fields for `address` and overwrite the local copies.
    /// Fields the service does not hold become empty.
    pub async fn load(&self, address: &str) -> LoadOutcome {
        self.update(|state| state.loads_in_flight += 1);
        debug!("loading profile for {address}");

        let result = self.adapter.get(address, &ProfileField::ALL).await;

        self.update(|state| {
            state.loads_in_flight = state.loads_in_flight.saturating_sub(1);
            match result {
                Ok(values) => {
                    let profile = profile_from_slots(&values);
                    state.profile = profile.clone();
                    LoadOutcome::Loaded(profile)
                }
                Err(source) => {
                    let err = SyncError::Load {
                        address: address.to_string(),
                        source,
                    };
                    error!("{err}");
                    LoadOutcome::Failed
                }
            }
        })
    }

    // ── Save ────────────────────────────────────────────────────────────

    /// Save the current local fields for the connected address.
    pub async fn save(&self) -> SaveOutcome {
        let (address, profile) = {
            let state = self.lock();
            (
                state.wallet.address().map(str::to_string),
                state.profile.clone(),
            )
        };
        match address {
            Some(address) => self.save_as(&address, profile).await,
            None => SaveOutcome::Skipped,
        }
    }

    /// Write `profile` for `address` in a single request.  On success the
    /// echoed values replace the local fields and the saved flag is set.
    pub async fn save_as(&self, address: &str, profile: Profile) -> SaveOutcome {
        if address.is_empty() {
            return SaveOutcome::Skipped;
        }
        self.update(|state| state.saves_in_flight += 1);

        let result = self
            .adapter
            .put(address, &profile.entries())
            .await
            .and_then(|values| profile_from_echo(&values));

        self.update(|state| {
            state.saves_in_flight = state.saves_in_flight.saturating_sub(1);
            match result {
                Ok(echoed) => {
                    info!("saved profile for {address}");
                    state.profile = echoed.clone();
                    state.saved = true;
                    SaveOutcome::Saved(echoed)
                }
                Err(source) => {
                    let err = SyncError::Save {
                        address: address.to_string(),
                        source,
                    };
                    error!("{err}");
                    SaveOutcome::Failed
                }
            }
        })
    }
}

/// Build a profile from `get` slots, which follow `ProfileField::ALL`.
fn profile_from_slots(values: &[Option<FieldValue>]) -> Profile {
    let mut profile = Profile::default();
    for (field, slot) in ProfileField::ALL.into_iter().zip(values) {
        if let Some(value) = slot {
            profile.set(field, value.text());
        }
    }
    profile
}

/// Build a profile from a `put` acknowledgement.  All three fields must be
/// echoed back for the write to count.
fn profile_from_echo(values: &[FieldValue]) -> Result<Profile, AdapterError> {
    let mut profile = Profile::default();
    for field in ProfileField::ALL {
        let value = values
            .iter()
            .find(|v| v.field() == Some(field))
            .ok_or(AdapterError::MissingField(field.id()))?;
        profile.set(field, value.text());
    }
    Ok(profile)
}

// ── Tests ───────────────────────────────────────────────────────────────────
