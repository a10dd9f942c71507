use serde::Serialize;

use super::fields::Profile;
use super::observer::{Phase, ProfileSnapshot};

// ── Presentation Model ───────────────────────────────────────────────────────

pub const TITLE: &str = "Wallet Profile";
const CONNECT_PROMPT: &str = "Connect with the wallet first :)";
const SAVE_LABEL: &str = "Save";
const SAVED_LABEL: &str = "Saved";

/// Everything the page needs to render, derived from a controller snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    /// Revision of the snapshot this view was built from; the page drops
    /// views older than the last one it rendered.
    pub revision: u64,
    pub title: &'static str,
    pub address: Option<String>,
    pub greeting: String,
    pub profile: Profile,
    /// Placeholder for the name input: the shortened address when connected.
    pub name_placeholder: Option<String>,
    pub save_label: &'static str,
    pub save_disabled: bool,
    pub phase: Phase,
}

impl From<&ProfileSnapshot> for ProfileView {
    fn from(snapshot: &ProfileSnapshot) -> Self {
        let address = snapshot.address();
        Self {
            revision: snapshot.revision,
            title: TITLE,
            address: address.map(str::to_string),
            greeting: greeting(address, &snapshot.profile.first_name),
            profile: snapshot.profile.clone(),
            name_placeholder: address.map(short_address),
            save_label: if snapshot.saved { SAVED_LABEL } else { SAVE_LABEL },
            save_disabled: address.is_none(),
            phase: snapshot.phase,
        }
    }
}

/// First five characters of the address followed by `...`.
pub fn short_address(address: &str) -> String {
    let head: String = address.chars().take(5).collect();
    format!("{head}...")
}

pub fn greeting(address: Option<&str>, first_name: &str) -> String {
    match (first_name.is_empty(), address) {
        (false, _) => format!("Hey {first_name} 👋"),
        (true, Some(address)) => format!("Hey {} 👋", short_address(address)),
        (true, None) => CONNECT_PROMPT.to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
