use std::sync::{Mutex, PoisonError};

use super::observer::{ProfileObserver, ProfileSnapshot};

/// Applies a raw CSS color string as the page background.
pub trait BackgroundSink: Send + Sync {
    fn set_background(&self, color: &str);
}

impl<F> BackgroundSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn set_background(&self, color: &str) {
        self(color)
    }
}

/// Observer that mirrors `favoriteColor` onto the page background.
///
/// A non-empty color is applied verbatim.  When the fields are cleared by a
/// disconnect the background goes back to `default`; a color the user
/// erases by hand leaves the background as it was.  Snapshots older than the
/// last one seen are dropped, and the sink is called under the follower's
/// lock so the last color applied is always the newest one.
pub struct BackgroundFollower<S> {
    sink: S,
    default: String,
    last: Mutex<Applied>,
}

#[derive(Default)]
struct Applied {
    revision: u64,
    color: String,
}

impl<S: BackgroundSink> BackgroundFollower<S> {
    pub fn new(sink: S, default: impl Into<String>) -> Self {
        Self {
            sink,
            default: default.into(),
            last: Mutex::new(Applied::default()),
        }
    }
}

impl<S: BackgroundSink> ProfileObserver for BackgroundFollower<S> {
    fn profile_changed(&self, snapshot: &ProfileSnapshot) {
        let color = &snapshot.profile.favorite_color;
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if snapshot.revision <= last.revision {
            return;
        }
        last.revision = snapshot.revision;
        if last.color == *color {
            return;
        }
        let previous = std::mem::replace(&mut last.color, color.clone());

        if !color.is_empty() {
            self.sink.set_background(color);
        } else if snapshot.wallet.is_disconnected && !previous.is_empty() {
            self.sink.set_background(&self.default);
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
