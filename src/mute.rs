use tracing::{info, warn};

use crate::storage::Storage;

pub const MUTE_KEY: &str = "noughts-and-crosses-muted";

/// Persisted sound preference. Audio players check [`MutePreference::is_muted`]
/// before every sound.
#[derive(Debug, Clone)]
pub struct MutePreference<S: Storage> {
    storage: S,
    muted: bool,
}

impl<S: Storage> MutePreference<S> {
    pub fn load(storage: S) -> Self {
        let muted = match storage.get(MUTE_KEY) {
            Ok(Some(raw)) => ron::from_str(&raw).unwrap_or(false),
            Ok(None) => false,
            Err(e) => {
                warn!("could not read mute preference: {e}");
                false
            }
        };
        Self { storage, muted }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle(&mut self) -> bool {
        self.muted = !self.muted;
        let raw = if self.muted { "true" } else { "false" };
        if let Err(e) = self.storage.set(MUTE_KEY, raw) {
            warn!("could not save mute preference: {e}");
        }
        info!(muted = self.muted, "sound preference changed");
        self.muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BrokenStorage, MemoryStorage};

    #[test]
    fn toggle_flips_and_persists() {
        let storage = MemoryStorage::new();
        let mut pref = MutePreference::load(storage.clone());
        assert!(!pref.is_muted());

        assert!(pref.toggle());
        assert_eq!(storage.get(MUTE_KEY).unwrap().as_deref(), Some("true"));

        assert!(!pref.toggle());
        assert_eq!(storage.get(MUTE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn load_reads_saved_preference() {
        let mut storage = MemoryStorage::new();
        storage.set(MUTE_KEY, "true").unwrap();
        assert!(MutePreference::load(storage).is_muted());
    }

    #[test]
    fn unreadable_preference_means_unmuted() {
        let mut storage = MemoryStorage::new();
        storage.set(MUTE_KEY, "loud").unwrap();
        assert!(!MutePreference::load(storage).is_muted());
        assert!(!MutePreference::load(BrokenStorage).is_muted());
    }

    #[test]
    fn toggle_survives_a_failed_write() {
        let mut pref = MutePreference::load(BrokenStorage);
        assert!(pref.toggle());
        assert!(pref.is_muted());
    }
}
