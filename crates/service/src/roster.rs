use std::{collections::HashMap, sync::Arc};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::RosterError;

/// One extracurricular activity as it appears on the wire.
/// - `max_participants` is descriptive metadata; signups are never gated on it.
/// - `participants` keeps insertion order and never contains the same email twice.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: usize,
    pub participants: Vec<String>,
}

impl Activity {
    pub fn is_registered(&self, email: &str) -> bool {
        // Exact, case-sensitive match only.
        self.participants.iter().any(|p| p == email)
    }
}

/// In-memory store of all activities, keyed by activity name.
///
/// Activities are seeded once at construction and never created or deleted
/// afterwards; only the participant lists mutate. Each mutation holds the
/// write lock across its membership check and the list edit, so concurrent
/// handlers cannot both pass the check before either writes.
pub struct RosterStore {
    inner: RwLock<HashMap<String, Activity>>,
    seed: HashMap<String, Activity>,
}

impl RosterStore {
    pub fn new(catalog: HashMap<String, Activity>) -> Arc<Self> {
        Arc::new(Self {
            inner: RwLock::new(catalog.clone()),
            seed: catalog,
        })
    }

    /// Snapshot of every activity with its current participant list.
    pub async fn list(&self) -> HashMap<String, Activity> {
        let map = self.inner.read().await;
        map.clone()
    }

    /// Get one activity by name.
    pub async fn get(&self, name: &str) -> Option<Activity> {
        let map = self.inner.read().await;
        map.get(name).cloned()
    }

    /// Add `email` to the activity's roster.
    ///
    /// Fails if the activity does not exist or the email is already on the
    /// roster; a retry of a successful signup is an error, not a no-op.
    pub async fn signup(&self, activity: &str, email: &str) -> Result<(), RosterError> {
        let mut map = self.inner.write().await;
        let entry = map
            .get_mut(activity)
            .ok_or_else(|| RosterError::unknown_activity(activity))?;
        if entry.is_registered(email) {
            return Err(RosterError::AlreadyRegistered {
                activity: activity.to_string(),
                email: email.to_string(),
            });
        }
        entry.participants.push(email.to_string());
        info!(%activity, %email, registered = entry.participants.len(), "signup");
        Ok(())
    }

    /// Remove `email` from the activity's roster.
    ///
    /// Fails if the activity does not exist or the email is not on the
    /// roster; unregistering an absent email is an error, not a no-op.
    pub async fn unregister(&self, activity: &str, email: &str) -> Result<(), RosterError> {
        let mut map = self.inner.write().await;
        let entry = map
            .get_mut(activity)
            .ok_or_else(|| RosterError::unknown_activity(activity))?;
        let pos = entry.participants.iter().position(|p| p == email).ok_or_else(|| {
            RosterError::NotRegistered {
                activity: activity.to_string(),
                email: email.to_string(),
            }
        })?;
        entry.participants.remove(pos);
        info!(%activity, %email, registered = entry.participants.len(), "unregister");
        Ok(())
    }

    /// Restore the store to its seeded state. Test hook; the server never
    /// calls this at runtime.
    pub async fn reset(&self) {
        let mut map = self.inner.write().await;
        *map = self.seed.clone();
    }
}
