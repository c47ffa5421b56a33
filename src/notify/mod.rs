//! User-directed notification log.
//!
//! ## Overview
//!
//! Mutating operations that affect other participants (a rider joining, a
//! driver coming aboard, an owner cancelling) append a message addressed
//! to each affected user. The log is append-only and queried per user in
//! arrival order; delivery is the caller's concern.
//!
//! The log has its own lock and never acquires any other, so it can be
//! written while a ride or ledger lock is held without ordering concerns.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A message addressed to a single user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient identity handle
    pub user_id: String,

    /// Free-text message body
    pub message: String,
}

/// Append-only, per-user queryable notification store.
///
/// ## Example
///
/// ```
/// use ridepool::NotificationLog;
///
/// let log = NotificationLog::new();
/// log.push("alice", "carol requested to join your ride");
///
/// assert_eq!(log.for_user("alice").len(), 1);
/// assert!(log.for_user("carol").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: RwLock<Vec<Notification>>,
}

impl NotificationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message for one user
    pub fn push(&self, user_id: &str, message: impl Into<String>) {
        self.write_entries().push(Notification {
            user_id: user_id.to_string(),
            message: message.into(),
        });
    }

    /// Append the same kind of event for several users at once
    pub fn push_all<I>(&self, pairs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut entries = self.write_entries();
        for (user_id, message) in pairs {
            entries.push(Notification { user_id, message });
        }
    }

    /// All messages addressed to `user_id`, in arrival order
    pub fn for_user(&self, user_id: &str) -> Vec<String> {
        self.read_entries()
            .iter()
            .filter(|n| n.user_id == user_id)
            .map(|n| n.message.clone())
            .collect()
    }

    /// Total number of messages in the log
    pub fn len(&self) -> usize {
        self.read_entries().len()
    }

    /// Check whether the log holds no messages
    pub fn is_empty(&self) -> bool {
        self.read_entries().is_empty()
    }

    // A poisoned lock still guards consistent data: every critical section
    // completes its append before any point that can panic.
    fn read_entries(&self) -> RwLockReadGuard<'_, Vec<Notification>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, Vec<Notification>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
