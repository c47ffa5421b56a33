//! Ride registry: the single owner of all ride records.
//!
//! ## Concurrency Discipline
//!
//! The store sits behind one `RwLock`. Every mutation takes the write
//! lock for its whole check-then-act sequence, so all ride mutations
//! serialize: the sequential apply-log option for linearizability.
//! Reads clone records out under the read lock and therefore always see
//! a consistent snapshot.
//!
//! The assignment coordinator mutates rides through the crate-private
//! lock accessors below, the same way a matching engine works through an
//! order book's accessors; the lock (and thus the single-writer
//! guarantee) stays owned by the registry.
//!
//! ## Lifecycle
//!
//! Rides are created here, mutated by the coordinator, and cancelled
//! here. They are never physically deleted: cancellation is a terminal
//! status, so historical queries (rewards, audit) stay valid forever.

pub mod store;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::error::CoordinationError;
use crate::notify::NotificationLog;
use crate::types::{Ride, RideId, RideStatus};

pub use store::RideStore;

/// Owner of the ride collection and its lifecycle operations.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use ridepool::{NotificationLog, RideRegistry};
///
/// let registry = RideRegistry::new(Arc::new(NotificationLog::new()));
/// let ride_id = registry
///     .create_ride("alice", "Mumbai", "Pune", 3, false, 1000)
///     .unwrap();
///
/// assert_eq!(registry.get_ride(ride_id).unwrap().owner_id, "alice");
/// ```
#[derive(Debug)]
pub struct RideRegistry {
    store: RwLock<RideStore>,
    notifications: Arc<NotificationLog>,
}

impl RideRegistry {
    /// Create an empty registry that reports events to `notifications`
    pub fn new(notifications: Arc<NotificationLog>) -> Self {
        Self {
            store: RwLock::new(RideStore::new()),
            notifications,
        }
    }

    /// Create a registry with pre-allocated ride capacity
    pub fn with_capacity(ride_capacity: usize, notifications: Arc<NotificationLog>) -> Self {
        Self {
            store: RwLock::new(RideStore::with_capacity(ride_capacity)),
            notifications,
        }
    }

    // ========================================================================
    // Lifecycle Operations
    // ========================================================================

    /// Create a new open ride and return its id.
    ///
    /// When `auto_assign_driver` is true the creator is bound as driver in
    /// the same atomic step, with no separate assignment.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::InvalidCapacity`] if `max_riders < 1`.
    pub fn create_ride(
        &self,
        owner_id: &str,
        origin: &str,
        destination: &str,
        max_riders: usize,
        auto_assign_driver: bool,
        created_at: u64,
    ) -> Result<RideId, CoordinationError> {
        if max_riders < 1 {
            return Err(CoordinationError::InvalidCapacity(max_riders));
        }

        let ride_id = self.write_store().insert_with(|id| {
            Ride::new(
                id,
                owner_id,
                origin,
                destination,
                max_riders,
                auto_assign_driver,
                created_at,
            )
        });

        info!(
            ride_id,
            owner = %owner_id,
            max_riders,
            driver_created = auto_assign_driver,
            "ride created"
        );
        Ok(ride_id)
    }

    /// Cancel an open ride.
    ///
    /// Cancellation is independent of payment: riders already settled are
    /// not refunded. Every joined rider is notified.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::RideNotFound`] for an unknown id,
    /// [`CoordinationError::NotOwner`] if the caller is not the creator,
    /// and [`CoordinationError::AlreadyTerminal`] if the ride left `Open`.
    pub fn cancel_ride(&self, ride_id: RideId, caller_id: &str) -> Result<(), CoordinationError> {
        let riders = {
            let mut store = self.write_store();
            let ride = store
                .get_mut(ride_id)
                .ok_or(CoordinationError::RideNotFound(ride_id))?;

            if ride.owner_id != caller_id {
                return Err(CoordinationError::NotOwner);
            }
            if ride.status.is_terminal() {
                return Err(CoordinationError::AlreadyTerminal);
            }

            ride.status = RideStatus::Cancelled;
            ride.riders.iter().cloned().collect::<Vec<_>>()
        };

        self.notifications.push_all(
            riders
                .into_iter()
                .map(|rider| (rider, "A ride you joined has been cancelled.".to_string())),
        );

        info!(ride_id, owner = %caller_id, "ride cancelled");
        Ok(())
    }

    // ========================================================================
    // Read Operations
    // ========================================================================

    /// Snapshot of a single ride.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::RideNotFound`] for an unknown id.
    pub fn get_ride(&self, ride_id: RideId) -> Result<Ride, CoordinationError> {
        self.read_store()
            .get(ride_id)
            .cloned()
            .ok_or(CoordinationError::RideNotFound(ride_id))
    }

    /// Snapshot of every ride, in insertion order
    pub fn list_rides(&self) -> Vec<Ride> {
        self.read_store().iter().cloned().collect()
    }

    /// Number of rides ever created
    pub fn ride_count(&self) -> usize {
        self.read_store().len()
    }

    /// SHA-256 digest of the full ride collection (see [`RideStore::state_digest`])
    pub fn state_digest(&self) -> [u8; 32] {
        self.read_store().state_digest()
    }

    // ========================================================================
    // Store Access (for the assignment coordinator and matching engine)
    // ========================================================================

    // A poisoned lock still guards consistent data: every critical section
    // re-checks invariants before mutating and cannot panic in between.

    /// Take the store's read lock
    pub(crate) fn read_store(&self) -> RwLockReadGuard<'_, RideStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the store's write lock
    pub(crate) fn write_store(&self) -> RwLockWriteGuard<'_, RideStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RideRegistry {
        RideRegistry::new(Arc::new(NotificationLog::new()))
    }

    #[test]
    fn test_create_ride_returns_monotonic_ids() {
        let registry = registry();

        let first = registry
            .create_ride("alice", "Mumbai", "Pune", 3, false, 1)
            .unwrap();
        let second = registry
            .create_ride("bob", "Pune", "Goa", 2, true, 2)
            .unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(registry.ride_count(), 2);
    }

    #[test]
    fn test_create_ride_rejects_zero_capacity() {
        let registry = registry();

        let err = registry
            .create_ride("alice", "Mumbai", "Pune", 0, false, 0)
            .unwrap_err();

        assert_eq!(err, CoordinationError::InvalidCapacity(0));
        assert_eq!(registry.ride_count(), 0);
    }

    #[test]
    fn test_create_ride_driver_created() {
        let registry = registry();
        let ride_id = registry
            .create_ride("alice", "A", "B", 1, true, 0)
            .unwrap();

        let ride = registry.get_ride(ride_id).unwrap();
        assert_eq!(ride.driver_id.as_deref(), Some("alice"));
        assert!(ride.is_driver_created);
        assert_eq!(ride.status, RideStatus::Open);
    }

    #[test]
    fn test_get_ride_unknown_id() {
        let registry = registry();

        assert_eq!(
            registry.get_ride(99).unwrap_err(),
            CoordinationError::RideNotFound(99)
        );
    }

    #[test]
    fn test_list_rides_insertion_order() {
        let registry = registry();
        registry.create_ride("alice", "A", "B", 2, false, 0).unwrap();
        registry.create_ride("bob", "C", "D", 2, false, 0).unwrap();
        registry.create_ride("carol", "E", "F", 2, false, 0).unwrap();

        let owners: Vec<String> = registry
            .list_rides()
            .into_iter()
            .map(|r| r.owner_id)
            .collect();
        assert_eq!(owners, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_cancel_ride_by_owner() {
        let registry = registry();
        let ride_id = registry
            .create_ride("alice", "A", "B", 2, false, 0)
            .unwrap();

        registry.cancel_ride(ride_id, "alice").unwrap();

        assert_eq!(
            registry.get_ride(ride_id).unwrap().status,
            RideStatus::Cancelled
        );
    }

    #[test]
    fn test_cancel_ride_non_owner_leaves_ride_open() {
        let registry = registry();
        let ride_id = registry
            .create_ride("alice", "A", "B", 2, false, 0)
            .unwrap();

        let err = registry.cancel_ride(ride_id, "mallory").unwrap_err();

        assert_eq!(err, CoordinationError::NotOwner);
        assert_eq!(registry.get_ride(ride_id).unwrap().status, RideStatus::Open);
    }

    #[test]
    fn test_cancel_ride_twice_fails() {
        let registry = registry();
        let ride_id = registry
            .create_ride("alice", "A", "B", 2, false, 0)
            .unwrap();

        registry.cancel_ride(ride_id, "alice").unwrap();
        let err = registry.cancel_ride(ride_id, "alice").unwrap_err();

        assert_eq!(err, CoordinationError::AlreadyTerminal);
    }

    #[test]
    fn test_cancel_ride_unknown_id() {
        let registry = registry();

        assert_eq!(
            registry.cancel_ride(5, "alice").unwrap_err(),
            CoordinationError::RideNotFound(5)
        );
    }

    #[test]
    fn test_cancel_notifies_joined_riders() {
        let notifications = Arc::new(NotificationLog::new());
        let registry = RideRegistry::new(Arc::clone(&notifications));
        let ride_id = registry
            .create_ride("alice", "A", "B", 3, false, 0)
            .unwrap();
        registry
            .write_store()
            .get_mut(ride_id)
            .unwrap()
            .riders
            .insert("carol".to_string());

        registry.cancel_ride(ride_id, "alice").unwrap();

        assert_eq!(notifications.for_user("carol").len(), 1);
        assert!(notifications.for_user("alice").is_empty());
    }

    #[test]
    fn test_state_digest_changes_on_cancel() {
        let registry = registry();
        let ride_id = registry
            .create_ride("alice", "A", "B", 2, false, 0)
            .unwrap();
        let before = registry.state_digest();

        registry.cancel_ride(ride_id, "alice").unwrap();

        assert_ne!(before, registry.state_digest());
    }
}
