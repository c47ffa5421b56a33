//! Assignment coordinator: rider joins, driver binding, completion, and
//! fare settlement.
//!
//! ## Design
//!
//! Joins and driver assignment are separate, independently-racing
//! operations against the same ride record. Both run their whole
//! check-then-act sequence under the registry's write lock, so two riders
//! cannot both pass the capacity check for the last seat and two drivers
//! cannot both observe an empty `driver_id`.
//!
//! Settlement touches a ride and two account balances. The coordinator
//! holds the ride write lock while invoking the ledger, and the ledger
//! never calls back into the registry: lock order is always ride lock
//! first, balance lock second, so the pair cannot deadlock. Either the
//! full effect (validation, transfer, settled-mark) becomes visible or
//! none of it does.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use ridepool::{AssignmentCoordinator, LedgerService, NotificationLog, RideRegistry};
//!
//! let notifications = Arc::new(NotificationLog::new());
//! let registry = Arc::new(RideRegistry::new(Arc::clone(&notifications)));
//! let ledger = Arc::new(LedgerService::new());
//! let coordinator = AssignmentCoordinator::new(
//!     Arc::clone(&registry),
//!     Arc::clone(&ledger),
//!     notifications,
//! );
//!
//! let ride_id = registry
//!     .create_ride("alice", "Mumbai", "Pune", 2, false, 0)
//!     .unwrap();
//! coordinator.request_join(ride_id, "carol").unwrap();
//! coordinator.driver_join(ride_id, "dan").unwrap();
//!
//! let ride = registry.get_ride(ride_id).unwrap();
//! assert!(ride.has_rider("carol"));
//! assert_eq!(ride.driver_id.as_deref(), Some("dan"));
//! ```

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::CoordinationError;
use crate::ledger::LedgerService;
use crate::notify::NotificationLog;
use crate::registry::RideRegistry;
use crate::types::{RideId, RideStatus, SettlementReceipt};

/// Mutator of ride records: joins, driver binding, completion, settlement.
#[derive(Debug)]
pub struct AssignmentCoordinator {
    registry: Arc<RideRegistry>,
    ledger: Arc<LedgerService>,
    notifications: Arc<NotificationLog>,
}

impl AssignmentCoordinator {
    /// Create a coordinator over the given registry and ledger
    pub fn new(
        registry: Arc<RideRegistry>,
        ledger: Arc<LedgerService>,
        notifications: Arc<NotificationLog>,
    ) -> Self {
        Self {
            registry,
            ledger,
            notifications,
        }
    }

    // ========================================================================
    // Rider Joins
    // ========================================================================

    /// Add a rider to an open ride.
    ///
    /// The capacity check and the insert happen under one write lock, so
    /// the `riders.len() <= max_riders` invariant holds under any
    /// interleaving. The ride owner is notified on success.
    ///
    /// # Errors
    ///
    /// [`RideNotFound`](CoordinationError::RideNotFound),
    /// [`RideNotOpen`](CoordinationError::RideNotOpen),
    /// [`RideFull`](CoordinationError::RideFull),
    /// [`AlreadyJoined`](CoordinationError::AlreadyJoined) (also covers
    /// the owner joining their own ride), and
    /// [`SelfJoin`](CoordinationError::SelfJoin) for the assigned driver.
    pub fn request_join(&self, ride_id: RideId, rider_id: &str) -> Result<(), CoordinationError> {
        let owner = {
            let mut store = self.registry.write_store();
            let ride = store
                .get_mut(ride_id)
                .ok_or(CoordinationError::RideNotFound(ride_id))?;

            if !ride.is_open() {
                return Err(CoordinationError::RideNotOpen);
            }
            if ride.is_full() {
                return Err(CoordinationError::RideFull);
            }
            if ride.has_rider(rider_id) || ride.owner_id == rider_id {
                return Err(CoordinationError::AlreadyJoined);
            }
            if ride.is_driver(rider_id) {
                return Err(CoordinationError::SelfJoin);
            }

            ride.riders.insert(rider_id.to_string());
            ride.owner_id.clone()
        };

        self.notifications.push(
            &owner,
            format!("User {rider_id} requested to join your ride."),
        );

        debug!(ride_id, rider = %rider_id, "rider joined");
        Ok(())
    }

    // ========================================================================
    // Driver Assignment
    // ========================================================================

    /// Bind a driver to an open ride, exactly once.
    ///
    /// The owner and every joined rider are notified on success.
    ///
    /// # Errors
    ///
    /// [`RideNotFound`](CoordinationError::RideNotFound),
    /// [`RideNotOpen`](CoordinationError::RideNotOpen),
    /// [`SelfAssignment`](CoordinationError::SelfAssignment) when the
    /// owner of a driver-created ride tries to assign themselves again,
    /// and [`DriverAlreadyAssigned`](CoordinationError::DriverAlreadyAssigned)
    /// when any driver is already bound.
    pub fn driver_join(&self, ride_id: RideId, driver_id: &str) -> Result<(), CoordinationError> {
        let (owner, riders) = {
            let mut store = self.registry.write_store();
            let ride = store
                .get_mut(ride_id)
                .ok_or(CoordinationError::RideNotFound(ride_id))?;

            if !ride.is_open() {
                return Err(CoordinationError::RideNotOpen);
            }
            // The more specific rejection wins for an owner re-assigning
            // their own driver-created ride.
            if ride.is_driver_created && ride.owner_id == driver_id {
                return Err(CoordinationError::SelfAssignment);
            }
            if ride.driver_id.is_some() {
                return Err(CoordinationError::DriverAlreadyAssigned);
            }

            ride.driver_id = Some(driver_id.to_string());
            (ride.owner_id.clone(), ride.riders.iter().cloned().collect::<Vec<_>>())
        };

        let mut messages = vec![(
            owner.clone(),
            format!("Driver {driver_id} has joined your ride."),
        )];
        for rider in riders {
            if rider != owner {
                messages.push((rider, "A driver has joined your ride.".to_string()));
            }
        }
        self.notifications.push_all(messages);

        info!(ride_id, driver = %driver_id, "driver assigned");
        Ok(())
    }

    // ========================================================================
    // Completion
    // ========================================================================

    /// Mark a trip finished. Only the assigned driver may complete a ride.
    ///
    /// # Errors
    ///
    /// [`RideNotFound`](CoordinationError::RideNotFound),
    /// [`AlreadyTerminal`](CoordinationError::AlreadyTerminal),
    /// [`NoDriverAssigned`](CoordinationError::NoDriverAssigned), and
    /// [`NotDriver`](CoordinationError::NotDriver) for any other caller.
    pub fn complete_ride(&self, ride_id: RideId, caller_id: &str) -> Result<(), CoordinationError> {
        let riders = {
            let mut store = self.registry.write_store();
            let ride = store
                .get_mut(ride_id)
                .ok_or(CoordinationError::RideNotFound(ride_id))?;

            if ride.status.is_terminal() {
                return Err(CoordinationError::AlreadyTerminal);
            }
            if ride.driver_id.is_none() {
                return Err(CoordinationError::NoDriverAssigned);
            }
            if !ride.is_driver(caller_id) {
                return Err(CoordinationError::NotDriver);
            }

            ride.status = RideStatus::Completed;
            ride.riders.iter().cloned().collect::<Vec<_>>()
        };

        self.notifications.push_all(
            riders
                .into_iter()
                .map(|rider| (rider, "Your ride has been completed.".to_string())),
        );

        info!(ride_id, driver = %caller_id, "ride completed");
        Ok(())
    }

    // ========================================================================
    // Fare Settlement
    // ========================================================================

    /// Settle one rider's fare share, at most once per rider per ride.
    ///
    /// Runs the ledger settlement while holding the ride write lock and
    /// records the payer in the ride's settled set in the same critical
    /// section, so a concurrent duplicate attempt observes either nothing
    /// or the full settlement.
    ///
    /// # Errors
    ///
    /// [`RideNotFound`](CoordinationError::RideNotFound),
    /// [`AlreadySettled`](CoordinationError::AlreadySettled), and every
    /// [`settle_ride_payment`](LedgerService::settle_ride_payment) error.
    /// On any error no balance changes and the payer stays unsettled.
    pub fn settle_fare(
        &self,
        ride_id: RideId,
        payer_id: &str,
    ) -> Result<SettlementReceipt, CoordinationError> {
        let mut store = self.registry.write_store();
        let ride = store
            .get_mut(ride_id)
            .ok_or(CoordinationError::RideNotFound(ride_id))?;

        if ride.has_settled(payer_id) {
            return Err(CoordinationError::AlreadySettled);
        }

        // Ride lock is held across the ledger call (ride lock before
        // balance lock); the ledger validates the snapshot and either
        // transfers in full or not at all.
        let receipt = self.ledger.settle_ride_payment(ride, payer_id)?;
        ride.settled.insert(payer_id.to_string());

        info!(
            ride_id,
            payer = %payer_id,
            amount = receipt.amount,
            "fare settlement recorded"
        );
        Ok(receipt)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
