//! Ride record and lifecycle status for the ridepool coordination engine.
//!
//! ## Status State Machine
//!
//! ```text
//! Open ──► Cancelled   (terminal, owner-initiated)
//!   └────► Completed   (terminal, driver-initiated)
//! ```
//!
//! `Open` covers both "seeking driver" and "driver assigned, holding riders":
//! assigning a driver changes `driver_id`, never `status`, so riders can keep
//! joining an Open ride whether or not a driver is aboard yet.

use std::collections::HashSet;

/// Unique ride identifier, monotonically assigned by the registry.
pub type RideId = u64;

// ============================================================================
// RideStatus enum
// ============================================================================

/// Lifecycle status of a ride.
///
/// Transitions are monotonic: a ride starts `Open` and moves at most once,
/// into `Cancelled` or `Completed`. Terminal states admit no further
/// mutation of any kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RideStatus {
    /// Accepting riders and (if unset) a driver
    #[default]
    Open,
    /// Cancelled by the owner; record is kept for history
    Cancelled,
    /// Trip finished by the assigned driver
    Completed,
}

impl RideStatus {
    /// Check whether this status admits no further transitions
    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Cancelled | RideStatus::Completed)
    }

    /// Stable tag for deterministic encodings
    pub fn tag(self) -> u8 {
        match self {
            RideStatus::Open => 0,
            RideStatus::Cancelled => 1,
            RideStatus::Completed => 2,
        }
    }
}

// ============================================================================
// Ride struct
// ============================================================================

/// A shareable trip record with an owner, capacity, optional driver, and a
/// set of joined riders.
///
/// ## Invariants
///
/// - `riders.len() <= max_riders` at all times
/// - `driver_id`, once set, never changes
/// - the owner is never auto-inserted into `riders` at creation; they may
///   appear only by joining someone else's ride
/// - `settled` only ever contains members of `riders`
///
/// ## Example
///
/// ```
/// use ridepool::types::{Ride, RideStatus};
///
/// // Driver-created ride: the creator is bound as driver at creation
/// let ride = Ride::new(1, "alice", "Mumbai", "Pune", 3, true, 1000);
///
/// assert_eq!(ride.status, RideStatus::Open);
/// assert_eq!(ride.driver_id.as_deref(), Some("alice"));
/// assert!(ride.is_driver_created);
/// assert!(ride.riders.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ride {
    /// Unique ride identifier (assigned by the registry)
    pub ride_id: RideId,

    /// Identity of the creator
    pub owner_id: String,

    /// Free-text starting location (matched case-insensitively)
    pub origin: String,

    /// Free-text destination (matched case-insensitively)
    pub destination: String,

    /// Seat capacity; always at least 1
    pub max_riders: usize,

    /// Joined rider identities; never exceeds `max_riders`
    pub riders: HashSet<String>,

    /// Assigned driver, unset until exactly one successful assignment
    pub driver_id: Option<String>,

    /// Lifecycle status
    pub status: RideStatus,

    /// Caller-supplied creation timestamp, immutable
    pub created_at: u64,

    /// Whether the creator was auto-assigned as driver at creation
    pub is_driver_created: bool,

    /// Riders whose fare share has been settled (at most once each)
    pub settled: HashSet<String>,
}

impl Ride {
    /// Create a new open ride.
    ///
    /// When `auto_assign_driver` is true, the owner is bound as driver in
    /// the same step; there is never a separate assignment for
    /// driver-created rides.
    ///
    /// Capacity validation happens in the registry, not here.
    pub fn new(
        ride_id: RideId,
        owner_id: &str,
        origin: &str,
        destination: &str,
        max_riders: usize,
        auto_assign_driver: bool,
        created_at: u64,
    ) -> Self {
        Self {
            ride_id,
            owner_id: owner_id.to_string(),
            origin: origin.to_string(),
            destination: destination.to_string(),
            max_riders,
            riders: HashSet::new(),
            driver_id: auto_assign_driver.then(|| owner_id.to_string()),
            status: RideStatus::Open,
            created_at,
            is_driver_created: auto_assign_driver,
            settled: HashSet::new(),
        }
    }

    /// Check whether the ride is still accepting mutations
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == RideStatus::Open
    }

    /// Check whether every seat is taken
    #[inline]
    pub fn is_full(&self) -> bool {
        self.riders.len() >= self.max_riders
    }

    /// Number of seats still available
    #[inline]
    pub fn free_seats(&self) -> usize {
        self.max_riders.saturating_sub(self.riders.len())
    }

    /// Check whether `user_id` has joined as a rider
    #[inline]
    pub fn has_rider(&self, user_id: &str) -> bool {
        self.riders.contains(user_id)
    }

    /// Check whether `user_id` is the assigned driver
    #[inline]
    pub fn is_driver(&self, user_id: &str) -> bool {
        self.driver_id.as_deref() == Some(user_id)
    }

    /// Check whether `user_id` already settled their fare share
    #[inline]
    pub fn has_settled(&self, user_id: &str) -> bool {
        self.settled.contains(user_id)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
