//! Matching engine: read-only ride discovery.
//!
//! ## Design Principles
//!
//! 1. **Read-only**: no query mutates the registry
//! 2. **Deterministic**: results follow the store's stable insertion order
//! 3. **Snapshot-consistent**: each query runs under one read lock, so it
//!    never observes a ride mid-update
//! 4. **No caching**: every call recomputes from current registry state
//!
//! Filters are plain data ([`SearchFilter`]), not ad hoc predicate
//! closures, so queries are statically specified and testable.

use std::sync::Arc;

use crate::registry::RideRegistry;
use crate::types::{Ride, RideStatus};

/// Criteria for [`MatchingEngine::search`].
///
/// `origin` and `destination` are case-insensitive substring filters.
/// When `status` is absent the search returns Open rides only, the only
/// status a caller can still act on.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Substring the ride's origin must contain (case-insensitive)
    pub origin: Option<String>,

    /// Substring the ride's destination must contain (case-insensitive)
    pub destination: Option<String>,

    /// Exact status to match; defaults to `Open` when absent
    pub status: Option<RideStatus>,
}

/// Read-only query layer over the ride registry.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use ridepool::{MatchingEngine, NotificationLog, RideRegistry, SearchFilter};
///
/// let registry = Arc::new(RideRegistry::new(Arc::new(NotificationLog::new())));
/// registry.create_ride("alice", "Mumbai", "Pune", 3, false, 0).unwrap();
/// registry.create_ride("bob", "Delhi", "Agra", 3, false, 0).unwrap();
///
/// let engine = MatchingEngine::new(Arc::clone(&registry));
/// let filter = SearchFilter {
///     origin: Some("mumbai".to_string()),
///     ..SearchFilter::default()
/// };
///
/// assert_eq!(engine.search(&filter).len(), 1);
/// ```
#[derive(Debug)]
pub struct MatchingEngine {
    registry: Arc<RideRegistry>,
}

impl MatchingEngine {
    /// Create an engine over the given registry
    pub fn new(registry: Arc<RideRegistry>) -> Self {
        Self { registry }
    }

    /// Find rides matching the filter, in insertion order.
    pub fn search(&self, filter: &SearchFilter) -> Vec<Ride> {
        let status = filter.status.unwrap_or(RideStatus::Open);
        let origin = filter.origin.as_deref().map(str::to_lowercase);
        let destination = filter.destination.as_deref().map(str::to_lowercase);

        self.registry
            .read_store()
            .iter()
            .filter(|ride| {
                ride.status == status
                    && origin
                        .as_deref()
                        .map_or(true, |o| ride.origin.to_lowercase().contains(o))
                    && destination
                        .as_deref()
                        .map_or(true, |d| ride.destination.to_lowercase().contains(d))
            })
            .cloned()
            .collect()
    }

    /// Find open rides a ride's riders could consolidate into.
    ///
    /// Returns rides with the same destination (case-insensitive exact
    /// match), a different owner, at least one free seat, excluding the
    /// given ride itself. Pure function of current registry state.
    pub fn find_similar(&self, ride: &Ride) -> Vec<Ride> {
        self.registry
            .read_store()
            .iter()
            .filter(|candidate| {
                candidate.ride_id != ride.ride_id
                    && candidate.status == RideStatus::Open
                    && candidate.owner_id != ride.owner_id
                    && !candidate.is_full()
                    && candidate
                        .destination
                        .eq_ignore_ascii_case(&ride.destination)
            })
            .cloned()
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
