//! Driver loyalty status derived from ride history.
//!
//! ## Design
//!
//! The tracker counts a driver's rides from the registry and hands the
//! counts to a pluggable [`RewardPolicy`], which turns them into an
//! opaque tier label. Policies are pure functions of the history, so
//! swapping the tiering rule never touches the counting code.
//!
//! The tracker is strictly read-only: it reports status and never
//! credits balances (reward issuance is token minting policy, which
//! lives outside this engine).

use std::fmt;
use std::sync::Arc;

use crate::registry::RideRegistry;
use crate::types::RideStatus;

// ============================================================================
// History and status records
// ============================================================================

/// A driver's ride counts, as read from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverHistory {
    /// Driver identity handle
    pub driver_id: String,

    /// Rides where this driver is assigned, any status
    pub assigned_rides: u64,

    /// Assigned rides that reached `Completed`
    pub completed_rides: u64,
}

/// Loyalty status produced by a policy for one driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardStatus {
    /// Driver identity handle
    pub driver_id: String,

    /// Rides where this driver is assigned, any status
    pub assigned_rides: u64,

    /// Assigned rides that reached `Completed`
    pub completed_rides: u64,

    /// Opaque tier label chosen by the policy
    pub tier: String,

    /// Assigned rides remaining until the next tier
    pub rides_until_next_tier: u64,
}

impl fmt::Display for RewardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "driver {} is {} ({} rides, {} until next tier)",
            self.driver_id, self.tier, self.assigned_rides, self.rides_until_next_tier
        )
    }
}

// ============================================================================
// Policy trait
// ============================================================================

/// Tiering rule: turns a ride history into a loyalty status.
pub trait RewardPolicy: Send + Sync {
    /// Evaluate a driver's history into a status report
    fn evaluate(&self, history: &DriverHistory) -> RewardStatus;
}

/// Default policy: one tier per fixed block of assigned rides.
///
/// With the default block of 10, a driver reaches `milestone-1` at 10
/// rides, `milestone-2` at 20, and so on; below the first block the
/// label is `standard`.
#[derive(Debug, Clone, Copy)]
pub struct MilestonePolicy {
    /// Assigned rides per tier
    pub rides_per_tier: u64,
}

impl Default for MilestonePolicy {
    fn default() -> Self {
        Self { rides_per_tier: 10 }
    }
}

impl RewardPolicy for MilestonePolicy {
    fn evaluate(&self, history: &DriverHistory) -> RewardStatus {
        let per_tier = self.rides_per_tier.max(1);
        let tier_index = history.assigned_rides / per_tier;
        let tier = if tier_index == 0 {
            "standard".to_string()
        } else {
            format!("milestone-{tier_index}")
        };

        RewardStatus {
            driver_id: history.driver_id.clone(),
            assigned_rides: history.assigned_rides,
            completed_rides: history.completed_rides,
            tier,
            rides_until_next_tier: per_tier - (history.assigned_rides % per_tier),
        }
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Read-only loyalty reporting over the ride registry.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use ridepool::{NotificationLog, RewardsTracker, RideRegistry};
///
/// let registry = Arc::new(RideRegistry::new(Arc::new(NotificationLog::new())));
/// let tracker = RewardsTracker::with_default_policy(Arc::clone(&registry));
///
/// let status = tracker.check_driver_rewards("dan");
/// assert_eq!(status.assigned_rides, 0);
/// assert_eq!(status.tier, "standard");
/// ```
pub struct RewardsTracker {
    registry: Arc<RideRegistry>,
    policy: Box<dyn RewardPolicy>,
}

impl RewardsTracker {
    /// Create a tracker with an explicit policy
    pub fn new(registry: Arc<RideRegistry>, policy: Box<dyn RewardPolicy>) -> Self {
        Self { registry, policy }
    }

    /// Create a tracker with the default [`MilestonePolicy`]
    pub fn with_default_policy(registry: Arc<RideRegistry>) -> Self {
        Self::new(registry, Box::new(MilestonePolicy::default()))
    }

    /// Derive a driver's loyalty status from their ride history.
    ///
    /// Counts are recomputed from the registry on every call; nothing is
    /// cached and nothing is mutated.
    pub fn check_driver_rewards(&self, driver_id: &str) -> RewardStatus {
        let history = self.driver_history(driver_id);
        self.policy.evaluate(&history)
    }

    fn driver_history(&self, driver_id: &str) -> DriverHistory {
        let store = self.registry.read_store();
        let mut assigned_rides = 0u64;
        let mut completed_rides = 0u64;

        for ride in store.iter() {
            if ride.is_driver(driver_id) {
                assigned_rides += 1;
                if ride.status == RideStatus::Completed {
                    completed_rides += 1;
                }
            }
        }

        DriverHistory {
            driver_id: driver_id.to_string(),
            assigned_rides,
            completed_rides,
        }
    }
}

impl fmt::Debug for RewardsTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewardsTracker").finish_non_exhaustive()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationLog;

    fn tracker() -> (Arc<RideRegistry>, RewardsTracker) {
        let registry = Arc::new(RideRegistry::new(Arc::new(NotificationLog::new())));
        let tracker = RewardsTracker::with_default_policy(Arc::clone(&registry));
        (registry, tracker)
    }

    fn add_driven_ride(registry: &RideRegistry, driver: &str, completed: bool) {
        let ride_id = registry
            .create_ride(driver, "A", "B", 2, true, 0)
            .unwrap();
        if completed {
            registry.write_store().get_mut(ride_id).unwrap().status = RideStatus::Completed;
        }
    }

    #[test]
    fn test_unknown_driver_is_standard() {
        let (_registry, tracker) = tracker();

        let status = tracker.check_driver_rewards("nobody");

        assert_eq!(status.assigned_rides, 0);
        assert_eq!(status.completed_rides, 0);
        assert_eq!(status.tier, "standard");
        assert_eq!(status.rides_until_next_tier, 10);
    }

    #[test]
    fn test_counts_assigned_and_completed_separately() {
        let (registry, tracker) = tracker();
        add_driven_ride(&registry, "dan", true);
        add_driven_ride(&registry, "dan", false);
        add_driven_ride(&registry, "erin", true);

        let status = tracker.check_driver_rewards("dan");

        assert_eq!(status.assigned_rides, 2);
        assert_eq!(status.completed_rides, 1);
    }

    #[test]
    fn test_milestone_boundaries() {
        let (registry, tracker) = tracker();
        for _ in 0..9 {
            add_driven_ride(&registry, "dan", true);
        }

        let status = tracker.check_driver_rewards("dan");
        assert_eq!(status.tier, "standard");
        assert_eq!(status.rides_until_next_tier, 1);

        add_driven_ride(&registry, "dan", true);
        let status = tracker.check_driver_rewards("dan");
        assert_eq!(status.tier, "milestone-1");
        assert_eq!(status.rides_until_next_tier, 10);
    }

    #[test]
    fn test_custom_policy_is_pluggable() {
        struct FlatPolicy;

        impl RewardPolicy for FlatPolicy {
            fn evaluate(&self, history: &DriverHistory) -> RewardStatus {
                RewardStatus {
                    driver_id: history.driver_id.clone(),
                    assigned_rides: history.assigned_rides,
                    completed_rides: history.completed_rides,
                    tier: "flat".to_string(),
                    rides_until_next_tier: 0,
                }
            }
        }

        let registry = Arc::new(RideRegistry::new(Arc::new(NotificationLog::new())));
        let tracker = RewardsTracker::new(registry, Box::new(FlatPolicy));

        assert_eq!(tracker.check_driver_rewards("dan").tier, "flat");
    }

    #[test]
    fn test_status_display() {
        let status = RewardStatus {
            driver_id: "dan".to_string(),
            assigned_rides: 12,
            completed_rides: 11,
            tier: "milestone-1".to_string(),
            rides_until_next_tier: 8,
        };

        assert_eq!(
            status.to_string(),
            "driver dan is milestone-1 (12 rides, 8 until next tier)"
        );
    }
}
