//! # Ridepool
//!
//! Ride marketplace coordination engine with seat invariants and token
//! settlement.
//!
//! ## Architecture
//!
//! The engine consists of, leaf-first:
//! - **Types**: Core data structures (Ride, SettlementReceipt, fare math)
//! - **LedgerService**: Per-account token balances and atomic transfers
//! - **RideRegistry**: Slab-backed ride store and lifecycle operations
//! - **AssignmentCoordinator**: Rider joins, driver binding, completion,
//!   and fare settlement
//! - **MatchingEngine**: Read-only ride discovery
//! - **RewardsTracker**: Driver loyalty status via pluggable policies
//!
//! ## Design Principles
//!
//! 1. **Explicit identity**: every operation takes the caller's identity
//!    as a parameter; there is no ambient session state
//! 2. **Per-entity linearizability**: each mutation runs its whole
//!    check-then-act sequence under one write lock, so capacity and
//!    single-driver invariants hold under any interleaving
//! 3. **No partial effects**: a failed operation leaves every entity
//!    exactly as it was; cross-entity settlement is atomic to observers
//! 4. **Whole tokens**: all amounts are `u64`; fare shares round up so
//!    integer division never underpays the driver

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Ride, RideStatus, receipts, fare math
pub mod types;

/// Categorical error type for every operation
pub mod error;

/// User-directed notification log
pub mod notify;

/// Token ledger: balances, transfers, fare settlement
pub mod ledger;

/// Ride registry: slab-backed store and lifecycle
pub mod registry;

/// Assignment coordinator: joins, driver binding, settlement
pub mod coordinator;

/// Matching engine: read-only ride discovery
pub mod matching;

/// Rewards tracker: driver loyalty via pluggable policies
pub mod rewards;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use coordinator::AssignmentCoordinator;
pub use error::CoordinationError;
pub use ledger::LedgerService;
pub use matching::{MatchingEngine, SearchFilter};
pub use notify::{Notification, NotificationLog};
pub use registry::{RideRegistry, RideStore};
pub use rewards::{DriverHistory, MilestonePolicy, RewardPolicy, RewardStatus, RewardsTracker};
pub use types::{Ride, RideId, RideStatus, SettlementReceipt, TransferOutcome};
