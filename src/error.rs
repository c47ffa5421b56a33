//! Categorical error type for every operation in the engine.
//!
//! Errors are business-rule rejections returned as typed results, never
//! control flow: the engine retries nothing internally, and a failed
//! mutation leaves every entity exactly as it was before the call. There
//! is no fatal error class in this core.

use thiserror::Error;

use crate::types::RideId;

/// Every rejection the coordination engine can return.
///
/// Each variant corresponds to exactly one business rule; callers match
/// on the variant to decide whether to re-submit (e.g. a join after
/// [`RideFull`](CoordinationError::RideFull)) or surface the failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinationError {
    /// Ride creation with a capacity below one seat
    #[error("ride capacity must be at least 1 (got {0})")]
    InvalidCapacity(usize),

    /// Credit or transfer of zero tokens
    #[error("token amount must be positive")]
    InvalidAmount,

    /// Lookup of a ride id that was never allocated
    #[error("ride {0} not found")]
    RideNotFound(RideId),

    /// Owner-only operation attempted by someone else
    #[error("caller is not the ride owner")]
    NotOwner,

    /// Transition out of `Cancelled` or `Completed`
    #[error("ride is already in a terminal state")]
    AlreadyTerminal,

    /// Join or assignment on a ride that is not `Open`
    #[error("ride is not open")]
    RideNotOpen,

    /// Join when every seat is taken
    #[error("ride is full")]
    RideFull,

    /// Join by someone already aboard, or by the ride's own owner
    #[error("rider is already part of this ride")]
    AlreadyJoined,

    /// Join as rider by the assigned driver
    #[error("the assigned driver cannot join as a rider")]
    SelfJoin,

    /// Driver assignment when a driver is already bound
    #[error("ride already has a driver")]
    DriverAlreadyAssigned,

    /// Owner re-assigning themselves to their own driver-created ride
    #[error("cannot drive a ride created as its own driver")]
    SelfAssignment,

    /// Debit larger than the payer's balance
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u64, need: u64 },

    /// Transfer where payer and payee are the same account
    #[error("payer and payee are the same account")]
    SelfTransfer,

    /// Settlement or completion on a ride with no driver bound
    #[error("ride has no driver assigned")]
    NoDriverAssigned,

    /// Settlement by an identity that never joined the ride
    #[error("payer is not a rider on this ride")]
    NotARider,

    /// Completion attempted by someone other than the assigned driver
    #[error("caller is not the assigned driver")]
    NotDriver,

    /// Second settlement attempt by the same rider on the same ride
    #[error("rider has already settled this ride")]
    AlreadySettled,
}

// ============================================================================
// Unit Tests
// ============================================================================
