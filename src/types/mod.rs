//! Core data types for the ridepool coordination engine.
//!
//! ## Types
//!
//! - [`Ride`]: A shareable trip record with owner, capacity, and riders
//! - [`RideStatus`]: Monotonic lifecycle status (`Open`/`Cancelled`/`Completed`)
//! - [`TransferOutcome`]: Balances after an atomic token transfer
//! - [`SettlementReceipt`]: Summary of one rider's fare settlement
//!
//! ## Token Amounts
//!
//! All token amounts are whole `u64` values; there are no fractional
//! tokens. Fare math lives in [`fare`].

mod receipt;
mod ride;
pub mod fare;

// Re-export all types at module level
pub use receipt::{SettlementReceipt, TransferOutcome};
pub use ride::{Ride, RideId, RideStatus};
