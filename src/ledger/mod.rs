//! Token ledger: the single owner of per-account balances.
//!
//! ## Design
//!
//! Balances are whole `u64` token counts in a map guarded by one
//! `RwLock`. A transfer debits and credits under a single write-lock
//! acquisition, so no observer can see one side applied without the
//! other and no balance can go below zero.
//!
//! Accounts are created lazily on first credit and never destroyed;
//! reading an unknown account yields balance 0 without creating it.
//!
//! The ledger never calls into the ride registry. Cross-entity settlement
//! acquires the ride lock first and the balance lock second, so the two
//! locks can never form a cycle.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::error::CoordinationError;
use crate::types::fare::per_person_cost;
use crate::types::{Ride, SettlementReceipt, TransferOutcome};

/// Owner of all account balances and payment operations.
///
/// ## Example
///
/// ```
/// use ridepool::LedgerService;
///
/// let ledger = LedgerService::new();
/// ledger.credit("alice", 100).unwrap();
/// ledger.transfer("alice", "bob", 40).unwrap();
///
/// assert_eq!(ledger.get_balance("alice"), 60);
/// assert_eq!(ledger.get_balance("bob"), 40);
/// ```
#[derive(Debug, Default)]
pub struct LedgerService {
    balances: RwLock<HashMap<String, u64>>,
}

impl LedgerService {
    /// Create a ledger with no accounts
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Balance Operations
    // ========================================================================

    /// Credit tokens to an account, creating it on first use.
    ///
    /// Issuance policy (who may credit, against what payment) is the
    /// caller's concern; the ledger only records the credit.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::InvalidAmount`] if `amount` is zero.
    pub fn credit(&self, account_id: &str, amount: u64) -> Result<u64, CoordinationError> {
        if amount == 0 {
            return Err(CoordinationError::InvalidAmount);
        }

        let mut balances = self.write_balances();
        let balance = balances.entry(account_id.to_string()).or_insert(0);
        *balance = balance.saturating_add(amount);
        let new_balance = *balance;

        debug!(account = %account_id, amount, new_balance, "credit applied");
        Ok(new_balance)
    }

    /// Current balance of an account; 0 for unknown accounts.
    ///
    /// Reading never creates the account.
    pub fn get_balance(&self, account_id: &str) -> u64 {
        self.read_balances().get(account_id).copied().unwrap_or(0)
    }

    /// Move tokens between two accounts as a single atomic step.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::InvalidAmount`] for a zero amount,
    /// [`CoordinationError::SelfTransfer`] if payer and payee are the same
    /// account, and [`CoordinationError::InsufficientBalance`] if the
    /// payer cannot cover the amount. On any error no balance changes.
    pub fn transfer(
        &self,
        payer_id: &str,
        payee_id: &str,
        amount: u64,
    ) -> Result<TransferOutcome, CoordinationError> {
        if amount == 0 {
            return Err(CoordinationError::InvalidAmount);
        }
        if payer_id == payee_id {
            return Err(CoordinationError::SelfTransfer);
        }

        let mut balances = self.write_balances();

        let payer_balance = balances.get(payer_id).copied().unwrap_or(0);
        if payer_balance < amount {
            return Err(CoordinationError::InsufficientBalance {
                have: payer_balance,
                need: amount,
            });
        }

        // Both sides update under the same write guard; there is no
        // observable state with only one side applied.
        let new_payer_balance = payer_balance - amount;
        balances.insert(payer_id.to_string(), new_payer_balance);
        let payee_balance = balances.entry(payee_id.to_string()).or_insert(0);
        *payee_balance = payee_balance.saturating_add(amount);
        let new_payee_balance = *payee_balance;

        debug!(
            payer = %payer_id,
            payee = %payee_id,
            amount,
            "transfer applied"
        );
        Ok(TransferOutcome {
            payer_balance: new_payer_balance,
            payee_balance: new_payee_balance,
        })
    }

    // ========================================================================
    // Ride Settlement
    // ========================================================================

    /// Settle one rider's share of a ride's fixed fare.
    ///
    /// The share is `ceil(FIXED_RIDE_COST / rider_count)` and goes to the
    /// assigned driver. This operation validates the ride snapshot it is
    /// given and performs the transfer; at-most-once bookkeeping per
    /// rider is the assignment coordinator's job.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::NoDriverAssigned`] if the ride has no
    /// driver, [`CoordinationError::NotARider`] if the payer never joined,
    /// plus any [`transfer`](Self::transfer) error.
    pub fn settle_ride_payment(
        &self,
        ride: &Ride,
        payer_id: &str,
    ) -> Result<SettlementReceipt, CoordinationError> {
        let driver_id = ride
            .driver_id
            .as_deref()
            .ok_or(CoordinationError::NoDriverAssigned)?;
        if !ride.has_rider(payer_id) {
            return Err(CoordinationError::NotARider);
        }

        let rider_count = ride.riders.len();
        let amount = per_person_cost(rider_count);
        let outcome = self.transfer(payer_id, driver_id, amount)?;

        info!(
            ride_id = ride.ride_id,
            payer = %payer_id,
            driver = %driver_id,
            amount,
            "fare settled"
        );
        Ok(SettlementReceipt {
            ride_id: ride.ride_id,
            payer_id: payer_id.to_string(),
            driver_id: driver_id.to_string(),
            amount,
            rider_count,
            payer_balance: outcome.payer_balance,
            driver_balance: outcome.payee_balance,
        })
    }

    // A poisoned lock still guards consistent data: every critical section
    // validates before mutating and cannot panic in between.
    fn read_balances(&self) -> RwLockReadGuard<'_, HashMap<String, u64>> {
        self.balances.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_balances(&self) -> RwLockWriteGuard<'_, HashMap<String, u64>> {
        self.balances.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
