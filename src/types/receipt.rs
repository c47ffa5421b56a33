//! Outcome records for ledger operations.
//!
//! Both types are plain value snapshots returned to the caller; the ledger
//! keeps no copy of them. They exist so success payloads carry enough
//! context to render a confirmation without a follow-up balance query.

use crate::types::RideId;

// ============================================================================
// TransferOutcome
// ============================================================================

/// Result of a successful token transfer.
///
/// Both balances are captured in the same atomic step that moved the
/// tokens, so they are mutually consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferOutcome {
    /// Payer balance after the debit
    pub payer_balance: u64,

    /// Payee balance after the credit
    pub payee_balance: u64,
}

// ============================================================================
// SettlementReceipt
// ============================================================================

/// Summary of one rider's fare settlement.
///
/// ## Example
///
/// ```
/// use ridepool::types::SettlementReceipt;
///
/// let receipt = SettlementReceipt {
///     ride_id: 1,
///     payer_id: "carol".to_string(),
///     driver_id: "dan".to_string(),
///     amount: 4,
///     rider_count: 3,
///     payer_balance: 96,
///     driver_balance: 4,
/// };
///
/// assert_eq!(receipt.amount, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    /// The ride being settled
    pub ride_id: RideId,

    /// Rider who paid their share
    pub payer_id: String,

    /// Driver who received the share
    pub driver_id: String,

    /// Tokens transferred (the per-person share of the fixed fare)
    pub amount: u64,

    /// Number of riders the fare was split across at settlement time
    pub rider_count: usize,

    /// Payer balance after the debit
    pub payer_balance: u64,

    /// Driver balance after the credit
    pub driver_balance: u64,
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_outcome_fields() {
        let outcome = TransferOutcome {
            payer_balance: 90,
            payee_balance: 10,
        };

        assert_eq!(outcome.payer_balance, 90);
        assert_eq!(outcome.payee_balance, 10);
    }

    #[test]
    fn test_settlement_receipt_fields() {
        let receipt = SettlementReceipt {
            ride_id: 3,
            payer_id: "carol".to_string(),
            driver_id: "dan".to_string(),
            amount: 5,
            rider_count: 2,
            payer_balance: 95,
            driver_balance: 5,
        };

        assert_eq!(receipt.ride_id, 3);
        assert_eq!(receipt.payer_id, "carol");
        assert_eq!(receipt.driver_id, "dan");
        assert_eq!(receipt.amount, 5);
        assert_eq!(receipt.rider_count, 2);
    }
}
