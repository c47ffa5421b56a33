//! Ridepool - Demo Binary
//!
//! Walks the full marketplace flow in-process: create a ride, join
//! riders, bind a driver, settle fares, and report rewards.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use ridepool::{
    AssignmentCoordinator, LedgerService, MatchingEngine, NotificationLog, RideRegistry,
    RewardsTracker, SearchFilter,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("===========================================");
    println!("  Ridepool - Marketplace Coordination Demo");
    println!("===========================================");
    println!();

    let notifications = Arc::new(NotificationLog::new());
    let registry = Arc::new(RideRegistry::new(Arc::clone(&notifications)));
    let ledger = Arc::new(LedgerService::new());
    let coordinator = AssignmentCoordinator::new(
        Arc::clone(&registry),
        Arc::clone(&ledger),
        Arc::clone(&notifications),
    );
    let matching = MatchingEngine::new(Arc::clone(&registry));
    let rewards = RewardsTracker::with_default_policy(Arc::clone(&registry));

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    // Alice posts a ride with three seats
    let ride_id = registry
        .create_ride("alice", "Mumbai", "Pune", 3, false, now)
        .expect("capacity is valid");
    println!("Created ride {ride_id}: Mumbai -> Pune, 3 seats");

    // Riders fund their wallets and join
    for rider in ["carol", "dave", "erin"] {
        ledger.credit(rider, 100).expect("amount is positive");
        coordinator
            .request_join(ride_id, rider)
            .expect("ride is open with free seats");
        println!("  {rider} joined (balance 100)");
    }

    // Dan takes the wheel
    coordinator
        .driver_join(ride_id, "dan")
        .expect("no driver assigned yet");
    println!("  dan assigned as driver");
    println!();

    // Discovery: anyone searching mumbai -> pune finds the ride
    let found = matching.search(&SearchFilter {
        origin: Some("mumbai".to_string()),
        destination: Some("pune".to_string()),
        status: None,
    });
    println!("Search 'mumbai' -> 'pune' found {} open ride(s)", found.len());

    // Each rider settles their share of the fixed 10-token fare
    println!();
    println!("Settling fares (10 tokens split 3 ways, rounded up):");
    for rider in ["carol", "dave", "erin"] {
        let receipt = coordinator
            .settle_fare(ride_id, rider)
            .expect("rider is aboard and funded");
        println!(
            "  {rider} paid {} tokens (balance {} -> driver balance {})",
            receipt.amount, receipt.payer_balance, receipt.driver_balance
        );
    }

    // Dan wraps up the trip
    coordinator
        .complete_ride(ride_id, "dan")
        .expect("caller is the assigned driver");
    println!();
    println!("Ride {ride_id} completed by dan");

    let status = rewards.check_driver_rewards("dan");
    println!("Rewards: {status}");

    println!();
    println!("Notifications for alice:");
    for message in notifications.for_user("alice") {
        println!("  - {message}");
    }

    println!();
    println!("Registry digest: {}", hex::encode(registry.state_digest()));
}
