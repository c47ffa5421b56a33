//! Slab-backed storage for ride records.
//!
//! ## Architecture
//!
//! The store uses the same layout as a pre-allocated order book:
//!
//! - **Slab**: Pre-allocated storage for O(1) ride access
//! - **HashMap**: Ride ID to slab key mapping for O(1) lookup
//!
//! Rides are never removed (cancellation is a status change, not a
//! deletion), so slab keys are never freed: key order equals insertion
//! order and iteration is stable across the store's lifetime.
//!
//! ## State Digest
//!
//! `state_digest` folds a deterministic encoding of every ride into a
//! SHA-256 hash. Two stores that processed the same operation sequence
//! produce identical digests, which the stress suite uses to verify
//! determinism.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use slab::Slab;

use crate::types::{Ride, RideId};

/// In-memory ride collection with O(1) id lookup and stable iteration.
#[derive(Debug, Default)]
pub struct RideStore {
    /// Pre-allocated ride storage; keys are never freed
    rides: Slab<Ride>,

    /// Ride ID to slab key mapping
    ride_index: HashMap<RideId, usize>,

    /// Next ride ID (monotonic, starts at 1)
    next_ride_id: RideId,
}

impl RideStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            rides: Slab::new(),
            ride_index: HashMap::new(),
            next_ride_id: 1,
        }
    }

    /// Create a store with pre-allocated capacity
    pub fn with_capacity(ride_capacity: usize) -> Self {
        Self {
            rides: Slab::with_capacity(ride_capacity),
            ride_index: HashMap::with_capacity(ride_capacity),
            next_ride_id: 1,
        }
    }

    /// Allocate the next monotonic ride id and insert a ride built from it.
    ///
    /// The builder receives the freshly allocated id so the stored record
    /// and the index can never disagree about it.
    pub fn insert_with(&mut self, build: impl FnOnce(RideId) -> Ride) -> RideId {
        let ride_id = self.next_ride_id;
        self.next_ride_id += 1;

        let key = self.rides.insert(build(ride_id));
        self.ride_index.insert(ride_id, key);
        ride_id
    }

    /// Get a reference to a ride by id
    #[inline]
    pub fn get(&self, ride_id: RideId) -> Option<&Ride> {
        let key = *self.ride_index.get(&ride_id)?;
        self.rides.get(key)
    }

    /// Get a mutable reference to a ride by id
    #[inline]
    pub fn get_mut(&mut self, ride_id: RideId) -> Option<&mut Ride> {
        let key = *self.ride_index.get(&ride_id)?;
        self.rides.get_mut(key)
    }

    /// Check whether a ride id has been allocated
    #[inline]
    pub fn contains(&self, ride_id: RideId) -> bool {
        self.ride_index.contains_key(&ride_id)
    }

    /// Number of rides in the store
    #[inline]
    pub fn len(&self) -> usize {
        self.rides.len()
    }

    /// Check whether the store holds no rides
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }

    /// Iterate over all rides in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Ride> {
        // Slab iteration is ascending by key; keys are never freed, so
        // this is insertion order.
        self.rides.iter().map(|(_, ride)| ride)
    }

    /// Compute a SHA-256 digest over the full ride collection.
    ///
    /// The encoding is length-prefixed and set fields are sorted, so the
    /// digest depends only on record contents, never on hash-map or
    /// hash-set iteration order.
    pub fn state_digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update((self.rides.len() as u64).to_le_bytes());

        for ride in self.iter() {
            hasher.update(ride.ride_id.to_le_bytes());
            hash_str(&mut hasher, &ride.owner_id);
            hash_str(&mut hasher, &ride.origin);
            hash_str(&mut hasher, &ride.destination);
            hasher.update((ride.max_riders as u64).to_le_bytes());
            hash_str_set(&mut hasher, &ride.riders);
            match &ride.driver_id {
                Some(driver) => {
                    hasher.update([1u8]);
                    hash_str(&mut hasher, driver);
                }
                None => hasher.update([0u8]),
            }
            hasher.update([ride.status.tag()]);
            hasher.update(ride.created_at.to_le_bytes());
            hasher.update([u8::from(ride.is_driver_created)]);
            hash_str_set(&mut hasher, &ride.settled);
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }
}

fn hash_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hash_str_set(hasher: &mut Sha256, set: &std::collections::HashSet<String>) {
    let mut members: Vec<&String> = set.iter().collect();
    members.sort();
    hasher.update((members.len() as u64).to_le_bytes());
    for member in members {
        hash_str(hasher, member);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_ride(store: &mut RideStore, owner: &str, dest: &str) -> RideId {
        store.insert_with(|id| Ride::new(id, owner, "Origin", dest, 4, false, 0))
    }

    #[test]
    fn test_store_new() {
        let store = RideStore::new();

        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(!store.contains(1));
        assert!(store.get(1).is_none());
    }

    #[test]
    fn test_ids_are_monotonic_from_one() {
        let mut store = RideStore::new();

        let first = insert_ride(&mut store, "alice", "Pune");
        let second = insert_ride(&mut store, "bob", "Goa");
        let third = insert_ride(&mut store, "carol", "Pune");

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(third, 3);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_by_id() {
        let mut store = RideStore::new();
        let id = insert_ride(&mut store, "alice", "Pune");

        let ride = store.get(id).unwrap();
        assert_eq!(ride.ride_id, id);
        assert_eq!(ride.owner_id, "alice");

        assert!(store.get(999).is_none());
    }

    #[test]
    fn test_get_mut_persists_changes() {
        let mut store = RideStore::new();
        let id = insert_ride(&mut store, "alice", "Pune");

        store.get_mut(id).unwrap().riders.insert("carol".to_string());

        assert!(store.get(id).unwrap().has_rider("carol"));
    }

    #[test]
    fn test_iteration_is_insertion_order() {
        let mut store = RideStore::new();
        insert_ride(&mut store, "alice", "Pune");
        insert_ride(&mut store, "bob", "Goa");
        insert_ride(&mut store, "carol", "Nashik");

        let owners: Vec<&str> = store.iter().map(|r| r.owner_id.as_str()).collect();
        assert_eq!(owners, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_digest_is_deterministic() {
        let build = || {
            let mut store = RideStore::new();
            let id = insert_ride(&mut store, "alice", "Pune");
            insert_ride(&mut store, "bob", "Goa");
            let ride = store.get_mut(id).unwrap();
            ride.riders.insert("carol".to_string());
            ride.riders.insert("dave".to_string());
            store
        };

        assert_eq!(build().state_digest(), build().state_digest());
    }

    #[test]
    fn test_digest_tracks_content_changes() {
        let mut store = RideStore::new();
        let id = insert_ride(&mut store, "alice", "Pune");
        let before = store.state_digest();

        store.get_mut(id).unwrap().riders.insert("carol".to_string());
        let after = store.state_digest();

        assert_ne!(before, after);
    }

    #[test]
    fn test_digest_empty_store() {
        assert_eq!(RideStore::new().state_digest(), RideStore::new().state_digest());
    }
}
