//! State Hashing for Replay Verification
//!
//! SHA-256 over an explicit, ordered byte encoding of round state. Two runs
//! with the same seed and the same buzzer log must agree on every hash.

use sha2::{Sha256, Digest};
use super::fixed::Fixed;
use super::vec2::FixedVec2;

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for round state.
///
/// Order of updates is significant.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for round state.
    pub fn for_round_state() -> Self {
        Self::new(b"SHAPE_COUNTER_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a Fixed value.
    #[inline]
    pub fn update_fixed(&mut self, value: Fixed) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a FixedVec2.
    #[inline]
    pub fn update_vec2(&mut self, value: FixedVec2) {
        self.update_fixed(value.x);
        self.update_fixed(value.y);
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute a round-state hash.
///
/// Tick and seed always go first; `add_state` appends the rest.
pub fn compute_state_hash<F>(tick: u32, rng_seed: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_round_state();

    hasher.update_u32(tick);
    hasher.update_u64(rng_seed);

    add_state(&mut hasher);

    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed::to_fixed;

    #[test]
    fn test_state_hasher_determinism() {
        let make_hash = || {
            let mut hasher = StateHasher::for_round_state();
            hasher.update_u32(100);
            hasher.update_fixed(to_fixed(5.5));
            hasher.update_vec2(FixedVec2::new(to_fixed(1.0), to_fixed(2.0)));
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = StateHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_compute_state_hash() {
        let hash = compute_state_hash(100, 12345, |hasher| hasher.update_u8(3));
        let same = compute_state_hash(100, 12345, |hasher| hasher.update_u8(3));
        let later = compute_state_hash(101, 12345, |hasher| hasher.update_u8(3));

        assert_eq!(hash, same);
        assert_ne!(hash, later);
    }
}
