//! Deterministic Random Number Generator
//!
//! Xorshift128+ seeded through SplitMix64. Every random draw in a session
//! (shape kind, shape color, spawn position, heading, wanted target) comes
//! from one of these, so a seed plus the buzzer log reproduces a session.

use serde::{Serialize, Deserialize};
use sha2::{Sha256, Digest};

use super::fixed::{Fixed, FIXED_ONE};
use super::vec2::FixedVec2;

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// ```
/// use shape_counter::core::rng::DeterministicRng;
///
/// let mut a = DeterministicRng::new(12345);
/// let mut b = DeterministicRng::new(12345);
/// assert_eq!(a.next_u64(), b.next_u64());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // All-zero state would be a fixed point
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random integer in range [0, max).
    ///
    /// Plain modulo. The bias is negligible for the tiny ranges used here.
    #[inline]
    pub fn next_int(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        (self.next_u64() % max as u64) as u32
    }

    /// Generate a random Fixed in range [0, max).
    #[inline]
    pub fn next_fixed(&mut self, max: Fixed) -> Fixed {
        if max <= 0 {
            return 0;
        }
        let raw = (self.next_u64() >> 32) as u32;
        ((raw as i64 * max as i64) >> 32) as Fixed
    }

    /// Generate a random Fixed in range [min, max).
    #[inline]
    pub fn next_fixed_range(&mut self, min: Fixed, max: Fixed) -> Fixed {
        if min >= max {
            return min;
        }
        let range = max.wrapping_sub(min);
        min.wrapping_add(self.next_fixed(range))
    }

    /// Generate a random unit heading.
    ///
    /// Rejection-samples the annulus 0.5 <= r <= 1, then normalizes.
    pub fn random_direction(&mut self) -> FixedVec2 {
        loop {
            let x = self.next_fixed_range(-FIXED_ONE, FIXED_ONE);
            let y = self.next_fixed_range(-FIXED_ONE, FIXED_ONE);
            let vec = FixedVec2::new(x, y);

            let len_sq = vec.length_squared();
            if (FIXED_ONE >> 2..=FIXED_ONE).contains(&len_sq) {
                return vec.normalize();
            }
        }
    }
}

/// SplitMix64 for seed initialization.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Derive a session seed from a label and a nonce.
///
/// The live binary feeds wall-clock nanoseconds as the nonce; tests and
/// replays pass fixed values.
pub fn derive_session_seed(label: &[u8], nonce: u64) -> u64 {
    let mut hasher = Sha256::new();

    hasher.update(b"SHAPE_COUNTER_SEED_V1");
    hasher.update(label);
    hasher.update(nonce.to_le_bytes());

    let hash = hasher.finalize();

    let mut seed = [0u8; 8];
    seed.copy_from_slice(&hash[0..8]);
    u64::from_le_bytes(seed)
}

// =============================================================================
// TESTS
// =============================================================================
