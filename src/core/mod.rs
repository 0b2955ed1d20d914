//! Core deterministic primitives.
//!
//! Everything the round engine needs to replay a session exactly:
//! fixed-point math, a seeded RNG and a state hasher.

pub mod fixed;
pub mod vec2;
pub mod rng;
pub mod hash;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE, FIXED_HALF, FIXED_SCALE};
pub use vec2::FixedVec2;
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash};
