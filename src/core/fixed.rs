//! Q16.16 Fixed-Point Arithmetic
//!
//! Shape motion is integrated in fixed-point so that a recorded session
//! replays bit-for-bit on any platform.
//!
//! ## Format: Q16.16
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  [S][IIIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]                    │
//! │   │  └──── 16 bits ────┘└──── 16 bits ────┘                 │
//! │   └─ Sign bit                                               │
//! │                                                             │
//! │  Range: -32768.0 to +32767.99998 (approx)                   │
//! │  Precision: 1/65536 px                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A 500 px canvas uses a small fraction of the range, so wrapping never
//! occurs for on-canvas positions.

/// Q16.16 fixed-point number stored as i32.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE;

/// 0.5 in fixed-point (32768)
pub const FIXED_HALF: Fixed = FIXED_ONE >> 1;

// =============================================================================
// CANVAS CONSTANTS (integer literals only)
// =============================================================================

/// Tick duration: 1/60 second = round(65536/60) = 1092
pub const TICK_DURATION: Fixed = 1092;

/// Canvas width: 500 px
pub const CANVAS_WIDTH: Fixed = 500 * FIXED_ONE;

/// Canvas height: 500 px
pub const CANVAS_HEIGHT: Fixed = 500 * FIXED_ONE;

/// Edge length of a square / diameter of a circle: 30 px
pub const SHAPE_SIZE: Fixed = 30 * FIXED_ONE;

/// Pixels per second contributed by one unit of speed factor.
pub const SPEED_UNIT: Fixed = 20 * FIXED_ONE;

// =============================================================================
// CORE OPERATIONS (wrapping semantics)
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// Only for constants and test fixtures; never inside the tick loop.
///
/// ```
/// use shape_counter::core::fixed::{to_fixed, FIXED_ONE};
/// const MY_VALUE: i32 = to_fixed(2.5);
/// assert_eq!(MY_VALUE, FIXED_ONE * 2 + FIXED_ONE / 2);
/// ```
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert an integer pixel count to fixed-point.
#[inline]
pub const fn from_int(i: i32) -> Fixed {
    i << FIXED_SCALE
}

/// Convert fixed-point to float for rendering.
#[inline]
pub fn to_float(f: Fixed) -> f32 {
    f as f32 / FIXED_ONE as f32
}

/// Multiply two fixed-point numbers via an i64 intermediate.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    let wide = (a as i64) * (b as i64);
    (wide >> FIXED_SCALE) as Fixed
}

/// Divide two fixed-point numbers.
///
/// Returns 0 on divide-by-zero.
#[inline]
pub fn fixed_div(a: Fixed, b: Fixed) -> Fixed {
    if b == 0 {
        return 0;
    }
    let wide = (a as i64) << FIXED_SCALE;
    (wide / b as i64) as Fixed
}

/// Square root using Newton-Raphson iteration.
///
/// Returns 0 for non-positive inputs. Always runs 6 iterations.
#[inline]
pub fn fixed_sqrt(x: Fixed) -> Fixed {
    if x <= 0 {
        return 0;
    }

    let mut guess = (x >> 1).max(1);

    for _ in 0..6 {
        let div = fixed_div(x, guess);
        guess = (guess.wrapping_add(div)) >> 1;

        if guess == 0 {
            guess = 1;
        }
    }

    guess
}

/// Clamp a fixed-point number to a range.
#[inline]
pub fn fixed_clamp(value: Fixed, min: Fixed, max: Fixed) -> Fixed {
    value.max(min).min(max)
}

// =============================================================================
// TESTS
// =============================================================================
