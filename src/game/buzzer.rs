//! Buzzer Input
//!
//! Press/release events from Buzz-style controllers. Each physical buzzer
//! has a stable id that is looked up in a [`BuzzerMap`] to find the player
//! holding it, so event order or array position never decides identity.

use std::collections::BTreeMap;
use std::fmt;
use serde::{Serialize, Deserialize};

// =============================================================================
// PLAYERS
// =============================================================================

/// One of the two player seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerSlot {
    /// Player 1
    One = 0,
    /// Player 2
    Two = 1,
}

impl PlayerSlot {
    /// Both seats, in scoring order.
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    /// Array index for per-player storage.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for PlayerSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerSlot::One => f.write_str("player 1"),
            PlayerSlot::Two => f.write_str("player 2"),
        }
    }
}

// =============================================================================
// BUZZER EVENTS
// =============================================================================

/// Physical buzzer identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BuzzerId(pub u8);

/// Buttons on a buzzer. Only the big red one triggers the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BuzzerButton {
    /// Big red dome
    Red = 0,
    /// Blue
    Blue = 1,
    /// Orange
    Orange = 2,
    /// Green
    Green = 3,
    /// Yellow
    Yellow = 4,
}

impl BuzzerButton {
    /// Bit in the held-button mask.
    #[inline]
    pub const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Whether a button went down or up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    /// Button pressed
    Pressed,
    /// Button released
    Released,
}

/// A single discrete button transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuzzerEvent {
    /// Source buzzer
    pub buzzer: BuzzerId,
    /// Button that changed
    pub button: BuzzerButton,
    /// Direction of the change
    pub action: ButtonAction,
}

impl BuzzerEvent {
    /// Button pressed on a buzzer.
    pub const fn press(buzzer: BuzzerId, button: BuzzerButton) -> Self {
        Self { buzzer, button, action: ButtonAction::Pressed }
    }

    /// Button released on a buzzer.
    pub const fn release(buzzer: BuzzerId, button: BuzzerButton) -> Self {
        Self { buzzer, button, action: ButtonAction::Released }
    }

    /// Red button pressed on a buzzer.
    pub const fn red_press(buzzer: BuzzerId) -> Self {
        Self::press(buzzer, BuzzerButton::Red)
    }

    /// Whether this is a game trigger (red press).
    #[inline]
    pub fn is_red_press(&self) -> bool {
        self.button == BuzzerButton::Red && self.action == ButtonAction::Pressed
    }
}

// =============================================================================
// BUZZER MAP
// =============================================================================

/// Assignment of physical buzzers to player seats.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuzzerMap {
    seats: BTreeMap<BuzzerId, PlayerSlot>,
}

impl Default for BuzzerMap {
    /// Buzzer 0 is player 1, buzzer 1 is player 2.
    fn default() -> Self {
        let mut seats = BTreeMap::new();
        seats.insert(BuzzerId(0), PlayerSlot::One);
        seats.insert(BuzzerId(1), PlayerSlot::Two);
        Self { seats }
    }
}

impl BuzzerMap {
    /// A map with no buzzers assigned.
    pub fn empty() -> Self {
        Self { seats: BTreeMap::new() }
    }

    /// Assign a buzzer to a seat. A seat may hold only one buzzer, so any
    /// buzzer previously mapped to `player` is unassigned.
    pub fn assign(&mut self, buzzer: BuzzerId, player: PlayerSlot) {
        self.seats.retain(|_, seat| *seat != player);
        self.seats.insert(buzzer, player);
    }

    /// Seat holding a buzzer.
    pub fn player_for(&self, buzzer: BuzzerId) -> Option<PlayerSlot> {
        self.seats.get(&buzzer).copied()
    }

    /// Buzzer held by a seat.
    pub fn buzzer_for(&self, player: PlayerSlot) -> Option<BuzzerId> {
        self.seats
            .iter()
            .find(|(_, seat)| **seat == player)
            .map(|(id, _)| *id)
    }
}

// =============================================================================
// BUZZER PANEL
// =============================================================================

/// Tracks held buttons per seat and filters events down to game triggers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuzzerPanel {
    map: BuzzerMap,
    held: [u8; 2],
}

impl BuzzerPanel {
    /// Create a panel over a buzzer map.
    pub fn new(map: BuzzerMap) -> Self {
        Self { map, held: [0; 2] }
    }

    /// The buzzer map in use.
    pub fn map(&self) -> &BuzzerMap {
        &self.map
    }

    /// Record an event. Returns the seat for every red press from an
    /// assigned buzzer, including repeated presses without a release.
    pub fn apply(&mut self, event: &BuzzerEvent) -> Option<PlayerSlot> {
        let player = self.map.player_for(event.buzzer)?;
        let mask = &mut self.held[player.index()];

        match event.action {
            ButtonAction::Pressed => *mask |= event.button.bit(),
            ButtonAction::Released => *mask &= !event.button.bit(),
        }

        event.is_red_press().then_some(player)
    }

    /// Whether a seat currently holds a button down.
    pub fn is_held(&self, player: PlayerSlot, button: BuzzerButton) -> bool {
        self.held[player.index()] & button.bit() != 0
    }

    /// Forget all held buttons.
    pub fn release_all(&mut self) {
        self.held = [0; 2];
    }
}
