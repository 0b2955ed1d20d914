//! Wanted Target
//!
//! The (kind, color) pair players are asked to count, plus the text shown
//! to them ("roten Kreise", "blue squares", ...).

use std::fmt;
use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::game::shape::{ShapeKind, ShapeColor};

/// Language used for the announcement text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    /// German
    #[default]
    German,
    /// English
    English,
}

impl Locale {
    /// Parse a language code (`de`, `en`, case-insensitive).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "de" | "de-de" | "german" => Some(Locale::German),
            "en" | "en-us" | "en-gb" | "english" => Some(Locale::English),
            _ => None,
        }
    }
}

/// The shape players must count this round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WantedTarget {
    /// Wanted kind
    pub kind: ShapeKind,
    /// Wanted color
    pub color: ShapeColor,
}

impl WantedTarget {
    /// Create a target.
    pub const fn new(kind: ShapeKind, color: ShapeColor) -> Self {
        Self { kind, color }
    }

    /// Roll a fresh target. Kind and color are independent and uniform;
    /// the previous target has no influence.
    pub fn roll(rng: &mut DeterministicRng) -> Self {
        let kind = ShapeKind::random(rng);
        let color = ShapeColor::random(rng);
        Self { kind, color }
    }

    /// Whether a shape with these tags is wanted.
    #[inline]
    pub fn matches(&self, kind: ShapeKind, color: ShapeColor) -> bool {
        self.kind == kind && self.color == color
    }

    /// Localized "color + plural shape" text.
    pub fn display_text(&self, locale: Locale) -> String {
        match locale {
            Locale::German => {
                let color = match self.color {
                    ShapeColor::Red => "roten",
                    ShapeColor::Green => "grünen",
                    ShapeColor::Blue => "blauen",
                };
                let kind = match self.kind {
                    ShapeKind::Circle => "Kreise",
                    ShapeKind::Square => "Quadrate",
                };
                format!("{color} {kind}")
            }
            Locale::English => {
                let color = match self.color {
                    ShapeColor::Red => "red",
                    ShapeColor::Green => "green",
                    ShapeColor::Blue => "blue",
                };
                let kind = match self.kind {
                    ShapeKind::Circle => "circles",
                    ShapeKind::Square => "squares",
                };
                format!("{color} {kind}")
            }
        }
    }
}

impl fmt::Display for WantedTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text(Locale::English))
    }
}
