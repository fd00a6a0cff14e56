/// Lamp bank types
use serde::{Deserialize, Serialize};
use std::fmt;

/// A lamp, identified by the BCM number of the pin that drives it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LampId(u8);

impl LampId {
    /// Create a lamp ID from a BCM pin number
    pub const fn new(pin: u8) -> Self {
        Self(pin)
    }

    /// BCM pin number
    pub const fn pin(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LampId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Two-valued output level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Lamp lit (pin high)
    Active,
    /// Lamp dark (pin low)
    Inactive,
}

impl Level {
    /// The opposite level
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    /// Whether the lamp is lit
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "on"),
            Self::Inactive => write!(f, "off"),
        }
    }
}
