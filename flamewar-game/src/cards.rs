//! Runtime card instances: emails, attention cards, interrupts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An email in play. Carries light points toward a goal's win threshold and
/// flame points toward its burn threshold, but only once it has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub lights: u32,
    pub flames: u32,
    pub subject: String,
    read: bool,
}

impl Email {
    #[must_use]
    pub fn new(lights: u32, flames: u32, subject: impl Into<String>) -> Self {
        Self {
            lights,
            flames,
            subject: subject.into(),
            read: false,
        }
    }

    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Flip the email to read. Read is permanent.
    pub const fn mark_read(&mut self) {
        self.read = true;
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.lights, self.flames)
    }
}

/// Per-round action budget for the current player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attention {
    pub read: u8,
    pub send: u8,
    pub flavor: String,
}

impl Attention {
    #[must_use]
    pub fn new(read: u8, send: u8, flavor: impl Into<String>) -> Self {
        Self {
            read,
            send,
            flavor: flavor.into(),
        }
    }
}

/// One-shot rule-bending effect held in a player's hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interrupt {
    /// A goal becomes a flame war: only flames count, nothing burns.
    FlameWar,
    /// A goal doubles its thresholds and its value.
    EpicThread,
    /// The first read email on the table disappears.
    Misdelivered,
    /// A random player is drafted into two reads and two sends.
    Voluntold,
}

impl Interrupt {
    pub const ALL: [Self; 4] = [
        Self::FlameWar,
        Self::EpicThread,
        Self::Misdelivered,
        Self::Voluntold,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FlameWar => "Flame war",
            Self::EpicThread => "Epic thread",
            Self::Misdelivered => "Misdelivered",
            Self::Voluntold => "Voluntold",
        }
    }
}

impl fmt::Display for Interrupt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A card that can sit in a hand. Emails and interrupts share one deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandCard {
    Email(Email),
    Interrupt(Interrupt),
}

impl HandCard {
    #[must_use]
    pub const fn is_email(&self) -> bool {
        matches!(self, Self::Email(_))
    }

    #[must_use]
    pub const fn as_interrupt(&self) -> Option<Interrupt> {
        match self {
            Self::Interrupt(interrupt) => Some(*interrupt),
            Self::Email(_) => None,
        }
    }
}

impl From<Email> for HandCard {
    fn from(email: Email) -> Self {
        Self::Email(email)
    }
}

impl From<Interrupt> for HandCard {
    fn from(interrupt: Interrupt) -> Self {
        Self::Interrupt(interrupt)
    }
}

impl fmt::Display for HandCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(email) => email.fmt(f),
            Self::Interrupt(interrupt) => interrupt.fmt(f),
        }
    }
}
