//! Card catalog: the printed deck as typed records.
//!
//! The catalog is read once, validated, and then only cloned from. Every
//! game builds its piles from the same catalog.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::cards::Interrupt;
use crate::constants::{DEFAULT_ATTENTION_SEND, DEFAULT_INTERRUPT_COPIES};

const DEFAULT_CARDS_DATA: &str = include_str!("../assets/cards.json");

/// Errors raised while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("attention pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
    #[error("attention card has no \"Read N\" count: {flavor:?}")]
    MissingReadCount { flavor: String },
    #[error("attention card count {value:?} out of range in {flavor:?}")]
    InvalidCount { flavor: String, value: String },
    #[error("goal group {group:?} has no cards")]
    EmptyGoalGroup { group: String },
}

/// All goals of one type share a light threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalGroup {
    pub lights: u32,
    #[serde(default)]
    pub cards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    #[serde(default)]
    pub lights: u32,
    #[serde(default)]
    pub flames: u32,
    #[serde(default)]
    pub subject: String,
}

/// Attention card with its action counts already parsed from the flavor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttentionTemplate {
    pub read: u8,
    pub send: u8,
    pub flavor: String,
}

impl AttentionTemplate {
    /// Parse the `Read N` / `Send N` tokens out of a flavor string.
    ///
    /// # Errors
    ///
    /// Returns an error when no `Read N` token exists or a count does not
    /// fit in a byte.
    pub fn parse(flavor: &str) -> Result<Self, CatalogError> {
        AttentionPatterns::new()?.parse(flavor)
    }
}

struct AttentionPatterns {
    read: Regex,
    send: Regex,
}

impl AttentionPatterns {
    fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            read: Regex::new(r"Read (\d+)")?,
            send: Regex::new(r"Send (\d+)")?,
        })
    }

    fn parse(&self, flavor: &str) -> Result<AttentionTemplate, CatalogError> {
        let read = capture_count(&self.read, flavor)?.ok_or_else(|| {
            CatalogError::MissingReadCount {
                flavor: flavor.to_string(),
            }
        })?;
        let send = capture_count(&self.send, flavor)?.unwrap_or(DEFAULT_ATTENTION_SEND);
        Ok(AttentionTemplate {
            read,
            send,
            flavor: flavor.to_string(),
        })
    }
}

fn capture_count(pattern: &Regex, flavor: &str) -> Result<Option<u8>, CatalogError> {
    let Some(digits) = pattern.captures(flavor).and_then(|caps| caps.get(1)) else {
        return Ok(None);
    };
    digits
        .as_str()
        .parse::<u8>()
        .map(Some)
        .map_err(|_| CatalogError::InvalidCount {
            flavor: flavor.to_string(),
            value: digits.as_str().to_string(),
        })
}

/// On-disk shape of a catalog.
#[derive(Debug, Clone, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    goals: BTreeMap<String, GoalGroup>,
    #[serde(default)]
    emails: Vec<EmailTemplate>,
    #[serde(default)]
    attention: Vec<String>,
    #[serde(default = "default_interrupt_copies")]
    interrupt_copies: u8,
}

const fn default_interrupt_copies() -> u8 {
    DEFAULT_INTERRUPT_COPIES
}

/// Validated, immutable deck definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardCatalog {
    pub goals: BTreeMap<String, GoalGroup>,
    pub emails: Vec<EmailTemplate>,
    pub attention: Vec<AttentionTemplate>,
    /// Copies of each interrupt effect shuffled into the email deck.
    pub interrupt_copies: u8,
}

impl CardCatalog {
    /// Load a catalog from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, a goal group is empty,
    /// or an attention card lacks a read count.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        if let Some((group, _)) = doc.goals.iter().find(|(_, group)| group.cards.is_empty()) {
            return Err(CatalogError::EmptyGoalGroup {
                group: group.clone(),
            });
        }
        let patterns = AttentionPatterns::new()?;
        let attention = doc
            .attention
            .iter()
            .map(|flavor| patterns.parse(flavor))
            .collect::<Result<Vec<_>, _>>()?;

        let catalog = Self {
            goals: doc.goals,
            emails: doc.emails,
            attention,
            interrupt_copies: doc.interrupt_copies,
        };
        if catalog.attention.is_empty() {
            log::warn!("catalog has no attention cards; every game will end in round one");
        }
        if catalog.goal_count() == 0 {
            log::warn!("catalog has no goals; games cannot be set up");
        }
        log::debug!(
            "loaded catalog: {} goals, {} emails, {} interrupts, {} attention",
            catalog.goal_count(),
            catalog.emails.len(),
            catalog.interrupt_count(),
            catalog.attention.len()
        );
        Ok(catalog)
    }

    /// The bundled default deck.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails validation.
    pub fn load_default() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CARDS_DATA)
    }

    #[must_use]
    pub fn goal_count(&self) -> usize {
        self.goals.values().map(|group| group.cards.len()).sum()
    }

    #[must_use]
    pub fn interrupt_count(&self) -> usize {
        usize::from(self.interrupt_copies) * Interrupt::ALL.len()
    }
}
