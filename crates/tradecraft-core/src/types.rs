//! Core types for Tradecraft
//!
//! Identifiers, the document custody states and the agent numbering sequence.

use crate::error::TradecraftError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use ulid::Ulid;

/// Unique document identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Ulid);

impl DocumentId {
    /// Generate new document ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique facility identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacilityId(pub Ulid);

impl FacilityId {
    /// Generate new facility ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for FacilityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FacilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique operative identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OperativeId(pub Ulid);

impl OperativeId {
    /// Generate new operative ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for OperativeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OperativeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sequential agent number; displays as the agent's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentNumber(pub u64);

impl AgentNumber {
    /// Get numeric value
    #[inline]
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AgentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Agent {}", self.0)
    }
}

/// Hands out agent numbers, starting at 1
///
/// One sequence is owned by a headquarters and shared with every operative it
/// trains, so numbers are unique across the whole organization.
#[derive(Debug, Default)]
pub struct AgentNumberSequence {
    last: AtomicU64,
}

impl AgentNumberSequence {
    /// Create a sequence whose first number is 1
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next number
    #[inline]
    pub fn next_number(&self) -> AgentNumber {
        AgentNumber(self.last.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Last number handed out (0 if none)
    #[inline]
    #[must_use]
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

/// Current custody state of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentLocation {
    /// At the enemy's facility
    AtEnemyFacility,
    /// On the secret agent's person
    OnAgent,
    /// On the intelligence operative's person
    OnIntelligenceOperative,
    /// At friendly headquarters (terminal)
    AtHeadquarters,
}

impl DocumentLocation {
    /// All locations in custody order
    pub const ALL: [DocumentLocation; 4] = [
        DocumentLocation::AtEnemyFacility,
        DocumentLocation::OnAgent,
        DocumentLocation::OnIntelligenceOperative,
        DocumentLocation::AtHeadquarters,
    ];

    /// The only location a document may move to from here
    #[inline]
    #[must_use]
    pub fn successor(self) -> Option<DocumentLocation> {
        match self {
            DocumentLocation::AtEnemyFacility => Some(DocumentLocation::OnAgent),
            DocumentLocation::OnAgent => Some(DocumentLocation::OnIntelligenceOperative),
            DocumentLocation::OnIntelligenceOperative => Some(DocumentLocation::AtHeadquarters),
            DocumentLocation::AtHeadquarters => None,
        }
    }

    /// Whether no further transition is defined
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.successor().is_none()
    }
}

/// Validates a custody transition
pub fn validate_transition(
    from: DocumentLocation,
    to: DocumentLocation,
) -> Result<(), TradecraftError> {
    if from.successor() == Some(to) {
        Ok(())
    } else {
        Err(TradecraftError::IllegalTransition { from, to })
    }
}
