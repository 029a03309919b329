//! Top-secret documents
//!
//! A document's origin never changes; its location tag moves forward one step
//! per successful transfer and is written only by the entity receiving it.

use crate::error::TradecraftError;
use crate::facility::Facility;
use crate::types::{validate_transition, DocumentId, DocumentLocation, FacilityId};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// A top-secret document
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    origin_id: FacilityId,
    origin: Weak<Facility>,
    location: RwLock<DocumentLocation>,
}

impl Document {
    /// New document sitting at its origin facility
    pub(crate) fn new(origin_id: FacilityId, origin: Weak<Facility>) -> Self {
        Self {
            id: DocumentId::new(),
            origin_id,
            origin,
            location: RwLock::new(DocumentLocation::AtEnemyFacility),
        }
    }

    /// Document ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Current custody state
    #[inline]
    #[must_use]
    pub fn location(&self) -> DocumentLocation {
        *self.location.read()
    }

    /// ID of the facility this document was taken from
    #[inline]
    #[must_use]
    pub fn origin_id(&self) -> FacilityId {
        self.origin_id
    }

    /// The facility this document originated at, while it is still alive
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<Arc<Facility>> {
        self.origin.upgrade()
    }

    /// Whether this document originated at `facility`
    #[inline]
    #[must_use]
    pub fn is_from(&self, facility: &Facility) -> bool {
        self.origin_id == facility.id()
    }

    /// Move the location tag forward to `to`
    ///
    /// Validated and written under one lock so two racing relabels cannot
    /// both succeed.
    pub(crate) fn relocate(&self, to: DocumentLocation) -> Result<(), TradecraftError> {
        let mut location = self.location.write();
        validate_transition(*location, to)?;
        *location = to;
        Ok(())
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Document {}

impl std::hash::Hash for Document {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loose_document() -> Document {
        Document::new(FacilityId::new(), Weak::new())
    }

    #[test]
    fn new_document_is_at_enemy_facility() {
        let doc = loose_document();
        assert_eq!(doc.location(), DocumentLocation::AtEnemyFacility);
        assert!(doc.origin().is_none());
    }

    #[test]
    fn relocate_walks_the_custody_chain() {
        let doc = loose_document();
        doc.relocate(DocumentLocation::OnAgent).unwrap();
        doc.relocate(DocumentLocation::OnIntelligenceOperative).unwrap();
        doc.relocate(DocumentLocation::AtHeadquarters).unwrap();
        assert_eq!(doc.location(), DocumentLocation::AtHeadquarters);
    }

    #[test]
    fn relocate_rejects_skips_and_leaves_tag_alone() {
        let doc = loose_document();
        let err = doc.relocate(DocumentLocation::AtHeadquarters).unwrap_err();
        assert!(matches!(
            err,
            TradecraftError::IllegalTransition {
                from: DocumentLocation::AtEnemyFacility,
                to: DocumentLocation::AtHeadquarters,
            }
        ));
        assert_eq!(doc.location(), DocumentLocation::AtEnemyFacility);
    }

    #[test]
    fn equality_is_identity() {
        let a = loose_document();
        let b = loose_document();
        assert_eq!(a, a);
        assert_ne!(a, b);
    }
}
