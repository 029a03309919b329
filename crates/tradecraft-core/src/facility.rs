//! Enemy facilities
//!
//! A facility is stocked once when the enemy headquarters is built and is
//! never restocked. Documents only ever leave through
//! [`Facility::compromise_document`].

use crate::bag::ConcurrentBag;
use crate::document::Document;
use crate::enemy::EnemyHeadquarters;
use crate::outcome::Tasking;
use crate::types::FacilityId;
use std::sync::{Arc, Weak};

/// An enemy facility holding top-secret documents
#[derive(Debug)]
pub struct Facility {
    id: FacilityId,
    headquarters: Weak<EnemyHeadquarters>,
    documents: ConcurrentBag<Arc<Document>>,
    tasking: Tasking,
}

impl Facility {
    /// Build a facility stocked with `document_count` documents
    pub(crate) fn new(
        headquarters: Weak<EnemyHeadquarters>,
        document_count: usize,
        tasking: Tasking,
    ) -> Arc<Self> {
        let id = FacilityId::new();
        Arc::new_cyclic(|this: &Weak<Facility>| Self {
            id,
            headquarters,
            documents: ConcurrentBag::populated(document_count, || {
                Arc::new(Document::new(id, this.clone()))
            }),
            tasking,
        })
    }

    /// Facility ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> FacilityId {
        self.id
    }

    /// The enemy headquarters running this facility
    #[inline]
    #[must_use]
    pub fn headquarters(&self) -> Option<Arc<EnemyHeadquarters>> {
        self.headquarters.upgrade()
    }

    /// Documents currently at this facility
    #[must_use]
    pub fn documents(&self) -> Vec<Arc<Document>> {
        self.documents.snapshot()
    }

    /// Number of documents currently at this facility
    #[inline]
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Whether `document` is currently held here
    #[must_use]
    pub fn holds(&self, document: &Document) -> bool {
        self.documents.any(|d| **d == *document)
    }

    /// Try to compromise one document
    ///
    /// Waits out a drawn delay. On success, takes one arbitrary document out of
    /// the facility; the take is atomic, so concurrent callers never receive
    /// the same document. Returns `None` on a lost coin flip or when the
    /// facility has nothing left. The returned document is still tagged
    /// `AtEnemyFacility`; relabelling belongs to the receiver.
    pub(crate) async fn compromise_document(&self) -> Option<Arc<Document>> {
        if !self.tasking.attempt().await {
            tracing::debug!(facility = %self.id, "compromise attempt failed");
            return None;
        }

        let document = self.documents.try_take();
        match &document {
            Some(doc) => {
                tracing::debug!(facility = %self.id, document = %doc.id(), "document compromised");
            }
            None => tracing::debug!(facility = %self.id, "facility has no documents left"),
        }
        document
    }
}
