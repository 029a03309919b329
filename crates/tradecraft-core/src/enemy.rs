//! Enemy headquarters
//!
//! Owns the set of facilities. Built once at world setup and never changed.

use crate::bag::ConcurrentBag;
use crate::facility::Facility;
use crate::outcome::Tasking;
use rand::Rng;
use std::sync::{Arc, Weak};

/// The adversary organization running the facilities
#[derive(Debug)]
pub struct EnemyHeadquarters {
    facilities: ConcurrentBag<Arc<Facility>>,
}

impl EnemyHeadquarters {
    /// Build one facility per entry, stocked with that many documents
    pub fn with_layout(document_counts: &[usize], tasking: &Tasking) -> Arc<Self> {
        Arc::new_cyclic(|this: &Weak<EnemyHeadquarters>| {
            let mut counts = document_counts.iter();
            Self {
                facilities: ConcurrentBag::populated(document_counts.len(), || {
                    let documents = counts.next().copied().unwrap_or_default();
                    Facility::new(this.clone(), documents, tasking.clone())
                }),
            }
        })
    }

    /// Build a random layout
    ///
    /// Facility count is drawn from `[1, max_facilities)` and each facility's
    /// document count from `[1, max_documents_per_facility)`. Both bounds must
    /// be at least 2; `WorldConfig::validate` enforces this.
    pub(crate) fn populate(
        rng: &mut impl Rng,
        max_facilities: usize,
        max_documents_per_facility: usize,
        tasking: &Tasking,
    ) -> Arc<Self> {
        let facility_count = rng.gen_range(1..max_facilities);
        let layout: Vec<usize> = (0..facility_count)
            .map(|_| rng.gen_range(1..max_documents_per_facility))
            .collect();

        tracing::debug!(facilities = facility_count, ?layout, "enemy headquarters populated");
        Self::with_layout(&layout, tasking)
    }

    /// Facilities run by this headquarters
    #[must_use]
    pub fn facilities(&self) -> Vec<Arc<Facility>> {
        self.facilities.snapshot()
    }

    /// Number of facilities
    #[inline]
    #[must_use]
    pub fn facility_count(&self) -> usize {
        self.facilities.len()
    }

    /// Documents still held across all facilities
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.facilities
            .snapshot()
            .iter()
            .map(|f| f.document_count())
            .sum()
    }
}
