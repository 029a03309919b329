//! Custody audit
//!
//! Walks every collection in a world and checks that each document sits in
//! exactly one of them, tagged with the matching location, and that none have
//! gone missing since bootstrap.

use crate::document::Document;
use crate::enemy::EnemyHeadquarters;
use crate::headquarters::Headquarters;
use crate::types::{AgentNumber, DocumentId, DocumentLocation, FacilityId, OperativeId};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Entity holding a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Holder {
    /// An enemy facility
    Facility(FacilityId),
    /// A secret agent
    Agent(AgentNumber),
    /// An intelligence operative
    Operative(OperativeId),
    /// Friendly headquarters
    Headquarters,
}

impl Holder {
    /// Location tag a document held here must carry
    #[inline]
    #[must_use]
    pub fn expected_location(&self) -> DocumentLocation {
        match self {
            Holder::Facility(_) => DocumentLocation::AtEnemyFacility,
            Holder::Agent(_) => DocumentLocation::OnAgent,
            Holder::Operative(_) => DocumentLocation::OnIntelligenceOperative,
            Holder::Headquarters => DocumentLocation::AtHeadquarters,
        }
    }
}

/// A broken custody invariant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CustodyViolation {
    /// Document tag disagrees with the collection holding it
    Mislabelled {
        document: DocumentId,
        holder: Holder,
        location: DocumentLocation,
    },
    /// Document present in more than one collection
    Duplicated {
        document: DocumentId,
        first: Holder,
        second: Holder,
    },
    /// Fewer documents found than were created
    Missing { expected: usize, found: usize },
}

/// Result of a custody audit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CustodyReport {
    pub at_enemy_facilities: usize,
    pub on_agents: usize,
    pub on_operatives: usize,
    pub at_headquarters: usize,
    pub expected_total: usize,
    pub violations: Vec<CustodyViolation>,
}

impl CustodyReport {
    /// Documents found across all collections
    #[inline]
    #[must_use]
    pub fn total(&self) -> usize {
        self.at_enemy_facilities + self.on_agents + self.on_operatives + self.at_headquarters
    }

    /// Whether custody is intact
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Count for one location
    #[must_use]
    pub fn count(&self, location: DocumentLocation) -> usize {
        match location {
            DocumentLocation::AtEnemyFacility => self.at_enemy_facilities,
            DocumentLocation::OnAgent => self.on_agents,
            DocumentLocation::OnIntelligenceOperative => self.on_operatives,
            DocumentLocation::AtHeadquarters => self.at_headquarters,
        }
    }

    /// Serialize to JSON
    ///
    /// # Errors
    /// Propagates `serde_json` failures.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Generate text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut report = String::new();

        report.push_str("=== Custody Report ===\n\n");
        report.push_str(&format!("At enemy facilities: {}\n", self.at_enemy_facilities));
        report.push_str(&format!("On agents: {}\n", self.on_agents));
        report.push_str(&format!("On operatives: {}\n", self.on_operatives));
        report.push_str(&format!("At headquarters: {}\n", self.at_headquarters));
        report.push_str(&format!("Total: {} of {}\n", self.total(), self.expected_total));
        report.push_str(&format!("Violations: {}\n", self.violations.len()));

        if !self.violations.is_empty() {
            report.push_str("\n=== Violations ===\n");
            for (i, v) in self.violations.iter().enumerate() {
                report.push_str(&format!("{}. {:?}\n", i + 1, v));
            }
        }

        report
    }

    fn record(&mut self, seen: &mut HashMap<DocumentId, Holder>, holder: Holder, docs: &[Arc<Document>]) {
        for doc in docs {
            let location = doc.location();
            if location != holder.expected_location() {
                self.violations.push(CustodyViolation::Mislabelled {
                    document: doc.id(),
                    holder,
                    location,
                });
            }
            if let Some(first) = seen.insert(doc.id(), holder) {
                self.violations.push(CustodyViolation::Duplicated {
                    document: doc.id(),
                    first,
                    second: holder,
                });
            }
        }

        let n = docs.len();
        match holder {
            Holder::Facility(_) => self.at_enemy_facilities += n,
            Holder::Agent(_) => self.on_agents += n,
            Holder::Operative(_) => self.on_operatives += n,
            Holder::Headquarters => self.at_headquarters += n,
        }
    }
}

pub(crate) fn audit(
    headquarters: &Headquarters,
    enemy: &EnemyHeadquarters,
    expected_total: usize,
) -> CustodyReport {
    let mut report = CustodyReport {
        expected_total,
        ..CustodyReport::default()
    };
    let mut seen = HashMap::new();

    for facility in enemy.facilities() {
        report.record(&mut seen, Holder::Facility(facility.id()), &facility.documents());
    }
    for operative in headquarters.operatives() {
        for agent in operative.agents() {
            report.record(&mut seen, Holder::Agent(agent.number()), &agent.documents());
        }
        report.record(&mut seen, Holder::Operative(operative.id()), &operative.documents());
    }
    report.record(&mut seen, Holder::Headquarters, &headquarters.documents());

    if seen.len() != expected_total {
        report.violations.push(CustodyViolation::Missing {
            expected: expected_total,
            found: seen.len(),
        });
    }

    tracing::debug!(
        total = report.total(),
        violations = report.violations.len(),
        "custody audited"
    );
    report
}
