//! Secret agents
//!
//! An agent infiltrates one facility at a time, retrieves documents from it
//! and hands everything it carries to its handling operative.

use crate::bag::ConcurrentBag;
use crate::document::Document;
use crate::error::TradecraftError;
use crate::facility::Facility;
use crate::operative::Operative;
use crate::outcome::Tasking;
use crate::types::{AgentNumber, DocumentLocation};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};

/// A secret agent
#[derive(Debug)]
pub struct Agent {
    number: AgentNumber,
    handler: Weak<Operative>,
    assignment: RwLock<Option<Arc<Facility>>>,
    documents: ConcurrentBag<Arc<Document>>,
    tasking: Tasking,
}

impl Agent {
    pub(crate) fn new(number: AgentNumber, handler: Weak<Operative>, tasking: Tasking) -> Self {
        Self {
            number,
            handler,
            assignment: RwLock::new(None),
            documents: ConcurrentBag::new(),
            tasking,
        }
    }

    /// Agent number
    #[inline]
    #[must_use]
    pub fn number(&self) -> AgentNumber {
        self.number
    }

    /// Agent name, e.g. `Agent 7`
    #[inline]
    #[must_use]
    pub fn name(&self) -> String {
        self.number.to_string()
    }

    /// The operative handling this agent
    #[inline]
    #[must_use]
    pub fn handler(&self) -> Option<Arc<Operative>> {
        self.handler.upgrade()
    }

    /// The facility this agent has infiltrated, if any
    #[inline]
    #[must_use]
    pub fn current_assignment(&self) -> Option<Arc<Facility>> {
        self.assignment.read().clone()
    }

    /// Documents the agent is carrying
    #[must_use]
    pub fn documents(&self) -> Vec<Arc<Document>> {
        self.documents.snapshot()
    }

    /// Number of documents carried
    #[inline]
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Whether the agent is carrying `document`
    #[must_use]
    pub fn holds(&self, document: &Document) -> bool {
        self.documents.any(|d| **d == *document)
    }

    /// Try to infiltrate `facility`
    ///
    /// On success the agent is assigned to `facility`, replacing any previous
    /// assignment. No documents move.
    pub async fn infiltrate(&self, facility: &Arc<Facility>) -> bool {
        let success = self.tasking.attempt().await;

        if success {
            let previous = self.assignment.write().replace(facility.clone());
            match previous {
                Some(prev) if prev.id() != facility.id() => tracing::info!(
                    agent = %self.number,
                    from = %prev.id(),
                    to = %facility.id(),
                    "agent reassigned"
                ),
                Some(_) => {}
                None => tracing::info!(agent = %self.number, facility = %facility.id(), "facility infiltrated"),
            }
        } else {
            tracing::debug!(agent = %self.number, facility = %facility.id(), "infiltration failed");
        }

        success
    }

    /// Try to retrieve a document from the current assignment
    ///
    /// Returns `Ok(None)` when the attempt fails or the facility has nothing
    /// left.
    ///
    /// # Errors
    /// - `TradecraftError::NoAssignment` if the agent has not infiltrated a facility
    pub async fn retrieve_document(&self) -> Result<Option<Arc<Document>>, TradecraftError> {
        let assignment = self
            .current_assignment()
            .ok_or(TradecraftError::NoAssignment { agent: self.number })?;

        let Some(document) = assignment.compromise_document().await else {
            return Ok(None);
        };

        document.relocate(DocumentLocation::OnAgent)?;
        self.documents.insert(document.clone());

        tracing::info!(agent = %self.number, document = %document.id(), "document retrieved");
        Ok(Some(document))
    }

    /// Try to hand every carried document to the handler
    ///
    /// With nothing to deliver this returns `Ok(false)` immediately, without a
    /// delay. Otherwise it is all-or-nothing: a failed attempt moves no
    /// documents, a successful one moves the full set held at that moment.
    ///
    /// # Errors
    /// - `TradecraftError::Detached` if the handler no longer exists
    pub async fn deliver_documents(&self) -> Result<bool, TradecraftError> {
        if self.documents.is_empty() {
            return Ok(false);
        }

        let handler = self
            .handler()
            .ok_or_else(|| TradecraftError::detached(self.name()))?;

        if !self.tasking.attempt().await {
            tracing::debug!(agent = %self.number, "delivery to handler failed");
            return Ok(false);
        }

        let documents = self.documents.drain_all();
        let delivered = documents.len();
        for document in documents {
            handler.receive_document(document)?;
        }

        tracing::info!(agent = %self.number, operative = %handler.id(), delivered, "documents delivered to handler");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemy::EnemyHeadquarters;
    use crate::headquarters::Headquarters;
    use crate::outcome::ScriptedOutcomeSource;
    use std::time::Duration;

    struct Fixture {
        _headquarters: Arc<Headquarters>,
        enemy: Arc<EnemyHeadquarters>,
        operative: Arc<Operative>,
        agent: Arc<Agent>,
        source: Arc<ScriptedOutcomeSource>,
    }

    async fn fixture(layout: &[usize], source: ScriptedOutcomeSource) -> Fixture {
        let source = Arc::new(source);
        let tasking = Tasking::instant(source.clone());
        let headquarters = Headquarters::new(tasking.clone());
        let enemy = EnemyHeadquarters::with_layout(layout, &tasking);
        let operative = headquarters.train_operative().await;
        let agent = operative.train_agent().await;
        Fixture {
            _headquarters: headquarters,
            enemy,
            operative,
            agent,
            source,
        }
    }

    #[tokio::test]
    async fn retrieve_without_assignment_is_an_error() {
        let fx = fixture(&[3], ScriptedOutcomeSource::always(true)).await;
        let before = fx.source.samples();

        let err = fx.agent.retrieve_document().await.unwrap_err();
        assert!(matches!(err, TradecraftError::NoAssignment { .. }));
        assert!(err.is_usage_defect());
        // Rejected before any draw
        assert_eq!(fx.source.samples(), before);
    }

    #[tokio::test]
    async fn failed_infiltration_leaves_agent_unassigned() {
        let fx = fixture(&[3], ScriptedOutcomeSource::always(true)).await;
        let facility = fx.enemy.facilities().remove(0);

        let agent = Agent::new(
            AgentNumber(99),
            Arc::downgrade(&fx.operative),
            Tasking::instant(Arc::new(ScriptedOutcomeSource::always(false))),
        );
        assert!(!agent.infiltrate(&facility).await);
        assert!(agent.current_assignment().is_none());
    }

    #[tokio::test]
    async fn infiltration_can_be_redirected() {
        let fx = fixture(&[1, 1], ScriptedOutcomeSource::always(true)).await;
        let facilities = fx.enemy.facilities();

        assert!(fx.agent.infiltrate(&facilities[0]).await);
        assert!(fx.agent.infiltrate(&facilities[0]).await);
        assert!(Arc::ptr_eq(&fx.agent.current_assignment().unwrap(), &facilities[0]));

        assert!(fx.agent.infiltrate(&facilities[1]).await);
        assert!(Arc::ptr_eq(&fx.agent.current_assignment().unwrap(), &facilities[1]));
    }

    #[tokio::test]
    async fn retrieval_moves_document_onto_agent() {
        let fx = fixture(&[2], ScriptedOutcomeSource::always(true)).await;
        let facility = fx.enemy.facilities().remove(0);
        assert!(fx.agent.infiltrate(&facility).await);

        let doc = fx.agent.retrieve_document().await.unwrap().unwrap();
        assert_eq!(doc.location(), DocumentLocation::OnAgent);
        assert!(doc.is_from(&facility));
        assert!(fx.agent.holds(&doc));
        assert!(!facility.holds(&doc));
        assert_eq!(facility.document_count(), 1);
    }

    #[tokio::test]
    async fn failed_retrieval_returns_none() {
        // infiltrate succeeds, retrieval loses the coin flip
        let fx = fixture(&[2], ScriptedOutcomeSource::new([true, true, true, false], true)).await;
        let facility = fx.enemy.facilities().remove(0);
        assert!(fx.agent.infiltrate(&facility).await);

        assert!(fx.agent.retrieve_document().await.unwrap().is_none());
        assert_eq!(facility.document_count(), 2);
        assert_eq!(fx.agent.document_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_delivery_is_immediate_and_draws_nothing() {
        let source =
            ScriptedOutcomeSource::always(true).with_delay(Duration::from_millis(500));
        let fx = fixture(&[1], source).await;
        let before = fx.source.samples();

        let start = tokio::time::Instant::now();
        assert!(!fx.agent.deliver_documents().await.unwrap());
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(fx.source.samples(), before);
    }

    #[tokio::test]
    async fn failed_delivery_moves_nothing() {
        // train x2, infiltrate, retrieve x2, then delivery fails
        let fx = fixture(&[3], ScriptedOutcomeSource::new([true; 5].into_iter().chain([false]), true)).await;
        let facility = fx.enemy.facilities().remove(0);
        assert!(fx.agent.infiltrate(&facility).await);
        fx.agent.retrieve_document().await.unwrap().unwrap();
        fx.agent.retrieve_document().await.unwrap().unwrap();

        assert!(!fx.agent.deliver_documents().await.unwrap());
        assert_eq!(fx.agent.document_count(), 2);
        assert_eq!(fx.operative.document_count(), 0);
        assert!(fx
            .agent
            .documents()
            .iter()
            .all(|d| d.location() == DocumentLocation::OnAgent));
    }

    #[tokio::test]
    async fn successful_delivery_moves_everything_to_handler() {
        let fx = fixture(&[3], ScriptedOutcomeSource::always(true)).await;
        let facility = fx.enemy.facilities().remove(0);
        assert!(fx.agent.infiltrate(&facility).await);
        for _ in 0..3 {
            fx.agent.retrieve_document().await.unwrap().unwrap();
        }
        let carried = fx.agent.documents();

        assert!(fx.agent.deliver_documents().await.unwrap());
        assert_eq!(fx.agent.document_count(), 0);
        assert_eq!(fx.operative.document_count(), 3);
        for doc in carried {
            assert_eq!(doc.location(), DocumentLocation::OnIntelligenceOperative);
            assert!(fx.operative.holds(&doc));
        }
    }

    #[tokio::test]
    async fn orphaned_agent_cannot_deliver() {
        let tasking = Tasking::instant(Arc::new(ScriptedOutcomeSource::always(true)));
        let enemy = EnemyHeadquarters::with_layout(&[1], &tasking);
        let facility = enemy.facilities().remove(0);

        let agent = Agent::new(AgentNumber(5), Weak::new(), tasking);
        assert!(agent.infiltrate(&facility).await);
        agent.retrieve_document().await.unwrap().unwrap();

        let err = agent.deliver_documents().await.unwrap_err();
        assert!(matches!(err, TradecraftError::Detached { .. }));
        assert_eq!(agent.document_count(), 1);
    }
}
