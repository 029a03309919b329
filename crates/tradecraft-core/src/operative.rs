//! Intelligence operatives
//!
//! An operative trains and handles agents and relays the documents they bring
//! in to headquarters.

use crate::agent::Agent;
use crate::bag::ConcurrentBag;
use crate::document::Document;
use crate::error::TradecraftError;
use crate::headquarters::Headquarters;
use crate::outcome::Tasking;
use crate::types::{AgentNumberSequence, DocumentLocation, OperativeId};
use std::sync::{Arc, Weak};

/// An intelligence operative
#[derive(Debug)]
pub struct Operative {
    id: OperativeId,
    headquarters: Weak<Headquarters>,
    agents: ConcurrentBag<Arc<Agent>>,
    documents: ConcurrentBag<Arc<Document>>,
    agent_numbers: Arc<AgentNumberSequence>,
    tasking: Tasking,
}

impl Operative {
    pub(crate) fn new(
        headquarters: Weak<Headquarters>,
        agent_numbers: Arc<AgentNumberSequence>,
        tasking: Tasking,
    ) -> Self {
        Self {
            id: OperativeId::new(),
            headquarters,
            agents: ConcurrentBag::new(),
            documents: ConcurrentBag::new(),
            agent_numbers,
            tasking,
        }
    }

    /// Operative ID
    #[inline]
    #[must_use]
    pub fn id(&self) -> OperativeId {
        self.id
    }

    /// The headquarters employing this operative
    #[inline]
    #[must_use]
    pub fn headquarters(&self) -> Option<Arc<Headquarters>> {
        self.headquarters.upgrade()
    }

    /// Agents handled by this operative
    #[must_use]
    pub fn agents(&self) -> Vec<Arc<Agent>> {
        self.agents.snapshot()
    }

    /// Documents the operative is carrying
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

    /// Whether the operative is carrying `document`
    #[must_use]
    pub fn holds(&self, document: &Document) -> bool {
        self.documents.any(|d| **d == *document)
    }

    /// Train a new agent handled by this operative
    ///
    /// Takes a drawn delay and always succeeds.
    pub async fn train_agent(self: &Arc<Self>) -> Arc<Agent> {
        self.tasking.settle().await;

        let agent = Arc::new(Agent::new(
            self.agent_numbers.next_number(),
            Arc::downgrade(self),
            self.tasking.clone(),
        ));
        self.agents.insert(agent.clone());

        tracing::info!(operative = %self.id, agent = %agent.number(), "agent trained");
        agent
    }

    /// Try to hand every carried document to headquarters
    ///
    /// Same contract as [`Agent::deliver_documents`]: immediate `Ok(false)`
    /// when empty, otherwise all-or-nothing.
    ///
    /// # Errors
    /// - `TradecraftError::Detached` if headquarters no longer exists
    pub async fn deliver_documents(&self) -> Result<bool, TradecraftError> {
        if self.documents.is_empty() {
            return Ok(false);
        }

        let headquarters = self
            .headquarters()
            .ok_or_else(|| TradecraftError::detached(format!("operative {}", self.id)))?;

        if !self.tasking.attempt().await {
            tracing::debug!(operative = %self.id, "delivery to headquarters failed");
            return Ok(false);
        }

        let documents = self.documents.drain_all();
        let delivered = documents.len();
        for document in documents {
            headquarters.receive_document(document)?;
        }

        tracing::info!(operative = %self.id, delivered, "documents delivered to headquarters");
        Ok(true)
    }

    /// Take custody of a document handed over by one of this operative's agents
    ///
    /// The caller must already have removed `document` from its own
    /// collection.
    pub(crate) fn receive_document(&self, document: Arc<Document>) -> Result<(), TradecraftError> {
        document.relocate(DocumentLocation::OnIntelligenceOperative)?;
        self.documents.insert(document);
        Ok(())
    }
}
