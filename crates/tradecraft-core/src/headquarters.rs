//! Friendly headquarters
//!
//! The top of the chain of command and the final resting place of every
//! delivered document.

use crate::bag::ConcurrentBag;
use crate::document::Document;
use crate::error::TradecraftError;
use crate::operative::Operative;
use crate::outcome::Tasking;
use crate::types::{AgentNumberSequence, DocumentLocation};
use std::sync::Arc;

/// Friendly headquarters
#[derive(Debug)]
pub struct Headquarters {
    operatives: ConcurrentBag<Arc<Operative>>,
    documents: ConcurrentBag<Arc<Document>>,
    agent_numbers: Arc<AgentNumberSequence>,
    tasking: Tasking,
}

impl Headquarters {
    /// Create headquarters with its own agent numbering
    pub fn new(tasking: Tasking) -> Arc<Self> {
        Self::with_agent_numbers(tasking, Arc::new(AgentNumberSequence::new()))
    }

    /// Create headquarters drawing agent numbers from `agent_numbers`
    pub fn with_agent_numbers(tasking: Tasking, agent_numbers: Arc<AgentNumberSequence>) -> Arc<Self> {
        Arc::new(Self {
            operatives: ConcurrentBag::new(),
            documents: ConcurrentBag::new(),
            agent_numbers,
            tasking,
        })
    }

    /// Currently employed operatives
    #[must_use]
    pub fn operatives(&self) -> Vec<Arc<Operative>> {
        self.operatives.snapshot()
    }

    /// Documents delivered to headquarters
    #[must_use]
    pub fn documents(&self) -> Vec<Arc<Document>> {
        self.documents.snapshot()
    }

    /// Number of documents delivered
    #[inline]
    #[must_use]
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Whether `document` has been delivered here
    #[must_use]
    pub fn holds(&self, document: &Document) -> bool {
        self.documents.any(|d| **d == *document)
    }

    /// Train a new operative
    ///
    /// Takes a drawn delay and always succeeds.
    pub async fn train_operative(self: &Arc<Self>) -> Arc<Operative> {
        self.tasking.settle().await;

        let operative = Arc::new(Operative::new(
            Arc::downgrade(self),
            self.agent_numbers.clone(),
            self.tasking.clone(),
        ));
        self.operatives.insert(operative.clone());

        tracing::info!(operative = %operative.id(), "operative trained");
        operative
    }

    /// Take final custody of a document handed over by an operative
    pub(crate) fn receive_document(&self, document: Arc<Document>) -> Result<(), TradecraftError> {
        document.relocate(DocumentLocation::AtHeadquarters)?;
        self.documents.insert(document);
        Ok(())
    }
}
