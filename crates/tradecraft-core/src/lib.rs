//! Tradecraft Core - concurrent chain of custody
//!
//! Models a small intelligence organization moving top-secret documents out
//! of enemy facilities:
//! - Headquarters trains operatives, operatives train agents
//! - Agents infiltrate a facility and retrieve documents one at a time
//! - Documents travel agent -> operative -> headquarters
//!
//! Every state-changing operation waits a random delay and may fail. A failed
//! attempt changes nothing; retrying is up to the caller. All collections are
//! safe to hit from any number of concurrent tasks.
//!
//! # Example
//!
//! ```rust,no_run
//! use tradecraft_core::{World, WorldConfig};
//!
//! # async fn example() -> Result<(), tradecraft_core::TradecraftError> {
//! let world = World::new(WorldConfig::instant())?;
//! let operative = world.headquarters().train_operative().await;
//! let agent = operative.train_agent().await;
//!
//! let facility = world.enemy().facilities().remove(0);
//! while !agent.infiltrate(&facility).await {}
//!
//! if let Some(doc) = agent.retrieve_document().await? {
//!     println!("{} carries {}", agent.name(), doc.id());
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod agent;
pub mod audit;
pub mod bag;
pub mod document;
pub mod enemy;
pub mod error;
pub mod facility;
pub mod headquarters;
pub mod operative;
pub mod outcome;
pub mod types;
pub mod world;

// Re-exports for convenience
pub use agent::Agent;
pub use audit::{CustodyReport, CustodyViolation, Holder};
pub use bag::ConcurrentBag;
pub use document::Document;
pub use enemy::EnemyHeadquarters;
pub use error::{ConfigError, TradecraftError};
pub use facility::Facility;
pub use headquarters::Headquarters;
pub use operative::Operative;
pub use outcome::{Outcome, OutcomeSource, ScriptedOutcomeSource, SeededOutcomeSource, Tasking};
pub use types::{
    validate_transition, AgentNumber, AgentNumberSequence, DocumentId, DocumentLocation,
    FacilityId, OperativeId,
};
pub use world::{World, WorldConfig};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Tradecraft Core
    pub use crate::{
        Agent, Document, DocumentLocation, EnemyHeadquarters, Facility, Headquarters, Operative,
        Tasking, TradecraftError, World, WorldConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn document_reaches_headquarters() {
        let world = World::with_outcomes(
            WorldConfig::instant().with_seed(4),
            Arc::new(ScriptedOutcomeSource::always(true)),
        )
        .unwrap();
        let operative = world.headquarters().train_operative().await;
        let agent = operative.train_agent().await;
        let facility = world.enemy().facilities().remove(0);

        assert!(agent.infiltrate(&facility).await);
        let doc = agent.retrieve_document().await.unwrap().unwrap();
        assert!(agent.deliver_documents().await.unwrap());
        assert!(operative.deliver_documents().await.unwrap());

        assert_eq!(doc.location(), DocumentLocation::AtHeadquarters);
        assert!(world.headquarters().holds(&doc));
        assert!(world.audit().is_clean());
    }
}
