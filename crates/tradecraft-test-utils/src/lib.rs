//! Testing utilities for the tradecraft workspace
//!
//! Shared fixtures, retry loops and tracing setup.

#![allow(missing_docs)]

use std::future::Future;
use std::sync::{Arc, Once};
use tradecraft_core::{
    Agent, Document, Facility, Operative, OutcomeSource, ScriptedOutcomeSource, TradecraftError,
    World, WorldConfig,
};

/// Upper bound on attempts in the retry helpers; a fair coin never gets close
pub const MAX_ATTEMPTS: usize = 10_000;

static TRACING: Once = Once::new();

/// Install a fmt subscriber honoring `RUST_LOG`; safe to call from every test
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Instant world with random outcomes
pub fn instant_world() -> World {
    World::new(WorldConfig::instant()).unwrap()
}

/// Instant world with a fixed seed
pub fn seeded_world(seed: u64) -> World {
    World::new(WorldConfig::instant().with_seed(seed)).unwrap()
}

/// Instant world where every attempt succeeds
pub fn lucky_world() -> World {
    world_with_source(Arc::new(ScriptedOutcomeSource::always(true)))
}

/// Instant world drawing from `source`
pub fn world_with_source(source: Arc<dyn OutcomeSource>) -> World {
    World::with_outcomes(WorldConfig::instant(), source).unwrap()
}

/// Train one operative and one agent under it
pub async fn recruit(world: &World) -> (Arc<Operative>, Arc<Agent>) {
    let operative = world.headquarters().train_operative().await;
    let agent = operative.train_agent().await;
    (operative, agent)
}

/// Any facility still holding documents
pub fn stocked_facility(world: &World) -> Arc<Facility> {
    world
        .enemy()
        .facilities()
        .into_iter()
        .find(|f| f.document_count() > 0)
        .unwrap()
}

/// Retry `attempt` until it returns `true`; returns the number of attempts
pub async fn retry_until_true<F, Fut>(mut attempt: F) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for n in 1..=MAX_ATTEMPTS {
        if attempt().await {
            return n;
        }
    }
    panic!("no success after {MAX_ATTEMPTS} attempts");
}

/// Retry a fallible boolean attempt until it returns `Ok(true)`
pub async fn retry_until_ok_true<F, Fut>(mut attempt: F) -> usize
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, TradecraftError>>,
{
    for n in 1..=MAX_ATTEMPTS {
        if attempt().await.unwrap() {
            return n;
        }
    }
    panic!("no success after {MAX_ATTEMPTS} attempts");
}

/// Retry until an agent brings back a document
pub async fn retrieve_until_some(agent: &Agent) -> Arc<Document> {
    for _ in 0..MAX_ATTEMPTS {
        if let Some(doc) = agent.retrieve_document().await.unwrap() {
            return doc;
        }
    }
    panic!("{} retrieved nothing after {MAX_ATTEMPTS} attempts", agent.name());
}

/// Retry until `agent` has infiltrated `facility`
pub async fn infiltrate_until_success(agent: &Agent, facility: &Arc<Facility>) {
    retry_until_true(move || agent.infiltrate(facility)).await;
}
