//! Delay behaviour under a paused clock
//!
//! Run with the tokio `test-util` clock so second-scale delays cost nothing.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tradecraft_core::prelude::*;
use tradecraft_core::{ScriptedOutcomeSource, SeededOutcomeSource};
use tradecraft_test_utils::{recruit, world_with_source};

#[tokio::test(start_paused = true)]
async fn standard_world_delays_stay_within_bounds() {
    let world = World::with_outcomes(
        WorldConfig::standard().with_seed(8),
        Arc::new(SeededOutcomeSource::seeded(8)),
    )
    .unwrap();

    for _ in 0..20 {
        let start = Instant::now();
        world.headquarters().train_operative().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(3000), "{elapsed:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn empty_deliveries_take_no_time() -> anyhow::Result<()> {
    let source = ScriptedOutcomeSource::always(true).with_delay(Duration::from_secs(1));
    let world = world_with_source(Arc::new(source));
    let (operative, agent) = recruit(&world).await;

    let start = Instant::now();
    assert!(!agent.deliver_documents().await?);
    assert!(!operative.deliver_documents().await?);
    assert_eq!(start.elapsed(), Duration::ZERO);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn attempted_delivery_takes_the_drawn_delay() -> anyhow::Result<()> {
    let source = Arc::new(
        ScriptedOutcomeSource::new([true, true, true, true, false], true)
            .with_delay(Duration::from_millis(700)),
    );
    let world = world_with_source(source.clone());
    let (_operative, agent) = recruit(&world).await;
    let facility = world.enemy().facilities().remove(0);

    assert!(agent.infiltrate(&facility).await);
    agent.retrieve_document().await?.expect("scripted success");

    let start = Instant::now();
    assert!(!agent.deliver_documents().await?);
    assert!(start.elapsed() >= Duration::from_millis(700));
    assert_eq!(agent.document_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn in_flight_operations_overlap() {
    let source = ScriptedOutcomeSource::always(true).with_delay(Duration::from_secs(2));
    let world = world_with_source(Arc::new(source));
    let hq = world.headquarters();

    let start = Instant::now();
    let operatives = futures::future::join_all((0..10).map(|_| hq.train_operative())).await;

    assert_eq!(operatives.len(), 10);
    // ten concurrent two-second trainings, not twenty seconds
    assert!(start.elapsed() < Duration::from_secs(3));
}
