//! World configuration and bootstrap
//!
//! A [`World`] wires one friendly [`Headquarters`] and one
//! [`EnemyHeadquarters`] to a shared [`Tasking`]. Two presets mirror the usual
//! setups: `standard` with second-scale delays and `instant` with none.

use crate::audit::{self, CustodyReport};
use crate::enemy::EnemyHeadquarters;
use crate::error::{ConfigError, TradecraftError};
use crate::headquarters::Headquarters;
use crate::outcome::{OutcomeSource, SeededOutcomeSource, Tasking};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// World configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Lower delay bound for every operation, inclusive
    pub shortest_task_ms: u64,
    /// Upper delay bound for every operation, exclusive
    pub longest_task_ms: u64,
    /// Facility count is drawn from `[1, max_facilities)`
    pub max_facilities: usize,
    /// Per-facility document count is drawn from `[1, max_documents_per_facility)`
    pub max_documents_per_facility: usize,
    /// Seed for population and outcomes; entropy when absent
    pub seed: Option<u64>,
}

impl WorldConfig {
    /// Second-scale delays
    #[inline]
    #[must_use]
    pub fn standard() -> Self {
        Self::default()
    }

    /// No delays at all
    #[inline]
    #[must_use]
    pub fn instant() -> Self {
        Self {
            shortest_task_ms: 0,
            longest_task_ms: 0,
            ..Self::default()
        }
    }

    /// Parse from TOML; missing keys fall back to the standard preset
    ///
    /// # Errors
    /// - `ConfigError::Parse` on malformed input
    /// - any error from [`WorldConfig::validate`]
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// With delay bounds
    #[inline]
    #[must_use]
    pub fn with_delays(mut self, shortest_task_ms: u64, longest_task_ms: u64) -> Self {
        self.shortest_task_ms = shortest_task_ms;
        self.longest_task_ms = longest_task_ms;
        self
    }

    /// With population bounds
    #[inline]
    #[must_use]
    pub fn with_bounds(mut self, max_facilities: usize, max_documents_per_facility: usize) -> Self {
        self.max_facilities = max_facilities;
        self.max_documents_per_facility = max_documents_per_facility;
        self
    }

    /// With a fixed seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the bounds describe a populatable world
    ///
    /// # Errors
    /// - `ConfigError::EmptyRange` if a population bound is below 2
    /// - `ConfigError::InvertedDelayBounds` if shortest exceeds longest
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_facilities < 2 {
            return Err(ConfigError::EmptyRange {
                field: "max_facilities",
                value: self.max_facilities,
            });
        }
        if self.max_documents_per_facility < 2 {
            return Err(ConfigError::EmptyRange {
                field: "max_documents_per_facility",
                value: self.max_documents_per_facility,
            });
        }
        if self.shortest_task_ms > self.longest_task_ms {
            return Err(ConfigError::InvertedDelayBounds {
                shortest_ms: self.shortest_task_ms,
                longest_ms: self.longest_task_ms,
            });
        }
        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            shortest_task_ms: 1000,
            longest_task_ms: 3000,
            max_facilities: 5,
            max_documents_per_facility: 10,
            seed: None,
        }
    }
}

/// Friendly and enemy organizations sharing one tasking
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    tasking: Tasking,
    headquarters: Arc<Headquarters>,
    enemy: Arc<EnemyHeadquarters>,
    initial_documents: usize,
}

impl World {
    /// Build a world drawing outcomes from a `SeededOutcomeSource`
    ///
    /// # Errors
    /// - `TradecraftError::Config` if the configuration is invalid
    pub fn new(config: WorldConfig) -> Result<Self, TradecraftError> {
        let source: Arc<dyn OutcomeSource> = match config.seed {
            // separate stream from the population rng
            Some(seed) => Arc::new(SeededOutcomeSource::seeded(seed.wrapping_add(1))),
            None => Arc::new(SeededOutcomeSource::from_entropy()),
        };
        Self::with_outcomes(config, source)
    }

    /// Build a world drawing outcomes from `outcomes`
    ///
    /// # Errors
    /// - `TradecraftError::Config` if the configuration is invalid
    pub fn with_outcomes(
        config: WorldConfig,
        outcomes: Arc<dyn OutcomeSource>,
    ) -> Result<Self, TradecraftError> {
        config.validate()?;

        let tasking = Tasking::new(outcomes, config.shortest_task_ms, config.longest_task_ms);
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let headquarters = Headquarters::new(tasking.clone());
        let enemy = EnemyHeadquarters::populate(
            &mut rng,
            config.max_facilities,
            config.max_documents_per_facility,
            &tasking,
        );
        let initial_documents = enemy.document_count();

        tracing::info!(
            facilities = enemy.facility_count(),
            documents = initial_documents,
            shortest_ms = config.shortest_task_ms,
            longest_ms = config.longest_task_ms,
            "world loaded"
        );

        Ok(Self {
            config,
            tasking,
            headquarters,
            enemy,
            initial_documents,
        })
    }

    /// Standard preset with entropy seeding
    ///
    /// # Errors
    /// Never in practice; the preset is valid.
    pub fn standard() -> Result<Self, TradecraftError> {
        Self::new(WorldConfig::standard())
    }

    /// Instant preset with entropy seeding
    ///
    /// # Errors
    /// Never in practice; the preset is valid.
    pub fn instant() -> Result<Self, TradecraftError> {
        Self::new(WorldConfig::instant())
    }

    /// Configuration the world was built from
    #[inline]
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Shared tasking
    #[inline]
    #[must_use]
    pub fn tasking(&self) -> &Tasking {
        &self.tasking
    }

    /// Friendly headquarters
    #[inline]
    #[must_use]
    pub fn headquarters(&self) -> &Arc<Headquarters> {
        &self.headquarters
    }

    /// Enemy headquarters
    #[inline]
    #[must_use]
    pub fn enemy(&self) -> &Arc<EnemyHeadquarters> {
        &self.enemy
    }

    /// Documents created at bootstrap; the total never changes
    #[inline]
    #[must_use]
    pub fn initial_document_count(&self) -> usize {
        self.initial_documents
    }

    /// Walk every collection and check custody
    ///
    /// Only meaningful while no transfer is in flight; a document between its
    /// take and its insert is counted as missing.
    #[must_use]
    pub fn audit(&self) -> CustodyReport {
        audit::audit(&self.headquarters, &self.enemy, self.initial_documents)
    }
}
