//! Owning aggregate for vocabulary, populations and cleanup memory
//!
//! [`SemanticPointerSystem`] is what a host drives: it owns one
//! vocabulary, a registry of named neural populations ("pools") and an
//! optional cleanup memory built from a vocabulary snapshot.

use crate::cleanup::CleanupMemory;
use crate::config::SemanticConfig;
use crate::population::{DecoderConfig, PopulationCode};
use crate::transform::{TransformOp, TransformWeights};
use crate::vocabulary::{NoiseReport, Vocabulary};
use crate::{Result, SemanticError};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a freshly built cleanup memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupStatus {
    /// Concepts captured in the snapshot
    pub vocab_size: usize,
    /// Pointer dimensionality
    pub dimension: usize,
}

/// Outcome of cleaning a stored pointer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    /// Name the cleaned pointer was stored under
    #[serde(rename = "cleanedVector")]
    pub result_name: String,
    /// Settling steps executed
    pub iterations: usize,
    /// Whether settling met the threshold within budget
    pub converged: bool,
    /// Closest concept in the cleanup snapshot
    #[serde(rename = "nearestMatch")]
    pub nearest: String,
    /// Similarity of the cleaned pointer to `nearest`
    pub similarity: f64,
    /// States visited, including the input
    #[serde(rename = "trajectoryLength")]
    pub trajectory_len: usize,
}

/// Semantic pointer workspace
///
/// # Example
///
/// ```rust
/// use ruvector_semantic::{SemanticConfig, SemanticPointerSystem};
///
/// let mut system = SemanticPointerSystem::new(SemanticConfig::default().with_seed(42)).unwrap();
/// for name in ["RED", "BLUE", "GREEN"] {
///     system.vocabulary_mut().add(name, None).unwrap();
/// }
///
/// system.add_noise("RED", 0.5, "RED_noisy").unwrap();
/// let report = system.cleanup("RED_noisy", "RED_cleaned", None).unwrap();
///
/// assert_eq!(report.trajectory_len, report.iterations + 1);
/// assert!(system.vocabulary().contains("RED_cleaned"));
/// ```
#[derive(Debug)]
pub struct SemanticPointerSystem {
    config: SemanticConfig,
    vocabulary: Vocabulary,
    pools: BTreeMap<String, PopulationCode>,
    cleanup: Option<CleanupMemory>,
}

impl SemanticPointerSystem {
    /// Create a system from a validated configuration
    pub fn new(config: SemanticConfig) -> Result<Self> {
        config.validate()?;

        let vocabulary = match config.seed {
            Some(seed) => Vocabulary::with_seed(config.dimensionality, seed)?,
            None => Vocabulary::new(config.dimensionality)?,
        };

        Ok(Self {
            config,
            vocabulary,
            pools: BTreeMap::new(),
            cleanup: None,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SemanticConfig {
        &self.config
    }

    /// Borrow the vocabulary
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Borrow the vocabulary mutably
    ///
    /// Changes are not seen by an existing cleanup memory until
    /// [`initialize_cleanup`](Self::initialize_cleanup) runs again.
    pub fn vocabulary_mut(&mut self) -> &mut Vocabulary {
        &mut self.vocabulary
    }

    /// Create a named population with `neurons_per_pool` neurons
    ///
    /// Creating a pool that already exists returns the existing one.
    pub fn create_pool(&mut self, name: &str) -> Result<&PopulationCode> {
        if self.pools.contains_key(name) {
            tracing::warn!(pool = name, "pool already exists");
            return self.pool(name);
        }

        // Seeded systems give every pool its own reproducible stream
        let seed = self
            .config
            .seed
            .map(|s| s.wrapping_add(1 + self.pools.len() as u64));
        let population = PopulationCode::new(
            self.config.neurons_per_pool,
            self.config.dimensionality,
            seed,
        )?
        .with_decoder_config(DecoderConfig {
            n_samples: self.config.decoder_samples,
            noise: self.config.decoder_noise,
        })?;

        tracing::info!(
            pool = name,
            neurons = self.config.neurons_per_pool,
            dim = self.config.dimensionality,
            "created pool"
        );
        Ok(self.pools.entry(name.to_string()).or_insert(population))
    }

    /// Look up a pool
    pub fn pool(&self, name: &str) -> Result<&PopulationCode> {
        self.pools
            .get(name)
            .ok_or_else(|| SemanticError::NotFound(name.to_string()))
    }

    /// Pool names in lexicographic order
    pub fn pool_names(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Firing rates of `pool` for `vector`, scaled by `gain`
    pub fn encode_input(&self, pool: &str, vector: &[f64], gain: f64) -> Result<Vec<f64>> {
        self.pool(pool)?.encode_with(vector, gain, 0.0)
    }

    /// Weights connecting two pools so the target computes `op`
    pub fn connect_pools(&self, from: &str, to: &str, op: &TransformOp) -> Result<DMatrix<f64>> {
        let weights = TransformWeights::new(self.pool(from)?, self.pool(to)?)?.weights(op)?;

        tracing::info!(
            from,
            to,
            op = match op {
                TransformOp::Identity => "identity",
                TransformOp::Bind(_) => "bind",
                TransformOp::Unbind(_) => "unbind",
            },
            "generated connection weights"
        );
        Ok(weights)
    }

    /// Rebuild the cleanup memory from the current vocabulary
    pub fn initialize_cleanup(&mut self) -> Result<CleanupStatus> {
        let memory = CleanupMemory::new(&self.vocabulary, self.config.cleanup_threshold)?;
        let status = CleanupStatus {
            vocab_size: memory.len(),
            dimension: memory.dimensionality(),
        };
        self.cleanup = Some(memory);

        tracing::info!(
            vocab_size = status.vocab_size,
            dim = status.dimension,
            "initialized cleanup memory"
        );
        Ok(status)
    }

    /// Cleanup memory, if built
    pub fn cleanup_memory(&self) -> Option<&CleanupMemory> {
        self.cleanup.as_ref()
    }

    /// Store a noisy copy of `name` as `result_name`
    pub fn add_noise(
        &mut self,
        name: &str,
        noise_level: f64,
        result_name: &str,
    ) -> Result<NoiseReport> {
        let report = self.vocabulary.add_noise(name, noise_level, result_name)?;
        tracing::info!(
            source = name,
            result = result_name,
            similarity = report.noisy_similarity,
            "added noise"
        );
        Ok(report)
    }

    /// Settle a stored pointer through the cleanup memory
    ///
    /// Builds the cleanup memory first if it does not exist yet. The
    /// cleaned pointer is stored as `result_name`. `max_iterations`
    /// defaults to the configured budget.
    pub fn cleanup(
        &mut self,
        noisy_name: &str,
        result_name: &str,
        max_iterations: Option<usize>,
    ) -> Result<CleanupReport> {
        let noisy = self.vocabulary.get(noisy_name)?.to_vec();
        if self.vocabulary.contains(result_name) {
            return Err(SemanticError::AlreadyExists(result_name.to_string()));
        }

        if self.cleanup.is_none() {
            self.initialize_cleanup()?;
        }
        let memory = self.cleanup.as_ref().ok_or_else(|| {
            SemanticError::InvalidConfiguration("Cleanup memory is not initialized".to_string())
        })?;

        let budget = max_iterations.unwrap_or(self.config.max_iterations);
        let settled = memory.settle(&noisy, budget)?;
        let (nearest, similarity) = memory.find_nearest_match(&settled.vector)?;

        self.vocabulary.add(result_name, Some(&settled.vector))?;

        tracing::info!(
            source = noisy_name,
            result = result_name,
            nearest = %nearest,
            similarity,
            iterations = settled.iterations,
            "cleaned pointer"
        );

        Ok(CleanupReport {
            result_name: result_name.to_string(),
            iterations: settled.iterations,
            converged: settled.converged,
            nearest,
            similarity,
            trajectory_len: settled.trajectory.len(),
        })
    }
}
