//! Configuration for the semantic pointer system

use crate::{Result, SemanticError};
use serde::{Deserialize, Serialize};

/// Configuration for a [`SemanticPointerSystem`](crate::SemanticPointerSystem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Dimension of every semantic pointer
    pub dimensionality: usize,

    /// Neurons in each population created through the system
    pub neurons_per_pool: usize,

    /// Convergence threshold for cleanup settling (L2 change between iterates)
    pub cleanup_threshold: f64,

    /// Default settling budget for cleanup
    pub max_iterations: usize,

    /// Samples drawn when fitting population decoders
    pub decoder_samples: usize,

    /// Std-dev of the regularisation noise added to sampled activities
    pub decoder_noise: f64,

    /// Random seed for reproducibility (entropy-seeded when `None`)
    pub seed: Option<u64>,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            dimensionality: 50,
            neurons_per_pool: 40,
            cleanup_threshold: 0.001,
            max_iterations: 100,
            decoder_samples: 1000,
            decoder_noise: 0.1,
            seed: None,
        }
    }
}

impl SemanticConfig {
    /// Create a configuration for a specific dimensionality
    pub fn new(dimensionality: usize) -> Self {
        Self {
            dimensionality,
            ..Default::default()
        }
    }

    /// Set neurons per population
    pub fn with_neurons_per_pool(mut self, neurons: usize) -> Self {
        self.neurons_per_pool = neurons;
        self
    }

    /// Set cleanup settling parameters
    pub fn with_cleanup(mut self, threshold: f64, max_iterations: usize) -> Self {
        self.cleanup_threshold = threshold;
        self.max_iterations = max_iterations;
        self
    }

    /// Set decoder fitting parameters
    pub fn with_decoder(mut self, samples: usize, noise: f64) -> Self {
        self.decoder_samples = samples;
        self.decoder_noise = noise;
        self
    }

    /// Fix the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field against its valid range
    pub fn validate(&self) -> Result<()> {
        if self.dimensionality < 2 {
            return Err(SemanticError::InvalidConfiguration(format!(
                "Dimensionality must be at least 2, got {}",
                self.dimensionality
            )));
        }
        if self.neurons_per_pool < 1 {
            return Err(SemanticError::InvalidConfiguration(
                "Must have at least 1 neuron per pool".to_string(),
            ));
        }
        if !(self.cleanup_threshold > 0.0) {
            return Err(SemanticError::InvalidConfiguration(format!(
                "Threshold must be positive, got {}",
                self.cleanup_threshold
            )));
        }
        if self.decoder_samples < 1 {
            return Err(SemanticError::InvalidConfiguration(
                "Decoder fitting needs at least 1 sample".to_string(),
            ));
        }
        if !self.decoder_noise.is_finite() || self.decoder_noise < 0.0 {
            return Err(SemanticError::InvalidConfiguration(format!(
                "Decoder noise must be finite and non-negative, got {}",
                self.decoder_noise
            )));
        }
        Ok(())
    }
}
