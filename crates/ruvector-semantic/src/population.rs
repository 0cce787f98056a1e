//! Population coding of semantic pointers
//!
//! Implements NEF-style encoding (Eliasmith & Anderson, 2003): every
//! neuron has a unit "preferred direction" and fires at a rectified linear
//! function of the pointer's projection onto it. Decoding is the linear
//! least-squares reconstruction of pointers from activity, fitted once on
//! random samples with regularisation noise and then cached.

use crate::algebra::{normalize, random_unit_vector};
use crate::{Result, SemanticError};
use nalgebra::{DMatrix, DVector};
use once_cell::sync::OnceCell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Parameters for fitting decoders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecoderConfig {
    /// Random unit pointers used as training samples
    pub n_samples: usize,

    /// Std-dev of Gaussian noise added to training activities
    pub noise: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            noise: 0.1,
        }
    }
}

/// A neural population representing semantic pointers
///
/// # Example
///
/// ```rust
/// use ruvector_semantic::algebra::{random_unit_vector, similarity};
/// use ruvector_semantic::PopulationCode;
/// use rand::SeedableRng;
///
/// let population = PopulationCode::new(300, 16, Some(42)).unwrap();
/// let pointer = random_unit_vector(16, &mut rand::rngs::StdRng::seed_from_u64(1));
///
/// let rates = population.encode(&pointer).unwrap();
/// assert_eq!(rates.len(), 300);
/// assert!(rates.iter().all(|&r| r >= 0.0));
///
/// let recovered = population.decode(&rates).unwrap();
/// assert!(similarity(&pointer, &recovered).unwrap() > 0.8);
/// ```
#[derive(Clone)]
pub struct PopulationCode {
    /// Preferred directions, one unit row per neuron (n_neurons × dim)
    encoders: DMatrix<f64>,

    /// Least-squares decoders (dim × n_neurons), fitted on first use
    decoders: OnceCell<DMatrix<f64>>,

    decoder_config: DecoderConfig,

    /// Seed for decoder fitting; entropy-seeded when `None`
    decoder_seed: Option<u64>,

    n_neurons: usize,
    dim: usize,
}

impl PopulationCode {
    /// Create a population with isotropically drawn preferred directions
    ///
    /// Passing a `seed` makes both the encoders and the lazily fitted
    /// decoders reproducible.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `n_neurons < 1` or
    /// `dimensionality < 2`.
    pub fn new(n_neurons: usize, dimensionality: usize, seed: Option<u64>) -> Result<Self> {
        if n_neurons < 1 {
            return Err(SemanticError::InvalidConfiguration(
                "Must have at least 1 neuron".to_string(),
            ));
        }
        if dimensionality < 2 {
            return Err(SemanticError::InvalidConfiguration(format!(
                "Dimensionality must be at least 2, got {}",
                dimensionality
            )));
        }

        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let flat: Vec<f64> = (0..n_neurons)
            .flat_map(|_| random_unit_vector(dimensionality, &mut rng))
            .collect();
        let encoders = DMatrix::from_row_slice(n_neurons, dimensionality, &flat);

        let decoder_seed = seed.map(|_| rng.gen::<u64>());

        Ok(Self {
            encoders,
            decoders: OnceCell::new(),
            decoder_config: DecoderConfig::default(),
            decoder_seed,
            n_neurons,
            dim: dimensionality,
        })
    }

    /// Replace the decoder fitting parameters
    ///
    /// Any decoders already fitted are discarded.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for zero samples or negative/non-finite noise.
    pub fn with_decoder_config(mut self, config: DecoderConfig) -> Result<Self> {
        if config.n_samples < 1 {
            return Err(SemanticError::InvalidConfiguration(
                "Decoder fitting needs at least 1 sample".to_string(),
            ));
        }
        if !config.noise.is_finite() || config.noise < 0.0 {
            return Err(SemanticError::InvalidConfiguration(format!(
                "Decoder noise must be finite and non-negative, got {}",
                config.noise
            )));
        }

        self.decoder_config = config;
        self.decoders = OnceCell::new();
        Ok(self)
    }

    /// Encode a pointer as firing rates with unit gain and no bias
    pub fn encode(&self, pointer: &[f64]) -> Result<Vec<f64>> {
        self.encode_with(pointer, 1.0, 0.0)
    }

    /// Encode a pointer as firing rates
    ///
    /// `rate[i] = max(0, gain · ⟨pointer, encoder[i]⟩ + bias)`
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `pointer.len()` differs from the
    /// population's dimensionality.
    pub fn encode_with(&self, pointer: &[f64], gain: f64, bias: f64) -> Result<Vec<f64>> {
        SemanticError::check_dim(self.dim, pointer.len())?;

        let projections = &self.encoders * DVector::from_column_slice(pointer);
        Ok(projections
            .iter()
            .map(|&p| (gain * p + bias).max(0.0))
            .collect())
    }

    /// Decode firing rates back to a unit pointer
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `rates.len()` differs from the
    /// number of neurons.
    pub fn decode(&self, rates: &[f64]) -> Result<Vec<f64>> {
        SemanticError::check_dim(self.n_neurons, rates.len())?;

        let recovered = self.decoders()? * DVector::from_column_slice(rates);
        Ok(normalize(recovered.iter().copied().collect()))
    }

    /// Decoder matrix (dim × n_neurons), fitted on first access
    ///
    /// Fitting happens at most once even when several threads race on the
    /// first call.
    pub fn decoders(&self) -> Result<&DMatrix<f64>> {
        self.decoders.get_or_try_init(|| self.fit_decoders())
    }

    /// Whether decoders have been fitted yet
    pub fn has_decoders(&self) -> bool {
        self.decoders.get().is_some()
    }

    /// Preferred directions (n_neurons × dim)
    pub fn encoders(&self) -> &DMatrix<f64> {
        &self.encoders
    }

    /// Number of neurons
    pub fn n_neurons(&self) -> usize {
        self.n_neurons
    }

    /// Dimensionality of represented pointers
    pub fn dimensionality(&self) -> usize {
        self.dim
    }

    /// Decoder fitting parameters
    pub fn decoder_config(&self) -> DecoderConfig {
        self.decoder_config
    }

    /// Solve `activities · Dᵀ ≈ samples` for D
    fn fit_decoders(&self) -> Result<DMatrix<f64>> {
        let start = Instant::now();
        let DecoderConfig { n_samples, noise } = self.decoder_config;

        let mut rng = match self.decoder_seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };

        let mut samples = DMatrix::zeros(n_samples, self.dim);
        let mut activities = DMatrix::zeros(n_samples, self.n_neurons);

        for row in 0..n_samples {
            let sample = random_unit_vector(self.dim, &mut rng);
            let rates = self.encode(&sample)?;

            for (col, value) in sample.iter().enumerate() {
                samples[(row, col)] = *value;
            }
            for (col, rate) in rates.iter().enumerate() {
                let jitter: f64 = rng.sample(StandardNormal);
                activities[(row, col)] = rate + noise * jitter;
            }
        }

        let svd = activities.svd(true, true);
        let largest = svd.singular_values.max();
        let eps = f64::EPSILON * n_samples.max(self.n_neurons) as f64 * largest;
        let solution = svd
            .solve(&samples, eps)
            .map_err(|e| SemanticError::Numerical(e.to_string()))?;

        tracing::debug!(
            n_neurons = self.n_neurons,
            dim = self.dim,
            n_samples,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fitted population decoders"
        );

        Ok(solution.transpose())
    }
}

impl fmt::Debug for PopulationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PopulationCode")
            .field("n_neurons", &self.n_neurons)
            .field("dim", &self.dim)
            .field("decoders_fitted", &self.has_decoders())
            .finish()
    }
}
