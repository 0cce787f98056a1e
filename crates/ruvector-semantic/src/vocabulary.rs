//! Named registry of semantic pointers
//!
//! A vocabulary maps unique names to unit vectors of one fixed
//! dimensionality. Entries are immutable once stored and there is no
//! removal: the vocabulary only grows.

use crate::algebra::{self, normalize, random_unit_vector};
use crate::{Result, SemanticError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of corrupting a stored pointer with Gaussian noise
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoiseReport {
    /// Similarity of the noisy copy to its source
    pub noisy_similarity: f64,

    /// `1 - noisy_similarity`
    pub degradation: f64,
}

/// Named collection of semantic pointers
///
/// Names iterate in lexicographic order, which makes every scan over the
/// vocabulary (and therefore tie-breaking in nearest-match searches)
/// deterministic.
///
/// # Example
///
/// ```rust
/// use ruvector_semantic::Vocabulary;
///
/// let mut vocab = Vocabulary::with_seed(50, 42).unwrap();
/// vocab.add("SHAPE", None).unwrap();
/// vocab.add("CIRCLE", None).unwrap();
/// vocab.bind("SHAPE", "CIRCLE", "SHAPE_CIRCLE").unwrap();
///
/// assert_eq!(vocab.len(), 3);
/// assert!(vocab.similarity("SHAPE", "SHAPE_CIRCLE").unwrap().abs() < 0.6);
/// ```
#[derive(Clone)]
pub struct Vocabulary {
    vectors: BTreeMap<String, Vec<f64>>,
    dim: usize,
    rng: StdRng,
}

impl Vocabulary {
    /// Create an empty vocabulary drawing random pointers from OS entropy
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `dimensionality < 2`.
    pub fn new(dimensionality: usize) -> Result<Self> {
        Self::with_rng(dimensionality, StdRng::from_entropy())
    }

    /// Create an empty vocabulary with a reproducible generator
    pub fn with_seed(dimensionality: usize, seed: u64) -> Result<Self> {
        Self::with_rng(dimensionality, StdRng::seed_from_u64(seed))
    }

    fn with_rng(dimensionality: usize, rng: StdRng) -> Result<Self> {
        if dimensionality < 2 {
            return Err(SemanticError::InvalidConfiguration(format!(
                "Dimensionality must be at least 2, got {}",
                dimensionality
            )));
        }

        Ok(Self {
            vectors: BTreeMap::new(),
            dim: dimensionality,
            rng,
        })
    }

    /// Add a semantic pointer
    ///
    /// With `vector == None` a random unit vector is drawn; otherwise the
    /// supplied vector is normalised and stored.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if `name` is taken
    /// - `DimensionMismatch` if the supplied vector has the wrong length
    pub fn add(&mut self, name: impl Into<String>, vector: Option<&[f64]>) -> Result<&[f64]> {
        let name = name.into();
        self.ensure_vacant(&name)?;

        let vector = match vector {
            Some(v) => {
                SemanticError::check_dim(self.dim, v.len())?;
                normalize(v.to_vec())
            }
            None => random_unit_vector(self.dim, &mut self.rng),
        };

        Ok(self.insert(name, vector))
    }

    /// Look up a semantic pointer
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `name` is not registered.
    pub fn get(&self, name: &str) -> Result<&[f64]> {
        self.vectors
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| SemanticError::NotFound(name.to_string()))
    }

    /// Bind two stored pointers and store the result as `result_name`
    pub fn bind(&mut self, name_a: &str, name_b: &str, result_name: &str) -> Result<&[f64]> {
        let result = algebra::bind(self.get(name_a)?, self.get(name_b)?)?;
        self.ensure_vacant(result_name)?;
        Ok(self.insert(result_name.to_string(), result))
    }

    /// Unbind `key_name` from `bound_name` and store the result as `result_name`
    pub fn unbind(&mut self, bound_name: &str, key_name: &str, result_name: &str) -> Result<&[f64]> {
        let result = algebra::unbind(self.get(bound_name)?, self.get(key_name)?)?;
        self.ensure_vacant(result_name)?;
        Ok(self.insert(result_name.to_string(), result))
    }

    /// Superpose stored pointers and store the result as `result_name`
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when `names` is empty, plus the lookup and
    /// collision errors of [`Vocabulary::bind`].
    pub fn superpose<S: AsRef<str>>(&mut self, names: &[S], result_name: &str) -> Result<&[f64]> {
        let vectors = names
            .iter()
            .map(|name| self.get(name.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let result = algebra::superpose(&vectors)?;
        self.ensure_vacant(result_name)?;
        Ok(self.insert(result_name.to_string(), result))
    }

    /// Cosine similarity between two stored pointers
    pub fn similarity(&self, name_a: &str, name_b: &str) -> Result<f64> {
        algebra::similarity(self.get(name_a)?, self.get(name_b)?)
    }

    /// Store a copy of `source` corrupted with isotropic Gaussian noise
    ///
    /// Each coordinate receives `N(0, noise_level²)` noise before the copy
    /// is renormalised.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for a negative or non-finite `noise_level`
    /// - `NotFound` / `AlreadyExists` as for [`Vocabulary::bind`]
    pub fn add_noise(
        &mut self,
        source: &str,
        noise_level: f64,
        result_name: &str,
    ) -> Result<NoiseReport> {
        if !noise_level.is_finite() || noise_level < 0.0 {
            return Err(SemanticError::InvalidConfiguration(format!(
                "Noise level must be finite and non-negative, got {}",
                noise_level
            )));
        }

        let original = self.get(source)?.to_vec();
        self.ensure_vacant(result_name)?;

        let rng = &mut self.rng;
        let noisy: Vec<f64> = original
            .iter()
            .map(|&x| x + noise_level * rng.sample::<f64, _>(StandardNormal))
            .collect();
        let noisy = normalize(noisy);

        let noisy_similarity = algebra::similarity(&original, &noisy)?;
        self.insert(result_name.to_string(), noisy);

        Ok(NoiseReport {
            noisy_similarity,
            degradation: 1.0 - noisy_similarity,
        })
    }

    /// Whether `name` is registered
    pub fn contains(&self, name: &str) -> bool {
        self.vectors.contains_key(name)
    }

    /// Number of stored pointers
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the vocabulary is empty
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality shared by every entry
    pub fn dimensionality(&self) -> usize {
        self.dim
    }

    /// Names in lexicographic order
    pub fn names(&self) -> Vec<String> {
        self.vectors.keys().cloned().collect()
    }

    /// `(name, vector)` pairs in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.vectors
            .iter()
            .map(|(name, v)| (name.as_str(), v.as_slice()))
    }

    fn ensure_vacant(&self, name: &str) -> Result<()> {
        if self.vectors.contains_key(name) {
            Err(SemanticError::AlreadyExists(name.to_string()))
        } else {
            Ok(())
        }
    }

    fn insert(&mut self, name: String, vector: Vec<f64>) -> &[f64] {
        tracing::trace!(name = %name, "stored semantic pointer");
        self.vectors.entry(name).or_insert(vector).as_slice()
    }
}

impl fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vocabulary")
            .field("dim", &self.dim)
            .field("n_vectors", &self.vectors.len())
            .finish()
    }
}
