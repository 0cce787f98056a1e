//! Attractor cleanup memory
//!
//! A classical Hopfield-style auto-associative network whose weight matrix
//! stores every vocabulary pointer as an outer product. Settling a noisy
//! pointer through `x ← normalize(tanh(W·x))` pulls it onto the attractor
//! manifold spanned by the stored concepts.
//!
//! # Dynamics
//!
//! The update is a bounded power iteration on `W`, so a run settles on the
//! dominant direction reachable from its starting point. With few, nearly
//! orthogonal concepts the basin of the concept closest to the input wins
//! most of the time, but not always; use [`CleanupMemory::find_nearest_match`]
//! on the settled vector rather than assuming the starting label survives.

use crate::algebra::{self, normalize, NORM_FLOOR};
use crate::vocabulary::Vocabulary;
use crate::{Result, SemanticError};
use nalgebra::{DMatrix, DVector};
use std::fmt;

/// Default convergence threshold on the L2 change between iterates
pub const DEFAULT_THRESHOLD: f64 = 0.001;

/// Default settling budget
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Full record of one settling run
#[derive(Debug, Clone, PartialEq)]
pub struct Settling {
    /// Final iterate
    pub vector: Vec<f64>,

    /// Every state visited, starting with the input exactly as given
    ///
    /// Always `iterations + 1` entries long.
    pub trajectory: Vec<Vec<f64>>,

    /// Update steps executed, counted from 1
    pub iterations: usize,

    /// Whether the last step moved less than the threshold
    pub converged: bool,
}

/// Hopfield cleanup memory over a vocabulary snapshot
///
/// # Example
///
/// ```rust
/// use ruvector_semantic::{CleanupMemory, Vocabulary};
///
/// let mut vocab = Vocabulary::with_seed(50, 42).unwrap();
/// for name in ["RED", "BLUE", "GREEN"] {
///     vocab.add(name, None).unwrap();
/// }
///
/// let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();
/// let settled = cleanup.settle(vocab.get("RED").unwrap(), 100).unwrap();
///
/// assert!(settled.iterations <= 100);
/// assert_eq!(settled.trajectory.len(), settled.iterations + 1);
/// ```
#[derive(Clone)]
pub struct CleanupMemory {
    /// Snapshot of the vocabulary in lexicographic name order
    entries: Vec<(String, Vec<f64>)>,

    /// Σ v·vᵀ with a zero diagonal (D×D)
    weights: DMatrix<f64>,

    threshold: f64,
    dim: usize,
}

impl CleanupMemory {
    /// Build the weight matrix from the current vocabulary
    ///
    /// Later changes to `vocabulary` do not affect this memory.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the vocabulary is empty or
    /// `threshold` is not strictly positive.
    pub fn new(vocabulary: &Vocabulary, threshold: f64) -> Result<Self> {
        if vocabulary.is_empty() {
            return Err(SemanticError::InvalidConfiguration(
                "Cannot build cleanup memory from an empty vocabulary".to_string(),
            ));
        }
        if !(threshold > 0.0) {
            return Err(SemanticError::InvalidConfiguration(format!(
                "Threshold must be positive, got {}",
                threshold
            )));
        }

        let dim = vocabulary.dimensionality();
        let mut weights = DMatrix::zeros(dim, dim);
        let mut entries = Vec::with_capacity(vocabulary.len());

        for (name, v) in vocabulary.iter() {
            let column = DVector::from_column_slice(v);
            weights += &column * column.transpose();
            entries.push((name.to_string(), v.to_vec()));
        }
        // No self-connections
        weights.fill_diagonal(0.0);

        tracing::debug!(
            vocab_size = entries.len(),
            dim,
            threshold,
            "built cleanup weights"
        );

        Ok(Self {
            entries,
            weights,
            threshold,
            dim,
        })
    }

    /// Settle `noisy` and return the final state
    pub fn cleanup(&self, noisy: &[f64], max_iterations: usize) -> Result<Vec<f64>> {
        Ok(self.settle(noisy, max_iterations)?.vector)
    }

    /// Settle `noisy`, recording the trajectory
    ///
    /// Iterates `x ← normalize(tanh(W·x))` until the L2 change between
    /// consecutive states drops below the threshold or `max_iterations`
    /// steps have run. Running out of budget is reported through
    /// [`Settling::converged`], not as an error. A step whose output norm
    /// collapses below [`NORM_FLOOR`] restarts from the normalised input.
    ///
    /// With `max_iterations == 0` no step runs and the normalised input is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `noisy` has the wrong length.
    pub fn settle(&self, noisy: &[f64], max_iterations: usize) -> Result<Settling> {
        SemanticError::check_dim(self.dim, noisy.len())?;

        let restart = DVector::from_vec(normalize(noisy.to_vec()));
        let mut state = DVector::from_column_slice(noisy);
        let mut trajectory = vec![noisy.to_vec()];
        let mut iterations = 0;
        let mut converged = false;
        let mut change = f64::INFINITY;

        for step in 1..=max_iterations {
            let mut next = (&self.weights * &state).map(f64::tanh);
            let magnitude = next.norm();
            if magnitude < NORM_FLOOR {
                next.copy_from(&restart);
            } else {
                next /= magnitude;
            }

            change = (&next - &state).norm();
            tracing::trace!(step, change, "cleanup iteration");

            state = next;
            trajectory.push(state.iter().copied().collect());
            iterations = step;

            if change < self.threshold {
                converged = true;
                break;
            }
        }

        if max_iterations == 0 {
            state = restart;
        } else if !converged {
            tracing::warn!(
                max_iterations,
                change,
                threshold = self.threshold,
                "cleanup did not converge"
            );
        }

        tracing::debug!(iterations, converged, change, "cleanup settled");

        Ok(Settling {
            vector: state.iter().copied().collect(),
            trajectory,
            iterations,
            converged,
        })
    }

    /// Closest stored concept by dot product
    ///
    /// Stored concepts are unit length, so the score is the projection of
    /// `vector` onto each one; it is not divided by `vector`'s own norm.
    /// Ties resolve to the lexicographically smallest name.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `vector` has the wrong length.
    pub fn find_nearest_match(&self, vector: &[f64]) -> Result<(String, f64)> {
        SemanticError::check_dim(self.dim, vector.len())?;

        let mut best: Option<(&str, f64)> = None;
        for (name, stored) in &self.entries {
            let sim = algebra::dot(vector, stored)?;
            if best.map_or(true, |(_, top)| sim > top) {
                best = Some((name.as_str(), sim));
            }
        }

        best.map(|(name, sim)| (name.to_string(), sim))
            .ok_or_else(|| {
                SemanticError::InvalidConfiguration("Cleanup memory holds no concepts".to_string())
            })
    }

    /// Dot-product score against every stored concept, best first
    pub fn similarities(&self, vector: &[f64]) -> Result<Vec<(String, f64)>> {
        SemanticError::check_dim(self.dim, vector.len())?;

        let mut scores = self
            .entries
            .iter()
            .map(|(name, stored)| Ok((name.clone(), algebra::dot(vector, stored)?)))
            .collect::<Result<Vec<_>>>()?;
        // Stable, so equal scores stay in name order
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(scores)
    }

    /// Hopfield energy `-½·xᵀWx`
    pub fn energy(&self, state: &[f64]) -> Result<f64> {
        SemanticError::check_dim(self.dim, state.len())?;
        let x = DVector::from_column_slice(state);
        Ok(-0.5 * x.dot(&(&self.weights * &x)))
    }

    /// Copy of the weight matrix
    pub fn get_weights(&self) -> DMatrix<f64> {
        self.weights.clone()
    }

    /// Convergence threshold
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Pointer dimensionality
    pub fn dimensionality(&self) -> usize {
        self.dim
    }

    /// Number of stored concepts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed memory
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored concept names in lexicographic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl fmt::Debug for CleanupMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupMemory")
            .field("n_concepts", &self.entries.len())
            .field("dim", &self.dim)
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{norm, random_unit_vector};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::StandardNormal;

    fn colors(seed: u64) -> Vocabulary {
        let mut vocab = Vocabulary::with_seed(50, seed).unwrap();
        for name in ["RED", "BLUE", "GREEN"] {
            vocab.add(name, None).unwrap();
        }
        vocab
    }

    fn perturb(v: &[f64], scale: f64, rng: &mut StdRng) -> Vec<f64> {
        v.iter()
            .map(|x| x + scale * rng.sample::<f64, _>(StandardNormal))
            .collect()
    }

    #[test]
    fn test_new_validation() {
        let empty = Vocabulary::new(50).unwrap();
        assert!(matches!(
            CleanupMemory::new(&empty, 0.001),
            Err(SemanticError::InvalidConfiguration(_))
        ));

        let vocab = colors(1);
        assert!(CleanupMemory::new(&vocab, 0.0).is_err());
        assert!(CleanupMemory::new(&vocab, -0.1).is_err());
        assert!(CleanupMemory::new(&vocab, f64::NAN).is_err());
    }

    #[test]
    fn test_weight_matrix() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let mut vocab = Vocabulary::new(5).unwrap();
        vocab.add("V1", Some(&[s, s, 0.0, 0.0, 0.0])).unwrap();
        vocab.add("V2", Some(&[0.0, 0.0, s, s, 0.0])).unwrap();

        let w = CleanupMemory::new(&vocab, 0.001).unwrap().get_weights();
        assert_eq!(w.shape(), (5, 5));
        for i in 0..5 {
            assert_eq!(w[(i, i)], 0.0);
            for j in 0..5 {
                assert_eq!(w[(i, j)], w[(j, i)]);
            }
        }
        assert_relative_eq!(w[(0, 1)], 0.5, epsilon = 1e-12);
        assert_relative_eq!(w[(2, 3)], 0.5, epsilon = 1e-12);
        assert_eq!(w[(0, 2)], 0.0);
        assert_eq!(w[(4, 4)], 0.0);
    }

    #[test]
    fn test_get_weights_is_a_copy() {
        let cleanup = CleanupMemory::new(&colors(2), 0.001).unwrap();
        let mut w = cleanup.get_weights();
        w.fill(7.0);
        assert_ne!(cleanup.get_weights()[(0, 1)], 7.0);
    }

    #[test]
    fn test_snapshot_ignores_later_additions() {
        let mut vocab = colors(3);
        let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();
        let before = cleanup.get_weights();

        vocab.add("YELLOW", None).unwrap();
        assert_eq!(cleanup.len(), 3);
        assert_eq!(cleanup.get_weights(), before);
        assert_eq!(cleanup.names().collect::<Vec<_>>(), vec!["BLUE", "GREEN", "RED"]);
    }

    #[test]
    fn test_settle_reporting() {
        let vocab = colors(4);
        let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..10 {
            let noisy = normalize(perturb(vocab.get("RED").unwrap(), 0.5, &mut rng));
            let settled = cleanup.settle(&noisy, 100).unwrap();

            assert!(settled.iterations >= 1 && settled.iterations <= 100);
            assert_eq!(settled.trajectory.len(), settled.iterations + 1);
            assert_eq!(settled.trajectory[0], noisy);
            assert_eq!(settled.trajectory.last().unwrap(), &settled.vector);
            assert_relative_eq!(norm(&settled.vector), 1.0, epsilon = 0.01);

            if settled.iterations < 100 {
                assert!(settled.converged);
                let n = settled.trajectory.len();
                let last: Vec<f64> = settled.trajectory[n - 1]
                    .iter()
                    .zip(&settled.trajectory[n - 2])
                    .map(|(a, b)| a - b)
                    .collect();
                assert!(norm(&last) < cleanup.threshold());
            }
        }
    }

    #[test]
    fn test_budget_exhaustion_is_not_an_error() {
        let vocab = colors(6);
        let cleanup = CleanupMemory::new(&vocab, f64::MIN_POSITIVE).unwrap();
        let noisy = random_unit_vector(50, &mut StdRng::seed_from_u64(7));

        let settled = cleanup.settle(&noisy, 2).unwrap();
        assert_eq!(settled.iterations, 2);
        assert!(!settled.converged);
        assert_eq!(settled.trajectory.len(), 3);
    }

    #[test]
    fn test_zero_budget_returns_normalised_input() {
        let cleanup = CleanupMemory::new(&colors(8), 0.001).unwrap();
        let noisy = vec![2.0; 50];

        let settled = cleanup.settle(&noisy, 0).unwrap();
        assert_eq!(settled.iterations, 0);
        assert_eq!(settled.trajectory, vec![noisy]);
        assert_relative_eq!(norm(&settled.vector), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_collapse_restarts_from_input() {
        // A single axis-aligned concept has an all-zero weight matrix
        let mut vocab = Vocabulary::new(4).unwrap();
        vocab.add("X", Some(&[1.0, 0.0, 0.0, 0.0])).unwrap();
        let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();

        let settled = cleanup.settle(&[0.0, 2.0, 0.0, 0.0], 100).unwrap();
        assert_eq!(settled.vector, vec![0.0, 1.0, 0.0, 0.0]);
        assert_eq!(settled.iterations, 2);
        assert!(settled.converged);
    }

    #[test]
    fn test_cleanup_improves_on_average() {
        let mut improved = 0;
        let mut before_total = 0.0;
        let mut after_total = 0.0;
        let trials = 40;

        for seed in 0..trials {
            let mut vocab = Vocabulary::with_seed(50, seed).unwrap();
            vocab.add("RED", None).unwrap();
            let red = vocab.get("RED").unwrap().to_vec();

            let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();
            let mut rng = StdRng::seed_from_u64(1000 + seed);
            let noisy = normalize(perturb(&red, 0.5, &mut rng));

            let cleaned = cleanup.cleanup(&noisy, 100).unwrap();
            let before = algebra::similarity(&noisy, &red).unwrap();
            let after = algebra::similarity(&cleaned, &red).unwrap();

            before_total += before;
            after_total += after;
            if after > before {
                improved += 1;
            }
        }

        assert!(improved * 2 > trials, "improved in {}/{}", improved, trials);
        assert!(after_total > before_total);
    }

    #[test]
    fn test_find_nearest_match() {
        let vocab = colors(9);
        let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();
        let mut rng = StdRng::seed_from_u64(10);

        let mut scores = Vec::new();
        for _ in 0..20 {
            for name in ["RED", "BLUE", "GREEN"] {
                let noisy = perturb(vocab.get(name).unwrap(), 0.1, &mut rng);
                let (matched, sim) = cleanup.find_nearest_match(&noisy).unwrap();
                assert_eq!(matched, name);
                scores.push(sim);
            }
        }

        // Score is 1 + <concept, noise>, i.e. about 1 ± 0.1
        let above = scores.iter().filter(|&&s| s > 0.8).count();
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        assert!(above * 10 >= scores.len() * 9, "{}/{} above 0.8", above, scores.len());
        assert!(mean > 0.9, "mean score {}", mean);
    }

    #[test]
    fn test_nearest_match_ignores_query_norm() {
        let vocab = colors(13);
        let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();
        let red = vocab.get("RED").unwrap();

        // Adding an orthogonal component leaves the projection onto RED at 1
        let blue = vocab.get("BLUE").unwrap();
        let overlap = algebra::dot(red, blue).unwrap();
        let orthogonal: Vec<f64> = blue.iter().zip(red).map(|(b, r)| b - overlap * r).collect();
        let query: Vec<f64> = red.iter().zip(&orthogonal).map(|(r, o)| r + 0.5 * o).collect();
        assert!(norm(&query) > 1.0);

        let (_, sim) = cleanup.find_nearest_match(&query).unwrap();
        let red_score = cleanup
            .similarities(&query)
            .unwrap()
            .into_iter()
            .find(|(n, _)| n == "RED")
            .map(|(_, s)| s)
            .unwrap();
        assert_relative_eq!(red_score, 1.0, epsilon = 1e-9);
        assert!(sim >= red_score);
    }

    #[test]
    fn test_nearest_match_ties_are_lexicographic() {
        let mut vocab = Vocabulary::new(3).unwrap();
        vocab.add("B", Some(&[1.0, 0.0, 0.0])).unwrap();
        vocab.add("A", Some(&[1.0, 0.0, 0.0])).unwrap();
        vocab.add("C", Some(&[0.0, 1.0, 0.0])).unwrap();
        let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();

        let (name, sim) = cleanup.find_nearest_match(&[1.0, 0.0, 0.0]).unwrap();
        assert_eq!(name, "A");
        assert_relative_eq!(sim, 1.0, epsilon = 1e-12);

        let ranked = cleanup.similarities(&[1.0, 0.0, 0.0]).unwrap();
        let order: Vec<&str> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_energy_lower_at_stored_pattern() {
        let vocab = colors(11);
        let cleanup = CleanupMemory::new(&vocab, 0.001).unwrap();
        let red = vocab.get("RED").unwrap();
        let random = random_unit_vector(50, &mut StdRng::seed_from_u64(12));

        // Stored patterns of a 3-concept memory sit in deep wells
        let e_red = cleanup.energy(red).unwrap();
        let e_random = cleanup.energy(&random).unwrap();
        assert!(e_red < e_random);
        assert!(e_red < 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let cleanup = CleanupMemory::new(&colors(13), 0.001).unwrap();
        let wrong = vec![0.1; 40];

        assert!(matches!(
            cleanup.settle(&wrong, 10),
            Err(SemanticError::DimensionMismatch {
                expected: 50,
                actual: 40
            })
        ));
        assert!(cleanup.find_nearest_match(&wrong).is_err());
        assert!(cleanup.similarities(&wrong).is_err());
        assert!(cleanup.energy(&wrong).is_err());
    }
}
