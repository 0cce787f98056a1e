//! Binding, unbinding, superposition and similarity

use super::spectral::{circular_convolution, circular_correlation};
use super::NORM_FLOOR;
use crate::{Result, SemanticError};
use rand::Rng;
use rand_distr::StandardNormal;

/// Euclidean (L2) norm
#[inline]
pub fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Scale `v` to unit length
///
/// Vectors whose norm is below [`NORM_FLOOR`] are returned unchanged.
pub fn normalize(mut v: Vec<f64>) -> Vec<f64> {
    let n = norm(&v);
    if n > NORM_FLOOR {
        v.iter_mut().for_each(|x| *x /= n);
    }
    v
}

/// Draw an isotropic Gaussian vector and scale it to unit length
///
/// # Example
///
/// ```rust
/// use ruvector_semantic::algebra::{norm, random_unit_vector};
///
/// let v = random_unit_vector(50, &mut rand::thread_rng());
/// assert!((norm(&v) - 1.0).abs() < 1e-9);
/// ```
pub fn random_unit_vector<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Vec<f64> {
    let v: Vec<f64> = (0..dim).map(|_| rng.sample(StandardNormal)).collect();
    normalize(v)
}

/// Plain dot product
///
/// # Errors
///
/// Returns `DimensionMismatch` if the inputs differ in length.
pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    SemanticError::check_dim(a.len(), b.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Bind two semantic pointers with circular convolution
///
/// The result is dissimilar to both operands and is normalised to unit
/// length. Binding is commutative; it is only approximately associative
/// because every step renormalises.
///
/// # Errors
///
/// Returns `DimensionMismatch` if the inputs differ in length.
pub fn bind(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    Ok(normalize(circular_convolution(a, b)?))
}

/// Unbind `key` from `bound` with circular correlation
///
/// Approximately recovers the other operand of an earlier [`bind`].
/// Recovery is lossy; expect cosine similarity around 0.7 to the true
/// operand for random vectors, tightening as the dimension grows.
///
/// # Errors
///
/// Returns `DimensionMismatch` if the inputs differ in length.
pub fn unbind(bound: &[f64], key: &[f64]) -> Result<Vec<f64>> {
    Ok(normalize(circular_correlation(bound, key)?))
}

/// Superpose semantic pointers by element-wise addition
///
/// # Errors
///
/// - `InvalidConfiguration` if `vectors` is empty
/// - `DimensionMismatch` if any vector differs in length from the first
///
/// # Example
///
/// ```rust
/// use ruvector_semantic::algebra::superpose;
///
/// let s = superpose(&[vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
/// assert!((s[0] - s[1]).abs() < 1e-12);
/// ```
pub fn superpose<V: AsRef<[f64]>>(vectors: &[V]) -> Result<Vec<f64>> {
    let first = vectors.first().ok_or_else(|| {
        SemanticError::InvalidConfiguration("Must provide at least one vector".to_string())
    })?;
    let dim = first.as_ref().len();

    let mut sum = vec![0.0; dim];
    for v in vectors {
        let v = v.as_ref();
        SemanticError::check_dim(dim, v.len())?;
        for (acc, x) in sum.iter_mut().zip(v) {
            *acc += x;
        }
    }

    Ok(normalize(sum))
}

/// Cosine similarity in `[-1, 1]`
///
/// For unit vectors this is exactly the dot product. Returns 0.0 when
/// either vector is degenerate (norm below [`NORM_FLOOR`]).
///
/// # Errors
///
/// Returns `DimensionMismatch` if the inputs differ in length.
pub fn similarity(a: &[f64], b: &[f64]) -> Result<f64> {
    let d = dot(a, b)?;
    let denom = norm(a) * norm(b);
    if denom <= NORM_FLOOR {
        Ok(0.0)
    } else {
        Ok(d / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(vec![3.0, 4.0]);
        assert_relative_eq!(v[0], 0.6, epsilon = 1e-12);
        assert_relative_eq!(v[1], 0.8, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_degenerate_left_alone() {
        let v = normalize(vec![0.0, 1e-12, 0.0]);
        assert_eq!(v, vec![0.0, 1e-12, 0.0]);
    }

    #[test]
    fn test_bind_unit_norm() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = random_unit_vector(50, &mut rng);
        let b = random_unit_vector(50, &mut rng);

        let c = bind(&a, &b).unwrap();
        assert_relative_eq!(norm(&c), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bind_dissimilar_to_operands() {
        let mut rng = StdRng::seed_from_u64(2);
        let a = random_unit_vector(1024, &mut rng);
        let b = random_unit_vector(1024, &mut rng);

        let c = bind(&a, &b).unwrap();
        assert!(similarity(&c, &a).unwrap().abs() < 0.2);
        assert!(similarity(&c, &b).unwrap().abs() < 0.2);
    }

    #[test]
    fn test_bind_zero_vector_stays_zero() {
        let a = vec![0.0; 16];
        let b = random_unit_vector(16, &mut StdRng::seed_from_u64(3));

        let c = bind(&a, &b).unwrap();
        assert!(norm(&c) < 1e-10);
    }

    #[test]
    fn test_unbind_recovers_operand() {
        let mut rng = StdRng::seed_from_u64(4);
        let a = random_unit_vector(512, &mut rng);
        let b = random_unit_vector(512, &mut rng);

        let c = bind(&a, &b).unwrap();
        let recovered = unbind(&c, &b).unwrap();
        assert!(similarity(&recovered, &a).unwrap() > 0.6);
    }

    #[test]
    fn test_superpose_two() {
        let mut rng = StdRng::seed_from_u64(5);
        let a = random_unit_vector(256, &mut rng);
        let b = random_unit_vector(256, &mut rng);

        let s = superpose(&[a.clone(), b.clone()]).unwrap();
        let sa = similarity(&s, &a).unwrap();
        let sb = similarity(&s, &b).unwrap();
        assert!(sa > 0.4 && sa < 0.9, "sa = {}", sa);
        assert!(sb > 0.4 && sb < 0.9, "sb = {}", sb);
        assert_relative_eq!(norm(&s), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_superpose_single_is_normalized_copy() {
        let s = superpose(&[vec![2.0, 0.0, 0.0]]).unwrap();
        assert_eq!(s, vec![1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_superpose_empty() {
        let empty: Vec<Vec<f64>> = Vec::new();
        assert!(matches!(
            superpose(&empty),
            Err(SemanticError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_superpose_mismatch() {
        let result = superpose(&[vec![1.0; 4], vec![1.0; 4], vec![1.0; 3]]);
        assert!(matches!(
            result,
            Err(SemanticError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_similarity_non_unit_inputs() {
        let sim = similarity(&[2.0, 0.0], &[5.0, 5.0]).unwrap();
        assert_relative_eq!(sim, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_similarity_degenerate_is_zero() {
        assert_eq!(similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_operations_reject_mismatch() {
        let a = vec![1.0; 50];
        let b = vec![1.0; 40];
        assert!(bind(&a, &b).is_err());
        assert!(unbind(&a, &b).is_err());
        assert!(similarity(&a, &b).is_err());
        assert!(dot(&a, &b).is_err());
    }
}
