//! Semantic pointer algebra
//!
//! Binding, unbinding, superposition and similarity over fixed-length real
//! vectors, following Plate's holographic reduced representations:
//!
//! - **bind**: circular convolution, `IDFT(DFT(a) ⊙ DFT(b))`
//! - **unbind**: circular correlation, `IDFT(DFT(c) ⊙ conj(DFT(key)))`
//! - **superpose**: element-wise sum
//! - **similarity**: cosine similarity (a dot product for unit vectors)
//!
//! Every composite result is renormalised to unit length unless its norm
//! falls below [`NORM_FLOOR`], in which case it is returned as-is.
//!
//! # Example
//!
//! ```rust
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use ruvector_semantic::algebra::{bind, random_unit_vector, similarity, unbind};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let role = random_unit_vector(512, &mut rng);
//! let filler = random_unit_vector(512, &mut rng);
//!
//! let bound = bind(&role, &filler).unwrap();
//! let recovered = unbind(&bound, &role).unwrap();
//! assert!(similarity(&recovered, &filler).unwrap() > 0.5);
//! ```

mod circulant;
mod ops;
mod spectral;

pub use circulant::{convolution_matrix, correlation_matrix};
pub use ops::{
    bind, dot, norm, normalize, random_unit_vector, similarity, superpose, unbind,
};
pub use spectral::{circular_convolution, circular_correlation, CircularTransform};

/// Norms below this are treated as degenerate and never divided by
pub const NORM_FLOOR: f64 = 1e-10;
