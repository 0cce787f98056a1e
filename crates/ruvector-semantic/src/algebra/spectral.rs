//! FFT-backed circular convolution and correlation

use crate::{Result, SemanticError};
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

thread_local! {
    static PLANS: RefCell<HashMap<usize, CircularTransform>> = RefCell::new(HashMap::new());
}

/// Planned transform for `dim`, shared by every free-function call on this thread
pub(crate) fn cached_transform(dim: usize) -> CircularTransform {
    PLANS.with(|plans| {
        plans
            .borrow_mut()
            .entry(dim)
            .or_insert_with(|| CircularTransform::new(dim))
            .clone()
    })
}

/// Planned forward/inverse FFT pair for one dimensionality
///
/// Planning is the expensive part of an FFT. The free functions reuse a
/// per-thread plan for each dimensionality; holding one of these directly
/// skips the cache lookup.
#[derive(Clone)]
pub struct CircularTransform {
    dim: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl CircularTransform {
    /// Plan transforms for vectors of length `dim`
    pub fn new(dim: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            dim,
            forward: planner.plan_fft_forward(dim),
            inverse: planner.plan_fft_inverse(dim),
        }
    }

    /// Vector length this transform was planned for
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Un-normalised circular convolution `a ⊛ b`
    pub fn convolve(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
        self.spectral_product(a, b, false)
    }

    /// Un-normalised circular correlation of `c` with `key`
    pub fn correlate(&self, c: &[f64], key: &[f64]) -> Result<Vec<f64>> {
        self.spectral_product(c, key, true)
    }

    fn spectral_product(&self, a: &[f64], b: &[f64], conjugate: bool) -> Result<Vec<f64>> {
        SemanticError::check_dim(self.dim, a.len())?;
        SemanticError::check_dim(self.dim, b.len())?;
        if self.dim == 0 {
            return Ok(Vec::new());
        }

        let mut fa = self.spectrum(a);
        let fb = self.spectrum(b);

        for (x, y) in fa.iter_mut().zip(&fb) {
            *x *= if conjugate { y.conj() } else { *y };
        }

        self.inverse.process(&mut fa);

        // rustfft leaves the inverse unscaled
        let scale = 1.0 / self.dim as f64;
        Ok(fa.iter().map(|c| c.re * scale).collect())
    }

    fn spectrum(&self, v: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = v.iter().map(|&x| Complex64::new(x, 0.0)).collect();
        self.forward.process(&mut buffer);
        buffer
    }
}

impl fmt::Debug for CircularTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircularTransform")
            .field("dim", &self.dim)
            .finish()
    }
}

/// Circular convolution `a ⊛ b` without normalisation
///
/// # Errors
///
/// Returns `DimensionMismatch` if the inputs differ in length.
pub fn circular_convolution(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    SemanticError::check_dim(a.len(), b.len())?;
    if a.is_empty() {
        return Ok(Vec::new());
    }
    cached_transform(a.len()).convolve(a, b)
}

/// Circular correlation of `c` with `key` without normalisation
///
/// # Errors
///
/// Returns `DimensionMismatch` if the inputs differ in length.
pub fn circular_correlation(c: &[f64], key: &[f64]) -> Result<Vec<f64>> {
    SemanticError::check_dim(c.len(), key.len())?;
    if c.is_empty() {
        return Ok(Vec::new());
    }
    cached_transform(c.len()).correlate(c, key)
}
