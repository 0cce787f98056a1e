//! Connection weights between neural populations
//!
//! A weight matrix maps source activity to target input currents so that
//! the target represents a linear function of the source's pointer:
//!
//! ```text
//! W = E_target · M · D_source        (N_target × N_source)
//! ```
//!
//! where `D_source` decodes activity to a pointer, `M` is a D×D linear map
//! in pointer space (identity, or a circulant for bind/unbind) and
//! `E_target` projects onto the target's preferred directions. The
//! matrices are meant to be handed to an external spiking simulator as
//! synaptic strengths.

use crate::algebra::{convolution_matrix, correlation_matrix};
use crate::population::PopulationCode;
use crate::{Result, SemanticError};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Pointer-space operation a connection computes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "vector", rename_all = "lowercase")]
pub enum TransformOp {
    /// Pass the pointer through unchanged
    Identity,
    /// Bind with a fixed pointer
    Bind(Vec<f64>),
    /// Unbind a fixed pointer
    Unbind(Vec<f64>),
}

/// Weight builder for one source/target pair of populations
///
/// # Example
///
/// ```rust
/// use ruvector_semantic::{PopulationCode, TransformWeights};
///
/// let source = PopulationCode::new(40, 8, Some(1)).unwrap();
/// let target = PopulationCode::new(30, 8, Some(2)).unwrap();
///
/// let weights = TransformWeights::new(&source, &target).unwrap();
/// let w = weights.identity_weights().unwrap();
/// assert_eq!(w.shape(), (30, 40));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TransformWeights<'a> {
    source: &'a PopulationCode,
    target: &'a PopulationCode,
}

impl<'a> TransformWeights<'a> {
    /// Pair two populations
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the populations represent pointers of
    /// different dimensionality.
    pub fn new(source: &'a PopulationCode, target: &'a PopulationCode) -> Result<Self> {
        SemanticError::check_dim(source.dimensionality(), target.dimensionality())?;
        Ok(Self { source, target })
    }

    /// Weights making the target represent the source's pointer
    pub fn identity_weights(&self) -> Result<DMatrix<f64>> {
        self.compose(None)
    }

    /// Weights making the target represent `bind(source, fixed)`
    ///
    /// The circulant places `fixed` rotated by `j` in column `j`. Putting
    /// the rotations in the rows instead yields the transpose, which
    /// computes correlation rather than convolution.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `fixed` has the wrong length.
    pub fn binding_weights(&self, fixed: &[f64]) -> Result<DMatrix<f64>> {
        SemanticError::check_dim(self.source.dimensionality(), fixed.len())?;
        self.compose(Some(convolution_matrix(fixed)))
    }

    /// Weights making the target represent `unbind(source, fixed)`
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if `fixed` has the wrong length.
    pub fn unbinding_weights(&self, fixed: &[f64]) -> Result<DMatrix<f64>> {
        SemanticError::check_dim(self.source.dimensionality(), fixed.len())?;
        self.compose(Some(correlation_matrix(fixed)))
    }

    /// Weights for an arbitrary [`TransformOp`]
    pub fn weights(&self, op: &TransformOp) -> Result<DMatrix<f64>> {
        match op {
            TransformOp::Identity => self.identity_weights(),
            TransformOp::Bind(v) => self.binding_weights(v),
            TransformOp::Unbind(v) => self.unbinding_weights(v),
        }
    }

    /// Source population
    pub fn source(&self) -> &'a PopulationCode {
        self.source
    }

    /// Target population
    pub fn target(&self) -> &'a PopulationCode {
        self.target
    }

    fn compose(&self, pointer_map: Option<DMatrix<f64>>) -> Result<DMatrix<f64>> {
        let decoders = self.source.decoders()?;
        let encoders = self.target.encoders();

        let weights = match pointer_map {
            Some(m) => encoders * (m * decoders),
            None => encoders * decoders,
        };

        tracing::debug!(
            rows = weights.nrows(),
            cols = weights.ncols(),
            "composed transform weights"
        );
        Ok(weights)
    }
}
