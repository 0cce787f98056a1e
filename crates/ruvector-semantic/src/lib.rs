//! # RuVector Semantic
//!
//! Semantic pointer architecture for RuVector: symbols as high-dimensional
//! unit vectors, manipulated algebraically and represented by neural
//! populations.
//!
//! - Holographic reduced representation algebra (bind, unbind, superpose)
//! - Named vocabularies of semantic pointers
//! - NEF population coding with least-squares decoders
//! - Connection weights that compute bind/unbind between populations
//! - Hopfield-style cleanup memory for denoising pointers
//!
//! ## Algebra and vocabulary
//!
//! ```rust
//! use ruvector_semantic::Vocabulary;
//!
//! let mut vocab = Vocabulary::with_seed(512, 42).unwrap();
//! vocab.add("COLOR", None).unwrap();
//! vocab.add("RED", None).unwrap();
//!
//! // COLOR ⊛ RED, then query the colour back out
//! vocab.bind("COLOR", "RED", "COLOR_RED").unwrap();
//! vocab.unbind("COLOR_RED", "COLOR", "ANSWER").unwrap();
//!
//! assert!(vocab.similarity("ANSWER", "RED").unwrap() > 0.5);
//! ```
//!
//! ## Cleanup memory
//!
//! ```rust
//! use ruvector_semantic::{CleanupMemory, Vocabulary};
//!
//! let mut vocab = Vocabulary::with_seed(50, 1).unwrap();
//! vocab.add("RED", None).unwrap();
//! vocab.add_noise("RED", 0.5, "RED_noisy").unwrap();
//!
//! let memory = CleanupMemory::new(&vocab, 0.001).unwrap();
//! let cleaned = memory.cleanup(vocab.get("RED_noisy").unwrap(), 100).unwrap();
//! let (name, _) = memory.find_nearest_match(&cleaned).unwrap();
//! assert!(name == "RED" || name == "RED_noisy");
//! ```
//!
//! ## Neural wiring
//!
//! ```rust
//! use ruvector_semantic::{PopulationCode, TransformOp, TransformWeights};
//!
//! let source = PopulationCode::new(60, 16, Some(1)).unwrap();
//! let target = PopulationCode::new(80, 16, Some(2)).unwrap();
//! let key = vec![0.25; 16];
//!
//! let weights = TransformWeights::new(&source, &target).unwrap();
//! let w = weights.weights(&TransformOp::Bind(key)).unwrap();
//! assert_eq!(w.shape(), (80, 60));
//! ```

pub mod algebra;
pub mod cleanup;
pub mod config;
pub mod dispatch;
pub mod population;
pub mod system;
pub mod transform;
pub mod vocabulary;

mod error;

pub use cleanup::{CleanupMemory, Settling};
pub use config::SemanticConfig;
pub use dispatch::{Command, Response};
pub use error::{Result, SemanticError};
pub use population::{DecoderConfig, PopulationCode};
pub use system::{CleanupReport, CleanupStatus, SemanticPointerSystem};
pub use transform::{TransformOp, TransformWeights};
pub use vocabulary::{NoiseReport, Vocabulary};
