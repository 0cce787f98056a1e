//! JSON command dispatch
//!
//! Maps named operations onto a [`SemanticPointerSystem`]. Commands and
//! responses are tagged by a `"cmd"` field with camelCase names, so one
//! JSON object per message is enough for any transport a host chooses.
//!
//! ```rust
//! use ruvector_semantic::{SemanticConfig, SemanticPointerSystem};
//!
//! let mut system = SemanticPointerSystem::new(SemanticConfig::default()).unwrap();
//! let reply = system.dispatch_json(r#"{"cmd":"addVector","name":"RED"}"#);
//! assert_eq!(reply, r#"{"cmd":"vectorAdded","name":"RED"}"#);
//! ```

use crate::system::{CleanupReport, CleanupStatus, SemanticPointerSystem};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Noise level used when a command omits it
pub const DEFAULT_NOISE_LEVEL: f64 = 0.5;

/// Request understood by [`SemanticPointerSystem::dispatch`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum Command {
    /// Add a pointer, random when `vector` is absent
    #[serde(rename_all = "camelCase")]
    AddVector {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vector: Option<Vec<f64>>,
    },

    /// Bind two pointers (default result `A_BIND_B`)
    #[serde(rename_all = "camelCase")]
    Bind {
        vector_a: String,
        vector_b: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_name: Option<String>,
    },

    /// Unbind a key (default result `BOUND_UNBIND_KEY`)
    #[serde(rename_all = "camelCase")]
    Unbind {
        bound_vector: String,
        key_vector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_name: Option<String>,
    },

    /// Superpose several pointers
    #[serde(rename_all = "camelCase")]
    Superpose {
        vectors: Vec<String>,
        result_name: String,
    },

    /// Cosine similarity of two pointers
    #[serde(rename_all = "camelCase")]
    Similarity { vector_a: String, vector_b: String },

    /// All pointer names
    ListVectors,

    /// Store a noisy copy (default level 0.5, default result `NAME_noisy`)
    #[serde(rename_all = "camelCase")]
    AddNoise {
        vector_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        noise_level: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_name: Option<String>,
    },

    /// Settle a pointer through cleanup memory (default result `NAME_cleaned`)
    #[serde(rename_all = "camelCase")]
    Cleanup {
        noisy_vector: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_iterations: Option<usize>,
    },

    /// Rebuild cleanup memory from the current vocabulary
    InitCleanup,
}

/// Reply produced for every [`Command`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum Response {
    VectorAdded {
        name: String,
    },

    #[serde(rename_all = "camelCase")]
    BindComplete {
        result_name: String,
    },

    #[serde(rename_all = "camelCase")]
    UnbindComplete {
        result_name: String,
    },

    #[serde(rename_all = "camelCase")]
    SuperposeComplete {
        result_name: String,
    },

    #[serde(rename_all = "camelCase")]
    Similarity {
        vector_a: String,
        vector_b: String,
        similarity: f64,
    },

    VectorList {
        vectors: Vec<String>,
        count: usize,
    },

    #[serde(rename_all = "camelCase")]
    NoiseAdded {
        noisy_vector: String,
        noisy_similarity: f64,
        degradation: f64,
    },

    CleanupComplete(CleanupReport),

    CleanupInitialized(CleanupStatus),

    Error {
        message: String,
    },
}

impl SemanticPointerSystem {
    /// Execute one command
    ///
    /// Failures are reported as [`Response::Error`]; nothing is partially
    /// applied.
    pub fn dispatch(&mut self, command: Command) -> Response {
        match self.execute(command) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "command failed");
                Response::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Parse one JSON command, execute it and serialise the reply
    pub fn dispatch_json(&mut self, message: &str) -> String {
        let response = match serde_json::from_str::<Command>(message) {
            Ok(command) => self.dispatch(command),
            Err(e) => {
                tracing::warn!(error = %e, "malformed command");
                Response::Error {
                    message: format!("Invalid command: {}", e),
                }
            }
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            serde_json::json!({ "cmd": "error", "message": e.to_string() }).to_string()
        })
    }

    fn execute(&mut self, command: Command) -> Result<Response> {
        let response = match command {
            Command::AddVector { name, vector } => {
                self.vocabulary_mut().add(name.as_str(), vector.as_deref())?;
                Response::VectorAdded { name }
            }

            Command::Bind {
                vector_a,
                vector_b,
                result_name,
            } => {
                let result_name =
                    result_name.unwrap_or_else(|| format!("{}_BIND_{}", vector_a, vector_b));
                self.vocabulary_mut()
                    .bind(&vector_a, &vector_b, &result_name)?;
                Response::BindComplete { result_name }
            }

            Command::Unbind {
                bound_vector,
                key_vector,
                result_name,
            } => {
                let result_name = result_name
                    .unwrap_or_else(|| format!("{}_UNBIND_{}", bound_vector, key_vector));
                self.vocabulary_mut()
                    .unbind(&bound_vector, &key_vector, &result_name)?;
                Response::UnbindComplete { result_name }
            }

            Command::Superpose {
                vectors,
                result_name,
            } => {
                self.vocabulary_mut().superpose(&vectors, &result_name)?;
                Response::SuperposeComplete { result_name }
            }

            Command::Similarity { vector_a, vector_b } => {
                let similarity = self.vocabulary().similarity(&vector_a, &vector_b)?;
                Response::Similarity {
                    vector_a,
                    vector_b,
                    similarity,
                }
            }

            Command::ListVectors => {
                let vectors = self.vocabulary().names();
                Response::VectorList {
                    count: vectors.len(),
                    vectors,
                }
            }

            Command::AddNoise {
                vector_name,
                noise_level,
                result_name,
            } => {
                let noisy_vector = result_name.unwrap_or_else(|| format!("{}_noisy", vector_name));
                let report = self.add_noise(
                    &vector_name,
                    noise_level.unwrap_or(DEFAULT_NOISE_LEVEL),
                    &noisy_vector,
                )?;
                Response::NoiseAdded {
                    noisy_vector,
                    noisy_similarity: report.noisy_similarity,
                    degradation: report.degradation,
                }
            }

            Command::Cleanup {
                noisy_vector,
                result_name,
                max_iterations,
            } => {
                let result_name =
                    result_name.unwrap_or_else(|| format!("{}_cleaned", noisy_vector));
                Response::CleanupComplete(self.cleanup(
                    &noisy_vector,
                    &result_name,
                    max_iterations,
                )?)
            }

            Command::InitCleanup => Response::CleanupInitialized(self.initialize_cleanup()?),
        };

        Ok(response)
    }
}
