//! Noise and cleanup demonstration
//!
//! Builds {RED, BLUE, GREEN, CIRCLE, SQUARE}, corrupts RED and settles it
//! back through the cleanup memory.

use anyhow::{Context, Result};
use ruvector_semantic::{SemanticConfig, SemanticPointerSystem};

const CONCEPTS: [&str; 5] = ["RED", "BLUE", "GREEN", "CIRCLE", "SQUARE"];

/// Run the demo command
///
/// Unless a seed was configured the demo uses 42.
pub fn run(mut config: SemanticConfig, noise: f64, max_iterations: usize) -> Result<()> {
    config.seed.get_or_insert(42);
    let mut system = SemanticPointerSystem::new(config).context("invalid configuration")?;

    for name in CONCEPTS {
        system.vocabulary_mut().add(name, None)?;
    }
    let status = system.initialize_cleanup()?;

    println!("=== Semantic Pointer Cleanup ===");
    println!();
    println!(
        "Vocabulary: {} concepts, D = {}",
        status.vocab_size, status.dimension
    );

    let report = system
        .add_noise("RED", noise, "RED_noisy")
        .context("failed to corrupt RED")?;
    println!("Noise level {:.2}:", noise);
    println!(
        "  noisy similarity to RED:   {:.1}%",
        report.noisy_similarity * 100.0
    );

    let cleaned = system.cleanup("RED_noisy", "RED_cleaned", Some(max_iterations))?;
    let similarity = system.vocabulary().similarity("RED_cleaned", "RED")?;
    println!("  cleaned similarity to RED: {:.1}%", similarity * 100.0);
    println!(
        "  iterations: {} ({})",
        cleaned.iterations,
        if cleaned.converged {
            "converged"
        } else {
            "budget exhausted"
        }
    );
    println!(
        "  nearest match: {} ({:.1}%)",
        cleaned.nearest,
        cleaned.similarity * 100.0
    );

    Ok(())
}
