//! Cleanup memory walkthrough
//!
//! Builds a small colour/shape vocabulary, queries a bound structure,
//! corrupts a concept with noise and settles it back through the cleanup
//! memory. Set `RUST_LOG=debug` to see settling diagnostics.
//!
//! ```text
//! cargo run -p ruvector-semantic --example cleanup_demo
//! ```

use ruvector_semantic::{SemanticConfig, SemanticPointerSystem, TransformOp};
use tracing_subscriber::EnvFilter;

fn main() -> ruvector_semantic::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("=== Semantic Pointer Cleanup Demo ===\n");

    let config = SemanticConfig::new(50).with_seed(42);
    let mut system = SemanticPointerSystem::new(config)?;

    for name in ["RED", "BLUE", "GREEN", "CIRCLE", "SQUARE", "COLOR", "SHAPE"] {
        system.vocabulary_mut().add(name, None)?;
    }
    println!("Vocabulary: {:?}\n", system.vocabulary().names());

    // Structure: COLOR⊛RED + SHAPE⊛CIRCLE
    println!("Test 1: Role/filler query");
    println!("-------------------------");
    let vocab = system.vocabulary_mut();
    vocab.bind("COLOR", "RED", "COLOR_RED")?;
    vocab.bind("SHAPE", "CIRCLE", "SHAPE_CIRCLE")?;
    vocab.superpose(&["COLOR_RED", "SHAPE_CIRCLE"], "RED_CIRCLE")?;
    vocab.unbind("RED_CIRCLE", "COLOR", "WHAT_COLOR")?;
    for name in ["RED", "BLUE", "GREEN"] {
        println!(
            "  similarity(WHAT_COLOR, {:<5}) = {:+.3}",
            name,
            vocab.similarity("WHAT_COLOR", name)?
        );
    }
    println!();

    println!("Test 2: Noise and cleanup");
    println!("-------------------------");
    let status = system.initialize_cleanup()?;
    println!("  cleanup memory holds {} concepts", status.vocab_size);

    let noise = system.add_noise("RED", 0.5, "RED_noisy")?;
    println!("  noisy similarity:   {:.1}%", noise.noisy_similarity * 100.0);

    let report = system.cleanup("RED_noisy", "RED_cleaned", None)?;
    let cleaned = system.vocabulary().similarity("RED_cleaned", "RED")?;
    println!("  cleaned similarity: {:.1}%", cleaned * 100.0);
    println!(
        "  settled in {} iterations (converged: {})",
        report.iterations, report.converged
    );
    println!(
        "  nearest match: {} ({:.1}%)\n",
        report.nearest,
        report.similarity * 100.0
    );

    println!("Test 3: Neural wiring");
    println!("---------------------");
    system.create_pool("input")?;
    system.create_pool("output")?;
    let key = system.vocabulary().get("COLOR")?.to_vec();
    let weights = system.connect_pools("input", "output", &TransformOp::Unbind(key))?;
    println!(
        "  unbind-COLOR weights: {} x {}",
        weights.nrows(),
        weights.ncols()
    );

    Ok(())
}
