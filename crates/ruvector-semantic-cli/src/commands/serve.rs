//! JSON-lines command loop
//!
//! Each non-empty stdin line is one command; each produces exactly one
//! response line on stdout. Blank lines are skipped.

use anyhow::{Context, Result};
use ruvector_semantic::SemanticPointerSystem;
use std::io::{self, BufRead, BufWriter, Write};

/// Run the serve command until stdin closes
pub fn run(mut system: SemanticPointerSystem) -> Result<()> {
    let config = system.config();
    tracing::info!(
        dim = config.dimensionality,
        neurons_per_pool = config.neurons_per_pool,
        "serving commands on stdin"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut handled = 0usize;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let reply = system.dispatch_json(line);
        writeln!(out, "{}", reply).context("failed to write response")?;
        out.flush().context("failed to flush stdout")?;
        handled += 1;
    }

    tracing::info!(handled, "stdin closed");
    Ok(())
}
