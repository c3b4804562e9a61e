//! Accumulation Example
//!
//! Records two noisy variables and their sum over 20 time steps, then hands
//! the history off as JSON and as an Arrow batch.
//!
//! Run with: cargo run --example accumulate

use observation_log::{logging, Derivation, ObservationLog, Schema};
use rand::Rng;

fn main() -> anyhow::Result<()> {
    logging::init();
    println!("=== Observation Log Accumulation ===\n");

    // -------------------------------------------------------------------------
    // 1. Declare the fields; the derived sum is added by the builder
    // -------------------------------------------------------------------------
    let schema = Schema::builder()
        .integer("time")
        .float("variable1")
        .float("variable2")
        .build()?;

    let mut log = ObservationLog::builder(schema)
        .derivation(Derivation::sum("derived_sum", "variable1", "variable2"))
        .build()?;

    println!("Fields: {}", log.schema().names().collect::<Vec<_>>().join(", "));

    // -------------------------------------------------------------------------
    // 2. Accumulate one row per time step
    // -------------------------------------------------------------------------
    let mut rng = rand::thread_rng();
    for t in 0..20_i64 {
        log.set("time", t)?;
        log.set("variable1", rng.gen_range(-1.0_f64..1.0))?;
        log.set("variable2", 0.1 * t as f64 + rng.gen_range(-0.5_f64..0.5))?;
        log.derive()?;
        log.record()?;
    }

    // -------------------------------------------------------------------------
    // 3. Read the history out for a plotting collaborator
    // -------------------------------------------------------------------------
    println!("\nRecorded {} rows ({:?})", log.history().len(), log.state());

    for (x, y) in log.history().series("time", "derived_sum")?.iter().take(5) {
        println!("   t={x:>4}  derived_sum={y:>8.4}");
    }

    let batch = log.history().to_record_batch()?;
    println!(
        "\nArrow batch: {} rows x {} columns",
        batch.num_rows(),
        batch.num_columns()
    );

    let json = serde_json::to_string_pretty(log.history())?;
    println!("\nFirst row as JSON:\n{}", json.lines().take(7).collect::<Vec<_>>().join("\n"));

    Ok(())
}
