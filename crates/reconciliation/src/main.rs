use anyhow::{Context, Result};
use std::{env, fs, path::Path};

use reconciliation::{reconcile, PnlRecord, DEFAULT_TOLERANCE};

fn load_records(path: &str) -> Result<Vec<PnlRecord>> {
    let txt = fs::read_to_string(Path::new(path)).with_context(|| format!("reading {path}"))?;
    let records: Vec<PnlRecord> =
        serde_json::from_str(&txt).with_context(|| format!("parsing {path}"))?;
    Ok(records)
}

fn main() -> Result<()> {
    // Usage:
    //   reconciliation <source_a.json> <source_b.json> [tolerance]
    //
    // Each input file is a JSON array of {symbol, date, pnl} records.
    // Prints the full report as JSON, with a human summary on top.

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let (Some(path_a), Some(path_b)) = (args.get(1), args.get(2)) else {
        anyhow::bail!("Usage: reconciliation <source_a.json> <source_b.json> [tolerance]");
    };
    let tolerance = match args.get(3) {
        Some(t) => t
            .parse::<f64>()
            .with_context(|| format!("invalid tolerance '{t}'"))?,
        None => DEFAULT_TOLERANCE,
    };

    let source_a = load_records(path_a)?;
    let source_b = load_records(path_b)?;

    println!(
        "📖 Reconciling {} records against {} (tolerance {})",
        source_a.len(),
        source_b.len(),
        tolerance
    );

    let report = reconcile(&source_a, &source_b, tolerance);
    let s = &report.summary;

    println!("✓ Reconciled: {}", s.count_reconciled);
    if s.count_discrepancies > 0 {
        println!(
            "❌ Discrepancies: {} ({} missing in A, {} missing in B, {} mismatched)",
            s.count_discrepancies,
            s.count_missing_source_a,
            s.count_missing_source_b,
            s.count_pnl_mismatch
        );
    }

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
