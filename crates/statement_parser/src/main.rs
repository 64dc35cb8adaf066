use anyhow::Result;
use chrono::Local;
use std::{env, fs, path::PathBuf};

use statement_parser::{import_files, NormalizeOptions};

fn find_statement_files() -> Vec<PathBuf> {
    let Ok(current_dir) = env::current_dir() else {
        return Vec::new();
    };
    let Ok(entries) = fs::read_dir(&current_dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("csv"))
        .collect();
    files.sort();
    files
}

fn main() -> Result<()> {
    // Usage:
    //   statement_parser [ledger_path] [statement.csv ...]
    //
    // If no statement files are provided, imports every .csv file in the
    // current directory, in name order.
    // Defaults:
    //   ledger_path: ./ledger  (directory holding ledger.json)

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let ledger_path = args.get(1).map(|s| s.as_str()).unwrap_or("./ledger");
    let files: Vec<PathBuf> = if args.len() > 2 {
        args[2..].iter().map(PathBuf::from).collect()
    } else {
        find_statement_files()
    };

    if files.is_empty() {
        anyhow::bail!(
            "No statement files found. Provide .csv files as arguments or run in a directory containing them."
        );
    }

    println!("📖 Importing {} statement(s) into {}", files.len(), ledger_path);

    let now = Local::now().naive_local();
    let batch = import_files(ledger_path, &files, &NormalizeOptions::default(), now)?;

    for result in &batch.results {
        let s = &result.summary;
        if s.success {
            println!(
                "✓ {}: {} new, {} updated, {} skipped, {} failed ({} strategy, account {})",
                result.file,
                s.new_trades,
                s.updated_trades,
                s.skipped_trades,
                s.failed_trades,
                s.strategy.unwrap_or("no"),
                s.account_id.as_deref().unwrap_or("?")
            );
            for w in &s.warnings {
                println!("  ⚠ {w}");
            }
        } else {
            println!(
                "❌ {}: {}",
                result.file,
                s.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    println!("\n📊 Summary:");
    println!("✓ Files processed: {}", batch.files_processed);
    if batch.files_failed > 0 {
        println!("❌ Files failed: {}", batch.files_failed);
        for e in &batch.errors {
            println!("  {e}");
        }
    }
    println!("✅ Ledger written to: {}", ledger_path);

    Ok(())
}
