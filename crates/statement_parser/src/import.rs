//! Statement import orchestration: parse, normalize, merge, persist.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDateTime;
use ledger::{
    merge_trades, read_ledger, upsert_account, write_ledger, AccountPatch, LedgerData,
};
use serde::Serialize;
use tracing::warn;

use crate::normalize::{normalize_trades, NormalizeOptions};
use crate::parse_statement;

/// Result of importing one statement. Expected malformed input never
/// surfaces as an error value; callers always get explicit flags and
/// counts plus the accumulated warnings.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<&'static str>,
    pub new_trades: usize,
    pub updated_trades: usize,
    pub skipped_trades: usize,
    pub failed_trades: usize,
    pub warnings: Vec<String>,
}

impl ImportSummary {
    fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            account_id: None,
            strategy: None,
            new_trades: 0,
            updated_trades: 0,
            skipped_trades: 0,
            failed_trades: 0,
            warnings: Vec::new(),
        }
    }
}

/// Imports one statement into the in-memory ledger.
///
/// Fatal statement errors (no account information) leave `data` untouched
/// and come back as `success = false` with a message; row-level problems
/// are warnings on the summary.
pub fn import_statement(
    data: &mut LedgerData,
    raw: &str,
    options: &NormalizeOptions,
    now: NaiveDateTime,
) -> ImportSummary {
    let statement = match parse_statement(raw) {
        Ok(statement) => statement,
        Err(e) => return ImportSummary::failure(format!("{e:#}")),
    };
    let mut warnings = statement.warnings;

    let patch = AccountPatch {
        account_id_raw: statement.account.account_id,
        name: statement.account.name,
        account_type: statement.account.account_type,
        balance: statement.account.balance,
        currency: statement.account.currency,
    };
    let (account_id, _) = upsert_account(data, &patch, now);

    let (trades, normalize_warnings) =
        normalize_trades(&statement.trades, &account_id, options, now);
    warnings.extend(normalize_warnings);

    let stats = merge_trades(data, trades);

    ImportSummary {
        success: true,
        error: None,
        account_id: Some(account_id),
        strategy: statement.strategy,
        new_trades: stats.new_trades,
        updated_trades: stats.updated_trades,
        skipped_trades: stats.skipped,
        failed_trades: stats.failed,
        warnings,
    }
}

/// Per-file entry in a batch result.
#[derive(Debug, Serialize)]
pub struct FileImport {
    pub file: String,
    pub summary: ImportSummary,
}

/// Result of a multi-file import. One statement's fatal error lands in
/// `errors` while the remaining files are still processed, in caller
/// order.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub files_processed: usize,
    pub files_failed: usize,
    pub results: Vec<FileImport>,
    pub errors: Vec<String>,
}

/// Imports a batch of statement files sequentially against the ledger at
/// `ledger_path`. The ledger is read once up front and written once after
/// the batch; trades persist in the order encountered.
pub fn import_files<P: AsRef<Path>>(
    ledger_path: P,
    files: &[PathBuf],
    options: &NormalizeOptions,
    now: NaiveDateTime,
) -> Result<BatchSummary> {
    let mut data = read_ledger(&ledger_path)?;
    let mut batch = BatchSummary::default();

    for file in files {
        let name = file.display().to_string();
        let raw = match std::fs::read_to_string(file) {
            Ok(raw) => raw,
            Err(e) => {
                let msg = format!("{name}: cannot read file: {e}");
                warn!("{msg}");
                batch.errors.push(msg);
                batch.files_failed += 1;
                continue;
            }
        };

        let summary = import_statement(&mut data, &raw, options, now);
        if summary.success {
            batch.files_processed += 1;
        } else {
            let msg = format!(
                "{name}: {}",
                summary.error.as_deref().unwrap_or("unknown error")
            );
            warn!("{msg}");
            batch.errors.push(msg);
            batch.files_failed += 1;
        }
        batch.results.push(FileImport {
            file: name,
            summary,
        });
    }

    write_ledger(&ledger_path, &data)?;
    Ok(batch)
}
