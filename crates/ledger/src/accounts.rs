use chrono::NaiveDateTime;
use tracing::debug;

use crate::model::{Account, BROKER_TAG};
use crate::store::LedgerData;

/// Normalizes an external account id to its stored form: lowercase with the
/// broker tag prefixed. Idempotent: normalizing an already-normalized id is
/// a no-op.
pub fn normalize_account_id(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    if lower.starts_with(&format!("{}-", BROKER_TAG)) {
        lower
    } else {
        format!("{}-{}", BROKER_TAG, lower)
    }
}

/// Account fields carried by a parsed statement.
#[derive(Debug, Clone)]
pub struct AccountPatch {
    /// External identifier as it appears in the statement, e.g. `U1234567`.
    pub account_id_raw: String,
    pub name: String,
    pub account_type: String,
    pub balance: f64,
    pub currency: String,
}

/// Result of applying an [`AccountPatch`] to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Create-or-update by normalized id. An existing account only gets its
/// balance and `last_updated` refreshed; name and type are never
/// overwritten by a later statement.
pub fn upsert_account(
    data: &mut LedgerData,
    patch: &AccountPatch,
    now: NaiveDateTime,
) -> (String, UpsertOutcome) {
    let account_id = normalize_account_id(&patch.account_id_raw);

    if let Some(existing) = data.account_mut(&account_id) {
        existing.balance = patch.balance;
        existing.last_updated = now;
        debug!(%account_id, balance = patch.balance, "account updated");
        return (account_id, UpsertOutcome::Updated);
    }

    data.accounts.push(Account {
        account_id: account_id.clone(),
        name: patch.name.clone(),
        account_type: patch.account_type.clone(),
        balance: patch.balance,
        currency: patch.currency.clone(),
        created_at: now,
        last_updated: now,
    });
    debug!(%account_id, "account created");
    (account_id, UpsertOutcome::Created)
}
