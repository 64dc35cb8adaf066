pub mod accounts;
pub mod model;
pub mod positions;
pub mod store;

// Re-export commonly used items
pub use crate::accounts::{normalize_account_id, upsert_account, AccountPatch, UpsertOutcome};
pub use crate::model::{Account, CanonicalTrade, PutCall, StrategyTag};
pub use crate::positions::{merge_trades, TradeMergeStats};
pub use crate::store::{ensure_ledger_exists, read_ledger, write_ledger, LedgerData};
