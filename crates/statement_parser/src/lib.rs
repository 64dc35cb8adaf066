pub mod fallback;
pub mod import;
pub mod layout;
pub mod line;
pub mod normalize;
pub mod primary;
pub mod symbol;
pub mod types;

// Re-export commonly used items
pub use crate::import::{import_files, import_statement, BatchSummary, ImportSummary};
pub use crate::normalize::{normalize_trades, NormalizeOptions, TimestampFallback};
pub use crate::types::{ParsedAccount, ParsedStatement, ParsedTradeRow};

use anyhow::Result;
use tracing::info;

type TradeStrategyFn = fn(&str) -> (Vec<ParsedTradeRow>, Vec<String>);

/// Ordered trade-extraction strategies. The orchestrator runs them in
/// order and takes the first non-empty result; the row count is the
/// strategy's confidence.
const TRADE_STRATEGIES: [(&str, TradeStrategyFn); 2] = [
    ("primary", primary::primary_trade_rows),
    ("fallback", fallback::fallback_trade_rows),
];

/// Parses one whole statement text.
///
/// Account metadata, open positions and the balance always come from the
/// primary pass; trade rows come from the first strategy in
/// [`TRADE_STRATEGIES`] that yields any. Fatal only when no account
/// information exists at all.
pub fn parse_statement(raw: &str) -> Result<ParsedStatement> {
    let mut statement = primary::parse_primary(raw)?;

    for (name, extract) in TRADE_STRATEGIES {
        let (trades, warnings) = extract(raw);
        statement.warnings.extend(warnings);
        if !trades.is_empty() {
            info!(strategy = name, trades = trades.len(), "trade rows extracted");
            statement.trades = trades;
            statement.strategy = Some(name);
            break;
        }
    }

    Ok(statement)
}
