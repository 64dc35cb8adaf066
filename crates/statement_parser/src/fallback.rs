//! Fallback specialized parser: lower precision layout-wise, higher recall.
//!
//! Runs only when the primary strategy found no trades. Scans for the
//! narrower `Trades,Data,Trade` prefix and keeps only rows that look like
//! options, validated against the full symbol grammar.

use tracing::warn;

use crate::layout::{FALLBACK_TRADE_COLUMNS, FALLBACK_TRADE_PREFIX};
use crate::primary::parse_trade_row;
use crate::symbol::{decode_option_symbol, looks_like_option_symbol};
use crate::types::ParsedTradeRow;

/// Trade rows in the fallback layout, with their extraction warnings.
pub fn fallback_trade_rows(raw: &str) -> (Vec<ParsedTradeRow>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut trades = Vec::new();

    for line in raw.lines() {
        if !line.starts_with(FALLBACK_TRADE_PREFIX) {
            continue;
        }
        let Some(row) = parse_trade_row(line, &FALLBACK_TRADE_COLUMNS, &mut warnings) else {
            continue;
        };

        let is_option =
            row.asset_category.contains("Option") || looks_like_option_symbol(&row.symbol);
        if !is_option {
            continue;
        }

        // Stricter than the shape check: the symbol must fully decode.
        if decode_option_symbol(&row.symbol).is_none() {
            let msg = format!("option symbol failed the grammar, row dropped: {}", row.symbol);
            warn!("{msg}");
            warnings.push(msg);
            continue;
        }

        trades.push(row);
    }

    (trades, warnings)
}
