//! Conversion of raw trade rows into canonical option trades.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use ledger::model::{trade_id, CanonicalTrade, StrategyTag};
use tracing::{debug, warn};

use crate::symbol::decode_option_symbol;
use crate::types::ParsedTradeRow;

/// What to do with a row whose date/time cannot be parsed. The historical
/// behavior fabricates "now"; rejecting the row is the stricter choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFallback {
    #[default]
    NowWithWarning,
    RejectRow,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    pub timestamp_fallback: TimestampFallback,
}

/// Normalizes raw rows into canonical trades for one account, in source
/// order.
///
/// Non-option rows are skipped. A row whose open/close code contains `C`
/// closes the matching open trade earlier in the statement instead of
/// producing a new record; a close without an in-statement open becomes a
/// standalone closed record for the merger to match against stored
/// positions.
pub fn normalize_trades(
    rows: &[ParsedTradeRow],
    account_id: &str,
    options: &NormalizeOptions,
    now: NaiveDateTime,
) -> (Vec<CanonicalTrade>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut trades: Vec<CanonicalTrade> = Vec::new();

    for row in rows {
        if !row.asset_category.contains("Option") {
            debug!(symbol = %row.symbol, category = %row.asset_category, "non-option row skipped");
            continue;
        }

        let Some(contract) = decode_option_symbol(&row.symbol) else {
            let msg = format!("option symbol failed the grammar, row dropped: {}", row.symbol);
            warn!("{msg}");
            warnings.push(msg);
            continue;
        };

        let when = match parse_trade_datetime(&row.date_time) {
            Some(dt) => dt,
            None => match options.timestamp_fallback {
                TimestampFallback::NowWithWarning => {
                    let msg = format!(
                        "unparseable date/time '{}', defaulting to import time",
                        row.date_time
                    );
                    warn!("{msg}");
                    warnings.push(msg);
                    now
                }
                TimestampFallback::RejectRow => {
                    let msg =
                        format!("unparseable date/time '{}', row rejected", row.date_time);
                    warn!("{msg}");
                    warnings.push(msg);
                    continue;
                }
            },
        };

        if is_close_code(&row.code) {
            let open = trades.iter_mut().find(|t| {
                t.is_open()
                    && t.symbol == contract.underlying
                    && t.strike == contract.strike
                    && t.put_call == contract.put_call
                    && t.expiry == contract.expiry
            });
            if let Some(open) = open {
                open.close_date = Some(when);
                open.close_premium = Some(row.price);
                continue;
            }
        }

        let strategy = StrategyTag::from_quantity(row.quantity, contract.put_call);
        let mut trade = CanonicalTrade {
            trade_id: trade_id(
                &contract.underlying,
                contract.strike,
                contract.put_call,
                contract.expiry,
                when,
            ),
            account_id: account_id.to_string(),
            symbol: contract.underlying,
            put_call: contract.put_call,
            strike: contract.strike,
            expiry: contract.expiry,
            quantity: row.quantity,
            premium: row.price,
            open_date: when,
            close_date: None,
            close_premium: None,
            strategy,
            commission: row.commission,
            notes: None,
        };

        if is_close_code(&row.code) {
            // The open leg is not in this statement; the merger will try
            // to close a stored position with it.
            trade.close_date = Some(when);
            trade.close_premium = Some(row.price);
            trade.notes = Some("close without matching open in statement".to_string());
        }

        trades.push(trade);
    }

    (trades, warnings)
}

fn is_close_code(code: &str) -> bool {
    code.split(';').any(|c| c.trim() == "C")
}

/// Accepted date/time shapes: `"YYYY-MM-DD, HH:MM:SS"`, ISO with a `T` or
/// space separator, or a bare date (midnight).
pub fn parse_trade_datetime(s: &str) -> Option<NaiveDateTime> {
    let t = s.trim().trim_matches('"').trim();

    if let Some((date, time)) = t.split_once(',') {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(time.trim(), "%H:%M:%S").ok()?;
        return Some(NaiveDateTime::new(date, time));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(t, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}
