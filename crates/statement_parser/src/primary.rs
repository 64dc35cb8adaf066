//! Primary statement parser for the well-known column layout.

use std::sync::LazyLock;

use anyhow::{bail, Result};
use regex::Regex;
use tracing::warn;

use crate::layout::{
    TradeColumns, BALANCE_MARKERS, OPEN_POSITION_COLUMNS, PRIMARY_TRADE_COLUMNS,
};
use crate::line::{classify, split_fields};
use crate::types::{LineKind, ParsedAccount, ParsedPositionRow, ParsedStatement, ParsedTradeRow};

/// External account ids: one uppercase letter followed by 7 digits,
/// anywhere in the text.
static ACCOUNT_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]\d{7})\b").expect("valid account id regex"));

/// Parses account metadata, open positions and the statement balance.
/// Trade rows are produced separately by the strategy chain.
///
/// Fatal: a statement without any account id fails the whole import; every
/// other problem is a warning and the offending row is skipped.
pub fn parse_primary(raw: &str) -> Result<ParsedStatement> {
    let mut warnings = Vec::new();
    let mut account = ParsedAccount::default();
    let mut positions = Vec::new();

    for line in raw.lines() {
        match classify(line) {
            LineKind::Account => apply_account_field(&mut account, line),
            LineKind::Position => {
                if let Some(row) = parse_position_row(line, &mut warnings) {
                    positions.push(row);
                }
            }
            _ => {}
        }
    }

    if account.account_id.is_empty() {
        // The classified rows had no id; the pattern may still appear
        // elsewhere in the text.
        match ACCOUNT_ID_RE.find(raw) {
            Some(m) => account.account_id = m.as_str().to_string(),
            None => bail!("no account information found in statement"),
        }
    }

    // The balance lives in inconsistent places across statement variants,
    // so it gets its own pass over the whole text. Never null: absent
    // markers leave it at 0.
    if let Some(balance) = scan_balance(raw) {
        account.balance = balance;
    }

    Ok(ParsedStatement {
        account,
        trades: Vec::new(),
        positions,
        strategy: None,
        warnings,
    })
}

/// Trade rows in the primary layout, with their extraction warnings.
pub fn primary_trade_rows(raw: &str) -> (Vec<ParsedTradeRow>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut trades = Vec::new();

    for line in raw.lines() {
        if classify(line) != LineKind::Trade {
            continue;
        }
        if let Some(row) = parse_trade_row(line, &PRIMARY_TRADE_COLUMNS, &mut warnings) {
            trades.push(row);
        }
    }

    (trades, warnings)
}

fn apply_account_field(account: &mut ParsedAccount, line: &str) {
    let fields = split_fields(line);
    let (Some(key), Some(value)) = (fields.get(2), fields.get(3)) else {
        return;
    };
    let value = value.trim();

    match key.trim() {
        "Name" => account.name = value.to_string(),
        "Account" => {
            if let Some(m) = ACCOUNT_ID_RE.find(value) {
                account.account_id = m.as_str().to_string();
            }
        }
        "Account Type" => account.account_type = value.to_string(),
        "Base Currency" => account.currency = value.to_string(),
        _ => {}
    }
}

fn parse_position_row(line: &str, warnings: &mut Vec<String>) -> Option<ParsedPositionRow> {
    let cols = OPEN_POSITION_COLUMNS;
    let fields = split_fields(line);

    let quantity = match fields.get(cols.quantity).map(|s| parse_number(s)) {
        Some(Ok(q)) => q,
        _ => {
            // Subtotal and total rows have no quantity; not worth a warning.
            return None;
        }
    };

    let symbol = fields.get(cols.symbol)?.trim().to_string();
    if symbol.is_empty() {
        warnings.push(format!("position row without symbol skipped: {line}"));
        return None;
    }

    Some(ParsedPositionRow {
        asset_category: fields.get(cols.asset_category)?.trim().to_string(),
        currency: fields.get(cols.currency)?.trim().to_string(),
        symbol,
        quantity,
        cost_basis: optional_number(&fields, Some(cols.cost_basis)),
        value: optional_number(&fields, Some(cols.value)),
    })
}

/// Extracts one trade row by fixed column offsets. Shared by both the
/// primary and the fallback layout.
pub(crate) fn parse_trade_row(
    line: &str,
    cols: &TradeColumns,
    warnings: &mut Vec<String>,
) -> Option<ParsedTradeRow> {
    let fields = split_fields(line);

    if fields.len() <= cols.price {
        let msg = format!("short trade row skipped ({} fields): {line}", fields.len());
        warn!("{msg}");
        warnings.push(msg);
        return None;
    }

    let quantity = parse_number(&fields[cols.quantity]);
    let price = parse_number(&fields[cols.price]);
    let (quantity, price) = match (quantity, price) {
        (Ok(q), Ok(p)) => (q, p),
        _ => {
            let msg = format!("trade row with malformed numbers skipped: {line}");
            warn!("{msg}");
            warnings.push(msg);
            return None;
        }
    };

    Some(ParsedTradeRow {
        asset_category: fields[cols.asset_category].trim().to_string(),
        currency: fields[cols.currency].trim().to_string(),
        account: fields[cols.account].trim().to_string(),
        symbol: fields[cols.symbol].trim().to_string(),
        date_time: fields[cols.date_time].trim().to_string(),
        quantity,
        price,
        commission: optional_number(&fields, cols.commission),
        realized_pnl: optional_number(&fields, cols.realized_pnl),
        mtm_pnl: optional_number(&fields, cols.mtm_pnl),
        code: cols
            .code
            .and_then(|i| fields.get(i))
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    })
}

fn scan_balance(raw: &str) -> Option<f64> {
    for (marker, offset) in BALANCE_MARKERS {
        for line in raw.lines() {
            if !line.starts_with(marker) {
                continue;
            }
            let fields = split_fields(line);
            if let Some(Ok(balance)) = fields.get(offset).map(|s| parse_number(s)) {
                return Some(balance);
            }
        }
    }
    None
}

/// Numeric statement fields may carry thousands separators; `--` and empty
/// mean "no value".
pub(crate) fn parse_number(s: &str) -> Result<f64> {
    let t = s.trim();
    if t.is_empty() || t == "--" {
        bail!("empty/NA number");
    }
    let t = t.replace(',', "");
    Ok(t.parse::<f64>()?)
}

fn optional_number(fields: &[String], idx: Option<usize>) -> f64 {
    idx.and_then(|i| fields.get(i))
        .and_then(|s| parse_number(s).ok())
        .unwrap_or(0.0)
}
