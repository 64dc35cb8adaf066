use anyhow::{bail, Result};
use tracing::warn;

use crate::model::CanonicalTrade;
use crate::store::LedgerData;

/// Statistics about a trade merge operation.
#[derive(Debug, Clone, Default)]
pub struct TradeMergeStats {
    pub new_trades: usize,
    pub updated_trades: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total: usize,
}

impl TradeMergeStats {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaveKind {
    New,
    Updated,
    Skipped,
}

/// Merges canonical trades into the ledger in source order.
///
/// Each trade is matched against existing positions to decide whether it is
/// a new open, a close of an existing open position, or a duplicate
/// reimport. A failure to save a single trade is logged and excluded from
/// the counts; the remaining trades in the batch are still processed.
pub fn merge_trades(data: &mut LedgerData, incoming: Vec<CanonicalTrade>) -> TradeMergeStats {
    let mut stats = TradeMergeStats {
        total: incoming.len(),
        ..TradeMergeStats::default()
    };

    for trade in incoming {
        match save_trade(data, trade) {
            Ok(SaveKind::New) => stats.new_trades += 1,
            Ok(SaveKind::Updated) => stats.updated_trades += 1,
            Ok(SaveKind::Skipped) => stats.skipped += 1,
            Err(e) => {
                warn!("trade save failed: {e:#}");
                stats.failed += 1;
            }
        }
    }

    stats
}

fn save_trade(data: &mut LedgerData, trade: CanonicalTrade) -> Result<SaveKind> {
    // A closed trade must carry both close fields or neither.
    if trade.close_date.is_some() != trade.close_premium.is_some() {
        bail!(
            "trade {} has inconsistent close fields (date without premium or vice versa)",
            trade.trade_id
        );
    }
    if data.account(&trade.account_id).is_none() {
        bail!(
            "trade {} references unknown account '{}'",
            trade.trade_id,
            trade.account_id
        );
    }

    let key = trade.position_key();
    if let Some(existing) = data
        .trades
        .iter_mut()
        .find(|t| t.account_id == trade.account_id && t.position_key() == key)
    {
        // Same position seen before: a reimport. Merge close fields when
        // the incoming copy carries them and the stored one does not.
        if existing.is_open() && trade.close_date.is_some() {
            existing.close_date = trade.close_date;
            existing.close_premium = trade.close_premium;
            return Ok(SaveKind::Updated);
        }
        return Ok(SaveKind::Skipped);
    }

    if trade.close_date.is_some() {
        // A close whose open is not in this statement: close the matching
        // open position from an earlier import, if any.
        let contract = trade.contract_key();
        if let Some(existing) = data
            .trades
            .iter_mut()
            .find(|t| t.account_id == trade.account_id && t.is_open() && t.contract_key() == contract)
        {
            existing.close_date = trade.close_date;
            existing.close_premium = trade.close_premium;
            return Ok(SaveKind::Updated);
        }

        // Reimport of a close already merged into a stored position: the
        // incoming record's position key is built from the close time, so it
        // never matches the stored open time. Recognize it by contract and
        // close date instead of inserting a duplicate.
        if data.trades.iter().any(|t| {
            t.account_id == trade.account_id
                && t.contract_key() == contract
                && t.close_date == trade.close_date
        }) {
            return Ok(SaveKind::Skipped);
        }
    }

    data.trades.push(trade);
    Ok(SaveKind::New)
}
