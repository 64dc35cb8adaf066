use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Broker tag prepended to every normalized account id.
pub const BROKER_TAG: &str = "ib";

/// Option right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PutCall {
    Call,
    Put,
}

impl PutCall {
    pub fn code(self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

/// Strategy derived from the sign of the opening quantity and the right.
/// Fixed at normalization time; never recomputed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyTag {
    LongCall,
    LongPut,
    ShortCall,
    ShortPut,
}

impl StrategyTag {
    pub fn from_quantity(quantity: f64, put_call: PutCall) -> Self {
        match (quantity >= 0.0, put_call) {
            (true, PutCall::Call) => Self::LongCall,
            (true, PutCall::Put) => Self::LongPut,
            (false, PutCall::Call) => Self::ShortCall,
            (false, PutCall::Put) => Self::ShortPut,
        }
    }
}

/// A stored account. `account_id` is always normalized (lowercase,
/// `ib-` prefixed). On reimport only `balance` and `last_updated` change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_id: String,
    pub name: String,
    pub account_type: String,
    pub balance: f64,
    pub currency: String,
    pub created_at: NaiveDateTime,
    pub last_updated: NaiveDateTime,
}

/// The normalized, persisted representation of one option trade,
/// independent of the source statement's layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalTrade {
    pub trade_id: String,
    pub account_id: String,
    /// Underlying only, never the encoded option symbol.
    pub symbol: String,
    pub put_call: PutCall,
    pub strike: f64,
    pub expiry: NaiveDate,
    /// Signed: positive long, negative short.
    pub quantity: f64,
    pub premium: f64,
    pub open_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close_premium: Option<f64>,
    pub strategy: StrategyTag,
    pub commission: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CanonicalTrade {
    pub fn is_open(&self) -> bool {
        self.close_date.is_none()
    }

    /// Identity of the opened position. Two imports of the same statement
    /// produce the same key, which is what makes reimport idempotent.
    pub fn position_key(&self) -> String {
        format!(
            "{}|{}",
            self.contract_key(),
            self.open_date.format("%Y-%m-%d %H:%M:%S")
        )
    }

    /// Contract identity without the open date. Used to close a position
    /// that was opened by an earlier statement.
    pub fn contract_key(&self) -> String {
        format!(
            "{}|{:.4}|{}|{}",
            self.symbol,
            self.strike,
            self.put_call.code(),
            self.expiry.format("%Y-%m-%d")
        )
    }
}

/// Deterministic trade id derived from the position identity, so that
/// reimporting the same statement yields the same id.
pub fn trade_id(
    symbol: &str,
    strike: f64,
    put_call: PutCall,
    expiry: NaiveDate,
    open_date: NaiveDateTime,
) -> String {
    let key = format!(
        "{}|{:.4}|{}|{}|{}",
        symbol,
        strike,
        put_call.code(),
        expiry.format("%Y-%m-%d"),
        open_date.format("%Y-%m-%d %H:%M:%S")
    );
    format!("TRD-{}", &make_hash_id(&key)[..24])
}

fn make_hash_id(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_strategy_mapping() {
        assert_eq!(
            StrategyTag::from_quantity(1.0, PutCall::Call),
            StrategyTag::LongCall
        );
        assert_eq!(
            StrategyTag::from_quantity(2.0, PutCall::Put),
            StrategyTag::LongPut
        );
        assert_eq!(
            StrategyTag::from_quantity(-1.0, PutCall::Call),
            StrategyTag::ShortCall
        );
        assert_eq!(
            StrategyTag::from_quantity(-3.0, PutCall::Put),
            StrategyTag::ShortPut
        );
    }

    #[test]
    fn test_trade_id_is_deterministic() {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 28).unwrap();
        let open = dt("2025-03-01 10:30:00");
        let a = trade_id("AAPL", 150.5, PutCall::Call, expiry, open);
        let b = trade_id("AAPL", 150.5, PutCall::Call, expiry, open);
        assert_eq!(a, b);
        assert!(a.starts_with("TRD-"));

        let c = trade_id("AAPL", 151.0, PutCall::Call, expiry, open);
        assert_ne!(a, c);
    }

    #[test]
    fn test_position_key_includes_open_date() {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 28).unwrap();
        let trade = CanonicalTrade {
            trade_id: "TRD-x".to_string(),
            account_id: "ib-u1234567".to_string(),
            symbol: "AAPL".to_string(),
            put_call: PutCall::Call,
            strike: 150.5,
            expiry,
            quantity: 1.0,
            premium: 2.3,
            open_date: dt("2025-03-01 10:30:00"),
            close_date: None,
            close_premium: None,
            strategy: StrategyTag::LongCall,
            commission: 1.05,
            notes: None,
        };
        assert_eq!(
            trade.position_key(),
            "AAPL|150.5000|C|2025-03-28|2025-03-01 10:30:00"
        );
        assert_eq!(trade.contract_key(), "AAPL|150.5000|C|2025-03-28");
    }
}
