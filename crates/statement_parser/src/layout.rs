//! Column layouts and line markers of the supported export family.
//!
//! The offsets are a hard-coded contract of the known statement format,
//! not inferred from the input. Each supported layout is one table here,
//! selected by a cheap prefix match, so a new export variant means a new
//! table rather than edits scattered through the parsers.

/// Trade row in the primary layout.
pub const PRIMARY_TRADE_PREFIX: &str = "Trades,Data,Order,";
/// Trade row in the narrower fallback layout.
pub const FALLBACK_TRADE_PREFIX: &str = "Trades,Data,Trade,";
/// Account metadata rows (`...,<field name>,<field value>`).
pub const ACCOUNT_INFO_PREFIX: &str = "Account Information,Data,";
/// Open position rows.
pub const OPEN_POSITION_PREFIX: &str = "Open Positions,Data,Summary,";

/// Field offsets of one trade-row layout. Trailing statement columns not
/// listed here are ignored.
#[derive(Debug, Clone, Copy)]
pub struct TradeColumns {
    pub asset_category: usize,
    pub currency: usize,
    pub account: usize,
    pub symbol: usize,
    pub date_time: usize,
    pub quantity: usize,
    pub price: usize,
    pub commission: Option<usize>,
    pub realized_pnl: Option<usize>,
    pub mtm_pnl: Option<usize>,
    pub code: Option<usize>,
}

pub const PRIMARY_TRADE_COLUMNS: TradeColumns = TradeColumns {
    asset_category: 3,
    currency: 4,
    account: 5,
    symbol: 6,
    date_time: 7,
    quantity: 8,
    price: 9,
    commission: Some(12),
    realized_pnl: Some(14),
    mtm_pnl: Some(15),
    code: Some(16),
};

/// The fallback layout stops after the price column.
pub const FALLBACK_TRADE_COLUMNS: TradeColumns = TradeColumns {
    asset_category: 3,
    currency: 4,
    account: 5,
    symbol: 6,
    date_time: 7,
    quantity: 8,
    price: 9,
    commission: None,
    realized_pnl: None,
    mtm_pnl: None,
    code: None,
};

/// Field offsets of an open-position row.
#[derive(Debug, Clone, Copy)]
pub struct PositionColumns {
    pub asset_category: usize,
    pub currency: usize,
    pub symbol: usize,
    pub quantity: usize,
    pub cost_basis: usize,
    pub value: usize,
}

pub const OPEN_POSITION_COLUMNS: PositionColumns = PositionColumns {
    asset_category: 3,
    currency: 4,
    symbol: 5,
    quantity: 6,
    cost_basis: 9,
    value: 11,
};

/// Balance markers, scanned over the whole text independently of row
/// classification because statements place the balance inconsistently.
/// Ordered by priority: the first marker that yields a number wins.
pub const BALANCE_MARKERS: [(&str, usize); 2] = [
    ("Net Asset Value,Data,Total,", 4),
    ("Cash Report,Data,Ending Cash,Base Currency Summary,", 4),
];
