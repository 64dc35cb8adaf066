/// Classification of a single statement line, decided purely by its
/// literal prefix. Anything unrecognized is `Unknown` and gets skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Trade row in the well-known primary layout.
    Trade,
    /// Trade row in the narrower fallback layout.
    FallbackTrade,
    /// Account metadata row.
    Account,
    /// Open position row.
    Position,
    Unknown,
}

/// Account fields as they appear in one statement. Ephemeral: consumed by
/// the merger within the same import call.
#[derive(Debug, Clone, Default)]
pub struct ParsedAccount {
    /// External identifier, pattern one uppercase letter + 7 digits.
    pub account_id: String,
    pub name: String,
    pub account_type: String,
    pub balance: f64,
    pub currency: String,
}

/// One raw trade row, still carrying the encoded option symbol and the
/// unparsed date/time string.
#[derive(Debug, Clone)]
pub struct ParsedTradeRow {
    pub asset_category: String,
    pub currency: String,
    pub account: String,
    pub symbol: String,
    pub date_time: String,
    pub quantity: f64,
    pub price: f64,
    pub commission: f64,
    pub realized_pnl: f64,
    pub mtm_pnl: f64,
    /// Open/close code, e.g. `O`, `C` or `C;P`.
    pub code: String,
}

/// One open-position row from the statement's position section.
#[derive(Debug, Clone)]
pub struct ParsedPositionRow {
    pub asset_category: String,
    pub currency: String,
    pub symbol: String,
    pub quantity: f64,
    pub cost_basis: f64,
    pub value: f64,
}

/// Full result of parsing one statement.
#[derive(Debug)]
pub struct ParsedStatement {
    pub account: ParsedAccount,
    pub trades: Vec<ParsedTradeRow>,
    pub positions: Vec<ParsedPositionRow>,
    /// Name of the trade strategy that produced `trades`; `None` when no
    /// strategy found any.
    pub strategy: Option<&'static str>,
    /// Recoverable problems encountered along the way; rows they refer to
    /// were skipped, never aborted on.
    pub warnings: Vec<String>,
}
