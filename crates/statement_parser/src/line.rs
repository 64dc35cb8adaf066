//! Line classification and quote-aware field extraction.

use crate::layout::{
    ACCOUNT_INFO_PREFIX, FALLBACK_TRADE_PREFIX, OPEN_POSITION_PREFIX, PRIMARY_TRADE_PREFIX,
};
use crate::types::LineKind;

const DELIMITER: char = ',';

/// Splits one statement line into its fields.
///
/// Quotes toggle an in-quote mode: delimiters inside quotes are literal,
/// and a doubled quote inside quotes unescapes to a single quote
/// character. The trailing field is always flushed, so every line yields
/// at least one field.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            DELIMITER if !in_quotes => {
                fields.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Classifies one line by its literal prefix. No lookahead; lines that
/// match no marker are `Unknown` and skipped without error.
pub fn classify(line: &str) -> LineKind {
    if line.starts_with(PRIMARY_TRADE_PREFIX) {
        LineKind::Trade
    } else if line.starts_with(FALLBACK_TRADE_PREFIX) {
        LineKind::FallbackTrade
    } else if line.starts_with(ACCOUNT_INFO_PREFIX) {
        LineKind::Account
    } else if line.starts_with(OPEN_POSITION_PREFIX) {
        LineKind::Position
    } else {
        LineKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_fields() {
        assert_eq!(split_fields("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_keeps_empty_fields() {
        assert_eq!(split_fields("a,,c,"), vec!["a", "", "c", ""]);
        assert_eq!(split_fields(""), vec![""]);
    }

    #[test]
    fn test_delimiter_inside_quotes_is_literal() {
        assert_eq!(
            split_fields(r#"Trades,"AAPL 28MAR25 150.5 C","2025-03-01, 10:30:00""#),
            vec!["Trades", "AAPL 28MAR25 150.5 C", "2025-03-01, 10:30:00"]
        );
    }

    #[test]
    fn test_doubled_quote_unescapes() {
        assert_eq!(
            split_fields(r#""margin ""reg-T"" account",USD"#),
            vec![r#"margin "reg-T" account"#, "USD"]
        );
    }

    #[test]
    fn test_classify_markers() {
        assert_eq!(
            classify("Trades,Data,Order,Equity and Index Options,USD"),
            LineKind::Trade
        );
        assert_eq!(
            classify("Trades,Data,Trade,Equity and Index Options,USD"),
            LineKind::FallbackTrade
        );
        assert_eq!(
            classify("Account Information,Data,Name,John Doe"),
            LineKind::Account
        );
        assert_eq!(
            classify("Open Positions,Data,Summary,Equity and Index Options"),
            LineKind::Position
        );
        assert_eq!(classify("Statement,Data,Title,Activity Statement"), LineKind::Unknown);
        assert_eq!(classify("Trades,Header,DataDiscriminator"), LineKind::Unknown);
        assert_eq!(classify(""), LineKind::Unknown);
    }
}
