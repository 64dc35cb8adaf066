//! Decoding of encoded option symbols like `AAPL 28MAR25 150.5 C`.

use std::sync::LazyLock;

use chrono::NaiveDate;
use ledger::PutCall;
use regex::Regex;
use tracing::warn;

static OPTION_SYMBOL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]+)\s+(\d{2})([A-Z]{3})(\d{2})\s+(\d+\.?\d*)\s+([CP])$")
        .expect("valid option symbol regex")
});

/// Contract parameters decoded from an encoded option symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionContract {
    pub underlying: String,
    pub expiry: NaiveDate,
    pub strike: f64,
    pub put_call: PutCall,
}

/// Cheap shape check: does the symbol end in a right letter? Used by the
/// fallback parser to keep candidate rows before applying the full grammar.
pub fn looks_like_option_symbol(symbol: &str) -> bool {
    matches!(symbol.trim().split_whitespace().last(), Some("C") | Some("P"))
}

/// Applies the option-symbol grammar
/// `<UNDERLYING> <DD><MMM><YY> <STRIKE> <C|P>`. Returns `None` when the
/// symbol does not match or encodes an impossible date.
pub fn decode_option_symbol(symbol: &str) -> Option<OptionContract> {
    let caps = OPTION_SYMBOL_RE.captures(symbol.trim())?;

    let underlying = caps.get(1)?.as_str().to_string();
    let day: u32 = caps.get(2)?.as_str().parse().ok()?;
    let month = month_number(caps.get(3)?.as_str());
    let year: i32 = 2000 + caps.get(4)?.as_str().parse::<i32>().ok()?;
    let strike: f64 = caps.get(5)?.as_str().parse().ok()?;
    let put_call = match caps.get(6)?.as_str() {
        "C" => PutCall::Call,
        _ => PutCall::Put,
    };

    let expiry = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(OptionContract {
        underlying,
        expiry,
        strike,
        put_call,
    })
}

/// Fixed month-abbreviation lookup. An unrecognized abbreviation keeps the
/// historical default of the first month, but loudly.
fn month_number(abbr: &str) -> u32 {
    match abbr {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        other => {
            warn!(month = other, "unrecognized month abbreviation, defaulting to January");
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_call() {
        let c = decode_option_symbol("AAPL 28MAR25 150.5 C").unwrap();
        assert_eq!(c.underlying, "AAPL");
        assert_eq!(c.expiry, NaiveDate::from_ymd_opt(2025, 3, 28).unwrap());
        assert_eq!(c.strike, 150.5);
        assert_eq!(c.put_call, PutCall::Call);
    }

    #[test]
    fn test_decodes_put_with_integer_strike() {
        let c = decode_option_symbol("TSLA 17JAN25 200 P").unwrap();
        assert_eq!(c.underlying, "TSLA");
        assert_eq!(c.expiry, NaiveDate::from_ymd_opt(2025, 1, 17).unwrap());
        assert_eq!(c.strike, 200.0);
        assert_eq!(c.put_call, PutCall::Put);
    }

    #[test]
    fn test_rejects_non_option_symbols() {
        assert!(decode_option_symbol("AAPL").is_none());
        assert!(decode_option_symbol("AAPL 28MAR25 150.5 X").is_none());
        assert!(decode_option_symbol("aapl 28mar25 150.5 c").is_none());
        // Impossible calendar date.
        assert!(decode_option_symbol("AAPL 31FEB25 150.5 C").is_none());
    }

    #[test]
    fn test_unknown_month_defaults_to_january() {
        let c = decode_option_symbol("AAPL 15XXX25 10 C").unwrap();
        assert_eq!(c.expiry, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    }

    #[test]
    fn test_symbol_shape_check() {
        assert!(looks_like_option_symbol("AAPL 28MAR25 150.5 C"));
        assert!(looks_like_option_symbol("TSLA 17JAN25 200 P"));
        assert!(!looks_like_option_symbol("AAPL"));
        assert!(!looks_like_option_symbol(""));
    }
}
