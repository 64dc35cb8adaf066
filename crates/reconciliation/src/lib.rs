//! Cross-checking of two independently produced P/L datasets.
//!
//! Records are keyed by `(symbol, date)`; keys present on only one side
//! become missing-source discrepancies, matched pairs whose values differ
//! by more than the tolerance become mismatches, everything else is
//! reconciled. The engine is pure: it persists nothing and touches no
//! shared state.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default maximum allowed absolute difference between matched P/L values.
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// One keyed P/L record from either source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PnlRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub pnl: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscrepancyKind {
    /// Key present in source B but absent in source A.
    MissingSourceA,
    /// Key present in source A but absent in source B.
    MissingSourceB,
    /// Key present in both with values further apart than the tolerance.
    PnlMismatch,
}

/// A classified disagreement between the two sources.
#[derive(Debug, Clone, Serialize)]
pub struct Discrepancy {
    #[serde(rename = "type")]
    pub kind: DiscrepancyKind,
    pub symbol: String,
    pub date: NaiveDate,
    pub pnl_source_a: Option<f64>,
    pub pnl_source_b: Option<f64>,
    /// `pnl_source_b - pnl_source_a`; only set for mismatches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub count_source_a: usize,
    pub count_source_b: usize,
    pub count_reconciled: usize,
    /// Sum of the three discrepancy kinds.
    pub count_discrepancies: usize,
    pub count_missing_source_a: usize,
    pub count_missing_source_b: usize,
    pub count_pnl_mismatch: usize,
}

#[derive(Debug, Serialize)]
pub struct ReconciliationReport {
    pub reconciled_items: Vec<PnlRecord>,
    pub discrepancies: Vec<Discrepancy>,
    pub summary: ReconciliationSummary,
}

/// Reconciles with [`DEFAULT_TOLERANCE`].
pub fn reconcile_default(source_a: &[PnlRecord], source_b: &[PnlRecord]) -> ReconciliationReport {
    reconcile(source_a, source_b, DEFAULT_TOLERANCE)
}

/// Reconciles two keyed record collections.
///
/// A difference of exactly `tolerance` is still reconciled; only a strict
/// `abs(difference) > tolerance` is a mismatch. Empty inputs are valid.
/// Output order is deterministic: source A's input order first, then the
/// B-only keys in source B's order.
pub fn reconcile(
    source_a: &[PnlRecord],
    source_b: &[PnlRecord],
    tolerance: f64,
) -> ReconciliationReport {
    let by_key_b: HashMap<(&str, NaiveDate), f64> = source_b
        .iter()
        .map(|r| ((r.symbol.as_str(), r.date), r.pnl))
        .collect();
    let keys_a: HashSet<(&str, NaiveDate)> = source_a
        .iter()
        .map(|r| (r.symbol.as_str(), r.date))
        .collect();

    let mut reconciled_items = Vec::new();
    let mut discrepancies = Vec::new();

    for a in source_a {
        match by_key_b.get(&(a.symbol.as_str(), a.date)) {
            None => discrepancies.push(Discrepancy {
                kind: DiscrepancyKind::MissingSourceB,
                symbol: a.symbol.clone(),
                date: a.date,
                pnl_source_a: Some(a.pnl),
                pnl_source_b: None,
                difference: None,
            }),
            Some(&pnl_b) => {
                let difference = pnl_b - a.pnl;
                if difference.abs() > tolerance {
                    discrepancies.push(Discrepancy {
                        kind: DiscrepancyKind::PnlMismatch,
                        symbol: a.symbol.clone(),
                        date: a.date,
                        pnl_source_a: Some(a.pnl),
                        pnl_source_b: Some(pnl_b),
                        difference: Some(difference),
                    });
                } else {
                    reconciled_items.push(a.clone());
                }
            }
        }
    }

    for b in source_b {
        if !keys_a.contains(&(b.symbol.as_str(), b.date)) {
            discrepancies.push(Discrepancy {
                kind: DiscrepancyKind::MissingSourceA,
                symbol: b.symbol.clone(),
                date: b.date,
                pnl_source_a: None,
                pnl_source_b: Some(b.pnl),
                difference: None,
            });
        }
    }

    let count = |kind: DiscrepancyKind| discrepancies.iter().filter(|d| d.kind == kind).count();
    let summary = ReconciliationSummary {
        count_source_a: source_a.len(),
        count_source_b: source_b.len(),
        count_reconciled: reconciled_items.len(),
        count_discrepancies: discrepancies.len(),
        count_missing_source_a: count(DiscrepancyKind::MissingSourceA),
        count_missing_source_b: count(DiscrepancyKind::MissingSourceB),
        count_pnl_mismatch: count(DiscrepancyKind::PnlMismatch),
    };
    debug!(
        reconciled = summary.count_reconciled,
        discrepancies = summary.count_discrepancies,
        "reconciliation complete"
    );

    ReconciliationReport {
        reconciled_items,
        discrepancies,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(symbol: &str, date: &str, pnl: f64) -> PnlRecord {
        PnlRecord {
            symbol: symbol.to_string(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            pnl,
        }
    }

    fn sample() -> Vec<PnlRecord> {
        vec![
            rec("AAPL", "2024-01-01", 100.0),
            rec("AAPL", "2024-01-02", -50.0),
            rec("TSLA", "2024-01-01", 200.0),
        ]
    }

    #[test]
    fn test_identical_sources_fully_reconcile() {
        let report = reconcile_default(&sample(), &sample());
        assert!(report.discrepancies.is_empty());
        assert_eq!(report.reconciled_items.len(), 3);
        assert_eq!(report.summary.count_reconciled, 3);
        assert_eq!(report.summary.count_discrepancies, 0);
    }

    #[test]
    fn test_missing_in_source_a() {
        let a: Vec<PnlRecord> = sample()
            .into_iter()
            .filter(|r| r.symbol != "TSLA")
            .collect();
        let report = reconcile_default(&a, &sample());

        assert_eq!(report.discrepancies.len(), 1);
        let d = &report.discrepancies[0];
        assert_eq!(d.kind, DiscrepancyKind::MissingSourceA);
        assert_eq!(d.symbol, "TSLA");
        assert_eq!(d.pnl_source_a, None);
        assert_eq!(d.pnl_source_b, Some(200.0));
        assert_eq!(d.difference, None);
        assert_eq!(report.summary.count_missing_source_a, 1);
        assert_eq!(report.summary.count_reconciled, 2);
    }

    #[test]
    fn test_mismatch_beyond_tolerance() {
        let mut b = sample();
        b[1].pnl = -50.1;
        let report = reconcile(&sample(), &b, 0.05);

        assert_eq!(report.summary.count_pnl_mismatch, 1);
        let d = &report.discrepancies[0];
        assert_eq!(d.kind, DiscrepancyKind::PnlMismatch);
        assert_eq!(d.symbol, "AAPL");
        assert_eq!(d.pnl_source_a, Some(-50.0));
        assert_eq!(d.pnl_source_b, Some(-50.1));
        let difference = d.difference.unwrap();
        assert!((difference - (-0.1)).abs() < 1e-9);
        assert_eq!(report.summary.count_reconciled, 2);
    }

    #[test]
    fn test_difference_of_exactly_tolerance_is_reconciled() {
        let a = vec![rec("AAPL", "2024-01-01", 100.0)];
        let b = vec![rec("AAPL", "2024-01-01", 100.25)];

        let report = reconcile(&a, &b, 0.25);
        assert!(report.discrepancies.is_empty());
        assert_eq!(report.summary.count_reconciled, 1);

        let beyond = vec![rec("AAPL", "2024-01-01", 100.26)];
        let report = reconcile(&a, &beyond, 0.25);
        assert_eq!(report.summary.count_pnl_mismatch, 1);
    }

    #[test]
    fn test_empty_source_symmetry() {
        let report = reconcile_default(&[], &sample());
        assert_eq!(report.reconciled_items.len(), 0);
        assert_eq!(report.summary.count_missing_source_a, 3);
        assert_eq!(report.summary.count_discrepancies, 3);

        let report = reconcile_default(&sample(), &[]);
        assert_eq!(report.summary.count_missing_source_b, 3);
        assert!(report
            .discrepancies
            .iter()
            .all(|d| d.kind == DiscrepancyKind::MissingSourceB && d.pnl_source_b.is_none()));

        let report = reconcile_default(&[], &[]);
        assert_eq!(report.summary, ReconciliationSummary::default());
        assert!(report.reconciled_items.is_empty());
        assert!(report.discrepancies.is_empty());
    }

    #[test]
    fn test_same_symbol_different_dates_are_distinct_keys() {
        let a = vec![rec("AAPL", "2024-01-01", 100.0)];
        let b = vec![rec("AAPL", "2024-01-02", 100.0)];
        let report = reconcile_default(&a, &b);

        assert_eq!(report.summary.count_missing_source_b, 1);
        assert_eq!(report.summary.count_missing_source_a, 1);
        assert_eq!(report.summary.count_reconciled, 0);
    }

    #[test]
    fn test_discrepancy_serializes_with_type_field() {
        let a = vec![rec("AAPL", "2024-01-01", 100.0)];
        let report = reconcile_default(&a, &[]);

        let json = serde_json::to_value(&report.discrepancies[0]).unwrap();
        assert_eq!(json["type"], "MissingSourceB");
        assert!(json.get("kind").is_none());
        assert!(json.get("difference").is_none());
    }

    #[test]
    fn test_output_order_is_deterministic() {
        let a = sample();
        let mut b = sample();
        b.push(rec("NVDA", "2024-01-03", 10.0));
        b.push(rec("MSFT", "2024-01-03", 20.0));

        let report = reconcile_default(&a, &b);
        let only_b: Vec<&str> = report
            .discrepancies
            .iter()
            .map(|d| d.symbol.as_str())
            .collect();
        assert_eq!(only_b, vec!["NVDA", "MSFT"]);
        let reconciled: Vec<&str> = report
            .reconciled_items
            .iter()
            .map(|r| r.symbol.as_str())
            .collect();
        assert_eq!(reconciled, vec!["AAPL", "AAPL", "TSLA"]);
    }
}
