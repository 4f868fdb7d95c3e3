use chrono::NaiveDate;
use core_types::Transaction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The complete filter state of one dashboard interaction.
///
/// All criteria combine conjunctively. The row-level criteria (date range,
/// divisions, product search) are applied here; the margin threshold is
/// applied by the engine to aggregated per-product margins, not per row, so
/// that a single low-margin transaction cannot hide an otherwise healthy
/// product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Inclusive lower bound on `order_date`. `None` leaves the range open.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on `order_date`. `None` leaves the range open.
    pub end_date: Option<NaiveDate>,
    /// Divisions to keep. `None` or an empty list keeps every division.
    pub divisions: Option<Vec<String>>,
    /// Minimum aggregated per-product gross margin, as a fraction in [0, 1].
    pub min_margin: Decimal,
    /// Case-insensitive substring match against the product name.
    pub search: Option<String>,
}

impl FilterSpec {
    /// A start date after the end date can never match anything. It is user
    /// error, and the contract is an empty result set, never a crash.
    pub fn is_satisfiable(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }

    /// Applies the row-level criteria, returning the matching subset.
    pub fn filter_rows<'a>(&self, rows: &'a [Transaction]) -> Vec<&'a Transaction> {
        if !self.is_satisfiable() {
            return Vec::new();
        }
        // Lowercase the needle once, not per row.
        let needle = self.search.as_ref().map(|s| s.to_lowercase());

        rows.iter()
            .filter(|row| self.matches_dates(row))
            .filter(|row| self.matches_division(row))
            .filter(|row| match &needle {
                Some(needle) => row.product.to_lowercase().contains(needle),
                None => true,
            })
            .collect()
    }

    fn matches_dates(&self, row: &Transaction) -> bool {
        if let Some(start) = self.start_date {
            if row.order_date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if row.order_date > end {
                return false;
            }
        }
        true
    }

    fn matches_division(&self, row: &Transaction) -> bool {
        match &self.divisions {
            Some(divisions) if !divisions.is_empty() => {
                divisions.iter().any(|d| d == &row.division)
            }
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(product: &str, division: &str, day: u32) -> Transaction {
        Transaction {
            product: product.to_string(),
            division: division.to_string(),
            region: "East".to_string(),
            state: "NY".to_string(),
            city: "Albany".to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            ship_date: NaiveDate::from_ymd_opt(2024, 3, day + 1).unwrap(),
            sales: dec!(100),
            cost: dec!(60),
            gross_profit: dec!(40),
            units: 10,
        }
    }

    fn fixture() -> Vec<Transaction> {
        vec![
            row("Caramel Chews", "Chocolate", 1),
            row("Sour Worms", "Gummies", 10),
            row("Dark Truffles", "Chocolate", 20),
        ]
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let rows = fixture();
        let spec = FilterSpec {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 10),
            ..FilterSpec::default()
        };
        let kept = spec.filter_rows(&rows);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].product, "Caramel Chews");
        assert_eq!(kept[1].product, "Sour Worms");
    }

    #[test]
    fn inverted_date_range_matches_nothing() {
        let rows = fixture();
        let spec = FilterSpec {
            start_date: NaiveDate::from_ymd_opt(2024, 3, 20),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..FilterSpec::default()
        };
        assert!(spec.filter_rows(&rows).is_empty());
    }

    #[test]
    fn division_filter_keeps_listed_divisions_only() {
        let rows = fixture();
        let spec = FilterSpec {
            divisions: Some(vec!["Gummies".to_string()]),
            ..FilterSpec::default()
        };
        let kept = spec.filter_rows(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].division, "Gummies");
    }

    #[test]
    fn empty_division_list_keeps_everything() {
        let rows = fixture();
        let spec = FilterSpec {
            divisions: Some(Vec::new()),
            ..FilterSpec::default()
        };
        assert_eq!(spec.filter_rows(&rows).len(), 3);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = fixture();
        let spec = FilterSpec {
            search: Some("TRUFF".to_string()),
            ..FilterSpec::default()
        };
        let kept = spec.filter_rows(&rows);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].product, "Dark Truffles");
    }

    #[test]
    fn filtering_is_idempotent() {
        let rows = fixture();
        let spec = FilterSpec {
            divisions: Some(vec!["Chocolate".to_string()]),
            search: Some("c".to_string()),
            ..FilterSpec::default()
        };
        let once: Vec<Transaction> = spec.filter_rows(&rows).into_iter().cloned().collect();
        let twice = spec.filter_rows(&once);
        assert_eq!(once.len(), twice.len());
        assert!(once.iter().zip(twice.iter()).all(|(a, b)| a == *b));
    }
}
