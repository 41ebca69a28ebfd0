// 📊 Rewards Aggregator - monthly breakdown and total
// Groups already-filtered transactions by month name, keeping first-seen order

use crate::model::{Customer, Transaction};
use crate::points::points;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// REPORT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPoints {
    pub month: String,
    pub points: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardsSummary {
    pub per_month: Vec<MonthlyPoints>,
    pub total: u64,
}

/// Full answer to a rewards query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardsReport {
    #[serde(rename = "Customer Details")]
    pub customer: Customer,

    #[serde(rename = "Rewards Breakdown")]
    pub breakdown: Vec<MonthlyPoints>,

    #[serde(rename = "Total Rewards")]
    pub total: u64,
}

impl RewardsReport {
    pub fn new(customer: Customer, summary: RewardsSummary) -> Self {
        RewardsReport {
            customer,
            breakdown: summary.per_month,
            total: summary.total,
        }
    }
}

// ============================================================================
// AGGREGATION
// ============================================================================

/// Upper-case English month name, e.g. "APRIL"
pub fn month_name(date: NaiveDate) -> String {
    date.format("%B").to_string().to_uppercase()
}

/// Sum points per month and overall
///
/// Months appear in the order they are first encountered in `transactions`,
/// not in calendar order. An empty slice yields an empty summary.
/// Sums saturate at `u64::MAX` instead of wrapping.
pub fn aggregate(transactions: &[Transaction]) -> RewardsSummary {
    let mut per_month: Vec<MonthlyPoints> = Vec::new();

    for tx in transactions {
        let month = month_name(tx.date);
        let earned = points(tx.amount);

        // At most twelve groups
        match per_month.iter_mut().find(|entry| entry.month == month) {
            Some(entry) => entry.points = entry.points.saturating_add(earned),
            None => per_month.push(MonthlyPoints { month, points: earned }),
        }
    }

    let total = per_month
        .iter()
        .fold(0u64, |acc, entry| acc.saturating_add(entry.points));

    RewardsSummary { per_month, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, amount: f64, y: i32, m: u32, d: u32) -> Transaction {
        Transaction {
            transaction_id: id,
            amount,
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            customer_id: 1,
        }
    }

    #[test]
    fn test_single_transaction() {
        let summary = aggregate(&[tx(1, 120.0, 2024, 4, 15)]);

        assert_eq!(summary.total, 90);
        assert_eq!(
            summary.per_month,
            vec![MonthlyPoints { month: "APRIL".to_string(), points: 90 }]
        );
    }

    #[test]
    fn test_first_seen_month_order() {
        let summary = aggregate(&[
            tx(1, 120.0, 2024, 3, 2),
            tx(2, 60.0, 2024, 1, 20),
            tx(3, 75.0, 2024, 3, 28),
        ]);

        let months: Vec<&str> = summary.per_month.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["MARCH", "JANUARY"]);
        assert_eq!(summary.per_month[0].points, 90 + 25);
        assert_eq!(summary.per_month[1].points, 10);
        assert_eq!(summary.total, 125);
    }

    #[test]
    fn test_same_month_different_years_share_a_group() {
        let summary = aggregate(&[tx(1, 60.0, 2023, 5, 1), tx(2, 60.0, 2024, 5, 1)]);

        assert_eq!(summary.per_month.len(), 1);
        assert_eq!(summary.per_month[0].month, "MAY");
        assert_eq!(summary.total, 20);
    }

    #[test]
    fn test_month_with_zero_points_is_kept() {
        let summary = aggregate(&[tx(1, 30.0, 2024, 2, 1), tx(2, 100.0, 2024, 6, 1)]);

        assert_eq!(summary.per_month[0], MonthlyPoints { month: "FEBRUARY".to_string(), points: 0 });
        assert_eq!(summary.total, 50);
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let summary = aggregate(&[
            tx(1, 1e19, 2024, 4, 1),
            tx(2, 1e19, 2024, 4, 1),
            tx(3, 1e19, 2024, 5, 1),
        ]);

        assert_eq!(summary.per_month[0].points, u64::MAX);
        assert_eq!(summary.per_month[1].points, u64::MAX);
        assert_eq!(summary.total, u64::MAX);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(aggregate(&[]), RewardsSummary::default());
    }

    #[test]
    fn test_report_json_keys() {
        let customer = Customer {
            customer_id: 1,
            customer_name: "Sam".to_string(),
            transactions: vec![tx(1, 120.0, 2024, 4, 15)],
        };
        let report = RewardsReport::new(customer.clone(), aggregate(&customer.transactions));

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["Customer Details"]["customerName"], "Sam");
        assert_eq!(json["Rewards Breakdown"][0]["month"], "APRIL");
        assert_eq!(json["Rewards Breakdown"][0]["points"], 90);
        assert_eq!(json["Total Rewards"], 90);
    }
}
