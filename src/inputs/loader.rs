//! Load input snapshots from JSON files or exported metrics CSV

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use csv::Reader;
use log::debug;

use super::{CustomerInputs, DashboardInputs, FinancialInputs, Segment, SegmentInputs};
use crate::metrics::{blended_cac, weighted_average};

/// Raw CSV row of a metrics snapshot export
///
/// Churn columns are percentages as typed into the form (2.0 = 2%).
/// CAC columns are per-customer costs.
#[derive(Debug, serde::Deserialize)]
struct SnapshotRow {
    #[serde(default)]
    date: Option<NaiveDate>,
    cash_balance: f64,
    monthly_revenue: f64,
    monthly_expenses: f64,
    b2b_total: f64,
    b2b_new: f64,
    b2b_cac: f64,
    b2b_churn_rate: f64,
    b2c_total: f64,
    b2c_new: f64,
    b2c_cac: f64,
    b2c_churn_rate: f64,
}

impl SnapshotRow {
    fn into_inputs(self) -> DashboardInputs {
        let total_customers = self.b2b_total + self.b2c_total;
        let arpc = if total_customers > 0.0 {
            self.monthly_revenue / total_customers
        } else {
            0.0
        };

        let segment = |segment, total: f64, new: f64, cac: f64, churn_pct: f64| SegmentInputs {
            segment,
            total_customers: total,
            customers: CustomerInputs {
                new_customers_per_month: new,
                churn_rate: churn_pct / 100.0,
                acquisition_cost: cac * new,
                average_revenue_per_customer: arpc,
            },
            acquisition_growth: Default::default(),
        };

        let segments = vec![
            segment(Segment::B2B, self.b2b_total, self.b2b_new, self.b2b_cac, self.b2b_churn_rate),
            segment(Segment::B2C, self.b2c_total, self.b2c_new, self.b2c_cac, self.b2c_churn_rate),
        ];
        let customers = blend_segments(&segments, arpc);

        DashboardInputs {
            financial: FinancialInputs {
                cash_balance: self.cash_balance,
                monthly_revenue: self.monthly_revenue,
                monthly_expenses: self.monthly_expenses,
            },
            previous_revenue: None,
            customers,
            segments,
            start_date: self.date,
            ..Default::default()
        }
    }
}

/// Combine segments into one customer base
///
/// Churn and CAC are weighted by segment size. Acquisition spend is set so
/// that spend / new customers reproduces the blended CAC.
pub fn blend_segments(segments: &[SegmentInputs], average_revenue_per_customer: f64) -> CustomerInputs {
    let churn_pairs: Vec<(f64, f64)> = segments
        .iter()
        .map(|s| (s.customers.churn_rate, s.total_customers))
        .collect();
    let new_customers: f64 = segments.iter().map(|s| s.customers.new_customers_per_month).sum();
    let acquisition_cost = match blended_cac(segments) {
        Ok(cac) => cac * new_customers,
        Err(_) => segments.iter().map(|s| s.customers.acquisition_cost).sum(),
    };

    CustomerInputs {
        new_customers_per_month: new_customers,
        // An empty customer base has no observable churn
        churn_rate: weighted_average(&churn_pairs).unwrap_or(0.0),
        acquisition_cost,
        average_revenue_per_customer,
    }
}

/// Load a JSON input snapshot from a file
pub fn load_inputs<P: AsRef<Path>>(path: P) -> Result<DashboardInputs> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening inputs {}", path.display()))?;
    load_inputs_from_reader(file).with_context(|| format!("parsing inputs {}", path.display()))
}

/// Load a JSON input snapshot from any reader
pub fn load_inputs_from_reader<R: Read>(reader: R) -> Result<DashboardInputs> {
    let inputs: DashboardInputs = serde_json::from_reader(reader)?;
    Ok(inputs)
}

/// Load the most recent row of a metrics snapshot CSV
///
/// Rows are ordered by their `date` column when present; otherwise the
/// last row wins.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<DashboardInputs> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening snapshot {}", path.display()))?;
    load_snapshot_from_reader(file).with_context(|| format!("reading snapshot {}", path.display()))
}

pub fn load_snapshot_from_reader<R: Read>(reader: R) -> Result<DashboardInputs> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut latest: Option<SnapshotRow> = None;
    let mut rows = 0usize;

    for result in csv_reader.deserialize() {
        let row: SnapshotRow = result?;
        rows += 1;
        let replace = match &latest {
            None => true,
            Some(current) => match (current.date, row.date) {
                (Some(a), Some(b)) => b >= a,
                _ => true,
            },
        };
        if replace {
            latest = Some(row);
        }
    }

    debug!("read {} snapshot rows", rows);
    latest
        .map(SnapshotRow::into_inputs)
        .ok_or_else(|| anyhow!("snapshot contains no rows"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SNAPSHOT: &str = "\
date,cash_balance,monthly_revenue,monthly_expenses,b2b_total,b2b_new,b2b_cac,b2b_churn_rate,b2c_total,b2c_new,b2c_cac,b2c_churn_rate
2024-03-01,90000,12000,21000,22,4,550,2.0,85,12,45,4.0
2024-01-01,100000,10000,20000,20,5,500,2.0,80,15,50,5.0
";

    #[test]
    fn test_snapshot_picks_latest_date() {
        let inputs = load_snapshot_from_reader(SNAPSHOT.as_bytes()).unwrap();
        assert_eq!(inputs.financial.cash_balance, 90_000.0);
        assert_eq!(inputs.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(inputs.segments.len(), 2);

        let b2b = &inputs.segments[0];
        assert_eq!(b2b.segment, Segment::B2B);
        assert_relative_eq!(b2b.customers.churn_rate, 0.02);
        assert_relative_eq!(b2b.customers.acquisition_cost, 2_200.0);
    }

    #[test]
    fn test_snapshot_blends_segments() {
        let inputs = load_snapshot_from_reader(SNAPSHOT.as_bytes()).unwrap();
        assert_relative_eq!(inputs.customers.new_customers_per_month, 16.0);
        let blended = (550.0 * 22.0 + 45.0 * 85.0) / 107.0;
        assert_relative_eq!(
            inputs.customers.acquisition_cost / inputs.customers.new_customers_per_month,
            blended,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            inputs.customers.churn_rate,
            (0.02 * 22.0 + 0.04 * 85.0) / 107.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(inputs.customers.average_revenue_per_customer, 12_000.0 / 107.0);
        assert!(inputs.validate(120).is_ok());
    }

    #[test]
    fn test_snapshot_cac_blended_by_segment_size() {
        let row = "\
cash_balance,monthly_revenue,monthly_expenses,b2b_total,b2b_new,b2b_cac,b2b_churn_rate,b2c_total,b2c_new,b2c_cac,b2c_churn_rate
100000,10000,20000,20,5,500,2.0,80,15,50,5.0
";
        let inputs = load_snapshot_from_reader(row.as_bytes()).unwrap();
        let customers = &inputs.customers;
        assert_relative_eq!(
            customers.acquisition_cost / customers.new_customers_per_month,
            140.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_empty_snapshot_is_an_error() {
        let header = "cash_balance,monthly_revenue,monthly_expenses,b2b_total,b2b_new,b2b_cac,b2b_churn_rate,b2c_total,b2c_new,b2c_cac,b2c_churn_rate\n";
        assert!(load_snapshot_from_reader(header.as_bytes()).is_err());
    }

    #[test]
    fn test_json_inputs() {
        let json = r#"{"revenue_growth": {"model": "Linear", "best_rate": 500.0}}"#;
        let inputs = load_inputs_from_reader(json.as_bytes()).unwrap();
        assert_eq!(inputs.revenue_growth.best_rate, 500.0);
        assert_eq!(inputs.revenue_growth.normal_rate, 0.10);
    }
}
