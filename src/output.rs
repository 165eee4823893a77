//! CSV export of report series for charting tools

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csv::Writer;
use log::info;

use crate::dashboard::{DashboardReport, SegmentReport};
use crate::error::MetricsError;
use crate::projection::ProjectionSeries;
use crate::scenario::{CashScenario, ScenarioResult};

fn cell(series: Option<&ProjectionSeries>, period: u32) -> String {
    series
        .and_then(|s| s.value_at(period))
        .map(|v| format!("{:.2}", v))
        .unwrap_or_default()
}

fn label(labels: &[String], period: u32) -> String {
    labels.get(period as usize).cloned().unwrap_or_default()
}

/// One row per period with a column per scenario; failed scenarios stay blank
pub fn write_scenarios<W: Write>(writer: W, result: &ScenarioResult, labels: &[String]) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["period", "label", "best", "normal", "worst"])?;

    for period in 0..=result.periods {
        csv.write_record([
            period.to_string(),
            label(labels, period),
            cell(result.best.series(), period),
            cell(result.normal.series(), period),
            cell(result.worst.series(), period),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Cash balance per period for each scenario, in the order given
pub fn write_cash_scenarios<W: Write>(
    writer: W,
    scenarios: &[CashScenario],
    periods: u32,
    labels: &[String],
) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    let mut header = vec!["period".to_string(), "label".to_string()];
    header.extend(scenarios.iter().map(|s| s.scenario.as_str().to_string()));
    csv.write_record(&header)?;

    for period in 0..=periods {
        let mut row = vec![period.to_string(), label(labels, period)];
        row.extend(
            scenarios
                .iter()
                .map(|s| cell(s.cash.as_ref().ok(), period)),
        );
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// New, churned and total customers per period for every segment
pub fn write_customer_flows<W: Write>(
    writer: W,
    segments: &[SegmentReport],
    periods: u32,
    labels: &[String],
) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    let mut header = vec!["period".to_string(), "label".to_string()];
    for s in segments {
        let name = s.segment.as_str();
        header.push(format!("{}_new", name));
        header.push(format!("{}_churned", name));
        header.push(format!("{}_total", name));
    }
    csv.write_record(&header)?;

    for period in 0..=periods {
        let mut row = vec![period.to_string(), label(labels, period)];
        for s in segments {
            let flow = s.flow.as_ref().ok();
            row.push(cell(flow.map(|f| &f.new), period));
            row.push(cell(flow.map(|f| &f.churned), period));
            row.push(cell(flow.map(|f| &f.total), period));
        }
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Failures recorded in the report, one per row
pub fn write_issues<W: Write>(writer: W, issues: &[(String, &MetricsError)]) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(["source", "field", "message"])?;
    for (source, error) in issues {
        let message = error.to_string();
        csv.write_record([source.as_str(), error.field(), message.as_str()])?;
    }
    csv.flush()?;
    Ok(())
}

/// Write every report table into `dir`, returning the files written
pub fn export_report(dir: &Path, report: &DashboardReport) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let months = report.projection_months;
    let labels = &report.period_labels;

    let create = |name: &str| -> Result<(PathBuf, fs::File)> {
        let path = dir.join(name);
        let file = fs::File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        Ok((path, file))
    };

    let mut written = Vec::new();

    let (path, file) = create("revenue_scenarios.csv")?;
    write_scenarios(file, &report.revenue_scenarios, labels)?;
    written.push(path);

    let (path, file) = create("cash_scenarios.csv")?;
    write_cash_scenarios(file, &report.cash_scenarios, months, labels)?;
    written.push(path);

    if !report.segments.is_empty() {
        let (path, file) = create("customer_flows.csv")?;
        write_customer_flows(file, &report.segments, months, labels)?;
        written.push(path);
    }

    let issues = report.issues();
    if !issues.is_empty() {
        let (path, file) = create("issues.csv")?;
        write_issues(file, &issues)?;
        written.push(path);
    }

    info!("exported {} tables to {}", written.len(), dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::GrowthModel;
    use crate::scenario::{ScenarioEngine, ScenarioRates};

    #[test]
    fn test_scenario_csv_blanks_failed_scenario() {
        let result = ScenarioEngine::new()
            .run(100.0, GrowthModel::Exponential, &ScenarioRates::new(0.5, 0.0, -2.0), 2)
            .unwrap();
        let labels = vec!["2025-01".to_string(), "2025-02".to_string(), "2025-03".to_string()];

        let mut buf = Vec::new();
        write_scenarios(&mut buf, &result, &labels).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "period,label,best,normal,worst");
        assert_eq!(lines[1], "0,2025-01,100.00,100.00,");
        assert_eq!(lines[3], "2,2025-03,225.00,100.00,");
    }

    #[test]
    fn test_issues_csv() {
        let err = MetricsError::InvalidRate { field: "worst_rate", rate: -2.0 };
        let mut buf = Vec::new();
        write_issues(&mut buf, &[("revenue/Worst Case".to_string(), &err)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("revenue/Worst Case,worst_rate,"));
    }
}
