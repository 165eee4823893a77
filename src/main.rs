//! Startup Metrics CLI
//!
//! Recomputes the dashboard from an input snapshot and prints the metrics,
//! scenario projections and customer flows.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use log::info;

use startup_metrics::dashboard::DashboardReport;
use startup_metrics::inputs::{load_inputs, load_snapshot};
use startup_metrics::output::export_report;
use startup_metrics::{recompute, DashboardConfig, DashboardInputs, GrowthModel, Scenario};

#[derive(Parser, Debug)]
#[command(name = "startup_metrics", version, about = "Startup metrics and growth scenarios")]
struct Args {
    /// JSON input snapshot (defaults are used for missing fields)
    #[arg(short, long, conflicts_with = "snapshot")]
    inputs: Option<PathBuf>,

    /// Metrics snapshot CSV; the most recent row is used
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// JSON config overriding thresholds and scenario multipliers
    #[arg(long)]
    config: Option<PathBuf>,

    /// Projection horizon in months
    #[arg(short, long)]
    months: Option<u32>,

    /// Revenue growth model: fixed, linear or exponential
    #[arg(long)]
    model: Option<GrowthModel>,

    #[arg(long, allow_hyphen_values = true)]
    best_rate: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    normal_rate: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    worst_rate: Option<f64>,

    /// First projected month (YYYY-MM-DD); defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Directory to write CSV tables into
    #[arg(long)]
    csv_dir: Option<PathBuf>,
}

impl Args {
    fn load_inputs(&self) -> Result<DashboardInputs> {
        let mut inputs = match (&self.inputs, &self.snapshot) {
            (Some(path), _) => load_inputs(path)?,
            (None, Some(path)) => load_snapshot(path)?,
            (None, None) => DashboardInputs::default(),
        };

        if let Some(months) = self.months {
            inputs.projection_months = months;
        }
        if let Some(model) = self.model {
            inputs.revenue_growth.model = model;
        }
        if let Some(rate) = self.best_rate {
            inputs.revenue_growth.best_rate = rate;
        }
        if let Some(rate) = self.normal_rate {
            inputs.revenue_growth.normal_rate = rate;
        }
        if let Some(rate) = self.worst_rate {
            inputs.revenue_growth.worst_rate = rate;
        }
        inputs.start_date = self
            .start_date
            .or(inputs.start_date)
            .or_else(|| Some(Local::now().date_naive()));

        Ok(inputs)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::from_json_path(path)?,
        None => DashboardConfig::default(),
    };
    let inputs = args.load_inputs()?;

    let report = recompute(&inputs, &config).context("invalid dashboard inputs")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(dir) = &args.csv_dir {
        let files = export_report(dir, &report)?;
        for file in files {
            info!("wrote {}", file.display());
        }
    }

    Ok(())
}

fn print_report(report: &DashboardReport) {
    println!("Startup Metrics Dashboard");
    println!("=========================\n");

    let fin = &report.financial;
    println!("Financials:");
    println!("  Cash Balance:      ${:>14.2}", fin.cash_balance);
    println!("  Monthly Revenue:   ${:>14.2}", fin.monthly_revenue);
    println!("  Monthly Expenses:  ${:>14.2}", fin.monthly_expenses);
    println!("  Burn Rate:         ${:>14.2}", fin.burn_rate);
    println!("  Runway:            {:>15}", fin.runway.display());
    println!(
        "  MoM Growth:        {:>15}",
        fin.mom_growth.display_with(|v| format!("{:.1}%", v * 100.0))
    );
    println!();

    let cust = &report.customers;
    let econ = &cust.economics;
    println!("Customers:");
    println!("  ARPU:              {:>15}", cust.arpu.display());
    println!("  LTV:               {:>15}", econ.ltv.display());
    println!("  CAC:               {:>15}", econ.cac.display());
    println!(
        "  LTV/CAC:           {:>15} ({})",
        econ.ltv_cac_ratio.display(),
        econ.ltv_cac_health.map(|h| h.as_str()).unwrap_or("N/A")
    );
    println!(
        "  Churn:             {:>15}",
        cust.blended_churn.display_with(|v| format!("{:.1}%", v * 100.0))
    );
    println!("  Blended CAC:       {:>15}", cust.blended_cac.display());
    for segment in &report.segments {
        println!(
            "  {:<4} {:>6.0} customers  CAC {:>10}  LTV/CAC {:>8}  churn {}",
            segment.segment.as_str(),
            segment.total_customers,
            segment.economics.cac.display(),
            segment.economics.ltv_cac_ratio.display(),
            segment.economics.churn_health.as_str(),
        );
    }
    println!();

    println!("Scenario Burn & Runway:");
    for cash in &report.cash_scenarios {
        println!(
            "  {:<12} burn ${:>12.2}  runway {:>10}",
            cash.scenario.as_str(),
            cash.burn_rate,
            cash.runway.display()
        );
    }
    println!();

    let scenarios = &report.revenue_scenarios;
    println!(
        "Revenue Projection ({} growth, {} months):",
        scenarios.model.as_str(),
        scenarios.periods
    );
    println!(
        "{:>6} {:>8} {:>14} {:>14} {:>14} {:>14}",
        "Month", "Date", "Best", "Normal", "Worst", "Normal Cash"
    );
    println!("{}", "-".repeat(76));

    let normal_cash = report
        .cash_scenarios
        .iter()
        .find(|c| c.scenario == Scenario::Normal)
        .and_then(|c| c.cash.as_ref().ok());
    let fmt = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "N/A".to_string());

    for period in 0..=scenarios.periods {
        let value = |s: Scenario| scenarios.get(s).series().and_then(|x| x.value_at(period));
        println!(
            "{:>6} {:>8} {:>14} {:>14} {:>14} {:>14}",
            period,
            report.period_labels.get(period as usize).map(String::as_str).unwrap_or(""),
            fmt(value(Scenario::Best)),
            fmt(value(Scenario::Normal)),
            fmt(value(Scenario::Worst)),
            fmt(normal_cash.and_then(|c| c.value_at(period))),
        );
    }

    let issues = report.issues();
    if !issues.is_empty() {
        println!("\nIssues:");
        for (source, error) in issues {
            println!("  {}: {}", source, error);
        }
    }
}
