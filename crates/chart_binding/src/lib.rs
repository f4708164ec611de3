//! Maps a generated series to a renderable chart configuration.
//!
//! The binding produces the full dataset/axis description; the actual
//! drawing happens outside the boundary. Rebinding always builds a fresh
//! config, so stale datasets can never accumulate across period changes.

use serde::Serialize;

use models::{CashSeries, DemoSettings};

const INCOME_COLOR: &str = "#22C55E";
const EXPENSE_COLOR: &str = "#EF4444";
const CASH_COLOR: &str = "#3B82F6";
const PROJECTION_COLOR: &str = "#6B7280";

/// Headroom multiplier on the primary axis so the tallest bar never clips.
const AXIS_HEADROOM: f64 = 1.1;

/// Which rendition of the chart is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartVariant {
    /// The hero chart: four datasets, no legend.
    Full,
    /// The compact chart inside the AI modal: no projection line, legend shown.
    Mini,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub label: String,
    pub kind: SeriesKind,
    /// One slot per chart label; `None` renders as a gap.
    pub data: Vec<Option<f64>>,
    pub color: String,
    pub axis: AxisSide,
    pub dashed: bool,
    pub point_radius: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axes {
    /// `AXIS_HEADROOM` times the tallest income or expense bar.
    pub primary_max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub axes: Axes,
    pub show_legend: bool,
}

/// Builds a chart configuration from a cash series. The config fully
/// replaces whatever was bound before.
pub fn bind(series: &CashSeries, variant: ChartVariant, settings: &DemoSettings) -> ChartConfig {
    let labels: Vec<String> = series.points.iter().map(|p| p.label.clone()).collect();

    let point_radius = match variant {
        ChartVariant::Full => 6,
        ChartVariant::Mini => 4,
    };

    let mut datasets = vec![
        Dataset {
            label: "Total Income".to_string(),
            kind: SeriesKind::Bar,
            data: series.points.iter().map(|p| Some(p.income)).collect(),
            color: INCOME_COLOR.to_string(),
            axis: AxisSide::Primary,
            dashed: false,
            point_radius: 0,
        },
        Dataset {
            label: "Total Expenses".to_string(),
            kind: SeriesKind::Bar,
            data: series.points.iter().map(|p| Some(p.expense)).collect(),
            color: EXPENSE_COLOR.to_string(),
            axis: AxisSide::Primary,
            dashed: false,
            point_radius: 0,
        },
        Dataset {
            label: "Cash on Hand".to_string(),
            kind: SeriesKind::Line,
            data: series.points.iter().map(|p| Some(p.cash_on_hand)).collect(),
            color: CASH_COLOR.to_string(),
            axis: AxisSide::Secondary,
            dashed: false,
            point_radius,
        },
    ];

    if variant == ChartVariant::Full {
        datasets.push(Dataset {
            label: format!("{} Projections", settings.home_bank),
            kind: SeriesKind::Line,
            data: series.points.iter().map(|p| p.projection).collect(),
            color: PROJECTION_COLOR.to_string(),
            axis: AxisSide::Secondary,
            dashed: true,
            point_radius: 4,
        });
    }

    ChartConfig {
        labels,
        datasets,
        axes: Axes {
            primary_max: primary_axis_max(series),
        },
        show_legend: variant == ChartVariant::Mini,
    }
}

/// Recomputed on every rebind so the tallest bar keeps its headroom.
fn primary_axis_max(series: &CashSeries) -> f64 {
    let tallest = series
        .points
        .iter()
        .flat_map(|p| [p.income, p.expense])
        .fold(0.0, f64::max);
    tallest * AXIS_HEADROOM
}

/// Axis tick format: whole thousands, e.g. `$85K`.
pub fn format_axis_tick(value: f64) -> String {
    format!("${:.0}K", value / 1000.0)
}

/// Tooltip/summary format: grouped dollars, e.g. `$1,234,567`.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let whole = value.abs().round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// The figures shown under the chart for the bound period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryValues {
    pub beginning_cash: f64,
    pub total_income: f64,
    pub total_expenses: f64,
    pub ending_cash: f64,
}

pub fn summarize(series: &CashSeries) -> SummaryValues {
    SummaryValues {
        beginning_cash: series.beginning_cash(),
        total_income: series.total_income(),
        total_expenses: series.total_expenses(),
        ending_cash: series.ending_cash(),
    }
}

/// The monthly-averages block. Cash start/end are fixed display figures
/// from settings; income/expenses are averaged from the series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAverages {
    pub avg_cash_start: f64,
    pub avg_income: f64,
    pub avg_expenses: f64,
    pub avg_cash_end: f64,
}

pub fn monthly_averages(series: &CashSeries, settings: &DemoSettings) -> MonthlyAverages {
    MonthlyAverages {
        avg_cash_start: settings.average_cash_start,
        avg_income: series.average_income().round(),
        avg_expenses: series.average_expenses().round(),
        avg_cash_end: settings.average_cash_end,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::CashPoint;

    fn sample_series() -> CashSeries {
        CashSeries {
            starting_cash: 84849.0,
            points: vec![
                CashPoint {
                    label: "Aug".to_string(),
                    income: 70000.0,
                    expense: 95000.0,
                    cash_on_hand: 59849.0,
                    projection: None,
                },
                CashPoint {
                    label: "Sep".to_string(),
                    income: 69500.0,
                    expense: 121000.0,
                    cash_on_hand: 8349.0,
                    projection: Some(10000.0),
                },
            ],
        }
    }

    #[test]
    fn test_primary_axis_headroom() {
        let config = bind(
            &sample_series(),
            ChartVariant::Full,
            &DemoSettings::default(),
        );
        // Tallest bar is the September expense spike.
        assert!((config.axes.primary_max - 121000.0 * 1.1).abs() < 1e-6);
    }

    #[test]
    fn test_full_variant_datasets() {
        let settings = DemoSettings::default();
        let config = bind(&sample_series(), ChartVariant::Full, &settings);
        assert_eq!(config.datasets.len(), 4);
        assert!(!config.show_legend);

        let labels: Vec<&str> = config.datasets.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "Total Income",
                "Total Expenses",
                "Cash on Hand",
                "PNC Bank Projections"
            ]
        );

        // Projection gaps carry through as None
        let projections = &config.datasets[3];
        assert!(projections.dashed);
        assert_eq!(projections.data, vec![None, Some(10000.0)]);
    }

    #[test]
    fn test_mini_variant_drops_projections() {
        let config = bind(
            &sample_series(),
            ChartVariant::Mini,
            &DemoSettings::default(),
        );
        assert_eq!(config.datasets.len(), 3);
        assert!(config.show_legend);
        assert!(config.datasets.iter().all(|d| !d.dashed));
    }

    #[test]
    fn test_rebind_replaces_datasets() {
        let settings = DemoSettings::default();
        let first = bind(&sample_series(), ChartVariant::Full, &settings);
        let second = bind(&sample_series(), ChartVariant::Full, &settings);
        // A rebind never accumulates series from the previous config.
        assert_eq!(first.datasets.len(), second.datasets.len());
    }

    #[test]
    fn test_axis_tick_format() {
        assert_eq!(format_axis_tick(85000.0), "$85K");
        assert_eq!(format_axis_tick(133100.0), "$133K");
        assert_eq!(format_axis_tick(0.0), "$0K");
    }

    #[test]
    fn test_currency_format() {
        assert_eq!(format_currency(1234567.0), "$1,234,567");
        assert_eq!(format_currency(87650.0), "$87,650");
        assert_eq!(format_currency(950.0), "$950");
        assert_eq!(format_currency(-4200.0), "-$4,200");
    }

    #[test]
    fn test_summary_values() {
        let summary = summarize(&sample_series());
        assert_eq!(summary.beginning_cash, 84849.0);
        assert_eq!(summary.total_income, 139500.0);
        assert_eq!(summary.total_expenses, 216000.0);
        assert_eq!(summary.ending_cash, 8349.0);
    }

    #[test]
    fn test_monthly_averages() {
        let averages = monthly_averages(&sample_series(), &DemoSettings::default());
        assert_eq!(averages.avg_income, 69750.0);
        assert_eq!(averages.avg_expenses, 108000.0);
        assert_eq!(averages.avg_cash_start, 104084.0);
        assert_eq!(averages.avg_cash_end, 103068.0);
    }
}
