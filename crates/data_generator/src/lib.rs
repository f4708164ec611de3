//! Mock series generation for the dashboard.
//!
//! Nothing here touches real data: the Pulse series is a fixed monthly
//! table with a derived running cash position, and the daily view is a
//! biased random walk. All randomness comes through an injected `Rng` so
//! generation is reproducible under a seeded source.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::Rng;

use models::{CashPoint, CashSeries, DailyParams, DailyPoint, DailySeries, DemoSettings, LabelStyle, Period};

/// Fixed monthly (income, expenses) table behind the Pulse chart, Jan–Nov.
/// The November row is the projected month.
const PULSE_MONTHS: [(f64, f64); 11] = [
    (70000.0, 65000.0),
    (75000.0, 61000.0),
    (74000.0, 65500.0),
    (69000.0, 80000.0),
    (79000.0, 65000.0),
    (71000.0, 59500.0),
    (79000.0, 67000.0),
    (70000.0, 95000.0),
    (69500.0, 121000.0),
    (40000.0, 25000.0),
    (0.0, 0.0),
];

const PULSE_LABELS: [&str; 11] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
];

/// First index that carries a synthetic projection value.
const PROJECTION_START: usize = 8;

/// Spread of the projection noise around the current cash position.
const PROJECTION_NOISE: f64 = 10000.0;

/// Builds the 11-month Pulse series. Cash on hand is a running total from
/// `starting_cash`; the trailing months get a noisy projection around the
/// current position.
pub fn pulse_series<R: Rng + ?Sized>(settings: &DemoSettings, rng: &mut R) -> CashSeries {
    let mut current_cash = settings.starting_cash;
    let mut points = Vec::with_capacity(PULSE_MONTHS.len());

    for (i, (income, expenses)) in PULSE_MONTHS.iter().enumerate() {
        current_cash += income - expenses;

        let projection = if i >= PROJECTION_START {
            Some(current_cash + (rng.gen::<f64>() - 0.5) * PROJECTION_NOISE)
        } else {
            None
        };

        points.push(CashPoint {
            label: PULSE_LABELS[i].to_string(),
            income: *income,
            expense: *expenses,
            cash_on_hand: current_cash,
            projection,
        });
    }

    CashSeries {
        starting_cash: settings.starting_cash,
        points,
    }
}

/// Builds the daily balance walk for a period ending at `today`, oldest
/// point first. Weekend moves are damped and the most recent slice of the
/// window gets a flat upward boost.
pub fn daily_series<R: Rng + ?Sized>(
    period: Period,
    today: NaiveDate,
    params: &DailyParams,
    rng: &mut R,
) -> DailySeries {
    let days = period.days();
    let style = period.label_style();
    let mut value = params.base_value;
    let mut points = Vec::with_capacity(days as usize);

    for i in (0..days).rev() {
        let date = today - Duration::days(i as i64);
        let change = (rng.gen::<f64>() - 0.5) * params.volatility * 0.4;
        let factor = if is_weekend(date) {
            params.weekend_damping
        } else {
            1.0
        };
        value += change * factor;

        if (i as f64) < days as f64 * params.trend_window {
            value += params.trend_boost;
        }

        points.push(DailyPoint {
            label: format_label(date, style),
            value: value.round(),
        });
    }

    DailySeries { period, points }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn format_label(date: NaiveDate, style: LabelStyle) -> String {
    match style {
        LabelStyle::Weekday => date.format("%a").to_string(),
        LabelStyle::MonthDay => format!("{} {}", date.format("%b"), date.day()),
        LabelStyle::MonthOnly => date.format("%b").to_string(),
    }
}
