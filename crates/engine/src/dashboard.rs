//! Dashboard aggregation.
//!
//! Everything is recomputed from the full expense set on each call, relative
//! to a reference `today`. Windows:
//!
//! - current period: `[today - 180d, ..)`
//! - previous period: `[today - 365d, today - 180d)`
//! - this month: `[first of today's month, ..)`
//! - last month: `[first of previous month, first of today's month)`
//!
//! Chart series cover the six calendar months ending with today's month and
//! only consider the current period. Their amounts are truncated toward zero.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::{Category, Expense};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const CHART_PALETTE: [&str; 6] = [
    "var(--chart-1)",
    "var(--chart-2)",
    "var(--chart-3)",
    "var(--chart-4)",
    "var(--chart-5)",
    "var(--chart-6)",
];

pub const CHART_MONTHS: usize = 6;
const CURRENT_PERIOD_DAYS: i64 = 180;
const PREVIOUS_PERIOD_DAYS: i64 = 365;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kpi<T> {
    pub value: T,
    pub prev_value: T,
    pub trend_percent: f64,
    pub trend_label: String,
    pub subtitle: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_expenses: Kpi<f64>,
    pub this_month: Kpi<f64>,
    pub expense_count: Kpi<u64>,
    pub avg_per_expense: Kpi<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlySpending {
    pub month: String,
    pub amount: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyByType {
    pub month: String,
    pub essential: i64,
    pub other: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub category: Category,
    pub amount: i64,
    pub fill: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
    /// First day of the month.
    pub date: NaiveDate,
    pub spent: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub kpis: Kpis,
    pub monthly_spending: Vec<MonthlySpending>,
    pub monthly_by_type: Vec<MonthlyByType>,
    pub by_category: Vec<CategorySpending>,
    pub daily_trend: Vec<DailyTrend>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Totals {
    total: f64,
    count: u64,
}

impl Totals {
    fn add(&mut self, amount: f64) {
        self.total += amount;
        self.count += 1;
    }

    fn avg(self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Round to `digits` decimals, ties to even.
fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round_ties_even() / factor
}

/// Relative change of `curr` over `prev`, in percent with one decimal.
///
/// A zero baseline yields `100.0` for any growth and `0.0` otherwise.
pub fn trend_pct(curr: f64, prev: f64) -> f64 {
    if prev == 0.0 {
        return if curr > 0.0 { 100.0 } else { 0.0 };
    }
    round_to((curr - prev) / prev * 100.0, 1)
}

pub fn trend_label(pct: f64, up: &str, down: &str) -> String {
    (if pct >= 0.0 { up } else { down }).to_string()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - TimeDelta::days(i64::from(date.day0()))
}

fn previous_month_start(month_start: NaiveDate) -> NaiveDate {
    first_of_month(month_start - TimeDelta::days(1))
}

/// First days of the `n` calendar months ending with `end`'s month, oldest
/// first.
pub fn last_n_months(end: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let mut months = Vec::with_capacity(n);
    let mut month = first_of_month(end);
    for _ in 0..n {
        months.push(month);
        month = previous_month_start(month);
    }
    months.reverse();
    months
}

fn month_name(month_start: NaiveDate) -> String {
    MONTH_NAMES[month_start.month0() as usize].to_string()
}

/// Unparseable dates count as `today`.
fn expense_date(expense: &Expense, today: NaiveDate) -> NaiveDate {
    let raw = expense
        .expense_date
        .get(..10)
        .unwrap_or(&expense.expense_date);
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => {
            tracing::warn!(
                id = %expense.id,
                expense_date = %expense.expense_date,
                "unparseable expense_date, counting it as {today}"
            );
            today
        }
    }
}

fn kpi(curr: f64, prev: f64, up: &str, down: &str, subtitle: &str) -> Kpi<f64> {
    let trend_percent = trend_pct(curr, prev);
    Kpi {
        value: round_to(curr, 2),
        prev_value: round_to(prev, 2),
        trend_percent,
        trend_label: trend_label(trend_percent, up, down),
        subtitle: subtitle.to_string(),
    }
}

fn truncate(amount: f64) -> i64 {
    amount.trunc() as i64
}

/// Build the dashboard payload for `expenses` as seen on `today`.
pub fn build_dashboard(expenses: &[Expense], today: NaiveDate) -> Dashboard {
    let this_month_start = first_of_month(today);
    let last_month_start = previous_month_start(this_month_start);
    let six_months_ago = today - TimeDelta::days(CURRENT_PERIOD_DAYS);
    let twelve_months_ago = today - TimeDelta::days(PREVIOUS_PERIOD_DAYS);

    let mut current = Totals::default();
    let mut previous = Totals::default();
    let mut this_month = Totals::default();
    let mut last_month = Totals::default();
    let mut current_period: Vec<(&Expense, NaiveDate)> = Vec::new();

    for expense in expenses {
        let date = expense_date(expense, today);

        if date >= six_months_ago {
            current.add(expense.amount);
            current_period.push((expense, date));
        } else if date >= twelve_months_ago {
            previous.add(expense.amount);
        }

        if date >= this_month_start {
            this_month.add(expense.amount);
        } else if date >= last_month_start {
            last_month.add(expense.amount);
        }
    }

    let count_trend = trend_pct(current.count as f64, previous.count as f64);
    let kpis = Kpis {
        total_expenses: kpi(
            current.total,
            previous.total,
            "Up from last period",
            "Down from last period",
            "Total spent in the last 6 months",
        ),
        this_month: kpi(
            this_month.total,
            last_month.total,
            "Up from last month",
            "Down from last month",
            "Current month spending",
        ),
        expense_count: Kpi {
            value: current.count,
            prev_value: previous.count,
            trend_percent: count_trend,
            trend_label: trend_label(count_trend, "More transactions", "Fewer transactions"),
            subtitle: "Number of expense entries".to_string(),
        },
        avg_per_expense: kpi(
            current.avg(),
            previous.avg(),
            "Slightly higher average",
            "Slightly lower average",
            "Average transaction size",
        ),
    };

    // (total, essential, other) per month start.
    let mut per_month: HashMap<NaiveDate, (f64, f64, f64)> = HashMap::new();
    // Insertion order is kept so equal amounts rank by first appearance.
    let mut per_category: Vec<(Category, f64)> = Vec::new();

    for &(expense, date) in &current_period {
        let bucket = per_month.entry(first_of_month(date)).or_default();
        bucket.0 += expense.amount;
        if expense.category.is_essential() {
            bucket.1 += expense.amount;
        } else {
            bucket.2 += expense.amount;
        }

        match per_category
            .iter_mut()
            .find(|(category, _)| *category == expense.category)
        {
            Some((_, total)) => *total += expense.amount,
            None => per_category.push((expense.category, expense.amount)),
        }
    }

    let months = last_n_months(today, CHART_MONTHS);
    let bucket = |month: &NaiveDate| per_month.get(month).copied().unwrap_or_default();

    let monthly_spending = months
        .iter()
        .map(|month| MonthlySpending {
            month: month_name(*month),
            amount: truncate(bucket(month).0),
        })
        .collect();

    let monthly_by_type = months
        .iter()
        .map(|month| {
            let (_, essential, other) = bucket(month);
            MonthlyByType {
                month: month_name(*month),
                essential: truncate(essential),
                other: truncate(other),
            }
        })
        .collect();

    let daily_trend = months
        .iter()
        .map(|month| DailyTrend {
            date: *month,
            spent: truncate(bucket(month).0),
        })
        .collect();

    per_category.sort_by(|a, b| b.1.total_cmp(&a.1));
    let by_category = per_category
        .into_iter()
        .enumerate()
        .map(|(i, (category, total))| CategorySpending {
            category,
            amount: truncate(total),
            fill: CHART_PALETTE[i % CHART_PALETTE.len()].to_string(),
        })
        .collect();

    Dashboard {
        kpis,
        monthly_spending,
        monthly_by_type,
        by_category,
        daily_trend,
    }
}
