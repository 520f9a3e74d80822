//! Weekly and brand-wise rollups of sales for charts.
//!
//! Provides functions to bucket sales into the four fixed weeks of a month,
//! total revenue and volume per brand, and select the sales inside a
//! calendar window.

use std::collections::HashMap;

use serde::Serialize;
use time::UtcOffset;

use crate::{
    brand::BrandBucket,
    calendar::{TimestampRange, local_date},
    sale::SaleRecord,
};

/// The labels of the four week buckets.
pub const WEEK_LABELS: [&str; 4] = ["Wk1", "Wk2", "Wk3", "Wk4"];

/// Revenue and units sold in one week bucket of a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyStat {
    pub label: &'static str,
    pub revenue: f64,
    pub count: i64,
}

/// Revenue and units sold for one brand as entered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrandStat {
    pub brand: String,
    pub revenue: f64,
    pub volume: i64,
}

/// The rollups shown on the analytics charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    /// Always exactly four entries, Wk1 to Wk4.
    pub weekly: [WeeklyStat; 4],
    /// Brand totals in the order each brand first appears in the input.
    pub by_brand: Vec<BrandStat>,
}

impl Aggregate {
    /// Find the totals for a brand string exactly as entered.
    pub fn brand(&self, brand: &str) -> Option<&BrandStat> {
        self.by_brand.iter().find(|stat| stat.brand == brand)
    }
}

/// Which quantity a chart plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Metric {
    #[default]
    Revenue,
    Volume,
}

impl Metric {
    fn of(self, sale: &SaleRecord) -> f64 {
        match self {
            Metric::Revenue => sale.total_value(),
            Metric::Volume => sale.quantity() as f64,
        }
    }
}

/// The week bucket (0 to 3) for a day of the month.
///
/// Days 1-7 are the first week, 8-14 the second, 15-21 the third, and
/// everything from the 22nd to the end of the month is the fourth week.
pub fn week_index(day_of_month: u8) -> usize {
    match day_of_month {
        0..=7 => 0,
        8..=14 => 1,
        15..=21 => 2,
        _ => 3,
    }
}

/// Roll up sales by week of month and by brand.
///
/// Sales without units are skipped. Brands are grouped by the exact string
/// entered, not by reference bucket.
pub fn aggregate(sales: &[SaleRecord], offset: UtcOffset) -> Aggregate {
    let mut weekly = WEEK_LABELS.map(|label| WeeklyStat {
        label,
        revenue: 0.0,
        count: 0,
    });
    let mut by_brand: Vec<BrandStat> = Vec::new();
    let mut brand_positions: HashMap<&str, usize> = HashMap::new();

    for sale in sales.iter().filter(|sale| sale.has_units()) {
        let day = local_date(sale.timestamp(), offset).day();
        let week = &mut weekly[week_index(day)];
        week.revenue += sale.total_value();
        week.count += sale.quantity();

        let position = *brand_positions.entry(sale.brand()).or_insert_with(|| {
            by_brand.push(BrandStat {
                brand: sale.brand().to_owned(),
                revenue: 0.0,
                volume: 0,
            });
            by_brand.len() - 1
        });

        let brand = &mut by_brand[position];
        brand.revenue += sale.total_value();
        brand.volume += sale.quantity();
    }

    Aggregate { weekly, by_brand }
}

/// Sums `metric` per week bucket and per reference brand bucket.
///
/// The outer index is the week (see [week_index]) and the inner index is
/// [BrandBucket::index].
pub fn weekly_by_bucket(sales: &[SaleRecord], offset: UtcOffset, metric: Metric) -> [[f64; 8]; 4] {
    let mut totals = [[0.0; 8]; 4];

    for sale in sales.iter().filter(|sale| sale.has_units()) {
        let week = week_index(local_date(sale.timestamp(), offset).day());
        let bucket = BrandBucket::of(sale.brand()).index();
        totals[week][bucket] += metric.of(sale);
    }

    totals
}

/// The sales whose timestamps fall inside `range`, in input order.
pub fn filter_in_range(sales: &[SaleRecord], range: TimestampRange) -> Vec<SaleRecord> {
    sales
        .iter()
        .filter(|sale| range.contains(sale.timestamp()))
        .cloned()
        .collect()
}

/// Total revenue of the sales with units.
pub fn total_revenue(sales: &[SaleRecord]) -> f64 {
    sales
        .iter()
        .filter(|sale| sale.has_units())
        .map(SaleRecord::total_value)
        .sum()
}

/// Total units of the sales with units.
pub fn total_units(sales: &[SaleRecord]) -> i64 {
    sales
        .iter()
        .filter(|sale| sale.has_units())
        .map(SaleRecord::quantity)
        .sum()
}
