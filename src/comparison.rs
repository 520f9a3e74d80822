//! Month-to-date against last-month-to-date totals.

use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    aggregation::{filter_in_range, total_revenue, total_units},
    calendar::{SelectedMonth, TimestampRange, lmtd_range, mtd_range},
    sale::SaleRecord,
};

/// Sales in the selected month compared with the same stretch of the month
/// before.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthComparison {
    pub mtd_range: TimestampRange,
    pub lmtd_range: TimestampRange,
    pub mtd_total: f64,
    pub lmtd_total: f64,
    pub mtd_units: i64,
    pub lmtd_units: i64,
    /// The change in revenue as a percentage of the last-month-to-date
    /// revenue, or `None` when there was no revenue last month to compare
    /// against.
    pub growth_percent: Option<f64>,
}

/// Compare the revenue and units of `selected` with the month before.
///
/// See [mtd_range] and [lmtd_range] for how the two windows are chosen
/// relative to `now`.
pub fn compare(
    sales: &[SaleRecord],
    selected: SelectedMonth,
    now: OffsetDateTime,
    local_timezone: UtcOffset,
) -> MonthComparison {
    let mtd_range = mtd_range(selected, now, local_timezone);
    let lmtd_range = lmtd_range(selected, now, local_timezone);

    let mtd_sales = filter_in_range(sales, mtd_range);
    let lmtd_sales = filter_in_range(sales, lmtd_range);

    let mtd_total = total_revenue(&mtd_sales);
    let lmtd_total = total_revenue(&lmtd_sales);

    let growth_percent =
        (lmtd_total != 0.0).then(|| (mtd_total - lmtd_total) / lmtd_total * 100.0);

    MonthComparison {
        mtd_range,
        lmtd_range,
        mtd_total,
        lmtd_total,
        mtd_units: total_units(&mtd_sales),
        lmtd_units: total_units(&lmtd_sales),
        growth_percent,
    }
}

#[cfg(test)]
mod tests {
    use time::{
        Month, OffsetDateTime, UtcOffset,
        macros::{datetime, offset},
    };

    use crate::{
        calendar::SelectedMonth,
        comparison::compare,
        sale::{NewSale, SaleRecord},
    };

    const IST: UtcOffset = offset!(+5:30);

    fn create_test_sale(date_time: OffsetDateTime, price: f64, quantity: i64) -> SaleRecord {
        let timestamp = (date_time.unix_timestamp_nanos() / 1_000_000) as i64;
        SaleRecord::create(NewSale::new(timestamp, "Samsung", "A15", "", price, quantity)).unwrap()
    }

    #[test]
    fn current_month_compares_against_same_days_last_month() {
        let now = datetime!(2024-03-10 18:00 +5:30);
        let sales = vec![
            create_test_sale(datetime!(2024-03-02 11:00 +5:30), 20_000.0, 2),
            create_test_sale(datetime!(2024-02-05 11:00 +5:30), 10_000.0, 1),
            create_test_sale(datetime!(2024-02-10 23:59 +5:30), 10_000.0, 1),
            // After the 10th of last month, so outside the comparison window.
            create_test_sale(datetime!(2024-02-11 00:00 +5:30), 50_000.0, 1),
        ];

        let result = compare(&sales, SelectedMonth::new(2024, Month::March).unwrap(), now, IST);

        assert_eq!(result.mtd_total, 40_000.0);
        assert_eq!(result.mtd_units, 2);
        assert_eq!(result.lmtd_total, 20_000.0);
        assert_eq!(result.lmtd_units, 2);
        assert_eq!(result.growth_percent, Some(100.0));
    }

    #[test]
    fn growth_is_none_without_last_month_revenue() {
        let now = datetime!(2024-03-10 18:00 +5:30);
        let sales = vec![create_test_sale(datetime!(2024-03-02 11:00 +5:30), 20_000.0, 1)];

        let result = compare(&sales, SelectedMonth::new(2024, Month::March).unwrap(), now, IST);

        assert_eq!(result.growth_percent, None);
    }

    #[test]
    fn past_month_compares_whole_months() {
        let now = datetime!(2024-06-01 10:00 +5:30);
        let sales = vec![
            create_test_sale(datetime!(2024-03-31 20:00 +5:30), 30_000.0, 1),
            create_test_sale(datetime!(2024-02-29 20:00 +5:30), 60_000.0, 1),
        ];

        let result = compare(&sales, SelectedMonth::new(2024, Month::March).unwrap(), now, IST);

        assert_eq!(result.mtd_total, 30_000.0);
        assert_eq!(result.lmtd_total, 60_000.0);
        assert_eq!(result.growth_percent, Some(-50.0));
    }
}
