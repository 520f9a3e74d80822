//! The date by brand matrix: daily units and value per reference brand.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, UtcOffset};

use crate::{
    brand::BrandBucket, calendar::local_date, format::format_compact, sale::SaleRecord,
};

/// Placeholder shown in cells without sales.
pub const EMPTY_CELL: &str = "-";

/// Units and value sold for one brand (or a row/column total).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MatrixCell {
    pub quantity: i64,
    pub value: f64,
}

impl MatrixCell {
    fn add(&mut self, sale: &SaleRecord) {
        self.quantity += sale.quantity();
        self.value += sale.total_value();
    }

    /// The compact cell text, e.g. "3 (45k)", or a dash when nothing sold.
    pub fn display(&self) -> String {
        if self.quantity > 0 {
            format!("{} ({})", self.quantity, format_compact(self.value))
        } else {
            EMPTY_CELL.to_owned()
        }
    }
}

/// One day of the matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixRow {
    pub date: Date,
    /// Indexed by [BrandBucket::index].
    pub cells: [MatrixCell; 8],
    pub total: MatrixCell,
    /// The bucket with the most units that day, the first in column order on
    /// ties.
    pub leading_brand: BrandBucket,
    /// Units of the leading brand as a percentage of the day's units.
    pub leading_share: f64,
    /// Every sale of the day as "<brand> <model>", comma separated.
    pub logs: String,
}

/// The column sums across all date rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatrixTotals {
    pub cells: [MatrixCell; 8],
    pub total: MatrixCell,
}

/// Date rows in ascending date order followed by a totals row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatrixReport {
    pub rows: Vec<MatrixRow>,
    pub totals: MatrixTotals,
}

/// Build the date by brand matrix.
///
/// Sales are grouped by local calendar date and brands are folded into the
/// reference buckets with [BrandBucket::of]. Sales without units are skipped,
/// so every row has at least one sale. An empty input gives no rows and a
/// zero totals row.
pub fn build_matrix(sales: &[SaleRecord], offset: UtcOffset) -> MatrixReport {
    let mut sales_by_date: BTreeMap<Date, Vec<&SaleRecord>> = BTreeMap::new();

    for sale in sales.iter().filter(|sale| sale.has_units()) {
        sales_by_date
            .entry(local_date(sale.timestamp(), offset))
            .or_default()
            .push(sale);
    }

    let mut totals = MatrixTotals::default();
    let mut rows = Vec::with_capacity(sales_by_date.len());

    for (date, mut day_sales) in sales_by_date {
        day_sales.sort_by_key(|sale| sale.timestamp());

        let row = build_row(date, &day_sales);

        for (column, cell) in totals.cells.iter_mut().zip(&row.cells) {
            column.quantity += cell.quantity;
            column.value += cell.value;
        }
        totals.total.quantity += row.total.quantity;
        totals.total.value += row.total.value;

        rows.push(row);
    }

    MatrixReport { rows, totals }
}

fn build_row(date: Date, day_sales: &[&SaleRecord]) -> MatrixRow {
    let mut cells = [MatrixCell::default(); 8];
    let mut total = MatrixCell::default();

    for sale in day_sales {
        cells[BrandBucket::of(sale.brand()).index()].add(sale);
        total.add(sale);
    }

    let (leading_brand, leading_share) = find_leading_brand(&cells, total.quantity);

    let logs = day_sales
        .iter()
        .map(|sale| format!("{} {}", sale.brand(), sale.model()))
        .collect::<Vec<_>>()
        .join(", ");

    MatrixRow {
        date,
        cells,
        total,
        leading_brand,
        leading_share,
        logs,
    }
}

fn find_leading_brand(cells: &[MatrixCell; 8], total_quantity: i64) -> (BrandBucket, f64) {
    let mut leading = BrandBucket::ALL[0];

    for bucket in BrandBucket::ALL {
        if cells[bucket.index()].quantity > cells[leading.index()].quantity {
            leading = bucket;
        }
    }

    let share = if total_quantity > 0 {
        cells[leading.index()].quantity as f64 / total_quantity as f64 * 100.0
    } else {
        0.0
    };

    (leading, share)
}

#[cfg(test)]
mod tests {
    use time::{
        Date, Time, UtcOffset,
        macros::{date, offset},
    };

    use crate::{
        brand::BrandBucket,
        calendar::local_millis,
        matrix::{MatrixCell, build_matrix},
        sale::{NewSale, SaleRecord},
    };

    const IST: UtcOffset = offset!(+5:30);

    fn create_test_sale(date: Date, hour: u8, brand: &str, model: &str, price: f64) -> SaleRecord {
        let timestamp = local_millis(date, Time::from_hms(hour, 0, 0).unwrap(), IST);
        SaleRecord::create(NewSale::new(timestamp, brand, model, "", price, 1)).unwrap()
    }

    #[test]
    fn empty_input_has_only_zero_totals() {
        let report = build_matrix(&[], IST);

        assert!(report.rows.is_empty());
        assert_eq!(report.totals.total, MatrixCell::default());
    }

    #[test]
    fn ten_sales_over_two_dates_give_two_rows() {
        let mut sales = Vec::new();
        for hour in 10..17 {
            sales.push(create_test_sale(date!(2024-03-05), hour, "Samsung", "A15", 12_000.0));
        }
        for hour in 10..13 {
            sales.push(create_test_sale(date!(2024-03-02), hour, "Apple", "15", 70_000.0));
        }

        let report = build_matrix(&sales, IST);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.totals.total.quantity, 10);
        assert_eq!(report.rows[0].date, date!(2024-03-02));
        assert_eq!(report.rows[1].date, date!(2024-03-05));
    }

    #[test]
    fn dates_sort_chronologically_across_months() {
        let sales = vec![
            create_test_sale(date!(2024-02-10), 10, "Vivo", "Y", 9_000.0),
            create_test_sale(date!(2024-01-31), 10, "Vivo", "Y", 9_000.0),
            create_test_sale(date!(2023-12-25), 10, "Vivo", "Y", 9_000.0),
        ];

        let report = build_matrix(&sales, IST);

        let dates: Vec<_> = report.rows.iter().map(|row| row.date).collect();
        assert_eq!(
            dates,
            vec![date!(2023-12-25), date!(2024-01-31), date!(2024-02-10)]
        );
    }

    #[test]
    fn unknown_brands_fold_into_other_column() {
        let sales = vec![
            create_test_sale(date!(2024-03-01), 10, "Nokia", "G42", 10_000.0),
            create_test_sale(date!(2024-03-01), 11, "Lava", "Agni", 20_000.0),
        ];

        let report = build_matrix(&sales, IST);
        let other = report.rows[0].cells[BrandBucket::Other.index()];

        assert_eq!(other.quantity, 2);
        assert_eq!(other.value, 30_000.0);
        assert_eq!(other.display(), "2 (30k)");
        assert_eq!(report.rows[0].cells[BrandBucket::Samsung.index()].display(), "-");
    }

    #[test]
    fn row_totals_share_and_logs() {
        let sales = vec![
            create_test_sale(date!(2024-03-01), 12, "Apple", "15", 80_000.0),
            create_test_sale(date!(2024-03-01), 10, "Samsung", "S24", 75_000.0),
            create_test_sale(date!(2024-03-01), 11, "Samsung", "A55", 35_000.0),
            create_test_sale(date!(2024-03-01), 13, "Samsung", "M34", 15_000.0),
        ];

        let report = build_matrix(&sales, IST);
        let row = &report.rows[0];

        assert_eq!(row.total.quantity, 4);
        assert_eq!(row.total.value, 205_000.0);
        assert_eq!(row.leading_brand, BrandBucket::Samsung);
        assert_eq!(row.leading_share, 75.0);
        assert_eq!(row.logs, "Samsung S24, Samsung A55, Apple 15, Samsung M34");
    }

    #[test]
    fn totals_row_sums_columns() {
        let sales = vec![
            create_test_sale(date!(2024-03-01), 10, "Oppo", "A78", 18_000.0),
            create_test_sale(date!(2024-03-02), 10, "Oppo", "Reno", 32_000.0),
            create_test_sale(date!(2024-03-02), 11, "Motorola", "Edge", 25_000.0),
        ];

        let report = build_matrix(&sales, IST);

        let oppo = report.totals.cells[BrandBucket::Oppo.index()];
        assert_eq!(oppo.quantity, 2);
        assert_eq!(oppo.value, 50_000.0);
        assert_eq!(report.totals.cells[BrandBucket::Moto.index()].quantity, 1);
        assert_eq!(report.totals.total.quantity, 3);
        assert_eq!(report.totals.total.value, 75_000.0);
    }
}
