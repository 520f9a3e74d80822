//! Assembles printable report sections for each kind of sales report.
//!
//! Each section is a self-contained table description (header, data rows and
//! an optional totals row) with every cell already formatted as text, ready for
//! a document renderer to lay out.

use serde::{Deserialize, Serialize};
use time::UtcOffset;

use crate::{
    brand::BrandBucket,
    calendar::{SelectedMonth, local_date},
    format::{format_percentage, format_rupees},
    matrix::{EMPTY_CELL, build_matrix},
    sale::SaleRecord,
    segment::PriceSegment,
    store::OutletSettings,
};

/// The kinds of report a user can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    MatrixOnly,
    PriceSegmentOnly,
    Detailed,
    Master,
}

impl ReportKind {
    /// The sections of this report, in print order.
    pub fn sections(self) -> &'static [SectionKind] {
        match self {
            Self::MatrixOnly => &[SectionKind::Matrix],
            Self::PriceSegmentOnly => &[SectionKind::SegmentGrid],
            Self::Detailed => &[
                SectionKind::BrandPerformance,
                SectionKind::SegmentGrid,
                SectionKind::TransactionLog,
            ],
            Self::Master => &[
                SectionKind::Matrix,
                SectionKind::BrandPerformance,
                SectionKind::SegmentGrid,
                SectionKind::TransactionLog,
            ],
        }
    }

    /// The short name shown in titles and file names.
    pub fn label(self) -> &'static str {
        match self {
            Self::MatrixOnly => "Matrix",
            Self::PriceSegmentOnly => "Price Segment",
            Self::Detailed => "Detailed",
            Self::Master => "Master",
        }
    }
}

/// One table in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    Matrix,
    BrandPerformance,
    SegmentGrid,
    TransactionLog,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::Matrix => "Daily Brand Matrix",
            Self::BrandPerformance => "Brand Performance Summary",
            Self::SegmentGrid => "Price Segment Analysis",
            Self::TransactionLog => "Detailed Transaction Log",
        }
    }
}

/// A table ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub kind: SectionKind,
    pub title: &'static str,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub totals: Option<Vec<String>>,
}

/// Units sold per reference brand and price segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SegmentGrid {
    /// Indexed by [BrandBucket::index] then [PriceSegment::index].
    pub units: [[i64; 8]; 8],
}

impl SegmentGrid {
    pub fn get(&self, bucket: BrandBucket, segment: PriceSegment) -> i64 {
        self.units[bucket.index()][segment.index()]
    }

    /// Units per segment across all brands.
    pub fn segment_totals(&self) -> [i64; 8] {
        let mut totals = [0; 8];
        for brand_row in &self.units {
            for (total, units) in totals.iter_mut().zip(brand_row) {
                *total += units;
            }
        }
        totals
    }
}

/// Count units per brand bucket and price segment.
///
/// The segment comes from the effective unit price (`total_value / quantity`)
/// rather than the stored segment.
pub fn segment_grid(sales: &[SaleRecord]) -> SegmentGrid {
    let mut grid = SegmentGrid::default();

    for sale in sales {
        let Some(segment) = sale
            .effective_unit_price()
            .and_then(|price| PriceSegment::classify(price).ok())
        else {
            continue;
        };

        grid.units[BrandBucket::of(sale.brand()).index()][segment.index()] += sale.quantity();
    }

    grid
}

/// Build the sections for `kind`, in print order.
///
/// `segment_groups` is the grid for the same `sales`, see [segment_grid].
pub fn assemble(
    kind: ReportKind,
    sales: &[SaleRecord],
    segment_groups: &SegmentGrid,
    offset: UtcOffset,
) -> Vec<ReportSection> {
    tracing::debug!(
        "Assembling {} report from {} sales",
        kind.label(),
        sales.len()
    );

    kind.sections()
        .iter()
        .map(|section| match section {
            SectionKind::Matrix => matrix_section(sales, offset),
            SectionKind::BrandPerformance => brand_performance_section(sales),
            SectionKind::SegmentGrid => segment_grid_section(segment_groups),
            SectionKind::TransactionLog => transaction_log_section(sales, offset),
        })
        .collect()
}

/// A report with its header text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub subtitle: String,
    /// Suggested document name, e.g. "Sales_Report_Master_March_2024.pdf".
    pub file_name: String,
    pub sections: Vec<ReportSection>,
}

/// Assemble a report for `month` with the outlet details as header text.
///
/// `sales` should already be limited to the month.
pub fn build_report(
    kind: ReportKind,
    sales: &[SaleRecord],
    month: SelectedMonth,
    settings: &OutletSettings,
    offset: UtcOffset,
) -> Report {
    let grid = segment_grid(sales);
    let month_label = month.label();

    Report {
        title: format!("SALES REPORT ({}) - {month_label}", kind.label()),
        subtitle: format!(
            "Outlet: {} | SEC: {}",
            settings.outlet_name, settings.sec_name
        ),
        file_name: format!("Sales_Report_{}_{month_label}.pdf", kind.label()).replace(' ', "_"),
        sections: assemble(kind, sales, &grid, offset),
    }
}

fn brand_header(first: &str) -> Vec<String> {
    std::iter::once(first.to_owned())
        .chain(BrandBucket::ALL.iter().map(|bucket| bucket.label().to_owned()))
        .collect()
}

fn matrix_section(sales: &[SaleRecord], offset: UtcOffset) -> ReportSection {
    let matrix = build_matrix(sales, offset);

    let mut header = brand_header("Date");
    header.extend(["TOTAL", "Share", "Logs"].map(str::to_owned));

    let rows: Vec<Vec<String>> = matrix
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![format_date_label(row.date)];
            cells.extend(row.cells.iter().map(|cell| cell.display()));
            cells.push(row.total.display());
            cells.push(format!(
                "{} {}",
                row.leading_brand.label(),
                format_percentage(row.leading_share)
            ));
            cells.push(row.logs.clone());
            cells
        })
        .collect();

    let mut totals = vec!["TOTAL".to_owned()];
    totals.extend(matrix.totals.cells.iter().map(|cell| cell.display()));
    totals.push(matrix.totals.total.display());
    totals.push(String::new());
    totals.push(String::new());

    ReportSection {
        kind: SectionKind::Matrix,
        title: SectionKind::Matrix.title(),
        header,
        rows,
        totals: Some(totals),
    }
}

fn brand_performance_section(sales: &[SaleRecord]) -> ReportSection {
    let mut units = [0_i64; 8];
    let mut revenue = [0.0_f64; 8];

    for sale in sales.iter().filter(|sale| sale.has_units()) {
        let bucket = BrandBucket::of(sale.brand()).index();
        units[bucket] += sale.quantity();
        revenue[bucket] += sale.total_value();
    }

    let rows = BrandBucket::ALL
        .iter()
        .map(|bucket| {
            vec![
                bucket.label().to_owned(),
                units[bucket.index()].to_string(),
                format_rupees(revenue[bucket.index()]),
            ]
        })
        .collect();

    ReportSection {
        kind: SectionKind::BrandPerformance,
        title: SectionKind::BrandPerformance.title(),
        header: ["Brand", "Total Units", "Total Revenue"]
            .map(str::to_owned)
            .to_vec(),
        rows,
        totals: Some(vec![
            "GRAND TOTAL".to_owned(),
            units.iter().sum::<i64>().to_string(),
            format_rupees(revenue.iter().sum()),
        ]),
    }
}

fn segment_grid_section(grid: &SegmentGrid) -> ReportSection {
    let header: Vec<String> = std::iter::once("Brand".to_owned())
        .chain(PriceSegment::ALL.iter().map(|segment| segment.label().to_owned()))
        .collect();

    let rows: Vec<Vec<String>> = BrandBucket::ALL
        .iter()
        .map(|bucket| {
            std::iter::once(bucket.label().to_owned())
                .chain(
                    PriceSegment::ALL
                        .iter()
                        .map(|segment| units_cell(grid.get(*bucket, *segment))),
                )
                .collect()
        })
        .collect();

    let totals: Vec<String> = std::iter::once("TOTAL".to_owned())
        .chain(grid.segment_totals().iter().map(|units| units_cell(*units)))
        .collect();

    ReportSection {
        kind: SectionKind::SegmentGrid,
        title: SectionKind::SegmentGrid.title(),
        header,
        rows,
        totals: Some(totals),
    }
}

fn transaction_log_section(sales: &[SaleRecord], offset: UtcOffset) -> ReportSection {
    let mut logged: Vec<&SaleRecord> = sales.iter().filter(|sale| sale.has_units()).collect();
    logged.sort_by_key(|sale| sale.timestamp());

    let rows = logged
        .into_iter()
        .map(|sale| {
            vec![
                format_date_label(local_date(sale.timestamp(), offset)),
                sale.brand().to_owned(),
                sale.model().to_owned(),
                sale.variant().to_owned(),
                format_rupees(sale.unit_price()),
                sale.quantity().to_string(),
                format_rupees(sale.total_value()),
            ]
        })
        .collect();

    ReportSection {
        kind: SectionKind::TransactionLog,
        title: SectionKind::TransactionLog.title(),
        header: ["Date", "Brand", "Model", "Variant", "Price", "Qty", "Total"]
            .map(str::to_owned)
            .to_vec(),
        rows,
        totals: None,
    }
}

fn units_cell(units: i64) -> String {
    if units > 0 {
        units.to_string()
    } else {
        EMPTY_CELL.to_owned()
    }
}

fn format_date_label(date: time::Date) -> String {
    format!(
        "{:02}-{:02}-{}",
        date.day(),
        u8::from(date.month()),
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use time::{
        Date, Month, Time, UtcOffset,
        macros::{date, offset},
    };

    use crate::{
        brand::BrandBucket,
        calendar::{SelectedMonth, local_millis},
        report::{ReportKind, SectionKind, assemble, build_report, segment_grid},
        sale::{NewSale, SaleRecord},
        segment::PriceSegment,
        store::OutletSettings,
    };

    const IST: UtcOffset = offset!(+5:30);

    fn create_test_sale(
        date: Date,
        hour: u8,
        brand: &str,
        price: f64,
        quantity: i64,
    ) -> SaleRecord {
        let timestamp = local_millis(date, Time::from_hms(hour, 0, 0).unwrap(), IST);
        SaleRecord::create(NewSale::new(timestamp, brand, "Model", "8/128", price, quantity))
            .unwrap()
    }

    fn sample_sales() -> Vec<SaleRecord> {
        vec![
            create_test_sale(date!(2024-03-02), 11, "Samsung", 12_000.0, 2),
            create_test_sale(date!(2024-03-01), 10, "Apple", 120_000.0, 1),
            create_test_sale(date!(2024-03-02), 15, "Nokia", 9_999.0, 1),
        ]
    }

    fn section_kinds(kind: ReportKind) -> Vec<SectionKind> {
        let sales = sample_sales();
        let grid = segment_grid(&sales);
        assemble(kind, &sales, &grid, IST)
            .iter()
            .map(|section| section.kind)
            .collect()
    }

    #[test]
    fn section_order_per_kind() {
        assert_eq!(section_kinds(ReportKind::MatrixOnly), vec![SectionKind::Matrix]);
        assert_eq!(
            section_kinds(ReportKind::PriceSegmentOnly),
            vec![SectionKind::SegmentGrid]
        );
        assert_eq!(
            section_kinds(ReportKind::Detailed),
            vec![
                SectionKind::BrandPerformance,
                SectionKind::SegmentGrid,
                SectionKind::TransactionLog
            ]
        );
        assert_eq!(
            section_kinds(ReportKind::Master),
            vec![
                SectionKind::Matrix,
                SectionKind::BrandPerformance,
                SectionKind::SegmentGrid,
                SectionKind::TransactionLog
            ]
        );
    }

    #[test]
    fn segment_grid_counts_units_by_bucket_and_segment() {
        let grid = segment_grid(&sample_sales());

        assert_eq!(grid.get(BrandBucket::Samsung, PriceSegment::From10KTo15K), 2);
        assert_eq!(grid.get(BrandBucket::Apple, PriceSegment::Over100K), 1);
        assert_eq!(grid.get(BrandBucket::Other, PriceSegment::Under10K), 1);
        assert_eq!(grid.segment_totals().iter().sum::<i64>(), 4);
    }

    #[test]
    fn segment_grid_section_has_fixed_layout() {
        let sales = sample_sales();
        let grid = segment_grid(&sales);

        let sections = assemble(ReportKind::PriceSegmentOnly, &sales, &grid, IST);
        let section = &sections[0];

        assert_eq!(section.header.len(), 9);
        assert_eq!(section.header[1], "<10K");
        assert_eq!(section.header[8], ">100K");
        assert_eq!(section.rows.len(), 8);
        assert_eq!(section.rows[0][0], "Samsung");
        assert_eq!(section.rows[0][2], "2");
        assert_eq!(section.rows[0][1], "-");
        assert_eq!(section.rows[7][0], "Other");
        assert_eq!(section.rows[7][1], "1");
    }

    #[test]
    fn matrix_section_has_row_per_date_and_totals() {
        let sales = sample_sales();
        let grid = segment_grid(&sales);

        let sections = assemble(ReportKind::MatrixOnly, &sales, &grid, IST);
        let section = &sections[0];

        assert_eq!(section.rows.len(), 2);
        assert_eq!(section.rows[0][0], "01-03-2024");
        assert_eq!(section.rows[1][0], "02-03-2024");
        let totals = section.totals.as_ref().unwrap();
        assert_eq!(totals[0], "TOTAL");
        assert_eq!(totals[9], "4 (1.5L)");
    }

    #[test]
    fn brand_performance_lists_every_bucket_and_grand_total() {
        let sales = sample_sales();
        let grid = segment_grid(&sales);

        let sections = assemble(ReportKind::Detailed, &sales, &grid, IST);
        let section = &sections[0];

        assert_eq!(section.rows.len(), 8);
        assert_eq!(section.rows[0], vec!["Samsung", "2", "₹24,000.00"]);
        assert_eq!(
            section.totals,
            Some(vec![
                "GRAND TOTAL".to_owned(),
                "4".to_owned(),
                "₹1,53,999.00".to_owned()
            ])
        );
    }

    #[test]
    fn transaction_log_is_chronological_with_raw_brand() {
        let sales = sample_sales();
        let grid = segment_grid(&sales);

        let sections = assemble(ReportKind::Detailed, &sales, &grid, IST);
        let log = &sections[2];

        let brands: Vec<_> = log.rows.iter().map(|row| row[1].as_str()).collect();
        assert_eq!(brands, vec!["Apple", "Samsung", "Nokia"]);
        assert!(log.totals.is_none());
    }

    #[test]
    fn empty_sales_still_produce_every_section() {
        let grid = segment_grid(&[]);

        let sections = assemble(ReportKind::Master, &[], &grid, IST);

        assert_eq!(sections.len(), 4);
        assert!(sections[0].rows.is_empty());
        assert_eq!(sections[0].totals.as_ref().unwrap()[9], "-");
    }

    #[test]
    fn build_report_formats_header_text() {
        let settings = OutletSettings {
            outlet_name: "City Mobiles".to_owned(),
            sec_name: "Asha".to_owned(),
        };

        let report = build_report(
            ReportKind::PriceSegmentOnly,
            &sample_sales(),
            SelectedMonth::new(2024, Month::March).unwrap(),
            &settings,
            IST,
        );

        assert_eq!(report.title, "SALES REPORT (Price Segment) - March 2024");
        assert_eq!(report.subtitle, "Outlet: City Mobiles | SEC: Asha");
        assert_eq!(report.file_name, "Sales_Report_Price_Segment_March_2024.pdf");
    }
}
