//! Sales hub turns the unit sales of a mobile phone outlet into monthly
//! analytics and printable reports.
//!
//! The library takes a flat list of [SaleRecord]s along with the current time
//! and the local UTC offset, and produces plain data:
//! - month-to-date against last-month-to-date comparison windows and totals,
//! - weekly and brand-wise revenue and volume rollups (and bar charts of them),
//! - price segment classification,
//! - report sections (date by brand matrix, brand performance, segment grid
//!   and transaction log) ready to be laid out as a document.
//!
//! Storage is left to the caller through the [SaleStore] and [SettingsStore]
//! traits, and backups use the delimited text format in [interchange].

mod error;

pub mod aggregation;
pub mod brand;
pub mod calendar;
pub mod charts;
pub mod comparison;
pub mod config;
pub mod format;
pub mod interchange;
pub mod matrix;
pub mod report;
pub mod sale;
pub mod segment;
pub mod store;

pub use aggregation::{Aggregate, BrandStat, Metric, WeeklyStat, aggregate};
pub use brand::BrandBucket;
pub use calendar::{SelectedMonth, TimestampRange, lmtd_range, month_range};
pub use comparison::{MonthComparison, compare};
pub use config::Config;
pub use error::Error;
pub use format::{format_compact, format_rupees};
pub use matrix::{MatrixReport, build_matrix};
pub use report::{Report, ReportKind, ReportSection, assemble, build_report};
pub use sale::{NewSale, SaleId, SaleRecord};
pub use segment::PriceSegment;
pub use store::{OutletSettings, SaleStore, SettingsStore};
