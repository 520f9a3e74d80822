//! Bar chart configuration for the analytics screen.
//!
//! Charts are returned as ECharts configurations. The presentation layer
//! serialises them to JSON and renders them.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, JsFunction,
        Tooltip, Trigger,
    },
    series::bar,
};
use time::UtcOffset;

use crate::{
    aggregation::{Aggregate, Metric, WEEK_LABELS, weekly_by_bucket},
    brand::BrandBucket,
    sale::SaleRecord,
};

/// Stacked bars of `metric` for each week of the month, one series per
/// reference brand.
pub fn weekly_chart(sales: &[SaleRecord], local_timezone: UtcOffset, metric: Metric) -> Chart {
    let totals = weekly_by_bucket(sales, local_timezone, metric);

    let subtext = match metric {
        Metric::Revenue => "Revenue by brand",
        Metric::Volume => "Units sold by brand",
    };

    let mut chart = Chart::new()
        .title(Title::new().text("Weekly Sales").subtext(subtext).left(20).top("1%"))
        .tooltip(metric_tooltip(metric))
        .legend(Legend::new().left(250).top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(90)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(WEEK_LABELS.to_vec()))
        .y_axis(metric_axis(metric));

    for bucket in BrandBucket::ALL {
        let data: Vec<f64> = totals.iter().map(|week| week[bucket.index()]).collect();

        chart = chart.series(
            bar::Bar::new()
                .name(bucket.label())
                .stack("Brands")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(data),
        );
    }

    chart
}

/// Revenue per brand as entered, in the order each brand first appears.
pub fn brand_chart(aggregate: &Aggregate) -> Chart {
    let labels: Vec<String> = aggregate
        .by_brand
        .iter()
        .map(|stat| stat.brand.clone())
        .collect();
    let values: Vec<f64> = aggregate.by_brand.iter().map(|stat| stat.revenue).collect();

    Chart::new()
        .title(Title::new().text("Brand Revenue"))
        .tooltip(metric_tooltip(Metric::Revenue))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(metric_axis(Metric::Revenue))
        .series(bar::Bar::new().name("Revenue").data(values))
}

fn metric_axis(metric: Metric) -> Axis {
    match metric {
        Metric::Revenue => Axis::new()
            .type_(AxisType::Value)
            .axis_label(AxisLabel::new().formatter(rupee_formatter())),
        Metric::Volume => Axis::new().type_(AxisType::Value),
    }
}

fn metric_tooltip(metric: Metric) -> Tooltip {
    let tooltip = Tooltip::new()
        .trigger(Trigger::Axis)
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow));

    match metric {
        Metric::Revenue => tooltip.value_formatter(rupee_formatter()),
        Metric::Volume => tooltip,
    }
}

#[inline]
fn rupee_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR',
              maximumFractionDigits: 0
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}
