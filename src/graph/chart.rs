//! The ECharts options for the category pie chart and the script that draws it.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{JsFunction, Label, Tooltip, Trigger},
    series::Pie,
};
use maud::PreEscaped;

use crate::{graph::query::CategoryTotal, html::HeadElement, month::YearMonth};

/// The HTML element ID of the chart container.
pub(super) const CHART_ID: &str = "category-chart";

pub(super) const ECHARTS_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The chart title, e.g. "2024-03 expenses by category".
pub(super) fn chart_title(month: YearMonth) -> String {
    format!("{month} expenses by category")
}

/// A pie chart with one slice per category.
pub(super) fn expenses_by_category_chart(month: YearMonth, totals: &[CategoryTotal]) -> Chart {
    let data = totals
        .iter()
        .map(|total| (total.total as f64, total.category.as_ref()))
        .collect::<Vec<_>>();

    Chart::new()
        .title(Title::new().text(chart_title(month)).left("center"))
        .tooltip(Tooltip::new().trigger(Trigger::Item).formatter("{b}: ¥{c} ({d}%)"))
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["35%", "65%"])
                .label(Label::new().show(true).formatter(percent_label_formatter()))
                .data(data),
        )
}

/// Label each slice with its category and percentage to one decimal place.
fn percent_label_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "params",
        "return params.name + ': ' + params.percent.toFixed(1) + '%';",
    )
}

/// Script that draws the chart described by `options` into the chart container.
pub(super) fn chart_script(options: &str) -> HeadElement {
    // Category names are user text, so stop them from closing the script element.
    let options = options.replace("</", "<\\/");

    HeadElement::ScriptSource(PreEscaped(format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chart = echarts.init(document.getElementById("{CHART_ID}"));
            chart.setOption({options});
            window.addEventListener('resize', chart.resize);
            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();
        }});"#
    )))
}
