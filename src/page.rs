//! The dashboard page as format-neutral data.
//!
//! [`build_page`] lays out the fixed sequence of sections from the two
//! aggregates; renderers in [`crate::render`] turn it into HTML or text.

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;

use crate::{
    aggregate::{self, AverageByInstallments, RevenueByType},
    chart::{Axes, BarChart, BarDatum, LineChart, PointDatum},
    dataset::{Dataset, PAYMENT_INSTALLMENTS, PAYMENT_TYPE, PAYMENT_VALUE},
    error::AggregateError,
};

pub const PAGE_TITLE: &str = "Payment Type Analysis";
pub const PAGE_ICON: &str = "📊";
pub const HEADING: &str = "Exploratory Data Analysis (EDA) on Payment Data";
pub const REVENUE_QUESTION: &str =
    "Business Question 1: Which payment type contributes the most to total revenue?";
pub const INSTALLMENTS_QUESTION: &str = "Business Question 2: What is the relationship between payment installments and order value?";
pub const CONCLUSIONS: &str = "Conclusions";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub icon: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Heading { text: String },
    Subheading { text: String },
    Table(TableView),
    BarChart(BarChart),
    LineChart(LineChart),
    Conclusions { items: Vec<Conclusion> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Per column, whether values are numeric and read right-aligned.
    pub numeric: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conclusion {
    pub title: String,
    pub body: String,
}

/// Aggregates `dataset` and lays out the page.
pub fn render_dashboard(dataset: &Dataset) -> Result<Page, AggregateError> {
    let revenue = aggregate::revenue_by_type(dataset)?;
    let averages = aggregate::average_by_installments(dataset)?;
    Ok(build_page(&revenue, &averages))
}

pub fn build_page(revenue: &RevenueByType, averages: &AverageByInstallments) -> Page {
    let sections = vec![
        Section::Heading {
            text: HEADING.to_string(),
        },
        Section::Subheading {
            text: REVENUE_QUESTION.to_string(),
        },
        Section::Table(revenue_table(revenue)),
        Section::BarChart(revenue_chart(revenue)),
        Section::Subheading {
            text: INSTALLMENTS_QUESTION.to_string(),
        },
        Section::Table(installments_table(averages)),
        Section::LineChart(installments_chart(averages)),
        Section::Subheading {
            text: CONCLUSIONS.to_string(),
        },
        Section::Conclusions {
            items: conclusions(),
        },
    ];
    Page {
        title: PAGE_TITLE.to_string(),
        icon: PAGE_ICON.to_string(),
        sections,
    }
}

fn revenue_table(revenue: &RevenueByType) -> TableView {
    TableView {
        headers: vec![PAYMENT_TYPE.to_string(), PAYMENT_VALUE.to_string()],
        rows: revenue
            .rows()
            .iter()
            .map(|row| vec![row.payment_type.clone(), format_money(row.total_value)])
            .collect(),
        numeric: vec![false, true],
    }
}

fn revenue_chart(revenue: &RevenueByType) -> BarChart {
    let data = revenue
        .rows()
        .iter()
        .map(|row| BarDatum {
            label: row.payment_type.clone(),
            value: to_f64(row.total_value),
            value_label: format_money(row.total_value),
        })
        .collect::<Vec<_>>();
    BarChart::horizontal(
        Axes {
            title: "Total Revenue by Payment Type".to_string(),
            x_label: "Total Revenue".to_string(),
            y_label: "Payment Type".to_string(),
        },
        &data,
    )
}

fn installments_table(averages: &AverageByInstallments) -> TableView {
    TableView {
        headers: vec![PAYMENT_INSTALLMENTS.to_string(), PAYMENT_VALUE.to_string()],
        rows: averages
            .rows()
            .iter()
            .map(|row| {
                vec![
                    row.payment_installments.to_string(),
                    row.average_value.map(format_money).unwrap_or_default(),
                ]
            })
            .collect(),
        numeric: vec![true, true],
    }
}

fn installments_chart(averages: &AverageByInstallments) -> LineChart {
    // groups with no values have no point to plot
    let data = averages
        .rows()
        .iter()
        .filter_map(|row| {
            row.average_value.map(|average| PointDatum {
                x: row.payment_installments,
                y: to_f64(average),
                y_label: format_money(average),
            })
        })
        .collect::<Vec<_>>();
    LineChart::new(
        Axes {
            title: "Average Order Value by Payment Installments".to_string(),
            x_label: "Payment Installments".to_string(),
            y_label: "Average Order Value".to_string(),
        },
        &data,
    )
}

fn conclusions() -> Vec<Conclusion> {
    vec![
        Conclusion {
            title: "Total Revenue by Payment Type".to_string(),
            body: "Credit cards contribute the highest to total revenue, followed by boleto."
                .to_string(),
        },
        Conclusion {
            title: "Installments and Order Value".to_string(),
            body: "Higher installments tend to be associated with higher average order values."
                .to_string(),
        },
    ]
}

pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PaymentRecord;

    #[test]
    fn sections_follow_fixed_order() {
        let page = render_dashboard(&Dataset::default()).expect("render");
        let kinds = page
            .sections
            .iter()
            .map(|section| match section {
                Section::Heading { .. } => "heading",
                Section::Subheading { .. } => "subheading",
                Section::Table(_) => "table",
                Section::BarChart(_) => "bar_chart",
                Section::LineChart(_) => "line_chart",
                Section::Conclusions { .. } => "conclusions",
            })
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                "heading",
                "subheading",
                "table",
                "bar_chart",
                "subheading",
                "table",
                "line_chart",
                "subheading",
                "conclusions",
            ]
        );
        assert_eq!(page.title, PAGE_TITLE);
    }

    #[test]
    fn tables_show_two_decimal_money() {
        let dataset: Dataset = [
            PaymentRecord::new("credit_card", 1, Decimal::new(10005, 2)),
            PaymentRecord::new("credit_card", 1, Decimal::from(50)),
        ]
        .into_iter()
        .collect();
        let page = render_dashboard(&dataset).expect("render");
        let Section::Table(revenue) = &page.sections[2] else {
            panic!("expected revenue table");
        };
        assert_eq!(revenue.headers, vec!["payment_type", "payment_value"]);
        assert_eq!(revenue.rows, vec![vec!["credit_card", "150.05"]]);
        let Section::Table(averages) = &page.sections[5] else {
            panic!("expected installments table");
        };
        assert_eq!(averages.rows, vec![vec!["1", "75.02"]]);
    }

    #[test]
    fn groups_without_values_show_blank_average_and_no_point() {
        let dataset: Dataset = [
            PaymentRecord::new("boleto", 1, Decimal::from(10)),
            PaymentRecord {
                payment_type: Some("voucher".to_string()),
                payment_installments: Some(4),
                payment_value: None,
            },
        ]
        .into_iter()
        .collect();
        let page = render_dashboard(&dataset).expect("render");
        let Section::Table(averages) = &page.sections[5] else {
            panic!("expected installments table");
        };
        assert_eq!(averages.rows, vec![vec!["1", "10.00"], vec!["4", ""]]);
        let Section::LineChart(chart) = &page.sections[6] else {
            panic!("expected installments chart");
        };
        assert_eq!(chart.markers.len(), 1);
    }

    #[test]
    fn overflow_surfaces_as_error() {
        let dataset: Dataset = [
            PaymentRecord::new("boleto", 1, Decimal::MAX),
            PaymentRecord::new("boleto", 1, Decimal::MAX),
        ]
        .into_iter()
        .collect();
        assert!(matches!(
            render_dashboard(&dataset),
            Err(AggregateError::Overflow { .. })
        ));
    }

    #[test]
    fn money_rounds_half_to_even_at_two_places() {
        assert_eq!(format_money(Decimal::new(12345, 3)), "12.34");
        assert_eq!(format_money(Decimal::from(7)), "7.00");
    }
}
