use std::fmt::Write as _;

use crate::{
    chart::{BarChart, LineChart},
    page::{Page, Section},
    table,
};

const PLOT_WIDTH: usize = 40;
const BAR_GLYPH: char = '█';
const MARKER_GLYPH: char = '●';

/// Renders the page for a terminal: aligned tables, a block bar chart and a
/// dot plot standing in for the line chart.
pub fn render(page: &Page) -> String {
    let mut output = String::new();
    for section in &page.sections {
        match section {
            Section::Heading { text } => {
                let _ = writeln!(output, "{text}\n{}\n", "=".repeat(text.chars().count()));
            }
            Section::Subheading { text } => {
                let _ = writeln!(output, "{text}\n{}\n", "-".repeat(text.chars().count()));
            }
            Section::Table(view) => {
                let _ = writeln!(output, "{}", table::render_table(view));
            }
            Section::BarChart(chart) => output.push_str(&bar_chart(chart)),
            Section::LineChart(chart) => output.push_str(&line_chart(chart)),
            Section::Conclusions { items } => {
                for (idx, item) in items.iter().enumerate() {
                    let _ = writeln!(output, "{}. {}: {}", idx + 1, item.title, item.body);
                }
            }
        }
    }
    output
}

fn bar_chart(chart: &BarChart) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", chart.axes.title);
    let label_width = chart
        .bars
        .iter()
        .map(|bar| table::display_width(&bar.label))
        .max()
        .unwrap_or(0)
        .max(table::display_width(&chart.axes.y_label));
    let _ = writeln!(
        output,
        "{:<label_width$} | {}",
        chart.axes.y_label, chart.axes.x_label
    );

    let max = chart.max_value();
    for bar in &chart.bars {
        let length = if max > 0.0 {
            (bar.value.max(0.0) / max * PLOT_WIDTH as f64).round() as usize
        } else {
            0
        };
        let padding = label_width.saturating_sub(table::display_width(&bar.label));
        let _ = writeln!(
            output,
            "{}{} | {} {}",
            bar.label,
            " ".repeat(padding),
            BAR_GLYPH.to_string().repeat(length),
            bar.value_label
        );
    }
    output.push('\n');
    output
}

fn line_chart(chart: &LineChart) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", chart.axes.title);
    let label_width = chart
        .markers
        .iter()
        .map(|m| m.x_value.to_string().len())
        .max()
        .unwrap_or(0)
        .max(table::display_width(&chart.axes.x_label));
    let _ = writeln!(
        output,
        "{:<label_width$} | {}",
        chart.axes.x_label, chart.axes.y_label
    );

    let (lo, hi) = chart
        .markers
        .iter()
        .map(|m| m.y_value)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let span = hi - lo;
    for marker in &chart.markers {
        let offset = if span > 0.0 {
            ((marker.y_value - lo) / span * (PLOT_WIDTH - 1) as f64).round() as usize
        } else {
            PLOT_WIDTH / 2
        };
        let _ = writeln!(
            output,
            "{:>label_width$} | {}{} {}",
            marker.x_value,
            " ".repeat(offset),
            MARKER_GLYPH,
            marker.y_label
        );
    }
    output.push('\n');
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::{Dataset, PaymentRecord},
        page,
    };
    use rust_decimal::Decimal;

    fn scenario() -> Dataset {
        [
            PaymentRecord::new("credit_card", 1, Decimal::from(100)),
            PaymentRecord::new("boleto", 3, Decimal::from(50)),
            PaymentRecord::new("credit_card", 1, Decimal::from(50)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn bars_scale_to_largest_total() {
        let text = render(&page::render_dashboard(&scenario()).expect("aggregate"));
        let full = BAR_GLYPH.to_string().repeat(PLOT_WIDTH);
        let third = BAR_GLYPH.to_string().repeat(13);
        assert!(text.contains(&format!("credit_card  | {full} 150.00")), "{text}");
        assert!(text.contains(&format!("boleto       | {third} 50.00")), "{text}");
    }

    #[test]
    fn dot_plot_lists_installments_in_order() {
        let text = render(&page::render_dashboard(&scenario()).expect("aggregate"));
        let one = text.find("                   1 | ").expect("row for 1");
        let three = text.find("                   3 | ").expect("row for 3");
        assert!(one < three);
        assert!(text.contains("75.00"));
    }

    #[test]
    fn conclusions_are_numbered() {
        let text = render(&page::render_dashboard(&Dataset::default()).expect("aggregate"));
        assert!(text.contains("1. Total Revenue by Payment Type: Credit cards"));
        assert!(text.contains("2. Installments and Order Value: Higher installments"));
        assert!(text.contains("(no rows)"));
    }
}
