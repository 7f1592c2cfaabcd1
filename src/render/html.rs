use log::debug;
use tera::{Context, Tera};

use crate::{error::RenderError, page::Page};

const TEMPLATE_NAME: &str = "dashboard.html";
const TEMPLATE: &str = include_str!("../../templates/dashboard.html.tera");

/// Renders the dashboard as a standalone HTML document with inline SVG
/// charts. Text from the data is HTML-escaped.
pub struct HtmlRenderer {
    tera: Tera,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, TEMPLATE)?;
        Ok(Self { tera })
    }

    pub fn render(&self, page: &Page) -> Result<String, RenderError> {
        let mut context = Context::new();
        context.insert("page", page);
        let html = self.tera.render(TEMPLATE_NAME, &context)?;
        debug!(
            "Rendered {} section(s) into {} byte(s) of HTML",
            page.sections.len(),
            html.len()
        );
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dataset::{Dataset, PaymentRecord},
        page,
    };
    use rust_decimal::Decimal;

    fn render(dataset: &Dataset) -> String {
        HtmlRenderer::new()
            .expect("template compiles")
            .render(&page::render_dashboard(dataset).expect("aggregate"))
            .expect("render")
    }

    #[test]
    fn payment_types_are_escaped() {
        let dataset: Dataset = [PaymentRecord::new("<script>", 1, Decimal::from(5))]
            .into_iter()
            .collect();
        let html = render(&dataset);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_dataset_renders_axes_without_marks() {
        let html = render(&Dataset::default());
        assert!(html.contains("<title>Payment Type Analysis</title>"));
        assert!(!html.contains("class=\"bar\""));
        assert!(!html.contains("<polyline"));
        assert!(html.contains("class=\"axis\""));
    }
}
