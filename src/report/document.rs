//! Customer documents - price quotation and order confirmation

use chrono::NaiveDate;
use rust_embed::Embed;
use tera::Tera;
use thiserror::Error;

use crate::core::config::CompanyInfo;
use crate::report::summary::JobSummary;

#[derive(Embed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Which document to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Quotation,
    Confirmation,
}

impl DocumentKind {
    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "Price Quotation",
            DocumentKind::Confirmation => "Order Confirmation",
        }
    }

    fn template_name(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "quotation.md.tera",
            DocumentKind::Confirmation => "confirmation.md.tera",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Template rendering error: {0}")]
    RenderError(String),
}

/// Turns a job summary into a printable document
pub trait DocumentRenderer {
    fn render(
        &self,
        kind: DocumentKind,
        summary: &JobSummary,
        company: &CompanyInfo,
        date: NaiveDate,
    ) -> Result<String, DocumentError>;
}

/// Markdown documents from the embedded Tera templates
pub struct TeraRenderer {
    tera: Tera,
}

impl TeraRenderer {
    pub fn new() -> Result<Self, DocumentError> {
        let mut tera = Tera::default();

        for file in EmbeddedTemplates::iter() {
            let filename = file.as_ref();
            if let Some(content) = EmbeddedTemplates::get(filename) {
                if let Ok(template_str) = std::str::from_utf8(&content.data) {
                    tera.add_raw_template(filename, template_str)
                        .map_err(|e| DocumentError::RenderError(e.to_string()))?;
                }
            }
        }

        Ok(Self { tera })
    }

    /// Renderer that only knows the built-in layouts
    pub fn without_templates() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    fn context(summary: &JobSummary, company: &CompanyInfo, date: NaiveDate) -> tera::Context {
        let money = |v: Option<f64>| v.map(|v| format!("${:.2}", v)).unwrap_or_else(|| "n/a".to_string());
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        let mut context = tera::Context::new();
        context.insert("job_number", &summary.job_number);
        context.insert("description", &summary.description);
        context.insert("drawing", &summary.drawing);
        context.insert("client", &summary.client);
        context.insert("client_address", &summary.client_address);
        context.insert("client_phone", &summary.client_phone);
        context.insert("quantity", &summary.quantity);
        context.insert("unit_price", &money(summary.unit_price));
        context.insert("total", &money(summary.total));
        context.insert(
            "delivery_date",
            &summary.delivery_date.map(|d| d.to_string()).unwrap_or_default(),
        );
        context.insert("date", &date.format("%Y-%m-%d").to_string());
        context.insert("company_name", &text(&company.name));
        context.insert("company_address", &text(&company.address));
        context.insert("company_phone", &text(&company.phone));
        context.insert("signatory", &text(&company.signatory));
        context
    }

    fn hardcoded(kind: DocumentKind, summary: &JobSummary, company: &CompanyInfo, date: NaiveDate) -> String {
        let drawing = if summary.drawing.is_empty() {
            String::new()
        } else {
            format!(" according to drawing {}", summary.drawing)
        };
        let body = match kind {
            DocumentKind::Quotation => format!(
                "Here is our quotation for {}{}.\n\nPrice: {} each\nQuantity: {}\nTotal: {}\n",
                summary.description,
                drawing,
                summary
                    .unit_price
                    .map(|p| format!("${:.2}", p))
                    .unwrap_or_else(|| "n/a".to_string()),
                summary.quantity,
                summary
                    .total
                    .map(|t| format!("${:.2}", t))
                    .unwrap_or_else(|| "n/a".to_string()),
            ),
            DocumentKind::Confirmation => format!(
                "We confirm your order {} for {}{}.\n",
                summary.job_number, summary.description, drawing
            ),
        };
        format!(
            "# {}\n\nJob: {}\nDate: {}\nClient: {}\nSupplier: {}\n\nDear {},\n\n{}\nRegards,\n\n{}\n",
            kind.title(),
            summary.job_number,
            date.format("%Y-%m-%d"),
            summary.client,
            company.name.clone().unwrap_or_default(),
            summary.client,
            body,
            company.signatory.clone().unwrap_or_default(),
        )
    }
}

impl DocumentRenderer for TeraRenderer {
    fn render(
        &self,
        kind: DocumentKind,
        summary: &JobSummary,
        company: &CompanyInfo,
        date: NaiveDate,
    ) -> Result<String, DocumentError> {
        let name = kind.template_name();
        if self.tera.get_template_names().any(|n| n == name) {
            self.tera
                .render(name, &Self::context(summary, company, date))
                .map_err(|e| DocumentError::RenderError(e.to_string()))
        } else {
            Ok(Self::hardcoded(kind, summary, company, date))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::job::Job;

    fn summary() -> JobSummary {
        let mut job = Job::new("123431", "test").unwrap();
        job.description = "titanium rings".to_string();
        job.client = "MachinMachine".to_string();
        job.drawing = "beignes_001293_revA".to_string();
        job.quantity = 1000;
        job.unit_price = Some(1000.0);
        JobSummary::from_job(&job)
    }

    fn company() -> CompanyInfo {
        CompanyInfo {
            name: Some("SuperShop".to_string()),
            address: Some("123 Rue des colonnes".to_string()),
            phone: Some("(450) 123-1234".to_string()),
            signatory: Some("Patrick Touchette".to_string()),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, 1).unwrap()
    }

    #[test]
    fn test_embedded_templates_load() {
        let renderer = TeraRenderer::new().unwrap();
        let names: Vec<_> = renderer.tera.get_template_names().collect();
        assert!(names.contains(&"quotation.md.tera"));
        assert!(names.contains(&"confirmation.md.tera"));
    }

    #[test]
    fn test_quotation_has_pricing() {
        let renderer = TeraRenderer::new().unwrap();
        let doc = renderer
            .render(DocumentKind::Quotation, &summary(), &company(), date())
            .unwrap();
        assert!(doc.starts_with("# Price Quotation"));
        assert!(doc.contains("$1000.00 each"));
        assert!(doc.contains("$1000000.00"));
        assert!(doc.contains("according to drawing beignes_001293_revA"));
        assert!(doc.contains("**Supplier:** SuperShop"));
        assert!(doc.contains("Patrick Touchette"));
    }

    #[test]
    fn test_confirmation_references_order() {
        let renderer = TeraRenderer::new().unwrap();
        let doc = renderer
            .render(DocumentKind::Confirmation, &summary(), &company(), date())
            .unwrap();
        assert!(doc.starts_with("# Order Confirmation"));
        assert!(doc.contains("We confirm your order 123431 for titanium rings"));
        assert!(!doc.contains("each"));
    }

    #[test]
    fn test_hardcoded_fallback() {
        let renderer = TeraRenderer::without_templates();
        let doc = renderer
            .render(DocumentKind::Confirmation, &summary(), &CompanyInfo::default(), date())
            .unwrap();
        assert!(doc.starts_with("# Order Confirmation\n\nJob: 123431\nDate: 2018-01-01\n"));
        assert!(doc.contains(
            "We confirm your order 123431 for titanium rings according to drawing beignes_001293_revA."
        ));
    }
}
