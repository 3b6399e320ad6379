pub mod document;
pub mod fallback;
pub mod llm;
pub mod prompt;

pub use document::ReportDocument;
pub use fallback::{fallback_report, top_contributors, top_repositories};
pub use llm::LlmComposer;

use crate::error::Result;
use tracing::{info, warn};

/// Something that turns a report document into prose.
pub trait ReportComposer {
    fn compose(&self, doc: &ReportDocument) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Deterministic composer backed by the templated report.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateComposer;

impl ReportComposer for TemplateComposer {
    fn compose(&self, doc: &ReportDocument) -> Result<String> {
        Ok(fallback_report(doc))
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

/// Runs a composer and substitutes the templated report when it fails.
pub struct ReportGenerator {
    composer: Box<dyn ReportComposer>,
}

impl ReportGenerator {
    pub fn new(composer: Box<dyn ReportComposer>) -> Self {
        Self { composer }
    }

    /// Never fails: composition errors are logged and replaced.
    pub fn generate(&self, doc: &ReportDocument) -> String {
        match self.composer.compose(doc) {
            Ok(report) => {
                info!(
                    composer = self.composer.name(),
                    chars = report.chars().count(),
                    "report composed"
                );
                report
            }
            Err(e) => {
                warn!(
                    composer = self.composer.name(),
                    error = %e,
                    "report generation failed, using fallback report"
                );
                fallback_report(doc)
            }
        }
    }
}
