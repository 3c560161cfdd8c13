pub mod json;
pub mod md;

use crate::error::NationError;
use crate::types::report::NationReport;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(report: &NationReport, format: OutputFormat) -> Result<String, NationError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(NationError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}
