use crate::types::report::NationReport;

pub fn to_json(report: &NationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
