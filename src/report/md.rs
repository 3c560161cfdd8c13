use crate::types::report::NationReport;

pub fn to_markdown(report: &NationReport) -> String {
    let mut output = String::new();
    output.push_str("# National Index Report\n\n");
    output.push_str(&format!(
        "Total GDP: {} ({} {})\n\n",
        report.gdp.total_gdp, report.classification.icon, report.classification.classification
    ));

    output.push_str("## Components\n\n");
    output.push_str(&format!(
        "- base_gdp: {}\n- growth_bonus: {}\n- streak_bonus: {}\n- diversity_bonus: {}\n- growth_rate: {:.1}%\n\n",
        report.gdp.base_gdp,
        report.gdp.growth_bonus,
        report.gdp.streak_bonus,
        report.gdp.diversity_bonus,
        report.gdp.growth_rate
    ));

    output.push_str("## Sectors\n\n");
    if report.sectors.is_empty() {
        output.push_str("- none\n\n");
    } else {
        for sector in &report.sectors {
            let state = if sector.is_unlocked {
                "unlocked"
            } else if sector.required_level > report.user.current_level {
                "locked"
            } else {
                "available"
            };
            let score = sector
                .score
                .map_or_else(|| "-".to_string(), |score| score.to_string());
            output.push_str(&format!(
                "- [{}] {} (weight {:.2}): {}\n",
                state,
                sector.key,
                f64::from(sector.weight) / 100.0,
                score
            ));
        }
        output.push('\n');
    }

    output.push_str("## Next Level\n\n");
    match &report.next_level {
        Some(requirements) => output.push_str(&format!(
            "- level {}: gdp >= {}, average score >= {:.0} (current average {:.1}). {}\n",
            requirements.next_level,
            requirements.required_gdp,
            requirements.required_avg_score,
            report.average_score,
            requirements.additional_requirements
        )),
        None => output.push_str("- maximum level reached\n"),
    }

    output
}
