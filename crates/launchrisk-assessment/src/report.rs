//! Human-readable mission report.
//!
//! One Markdown document per (company, rocket) request, named
//! `mission_report_{company}_{rocket}.md` with both names reduced to
//! file-name-safe slugs.

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};

use crate::{assessment::RiskAssessment, projection::Projection};

/// Everything rendered into a report.
#[derive(Debug, Clone, Copy)]
pub struct MissionReport<'a> {
    pub company: &'a str,
    pub rocket: &'a str,
    pub launch_year: i32,
    pub location: &'a str,
    pub assessment: &'a RiskAssessment,
    pub projection: Option<&'a Projection>,
    pub warnings: &'a [String],
    pub model_version: &'a str,
    pub generated_at: DateTime<Utc>,
}

/// Lowercase ASCII alphanumerics, with every other run collapsed to `_`.
#[must_use]
pub fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("unnamed");
    }
    slug
}

impl MissionReport<'_> {
    #[must_use]
    pub fn file_name(&self) -> String {
        format!(
            "mission_report_{}_{}.md",
            slug(self.company),
            slug(self.rocket)
        )
    }

    /// Writes the report into `dir` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory or file cannot be written.
    pub fn write_to<P>(&self, dir: P) -> io::Result<PathBuf>
    where
        P: AsRef<Path>,
    {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());
        fs::write(&path, self.to_string())?;
        Ok(path)
    }
}

impl fmt::Display for MissionReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assessment = self.assessment;
        writeln!(f, "# Mission Risk Report")?;
        writeln!(f)?;
        writeln!(f, "| Field | Value |")?;
        writeln!(f, "|---|---|")?;
        writeln!(f, "| Organization | {} |", self.company)?;
        writeln!(f, "| Rocket | {} |", self.rocket)?;
        writeln!(f, "| Launch Year | {} |", self.launch_year)?;
        writeln!(f, "| Launch Site | {} |", self.location)?;
        writeln!(f, "| Predicted Risk | {:.2}% |", assessment.probability_percent)?;
        writeln!(f, "| Confidence | {} |", assessment.confidence_tier)?;
        writeln!(f, "| Risk Level | {} |", assessment.risk_level)?;
        if let Some(driver) = assessment.top_driver_feature {
            writeln!(f, "| Top Model Driver | `{driver}` |")?;
        }

        writeln!(f, "\n## Explanation\n")?;
        writeln!(
            f,
            "{} risk because {}.",
            assessment.risk_level, assessment.explanation_text
        )?;

        if let Some(projection) = self.projection {
            writeln!(f, "\n## Scenario Projection\n")?;
            writeln!(f, "- Planned missions: {}", projection.planned_missions)?;
            writeln!(f, "- Cost per mission: ${:.2}M", projection.cost_per_mission)?;
            writeln!(f, "- Expected failures: {:.2}", projection.expected_failures)?;
            writeln!(
                f,
                "- Expected financial loss: ${:.2}M",
                projection.expected_financial_loss
            )?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "\n## Warnings\n")?;
            for warning in self.warnings {
                writeln!(f, "- {warning}")?;
            }
        }

        writeln!(f, "\n---\n")?;
        writeln!(
            f,
            "Model {}, generated {}",
            self.model_version,
            self.generated_at.to_rfc3339()
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::{explanation::RiskLevel, projection, scorer::ConfidenceTier};

    fn assessment() -> RiskAssessment {
        RiskAssessment {
            probability_percent: 12.5,
            confidence_tier: ConfidenceTier::High,
            risk_level: RiskLevel::Low,
            explanation_text: "historical performance is strong".to_owned(),
            top_driver_feature: None,
        }
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("SpaceX"), "spacex");
        assert_eq!(slug("Falcon 9 Block 5"), "falcon_9_block_5");
        assert_eq!(slug("  Ariane/5 ECA  "), "ariane_5_eca");
        assert_eq!(slug("../"), "unnamed");
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let assessment = assessment();
        let projection = projection::project(12.5, 10.0, 50.0).unwrap();
        let warnings = vec!["launch year 2040 is beyond the historical data".to_owned()];
        let report = MissionReport {
            company: "SpaceX",
            rocket: "Falcon 9",
            launch_year: 2040,
            location: "LC-39A, Kennedy Space Center, Florida, USA",
            assessment: &assessment,
            projection: Some(&projection),
            warnings: &warnings,
            model_version: "v1.0.0",
            generated_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
        };

        let path = report.write_to(dir.path().join("reports")).unwrap();
        assert!(path.ends_with("reports/mission_report_spacex_falcon_9.md"));

        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains("| Organization | SpaceX |"));
        assert!(text.contains("| Predicted Risk | 12.50% |"));
        assert!(text.contains("- Expected financial loss: $62.50M"));
        assert!(text.contains("| Confidence | High |"));
        assert!(text.contains("Low risk because historical performance is strong."));
        assert!(text.contains("## Scenario Projection"));
        assert!(text.contains("## Warnings"));
    }
}
