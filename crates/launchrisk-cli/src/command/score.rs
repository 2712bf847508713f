use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use launchrisk_assessment::{
    AuditEntry, AuditLog, MissionReport, Projection, RiskAssessment, assess, project,
};
use launchrisk_features::Scenario;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    command::drivers::{self, DEFAULT_SAMPLE_SIZE},
    config::Config,
    stage,
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ScoreArg {
    /// Launching organization, as named in the launch data
    #[arg(long)]
    company: String,
    /// Rocket, as named in the launch data
    #[arg(long)]
    rocket: String,
    /// Planned launch year
    #[arg(long)]
    year: i32,
    /// Launch site (defaults to the pair's most recent site)
    #[arg(long)]
    location: Option<String>,
    /// Planned missions for the scenario projection
    #[arg(long, default_value_t = 10)]
    missions: u32,
    /// Cost per mission in millions of USD
    #[arg(long, default_value_t = 50.0)]
    cost: f64,
    /// Also write a Markdown report into the report directory
    #[arg(long)]
    report: bool,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
    /// Write JSON to this file instead of stdout
    #[arg(long, requires = "json")]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ScoreOutput {
    scenario: Scenario,
    location: String,
    pair_launch_count: usize,
    assessment: RiskAssessment,
    projection: Projection,
    warnings: Vec<String>,
    model_version: String,
    report: Option<PathBuf>,
}

pub(crate) fn score(config: &Config, arg: &ScoreArg) -> anyhow::Result<ScoreOutput> {
    let (artifacts, model) = stage::load_artifacts(config)?;

    let top_driver = match drivers::rank(config, &model.model, DEFAULT_SAMPLE_SIZE) {
        Ok((_, ranking)) => ranking.first().map(|i| i.feature),
        Err(err) => {
            warn!("top driver unavailable: {err:#}");
            None
        }
    };

    let mut scenario = Scenario::new(&arg.company, &arg.rocket, arg.year);
    if let Some(location) = &arg.location {
        scenario = scenario.with_location(location);
    }
    let outcome = assess(&artifacts, &model.model, &scenario, top_driver).with_context(|| {
        format!(
            "Refusing to score {} / {} in {}",
            arg.company, arg.rocket, arg.year
        )
    })?;
    let projection = project(
        outcome.assessment.probability_percent,
        f64::from(arg.missions),
        arg.cost,
    )?;
    let warnings = outcome
        .warnings()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    let audit = AuditLog::new(&config.paths.audit_log);
    audit.append(&AuditEntry::new(
        Utc::now(),
        &arg.company,
        &arg.rocket,
        arg.year,
        outcome.assessment.probability_percent,
        &model.version,
    ))?;

    let report = if arg.report {
        let report = MissionReport {
            company: &arg.company,
            rocket: &arg.rocket,
            launch_year: arg.year,
            location: &outcome.features.location,
            assessment: &outcome.assessment,
            projection: Some(&projection),
            warnings: &warnings,
            model_version: &model.version,
            generated_at: Utc::now(),
        };
        let path = report.write_to(&config.paths.report_dir).with_context(|| {
            format!(
                "Failed to write report into {}",
                config.paths.report_dir.display()
            )
        })?;
        info!(path = %path.display(), "wrote mission report");
        Some(path)
    } else {
        None
    };

    info!(
        company = %arg.company,
        rocket = %arg.rocket,
        year = arg.year,
        risk_percent = outcome.assessment.probability_percent,
        confidence = %outcome.assessment.confidence_tier,
        "scored scenario"
    );
    Ok(ScoreOutput {
        location: outcome.features.location,
        pair_launch_count: outcome.features.pair_launch_count,
        assessment: outcome.assessment,
        scenario,
        projection,
        warnings,
        model_version: model.version,
        report,
    })
}

pub(crate) fn run(config: &Config, arg: &ScoreArg) -> anyhow::Result<()> {
    let output = score(config, arg)?;
    if arg.json {
        return Output::save_json(&output, arg.output.clone());
    }

    let assessment = &output.assessment;
    println!("{} / {} in {}", arg.company, arg.rocket, arg.year);
    println!("  Launch site:          {}", output.location);
    println!("  Failure probability:  {:.2}%", assessment.probability_percent);
    println!(
        "  Confidence:           {} ({} historical launches)",
        assessment.confidence_tier, output.pair_launch_count
    );
    println!(
        "  {} risk because {}",
        assessment.risk_level, assessment.explanation_text
    );
    if let Some(driver) = assessment.top_driver_feature {
        println!("  Top model driver:     {driver}");
    }
    println!(
        "  Projection:           {:.2} expected failures of {}, ${:.2}M expected loss",
        output.projection.expected_failures, arg.missions, output.projection.expected_financial_loss
    );
    for warning in &output.warnings {
        println!("  Warning: {warning}");
    }
    if let Some(path) = &output.report {
        println!("  Report: {}", path.display());
    }
    Ok(())
}
