//! Category scorecard used by `enhance`.
//!
//! Every category a kind's rule set covers starts at the configured baseline
//! and loses a per-severity penalty for each finding, floored at zero. The
//! overall percentage is the mean category score over the baseline.

use crate::artifact::ArtifactKind;
use crate::config::ScoringConfig;
use crate::finding::{ArtifactReport, Category, Finding, Severity};
use crate::rules;

/// Findings listed per recommended category.
const ACTIONS_PER_CATEGORY: usize = 3;

#[derive(Debug, Clone, serde::Serialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u32,
    pub max: u32,
    pub findings: Vec<Finding>,
}

/// A low-scoring category with up to three critical/warning findings to act on.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Recommendation {
    pub category: Category,
    pub score: u32,
    pub actions: Vec<Finding>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct Scorecard {
    pub kind: ArtifactKind,
    pub identity: String,
    pub categories: Vec<CategoryScore>,
    pub percentage: u32,
    pub grade: char,
    pub recommendations: Vec<Recommendation>,
    pub has_critical: bool,
    pub passed: bool,
}

impl Scorecard {
    pub fn from_report(report: &ArtifactReport, scoring: &ScoringConfig) -> Scorecard {
        let categories: Vec<CategoryScore> = rules::rule_set(report.kind)
            .categories()
            .into_iter()
            .map(|category| {
                let findings: Vec<Finding> = report
                    .findings
                    .iter()
                    .filter(|f| f.category == category)
                    .cloned()
                    .collect();
                let penalty = findings
                    .iter()
                    .fold(0u32, |acc, f| acc.saturating_add(scoring.penalty(f.severity)));
                CategoryScore {
                    category,
                    score: scoring.baseline.saturating_sub(penalty),
                    max: scoring.baseline,
                    findings,
                }
            })
            .collect();

        let percentage = percentage(&categories, scoring.baseline);
        let has_critical = report.findings.iter().any(|f| f.severity == Severity::Critical);

        let mut low: Vec<&CategoryScore> = categories
            .iter()
            .filter(|c| c.score < scoring.recommend_below)
            .collect();
        low.sort_by_key(|c| c.score);
        let recommendations = low
            .into_iter()
            .map(|c| Recommendation {
                category: c.category,
                score: c.score,
                actions: c
                    .findings
                    .iter()
                    .filter(|f| matches!(f.severity, Severity::Critical | Severity::Warning))
                    .take(ACTIONS_PER_CATEGORY)
                    .cloned()
                    .collect(),
            })
            .collect();

        Scorecard {
            kind: report.kind,
            identity: report.identity.clone(),
            categories,
            percentage,
            grade: grade(percentage),
            recommendations,
            has_critical,
            passed: !has_critical && percentage >= scoring.pass_threshold,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

fn percentage(categories: &[CategoryScore], baseline: u32) -> u32 {
    if categories.is_empty() || baseline == 0 {
        return 100;
    }
    let total: f64 = categories.iter().map(|c| f64::from(c.score)).sum();
    let max = f64::from(baseline) * categories.len() as f64;
    ((total / max) * 100.0).round() as u32
}

/// Letter grade for an overall percentage.
pub fn grade(percentage: u32) -> char {
    match percentage {
        80.. => 'A',
        70..=79 => 'B',
        60..=69 => 'C',
        50..=59 => 'D',
        _ => 'F',
    }
}
