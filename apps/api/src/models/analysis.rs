//! Wire types for the AI candidate analysis returned by the recruitment backend.
//!
//! The backend speaks camelCase JSON. Enum spellings vary between backend
//! versions (English identifiers, snake_case, Spanish labels), so every enum
//! accepts the known aliases.

use serde::{Deserialize, Deserializer, Serialize};

use crate::report::ReportError;

// ────────────────────────────────────────────────────────────────────────────
// Enums
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(alias = "junior", alias = "JUNIOR")]
    Junior,
    #[serde(
        alias = "Semi-Senior",
        alias = "semi_senior",
        alias = "semi-senior",
        alias = "semisenior",
        alias = "SemiSr"
    )]
    SemiSenior,
    #[serde(alias = "senior", alias = "SENIOR")]
    Senior,
    #[serde(alias = "executive", alias = "Ejecutivo", alias = "ejecutivo")]
    Executive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchRecommendation {
    #[serde(
        alias = "highly_recommended",
        alias = "highly-recommended",
        alias = "altamente_recomendado"
    )]
    HighlyRecommended,
    #[serde(alias = "recommended", alias = "recomendado")]
    Recommended,
    #[serde(alias = "consider", alias = "considerar")]
    Consider,
    #[serde(
        alias = "not_recommended",
        alias = "not-recommended",
        alias = "no_recomendado"
    )]
    NotRecommended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[serde(alias = "Critical", alias = "CRITICAL")]
    Critical,
    #[serde(alias = "High", alias = "HIGH")]
    High,
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub overall_score: f64,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    #[serde(default)]
    pub highlighted_skills: Vec<String>,
    #[serde(default)]
    pub development_recommendations: Vec<String>,
    #[serde(default)]
    pub final_recommendation: String,
    /// Pre-sorted by the backend (matched skill count, descending).
    #[serde(default)]
    pub job_matches: Vec<JobMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiring_offers: Option<Vec<ExpiringOffer>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    #[serde(deserialize_with = "string_or_number")]
    pub job_id: String,
    pub job_title: String,
    pub compatibility_percent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_skill_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_skill_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_skills: Option<Vec<String>>,
    #[serde(default)]
    pub match_reasons: Vec<String>,
    #[serde(default)]
    pub gaps: Vec<String>,
    pub recommendation: MatchRecommendation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringOffer {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub deadline_date: String,
    pub days_remaining: i64,
    pub urgency: Urgency,
}

impl JobMatch {
    /// `"m/n"` when both skill counts are known, `"-"` otherwise.
    pub fn skill_ratio(&self) -> String {
        match (self.matched_skill_count, self.required_skill_count) {
            (Some(matched), Some(required)) => format!("{matched}/{required}"),
            _ => "-".to_string(),
        }
    }
}

impl AnalysisResult {
    /// Expiring offers, treating an absent list as empty.
    pub fn expiring_offers(&self) -> &[ExpiringOffer] {
        self.expiring_offers.as_deref().unwrap_or(&[])
    }

    /// Rejects results that break the documented invariants.
    ///
    /// The renderer relies on these: scores drive colour lookups and
    /// `daysRemaining` is printed as-is.
    pub fn validate(&self) -> Result<(), ReportError> {
        check_score("overallScore", self.overall_score)?;

        for job in &self.job_matches {
            check_score("compatibilityPercent", job.compatibility_percent)?;
            if job.matched_skill_count.is_some() != job.required_skill_count.is_some() {
                return Err(ReportError::MalformedInput(format!(
                    "job match {} has only one of matchedSkillCount/requiredSkillCount",
                    job.job_id
                )));
            }
        }

        for offer in self.expiring_offers() {
            if offer.days_remaining < 0 {
                return Err(ReportError::MalformedInput(format!(
                    "expiring offer {} already expired ({} days)",
                    offer.id, offer.days_remaining
                )));
            }
        }

        Ok(())
    }
}

fn check_score(field: &str, value: f64) -> Result<(), ReportError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ReportError::MalformedInput(format!(
            "{field} must be within 0..=100, got {value}"
        )));
    }
    Ok(())
}

/// Backend ids arrive as either JSON strings or numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(f) => f.to_string(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
