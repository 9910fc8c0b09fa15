//! Static report strings and long-date formatting per locale.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::analysis::{ExperienceLevel, MatchRecommendation};
use crate::report::tier::TierLevel;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "es" | "es-es" | "es_es" | "es-mx" | "spanish" => Ok(Locale::Es),
            "en" | "en-us" | "en_us" | "en-gb" | "english" => Ok(Locale::En),
            other => Err(format!("unsupported report locale '{other}'")),
        }
    }
}

/// Every fixed string printed on the report.
pub struct Labels {
    locale: Locale,
    pub report_title: &'static str,
    pub report_subtitle: &'static str,
    pub candidate_id: &'static str,
    pub experience_level: &'static str,
    pub overall_score: &'static str,
    pub expiring_offers: &'static str,
    pub executive_summary: &'static str,
    pub strengths: &'static str,
    pub improvement_areas: &'static str,
    pub highlighted_skills: &'static str,
    pub job_matches: &'static str,
    pub development_recommendations: &'static str,
    pub final_recommendation: &'static str,
    pub conclusion: &'static str,
    pub none_available: &'static str,
    pub column_index: &'static str,
    pub column_position: &'static str,
    pub column_skills: &'static str,
    pub column_compatibility: &'static str,
    pub column_recommendation: &'static str,
    pub page: &'static str,
    pub page_of: &'static str,
    pub confidential: &'static str,
    pub days_remaining: &'static str,
    pub day_remaining: &'static str,
    pub best_match: &'static str,
    months: [&'static str; 12],
}

static ES: Labels = Labels {
    locale: Locale::Es,
    report_title: "Evaluación de Candidato con IA",
    report_subtitle: "Informe de análisis de perfil profesional",
    candidate_id: "ID del candidato",
    experience_level: "Nivel de experiencia",
    overall_score: "Puntuación general",
    expiring_offers: "Ofertas compatibles por vencer",
    executive_summary: "Resumen ejecutivo",
    strengths: "Fortalezas",
    improvement_areas: "Áreas de mejora",
    highlighted_skills: "Habilidades destacadas",
    job_matches: "Compatibilidad con ofertas",
    development_recommendations: "Recomendaciones de desarrollo",
    final_recommendation: "Recomendación final",
    conclusion: "Conclusión",
    none_available: "Sin información disponible",
    column_index: "#",
    column_position: "Puesto",
    column_skills: "Habilidades",
    column_compatibility: "Compatibilidad",
    column_recommendation: "Recomendación",
    page: "Página",
    page_of: "de",
    confidential: "Documento confidencial",
    days_remaining: "días restantes",
    day_remaining: "día restante",
    best_match: "Mejor coincidencia",
    months: [
        "enero",
        "febrero",
        "marzo",
        "abril",
        "mayo",
        "junio",
        "julio",
        "agosto",
        "septiembre",
        "octubre",
        "noviembre",
        "diciembre",
    ],
};

static EN: Labels = Labels {
    locale: Locale::En,
    report_title: "AI Candidate Evaluation",
    report_subtitle: "Professional profile analysis report",
    candidate_id: "Candidate ID",
    experience_level: "Experience level",
    overall_score: "Overall score",
    expiring_offers: "Matching offers about to expire",
    executive_summary: "Executive summary",
    strengths: "Strengths",
    improvement_areas: "Improvement areas",
    highlighted_skills: "Highlighted skills",
    job_matches: "Job compatibility",
    development_recommendations: "Development recommendations",
    final_recommendation: "Final recommendation",
    conclusion: "Conclusion",
    none_available: "No information available",
    column_index: "#",
    column_position: "Position",
    column_skills: "Skills",
    column_compatibility: "Compatibility",
    column_recommendation: "Recommendation",
    page: "Page",
    page_of: "of",
    confidential: "Confidential document",
    days_remaining: "days remaining",
    day_remaining: "day remaining",
    best_match: "Best match",
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
};

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::Es => &ES,
            Locale::En => &EN,
        }
    }
}

impl Labels {
    fn is_spanish(&self) -> bool {
        self.locale == Locale::Es
    }

    /// "16 de octubre de 2026" / "October 16, 2026".
    pub fn long_date(&self, date: NaiveDate) -> String {
        let month = self.months[date.month0() as usize];
        if self.is_spanish() {
            format!("{} de {} de {}", date.day(), month, date.year())
        } else {
            format!("{} {}, {}", month, date.day(), date.year())
        }
    }

    pub fn tier(&self, level: TierLevel) -> &'static str {
        match (self.is_spanish(), level) {
            (true, TierLevel::Excellent) => "Excelente",
            (true, TierLevel::Good) => "Bueno",
            (true, TierLevel::Fair) => "Regular",
            (true, TierLevel::Low) => "Bajo",
            (false, TierLevel::Excellent) => "Excellent",
            (false, TierLevel::Good) => "Good",
            (false, TierLevel::Fair) => "Fair",
            (false, TierLevel::Low) => "Low",
        }
    }

    pub fn experience(&self, level: ExperienceLevel) -> &'static str {
        match (self.is_spanish(), level) {
            (_, ExperienceLevel::Junior) => "Junior",
            (_, ExperienceLevel::SemiSenior) => "Semi-Senior",
            (_, ExperienceLevel::Senior) => "Senior",
            (true, ExperienceLevel::Executive) => "Ejecutivo",
            (false, ExperienceLevel::Executive) => "Executive",
        }
    }

    pub fn recommendation(&self, recommendation: MatchRecommendation) -> &'static str {
        match (self.is_spanish(), recommendation) {
            (true, MatchRecommendation::HighlyRecommended) => "Altamente recomendado",
            (true, MatchRecommendation::Recommended) => "Recomendado",
            (true, MatchRecommendation::Consider) => "Considerar",
            (true, MatchRecommendation::NotRecommended) => "No recomendado",
            (false, MatchRecommendation::HighlyRecommended) => "Highly recommended",
            (false, MatchRecommendation::Recommended) => "Recommended",
            (false, MatchRecommendation::Consider) => "Consider",
            (false, MatchRecommendation::NotRecommended) => "Not recommended",
        }
    }

    /// "Página 2 de 5" / "Page 2 of 5".
    pub fn page_counter(&self, page: usize, total: usize) -> String {
        format!("{} {page} {} {total}", self.page, self.page_of)
    }

    /// Opening sentence of the conclusion panel.
    pub fn verdict(
        &self,
        name: &str,
        score: &str,
        tier: TierLevel,
        level: ExperienceLevel,
    ) -> String {
        if self.is_spanish() {
            format!(
                "{name} obtiene una puntuación general de {score} ({}) con un perfil {}.",
                self.tier(tier),
                self.experience(level)
            )
        } else {
            format!(
                "{name} reaches an overall score of {score} ({}) with a {} profile.",
                self.tier(tier),
                self.experience(level)
            )
        }
    }

    pub fn remaining(&self, days: i64) -> String {
        if days == 1 {
            format!("{days} {}", self.day_remaining)
        } else {
            format!("{days} {}", self.days_remaining)
        }
    }
}
