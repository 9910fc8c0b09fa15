//! Threshold lookups that turn scores and enums into display colours.
//!
//! Every score-driven colour in the report (score panel, compatibility cells)
//! goes through `score_to_tier`.

use serde::Serialize;

use crate::models::analysis::{MatchRecommendation, Urgency};
use crate::report::document::{palette, Rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TierLevel {
    Excellent,
    Good,
    Fair,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub level: TierLevel,
    pub color: Rgb,
}

/// Ordered by descending threshold; the first rule whose threshold the score
/// reaches wins. The last rule catches everything else.
const TIER_LADDER: [(f64, Tier); 4] = [
    (
        80.0,
        Tier {
            level: TierLevel::Excellent,
            color: palette::SUCCESS,
        },
    ),
    (
        60.0,
        Tier {
            level: TierLevel::Good,
            color: palette::SECONDARY,
        },
    ),
    (
        40.0,
        Tier {
            level: TierLevel::Fair,
            color: palette::WARNING,
        },
    ),
    (
        f64::NEG_INFINITY,
        Tier {
            level: TierLevel::Low,
            color: palette::DANGER,
        },
    ),
];

pub fn score_to_tier(score: f64) -> Tier {
    TIER_LADDER
        .iter()
        .find(|(threshold, _)| score >= *threshold)
        .map(|(_, tier)| *tier)
        .unwrap_or(TIER_LADDER[TIER_LADDER.len() - 1].1)
}

const URGENCY_COLORS: [(Urgency, Rgb); 3] = [
    (Urgency::Critical, palette::DANGER),
    (Urgency::High, palette::ORANGE),
    (Urgency::Medium, palette::WARNING),
];

pub fn urgency_color(urgency: Urgency) -> Rgb {
    URGENCY_COLORS
        .iter()
        .find(|(u, _)| *u == urgency)
        .map(|(_, color)| *color)
        .unwrap_or(palette::MUTED)
}

const RECOMMENDATION_COLORS: [(MatchRecommendation, Rgb); 4] = [
    (MatchRecommendation::HighlyRecommended, palette::SUCCESS),
    (MatchRecommendation::Recommended, palette::SECONDARY),
    (MatchRecommendation::Consider, palette::WARNING),
    (MatchRecommendation::NotRecommended, palette::DANGER),
];

pub fn recommendation_color(recommendation: MatchRecommendation) -> Rgb {
    RECOMMENDATION_COLORS
        .iter()
        .find(|(r, _)| *r == recommendation)
        .map(|(_, color)| *color)
        .unwrap_or(palette::TEXT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_tier_boundaries() {
        let cases = [
            (0.0, TierLevel::Low),
            (39.0, TierLevel::Low),
            (40.0, TierLevel::Fair),
            (59.0, TierLevel::Fair),
            (60.0, TierLevel::Good),
            (79.0, TierLevel::Good),
            (80.0, TierLevel::Excellent),
            (100.0, TierLevel::Excellent),
        ];
        for (score, expected) in cases {
            assert_eq!(score_to_tier(score).level, expected, "score {score}");
        }
    }

    #[test]
    fn test_score_tier_colors() {
        let excellent = score_to_tier(85.0);
        assert_eq!(excellent.level, TierLevel::Excellent);
        assert_eq!(excellent.color, palette::SUCCESS);

        assert_eq!(score_to_tier(70.0).color, palette::SECONDARY);
        assert_eq!(score_to_tier(45.0).color, palette::WARNING);
        assert_eq!(score_to_tier(12.0).level, TierLevel::Low);
        assert_eq!(score_to_tier(12.0).color, palette::DANGER);
    }

    #[test]
    fn test_fractional_scores_just_below_threshold() {
        assert_eq!(score_to_tier(79.9).level, TierLevel::Good);
        assert_eq!(score_to_tier(39.99).level, TierLevel::Low);
    }

    #[test]
    fn test_urgency_colors_are_distinct() {
        let critical = urgency_color(Urgency::Critical);
        let high = urgency_color(Urgency::High);
        let medium = urgency_color(Urgency::Medium);
        assert_eq!(critical, palette::DANGER);
        assert_ne!(critical, high);
        assert_ne!(high, medium);
    }

    #[test]
    fn test_recommendation_colors_follow_strength() {
        assert_eq!(
            recommendation_color(MatchRecommendation::HighlyRecommended),
            palette::SUCCESS
        );
        assert_eq!(
            recommendation_color(MatchRecommendation::NotRecommended),
            palette::DANGER
        );
    }
}
