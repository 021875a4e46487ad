//! Weighted country scores and recommendation

use shared::Perspective;

use crate::config::PerspectiveWeights;
use crate::types::{AssessmentTrace, CountryScoreSet, CountryScores};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Weighted combination of the three perspective scores, rounded to 2 decimals
pub fn weighted_score(emotional: u8, cultural: u8, ethical: u8, weights: &PerspectiveWeights) -> f64 {
    round2(
        weights.emotional * f64::from(emotional)
            + weights.cultural * f64::from(cultural)
            + weights.ethical * f64::from(ethical),
    )
}

/// Collect one country's perspective scores from its finalized traces
///
/// Returns `None` if any perspective has no trace for the country.
pub fn country_scores(country: &str, traces: &[AssessmentTrace], weights: &PerspectiveWeights) -> Option<CountryScores> {
    let score_of = |perspective: Perspective| {
        traces
            .iter()
            .find(|t| t.host_country == country && t.perspective == perspective)
            .map(AssessmentTrace::score)
    };

    let emotional = score_of(Perspective::Emotional)?;
    let cultural = score_of(Perspective::Cultural)?;
    let ethical = score_of(Perspective::Ethical)?;

    Some(CountryScores {
        country: country.to_string(),
        scores: CountryScoreSet {
            emotional,
            cultural,
            ethical,
            weighted: weighted_score(emotional, cultural, ethical, weights),
        },
    })
}

/// Country with the highest weighted score; the earliest wins ties
pub fn recommend(scores: &[CountryScores]) -> Option<(&str, f64)> {
    let mut best: Option<&CountryScores> = None;
    for candidate in scores {
        match best {
            Some(current) if candidate.scores.weighted <= current.scores.weighted => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|c| (c.country.as_str(), c.scores.weighted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(country: &str, weighted: f64) -> CountryScores {
        CountryScores {
            country: country.to_string(),
            scores: CountryScoreSet {
                emotional: 5,
                cultural: 5,
                ethical: 5,
                weighted,
            },
        }
    }

    #[test]
    fn test_weighted_score_uses_perspective_weights() {
        let weights = PerspectiveWeights::default();
        assert_eq!(weighted_score(8, 6, 7, &weights), 6.9);
        assert_eq!(weighted_score(5, 5, 5, &weights), 5.0);
        assert_eq!(weighted_score(10, 1, 10, &weights), 6.4);
    }

    #[test]
    fn test_weighted_score_rounds_to_two_decimals() {
        let weights = PerspectiveWeights {
            emotional: 1.0 / 3.0,
            cultural: 1.0 / 3.0,
            ethical: 1.0 / 3.0,
        };
        assert_eq!(weighted_score(7, 7, 8, &weights), 7.33);
    }

    #[test]
    fn test_recommend_prefers_highest() {
        let all = vec![scores("A", 6.9), scores("B", 7.1), scores("C", 5.0)];
        assert_eq!(recommend(&all), Some(("B", 7.1)));
    }

    #[test]
    fn test_recommend_tie_goes_to_first_country() {
        let all = vec![scores("A", 7.0), scores("B", 7.0)];
        assert_eq!(recommend(&all), Some(("A", 7.0)));

        let reversed = vec![scores("B", 7.0), scores("A", 7.0)];
        assert_eq!(recommend(&reversed), Some(("B", 7.0)));
    }

    #[test]
    fn test_recommend_empty() {
        assert_eq!(recommend(&[]), None);
    }
}
