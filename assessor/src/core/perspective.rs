//! Perspective descriptors parameterising the shared assessment state machine

use shared::Perspective;
use crate::config::PerspectiveWeights;

/// Focus directive and weight for one judgment lens
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveDescriptor {
    pub perspective: Perspective,
    pub focus: &'static str,
    pub weight: f64,
}

impl PerspectiveDescriptor {
    pub fn new(perspective: Perspective, weight: f64) -> Self {
        Self {
            perspective,
            focus: focus_directive(perspective),
            weight,
        }
    }

    /// All three lenses in reporting order
    pub fn all(weights: &PerspectiveWeights) -> Vec<Self> {
        Perspective::ALL
            .iter()
            .map(|p| Self::new(*p, weights.weight(*p)))
            .collect()
    }
}

/// Directive telling the selector which factors this lens prioritises
pub fn focus_directive(perspective: Perspective) -> &'static str {
    match perspective {
        Perspective::Emotional => concat!(
            "FOCUS: For this assessment, you are specifically the EMOTIONAL perspective agent.\n",
            "Prioritize factors related to psychological readiness, resilience, motivation, and emotional well-being.\n",
            "Pay special attention to: age-related adaptability, employment history effects on confidence,\n",
            "cognitive difficulties (s9q7), dependency burden (depend_ratio), and any indicators of stress or support."
        ),
        Perspective::Cultural => concat!(
            "FOCUS: For this assessment, you are specifically the CULTURAL perspective agent.\n",
            "Prioritize factors related to cultural integration, language abilities, and workplace adaptation.\n",
            "Pay special attention to: language skills (s4q11_1, s4q12_1, s4q11_2, s4q12_2, s4q11_5),\n",
            "education level (s4q7) as cultural familiarity indicator, documentation for legal integration\n",
            "(s9q2_3, s9q2_6), and previous work experience (s5q64) showing workplace culture exposure."
        ),
        Perspective::Ethical => concat!(
            "FOCUS: For this assessment, you are specifically the ETHICAL perspective agent.\n",
            "Prioritize factors related to fairness, rights, vulnerabilities, and systemic barriers.\n",
            "Pay special attention to: disability status and difficulties (disabled, s9q4-s9q7),\n",
            "work permit documentation (s9q2_6) for legal employment, gender (s2q14) and potential biases,\n",
            "and dependency ratio (depend_ratio) indicating family burden. Focus on what support or\n",
            "accommodations would be ethically necessary."
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors_carry_weights_in_order() {
        let descriptors = PerspectiveDescriptor::all(&PerspectiveWeights::default());
        let summary: Vec<(Perspective, f64)> = descriptors.iter().map(|d| (d.perspective, d.weight)).collect();

        assert_eq!(
            summary,
            vec![
                (Perspective::Emotional, 0.3),
                (Perspective::Cultural, 0.4),
                (Perspective::Ethical, 0.3),
            ]
        );
        assert!(descriptors[1].focus.contains("CULTURAL"));
    }
}
