//! Test fixtures and data for assessment tests

use std::sync::Arc;

use assessor::RawRecord;
use oracle::{RoutedSelector, ScriptedSelector, Selector};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const COUNTRY_A: &'static str = "A";
    pub const COUNTRY_B: &'static str = "B";

    /// Record with exactly the three core features
    pub fn core_record(row_id: &str, age: i64) -> RawRecord {
        RawRecord::new(row_id)
            .with("s2q15", age)
            .with("s2q14", "Female")
            .with("s2q16", "Somalia")
    }

    /// Record with seven features, enough for the lenient override
    pub fn rich_record(row_id: &str) -> RawRecord {
        Self::core_record(row_id, 31)
            .with("hhsize", 6)
            .with("s4q7", "Secondary")
            .with("s4q11_1", "Yes")
            .with("s9q2_6", "No")
    }

    /// Record missing gender and country of origin
    pub fn sparse_record(row_id: &str) -> RawRecord {
        RawRecord::new(row_id).with("s2q15", 40).with_null("s2q14")
    }

    pub fn countries(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    /// Selector always answering `score`
    pub fn constant(score: i64) -> Arc<ScriptedSelector> {
        Arc::new(
            ScriptedSelector::constant(score, &format!("s2q15 and s2q16 support a score of {score}"), 0.8)
                .expect("valid scripted response"),
        )
    }

    /// Selector scoring one country per perspective, `default` elsewhere
    ///
    /// `scores` is (emotional, cultural, ethical).
    pub fn per_perspective(country: &str, scores: (i64, i64, i64), default: i64) -> RoutedSelector {
        let marker = format!("HOST COUNTRY: {country}\n");
        RoutedSelector::new(Self::constant(default))
            .route(&[marker.as_str(), "EMOTIONAL"], Self::constant(scores.0))
            .route(&[marker.as_str(), "CULTURAL"], Self::constant(scores.1))
            .route(&[marker.as_str(), "ETHICAL"], Self::constant(scores.2))
    }

    /// Selector giving every perspective in `country` the same score
    pub fn per_country(routes: &[(&str, i64)], default: i64) -> Arc<dyn Selector> {
        let mut selector = RoutedSelector::new(Self::constant(default));
        for (country, score) in routes {
            let marker = format!("HOST COUNTRY: {country}\n");
            selector = selector.route(&[marker.as_str()], Self::constant(*score));
        }
        Arc::new(selector)
    }
}
