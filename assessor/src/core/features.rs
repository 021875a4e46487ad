//! Canonical feature extraction from raw survey records
//!
//! A raw record maps source columns to optional scalar values. The catalog
//! lists, per canonical feature, the source columns that may carry it in
//! priority order. Extraction takes the first present, non-null alias and
//! never defaults or infers a missing feature.

use std::collections::HashMap;
use std::fmt;
use serde::{Deserialize, Serialize};

/// Opaque scalar cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Cell spellings read as missing values, as survey exports commonly use them
pub const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA",
    "NULL", "NaN", "None", "n/a", "nan", "null",
];

impl FeatureValue {
    /// Interpret a CSV cell; blank cells and `NA_TOKENS` are null
    pub fn parse_cell(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || NA_TOKENS.contains(&trimmed) {
            return None;
        }
        if let Ok(integer) = trimmed.parse::<i64>() {
            return Some(FeatureValue::Integer(integer));
        }
        match trimmed.parse::<f64>() {
            Ok(float) if float.is_finite() => Some(FeatureValue::Float(float)),
            Ok(_) => None, // NaN / inf cells are treated like pandas nulls
            Err(_) => Some(FeatureValue::Text(trimmed.to_string())),
        }
    }

    /// Numeric coercion
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Integer(i) => Some(*i as f64),
            FeatureValue::Float(f) => Some(*f),
            FeatureValue::Text(text) => text.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Integer(i) => write!(f, "{i}"),
            FeatureValue::Float(x) => write!(f, "{x}"),
            FeatureValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(value: &str) -> Self {
        FeatureValue::Text(value.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(value: String) -> Self {
        FeatureValue::Text(value)
    }
}

impl From<i32> for FeatureValue {
    fn from(value: i32) -> Self {
        FeatureValue::Integer(i64::from(value))
    }
}

impl From<i64> for FeatureValue {
    fn from(value: i64) -> Self {
        FeatureValue::Integer(value)
    }
}

impl From<f64> for FeatureValue {
    fn from(value: f64) -> Self {
        FeatureValue::Float(value)
    }
}

/// One input row: column name to optional value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    /// Row identifier used in logs and reports
    pub row_id: String,
    fields: HashMap<String, Option<FeatureValue>>,
}

impl RawRecord {
    pub fn new(row_id: impl Into<String>) -> Self {
        Self {
            row_id: row_id.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with(mut self, column: &str, value: impl Into<FeatureValue>) -> Self {
        self.fields.insert(column.to_string(), Some(value.into()));
        self
    }

    pub fn with_null(mut self, column: &str) -> Self {
        self.fields.insert(column.to_string(), None);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Option<FeatureValue>) {
        self.fields.insert(column.into(), value);
    }

    /// Present and non-null value of a column
    pub fn value(&self, column: &str) -> Option<&FeatureValue> {
        self.fields.get(column).and_then(Option::as_ref)
    }
}

/// Catalog entry for one canonical feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpec {
    pub name: String,
    /// Survey field code used in the rendered profile
    pub field_code: String,
    /// Source columns in priority order
    pub aliases: Vec<String>,
}

impl FeatureSpec {
    pub fn new(name: &str, field_code: &str, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            field_code: field_code.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Entry whose field code is its canonical name
    pub fn plain(name: &str, aliases: &[&str]) -> Self {
        Self::new(name, name, aliases)
    }

    /// Human label, e.g. `country_of_origin` -> `Country Of Origin`
    pub fn display_name(&self) -> String {
        display_name(&self.name)
    }
}

pub fn display_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// A resolved feature with the column it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFeature {
    pub name: String,
    pub value: FeatureValue,
    pub source_column: String,
    pub field_code: String,
}

/// Canonical features of one record, in catalog order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFeatures {
    features: Vec<CanonicalFeature>,
}

impl ExtractedFeatures {
    pub fn get(&self, name: &str) -> Option<&CanonicalFeature> {
        self.features.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalFeature> {
        self.features.iter()
    }
}

/// Ordered table of canonical features and their source aliases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCatalog {
    specs: Vec<FeatureSpec>,
}

impl FeatureCatalog {
    pub fn new(specs: Vec<FeatureSpec>) -> Self {
        Self { specs }
    }

    /// Catalog for the household survey dataset
    pub fn survey() -> Self {
        Self::new(vec![
            FeatureSpec::new("age", "s2q15", &["age", "s2q15"]),
            FeatureSpec::new("gender", "s2q14", &["gender", "s2q14"]),
            FeatureSpec::new("country_of_origin", "s2q16", &["country_of_origin", "s2q16"]),
            FeatureSpec::new("household_size", "hhsize", &["hhsize", "household_size"]),
            FeatureSpec::new("household_head", "head", &["head", "household_head"]),
            FeatureSpec::new("education_level", "s4q7", &["s4q7", "education_level"]),
            FeatureSpec::new("employed_last_7_days", "empl_active_7d", &["empl_active_7d", "employed_last_7_days"]),
            FeatureSpec::plain("work_status", &["work_status"]),
            FeatureSpec::new("type_of_work", "s5q24", &["s5q24", "type_of_work"]),
            FeatureSpec::new("work_before_displacement", "s5q64", &["s5q64", "work_before_displacement"]),
            FeatureSpec::new("has_disability", "disabled", &["disabled", "has_disability"]),
            FeatureSpec::new("vision_difficulty", "s9q4", &["s9q4", "vision_difficulty"]),
            FeatureSpec::new("hearing_difficulty", "s9q5", &["s9q5", "hearing_difficulty"]),
            FeatureSpec::new("mobility_difficulty", "s9q6", &["s9q6", "mobility_difficulty"]),
            FeatureSpec::new("cognitive_difficulty", "s9q7", &["s9q7", "cognitive_difficulty"]),
            FeatureSpec::new("has_refugee_id", "s9q2_3", &["s9q2_3", "has_refugee_id"]),
            FeatureSpec::new("has_work_permit", "s9q2_6", &["s9q2_6", "has_work_permit"]),
            FeatureSpec::new("speaks_english", "s4q11_1", &["s4q11_1", "speaks_english"]),
            FeatureSpec::new("reads_english", "s4q12_1", &["s4q12_1", "reads_english"]),
            FeatureSpec::new("speaks_swahili", "s4q11_2", &["s4q11_2", "speaks_swahili"]),
            FeatureSpec::new("reads_swahili", "s4q12_2", &["s4q12_2", "reads_swahili"]),
            FeatureSpec::new("speaks_arabic", "s4q11_5", &["s4q11_5", "speaks_arabic"]),
            FeatureSpec::new("computer_skills", "s5q66", &["s5q66", "computer_skills"]),
            FeatureSpec::new("internet_skills", "s5q65", &["s5q65", "internet_skills"]),
            FeatureSpec::plain("depend_ratio", &["depend_ratio"]),
        ])
    }

    /// Resolve every catalog feature from the first present, non-null alias
    pub fn extract(&self, record: &RawRecord) -> ExtractedFeatures {
        let features = self
            .specs
            .iter()
            .filter_map(|spec| {
                spec.aliases.iter().find_map(|alias| {
                    record.value(alias).map(|value| CanonicalFeature {
                        name: spec.name.clone(),
                        value: value.clone(),
                        source_column: alias.clone(),
                        field_code: spec.field_code.clone(),
                    })
                })
            })
            .collect();

        ExtractedFeatures { features }
    }
}

impl Default for FeatureCatalog {
    fn default() -> Self {
        Self::survey()
    }
}
