//! Configuration for the cleaning pipeline.
//!
//! Every policy constant the pipeline uses (vocabularies, thresholds, date
//! formats, score weights) lives in [`CleaningConfig`] and is passed in
//! explicitly. Nothing is read from process-wide state, so two pipelines with
//! different configs can run side by side.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Default date formats, tried in this order during type inference.
pub const DEFAULT_DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Default tokens that count as boolean true (case-insensitive).
pub const DEFAULT_TRUE_VALUES: [&str; 5] = ["true", "yes", "y", "t", "1"];

/// Default tokens that count as boolean false (case-insensitive).
pub const DEFAULT_FALSE_VALUES: [&str; 5] = ["false", "no", "n", "f", "0"];

/// Default textual markers treated as a missing value (case-insensitive).
pub const DEFAULT_MISSING_MARKERS: [&str; 5] = ["n/a", "na", "null", "nan", "#n/a"];

/// Relative weights of the three per-column score components.
///
/// Weights are normalized by their sum, so `1/1/1` and `2/2/2` are the same
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub completeness: f64,
    pub uniqueness: f64,
    pub consistency: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            completeness: 1.0,
            uniqueness: 1.0,
            consistency: 1.0,
        }
    }
}

impl ScoreWeights {
    /// Weighted mean of the three components.
    pub fn combine(&self, completeness: f64, uniqueness: f64, consistency: f64) -> f64 {
        let total = self.completeness + self.uniqueness + self.consistency;
        if total <= 0.0 {
            return 0.0;
        }
        (self.completeness * completeness
            + self.uniqueness * uniqueness
            + self.consistency * consistency)
            / total
    }
}

/// Configuration for the cleaning pipeline.
///
/// Use [`CleaningConfig::builder()`] for a fluent setup, or deserialize it
/// from JSON. Missing JSON fields take their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Trim leading/trailing whitespace of stored text values.
    /// Default: true
    pub trim_whitespace: bool,

    /// Treat empty or whitespace-only text as a missing value.
    /// Default: true
    pub blank_as_missing: bool,

    /// Text values (compared trimmed, case-insensitive) treated as missing.
    /// Default: [`DEFAULT_MISSING_MARKERS`]
    pub missing_markers: Vec<String>,

    /// Vocabulary for boolean true.
    pub boolean_true_values: Vec<String>,

    /// Vocabulary for boolean false.
    pub boolean_false_values: Vec<String>,

    /// chrono format strings tried in order when detecting dates.
    pub date_formats: Vec<String>,

    /// A column with at most this many distinct values is categorical.
    /// Default: 20
    pub max_categorical_distinct: usize,

    /// A column whose distinct count is at most this fraction of the row count
    /// is categorical, even above `max_categorical_distinct`.
    /// Default: 0.05
    pub categorical_ratio: f64,

    /// Fill value for text-like columns without a single observed value.
    /// Default: "Unknown"
    pub placeholder_token: String,

    /// Lowercase every value of email columns.
    /// Default: true
    pub normalize_emails: bool,

    /// Weights of the per-column score components.
    pub score_weights: ScoreWeights,

    /// Points subtracted from the overall score when every record is a
    /// duplicate; scaled linearly by the duplicate ratio.
    /// Default: 50.0
    pub duplicate_penalty: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            trim_whitespace: true,
            blank_as_missing: true,
            missing_markers: to_strings(&DEFAULT_MISSING_MARKERS),
            boolean_true_values: to_strings(&DEFAULT_TRUE_VALUES),
            boolean_false_values: to_strings(&DEFAULT_FALSE_VALUES),
            date_formats: to_strings(&DEFAULT_DATE_FORMATS),
            max_categorical_distinct: 20,
            categorical_ratio: 0.05,
            placeholder_token: "Unknown".to_string(),
            normalize_emails: true,
            score_weights: ScoreWeights::default(),
            duplicate_penalty: 50.0,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Largest distinct-value count that still counts as categorical for a
    /// column of `row_count` records.
    pub fn categorical_limit(&self, row_count: usize) -> usize {
        let by_ratio = (self.categorical_ratio * row_count as f64).ceil() as usize;
        self.max_categorical_distinct.max(by_ratio)
    }

    /// Classify a token against the boolean vocabulary.
    pub fn parse_boolean(&self, value: &str) -> Option<bool> {
        let lower = value.trim().to_lowercase();
        if self.boolean_true_values.iter().any(|v| v.to_lowercase() == lower) {
            Some(true)
        } else if self.boolean_false_values.iter().any(|v| v.to_lowercase() == lower) {
            Some(false)
        } else {
            None
        }
    }

    /// Whether a text value is one of the configured missing markers.
    pub fn is_missing_marker(&self, value: &str) -> bool {
        let lower = value.trim().to_lowercase();
        self.missing_markers.iter().any(|m| m.to_lowercase() == lower)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.categorical_ratio) {
            return Err(ConfigValidationError::InvalidRatio {
                field: "categorical_ratio".to_string(),
                value: self.categorical_ratio,
            });
        }

        let weights = [
            ("completeness", self.score_weights.completeness),
            ("uniqueness", self.score_weights.uniqueness),
            ("consistency", self.score_weights.consistency),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigValidationError::InvalidWeight {
                    field: field.to_string(),
                    value,
                });
            }
        }
        if weights.iter().map(|(_, w)| w).sum::<f64>() <= 0.0 {
            return Err(ConfigValidationError::ZeroWeights);
        }

        if !(0.0..=100.0).contains(&self.duplicate_penalty) {
            return Err(ConfigValidationError::InvalidPenalty(self.duplicate_penalty));
        }

        if self.boolean_true_values.is_empty() || self.boolean_false_values.is_empty() {
            return Err(ConfigValidationError::EmptyBooleanVocabulary);
        }
        for token in &self.boolean_true_values {
            let lower = token.trim().to_lowercase();
            if self
                .boolean_false_values
                .iter()
                .any(|f| f.trim().to_lowercase() == lower)
            {
                return Err(ConfigValidationError::OverlappingBooleanVocabulary(
                    token.clone(),
                ));
            }
        }

        if self.placeholder_token.trim().is_empty() {
            return Err(ConfigValidationError::EmptyPlaceholder);
        }

        for format in &self.date_formats {
            if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
            {
                return Err(ConfigValidationError::InvalidDateFormat(format.clone()));
            }
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid ratio for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidRatio { field: String, value: f64 },

    #[error("Invalid score weight for '{field}': {value} (must be a non-negative number)")]
    InvalidWeight { field: String, value: f64 },

    #[error("Score weights must not all be zero")]
    ZeroWeights,

    #[error("Invalid duplicate penalty: {0} (must be between 0 and 100)")]
    InvalidPenalty(f64),

    #[error("Boolean vocabularies must not be empty")]
    EmptyBooleanVocabulary,

    #[error("Token '{0}' appears in both boolean vocabularies")]
    OverlappingBooleanVocabulary(String),

    #[error("Placeholder token must not be blank")]
    EmptyPlaceholder,

    #[error("Invalid date format '{0}'")]
    InvalidDateFormat(String),
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    trim_whitespace: Option<bool>,
    blank_as_missing: Option<bool>,
    missing_markers: Option<Vec<String>>,
    boolean_true_values: Option<Vec<String>>,
    boolean_false_values: Option<Vec<String>>,
    date_formats: Option<Vec<String>>,
    max_categorical_distinct: Option<usize>,
    categorical_ratio: Option<f64>,
    placeholder_token: Option<String>,
    normalize_emails: Option<bool>,
    score_weights: Option<ScoreWeights>,
    duplicate_penalty: Option<f64>,
}

impl CleaningConfigBuilder {
    /// Enable or disable trimming of stored text values.
    pub fn trim_whitespace(mut self, trim: bool) -> Self {
        self.trim_whitespace = Some(trim);
        self
    }

    /// Enable or disable treating blank text as missing.
    pub fn blank_as_missing(mut self, blank: bool) -> Self {
        self.blank_as_missing = Some(blank);
        self
    }

    /// Replace the list of missing-value markers.
    pub fn missing_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the boolean vocabulary.
    pub fn boolean_vocabulary<I, J, S, T>(mut self, true_values: I, false_values: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        self.boolean_true_values = Some(true_values.into_iter().map(Into::into).collect());
        self.boolean_false_values = Some(false_values.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the ordered list of date formats.
    pub fn date_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.date_formats = Some(formats.into_iter().map(Into::into).collect());
        self
    }

    /// Set the absolute distinct-value bound for categorical columns.
    pub fn max_categorical_distinct(mut self, max: usize) -> Self {
        self.max_categorical_distinct = Some(max);
        self
    }

    /// Set the relative distinct-value bound for categorical columns.
    ///
    /// # Arguments
    /// * `ratio` - Value between 0.0 and 1.0 (e.g., 0.05 = 5% of rows)
    pub fn categorical_ratio(mut self, ratio: f64) -> Self {
        self.categorical_ratio = Some(ratio);
        self
    }

    /// Set the fill token for text-like columns with no observed values.
    pub fn placeholder_token(mut self, token: impl Into<String>) -> Self {
        self.placeholder_token = Some(token.into());
        self
    }

    /// Enable or disable lowercasing of email columns.
    pub fn normalize_emails(mut self, normalize: bool) -> Self {
        self.normalize_emails = Some(normalize);
        self
    }

    /// Set the score component weights.
    pub fn score_weights(mut self, weights: ScoreWeights) -> Self {
        self.score_weights = Some(weights);
        self
    }

    /// Set the duplicate penalty in score points.
    pub fn duplicate_penalty(mut self, penalty: f64) -> Self {
        self.duplicate_penalty = Some(penalty);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let defaults = CleaningConfig::default();
        let config = CleaningConfig {
            trim_whitespace: self.trim_whitespace.unwrap_or(defaults.trim_whitespace),
            blank_as_missing: self.blank_as_missing.unwrap_or(defaults.blank_as_missing),
            missing_markers: self.missing_markers.unwrap_or(defaults.missing_markers),
            boolean_true_values: self
                .boolean_true_values
                .unwrap_or(defaults.boolean_true_values),
            boolean_false_values: self
                .boolean_false_values
                .unwrap_or(defaults.boolean_false_values),
            date_formats: self.date_formats.unwrap_or(defaults.date_formats),
            max_categorical_distinct: self
                .max_categorical_distinct
                .unwrap_or(defaults.max_categorical_distinct),
            categorical_ratio: self.categorical_ratio.unwrap_or(defaults.categorical_ratio),
            placeholder_token: self.placeholder_token.unwrap_or(defaults.placeholder_token),
            normalize_emails: self.normalize_emails.unwrap_or(defaults.normalize_emails),
            score_weights: self.score_weights.unwrap_or(defaults.score_weights),
            duplicate_penalty: self.duplicate_penalty.unwrap_or(defaults.duplicate_penalty),
        };

        config.validate()?;
        Ok(config)
    }
}
