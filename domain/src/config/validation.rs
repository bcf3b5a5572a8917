//! Configuration issues reported by config validation.
//!
//! Validation never aborts startup; callers print the issues and continue
//! with fallbacks.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field does not name a known enum variant.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A numeric field is outside its meaningful range.
    OutOfRange { field: String },
    /// A `min..max` pair is inverted.
    InvertedRange { field: String },
    /// A required companion value is missing.
    MissingValue { field: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_set_severity() {
        let issue = ConfigIssue::warning(
            ConfigIssueCode::OutOfRange {
                field: "ai_voters.reject_probability".to_string(),
            },
            "must be within 0.0..=1.0",
        );
        assert_eq!(issue.severity, Severity::Warning);

        let issue = ConfigIssue::error(
            ConfigIssueCode::MissingValue {
                field: "storage.path".to_string(),
            },
            "json backend needs a path",
        );
        assert_eq!(issue.severity, Severity::Error);
    }
}
