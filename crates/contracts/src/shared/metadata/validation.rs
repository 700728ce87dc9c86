//! Validation rules for metadata fields

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::field_type::FieldType;

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// Compiled patterns, keyed by the 'static pattern text of the descriptors
static PATTERNS: Lazy<Mutex<HashMap<&'static str, Regex>>> = Lazy::new(Default::default);

/// Validation rules for a field
/// Copy trait for efficient passing
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValidationRules {
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
    /// Message shown instead of "<label> is required"
    pub required_error: Option<&'static str>,
    /// Message shown when `pattern` does not match
    pub custom_error: Option<&'static str>,
}

impl ValidationRules {
    /// Create empty validation rules (all optional, no constraints)
    pub const fn none() -> Self {
        Self {
            required: false,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            pattern: None,
            required_error: None,
            custom_error: None,
        }
    }

    /// Create validation rules for required field
    pub const fn required() -> Self {
        Self {
            required: true,
            ..Self::none()
        }
    }

    /// Validate a draft value of the given type.
    ///
    /// Blank values (absent, null, whitespace, empty list) only fail the
    /// `required` rule; every other rule applies to non-blank values.
    pub fn validate(
        &self,
        field_type: FieldType,
        value: Option<&Value>,
        field_label: &str,
    ) -> Result<(), String> {
        let value = value.unwrap_or(&Value::Null);
        if is_blank(value) {
            if self.required {
                return Err(self
                    .required_error
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} is required", field_label)));
            }
            return Ok(());
        }

        match field_type {
            FieldType::Number | FieldType::Integer => {
                let number = as_number(value)
                    .ok_or_else(|| format!("{} must be a number", field_label))?;
                if field_type == FieldType::Integer && number.fract() != 0.0 {
                    return Err(format!("{} must be a whole number", field_label));
                }
                self.validate_number(number, field_label)
            }
            FieldType::Date => {
                let text = as_text(value);
                NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                    .map_err(|_| format!("{} must be a date (YYYY-MM-DD)", field_label))?;
                Ok(())
            }
            FieldType::Email => {
                let text = as_text(value);
                self.validate_string(&text, field_label)?;
                match matches_pattern(EMAIL_PATTERN, text.trim()) {
                    Ok(true) => Ok(()),
                    _ => Err(format!("{} must be a valid email address", field_label)),
                }
            }
            FieldType::Text | FieldType::LongText => {
                self.validate_string(&as_text(value), field_label)
            }
            FieldType::Boolean | FieldType::Reference | FieldType::File => Ok(()),
        }
    }

    /// Validate a string value against the length and pattern rules
    pub fn validate_string(&self, value: &str, field_label: &str) -> Result<(), String> {
        if self.required && value.trim().is_empty() {
            return Err(self
                .required_error
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} is required", field_label)));
        }

        let trimmed = value.trim();
        let length = trimmed.chars().count();

        if let Some(min) = self.min_length {
            if length < min {
                return Err(format!(
                    "{} must be at least {} characters",
                    field_label, min
                ));
            }
        }

        if let Some(max) = self.max_length {
            if length > max {
                return Err(format!(
                    "{} must not exceed {} characters",
                    field_label, max
                ));
            }
        }

        if let Some(pattern) = self.pattern {
            let invalid = || {
                self.custom_error
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} has an invalid format", field_label))
            };
            match matches_pattern(pattern, trimmed) {
                Ok(true) => {}
                Ok(false) => return Err(invalid()),
                Err(e) => return Err(format!("{}: invalid pattern ({})", field_label, e)),
            }
        }

        Ok(())
    }

    /// Validate a numeric value against min/max rules
    pub fn validate_number(&self, value: f64, field_label: &str) -> Result<(), String> {
        if let Some(min) = self.min {
            if value < min {
                return Err(format!("{} must be at least {}", field_label, min));
            }
        }

        if let Some(max) = self.max {
            if value > max {
                return Err(format!("{} must be at most {}", field_label, max));
            }
        }

        Ok(())
    }
}

fn matches_pattern(pattern: &'static str, value: &str) -> Result<bool, regex::Error> {
    let mut cache = PATTERNS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(re) = cache.get(pattern) {
        return Ok(re.is_match(value));
    }
    let re = Regex::new(pattern)?;
    let matched = re.is_match(value);
    cache.insert(pattern, re);
    Ok(matched)
}

/// Whether a draft value counts as "not filled in"
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Numbers arrive from inputs as strings; accept both representations
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CODE_RULES: ValidationRules = ValidationRules {
        pattern: Some(r"^[A-Z]{2,5}[0-9]{1,3}$"),
        custom_error: Some("Code must be 2-5 capital letters followed by 1-3 digits"),
        ..ValidationRules::none()
    };

    #[test]
    fn test_required_uses_custom_message() {
        let rules = ValidationRules {
            required_error: Some("Drug name is required"),
            ..ValidationRules::required()
        };
        assert_eq!(
            rules.validate(FieldType::Text, Some(&json!("   ")), "Drug name"),
            Err("Drug name is required".to_string())
        );
        assert_eq!(
            rules.validate(FieldType::Text, None, "Drug name"),
            Err("Drug name is required".to_string())
        );
    }

    #[test]
    fn test_optional_blank_skips_other_rules() {
        assert!(CODE_RULES.validate(FieldType::Text, None, "Code").is_ok());
        assert!(CODE_RULES
            .validate(FieldType::Text, Some(&json!("")), "Code")
            .is_ok());
    }

    #[test]
    fn test_pattern() {
        assert!(CODE_RULES
            .validate(FieldType::Text, Some(&json!("PHAR12")), "Code")
            .is_ok());
        assert_eq!(
            CODE_RULES.validate(FieldType::Text, Some(&json!("ph12")), "Code"),
            Err("Code must be 2-5 capital letters followed by 1-3 digits".to_string())
        );
        assert!(CODE_RULES
            .validate(FieldType::Text, Some(&json!("ABCDEF1")), "Code")
            .is_err());
    }

    #[test]
    fn test_length_bounds() {
        let rules = ValidationRules {
            min_length: Some(2),
            max_length: Some(5),
            ..ValidationRules::none()
        };
        assert!(rules.validate(FieldType::Text, Some(&json!("a")), "Name").is_err());
        assert!(rules.validate(FieldType::Text, Some(&json!("abc")), "Name").is_ok());
        assert_eq!(
            rules.validate(FieldType::Text, Some(&json!("abcdef")), "Name"),
            Err("Name must not exceed 5 characters".to_string())
        );
    }

    #[test]
    fn test_numeric_range_accepts_strings() {
        let rules = ValidationRules {
            min: Some(0.0),
            max: Some(100.0),
            ..ValidationRules::none()
        };
        assert!(rules
            .validate(FieldType::Number, Some(&json!("18.5")), "GST")
            .is_ok());
        assert_eq!(
            rules.validate(FieldType::Number, Some(&json!(120)), "GST"),
            Err("GST must be at most 100".to_string())
        );
        assert_eq!(
            rules.validate(FieldType::Number, Some(&json!("abc")), "GST"),
            Err("GST must be a number".to_string())
        );
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let rules = ValidationRules::none();
        assert!(rules
            .validate(FieldType::Integer, Some(&json!(2.5)), "Quantity")
            .is_err());
        assert!(rules
            .validate(FieldType::Integer, Some(&json!(3)), "Quantity")
            .is_ok());
    }

    #[test]
    fn test_date_and_email() {
        let rules = ValidationRules::none();
        assert!(rules
            .validate(FieldType::Date, Some(&json!("2024-03-15")), "Start")
            .is_ok());
        assert!(rules
            .validate(FieldType::Date, Some(&json!("15.03.2024")), "Start")
            .is_err());
        assert!(rules
            .validate(FieldType::Email, Some(&json!("store@example.in")), "Email")
            .is_ok());
        assert!(rules
            .validate(FieldType::Email, Some(&json!("store@")), "Email")
            .is_err());
    }
}
