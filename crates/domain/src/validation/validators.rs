// Field Validators - Reusable validation components
use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

static DIGITS: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[0-9]+$").ok());
static MIME_TYPE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r#"^[A-Za-z0-9!#$&^_.+-]+/[A-Za-z0-9!#$&^_.+-]+(\s*;\s*[A-Za-z0-9!#$&^_.+-]+=([A-Za-z0-9!#$&^_.+-]+|"[^"\\]*"))*$"#,
    )
    .ok()
});

/// Trait for field validators
pub trait FieldValidator<T: ?Sized> {
    /// Validate a field value
    fn validate(&self, value: &T) -> Result<(), String>;
}

/// Range validator for numeric types
#[derive(Debug, Clone)]
pub struct RangeValidator<T> {
    min: Option<T>,
    max: Option<T>,
    exclusive_min: bool,
    message: Option<String>,
}

impl<T> Default for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    /// Create a new range validator with no constraints
    pub fn empty() -> Self {
        Self { min: None, max: None, exclusive_min: false, message: None }
    }

    /// Set minimum value (inclusive)
    pub fn min(mut self, min: T) -> Self {
        self.min = Some(min);
        self.exclusive_min = false;
        self
    }

    /// Require values strictly greater than `min`
    pub fn greater_than(mut self, min: T) -> Self {
        self.min = Some(min);
        self.exclusive_min = true;
        self
    }

    /// Set maximum value
    pub fn max(mut self, max: T) -> Self {
        self.max = Some(max);
        self
    }

    /// Replace the generated message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn fail(&self, generated: String) -> Result<(), String> {
        Err(self.message.clone().unwrap_or(generated))
    }
}

impl<T> FieldValidator<T> for RangeValidator<T>
where
    T: PartialOrd + Display + Clone,
{
    fn validate(&self, value: &T) -> Result<(), String> {
        if let Some(ref min) = self.min {
            if self.exclusive_min && value <= min {
                return self.fail(format!("Value must be greater than {min}"));
            }
            if !self.exclusive_min && value < min {
                return self.fail(format!("Value must be at least {min}"));
            }
        }
        if let Some(ref max) = self.max {
            if value > max {
                return self.fail(format!("Value must be at most {max}"));
            }
        }
        Ok(())
    }
}

/// String validator with common checks
#[derive(Debug, Clone, Default)]
pub struct StringValidator {
    not_empty: bool,
    digits_only: bool,
    positive_number: bool,
    mime_type: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    one_of: Option<Vec<String>>,
    pattern: Option<Regex>,
    message: Option<String>,
}

impl StringValidator {
    /// Create a new string validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Require non-empty string (after trimming)
    pub fn not_empty(mut self) -> Self {
        self.not_empty = true;
        self
    }

    /// Require ASCII digits only (zip codes, branches, account numbers)
    pub fn digits_only(mut self) -> Self {
        self.digits_only = true;
        self
    }

    /// Require a decimal string greater than zero (money amounts)
    pub fn positive_number(mut self) -> Self {
        self.positive_number = true;
        self
    }

    /// Require a `type/subtype` media type with optional parameters
    pub fn mime_type(mut self) -> Self {
        self.mime_type = true;
        self
    }

    /// Set minimum length
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Set maximum length
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Restrict to a fixed set of values
    pub fn one_of(mut self, allowed: &[&str]) -> Self {
        self.one_of = Some(allowed.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Set regex pattern
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    /// Replace every generated message with `message`
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn fail(&self, generated: String) -> Result<(), String> {
        Err(self.message.clone().unwrap_or(generated))
    }
}

impl FieldValidator<str> for StringValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        let value = value.trim();

        if self.not_empty && value.is_empty() {
            return self.fail("Value cannot be empty".to_string());
        }

        if let Some(min) = self.min_length {
            if value.len() < min {
                return self.fail(format!("Length must be at least {min}"));
            }
        }

        if let Some(max) = self.max_length {
            if value.len() > max {
                return self.fail(format!("Length must be at most {max}"));
            }
        }

        if self.digits_only && !DIGITS.as_ref().is_some_and(|re| re.is_match(value)) {
            return self.fail("Value must contain only digits".to_string());
        }

        if self.positive_number && !value.parse::<f64>().is_ok_and(|n| n.is_finite() && n > 0.0) {
            return self.fail("Value must be a number greater than zero".to_string());
        }

        if self.mime_type && !MIME_TYPE.as_ref().is_some_and(|re| re.is_match(value)) {
            return self.fail(format!("invalid mime type: {value}"));
        }

        if let Some(ref allowed) = self.one_of {
            if !allowed.iter().any(|a| a == value) {
                return self.fail(format!("Value must be one of: {}", allowed.join(", ")));
            }
        }

        if let Some(ref pattern) = self.pattern {
            if !pattern.is_match(value) {
                return self.fail(format!("Value does not match pattern: {}", pattern.as_str()));
            }
        }

        Ok(())
    }
}

impl FieldValidator<String> for StringValidator {
    fn validate(&self, value: &String) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_str())
    }
}

impl FieldValidator<Option<String>> for StringValidator {
    fn validate(&self, value: &Option<String>) -> Result<(), String> {
        FieldValidator::<str>::validate(self, value.as_deref().unwrap_or(""))
    }
}
