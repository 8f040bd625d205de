//! Schema validation for incoming request data.
//!
//! Records are validated from untyped JSON rather than deserialized
//! directly so that every violation in a payload is reported at once,
//! not just the first one serde trips over. A [`FieldReader`] walks one
//! JSON object, hands out typed values with declared defaults, and
//! accumulates [`FieldViolation`]s along the way. Fields the reader never
//! asked about are reported as unknown when it finishes.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    sync::LazyLock,
};

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Default number of items returned by list operations.
pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// Longest email address accepted (RFC 5321 path limit).
const MAX_EMAIL_LEN: usize = 254;

/// Local part and dot-separated domain labels; letters may be any script.
#[allow(clippy::expect_used)]
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[\p{L}\p{N}.!#$%&'*+/=?^_`{|}~-]+@[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?(?:\.[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?)+$",
    )
    .expect("email regex is valid")
});

/// Why a field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum ViolationReason {
    /// Required field absent.
    Missing,
    /// Field present with the wrong JSON type.
    WrongType {
        /// Human-readable name of the expected type
        expected: &'static str,
    },
    /// String is not a well-formed email address.
    MalformedEmail,
    /// Field is not part of the record's schema.
    UnknownField,
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "field required"),
            Self::WrongType { expected } => write!(f, "expected {expected}"),
            Self::MalformedEmail => write!(f, "not a valid email address"),
            Self::UnknownField => write!(f, "unknown field"),
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field path, e.g. `email` or `tags[2]`
    pub field: String,
    /// Rejection reason
    #[serde(flatten)]
    pub reason: ViolationReason,
}

impl FieldViolation {
    /// Violation for an absent required field.
    pub fn missing(field: impl Into<String>) -> Self {
        Self { field: field.into(), reason: ViolationReason::Missing }
    }

    /// Violation for a value of the wrong type.
    pub fn wrong_type(field: impl Into<String>, expected: &'static str) -> Self {
        Self { field: field.into(), reason: ViolationReason::WrongType { expected } }
    }

    /// Violation for a malformed email address.
    pub fn malformed_email(field: impl Into<String>) -> Self {
        Self { field: field.into(), reason: ViolationReason::MalformedEmail }
    }

    /// Violation for a field outside the schema.
    pub fn unknown(field: impl Into<String>) -> Self {
        Self { field: field.into(), reason: ViolationReason::UnknownField }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every violated field of one rejected payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// Wraps a set of violations.
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Violations in report order.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns true if `field` was rejected for `reason`.
    pub fn has(&self, field: &str, reason: &ViolationReason) -> bool {
        self.violations.iter().any(|v| v.field == field && &v.reason == reason)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationError {}

/// Checks an email address against the local-part@domain pattern.
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_EMAIL_LEN && EMAIL_REGEX.is_match(email)
}

/// Reads typed fields out of one JSON object, collecting violations.
///
/// Accessors always return a value so record construction reads linearly;
/// when a field is rejected the returned value is a placeholder and
/// [`FieldReader::finish`] reports the failure.
pub struct FieldReader<'a> {
    object: Option<&'a Map<String, Value>>,
    seen: BTreeSet<&'static str>,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    /// Starts reading `input`, which must be a JSON object.
    pub fn new(input: &'a Value) -> Self {
        let object = input.as_object();
        let mut violations = Vec::new();
        if object.is_none() {
            violations.push(FieldViolation::wrong_type("body", "object"));
        }
        Self { object, seen: BTreeSet::new(), violations }
    }

    fn take(&mut self, field: &'static str) -> Option<&'a Value> {
        self.seen.insert(field);
        self.object.and_then(|object| object.get(field))
    }

    /// Required string field.
    pub fn required_string(&mut self, field: &'static str) -> String {
        match self.take(field) {
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.violations.push(FieldViolation::wrong_type(field, "string"));
                String::new()
            },
            None => {
                self.missing(field);
                String::new()
            },
        }
    }

    /// Optional string field; `null` counts as absent.
    pub fn optional_string(&mut self, field: &'static str) -> Option<String> {
        match self.take(field) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(_) => {
                self.violations.push(FieldViolation::wrong_type(field, "string"));
                None
            },
        }
    }

    /// Optional string that takes `default` only when the field is omitted.
    /// An explicit `null` is kept as `None`.
    pub fn nullable_string_or(&mut self, field: &'static str, default: &str) -> Option<String> {
        match self.take(field) {
            None => Some(default.to_string()),
            Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.violations.push(FieldViolation::wrong_type(field, "string"));
                None
            },
        }
    }

    /// Non-null string defaulting to `default` when omitted.
    pub fn string_or(&mut self, field: &'static str, default: &str) -> String {
        match self.take(field) {
            None => default.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.violations.push(FieldViolation::wrong_type(field, "string"));
                String::new()
            },
        }
    }

    /// Required email address.
    pub fn required_email(&mut self, field: &'static str) -> String {
        let before = self.violations.len();
        let email = self.required_string(field);
        if self.violations.len() == before && !is_valid_email(&email) {
            self.violations.push(FieldViolation::malformed_email(field));
        }
        email
    }

    /// Optional email address; `null` counts as absent.
    pub fn optional_email(&mut self, field: &'static str) -> Option<String> {
        let email = self.optional_string(field);
        if let Some(address) = &email {
            if !is_valid_email(address) {
                self.violations.push(FieldViolation::malformed_email(field));
            }
        }
        email
    }

    /// Required ordered sequence of strings.
    pub fn required_string_list(&mut self, field: &'static str) -> Vec<String> {
        match self.take(field) {
            Some(value) => self.string_list(field, value),
            None => {
                self.missing(field);
                Vec::new()
            },
        }
    }

    /// Ordered sequence of strings defaulting to empty when omitted.
    pub fn string_list_or_empty(&mut self, field: &'static str) -> Vec<String> {
        match self.take(field) {
            Some(value) => self.string_list(field, value),
            None => Vec::new(),
        }
    }

    fn string_list(&mut self, field: &'static str, value: &Value) -> Vec<String> {
        let Value::Array(items) = value else {
            self.violations.push(FieldViolation::wrong_type(field, "array of strings"));
            return Vec::new();
        };

        let mut strings = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => strings.push(s.clone()),
                _ => self
                    .violations
                    .push(FieldViolation::wrong_type(format!("{field}[{index}]"), "string")),
            }
        }
        strings
    }

    fn missing(&mut self, field: &'static str) {
        if self.object.is_some() {
            self.violations.push(FieldViolation::missing(field));
        }
    }

    /// Reports unknown fields and returns all violations, if any.
    pub fn finish(mut self) -> Result<(), ValidationError> {
        if let Some(object) = self.object {
            let mut unknown: Vec<&String> =
                object.keys().filter(|key| !self.seen.contains(key.as_str())).collect();
            unknown.sort();
            self.violations.extend(unknown.into_iter().map(FieldViolation::unknown));
        }

        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }
}

/// Paging parameters shared by all list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// Maximum number of items returned
    pub limit: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self { limit: DEFAULT_LIST_LIMIT }
    }
}

/// Parsed query string of a list request.
///
/// Filter parameters pass through untouched; only `limit` is coerced.
/// Empty filter values are treated as absent and unrecognized parameters
/// are ignored.
#[derive(Debug, Clone)]
pub struct ListQuery {
    params: HashMap<String, String>,
    /// Paging parameters
    pub paging: Paging,
}

impl ListQuery {
    /// Parses raw query parameters.
    pub fn parse(params: HashMap<String, String>) -> Result<Self, ValidationError> {
        let limit = match params.get("limit") {
            None => DEFAULT_LIST_LIMIT,
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                ValidationError::new(vec![FieldViolation::wrong_type(
                    "limit",
                    "non-negative integer",
                )])
            })?,
        };

        Ok(Self { params, paging: Paging { limit } })
    }

    /// Non-empty value of a filter parameter.
    pub fn filter_value(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str).filter(|value| !value.is_empty())
    }
}
