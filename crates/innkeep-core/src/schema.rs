//! # Form Schema
//!
//! Field specifications and the per-form schema they are collected into.
//!
//! ## Schema Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FormSchema                                                             │
//! │  ├── fields: [FieldSpec]        one entry per input, in form order      │
//! │  │     name · label · kind · required · default · messages              │
//! │  ├── rules:  [CrossFieldRule]   endTime > startTime, checkOut > checkIn │
//! │  └── line_items: Option<LineItemPolicy>                                 │
//! │        min/max count · exempt item types · catalog of offered items     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A schema is checked once in [`FormSchema::new`] and is immutable after
//! that. Every misconfiguration (duplicate names, empty dropdowns, custom
//! patterns that do not compile, rules pointing at the wrong fields) is an
//! error at construction so it can never surface during a submit.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::FieldValue;

// =============================================================================
// Field Kinds
// =============================================================================

/// Character rules for a text field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TextFormat {
    /// Anything non-blank.
    #[default]
    Free,
    /// `^[A-Za-z ]+$`, as used for guest names.
    LettersAndSpaces,
    /// A custom regex the whole value must match.
    Pattern(String),
}

/// Which calendar dates a date field accepts relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DateBound {
    #[default]
    Any,
    /// Today or later.
    NotPast,
    /// Strictly after today.
    Future,
}

/// One dropdown entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EnumOption {
    pub value: String,
    pub label: String,
}

impl EnumOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// The kind of a field together with its kind-specific constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text {
        format: TextFormat,
    },
    Email,
    /// Digits only, optionally with a leading `+`. With `accept_email` the
    /// field also takes an email address (supplier "email/contact").
    Phone {
        #[serde(rename = "minDigits")]
        min_digits: usize,
        #[serde(rename = "maxDigits")]
        max_digits: usize,
        #[serde(rename = "allowPlus")]
        allow_plus: bool,
        #[serde(rename = "acceptEmail")]
        accept_email: bool,
    },
    /// `YYYY-MM-DD`.
    Date {
        bound: DateBound,
    },
    /// `HH:MM`, 24 hour.
    Time,
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Enum {
        options: Vec<EnumOption>,
    },
    Boolean,
}

impl FieldKind {
    /// Short name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Email => "email",
            FieldKind::Phone { .. } => "phone",
            FieldKind::Date { .. } => "date",
            FieldKind::Time => "time",
            FieldKind::Integer { .. } => "integer",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Boolean => "boolean",
        }
    }

    /// Option values of an enum field; empty for other kinds.
    pub fn option_values(&self) -> impl Iterator<Item = &str> {
        let options: &[EnumOption] = match self {
            FieldKind::Enum { options } => options,
            _ => &[],
        };
        options.iter().map(|o| o.value.as_str())
    }
}

// =============================================================================
// Field Spec
// =============================================================================

/// Literal message overrides. Anything left `None` falls back to a
/// message built from the field label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldMessages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid: Option<String>,
    /// Integer below `min`, or a date outside its bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below_min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub above_max: Option<String>,
}

/// Describes one input field.
///
/// ## Example
/// ```rust
/// use innkeep_core::schema::FieldSpec;
///
/// let guests = FieldSpec::integer("numberOfGuests", "Number of guests", Some(1), Some(1000))
///     .required();
/// assert_eq!(guests.below_min_error(), "Number of guests must be at least 1");
/// assert_eq!(guests.above_max_error(), "Number of guests cannot exceed 1000");
/// ```
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<FieldValue>,
    pub messages: FieldMessages,
    #[serde(skip)]
    #[ts(skip)]
    compiled: Option<Regex>,
}

impl FieldSpec {
    fn new(name: &str, label: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: false,
            default: None,
            messages: FieldMessages::default(),
            compiled: None,
        }
    }

    pub fn text(name: &str, label: &str, format: TextFormat) -> Self {
        Self::new(name, label, FieldKind::Text { format })
    }

    pub fn email(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn phone(name: &str, label: &str, min_digits: usize, max_digits: usize) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Phone {
                min_digits,
                max_digits,
                allow_plus: false,
                accept_email: false,
            },
        )
    }

    /// Phone number with optional `+`, or an email address.
    pub fn contact(name: &str, label: &str, min_digits: usize, max_digits: usize) -> Self {
        Self::new(
            name,
            label,
            FieldKind::Phone {
                min_digits,
                max_digits,
                allow_plus: true,
                accept_email: true,
            },
        )
    }

    pub fn date(name: &str, label: &str, bound: DateBound) -> Self {
        Self::new(name, label, FieldKind::Date { bound })
    }

    pub fn time(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Time)
    }

    pub fn integer(name: &str, label: &str, min: Option<i64>, max: Option<i64>) -> Self {
        Self::new(name, label, FieldKind::Integer { min, max })
    }

    pub fn enumeration(name: &str, label: &str, options: Vec<EnumOption>) -> Self {
        Self::new(name, label, FieldKind::Enum { options })
    }

    pub fn boolean(name: &str, label: &str) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    // -------------------------------------------------------------------------
    // Builder methods
    // -------------------------------------------------------------------------

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn with_required_message(mut self, message: &str) -> Self {
        self.messages.required = Some(message.to_string());
        self
    }

    pub fn with_invalid_message(mut self, message: &str) -> Self {
        self.messages.invalid = Some(message.to_string());
        self
    }

    pub fn with_range_messages(mut self, below_min: Option<&str>, above_max: Option<&str>) -> Self {
        self.messages.below_min = below_min.map(str::to_string);
        self.messages.above_max = above_max.map(str::to_string);
        self
    }

    // -------------------------------------------------------------------------
    // Messages
    // -------------------------------------------------------------------------

    pub fn required_error(&self) -> String {
        self.messages
            .required
            .clone()
            .unwrap_or_else(|| format!("{} is required", self.label))
    }

    pub fn invalid_error(&self) -> String {
        self.messages
            .invalid
            .clone()
            .unwrap_or_else(|| format!("{} is invalid", self.label))
    }

    pub fn below_min_error(&self) -> String {
        if let Some(message) = &self.messages.below_min {
            return message.clone();
        }
        match &self.kind {
            FieldKind::Date {
                bound: DateBound::Future,
            } => format!("{} must be in the future", self.label),
            FieldKind::Date { .. } => format!("{} cannot be in the past", self.label),
            FieldKind::Integer { min: Some(min), .. } => {
                format!("{} must be at least {}", self.label, min)
            }
            _ => self.invalid_error(),
        }
    }

    pub fn above_max_error(&self) -> String {
        if let Some(message) = &self.messages.above_max {
            return message.clone();
        }
        match &self.kind {
            FieldKind::Integer { max: Some(max), .. } => {
                format!("{} cannot exceed {}", self.label, max)
            }
            _ => self.invalid_error(),
        }
    }

    /// Value a fresh draft starts with.
    ///
    /// Checkboxes start unchecked, dropdowns at their empty option and text
    /// inputs empty, unless the field declares its own default.
    pub fn default_value(&self) -> FieldValue {
        match (&self.default, &self.kind) {
            (Some(value), _) => value.clone(),
            (None, FieldKind::Boolean) => FieldValue::Bool(false),
            (None, _) => FieldValue::Text(String::new()),
        }
    }

    /// Whether text matches the custom pattern of a `TextFormat::Pattern`
    /// field. Patterns are anchored to the whole value.
    pub(crate) fn pattern_matches(&self, pattern: &str, text: &str) -> bool {
        match &self.compiled {
            Some(re) => re.is_match(text),
            None => anchored(pattern).map(|re| re.is_match(text)).unwrap_or(false),
        }
    }

    fn compile(&mut self) -> CoreResult<()> {
        if let FieldKind::Text {
            format: TextFormat::Pattern(pattern),
        } = &self.kind
        {
            let re = anchored(pattern).map_err(|e| {
                CoreError::InvalidSchema(format!("field '{}' has a bad pattern: {}", self.name, e))
            })?;
            self.compiled = Some(re);
        }
        Ok(())
    }

    fn check(&self) -> CoreResult<()> {
        let invalid = |reason: String| -> CoreResult<()> {
            Err(CoreError::InvalidSchema(format!(
                "field '{}' {}",
                self.name, reason
            )))
        };

        match &self.kind {
            FieldKind::Enum { options } => {
                if options.is_empty() {
                    return invalid("has no options".to_string());
                }
                let mut seen = BTreeSet::new();
                for option in options {
                    if option.value.trim().is_empty() {
                        return invalid("has an empty option".to_string());
                    }
                    if !seen.insert(option.value.as_str()) {
                        return invalid(format!("repeats option '{}'", option.value));
                    }
                }
            }
            FieldKind::Integer {
                min: Some(min),
                max: Some(max),
            } if min > max => {
                return invalid(format!("has min {} above max {}", min, max));
            }
            FieldKind::Phone {
                min_digits,
                max_digits,
                ..
            } if *min_digits == 0 || min_digits > max_digits => {
                return invalid(format!(
                    "has an unusable digit range {}-{}",
                    min_digits, max_digits
                ));
            }
            _ => {}
        }
        Ok(())
    }
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

// =============================================================================
// Cross-Field Rules and Line Items
// =============================================================================

/// A rule comparing two fields. The error is reported on the later field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CrossFieldRule {
    /// `end` must be strictly after `start` (same day, no wraparound).
    TimeOrder {
        start: String,
        end: String,
        message: String,
    },
    /// `second` must be strictly after `first`.
    DateOrder {
        first: String,
        second: String,
        message: String,
    },
}

/// Count limits and catalog for forms with repeatable line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemPolicy {
    pub min_items: usize,
    pub max_items: usize,
    /// Field holding the selected item type, e.g. `itemType`.
    pub type_field: String,
    /// Item types not subject to the count limits.
    pub exempt_types: Vec<String>,
    /// Items offered per item type.
    pub offered: BTreeMap<String, Vec<String>>,
}

impl LineItemPolicy {
    pub fn is_exempt(&self, item_type: &str) -> bool {
        self.exempt_types.iter().any(|t| t == item_type)
    }

    /// Items offered for a type, if the catalog lists any.
    pub fn offered_for(&self, item_type: &str) -> Option<&[String]> {
        self.offered
            .get(item_type)
            .filter(|items| !items.is_empty())
            .map(Vec::as_slice)
    }
}

// =============================================================================
// Form Schema
// =============================================================================

/// The complete field table of one form.
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FormSchema {
    fields: Vec<FieldSpec>,
    rules: Vec<CrossFieldRule>,
    line_items: Option<LineItemPolicy>,
}

impl FormSchema {
    /// Builds and checks a schema.
    ///
    /// ## Errors
    /// `CoreError::InvalidSchema` when a field name is empty or repeated,
    /// an enum has no options, a range or pattern is unusable, a rule names
    /// a missing field or one of the wrong kind, or the line item type
    /// field does not exist.
    pub fn new(
        fields: Vec<FieldSpec>,
        rules: Vec<CrossFieldRule>,
        line_items: Option<LineItemPolicy>,
    ) -> CoreResult<Self> {
        let mut fields = fields;
        let mut names = BTreeSet::new();
        for field in &mut fields {
            if field.name.trim().is_empty() {
                return Err(CoreError::InvalidSchema(
                    "a field has an empty name".to_string(),
                ));
            }
            if !names.insert(field.name.clone()) {
                return Err(CoreError::InvalidSchema(format!(
                    "field '{}' is declared twice",
                    field.name
                )));
            }
            field.check()?;
            field.compile()?;
        }

        let schema = Self {
            fields,
            rules,
            line_items,
        };
        schema.check_rules()?;
        schema.check_line_items()?;
        Ok(schema)
    }

    fn check_rules(&self) -> CoreResult<()> {
        for rule in &self.rules {
            let (a, b, kind) = match rule {
                CrossFieldRule::TimeOrder { start, end, .. } => (start, end, "time"),
                CrossFieldRule::DateOrder { first, second, .. } => (first, second, "date"),
            };
            for name in [a, b] {
                let field = self.field(name).ok_or_else(|| {
                    CoreError::InvalidSchema(format!("rule names unknown field '{}'", name))
                })?;
                if field.kind.name() != kind {
                    return Err(CoreError::InvalidSchema(format!(
                        "rule needs a {} field but '{}' is {}",
                        kind,
                        name,
                        field.kind.name()
                    )));
                }
            }
        }
        Ok(())
    }

    fn check_line_items(&self) -> CoreResult<()> {
        if let Some(policy) = &self.line_items {
            if self.field(&policy.type_field).is_none() {
                return Err(CoreError::InvalidSchema(format!(
                    "line item type field '{}' does not exist",
                    policy.type_field
                )));
            }
            if policy.min_items > policy.max_items {
                return Err(CoreError::InvalidSchema(format!(
                    "line item minimum {} is above maximum {}",
                    policy.min_items, policy.max_items
                )));
            }
        }
        Ok(())
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn rules(&self) -> &[CrossFieldRule] {
        &self.rules
    }

    pub fn line_items(&self) -> Option<&LineItemPolicy> {
        self.line_items.as_ref()
    }

    /// Every field at its reset value.
    pub fn default_values(&self) -> BTreeMap<String, FieldValue> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.default_value()))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
