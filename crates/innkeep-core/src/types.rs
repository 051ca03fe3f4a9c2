//! # Domain Types
//!
//! Core domain types used throughout Innkeep.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DraftBooking   │   │ValidationResult │   │  Confirmation   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (EVT-/BK-)  │   │  is_valid       │   │  id             │       │
//! │  │  domain         │   │  errors         │   │  headline       │       │
//! │  │  state          │   │  field → text   │   │  fields         │       │
//! │  │  fields         │   └─────────────────┘   │  breakdown      │       │
//! │  │  line_items     │                         └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   FieldValue    │   │   FormState     │   │PricingBreakdown │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Bool           │   │  Draft          │   │  components     │       │
//! │  │  Integer        │   │  Submitting     │   │  total = Σ      │       │
//! │  │  Text           │   │  Confirmed      │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Draft Lifecycle
//! A draft is created with every field at its default, edited field by
//! field, submitted, and either returned to `Draft` with errors or moved to
//! `Confirmed`. Acknowledging a confirmation hands back a fresh draft.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Domain
// =============================================================================

/// The three booking forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Event booking (weddings, conferences, parties).
    Event,
    /// Hotel room booking.
    Room,
    /// Kitchen supply order.
    Kitchen,
}

impl Domain {
    /// All domains in display order.
    pub const ALL: [Domain; 3] = [Domain::Event, Domain::Room, Domain::Kitchen];

    /// Lowercase name used in logs, file names and the CLI.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Domain::Event => "event",
            Domain::Room => "room",
            Domain::Kitchen => "kitchen",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "event" | "event-booking" => Ok(Domain::Event),
            "room" | "room-booking" => Ok(Domain::Room),
            "kitchen" | "kitchen-order" => Ok(Domain::Kitchen),
            other => Err(CoreError::UnknownDomain(other.to_string())),
        }
    }
}

// =============================================================================
// Field Value
// =============================================================================

/// A raw value as entered into a form control.
///
/// Numeric inputs may deliver either a number or the text the user typed;
/// the validators accept both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl FieldValue {
    /// Checkbox state. Only an actual `true` counts as checked.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer value, parsing text input when needed.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    /// Text value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Empty or whitespace-only text. Numbers and booleans are never blank.
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{}", if *b { "Yes" } else { "No" }),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One selected item on a kitchen order.
///
/// Quantity and price start empty: the user picks an item, then types both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Item name, unique within a draft.
    pub name: String,

    /// Units ordered.
    pub quantity: Option<i64>,

    /// Price per unit.
    pub unit_price: Option<Money>,
}

impl LineItem {
    /// Creates a line item with no quantity or price yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit_price: None,
        }
    }

    /// Sets quantity and unit price.
    pub fn with_values(mut self, quantity: i64, unit_price: Money) -> Self {
        self.quantity = Some(quantity);
        self.unit_price = Some(unit_price);
        self
    }

    /// quantity × unit price, when both are present and the product fits.
    pub fn line_total(&self) -> Option<Money> {
        match (self.quantity, self.unit_price) {
            (Some(qty), Some(price)) => price.checked_mul(qty),
            _ => None,
        }
    }
}

// =============================================================================
// Form State
// =============================================================================

/// Where a draft is in its lifecycle.
///
/// ## State Machine
/// ```text
///             submit (errors)
///          ┌─────────────────────┐
///          ▼                     │
///     ┌─────────┐  submit   ┌────┴───────┐  valid   ┌───────────┐
///     │  Draft  │ ────────► │ Submitting │ ───────► │ Confirmed │
///     └─────────┘           └────────────┘          └─────┬─────┘
///          ▲                                              │
///          └──────────────── acknowledge (fresh draft) ◄──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// Editable.
    Draft,
    /// Validation and pricing in progress.
    Submitting,
    /// Accepted and priced. Read-only.
    Confirmed,
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormState::Draft => "draft",
            FormState::Submitting => "submitting",
            FormState::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Draft Booking
// =============================================================================

/// A booking or order being filled in.
///
/// Fields are private to the crate: every mutation goes through the engine
/// so state rules are enforced in one place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DraftBooking {
    pub(crate) id: String,
    pub(crate) domain: Domain,
    pub(crate) state: FormState,
    pub(crate) fields: BTreeMap<String, FieldValue>,
    pub(crate) line_items: Vec<LineItem>,
}

impl DraftBooking {
    /// Draft identifier, e.g. `EVT-0M2K4Z1R8Q0A0`.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Current value of a field.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// All field values by name.
    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Selected line items in the order they were added.
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }
}

// =============================================================================
// Validation Result
// =============================================================================

/// Outcome of validating a whole form.
///
/// `is_valid` is true exactly when `errors` is empty; the constructor keeps
/// the two in step. Deserializing ignores any incoming `isValid` and derives
/// it from `errors` again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
#[serde(from = "RawValidationResult")]
pub struct ValidationResult {
    is_valid: bool,
    errors: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawValidationResult {
    #[serde(default)]
    errors: BTreeMap<String, String>,
}

impl From<RawValidationResult> for ValidationResult {
    fn from(raw: RawValidationResult) -> Self {
        Self::from_errors(raw.errors)
    }
}

impl ValidationResult {
    /// Builds a result from field → message pairs.
    pub fn from_errors(errors: BTreeMap<String, String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// A result with no errors.
    pub fn valid() -> Self {
        Self::from_errors(BTreeMap::new())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Error message per field key. Line item errors use `itemDetails` or
    /// `itemDetails.<item name>`.
    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// Message for one field.
    pub fn error_for(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }
}

// =============================================================================
// Pricing Breakdown
// =============================================================================

/// A labelled amount, e.g. "Room Cost" or "Tomato".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CostComponent {
    pub label: String,
    pub amount: Money,
}

impl CostComponent {
    pub fn new(label: impl Into<String>, amount: Money) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// Itemized price of a confirmed booking.
///
/// The total is always the exact sum of the components; a set of components
/// whose sum overflows has no breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingBreakdown {
    components: Vec<CostComponent>,
    total: Money,
}

impl PricingBreakdown {
    /// Sums the components, `None` if the total overflows.
    pub fn from_components(components: Vec<CostComponent>) -> Option<Self> {
        let total = Money::checked_sum(components.iter().map(|c| c.amount))?;
        Some(Self { components, total })
    }

    pub fn components(&self) -> &[CostComponent] {
        &self.components
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

// =============================================================================
// Confirmation
// =============================================================================

/// Read-only summary shown once a booking is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    /// Same id as the draft it confirms.
    pub id: String,
    pub domain: Domain,
    /// e.g. "Booking Confirmed".
    pub headline: String,
    /// Submitted values, keyed by field label, in form order.
    pub fields: Vec<(String, String)>,
    pub line_items: Vec<LineItem>,
    pub breakdown: PricingBreakdown,
}

/// Result of a submit: either accepted or sent back with errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum SubmitOutcome {
    Confirmed(Confirmation),
    Rejected(ValidationResult),
}

impl SubmitOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmitOutcome::Confirmed(_))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_parse_accepts_aliases() {
        assert_eq!("event".parse::<Domain>().unwrap(), Domain::Event);
        assert_eq!("Room-Booking".parse::<Domain>().unwrap(), Domain::Room);
        assert_eq!("kitchen-order".parse::<Domain>().unwrap(), Domain::Kitchen);
        assert!(matches!(
            "spa".parse::<Domain>(),
            Err(CoreError::UnknownDomain(_))
        ));
    }

    #[test]
    fn test_field_value_helpers() {
        assert_eq!(FieldValue::from("42").as_integer(), Some(42));
        assert_eq!(FieldValue::from(" 7 ").as_integer(), Some(7));
        assert_eq!(FieldValue::from("four").as_integer(), None);
        assert_eq!(FieldValue::from(true).as_integer(), None);
        assert!(FieldValue::from("   ").is_blank());
        assert!(!FieldValue::from(0i64).is_blank());
        assert_eq!(FieldValue::from(true).as_bool(), Some(true));
        assert_eq!(FieldValue::from("true").as_bool(), None);
    }

    #[test]
    fn test_field_value_untagged_json() {
        let values: Vec<FieldValue> = serde_json::from_str(r#"[true, 3, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                FieldValue::Bool(true),
                FieldValue::Integer(3),
                FieldValue::Text("x".to_string())
            ]
        );
    }

    #[test]
    fn test_validation_result_flag_tracks_errors() {
        assert!(ValidationResult::valid().is_valid());

        let mut errors = BTreeMap::new();
        errors.insert("email".to_string(), "Valid email is required".to_string());
        let result = ValidationResult::from_errors(errors);
        assert!(!result.is_valid());
        assert_eq!(result.error_for("email"), Some("Valid email is required"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], serde_json::Value::Bool(false));
    }

    #[test]
    fn test_breakdown_total_is_sum_of_components() {
        let breakdown = PricingBreakdown::from_components(vec![
            CostComponent::new("Room Cost", Money::from_major(150_000)),
            CostComponent::new("Breakfast", Money::from_major(30_000)),
            CostComponent::new("Golf", Money::from_major(90_000)),
        ])
        .unwrap();
        assert_eq!(breakdown.total(), Money::from_major(270_000));
        assert_eq!(breakdown.components().len(), 3);
    }

    #[test]
    fn test_breakdown_overflow_has_no_total() {
        let breakdown = PricingBreakdown::from_components(vec![
            CostComponent::new("Room Cost", Money::from_cents(i64::MAX)),
            CostComponent::new("Breakfast", Money::from_major(30_000)),
        ]);
        assert_eq!(breakdown, None);
    }

    #[test]
    fn test_deserialized_validation_result_recomputes_flag() {
        let result: ValidationResult =
            serde_json::from_str(r#"{"isValid":true,"errors":{"email":"Valid email is required"}}"#)
                .unwrap();
        assert!(!result.is_valid());
        assert_eq!(result.error_for("email"), Some("Valid email is required"));

        let result: ValidationResult = serde_json::from_str(r#"{"isValid":false}"#).unwrap();
        assert!(result.is_valid());
        assert_eq!(result, ValidationResult::valid());
    }

    #[test]
    fn test_line_item_total() {
        let item = LineItem::new("Tomato");
        assert_eq!(item.line_total(), None);
        let item = item.with_values(2, Money::from_major(5));
        assert_eq!(item.line_total(), Some(Money::from_major(10)));
        let item = LineItem::new("Tomato").with_values(i64::MAX, Money::from_major(5));
        assert_eq!(item.line_total(), None);
    }
}
