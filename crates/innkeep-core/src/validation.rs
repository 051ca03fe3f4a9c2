//! # Validation Module
//!
//! Field, cross-field and line-item validators for Innkeep forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Edit time (engine)                                           │
//! │  ├── Duplicate line item        → ValidationError (edit refused)       │
//! │  └── Item not offered for type  → ValidationError (edit refused)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Submit time (THIS MODULE, validate_form)                     │
//! │  ├── Every field on its own     → validate_field                       │
//! │  ├── Field pairs                → time order, date order               │
//! │  └── Line items                 → count limits, quantity and price     │
//! │                                                                         │
//! │  Submit-time failures are collected, never fail-fast: the user sees    │
//! │  every problem on the form at once.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use innkeep_core::validation::{is_email, is_letters_and_spaces, is_phone};
//!
//! assert!(is_email("john.doe@example.com"));
//! assert!(is_letters_and_spaces("John Doe"));
//! assert!(is_phone("+94771234567", 7, 15, true));
//! ```

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::money::Money;
use crate::schema::{CrossFieldRule, DateBound, FieldKind, FieldSpec, FormSchema, LineItemPolicy, TextFormat};
use crate::types::{FieldValue, LineItem, ValidationResult};
use crate::{MAX_ITEM_QUANTITY, MAX_UNIT_PRICE_CENTS};

/// Error key for line item count problems.
pub const ITEM_DETAILS_KEY: &str = "itemDetails";

static LETTERS_AND_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z ]+$").expect("letters pattern is valid"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

// =============================================================================
// Predicates
// =============================================================================

/// `local@domain.tld` with no whitespace anywhere.
pub fn is_email(text: &str) -> bool {
    EMAIL.is_match(text)
}

/// Only ASCII letters and spaces, at least one character.
pub fn is_letters_and_spaces(text: &str) -> bool {
    LETTERS_AND_SPACES.is_match(text)
}

/// Digits only, `min..=max` of them, with an optional leading `+` when
/// `allow_plus` is set.
pub fn is_phone(text: &str, min_digits: usize, max_digits: usize, allow_plus: bool) -> bool {
    let digits = match text.strip_prefix('+') {
        Some(rest) if allow_plus => rest,
        Some(_) => return false,
        None => text,
    };
    !digits.is_empty()
        && digits.chars().all(|c| c.is_ascii_digit())
        && (min_digits..=max_digits).contains(&digits.len())
}

/// Parses `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Parses 24 hour `HH:MM`.
pub fn parse_time(text: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(text.trim(), "%H:%M").ok()
}

fn raw_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::Integer(n) => Some(n.to_string()),
        FieldValue::Bool(_) => None,
    }
}

// =============================================================================
// Single Field
// =============================================================================

/// Validates one field on its own.
///
/// Returns the message to show next to the field, or `None` when the value
/// is acceptable. A blank optional field is always acceptable.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use innkeep_core::schema::{DateBound, FieldSpec};
/// use innkeep_core::validation::validate_field;
/// use innkeep_core::FieldValue;
///
/// let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
/// let spec = FieldSpec::date("eventDate", "Event date", DateBound::Future).required();
///
/// let same_day = FieldValue::from("2025-07-01");
/// assert_eq!(
///     validate_field(&spec, Some(&same_day), today).as_deref(),
///     Some("Event date must be in the future")
/// );
/// assert_eq!(validate_field(&spec, None, today).as_deref(), Some("Event date is required"));
/// ```
pub fn validate_field(
    spec: &FieldSpec,
    value: Option<&FieldValue>,
    today: NaiveDate,
) -> Option<String> {
    let value = match value {
        Some(v) if !v.is_blank() => v,
        _ => return spec.required.then(|| spec.required_error()),
    };

    match &spec.kind {
        FieldKind::Text { format } => {
            let Some(text) = raw_text(value) else {
                return Some(spec.invalid_error());
            };
            let ok = match format {
                TextFormat::Free => true,
                TextFormat::LettersAndSpaces => is_letters_and_spaces(&text),
                TextFormat::Pattern(pattern) => spec.pattern_matches(pattern, &text),
            };
            (!ok).then(|| spec.invalid_error())
        }
        FieldKind::Email => match value.as_text() {
            Some(text) if is_email(text) => None,
            _ => Some(spec.invalid_error()),
        },
        FieldKind::Phone {
            min_digits,
            max_digits,
            allow_plus,
            accept_email,
        } => {
            let ok = raw_text(value).map_or(false, |text| {
                let text = text.trim();
                is_phone(text, *min_digits, *max_digits, *allow_plus)
                    || (*accept_email && is_email(text))
            });
            (!ok).then(|| spec.invalid_error())
        }
        FieldKind::Date { bound } => {
            let date = match value.as_text().and_then(parse_date) {
                Some(date) => date,
                None => return Some(spec.invalid_error()),
            };
            let out_of_bound = match bound {
                DateBound::Any => false,
                DateBound::NotPast => date < today,
                DateBound::Future => date <= today,
            };
            out_of_bound.then(|| spec.below_min_error())
        }
        FieldKind::Time => match value.as_text().and_then(parse_time) {
            Some(_) => None,
            None => Some(spec.invalid_error()),
        },
        FieldKind::Integer { min, max } => {
            let n = match value.as_integer() {
                Some(n) => n,
                None => return Some(spec.invalid_error()),
            };
            if min.map_or(false, |min| n < min) {
                Some(spec.below_min_error())
            } else if max.map_or(false, |max| n > max) {
                Some(spec.above_max_error())
            } else {
                None
            }
        }
        FieldKind::Enum { .. } => {
            let selected = value.as_text().map(str::trim).unwrap_or_default();
            if spec.kind.option_values().any(|option| option == selected) {
                None
            } else {
                Some(spec.required_error())
            }
        }
        FieldKind::Boolean => match value.as_bool() {
            Some(true) => None,
            Some(false) if !spec.required => None,
            Some(false) => Some(spec.required_error()),
            None => Some(spec.invalid_error()),
        },
    }
}

// =============================================================================
// Cross-Field Rules
// =============================================================================

/// Applies cross-field rules, adding errors to `errors`.
///
/// A rule only runs when both values parse and the later field has no error
/// of its own, so a field never carries two messages.
pub fn validate_rules(
    rules: &[CrossFieldRule],
    values: &BTreeMap<String, FieldValue>,
    errors: &mut BTreeMap<String, String>,
) {
    let text = |name: &str| values.get(name).and_then(FieldValue::as_text);

    for rule in rules {
        let (later, in_order, message) = match rule {
            CrossFieldRule::TimeOrder {
                start,
                end,
                message,
            } => {
                let start_time = text(start).and_then(parse_time);
                let end_time = text(end).and_then(parse_time);
                match (start_time, end_time) {
                    (Some(s), Some(e)) => (end, e > s, message),
                    _ => continue,
                }
            }
            CrossFieldRule::DateOrder {
                first,
                second,
                message,
            } => {
                let first_date = text(first).and_then(parse_date);
                let second_date = text(second).and_then(parse_date);
                match (first_date, second_date) {
                    (Some(f), Some(s)) => (second, s > f, message),
                    _ => continue,
                }
            }
        };

        if !in_order && !errors.contains_key(later) {
            errors.insert(later.clone(), message.clone());
        }
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// Checks the selected items against the count limits and checks each
/// item's quantity and price: both present, not negative, and within
/// [`MAX_ITEM_QUANTITY`] and [`MAX_UNIT_PRICE_CENTS`].
///
/// Count errors are keyed [`ITEM_DETAILS_KEY`]; per item errors are keyed
/// `itemDetails.<item name>`. Exempt item types skip the count limits but
/// still need at least one item.
pub fn validate_line_items(
    policy: &LineItemPolicy,
    item_type: Option<&str>,
    items: &[LineItem],
    errors: &mut BTreeMap<String, String>,
) {
    let exempt = item_type.map_or(false, |t| policy.is_exempt(t));
    let count = items.len();

    if exempt {
        if count == 0 {
            errors.insert(
                ITEM_DETAILS_KEY.to_string(),
                "At least one item must be selected.".to_string(),
            );
        }
    } else if count < policy.min_items {
        errors.insert(
            ITEM_DETAILS_KEY.to_string(),
            format!("Minimum {} items should be selected.", policy.min_items),
        );
    } else if count > policy.max_items {
        errors.insert(
            ITEM_DETAILS_KEY.to_string(),
            format!("Maximum {} items can be selected.", policy.max_items),
        );
    }

    for item in items {
        let key = format!("{}.{}", ITEM_DETAILS_KEY, item.name);
        match (item.quantity, item.unit_price) {
            (Some(qty), Some(price)) => {
                if qty < 0 || price.is_negative() {
                    errors.insert(key, "negative values are not valid".to_string());
                } else if qty > MAX_ITEM_QUANTITY {
                    errors.insert(
                        key,
                        format!("Quantity cannot exceed {} for {}", MAX_ITEM_QUANTITY, item.name),
                    );
                } else if price > Money::from_cents(MAX_UNIT_PRICE_CENTS) {
                    errors.insert(
                        key,
                        format!(
                            "Unit price cannot exceed {} for {}",
                            Money::from_cents(MAX_UNIT_PRICE_CENTS),
                            item.name
                        ),
                    );
                }
            }
            _ => {
                errors.insert(key, format!("Quantity and price are required for {}", item.name));
            }
        }
    }
}

/// Refuses an item that is already selected.
pub fn check_duplicate(items: &[LineItem], name: &str) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.name == name) {
        return Err(ValidationError::DuplicateItem {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Refuses an item the catalog does not list for the selected type.
///
/// With no type selected, or a type the catalog has no list for, any item
/// is accepted.
pub fn check_offered(
    policy: &LineItemPolicy,
    item_type: Option<&str>,
    name: &str,
) -> Result<(), ValidationError> {
    let Some(item_type) = item_type else {
        return Ok(());
    };
    match policy.offered_for(item_type) {
        Some(offered) if !offered.iter().any(|item| item == name) => {
            Err(ValidationError::ItemNotOffered {
                name: name.to_string(),
                item_type: item_type.to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// The selected line item type, if one is chosen.
pub fn selected_item_type<'a>(
    policy: &LineItemPolicy,
    values: &'a BTreeMap<String, FieldValue>,
) -> Option<&'a str> {
    values
        .get(&policy.type_field)
        .and_then(FieldValue::as_text)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

// =============================================================================
// Whole Form
// =============================================================================

/// Runs every validator of a schema and collects all failures.
pub fn validate_form(
    schema: &FormSchema,
    values: &BTreeMap<String, FieldValue>,
    items: &[LineItem],
    today: NaiveDate,
) -> ValidationResult {
    let mut errors = BTreeMap::new();

    for spec in schema.fields() {
        if let Some(message) = validate_field(spec, values.get(&spec.name), today) {
            errors.insert(spec.name.clone(), message);
        }
    }

    validate_rules(schema.rules(), values, &mut errors);

    if let Some(policy) = schema.line_items() {
        let item_type = selected_item_type(policy, values);
        validate_line_items(policy, item_type, items, &mut errors);
    }

    ValidationResult::from_errors(errors)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::schema::EnumOption;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn check(spec: &FieldSpec, value: impl Into<FieldValue>) -> Option<String> {
        validate_field(spec, Some(&value.into()), today())
    }

    fn kitchen_policy() -> LineItemPolicy {
        let mut offered = BTreeMap::new();
        offered.insert(
            "Vegetables".to_string(),
            vec!["Tomato".to_string(), "Onion".to_string()],
        );
        LineItemPolicy {
            min_items: 5,
            max_items: 10,
            type_field: "itemType".to_string(),
            exempt_types: vec!["Water".to_string()],
            offered,
        }
    }

    fn priced(name: &str, qty: i64, price: i64) -> LineItem {
        LineItem::new(name).with_values(qty, Money::from_major(price))
    }

    #[test]
    fn test_predicates() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("abc.com"));
        assert!(!is_email("a@bcom"));

        assert!(is_letters_and_spaces("Jane Smith"));
        assert!(!is_letters_and_spaces("Jane3"));
        assert!(!is_letters_and_spaces(""));

        assert!(is_phone("1234567890", 10, 10, false));
        assert!(!is_phone("123456789", 10, 10, false));
        assert!(!is_phone("+1234567890", 10, 10, false));
        assert!(is_phone("+1234567", 7, 15, true));
        assert!(!is_phone("+", 7, 15, true));
    }

    #[test]
    fn test_required_text() {
        let spec = FieldSpec::text("eventName", "Event name", TextFormat::Free).required();
        assert_eq!(check(&spec, "   ").as_deref(), Some("Event name is required"));
        assert_eq!(validate_field(&spec, None, today()).as_deref(), Some("Event name is required"));
        assert_eq!(check(&spec, "Gala"), None);

        let optional = FieldSpec::text("remarks", "Remarks", TextFormat::Free);
        assert_eq!(check(&optional, ""), None);
    }

    #[test]
    fn test_name_field() {
        let spec = FieldSpec::text("fullName", "Full Name", TextFormat::LettersAndSpaces)
            .required()
            .with_invalid_message("Only letters and spaces allowed");
        assert_eq!(check(&spec, "John Doe"), None);
        assert_eq!(check(&spec, "John D0e").as_deref(), Some("Only letters and spaces allowed"));
    }

    #[test]
    fn test_email_field() {
        let spec = FieldSpec::email("email", "Email").required();
        assert_eq!(check(&spec, ""), Some("Email is required".to_string()));
        assert_eq!(check(&spec, "john@"), Some("Email is invalid".to_string()));
        assert_eq!(check(&spec, "john@example.com"), None);
    }

    #[test]
    fn test_contact_accepts_phone_or_email() {
        let spec = FieldSpec::contact("supplierContact", "Supplier contact", 7, 15)
            .required()
            .with_invalid_message("Enter the valid email/contact");
        assert_eq!(check(&spec, "0771234567"), None);
        assert_eq!(check(&spec, "+94771234567"), None);
        assert_eq!(check(&spec, "orders@farm.lk"), None);
        assert_eq!(check(&spec, "12ab").as_deref(), Some("Enter the valid email/contact"));
    }

    #[test]
    fn test_date_bounds() {
        let future = FieldSpec::date("eventDate", "Event date", DateBound::Future).required();
        assert_eq!(check(&future, "2025-07-02"), None);
        assert!(check(&future, "2025-07-01").is_some());
        assert_eq!(check(&future, "next week").as_deref(), Some("Event date is invalid"));

        let not_past = FieldSpec::date("checkIn", "Check-in date", DateBound::NotPast).required();
        assert_eq!(check(&not_past, "2025-07-01"), None);
        assert_eq!(
            check(&not_past, "2025-06-30").as_deref(),
            Some("Check-in date cannot be in the past")
        );
    }

    #[test]
    fn test_integer_range() {
        let spec = FieldSpec::integer("numberOfGuests", "Number of guests", Some(1), Some(1000))
            .required();
        assert_eq!(check(&spec, 0i64).as_deref(), Some("Number of guests must be at least 1"));
        assert_eq!(check(&spec, 1001i64).as_deref(), Some("Number of guests cannot exceed 1000"));
        assert_eq!(check(&spec, "50"), None);
        assert_eq!(check(&spec, "fifty").as_deref(), Some("Number of guests is invalid"));
    }

    #[test]
    fn test_enum_membership() {
        let spec = FieldSpec::enumeration(
            "eventType",
            "Event type",
            vec![EnumOption::new("wedding", "Wedding")],
        )
        .required();
        assert_eq!(check(&spec, "wedding"), None);
        assert_eq!(check(&spec, "funeral").as_deref(), Some("Event type is required"));
        assert_eq!(check(&spec, "").as_deref(), Some("Event type is required"));
    }

    #[test]
    fn test_terms_checkbox_must_be_checked() {
        let spec = FieldSpec::boolean("agreeTerms", "Terms")
            .required()
            .with_required_message("You must agree to the terms and conditions");
        assert_eq!(
            check(&spec, false).as_deref(),
            Some("You must agree to the terms and conditions")
        );
        assert_eq!(check(&spec, true), None);

        let optional = FieldSpec::boolean("spa", "Spa");
        assert_eq!(check(&optional, false), None);
    }

    #[test]
    fn test_time_order_rule() {
        let rules = vec![CrossFieldRule::TimeOrder {
            start: "startTime".to_string(),
            end: "endTime".to_string(),
            message: "End time must be after start time".to_string(),
        }];
        let mut values = BTreeMap::new();
        values.insert("startTime".to_string(), FieldValue::from("14:00"));
        values.insert("endTime".to_string(), FieldValue::from("14:00"));

        let mut errors = BTreeMap::new();
        validate_rules(&rules, &values, &mut errors);
        assert_eq!(
            errors.get("endTime").map(String::as_str),
            Some("End time must be after start time")
        );

        values.insert("endTime".to_string(), FieldValue::from("19:00"));
        let mut errors = BTreeMap::new();
        validate_rules(&rules, &values, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_rule_skipped_when_field_already_failed() {
        let rules = vec![CrossFieldRule::DateOrder {
            first: "checkIn".to_string(),
            second: "checkOut".to_string(),
            message: "Check-out must be after check-in".to_string(),
        }];
        let mut values = BTreeMap::new();
        values.insert("checkIn".to_string(), FieldValue::from("2025-06-15"));
        values.insert("checkOut".to_string(), FieldValue::from("2025-06-10"));

        let mut errors = BTreeMap::new();
        errors.insert("checkOut".to_string(), "Check-out date cannot be in the past".to_string());
        validate_rules(&rules, &values, &mut errors);
        assert_eq!(
            errors.get("checkOut").map(String::as_str),
            Some("Check-out date cannot be in the past")
        );
    }

    #[test]
    fn test_line_item_minimum() {
        let items: Vec<LineItem> = (0..4).map(|i| priced(&format!("Item{}", i), 1, 1)).collect();
        let mut errors = BTreeMap::new();
        validate_line_items(&kitchen_policy(), Some("Vegetables"), &items, &mut errors);
        assert_eq!(
            errors.get(ITEM_DETAILS_KEY).map(String::as_str),
            Some("Minimum 5 items should be selected.")
        );
    }

    #[test]
    fn test_line_item_maximum() {
        let items: Vec<LineItem> = (0..11).map(|i| priced(&format!("Item{}", i), 1, 1)).collect();
        let mut errors = BTreeMap::new();
        validate_line_items(&kitchen_policy(), Some("Vegetables"), &items, &mut errors);
        assert_eq!(
            errors.get(ITEM_DETAILS_KEY).map(String::as_str),
            Some("Maximum 10 items can be selected.")
        );
    }

    #[test]
    fn test_water_is_exempt_from_count_limits() {
        let mut errors = BTreeMap::new();
        validate_line_items(&kitchen_policy(), Some("Water"), &[priced("Bottled Water", 2, 1)], &mut errors);
        assert!(errors.is_empty());

        validate_line_items(&kitchen_policy(), Some("Water"), &[], &mut errors);
        assert!(errors.contains_key(ITEM_DETAILS_KEY));
    }

    #[test]
    fn test_line_item_values() {
        let items = vec![
            LineItem::new("Tomato"),
            priced("Onion", -1, 4),
            priced("Potato", 1, 10),
        ];
        let mut errors = BTreeMap::new();
        validate_line_items(&kitchen_policy(), Some("Vegetables"), &items, &mut errors);
        assert_eq!(
            errors.get("itemDetails.Tomato").map(String::as_str),
            Some("Quantity and price are required for Tomato")
        );
        assert_eq!(
            errors.get("itemDetails.Onion").map(String::as_str),
            Some("negative values are not valid")
        );
        assert!(!errors.contains_key("itemDetails.Potato"));
    }

    #[test]
    fn test_line_item_upper_bounds() {
        let items = vec![
            priced("Tomato", 10_000, 1_000_000),
            priced("Onion", 10_001, 1),
            priced("Potato", i64::MAX, 1),
            LineItem::new("Carrot").with_values(1, Money::from_cents(100_000_001)),
            LineItem::new("Cabbage").with_values(1, Money::from_cents(i64::MAX)),
        ];
        let mut errors = BTreeMap::new();
        validate_line_items(&kitchen_policy(), Some("Vegetables"), &items, &mut errors);

        assert!(!errors.contains_key("itemDetails.Tomato"));
        assert_eq!(
            errors.get("itemDetails.Onion").map(String::as_str),
            Some("Quantity cannot exceed 10000 for Onion")
        );
        assert_eq!(
            errors.get("itemDetails.Potato").map(String::as_str),
            Some("Quantity cannot exceed 10000 for Potato")
        );
        assert_eq!(
            errors.get("itemDetails.Carrot").map(String::as_str),
            Some("Unit price cannot exceed 1000000.00 for Carrot")
        );
        assert_eq!(
            errors.get("itemDetails.Cabbage").map(String::as_str),
            Some("Unit price cannot exceed 1000000.00 for Cabbage")
        );
    }

    #[test]
    fn test_check_duplicate_and_offered() {
        let items = vec![LineItem::new("Tomato")];
        assert_eq!(
            check_duplicate(&items, "Tomato"),
            Err(ValidationError::DuplicateItem {
                name: "Tomato".to_string()
            })
        );
        assert!(check_duplicate(&items, "Onion").is_ok());

        let policy = kitchen_policy();
        assert!(check_offered(&policy, Some("Vegetables"), "Onion").is_ok());
        assert!(check_offered(&policy, Some("Vegetables"), "Salmon").is_err());
        assert!(check_offered(&policy, None, "Salmon").is_ok());
        assert!(check_offered(&policy, Some("Juice"), "Salmon").is_ok());
    }
}
