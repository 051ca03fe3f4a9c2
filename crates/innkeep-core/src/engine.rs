//! # Booking Engine
//!
//! The form state machine shared by all three domains.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Booking Engine Operations                            │
//! │                                                                         │
//! │  Form Action              Engine Call              Draft Change         │
//! │  ───────────              ───────────              ────────────         │
//! │                                                                         │
//! │  Open form ──────────────► new_draft() ──────────► fresh id, defaults   │
//! │                                                                         │
//! │  Type into field ────────► set_field() ──────────► fields[name] = v     │
//! │                                                                         │
//! │  Pick item ──────────────► add_line_item() ──────► items.push(item)     │
//! │                            (duplicate / not offered refused here)       │
//! │                                                                         │
//! │  Type qty / price ───────► set_line_item_*() ────► items[i].qty = n     │
//! │                                                                         │
//! │  Click Submit ───────────► submit() ─────────────► Draft | Confirmed    │
//! │                                                                         │
//! │  Close summary ──────────► acknowledge() ────────► new draft returned   │
//! │                                                                         │
//! │  NOTE: Edits never validate. Only submit runs the validators.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The engine holds no draft. Each session owns its [`DraftBooking`] and
//! passes it in, so one engine can serve any number of sessions from any
//! number of threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::domains::{event, kitchen, room};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::id::IdGenerator;
use crate::money::Money;
use crate::pricing::{EventPricing, KitchenPricing, PriceCalculator, RoomPricing, ValidatedForm};
use crate::schema::{FieldKind, FormSchema, LineItemPolicy};
use crate::settings::{BookingSettings, EventRates, KitchenSettings, RoomRates};
use crate::types::{
    Confirmation, Domain, DraftBooking, FieldValue, FormState, LineItem, PricingBreakdown,
    SubmitOutcome, ValidationResult,
};
use crate::validation::{check_duplicate, check_offered, selected_item_type, validate_form};

// =============================================================================
// Form Definition
// =============================================================================

/// Everything that makes one form different from another.
#[derive(Debug, Clone)]
pub struct FormDefinition {
    pub domain: Domain,
    /// Prefix of draft ids, e.g. `BK-`.
    pub id_prefix: String,
    /// Shown above the confirmation summary.
    pub headline: String,
    pub schema: FormSchema,
}

// =============================================================================
// Booking Engine
// =============================================================================

/// Drives drafts of one form from creation to confirmation.
#[derive(Debug)]
pub struct BookingEngine {
    definition: FormDefinition,
    ids: IdGenerator,
    pricing: Box<dyn PriceCalculator>,
    clock: Arc<dyn Clock>,
}

impl BookingEngine {
    /// Builds an engine from a form definition and its pricing strategy.
    ///
    /// ## Errors
    /// - `DomainMismatch` when the calculator prices another domain
    /// - Whatever the calculator's `verify` rejects, e.g. `UnpricedOption`
    pub fn new(definition: FormDefinition, pricing: Box<dyn PriceCalculator>) -> CoreResult<Self> {
        if pricing.domain() != definition.domain {
            return Err(CoreError::DomainMismatch {
                expected: definition.domain,
                actual: pricing.domain(),
            });
        }
        pricing.verify(&definition.schema)?;

        debug!(
            domain = %definition.domain,
            fields = definition.schema.fields().len(),
            "Booking engine ready"
        );

        Ok(Self {
            ids: IdGenerator::new(definition.id_prefix.clone()),
            definition,
            pricing,
            clock: Arc::new(SystemClock),
        })
    }

    /// Event booking engine.
    pub fn event(rates: &EventRates) -> CoreResult<Self> {
        rates.check()?;
        Self::new(event::definition(rates)?, Box::new(EventPricing::new(rates.clone())))
    }

    /// Room booking engine.
    pub fn room(rates: &RoomRates) -> CoreResult<Self> {
        rates.check()?;
        Self::new(room::definition(rates)?, Box::new(RoomPricing::new(rates.clone())))
    }

    /// Kitchen order engine.
    pub fn kitchen(settings: &KitchenSettings) -> CoreResult<Self> {
        settings.check()?;
        Self::new(kitchen::definition(settings)?, Box::new(KitchenPricing))
    }

    /// Engine for any domain, from the full settings.
    pub fn for_domain(domain: Domain, settings: &BookingSettings) -> CoreResult<Self> {
        match domain {
            Domain::Event => Self::event(&settings.event),
            Domain::Room => Self::room(&settings.room),
            Domain::Kitchen => Self::kitchen(&settings.kitchen),
        }
    }

    /// Replaces the clock date rules are checked against.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn domain(&self) -> Domain {
        self.definition.domain
    }

    pub fn schema(&self) -> &FormSchema {
        &self.definition.schema
    }

    pub fn headline(&self) -> &str {
        &self.definition.headline
    }

    // =========================================================================
    // Draft lifecycle
    // =========================================================================

    /// Starts a new draft with a fresh id and every field at its default.
    pub fn new_draft(&self) -> DraftBooking {
        let draft = DraftBooking {
            id: self.ids.next(),
            domain: self.definition.domain,
            state: FormState::Draft,
            fields: self.definition.schema.default_values(),
            line_items: Vec::new(),
        };
        debug!(id = %draft.id, domain = %draft.domain, "Draft created");
        draft
    }

    fn ensure(&self, draft: &DraftBooking, expected: FormState) -> CoreResult<()> {
        if draft.domain != self.definition.domain {
            return Err(CoreError::DomainMismatch {
                expected: self.definition.domain,
                actual: draft.domain,
            });
        }
        if draft.state != expected {
            return Err(CoreError::InvalidState {
                id: draft.id.clone(),
                expected,
                actual: draft.state,
            });
        }
        Ok(())
    }

    /// Sets one field. Does not validate.
    pub fn set_field(
        &self,
        draft: &mut DraftBooking,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> CoreResult<()> {
        self.ensure(draft, FormState::Draft)?;
        if self.definition.schema.field(name).is_none() {
            return Err(CoreError::UnknownField {
                domain: self.definition.domain,
                field: name.to_string(),
            });
        }
        draft.fields.insert(name.to_string(), value.into());
        debug!(id = %draft.id, field = name, "Field updated");
        Ok(())
    }

    // =========================================================================
    // Line items
    // =========================================================================

    fn line_item_policy(&self) -> CoreResult<&LineItemPolicy> {
        self.definition
            .schema
            .line_items()
            .ok_or(CoreError::LineItemsUnsupported(self.definition.domain))
    }

    fn line_item_mut<'d>(&self, draft: &'d mut DraftBooking, name: &str) -> CoreResult<&'d mut LineItem> {
        self.ensure(draft, FormState::Draft)?;
        self.line_item_policy()?;
        let name = name.trim();
        draft
            .line_items
            .iter_mut()
            .find(|item| item.name == name)
            .ok_or_else(|| CoreError::LineItemNotFound(name.to_string()))
    }

    /// Adds an item with empty quantity and price.
    ///
    /// ## Errors
    /// - `ValidationError::DuplicateItem` when the item is already selected
    /// - `ValidationError::ItemNotOffered` when the catalog does not list it
    ///   for the selected item type
    pub fn add_line_item(&self, draft: &mut DraftBooking, name: &str) -> CoreResult<()> {
        self.ensure(draft, FormState::Draft)?;
        let policy = self.line_item_policy()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "item".to_string(),
            }
            .into());
        }
        check_duplicate(&draft.line_items, name)?;
        check_offered(policy, selected_item_type(policy, &draft.fields), name)?;

        draft.line_items.push(LineItem::new(name));
        debug!(id = %draft.id, item = name, count = draft.line_items.len(), "Line item added");
        Ok(())
    }

    pub fn set_line_item_quantity(
        &self,
        draft: &mut DraftBooking,
        name: &str,
        quantity: i64,
    ) -> CoreResult<()> {
        self.line_item_mut(draft, name)?.quantity = Some(quantity);
        Ok(())
    }

    pub fn set_line_item_price(
        &self,
        draft: &mut DraftBooking,
        name: &str,
        unit_price: Money,
    ) -> CoreResult<()> {
        self.line_item_mut(draft, name)?.unit_price = Some(unit_price);
        Ok(())
    }

    pub fn remove_line_item(&self, draft: &mut DraftBooking, name: &str) -> CoreResult<()> {
        self.ensure(draft, FormState::Draft)?;
        self.line_item_policy()?;
        let name = name.trim();
        let index = draft
            .line_items
            .iter()
            .position(|item| item.name == name)
            .ok_or_else(|| CoreError::LineItemNotFound(name.to_string()))?;
        draft.line_items.remove(index);
        debug!(id = %draft.id, item = name, "Line item removed");
        Ok(())
    }

    // =========================================================================
    // Submit and reset
    // =========================================================================

    /// Runs every validator against the draft without changing it.
    pub fn validate(&self, draft: &DraftBooking) -> ValidationResult {
        validate_form(
            &self.definition.schema,
            &draft.fields,
            &draft.line_items,
            self.clock.today(),
        )
    }

    /// Submits a draft.
    ///
    /// On any validation failure the draft returns to `Draft` unchanged and
    /// the errors come back as `SubmitOutcome::Rejected`. Otherwise the draft
    /// is priced and moves to `Confirmed`. A price too large for i64 cents is
    /// also a rejection, keyed by the field that drove it.
    pub fn submit(&self, draft: &mut DraftBooking) -> CoreResult<SubmitOutcome> {
        self.ensure(draft, FormState::Draft)?;
        draft.state = FormState::Submitting;
        debug!(id = %draft.id, "Submit started");

        let result = self.validate(draft);
        if !result.is_valid() {
            draft.state = FormState::Draft;
            info!(id = %draft.id, errors = result.errors().len(), "Submission rejected");
            return Ok(SubmitOutcome::Rejected(result));
        }

        let form = ValidatedForm::new(&self.definition.schema, &draft.fields, &draft.line_items);
        let breakdown = match self.pricing.price(&form) {
            Ok(breakdown) => breakdown,
            Err(CoreError::AmountTooLarge { field }) => {
                draft.state = FormState::Draft;
                warn!(id = %draft.id, field = %field, "Submission rejected, amount too large");
                let mut errors = BTreeMap::new();
                errors.insert(field, "Amount is too large".to_string());
                return Ok(SubmitOutcome::Rejected(ValidationResult::from_errors(errors)));
            }
            Err(err) => {
                draft.state = FormState::Draft;
                return Err(err);
            }
        };

        let confirmation = self.confirmation(draft, breakdown);
        draft.state = FormState::Confirmed;
        info!(
            id = %draft.id,
            domain = %draft.domain,
            total = %confirmation.breakdown.total(),
            "Booking confirmed"
        );
        Ok(SubmitOutcome::Confirmed(confirmation))
    }

    /// Closes a confirmation and returns a fresh draft.
    pub fn acknowledge(&self, draft: DraftBooking) -> CoreResult<DraftBooking> {
        self.ensure(&draft, FormState::Confirmed)?;
        let fresh = self.new_draft();
        info!(previous = %draft.id, id = %fresh.id, "Form reset");
        Ok(fresh)
    }

    /// Submitted values as label/value pairs in form order, with dropdown
    /// values shown by their option label. Blank fields are left out.
    fn confirmation(&self, draft: &DraftBooking, breakdown: PricingBreakdown) -> Confirmation {
        let fields = self
            .definition
            .schema
            .fields()
            .iter()
            .filter_map(|spec| {
                let value = draft.fields.get(&spec.name).filter(|v| !v.is_blank())?;
                let shown = match (&spec.kind, value) {
                    (FieldKind::Enum { options }, FieldValue::Text(selected)) => options
                        .iter()
                        .find(|o| &o.value == selected)
                        .map(|o| o.label.clone())
                        .unwrap_or_else(|| selected.clone()),
                    _ => value.to_string(),
                };
                Some((spec.label.clone(), shown))
            })
            .collect();

        Confirmation {
            id: draft.id.clone(),
            domain: draft.domain,
            headline: self.definition.headline.clone(),
            fields,
            line_items: draft.line_items.clone(),
            breakdown,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::NaiveDate;

    fn today() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()))
    }

    fn event_engine() -> BookingEngine {
        BookingEngine::event(&EventRates::default())
            .unwrap()
            .with_clock(today())
    }

    fn room_engine() -> BookingEngine {
        BookingEngine::room(&RoomRates::default())
            .unwrap()
            .with_clock(today())
    }

    fn kitchen_engine() -> BookingEngine {
        BookingEngine::kitchen(&KitchenSettings::default())
            .unwrap()
            .with_clock(today())
    }

    fn fill(engine: &BookingEngine, draft: &mut DraftBooking, pairs: &[(&str, &str)]) {
        for (field, value) in pairs {
            engine.set_field(draft, field, *value).unwrap();
        }
    }

    fn event_draft(engine: &BookingEngine, end_time: &str) -> DraftBooking {
        let mut draft = engine.new_draft();
        fill(
            engine,
            &mut draft,
            &[
                ("eventName", "Test Event"),
                ("eventType", "wedding"),
                ("eventDate", "2025-08-01"),
                ("startTime", "14:00"),
                ("endTime", end_time),
                ("numberOfGuests", "50"),
                ("contactName", "John Doe"),
                ("contactEmail", "john.doe@example.com"),
                ("contactPhone", "1234567890"),
            ],
        );
        engine.set_field(&mut draft, "agreeTerms", true).unwrap();
        draft
    }

    fn room_draft(engine: &BookingEngine) -> DraftBooking {
        let mut draft = engine.new_draft();
        fill(
            engine,
            &mut draft,
            &[
                ("fullName", "John Doe"),
                ("email", "john.doe@example.com"),
                ("phone", "1234567890"),
                ("address1", "12 Galle Road"),
                ("state", "Western"),
                ("zip", "00300"),
                ("country", "Sri Lanka"),
                ("checkIn", "2025-06-10"),
                ("checkOut", "2025-06-15"),
                ("roomType", "standard"),
            ],
        );
        engine.set_field(&mut draft, "adults", 2i64).unwrap();
        engine.set_field(&mut draft, "agreeTerms", true).unwrap();
        draft
    }

    fn kitchen_draft(engine: &BookingEngine, items: &[(&str, i64, i64)]) -> DraftBooking {
        let mut draft = engine.new_draft();
        fill(
            engine,
            &mut draft,
            &[
                ("itemCategory", "Food"),
                ("itemType", "Vegetables"),
                ("orderDate", "2025-06-02"),
                ("expectedDeliveryDate", "2025-06-05"),
                ("supplierName", "Green Farms"),
                ("supplierContact", "0771234567"),
                ("paymentStatus", "Paid"),
                ("orderedBy", "Chef Perera"),
            ],
        );
        for (name, qty, price) in items {
            engine.add_line_item(&mut draft, name).unwrap();
            engine.set_line_item_quantity(&mut draft, name, *qty).unwrap();
            engine
                .set_line_item_price(&mut draft, name, Money::from_major(*price))
                .unwrap();
        }
        draft
    }

    fn confirmed(outcome: SubmitOutcome) -> Confirmation {
        match outcome {
            SubmitOutcome::Confirmed(confirmation) => confirmation,
            SubmitOutcome::Rejected(result) => panic!("unexpected rejection: {:?}", result.errors()),
        }
    }

    fn rejected(outcome: SubmitOutcome) -> ValidationResult {
        match outcome {
            SubmitOutcome::Rejected(result) => result,
            SubmitOutcome::Confirmed(c) => panic!("unexpected confirmation {}", c.id),
        }
    }

    const VEGETABLES: [(&str, i64, i64); 5] = [
        ("Tomato", 2, 5),
        ("Onion", 3, 4),
        ("Potato", 1, 10),
        ("Carrot", 5, 2),
        ("Cabbage", 2, 8),
    ];

    // -------------------------------------------------------------------------
    // Event
    // -------------------------------------------------------------------------

    #[test]
    fn test_event_wedding_five_hours() {
        let engine = event_engine();
        let mut draft = event_draft(&engine, "19:00");
        let confirmation = confirmed(engine.submit(&mut draft).unwrap());
        assert_eq!(confirmation.breakdown.total().to_string(), "390000.00");
        assert_eq!(confirmation.headline, "Event Booking Confirmed!");
        assert_eq!(confirmation.id, draft.id());
        assert_eq!(draft.state(), FormState::Confirmed);
    }

    #[test]
    fn test_event_wedding_four_hours() {
        let engine = event_engine();
        let mut draft = event_draft(&engine, "18:00");
        let confirmation = confirmed(engine.submit(&mut draft).unwrap());
        assert_eq!(confirmation.breakdown.total().to_string(), "382000.00");
    }

    #[test]
    fn test_event_end_before_start_rejected() {
        let engine = event_engine();
        for end in ["14:00", "13:00"] {
            let mut draft = event_draft(&engine, end);
            let result = rejected(engine.submit(&mut draft).unwrap());
            assert!(!result.is_valid());
            assert_eq!(
                result.error_for("endTime"),
                Some("End time must be after start time")
            );
            assert_eq!(draft.state(), FormState::Draft);
        }
    }

    #[test]
    fn test_identical_input_prices_identically() {
        let engine = event_engine();
        let mut first = event_draft(&engine, "18:30");
        let mut second = event_draft(&engine, "18:30");
        let a = confirmed(engine.submit(&mut first).unwrap());
        let b = confirmed(engine.submit(&mut second).unwrap());
        assert_eq!(a.breakdown, b.breakdown);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_every_missing_required_field_is_reported() {
        let engine = event_engine();
        let required: Vec<String> = engine
            .schema()
            .fields()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.clone())
            .collect();

        for name in required {
            let mut draft = event_draft(&engine, "19:00");
            draft.fields.remove(&name);
            let result = rejected(engine.submit(&mut draft).unwrap());
            assert!(!result.is_valid());
            assert!(result.errors().contains_key(&name), "no error for {}", name);
        }
    }

    #[test]
    fn test_empty_draft_reports_all_errors_at_once() {
        let engine = event_engine();
        let mut draft = engine.new_draft();
        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(result.error_for("eventType"), Some("Event type is required"));
        assert_eq!(result.error_for("contactEmail"), Some("Valid email is required"));
        assert_eq!(
            result.error_for("agreeTerms"),
            Some("You must agree to the terms and conditions")
        );
        assert!(result.error_for("specialRequests").is_none());
    }

    #[test]
    fn test_event_date_today_is_not_future() {
        let engine = event_engine();
        let mut draft = event_draft(&engine, "19:00");
        engine.set_field(&mut draft, "eventDate", "2025-06-01").unwrap();
        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(result.error_for("eventDate"), Some("Event date must be in the future"));
    }

    // -------------------------------------------------------------------------
    // Room
    // -------------------------------------------------------------------------

    #[test]
    fn test_room_standard_breakfast_golf() {
        let engine = room_engine();
        let mut draft = room_draft(&engine);
        engine.set_field(&mut draft, "breakfast", true).unwrap();
        engine.set_field(&mut draft, "golf", true).unwrap();

        let confirmation = confirmed(engine.submit(&mut draft).unwrap());
        assert_eq!(confirmation.breakdown.total().to_string(), "270000.00");
        assert_eq!(confirmation.headline, "Booking Confirmed");
        assert!(confirmation
            .fields
            .contains(&("Room type".to_string(), "Standard".to_string())));
    }

    #[test]
    fn test_room_deluxe_airport_transfer() {
        let engine = room_engine();
        let mut draft = room_draft(&engine);
        fill(
            &engine,
            &mut draft,
            &[
                ("checkIn", "2025-06-01"),
                ("checkOut", "2025-06-03"),
                ("roomType", "deluxe"),
            ],
        );
        engine.set_field(&mut draft, "numberOfRooms", 2i64).unwrap();
        engine.set_field(&mut draft, "breakfast", true).unwrap();
        engine.set_field(&mut draft, "airportTransfer", true).unwrap();

        let confirmation = confirmed(engine.submit(&mut draft).unwrap());
        assert_eq!(confirmation.breakdown.total().to_string(), "207000.00");
    }

    #[test]
    fn test_room_checkout_not_after_checkin_rejected() {
        let engine = room_engine();
        for check_out in ["2025-06-10", "2025-06-09"] {
            let mut draft = room_draft(&engine);
            engine.set_field(&mut draft, "checkOut", check_out).unwrap();
            let result = rejected(engine.submit(&mut draft).unwrap());
            assert_eq!(
                result.error_for("checkOut"),
                Some("Check-out must be after check-in")
            );
        }
    }

    #[test]
    fn test_room_field_messages() {
        let engine = room_engine();
        let mut draft = room_draft(&engine);
        fill(
            &engine,
            &mut draft,
            &[("fullName", "J0hn"), ("phone", "12345"), ("checkIn", "2025-05-31")],
        );
        engine.set_field(&mut draft, "adults", 0i64).unwrap();
        engine.set_field(&mut draft, "children", -1i64).unwrap();
        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(result.error_for("fullName"), Some("Only letters and spaces allowed"));
        assert_eq!(result.error_for("phone"), Some("Phone number must be 10-15 digits"));
        assert_eq!(result.error_for("checkIn"), Some("Check-in date cannot be in the past"));
        assert_eq!(result.error_for("adults"), Some("At least one adult is required"));
        assert_eq!(result.error_for("children"), Some("Number of children cannot be negative"));
    }

    #[test]
    fn test_huge_room_count_is_rejected_not_panicking() {
        let engine = room_engine();
        let mut draft = room_draft(&engine);
        engine
            .set_field(&mut draft, "numberOfRooms", 1_000_000_000_000i64)
            .unwrap();
        engine
            .set_field(&mut draft, "adults", 1_000_000_000_000i64)
            .unwrap();
        engine.set_field(&mut draft, "breakfast", true).unwrap();

        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(
            result.error_for("numberOfRooms"),
            Some("Number of rooms cannot exceed 20")
        );
        assert_eq!(
            result.error_for("adults"),
            Some("Number of adults cannot exceed 50")
        );
        assert_eq!(draft.state(), FormState::Draft);
    }

    #[test]
    fn test_overflowing_rate_card_rejects_instead_of_failing() {
        let mut rates = RoomRates::default();
        rates.room_types[0].rate_per_night_cents = i64::MAX / 2;
        let engine = BookingEngine::room(&rates).unwrap().with_clock(today());
        let mut draft = room_draft(&engine);

        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(result.error_for("numberOfRooms"), Some("Amount is too large"));
        assert!(!result.is_valid());
        assert_eq!(draft.state(), FormState::Draft);
    }

    #[test]
    fn test_acknowledge_resets_to_fresh_draft() {
        let engine = room_engine();
        let mut draft = room_draft(&engine);
        confirmed(engine.submit(&mut draft).unwrap());
        let old_id = draft.id().to_string();

        let fresh = engine.acknowledge(draft).unwrap();
        assert_ne!(fresh.id(), old_id);
        assert!(fresh.id().starts_with("BK-"));
        assert_eq!(fresh.state(), FormState::Draft);
        assert_eq!(fresh.fields(), &engine.schema().default_values());
        assert_eq!(fresh.field("adults"), Some(&FieldValue::Integer(1)));
        assert_eq!(fresh.field("children"), Some(&FieldValue::Integer(0)));
        assert_eq!(fresh.field("numberOfRooms"), Some(&FieldValue::Integer(1)));
        assert_eq!(fresh.field("fullName"), Some(&FieldValue::Text(String::new())));
    }

    // -------------------------------------------------------------------------
    // Kitchen
    // -------------------------------------------------------------------------

    #[test]
    fn test_kitchen_five_items_total() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &VEGETABLES);
        let confirmation = confirmed(engine.submit(&mut draft).unwrap());
        assert_eq!(confirmation.breakdown.total(), Money::from_major(58));
        assert_eq!(confirmation.line_items.len(), 5);
        assert_eq!(confirmation.headline, "Your order has been placed");
    }

    #[test]
    fn test_kitchen_fewer_than_five_rejected() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &VEGETABLES[..3]);
        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(
            result.error_for("itemDetails"),
            Some("Minimum 5 items should be selected.")
        );
    }

    #[test]
    fn test_kitchen_negative_quantity_rejected() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &VEGETABLES);
        engine.set_line_item_quantity(&mut draft, "Tomato", -1).unwrap();
        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(
            result.error_for("itemDetails.Tomato"),
            Some("negative values are not valid")
        );
    }

    #[test]
    fn test_huge_item_quantity_is_rejected() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &VEGETABLES);
        engine
            .set_line_item_quantity(&mut draft, "Tomato", 1_000_000_000_000_000)
            .unwrap();
        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(
            result.error_for("itemDetails.Tomato"),
            Some("Quantity cannot exceed 10000 for Tomato")
        );
        assert_eq!(draft.state(), FormState::Draft);
    }

    #[test]
    fn test_huge_unit_price_is_rejected() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &VEGETABLES);
        engine
            .set_line_item_price(&mut draft, "Onion", Money::from_cents(i64::MAX))
            .unwrap();
        let result = rejected(engine.submit(&mut draft).unwrap());
        assert_eq!(
            result.error_for("itemDetails.Onion"),
            Some("Unit price cannot exceed 1000000.00 for Onion")
        );
    }

    #[test]
    fn test_largest_accepted_order_still_prices() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &VEGETABLES);
        for (name, _, _) in VEGETABLES {
            engine.set_line_item_quantity(&mut draft, name, 10_000).unwrap();
            engine
                .set_line_item_price(&mut draft, name, Money::from_major(1_000_000))
                .unwrap();
        }
        let confirmation = confirmed(engine.submit(&mut draft).unwrap());
        assert_eq!(confirmation.breakdown.total(), Money::from_major(50_000_000_000));
    }

    #[test]
    fn test_duplicate_item_rejected_immediately() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &VEGETABLES[..1]);
        let err = engine.add_line_item(&mut draft, "Tomato").unwrap_err();
        assert_eq!(err.to_string(), "Tomato is already selected.");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::DuplicateItem { .. })
        ));
        assert_eq!(draft.line_items().len(), 1);
    }

    #[test]
    fn test_item_not_offered_for_type() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &[]);
        let err = engine.add_line_item(&mut draft, "Salmon").unwrap_err();
        assert_eq!(err.to_string(), "Salmon is not available for Vegetables");
    }

    #[test]
    fn test_remove_line_item() {
        let engine = kitchen_engine();
        let mut draft = kitchen_draft(&engine, &VEGETABLES[..2]);
        engine.remove_line_item(&mut draft, "Tomato").unwrap();
        assert_eq!(draft.line_items().len(), 1);
        assert!(matches!(
            engine.remove_line_item(&mut draft, "Tomato"),
            Err(CoreError::LineItemNotFound(_))
        ));
    }

    // -------------------------------------------------------------------------
    // Caller errors
    // -------------------------------------------------------------------------

    #[test]
    fn test_confirmed_draft_is_read_only() {
        let engine = event_engine();
        let mut draft = event_draft(&engine, "19:00");
        confirmed(engine.submit(&mut draft).unwrap());

        assert!(matches!(
            engine.set_field(&mut draft, "eventName", "Changed"),
            Err(CoreError::InvalidState { .. })
        ));
        assert!(matches!(
            engine.submit(&mut draft),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_acknowledge_requires_confirmation() {
        let engine = event_engine();
        let draft = engine.new_draft();
        assert!(matches!(
            engine.acknowledge(draft),
            Err(CoreError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_unknown_field_and_unsupported_line_items() {
        let engine = event_engine();
        let mut draft = engine.new_draft();
        assert!(matches!(
            engine.set_field(&mut draft, "roomType", "suite"),
            Err(CoreError::UnknownField { .. })
        ));
        assert!(matches!(
            engine.add_line_item(&mut draft, "Tomato"),
            Err(CoreError::LineItemsUnsupported(Domain::Event))
        ));
    }

    #[test]
    fn test_draft_from_other_domain_rejected() {
        let room = room_engine();
        let event = event_engine();
        let mut draft = room.new_draft();
        assert!(matches!(
            event.submit(&mut draft),
            Err(CoreError::DomainMismatch { .. })
        ));
    }

    #[test]
    fn test_construction_rejects_misconfiguration() {
        let definition = event::definition(&EventRates::default()).unwrap();
        let mismatched = BookingEngine::new(definition.clone(), Box::new(KitchenPricing));
        assert!(matches!(mismatched, Err(CoreError::DomainMismatch { .. })));

        let mut rates = EventRates::default();
        rates.types.pop();
        let unpriced = BookingEngine::new(definition, Box::new(EventPricing::new(rates)));
        assert!(matches!(unpriced, Err(CoreError::UnpricedOption { .. })));

        let mut settings = BookingSettings::default();
        settings.room.room_types[0].rate_per_night_cents = -5;
        assert!(BookingEngine::for_domain(Domain::Room, &settings).is_err());
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BookingEngine>();

        let engine = Arc::new(kitchen_engine());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || engine.new_draft().id().to_string())
            })
            .collect();
        let ids: std::collections::HashSet<String> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 4);
    }
}
