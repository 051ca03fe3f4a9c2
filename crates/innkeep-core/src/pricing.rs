//! # Pricing Calculators
//!
//! One calculator per domain, turning a validated form into an itemized
//! [`PricingBreakdown`].
//!
//! ## Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Event    Base Fee    = base_fee[eventType]                             │
//! │           Guest Hours = rate[eventType] × guests × minutes / 60         │
//! │                         (rounded half-up to the cent, once)             │
//! │                                                                         │
//! │  Room     nights      = checkOut − checkIn  (whole days)                │
//! │           Room Cost   = rate[roomType] × nights × rooms                 │
//! │           <Service>   = rate × adults × nights   (per adult-night)      │
//! │                       = rate                     (per booking)          │
//! │                                                                         │
//! │  Kitchen  <Item>      = quantity × unit price                           │
//! │                                                                         │
//! │  total = Σ components (exact, integer cents)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every step is checked. A product or total that does not fit in i64 cents
//! is [`CoreError::AmountTooLarge`], keyed by the field that drove it.
//!
//! Calculators only ever see a [`ValidatedForm`], which the engine builds
//! after validation passed. [`PriceCalculator::verify`] runs when the engine
//! is constructed and proves every dropdown option has a rate, so a
//! confirmed submit cannot hit a missing rate.

use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::domains::{event, room};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::schema::FormSchema;
use crate::settings::{EventRates, RoomRates, ServiceBasis};
use crate::types::{CostComponent, Domain, FieldValue, LineItem, PricingBreakdown};
use crate::validation::{parse_date, parse_time, ITEM_DETAILS_KEY};

// =============================================================================
// Validated Form
// =============================================================================

/// Read access to a form that passed validation.
///
/// Absent values fall back to the field's reset default, so a counter left
/// untouched prices at its default.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedForm<'a> {
    schema: &'a FormSchema,
    values: &'a BTreeMap<String, FieldValue>,
    items: &'a [LineItem],
}

impl<'a> ValidatedForm<'a> {
    pub(crate) fn new(
        schema: &'a FormSchema,
        values: &'a BTreeMap<String, FieldValue>,
        items: &'a [LineItem],
    ) -> Self {
        Self {
            schema,
            values,
            items,
        }
    }

    fn value(&self, name: &str) -> Option<FieldValue> {
        self.values
            .get(name)
            .cloned()
            .or_else(|| self.schema.field(name).map(|f| f.default_value()))
    }

    fn missing(name: &str) -> CoreError {
        CoreError::MissingField(name.to_string())
    }

    pub fn text(&self, name: &str) -> CoreResult<String> {
        match self.value(name) {
            Some(FieldValue::Text(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            _ => Err(Self::missing(name)),
        }
    }

    pub fn integer(&self, name: &str) -> CoreResult<i64> {
        self.value(name)
            .and_then(|v| v.as_integer())
            .ok_or_else(|| Self::missing(name))
    }

    pub fn date(&self, name: &str) -> CoreResult<NaiveDate> {
        parse_date(&self.text(name)?).ok_or_else(|| Self::missing(name))
    }

    pub fn time(&self, name: &str) -> CoreResult<NaiveTime> {
        parse_time(&self.text(name)?).ok_or_else(|| Self::missing(name))
    }

    /// Checkbox state; anything but `true` is unchecked.
    pub fn flag(&self, name: &str) -> bool {
        self.value(name).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn line_items(&self) -> &'a [LineItem] {
        self.items
    }
}

// =============================================================================
// Calculator Trait
// =============================================================================

/// Pricing strategy for one domain.
pub trait PriceCalculator: Send + Sync + Debug {
    /// Domain this calculator prices.
    fn domain(&self) -> Domain;

    /// Checks that the schema can be priced. Called once at engine
    /// construction.
    fn verify(&self, schema: &FormSchema) -> CoreResult<()>;

    /// Prices a validated form.
    fn price(&self, form: &ValidatedForm<'_>) -> CoreResult<PricingBreakdown>;
}

fn verify_options(
    schema: &FormSchema,
    field: &str,
    has_rate: impl Fn(&str) -> bool,
) -> CoreResult<()> {
    let spec = schema.field(field).ok_or_else(|| {
        CoreError::InvalidSchema(format!("pricing needs field '{}'", field))
    })?;
    for option in spec.kind.option_values() {
        if !has_rate(option) {
            return Err(CoreError::UnpricedOption {
                field: field.to_string(),
                option: option.to_string(),
            });
        }
    }
    Ok(())
}

fn too_large(field: impl Into<String>) -> CoreError {
    CoreError::AmountTooLarge {
        field: field.into(),
    }
}

fn checked(amount: Option<Money>, field: &str) -> CoreResult<Money> {
    amount.ok_or_else(|| too_large(field))
}

// =============================================================================
// Event
// =============================================================================

#[derive(Debug, Clone)]
pub struct EventPricing {
    rates: EventRates,
}

impl EventPricing {
    pub fn new(rates: EventRates) -> Self {
        Self { rates }
    }
}

impl PriceCalculator for EventPricing {
    fn domain(&self) -> Domain {
        Domain::Event
    }

    fn verify(&self, schema: &FormSchema) -> CoreResult<()> {
        verify_options(schema, event::fields::EVENT_TYPE, |key| {
            self.rates.rate_for(key).is_some()
        })
    }

    fn price(&self, form: &ValidatedForm<'_>) -> CoreResult<PricingBreakdown> {
        use event::fields::*;

        let event_type = form.text(EVENT_TYPE)?;
        let rate = self
            .rates
            .rate_for(&event_type)
            .ok_or_else(|| CoreError::UnpricedOption {
                field: EVENT_TYPE.to_string(),
                option: event_type.clone(),
            })?;

        let minutes = (form.time(END_TIME)? - form.time(START_TIME)?).num_minutes();
        let guests = form.integer(NUMBER_OF_GUESTS)?;
        let guest_minutes = guests
            .checked_mul(minutes)
            .ok_or_else(|| too_large(NUMBER_OF_GUESTS))?;
        let guest_hours = checked(
            rate.rate_per_guest_hour().prorate(guest_minutes, 60),
            NUMBER_OF_GUESTS,
        )?;

        PricingBreakdown::from_components(vec![
            CostComponent::new("Base Fee", rate.base_fee()),
            CostComponent::new("Guest Hours", guest_hours),
        ])
        .ok_or_else(|| too_large(NUMBER_OF_GUESTS))
    }
}

// =============================================================================
// Room
// =============================================================================

#[derive(Debug, Clone)]
pub struct RoomPricing {
    rates: RoomRates,
}

impl RoomPricing {
    pub fn new(rates: RoomRates) -> Self {
        Self { rates }
    }
}

impl PriceCalculator for RoomPricing {
    fn domain(&self) -> Domain {
        Domain::Room
    }

    fn verify(&self, schema: &FormSchema) -> CoreResult<()> {
        verify_options(schema, room::fields::ROOM_TYPE, |key| {
            self.rates.room_rate(key).is_some()
        })?;
        for service in &self.rates.services {
            if schema.field(&service.key).is_none() {
                return Err(CoreError::InvalidSchema(format!(
                    "service '{}' has no checkbox on the form",
                    service.key
                )));
            }
        }
        Ok(())
    }

    fn price(&self, form: &ValidatedForm<'_>) -> CoreResult<PricingBreakdown> {
        use room::fields::*;

        let room_type = form.text(ROOM_TYPE)?;
        let rate = self
            .rates
            .room_rate(&room_type)
            .ok_or_else(|| CoreError::UnpricedOption {
                field: ROOM_TYPE.to_string(),
                option: room_type.clone(),
            })?;

        let nights = (form.date(CHECK_OUT)? - form.date(CHECK_IN)?).num_days();
        let rooms = form.integer(NUMBER_OF_ROOMS)?;
        let adults = form.integer(ADULTS)?;

        let room_cost = rate
            .rate_per_night()
            .checked_mul(nights)
            .and_then(|cost| cost.checked_mul(rooms));
        let mut components = vec![CostComponent::new(
            "Room Cost",
            checked(room_cost, NUMBER_OF_ROOMS)?,
        )];
        for service in self.rates.services.iter().filter(|s| form.flag(&s.key)) {
            let amount = match service.basis {
                ServiceBasis::PerAdultPerNight => checked(
                    service
                        .rate()
                        .checked_mul(adults)
                        .and_then(|cost| cost.checked_mul(nights)),
                    ADULTS,
                )?,
                ServiceBasis::PerBooking => service.rate(),
            };
            components.push(CostComponent::new(service.label.clone(), amount));
        }

        PricingBreakdown::from_components(components).ok_or_else(|| too_large(NUMBER_OF_ROOMS))
    }
}

// =============================================================================
// Kitchen
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct KitchenPricing;

impl PriceCalculator for KitchenPricing {
    fn domain(&self) -> Domain {
        Domain::Kitchen
    }

    fn verify(&self, schema: &FormSchema) -> CoreResult<()> {
        if schema.line_items().is_none() {
            return Err(CoreError::InvalidSchema(
                "kitchen pricing needs a line item policy".to_string(),
            ));
        }
        Ok(())
    }

    fn price(&self, form: &ValidatedForm<'_>) -> CoreResult<PricingBreakdown> {
        let components = form
            .line_items()
            .iter()
            .map(|item| {
                let key = format!("{}.{}", ITEM_DETAILS_KEY, item.name);
                let (Some(qty), Some(price)) = (item.quantity, item.unit_price) else {
                    return Err(CoreError::MissingField(key));
                };
                let total = checked(price.checked_mul(qty), &key)?;
                Ok(CostComponent::new(item.name.clone(), total))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        PricingBreakdown::from_components(components).ok_or_else(|| too_large(ITEM_DETAILS_KEY))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
