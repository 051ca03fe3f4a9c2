//! Event booking form: weddings, conferences, parties.

use crate::engine::FormDefinition;
use crate::error::CoreResult;
use crate::schema::{CrossFieldRule, DateBound, EnumOption, FieldSpec, FormSchema, TextFormat};
use crate::settings::EventRates;
use crate::types::Domain;
use crate::MAX_EVENT_GUESTS;

pub const ID_PREFIX: &str = "EVT-";
pub const HEADLINE: &str = "Event Booking Confirmed!";

/// Field names.
pub mod fields {
    pub const EVENT_NAME: &str = "eventName";
    pub const EVENT_TYPE: &str = "eventType";
    pub const EVENT_DATE: &str = "eventDate";
    pub const START_TIME: &str = "startTime";
    pub const END_TIME: &str = "endTime";
    pub const NUMBER_OF_GUESTS: &str = "numberOfGuests";
    pub const CONTACT_NAME: &str = "contactName";
    pub const CONTACT_EMAIL: &str = "contactEmail";
    pub const CONTACT_PHONE: &str = "contactPhone";
    pub const SPECIAL_REQUESTS: &str = "specialRequests";
    pub use crate::domains::AGREE_TERMS;
}

/// Builds the event form. Event type options come from the rate card.
pub fn definition(rates: &EventRates) -> CoreResult<FormDefinition> {
    use fields::*;

    let event_types = rates
        .types
        .iter()
        .map(|t| EnumOption::new(&t.key, &t.label))
        .collect();

    let schema = FormSchema::new(
        vec![
            FieldSpec::text(EVENT_NAME, "Event name", TextFormat::Free).required(),
            FieldSpec::enumeration(EVENT_TYPE, "Event type", event_types).required(),
            FieldSpec::date(EVENT_DATE, "Event date", DateBound::Future).required(),
            FieldSpec::time(START_TIME, "Start time").required(),
            FieldSpec::time(END_TIME, "End time").required(),
            FieldSpec::integer(NUMBER_OF_GUESTS, "Number of guests", Some(1), Some(MAX_EVENT_GUESTS))
                .required()
                .with_required_message("Number of guests must be at least 1"),
            FieldSpec::text(CONTACT_NAME, "Contact name", TextFormat::Free).required(),
            FieldSpec::email(CONTACT_EMAIL, "Contact email")
                .required()
                .with_required_message("Valid email is required")
                .with_invalid_message("Valid email is required"),
            FieldSpec::phone(CONTACT_PHONE, "Contact phone", 10, 10)
                .required()
                .with_required_message("Phone number must be 10 digits")
                .with_invalid_message("Phone number must be 10 digits"),
            FieldSpec::text(SPECIAL_REQUESTS, "Special requests", TextFormat::Free),
            super::terms_field(),
        ],
        vec![CrossFieldRule::TimeOrder {
            start: START_TIME.to_string(),
            end: END_TIME.to_string(),
            message: "End time must be after start time".to_string(),
        }],
        None,
    )?;

    Ok(FormDefinition {
        domain: Domain::Event,
        id_prefix: ID_PREFIX.to_string(),
        headline: HEADLINE.to_string(),
        schema,
    })
}
