//! # Booking Domains
//!
//! The field tables of the three forms. Each module exposes the field
//! names it uses, its id prefix and confirmation headline, and a
//! `definition` function building the [`FormDefinition`] from the rate card.
//!
//! ```text
//! ┌──────────────┬──────────┬────────────────────────────┬──────────────┐
//! │ Domain       │ Id       │ Headline                   │ Line items   │
//! ├──────────────┼──────────┼────────────────────────────┼──────────────┤
//! │ event        │ EVT-     │ Event Booking Confirmed!   │ no           │
//! │ room         │ BK-      │ Booking Confirmed          │ no           │
//! │ kitchen      │ ORD-     │ Your order has been placed │ 5 to 10      │
//! └──────────────┴──────────┴────────────────────────────┴──────────────┘
//! ```
//!
//! [`FormDefinition`]: crate::engine::FormDefinition

pub mod event;
pub mod kitchen;
pub mod room;

use crate::schema::FieldSpec;

/// Message for an unchecked terms box, shared by the booking forms.
pub const TERMS_MESSAGE: &str = "You must agree to the terms and conditions";

/// Field name of the terms checkbox.
pub const AGREE_TERMS: &str = "agreeTerms";

/// The "I agree to the terms and conditions" checkbox.
pub(crate) fn terms_field() -> FieldSpec {
    FieldSpec::boolean(AGREE_TERMS, "Terms and conditions")
        .required()
        .with_required_message(TERMS_MESSAGE)
}
