//! # innkeep-core: Pure Booking Logic for Innkeep
//!
//! This crate is the **heart** of Innkeep. It holds the field validation,
//! pricing and form state machine behind the event, room and kitchen order
//! forms, as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Innkeep Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation layer (forms, popups)              │   │
//! │  │   edit field ──► submit ──► show errors | show summary ──► close│   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ field name → raw value                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ innkeep-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌────────────┐ ┌──────────┐ ┌────────────────┐  │   │
//! │  │   │  schema  │ │ validation │ │ pricing  │ │     engine     │  │   │
//! │  │   │FieldSpec │ │ validators │ │ formulas │ │ Draft→Confirmed│  │   │
//! │  │   └──────────┘ └────────────┘ └──────────┘ └────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Drafts, field values, validation results, breakdowns
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`schema`] - Field specifications and per-form schemas
//! - [`validation`] - Field, cross-field and line-item validators
//! - [`settings`] - Rate cards and the kitchen catalog
//! - [`pricing`] - Per-domain pricing calculators
//! - [`id`] - Prefixed, process-unique identifiers
//! - [`clock`] - Source of "today" for date rules
//! - [`domains`] - The event, room and kitchen form tables
//! - [`engine`] - The booking form state machine
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use innkeep_core::{BookingEngine, FixedClock, SubmitOutcome};
//! use innkeep_core::settings::EventRates;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
//! let engine = BookingEngine::event(&EventRates::default())
//!     .unwrap()
//!     .with_clock(Arc::new(FixedClock::new(today)));
//!
//! let mut draft = engine.new_draft();
//! for (field, value) in [
//!     ("eventName", "Test Event"),
//!     ("eventType", "wedding"),
//!     ("eventDate", "2025-08-01"),
//!     ("startTime", "14:00"),
//!     ("endTime", "19:00"),
//!     ("numberOfGuests", "50"),
//!     ("contactName", "John Doe"),
//!     ("contactEmail", "john.doe@example.com"),
//!     ("contactPhone", "1234567890"),
//! ] {
//!     engine.set_field(&mut draft, field, value).unwrap();
//! }
//! engine.set_field(&mut draft, "agreeTerms", true).unwrap();
//!
//! match engine.submit(&mut draft).unwrap() {
//!     SubmitOutcome::Confirmed(confirmation) => {
//!         assert_eq!(confirmation.breakdown.total().to_string(), "390000.00");
//!     }
//!     SubmitOutcome::Rejected(result) => panic!("unexpected errors: {:?}", result),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod domains;
pub mod engine;
pub mod error;
pub mod id;
pub mod money;
pub mod pricing;
pub mod schema;
pub mod settings;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{BookingEngine, FormDefinition};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use schema::{FieldKind, FieldSpec, FormSchema};
pub use settings::BookingSettings;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Fewest line items a kitchen order may be submitted with.
pub const MIN_KITCHEN_ITEMS: usize = 5;

/// Most line items a kitchen order may be submitted with.
pub const MAX_KITCHEN_ITEMS: usize = 10;

/// Largest guest count an event booking accepts.
pub const MAX_EVENT_GUESTS: i64 = 1000;

/// Most adults, and separately most children, on one room booking.
pub const MAX_ROOM_OCCUPANTS: i64 = 50;

/// Most rooms one room booking may reserve.
pub const MAX_ROOMS: i64 = 20;

/// Largest quantity a kitchen line item accepts.
pub const MAX_ITEM_QUANTITY: i64 = 10_000;

/// Largest unit price a kitchen line item accepts, in cents (1000000.00).
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000;
