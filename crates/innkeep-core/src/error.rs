//! # Error Types
//!
//! Domain-specific error types for innkeep-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Submit-time rule failures are NOT errors: they are data in a          │
//! │  ValidationResult (see types.rs) and never leave the engine as Err.    │
//! │                                                                         │
//! │  innkeep-core errors (this file)                                       │
//! │  ├── CoreError        - Misconfiguration and caller mistakes           │
//! │  └── ValidationError  - Rejections reported at edit time               │
//! │                                                                         │
//! │  innkeep-config errors (separate crate)                                │
//! │  └── ConfigError      - File, parse and value failures                 │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → exit code              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, option, draft id)
//! 3. Errors are enum variants, never String
//! 4. Edit-time rejections display the exact text shown next to the field

use thiserror::Error;

use crate::types::{Domain, FormState};

// =============================================================================
// Core Error
// =============================================================================

/// Core engine errors.
///
/// These represent a misconfigured form or a caller using the engine out of
/// order. A correctly wired presentation layer only ever sees
/// [`CoreError::Validation`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// The form schema is inconsistent.
    ///
    /// ## When This Occurs
    /// - Two fields share a name
    /// - An enum field has no options
    /// - A custom text pattern does not compile
    /// - A cross-field rule names a missing or wrongly typed field
    #[error("Invalid form schema: {0}")]
    InvalidSchema(String),

    /// A dropdown option has no rate in the rate card.
    #[error("No rate configured for {field} option '{option}'")]
    UnpricedOption { field: String, option: String },

    /// Rate card or catalog values are unusable.
    #[error("Invalid booking settings: {0}")]
    InvalidSettings(String),

    /// An edit named a field the form does not have.
    #[error("The {domain} form has no field '{field}'")]
    UnknownField { domain: Domain, field: String },

    /// A draft was used in a state that does not allow the operation.
    ///
    /// ## When This Occurs
    /// - Editing or submitting a draft that is already confirmed
    /// - Acknowledging a draft that was never confirmed
    #[error("Draft {id} is {actual}, expected {expected}")]
    InvalidState {
        id: String,
        expected: FormState,
        actual: FormState,
    },

    /// A draft was handed to the engine of another domain.
    #[error("Draft belongs to the {actual} form, not the {expected} form")]
    DomainMismatch { expected: Domain, actual: Domain },

    /// Line item operations on a form without line items.
    #[error("The {0} form does not take line items")]
    LineItemsUnsupported(Domain),

    /// A line item edit named an item that is not on the draft.
    #[error("{0} is not selected")]
    LineItemNotFound(String),

    /// A validated form lacked a value the pricing formula needs.
    #[error("Validated form is missing a usable value for '{0}'")]
    MissingField(String),

    /// A price does not fit in i64 cents.
    ///
    /// `field` is the form key the rejection is reported under. The engine
    /// turns this into a rejected submission instead of an error.
    #[error("Amount is too large")]
    AmountTooLarge { field: String },

    /// A domain name could not be parsed.
    #[error("Unknown booking domain: '{0}'. Valid options: event, room, kitchen")]
    UnknownDomain(String),

    /// Edit-time rejection (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Rejections raised while the user is still editing.
///
/// Unlike submit-time failures these are returned as `Err` because the edit
/// itself is refused and the draft is left unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required value is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// The item is already on the draft.
    #[error("{name} is already selected.")]
    DuplicateItem { name: String },

    /// The item is not offered for the selected item type.
    #[error("{name} is not available for {item_type}")]
    ItemNotOffered { name: String, item_type: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
