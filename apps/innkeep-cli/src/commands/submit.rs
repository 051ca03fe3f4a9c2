//! # Submit Command
//!
//! Fills a fresh draft from a JSON document and submits it once.
//!
//! ## Input Shape
//! ```json
//! {
//!   "fields": { "itemType": "Vegetables", "supplierName": "Green Farms" },
//!   "lineItems": [
//!     { "name": "Tomato", "quantity": 2, "unitPrice": "10.50" },
//!     { "name": "Onion", "quantity": 1, "unitPrice": 4 }
//!   ]
//! }
//! ```
//! `unitPrice` may be a JSON number or decimal text; both are read as an
//! exact decimal amount.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Deserialize;
use tracing::debug;

use innkeep_core::{BookingEngine, Domain, DraftBooking, FieldValue, Money, SubmitOutcome};

use super::{Context, Status};
use crate::error::{CliError, CliResult};

/// Raw form input as a presentation layer would collect it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FormInput {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    pub line_items: Vec<LineItemInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LineItemInput {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub unit_price: Option<PriceInput>,
}

/// A price typed as a JSON number or as text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

impl PriceInput {
    pub fn to_money(&self) -> CliResult<Money> {
        let text = match self {
            PriceInput::Number(number) => number.to_string(),
            PriceInput::Text(text) => text.clone(),
        };
        text.parse::<Money>()
            .map_err(|e| CliError::invalid_input(format!("Invalid unit price: {}", e)))
    }
}

/// Copies the input into a draft: fields first, so the selected item type is
/// known when items are added.
pub fn fill(engine: &BookingEngine, draft: &mut DraftBooking, input: FormInput) -> CliResult<()> {
    for (name, value) in input.fields {
        engine.set_field(draft, &name, value)?;
    }

    for item in input.line_items {
        engine.add_line_item(draft, &item.name)?;
        if let Some(quantity) = item.quantity {
            engine.set_line_item_quantity(draft, &item.name, quantity)?;
        }
        if let Some(price) = &item.unit_price {
            engine.set_line_item_price(draft, &item.name, price.to_money()?)?;
        }
    }
    Ok(())
}

pub fn run(ctx: &Context, domain: Domain, input: &str, out: &mut impl Write) -> CliResult<Status> {
    let input: FormInput = serde_json::from_str(input)?;
    debug!(%domain, fields = input.fields.len(), items = input.line_items.len(), "submit command");

    let engine = ctx.engine(domain)?;
    let mut draft = engine.new_draft();
    fill(&engine, &mut draft, input)?;

    match engine.submit(&mut draft)? {
        SubmitOutcome::Confirmed(confirmation) => {
            ctx.printer.confirmation(out, &confirmation)?;
            Ok(Status::Success)
        }
        SubmitOutcome::Rejected(result) => {
            ctx.printer.rejection(out, &result)?;
            Ok(Status::Rejected)
        }
    }
}
