//! # Replay Command
//!
//! Runs a scripted form session against one draft, the way a user would
//! drive the form: edit fields, add and remove items, submit, fix errors,
//! submit again, acknowledge.
//!
//! ## Script Shape
//! ```json
//! [
//!   { "action": "set", "field": "itemType", "value": "Vegetables" },
//!   { "action": "addItem", "name": "Tomato" },
//!   { "action": "setQuantity", "name": "Tomato", "quantity": 2 },
//!   { "action": "setPrice", "name": "Tomato", "price": "10.00" },
//!   { "action": "removeItem", "name": "Tomato" },
//!   { "action": "submit" },
//!   { "action": "acknowledge" }
//! ]
//! ```
//!
//! ## Step Results
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  engine call ──► Ok ───────────────────────► "ok" / outcome             │
//! │       │                                                                 │
//! │       ├──► ValidationError (duplicate, ───► "failed" + message,         │
//! │       │    not offered)                     script continues            │
//! │       │                                                                 │
//! │       └──► any other error ───────────────► script aborts               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use innkeep_core::{BookingEngine, Domain, DraftBooking, FieldValue, SubmitOutcome};

use super::submit::PriceInput;
use super::{Context, Status};
use crate::error::{CliResult, ErrorCode};
use crate::output::OutputFormat;

/// One user action in a form session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    Set { field: String, value: FieldValue },
    AddItem { name: String },
    SetQuantity { name: String, quantity: i64 },
    SetPrice { name: String, price: PriceInput },
    RemoveItem { name: String },
    Submit,
    Acknowledge,
}

impl Action {
    fn describe(&self) -> String {
        match self {
            Action::Set { field, .. } => format!("set {}", field),
            Action::AddItem { name } => format!("addItem {}", name),
            Action::SetQuantity { name, quantity } => format!("setQuantity {} {}", name, quantity),
            Action::SetPrice { name, .. } => format!("setPrice {}", name),
            Action::RemoveItem { name } => format!("removeItem {}", name),
            Action::Submit => "submit".to_string(),
            Action::Acknowledge => "acknowledge".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    Failed,
    Confirmed,
    Rejected,
}

/// Result of one replayed action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub step: usize,
    pub action: String,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SubmitOutcome>,
}

enum Applied {
    Done,
    Reset(String),
    Submitted(SubmitOutcome),
}

fn apply(engine: &BookingEngine, draft: &mut DraftBooking, action: Action) -> CliResult<Applied> {
    match action {
        Action::Set { field, value } => engine.set_field(draft, &field, value)?,
        Action::AddItem { name } => engine.add_line_item(draft, &name)?,
        Action::SetQuantity { name, quantity } => {
            engine.set_line_item_quantity(draft, &name, quantity)?
        }
        Action::SetPrice { name, price } => {
            engine.set_line_item_price(draft, &name, price.to_money()?)?
        }
        Action::RemoveItem { name } => engine.remove_line_item(draft, &name)?,
        Action::Submit => return Ok(Applied::Submitted(engine.submit(draft)?)),
        Action::Acknowledge => {
            *draft = engine.acknowledge(draft.clone())?;
            return Ok(Applied::Reset(draft.id().to_string()));
        }
    }
    Ok(Applied::Done)
}

pub fn run(ctx: &Context, domain: Domain, script: &str, out: &mut impl Write) -> CliResult<Status> {
    let actions: Vec<Action> = serde_json::from_str(script)?;
    debug!(%domain, steps = actions.len(), "replay command");

    let engine = ctx.engine(domain)?;
    let mut draft = engine.new_draft();
    let mut status = Status::Success;
    let mut reports = Vec::with_capacity(actions.len());

    for (index, action) in actions.into_iter().enumerate() {
        let mut report = StepReport {
            step: index + 1,
            action: action.describe(),
            status: StepStatus::Ok,
            message: None,
            outcome: None,
        };

        match apply(&engine, &mut draft, action) {
            Ok(Applied::Done) => {}
            Ok(Applied::Reset(id)) => {
                report.message = Some(format!("new draft {}", id));
                status = Status::Success;
            }
            Ok(Applied::Submitted(outcome)) => {
                if outcome.is_confirmed() {
                    report.status = StepStatus::Confirmed;
                    status = Status::Success;
                } else {
                    report.status = StepStatus::Rejected;
                    status = Status::Rejected;
                }
                report.outcome = Some(outcome);
            }
            Err(err) if err.code == ErrorCode::ValidationError => {
                warn!(step = report.step, "{}", err);
                report.status = StepStatus::Failed;
                report.message = Some(err.message);
            }
            Err(err) => return Err(err),
        }

        if ctx.printer.format() == OutputFormat::Text {
            write_step(ctx, out, &report)?;
        }
        reports.push(report);
    }

    if ctx.printer.format() == OutputFormat::Json {
        ctx.printer.json(out, &reports)?;
    }
    Ok(status)
}

fn write_step(ctx: &Context, out: &mut impl Write, report: &StepReport) -> CliResult<()> {
    match (&report.outcome, &report.message) {
        (Some(SubmitOutcome::Confirmed(confirmation)), _) => {
            writeln!(out, "{}. {}: confirmed", report.step, report.action)?;
            ctx.printer.confirmation(out, confirmation)
        }
        (Some(SubmitOutcome::Rejected(result)), _) => {
            writeln!(out, "{}. {}: rejected", report.step, report.action)?;
            ctx.printer.rejection(out, result)
        }
        (None, Some(message)) => {
            writeln!(out, "{}. {}: {}", report.step, report.action, message)?;
            Ok(())
        }
        (None, None) => {
            writeln!(out, "{}. {}: ok", report.step, report.action)?;
            Ok(())
        }
    }
}
