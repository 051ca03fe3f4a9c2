//! Output formatting

use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;

use innkeep_core::{Confirmation, FieldKind, FormSchema, Money, ValidationResult};

use crate::error::CliResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Writes command results in the selected format.
#[derive(Debug, Clone)]
pub struct Printer {
    format: OutputFormat,
    symbol: String,
}

impl Printer {
    pub fn new(format: OutputFormat, symbol: impl Into<String>) -> Self {
        Printer {
            format,
            symbol: symbol.into(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn money(&self, amount: Money) -> String {
        amount.display_with(&self.symbol)
    }

    pub fn json<T: Serialize>(&self, out: &mut impl Write, data: &T) -> CliResult<()> {
        serde_json::to_writer_pretty(&mut *out, data)?;
        writeln!(out)?;
        Ok(())
    }

    pub fn confirmation(&self, out: &mut impl Write, confirmation: &Confirmation) -> CliResult<()> {
        if self.format == OutputFormat::Json {
            return self.json(out, confirmation);
        }

        writeln!(out, "{}", confirmation.headline)?;
        writeln!(out, "Booking ID: {}", confirmation.id)?;
        for (label, value) in &confirmation.fields {
            writeln!(out, "  {}: {}", label, value)?;
        }

        if !confirmation.line_items.is_empty() {
            writeln!(out, "Items:")?;
            for item in &confirmation.line_items {
                let (Some(quantity), Some(price), Some(total)) =
                    (item.quantity, item.unit_price, item.line_total())
                else {
                    continue;
                };
                writeln!(
                    out,
                    "  {} x{} @ {} = {}",
                    item.name,
                    quantity,
                    self.money(price),
                    self.money(total)
                )?;
            }
        }

        writeln!(out, "Cost breakdown:")?;
        for component in confirmation.breakdown.components() {
            writeln!(out, "  {:<24}{}", component.label, self.money(component.amount))?;
        }
        writeln!(out, "  {:<24}{}", "Total", self.money(confirmation.breakdown.total()))?;
        Ok(())
    }

    pub fn rejection(&self, out: &mut impl Write, result: &ValidationResult) -> CliResult<()> {
        if self.format == OutputFormat::Json {
            return self.json(out, result);
        }

        writeln!(out, "Submission rejected:")?;
        for (field, message) in result.errors() {
            writeln!(out, "  {}: {}", field, message)?;
        }
        Ok(())
    }

    pub fn schema(&self, out: &mut impl Write, schema: &FormSchema) -> CliResult<()> {
        if self.format == OutputFormat::Json {
            return self.json(out, schema);
        }

        for field in schema.fields() {
            let required = if field.required { "required" } else { "optional" };
            write!(out, "{:<22}{:<9}{:<10}{}", field.name, field.kind.name(), required, field.label)?;
            if let FieldKind::Enum { options } = &field.kind {
                let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
                write!(out, " [{}]", values.join(", "))?;
            }
            writeln!(out)?;
        }

        if let Some(policy) = schema.line_items() {
            writeln!(
                out,
                "Line items: {} to {} per order, grouped by {}",
                policy.min_items, policy.max_items, policy.type_field
            )?;
        }
        Ok(())
    }
}
