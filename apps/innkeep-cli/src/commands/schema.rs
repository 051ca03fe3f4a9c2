//! # Schema Command
//!
//! Prints the field table of one form: names, kinds, required flags, enum
//! options and line-item limits. JSON output is the full `FormSchema`.

use std::io::Write;

use tracing::debug;

use innkeep_core::Domain;

use super::{Context, Status};
use crate::error::CliResult;

pub fn run(ctx: &Context, domain: Domain, out: &mut impl Write) -> CliResult<Status> {
    debug!(%domain, "schema command");
    let engine = ctx.engine(domain)?;
    ctx.printer.schema(out, engine.schema())?;
    Ok(Status::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use innkeep_config::InnkeepConfig;

    fn output(format: OutputFormat, domain: Domain) -> String {
        let ctx = Context::new(InnkeepConfig::default(), format, None);
        let mut out = Vec::new();
        assert_eq!(run(&ctx, domain, &mut out).unwrap(), Status::Success);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_event_schema_text() {
        let text = output(OutputFormat::Text, Domain::Event);
        let first = text.lines().next().unwrap();
        assert!(first.starts_with("eventName"));
        assert!(first.contains("required"));
        assert!(text.contains("wedding"));
        assert!(!text.contains("Line items"));
    }

    #[test]
    fn test_kitchen_schema_mentions_item_limits() {
        let text = output(OutputFormat::Text, Domain::Kitchen);
        assert!(text.contains("Line items: 5 to 10 per order, grouped by itemType"));
    }

    #[test]
    fn test_room_schema_json() {
        let text = output(OutputFormat::Json, Domain::Room);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        let names: Vec<&str> = value["fields"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|f| f["name"].as_str())
            .collect();
        assert!(names.contains(&"checkIn"));
        assert!(names.contains(&"agreeTerms"));
    }
}
