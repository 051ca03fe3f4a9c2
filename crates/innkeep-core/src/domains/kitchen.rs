//! Kitchen supply order form.
//!
//! The only form with line items. Category, item type and payment status
//! dropdowns and the items offered per type all come from the catalog.

use std::collections::BTreeMap;

use crate::engine::FormDefinition;
use crate::error::CoreResult;
use crate::schema::{DateBound, EnumOption, FieldSpec, FormSchema, LineItemPolicy, TextFormat};
use crate::settings::KitchenSettings;
use crate::types::Domain;

pub const ID_PREFIX: &str = "ORD-";
pub const HEADLINE: &str = "Your order has been placed";

const PAST_DATE_MESSAGE: &str = "Dates cannot be in the past.";

/// Field names.
pub mod fields {
    pub const ITEM_CATEGORY: &str = "itemCategory";
    pub const ITEM_TYPE: &str = "itemType";
    pub const ORDER_DATE: &str = "orderDate";
    pub const EXPECTED_DELIVERY_DATE: &str = "expectedDeliveryDate";
    pub const SUPPLIER_NAME: &str = "supplierName";
    pub const SUPPLIER_CONTACT: &str = "supplierContact";
    pub const PAYMENT_STATUS: &str = "paymentStatus";
    pub const ORDERED_BY: &str = "orderedBy";
    pub const REMARKS: &str = "remarks";
}

pub fn definition(settings: &KitchenSettings) -> CoreResult<FormDefinition> {
    use fields::*;

    let options = |names: Vec<&String>| -> Vec<EnumOption> {
        names.into_iter().map(|n| EnumOption::new(n, n)).collect()
    };
    let categories = options(settings.categories.iter().map(|c| &c.name).collect());
    let item_types = options(settings.item_types().map(|t| &t.name).collect());
    let statuses = options(settings.payment_statuses.iter().collect());

    let offered: BTreeMap<String, Vec<String>> = settings
        .item_types()
        .map(|t| (t.name.clone(), t.items.clone()))
        .collect();

    let schema = FormSchema::new(
        vec![
            FieldSpec::enumeration(ITEM_CATEGORY, "Item category", categories).required(),
            FieldSpec::enumeration(ITEM_TYPE, "Item type", item_types).required(),
            FieldSpec::date(ORDER_DATE, "Order date", DateBound::NotPast)
                .required()
                .with_range_messages(Some(PAST_DATE_MESSAGE), None),
            FieldSpec::date(EXPECTED_DELIVERY_DATE, "Expected delivery date", DateBound::NotPast)
                .required()
                .with_range_messages(Some(PAST_DATE_MESSAGE), None),
            FieldSpec::text(SUPPLIER_NAME, "Supplier name", TextFormat::Free).required(),
            FieldSpec::contact(SUPPLIER_CONTACT, "Supplier contact", 7, 15)
                .required()
                .with_invalid_message("Enter the valid email/contact"),
            FieldSpec::enumeration(PAYMENT_STATUS, "Payment status", statuses).required(),
            FieldSpec::text(ORDERED_BY, "Ordered by", TextFormat::Free).required(),
            FieldSpec::text(REMARKS, "Remarks", TextFormat::Free),
        ],
        vec![],
        Some(LineItemPolicy {
            min_items: settings.min_items,
            max_items: settings.max_items,
            type_field: ITEM_TYPE.to_string(),
            exempt_types: settings.exempt_types.clone(),
            offered,
        }),
    )?;

    Ok(FormDefinition {
        domain: Domain::Kitchen,
        id_prefix: ID_PREFIX.to_string(),
        headline: HEADLINE.to_string(),
        schema,
    })
}
