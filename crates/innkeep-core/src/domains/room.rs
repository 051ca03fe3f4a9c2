//! Hotel room booking form.
//!
//! Room types and add-on services are read from the rate card: every
//! configured service becomes an optional checkbox named after its key.

use crate::engine::FormDefinition;
use crate::error::CoreResult;
use crate::schema::{CrossFieldRule, DateBound, EnumOption, FieldSpec, FormSchema, TextFormat};
use crate::settings::RoomRates;
use crate::types::Domain;
use crate::{MAX_ROOMS, MAX_ROOM_OCCUPANTS};

pub const ID_PREFIX: &str = "BK-";
pub const HEADLINE: &str = "Booking Confirmed";

/// Field names. Service checkboxes use the service key.
pub mod fields {
    pub const FULL_NAME: &str = "fullName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const ADDRESS_1: &str = "address1";
    pub const ADDRESS_2: &str = "address2";
    pub const ADDRESS_3: &str = "address3";
    pub const STATE: &str = "state";
    pub const ZIP: &str = "zip";
    pub const COUNTRY: &str = "country";
    pub const CHECK_IN: &str = "checkIn";
    pub const CHECK_OUT: &str = "checkOut";
    pub const ADULTS: &str = "adults";
    pub const CHILDREN: &str = "children";
    pub const ROOM_TYPE: &str = "roomType";
    pub const NUMBER_OF_ROOMS: &str = "numberOfRooms";
    pub use crate::domains::AGREE_TERMS;
}

pub fn definition(rates: &RoomRates) -> CoreResult<FormDefinition> {
    use fields::*;

    let room_types = rates
        .room_types
        .iter()
        .map(|r| EnumOption::new(&r.key, &r.label))
        .collect();

    let mut specs = vec![
        FieldSpec::text(FULL_NAME, "Full Name", TextFormat::LettersAndSpaces)
            .required()
            .with_invalid_message("Only letters and spaces allowed"),
        FieldSpec::email(EMAIL, "Email").required(),
        FieldSpec::phone(PHONE, "Phone number", 10, 15)
            .required()
            .with_invalid_message("Phone number must be 10-15 digits"),
        FieldSpec::text(ADDRESS_1, "Address Line 1", TextFormat::Free).required(),
        FieldSpec::text(ADDRESS_2, "Address Line 2", TextFormat::Free),
        FieldSpec::text(ADDRESS_3, "Address Line 3", TextFormat::Free),
        FieldSpec::text(STATE, "State/Province", TextFormat::Free).required(),
        FieldSpec::text(ZIP, "Zip/Postal Code", TextFormat::Free).required(),
        FieldSpec::text(COUNTRY, "Country", TextFormat::Free).required(),
        FieldSpec::date(CHECK_IN, "Check-in date", DateBound::NotPast).required(),
        FieldSpec::date(CHECK_OUT, "Check-out date", DateBound::Any).required(),
        FieldSpec::integer(ADULTS, "Adults", Some(1), Some(MAX_ROOM_OCCUPANTS))
            .required()
            .with_default(1i64)
            .with_required_message("At least one adult is required")
            .with_range_messages(
                Some("At least one adult is required"),
                Some(format!("Number of adults cannot exceed {}", MAX_ROOM_OCCUPANTS).as_str()),
            ),
        FieldSpec::integer(CHILDREN, "Children", Some(0), Some(MAX_ROOM_OCCUPANTS))
            .with_default(0i64)
            .with_range_messages(
                Some("Number of children cannot be negative"),
                Some(format!("Number of children cannot exceed {}", MAX_ROOM_OCCUPANTS).as_str()),
            ),
        FieldSpec::enumeration(ROOM_TYPE, "Room type", room_types).required(),
        FieldSpec::integer(NUMBER_OF_ROOMS, "Number of rooms", Some(1), Some(MAX_ROOMS))
            .required()
            .with_default(1i64)
            .with_required_message("At least one room is required")
            .with_range_messages(
                Some("At least one room is required"),
                Some(format!("Number of rooms cannot exceed {}", MAX_ROOMS).as_str()),
            ),
    ];
    specs.extend(
        rates
            .services
            .iter()
            .map(|s| FieldSpec::boolean(&s.key, &s.label)),
    );
    specs.push(super::terms_field());

    let schema = FormSchema::new(
        specs,
        vec![CrossFieldRule::DateOrder {
            first: CHECK_IN.to_string(),
            second: CHECK_OUT.to_string(),
            message: "Check-out must be after check-in".to_string(),
        }],
        None,
    )?;

    Ok(FormDefinition {
        domain: Domain::Room,
        id_prefix: ID_PREFIX.to_string(),
        headline: HEADLINE.to_string(),
        schema,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;
    use crate::validation::validate_field;

    #[test]
    fn test_room_definition_defaults() {
        let definition = definition(&RoomRates::default()).unwrap();
        let defaults = definition.schema.default_values();
        assert_eq!(defaults[fields::ADULTS], FieldValue::Integer(1));
        assert_eq!(defaults[fields::CHILDREN], FieldValue::Integer(0));
        assert_eq!(defaults[fields::NUMBER_OF_ROOMS], FieldValue::Integer(1));
        assert_eq!(defaults["breakfast"], FieldValue::Bool(false));
        assert_eq!(defaults[fields::FULL_NAME], FieldValue::Text(String::new()));
    }

    #[test]
    fn test_room_counts_have_upper_bounds() {
        let definition = definition(&RoomRates::default()).unwrap();
        let today = chrono::NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let check = |name: &str, n: i64| {
            let spec = definition.schema.field(name).unwrap();
            validate_field(spec, Some(&FieldValue::Integer(n)), today)
        };

        assert_eq!(check(fields::NUMBER_OF_ROOMS, 20), None);
        assert_eq!(
            check(fields::NUMBER_OF_ROOMS, 21).as_deref(),
            Some("Number of rooms cannot exceed 20")
        );
        assert_eq!(check(fields::ADULTS, 50), None);
        assert_eq!(
            check(fields::ADULTS, i64::MAX).as_deref(),
            Some("Number of adults cannot exceed 50")
        );
        assert_eq!(
            check(fields::CHILDREN, 51).as_deref(),
            Some("Number of children cannot exceed 50")
        );
    }

    #[test]
    fn test_service_named_like_a_field_is_rejected() {
        let mut rates = RoomRates::default();
        rates.services[0].key = fields::EMAIL.to_string();
        assert!(definition(&rates).is_err());
    }
}
