//! # Booking Settings
//!
//! Rate cards and the kitchen catalog.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BookingSettings                                                        │
//! │  ├── event:   EventRates      base fee + rate per guest-hour, per type  │
//! │  ├── room:    RoomRates       rate per room-night, per room type        │
//! │  │                            service rates (per adult-night | booking) │
//! │  └── kitchen: KitchenSettings category → type → items, payment status,  │
//! │                               item count limits                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All amounts are integer cents. The defaults are the house rate card;
//! innkeep-config overrides them from `innkeep.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::{MAX_KITCHEN_ITEMS, MIN_KITCHEN_ITEMS};

/// Everything the three forms need besides their field tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSettings {
    pub event: EventRates,
    pub room: RoomRates,
    pub kitchen: KitchenSettings,
}

impl BookingSettings {
    /// Rejects negative rates, duplicate keys and unusable limits.
    pub fn check(&self) -> CoreResult<()> {
        self.event.check()?;
        self.room.check()?;
        self.kitchen.check()
    }
}

fn invalid<T>(message: String) -> CoreResult<T> {
    Err(CoreError::InvalidSettings(message))
}

fn check_keys<'a>(section: &str, keys: impl Iterator<Item = &'a str>) -> CoreResult<()> {
    let mut seen = BTreeSet::new();
    for key in keys {
        if key.trim().is_empty() {
            return invalid(format!("{} has an empty key", section));
        }
        if !seen.insert(key) {
            return invalid(format!("{} lists '{}' twice", section, key));
        }
    }
    Ok(())
}

fn check_rate(section: &str, key: &str, cents: i64) -> CoreResult<()> {
    if cents < 0 {
        return invalid(format!("{} rate for '{}' is negative", section, key));
    }
    Ok(())
}

// =============================================================================
// Event Rates
// =============================================================================

/// Pricing of one event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeRate {
    /// Option value, e.g. `wedding`.
    pub key: String,
    pub label: String,
    pub base_fee_cents: i64,
    pub rate_per_guest_hour_cents: i64,
}

impl EventTypeRate {
    pub fn base_fee(&self) -> Money {
        Money::from_cents(self.base_fee_cents)
    }

    pub fn rate_per_guest_hour(&self) -> Money {
        Money::from_cents(self.rate_per_guest_hour_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventRates {
    pub types: Vec<EventTypeRate>,
}

impl Default for EventRates {
    fn default() -> Self {
        let rate = |key: &str, label: &str, base: i64, per_guest_hour: i64| EventTypeRate {
            key: key.to_string(),
            label: label.to_string(),
            base_fee_cents: base,
            rate_per_guest_hour_cents: per_guest_hour,
        };
        Self {
            types: vec![
                rate("wedding", "Wedding", 35_000_000, 16_000),
                rate("conference", "Conference", 20_000_000, 12_000),
                rate("party", "Party", 15_000_000, 10_000),
                rate("other", "Other", 10_000_000, 8_000),
            ],
        }
    }
}

impl EventRates {
    pub fn rate_for(&self, key: &str) -> Option<&EventTypeRate> {
        self.types.iter().find(|t| t.key == key)
    }

    pub fn check(&self) -> CoreResult<()> {
        if self.types.is_empty() {
            return invalid("event rates list no event types".to_string());
        }
        check_keys("event types", self.types.iter().map(|t| t.key.as_str()))?;
        for t in &self.types {
            check_rate("event base fee", &t.key, t.base_fee_cents)?;
            check_rate("event guest-hour", &t.key, t.rate_per_guest_hour_cents)?;
        }
        Ok(())
    }
}

// =============================================================================
// Room Rates
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTypeRate {
    pub key: String,
    pub label: String,
    pub rate_per_night_cents: i64,
}

impl RoomTypeRate {
    pub fn rate_per_night(&self) -> Money {
        Money::from_cents(self.rate_per_night_cents)
    }
}

/// How an add-on service is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceBasis {
    /// rate × adults × nights
    PerAdultPerNight,
    /// rate once per booking
    PerBooking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRate {
    /// Field name of the service checkbox, e.g. `breakfast`.
    pub key: String,
    pub label: String,
    pub basis: ServiceBasis,
    pub rate_cents: i64,
}

impl ServiceRate {
    pub fn rate(&self) -> Money {
        Money::from_cents(self.rate_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomRates {
    pub room_types: Vec<RoomTypeRate>,
    pub services: Vec<ServiceRate>,
}

impl Default for RoomRates {
    fn default() -> Self {
        let room = |key: &str, label: &str, cents: i64| RoomTypeRate {
            key: key.to_string(),
            label: label.to_string(),
            rate_per_night_cents: cents,
        };
        let service = |key: &str, label: &str, basis: ServiceBasis, cents: i64| ServiceRate {
            key: key.to_string(),
            label: label.to_string(),
            basis,
            rate_cents: cents,
        };
        Self {
            room_types: vec![
                room("standard", "Standard", 3_000_000),
                room("deluxe", "Deluxe", 4_500_000),
                room("suite", "Suite", 7_500_000),
            ],
            services: vec![
                service("breakfast", "Breakfast", ServiceBasis::PerAdultPerNight, 300_000),
                service("airportTransfer", "Airport Transfer", ServiceBasis::PerBooking, 1_500_000),
                service("golf", "Golf", ServiceBasis::PerAdultPerNight, 900_000),
                service("spa", "Spa", ServiceBasis::PerAdultPerNight, 1_200_000),
            ],
        }
    }
}

impl RoomRates {
    pub fn room_rate(&self, key: &str) -> Option<&RoomTypeRate> {
        self.room_types.iter().find(|r| r.key == key)
    }

    pub fn check(&self) -> CoreResult<()> {
        if self.room_types.is_empty() {
            return invalid("room rates list no room types".to_string());
        }
        check_keys("room types", self.room_types.iter().map(|r| r.key.as_str()))?;
        check_keys("room services", self.services.iter().map(|s| s.key.as_str()))?;
        for r in &self.room_types {
            check_rate("room", &r.key, r.rate_per_night_cents)?;
        }
        for s in &self.services {
            check_rate("service", &s.key, s.rate_cents)?;
        }
        Ok(())
    }
}

// =============================================================================
// Kitchen Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemType {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCategory {
    pub name: String,
    pub types: Vec<ItemType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitchenSettings {
    pub payment_statuses: Vec<String>,
    pub min_items: usize,
    pub max_items: usize,
    /// Item types that skip the count limits.
    pub exempt_types: Vec<String>,
    /// Listed last so TOML writes the plain keys before the nested tables.
    pub categories: Vec<ItemCategory>,
}

impl Default for KitchenSettings {
    fn default() -> Self {
        let item_type = |name: &str, items: &[&str]| ItemType {
            name: name.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        };
        Self {
            payment_statuses: vec![
                "Paid".to_string(),
                "Pending".to_string(),
                "Partially Paid".to_string(),
            ],
            min_items: MIN_KITCHEN_ITEMS,
            max_items: MAX_KITCHEN_ITEMS,
            exempt_types: vec!["Water".to_string()],
            categories: vec![
                ItemCategory {
                    name: "Food".to_string(),
                    types: vec![
                        item_type(
                            "Vegetables",
                            &["Tomato", "Onion", "Potato", "Carrot", "Cabbage", "Beans", "Leeks", "Pumpkin"],
                        ),
                        item_type("Meat", &["Chicken", "Beef", "Mutton", "Pork"]),
                        item_type("Seafood", &["Fish", "Prawns", "Crab", "Cuttlefish"]),
                        item_type(
                            "Dry Goods",
                            &["Rice", "Flour", "Sugar", "Lentils", "Salt", "Spices"],
                        ),
                    ],
                },
                ItemCategory {
                    name: "Beverages".to_string(),
                    types: vec![
                        item_type("Water", &["Bottled Water", "Sparkling Water"]),
                        item_type(
                            "Juice",
                            &["Orange Juice", "Apple Juice", "Mango Juice", "Pineapple Juice", "Lime Juice"],
                        ),
                        item_type(
                            "Soft Drinks",
                            &["Cola", "Lemonade", "Ginger Beer", "Cream Soda", "Orange Soda"],
                        ),
                    ],
                },
            ],
        }
    }
}

impl KitchenSettings {
    /// All item types across categories, in catalog order.
    pub fn item_types(&self) -> impl Iterator<Item = &ItemType> {
        self.categories.iter().flat_map(|c| c.types.iter())
    }

    pub fn check(&self) -> CoreResult<()> {
        if self.categories.is_empty() {
            return invalid("kitchen catalog has no categories".to_string());
        }
        check_keys("kitchen categories", self.categories.iter().map(|c| c.name.as_str()))?;
        check_keys("kitchen item types", self.item_types().map(|t| t.name.as_str()))?;
        for t in self.item_types() {
            check_keys(&format!("kitchen items of {}", t.name), t.items.iter().map(String::as_str))?;
        }
        check_keys("payment statuses", self.payment_statuses.iter().map(String::as_str))?;
        if self.min_items > self.max_items {
            return invalid(format!(
                "kitchen min_items {} is above max_items {}",
                self.min_items, self.max_items
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(BookingSettings::default().check().is_ok());
    }

    #[test]
    fn test_default_rate_card() {
        let settings = BookingSettings::default();
        let wedding = settings.event.rate_for("wedding").unwrap();
        assert_eq!(wedding.base_fee().to_string(), "350000.00");
        assert_eq!(wedding.rate_per_guest_hour().to_string(), "160.00");

        let standard = settings.room.room_rate("standard").unwrap();
        assert_eq!(standard.rate_per_night().to_string(), "30000.00");
        assert!(settings.room.room_rate("penthouse").is_none());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut rates = RoomRates::default();
        rates.services[0].rate_cents = -1;
        assert!(matches!(rates.check(), Err(CoreError::InvalidSettings(_))));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let mut rates = EventRates::default();
        let copy = rates.types[0].clone();
        rates.types.push(copy);
        assert!(rates.check().is_err());

        let mut kitchen = KitchenSettings::default();
        kitchen.categories[1].types[0].name = "Vegetables".to_string();
        assert!(kitchen.check().is_err());
    }

    #[test]
    fn test_kitchen_limits() {
        let mut kitchen = KitchenSettings::default();
        assert_eq!(kitchen.item_types().count(), 7);
        kitchen.min_items = 11;
        assert!(kitchen.check().is_err());
    }
}
