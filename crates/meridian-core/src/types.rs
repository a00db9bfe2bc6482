//! # Domain Types
//!
//! Core domain types used throughout the Meridian sale wizard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogueItem  │   │    Customer     │   │ DeliveryDetails │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  sku (key)      │   │  first/last     │   │  choose_later   │       │
//! │  │  price (RRP)    │   │  phone, email   │   │  date + slot    │       │
//! │  │  stock          │   │  address        │   │  services       │       │
//! │  │  colours        │   │  2nd contact    │   │  instructions   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DiscountRate   │   │  StockStatus    │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  InStock        │   │  Cash           │       │
//! │  │  500 = 5%       │   │  LowStock       │   │  Card           │       │
//! │  └─────────────────┘   │  OutOfStock     │   │  Financing      │       │
//! │                        │  Discontinued   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The catalogue itself is an external collaborator: the engine only ever
//! sees it through the [`Catalogue`] trait, and every caller must tolerate
//! a SKU that no longer resolves.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{MATTRESS_REMOVAL_FEE_CENTS, SETUP_FEE_CENTS, WHITE_GLOVE_FEE_CENTS};

// =============================================================================
// Discount Rate
// =============================================================================

/// Overall sale discount represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 500 bps = 5% (a typical floor-manager discount)
///
/// Storing the rate as an integer keeps draft snapshots exact and makes
/// `pct = 0` produce a discount of exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        DiscountRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Availability of a catalogue item.
///
/// Serialized with the wire spelling the catalogue service uses
/// (`in-stock`, `low-stock`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    /// On the floor or in the warehouse, ready to deliver.
    InStock,
    /// Available but running out; still sellable up to the counted units.
    LowStock,
    /// Nothing on hand. Back-orderable: sales are taken against the next
    /// inbound shipment, so quantity does NOT cap the cart.
    OutOfStock,
    /// No longer sold. Never addable.
    Discontinued,
}

/// Stock details for a catalogue item.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockInfo {
    pub status: StockStatus,

    /// Units on hand. Only meaningful as a cart cap for
    /// `InStock`/`LowStock`.
    pub quantity: i64,

    /// Free-text lead time shown next to back-orderable items
    /// ("6-8 weeks").
    pub lead_time_text: Option<String>,
}

// =============================================================================
// Catalogue Item
// =============================================================================

/// A colour variant of a catalogue item, with its own display image.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ColourVariant {
    pub name: String,
    pub image_url: String,
}

/// A product as the catalogue collaborator describes it.
///
/// `price` is the RRP - the reference point all line-level discount
/// accounting is measured against. The negotiated price lives on the cart
/// line, never here.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueItem {
    /// Stock Keeping Unit - the business identifier and lookup key.
    pub sku: String,

    /// Display name shown to the cashier and on the order.
    pub name: String,

    /// Recommended retail price (RRP).
    pub price: Money,

    /// Availability.
    pub stock: StockInfo,

    /// Colour variants; empty when the product has a single finish.
    #[serde(default)]
    pub colours: Vec<ColourVariant>,
}

impl CatalogueItem {
    /// Whether this item can be added to a cart at all.
    ///
    /// ## Rules
    /// - `Discontinued` is never addable
    /// - `InStock`/`LowStock` with zero (or negative) count is not addable
    /// - `OutOfStock` IS addable (back-order)
    pub fn can_add(&self) -> bool {
        match self.stock.status {
            StockStatus::Discontinued => false,
            StockStatus::InStock | StockStatus::LowStock => self.stock.quantity > 0,
            StockStatus::OutOfStock => true,
        }
    }

    /// The quantity cap the cart must clamp to, if any.
    ///
    /// `None` means "no cap": back-orderable items and items whose stock
    /// count is not positive are left unclamped.
    pub fn stock_cap(&self) -> Option<i64> {
        match self.stock.status {
            StockStatus::InStock | StockStatus::LowStock if self.stock.quantity > 0 => {
                Some(self.stock.quantity)
            }
            _ => None,
        }
    }
}

// =============================================================================
// Catalogue Lookup (external collaborator)
// =============================================================================

/// Read-only catalogue lookup.
///
/// Implemented outside the core (in-memory map, TTL cache over an API,
/// ...). Implementations must treat unknown or stale SKUs as `None`, not
/// as an error: the cart tolerates lines whose SKU no longer resolves by
/// skipping stock clamps and falling back to the line's own price.
pub trait Catalogue {
    /// Looks up a product by SKU. `None` when the SKU is unknown.
    fn get_product(&self, sku: &str) -> Option<CatalogueItem>;
}

// =============================================================================
// Customer
// =============================================================================

/// A second contact person for the delivery (optional).
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ContactPerson {
    pub name: String,
    pub phone: String,
}

/// Delivery address.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub unit: Option<String>,
    pub street: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postcode: String,
    /// Driver notes ("gate code 4411", "steep driveway").
    pub notes: Option<String>,
}

/// The customer the sale is being created for.
///
/// ## Invariant
/// The display name is always derived from `first_name` and `last_name`;
/// it is computed on demand and never stored, so the two can never drift
/// apart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub secondary_phone: Option<String>,
    pub email: Option<String>,
    pub second_contact: Option<ContactPerson>,
    pub address: Address,
}

impl Customer {
    /// Computed display name: `first + " " + last`, trimmed.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

// =============================================================================
// Delivery
// =============================================================================

/// The three chargeable delivery add-on services.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryServices {
    /// In-room placement and unpacking.
    pub white_glove: bool,
    /// Old mattress removal and disposal.
    pub remove_old_mattress: bool,
    /// Bed frame / base assembly.
    pub setup: bool,
}

impl DeliveryServices {
    /// Sum of the selected add-on fees (fixed constants, in cents).
    pub fn fee(&self) -> Money {
        let mut cents = 0;
        if self.white_glove {
            cents += WHITE_GLOVE_FEE_CENTS;
        }
        if self.remove_old_mattress {
            cents += MATTRESS_REMOVAL_FEE_CENTS;
        }
        if self.setup {
            cents += SETUP_FEE_CENTS;
        }
        Money::from_cents(cents)
    }
}

/// Delivery scheduling for the sale.
///
/// Scheduling is optional: `choose_later` defers the date/slot decision
/// to a follow-up call and is always a valid delivery selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetails {
    /// Customer will be called to schedule after the sale.
    pub choose_later: bool,

    /// Chosen delivery date (when scheduling now).
    #[ts(as = "Option<String>")]
    pub date: Option<chrono::NaiveDate>,

    /// Chosen time slot label ("8am-12pm").
    pub time_slot: Option<String>,

    /// Special delivery instructions.
    pub instructions: Option<String>,

    /// Selected add-on services.
    #[serde(default)]
    pub services: DeliveryServices,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid in full at the counter.
    Cash,
    /// Card on the store terminal.
    Card,
    /// Deposit now, balance on delivery.
    Financing,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: StockStatus, quantity: i64) -> CatalogueItem {
        CatalogueItem {
            sku: "DT-1001".to_string(),
            name: "Dreamtime Plush Queen".to_string(),
            price: Money::from_cents(199900),
            stock: StockInfo {
                status,
                quantity,
                lead_time_text: None,
            },
            colours: Vec::new(),
        }
    }

    #[test]
    fn test_discount_rate_from_bps() {
        let rate = DiscountRate::from_bps(500);
        assert_eq!(rate.bps(), 500);
        assert!((rate.percentage() - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_discount_rate_from_percentage() {
        let rate = DiscountRate::from_percentage(7.5);
        assert_eq!(rate.bps(), 750);
    }

    #[test]
    fn test_stock_status_wire_spelling() {
        let json = serde_json::to_string(&StockStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out-of-stock\"");
        let back: StockStatus = serde_json::from_str("\"low-stock\"").unwrap();
        assert_eq!(back, StockStatus::LowStock);
    }

    #[test]
    fn test_can_add_rules() {
        assert!(item(StockStatus::InStock, 5).can_add());
        assert!(item(StockStatus::LowStock, 1).can_add());
        assert!(item(StockStatus::OutOfStock, 0).can_add()); // back-order
        assert!(!item(StockStatus::InStock, 0).can_add());
        assert!(!item(StockStatus::LowStock, 0).can_add());
        assert!(!item(StockStatus::Discontinued, 10).can_add());
    }

    #[test]
    fn test_stock_cap_rules() {
        assert_eq!(item(StockStatus::InStock, 5).stock_cap(), Some(5));
        assert_eq!(item(StockStatus::LowStock, 1).stock_cap(), Some(1));
        assert_eq!(item(StockStatus::OutOfStock, 0).stock_cap(), None);
        assert_eq!(item(StockStatus::Discontinued, 3).stock_cap(), None);
        assert_eq!(item(StockStatus::InStock, 0).stock_cap(), None);
    }

    #[test]
    fn test_display_name_is_derived_and_trimmed() {
        let customer = Customer {
            first_name: "  May ".to_string(),
            last_name: " Chen ".to_string(),
            ..Customer::default()
        };
        assert_eq!(customer.display_name(), "May Chen");

        let only_first = Customer {
            first_name: "May".to_string(),
            ..Customer::default()
        };
        assert_eq!(only_first.display_name(), "May");
    }

    #[test]
    fn test_delivery_services_fee() {
        let none = DeliveryServices::default();
        assert_eq!(none.fee(), Money::zero());

        let all = DeliveryServices {
            white_glove: true,
            remove_old_mattress: true,
            setup: true,
        };
        assert_eq!(
            all.fee().cents(),
            WHITE_GLOVE_FEE_CENTS + MATTRESS_REMOVAL_FEE_CENTS + SETUP_FEE_CENTS
        );
    }
}
