//! # Cart Module
//!
//! The line-item store: the ordered list of cart lines and the four
//! mutations the wizard performs on it.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line Item Operations                                 │
//! │                                                                         │
//! │  Cashier Action           Operation               Line List Change      │
//! │  ──────────────           ─────────               ────────────────      │
//! │                                                                         │
//! │  Click Product ──────────► add_line() ──────────► push / qty += 1      │
//! │                                                                         │
//! │  +/- Stepper ────────────► update_quantity() ───► qty += delta         │
//! │                                                    (clamped to stock)   │
//! │                                                                         │
//! │  Click Remove ───────────► remove_line() ───────► retain(id != ..)     │
//! │                                                                         │
//! │  Edit Price ─────────────► set_price() ─────────► negotiated price     │
//! │                                                                         │
//! │  REJECTED INPUTS ARE SILENT NO-OPS: the list is left unchanged and     │
//! │  the operation reports it. Callers that need user feedback diff the    │
//! │  before/after state - nothing here throws.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `qty >= 1` for every line, always. A line that would drop to zero
//!   must be removed with `remove_line`, never zeroed.
//! - Line ids are assigned from a monotonically increasing counter,
//!   unique within a draft, and stable for the line's lifetime.
//! - Lines are unique by `(sku, colour)`: adding the same pair again
//!   increments the quantity instead of creating a second line.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::Catalogue;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Line
// =============================================================================

/// One cart entry.
///
/// ## Design Notes
/// - `price` is the *negotiated* unit price. It starts at the catalogue
///   RRP when the line is created and diverges when the cashier applies
///   a manual discount via `set_price`.
/// - `name` is frozen at add time so the cart keeps displaying
///   consistently even if the catalogue entry changes underneath it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Store-assigned id, stable for the line's lifetime.
    pub id: i64,

    /// SKU at time of adding.
    pub sku: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Quantity. Always >= 1.
    pub qty: i64,

    /// Negotiated unit price (starts at RRP).
    pub price: Money,

    /// Chosen colour variant, when the product has variants.
    pub colour: Option<String>,
}

impl Line {
    /// Line total at the negotiated price.
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.qty)
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// The ordered list of cart lines plus the id counter.
///
/// All operations are synchronous, deterministic transformations of the
/// list; persistence and user feedback are the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItems {
    lines: Vec<Line>,
    next_id: i64,
}

impl Default for LineItems {
    fn default() -> Self {
        LineItems::new()
    }
}

impl LineItems {
    /// Creates an empty line list. Ids start at 1.
    pub fn new() -> Self {
        LineItems {
            lines: Vec::new(),
            next_id: 1,
        }
    }

    /// Adds one unit of a SKU (optionally a specific colour variant).
    ///
    /// ## Behavior
    /// - Unknown SKU, discontinued item, or counted stock at zero:
    ///   no-op, returns `None`.
    /// - Existing `(sku, colour)` line: quantity += 1, **unless** that
    ///   would exceed the stock count for a counted item (out-of-stock
    ///   items are back-orderable with no upper bound) - then no-op.
    /// - Otherwise: new line with `qty = 1` at the catalogue RRP,
    ///   consuming the next id.
    ///
    /// ## Returns
    /// The id of the created or incremented line, or `None` when the
    /// input was rejected and the list is unchanged.
    pub fn add_line(
        &mut self,
        catalogue: &dyn Catalogue,
        sku: &str,
        colour: Option<&str>,
    ) -> Option<i64> {
        let item = catalogue.get_product(sku)?;
        if !item.can_add() {
            return None;
        }

        // Merge with an existing (sku, colour) line when possible
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.sku == sku && l.colour.as_deref() == colour)
        {
            if let Some(cap) = item.stock_cap() {
                if line.qty + 1 > cap {
                    return None;
                }
            }
            if line.qty + 1 > MAX_LINE_QUANTITY {
                return None;
            }
            line.qty += 1;
            return Some(line.id);
        }

        if self.lines.len() >= MAX_CART_LINES {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.lines.push(Line {
            id,
            sku: item.sku.clone(),
            name: item.name.clone(),
            qty: 1,
            price: item.price,
            colour: colour.map(str::to_string),
        });
        Some(id)
    }

    /// Adds `delta` to a line's quantity.
    ///
    /// ## Behavior
    /// - Refuses to drop below 1: callers must use `remove_line` to take
    ///   a line out, so "remove" is always an explicit action.
    /// - Clamps the new quantity to the stock count for counted items
    ///   (in-stock / low-stock with a positive count). No clamp for
    ///   back-orderable items or SKUs the catalogue no longer resolves.
    ///
    /// ## Returns
    /// `true` if the quantity actually changed.
    pub fn update_quantity(&mut self, catalogue: &dyn Catalogue, id: i64, delta: i64) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return false;
        };

        let mut new_qty = line.qty + delta;
        if new_qty < 1 {
            return false;
        }

        if let Some(cap) = catalogue
            .get_product(&line.sku)
            .and_then(|item| item.stock_cap())
        {
            new_qty = new_qty.min(cap);
        }
        new_qty = new_qty.min(MAX_LINE_QUANTITY);

        if new_qty == line.qty {
            return false;
        }
        line.qty = new_qty;
        true
    }

    /// Removes a line by id. Idempotent: a missing id is a no-op.
    ///
    /// ## Returns
    /// `true` if a line was removed.
    pub fn remove_line(&mut self, id: i64) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    /// Sets an explicit negotiated unit price on a line.
    ///
    /// The store accepts any `Money` value; rejecting non-positive
    /// prices is the session boundary's responsibility
    /// (see `validation::validate_unit_price`).
    ///
    /// ## Returns
    /// `true` if the price changed.
    pub fn set_price(&mut self, id: i64, price: Money) -> bool {
        let Some(line) = self.lines.iter_mut().find(|l| l.id == id) else {
            return false;
        };
        if line.price == price {
            return false;
        }
        line.price = price;
        true
    }

    /// Looks up a line by id.
    pub fn get(&self, id: i64) -> Option<&Line> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// All lines, in insertion order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.qty).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Clears all lines. The id counter is NOT reset: ids stay unique
    /// for the lifetime of the draft.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CatalogueItem, StockInfo, StockStatus};
    use std::collections::HashMap;

    /// Minimal catalogue stub for cart tests.
    struct StubCatalogue {
        items: HashMap<String, CatalogueItem>,
    }

    impl StubCatalogue {
        fn new(items: Vec<CatalogueItem>) -> Self {
            StubCatalogue {
                items: items.into_iter().map(|i| (i.sku.clone(), i)).collect(),
            }
        }
    }

    impl Catalogue for StubCatalogue {
        fn get_product(&self, sku: &str) -> Option<CatalogueItem> {
            self.items.get(sku).cloned()
        }
    }

    fn item(sku: &str, price_cents: i64, status: StockStatus, quantity: i64) -> CatalogueItem {
        CatalogueItem {
            sku: sku.to_string(),
            name: format!("Product {}", sku),
            price: Money::from_cents(price_cents),
            stock: StockInfo {
                status,
                quantity,
                lead_time_text: None,
            },
            colours: Vec::new(),
        }
    }

    fn catalogue() -> StubCatalogue {
        StubCatalogue::new(vec![
            item("DT-1001", 199900, StockStatus::InStock, 10),
            item("DT-2002", 89900, StockStatus::LowStock, 1),
            item("DT-3003", 49900, StockStatus::OutOfStock, 0),
            item("DT-4004", 29900, StockStatus::Discontinued, 4),
            item("DT-5005", 19900, StockStatus::InStock, 0),
        ])
    }

    #[test]
    fn test_add_line_creates_line_at_rrp() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        let id = lines.add_line(&cat, "DT-1001", None).unwrap();
        assert_eq!(id, 1);
        assert_eq!(lines.line_count(), 1);

        let line = lines.get(id).unwrap();
        assert_eq!(line.qty, 1);
        assert_eq!(line.price, Money::from_cents(199900));
        assert_eq!(line.colour, None);
    }

    #[test]
    fn test_add_line_merges_same_sku_and_colour() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        let first = lines.add_line(&cat, "DT-1001", None).unwrap();
        let second = lines.add_line(&cat, "DT-1001", None).unwrap();

        assert_eq!(first, second); // same line, not two lines
        assert_eq!(lines.line_count(), 1);
        assert_eq!(lines.get(first).unwrap().qty, 2);
    }

    #[test]
    fn test_add_line_different_colour_is_a_new_line() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        let white = lines.add_line(&cat, "DT-1001", Some("White")).unwrap();
        let oak = lines.add_line(&cat, "DT-1001", Some("Oak")).unwrap();

        assert_ne!(white, oak);
        assert_eq!(lines.line_count(), 2);
    }

    #[test]
    fn test_add_line_rejects_unknown_and_unsaleable() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        assert_eq!(lines.add_line(&cat, "NOPE-1", None), None); // unknown
        assert_eq!(lines.add_line(&cat, "DT-4004", None), None); // discontinued
        assert_eq!(lines.add_line(&cat, "DT-5005", None), None); // in-stock, qty 0
        assert!(lines.is_empty());
    }

    #[test]
    fn test_add_line_increment_respects_stock_cap() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        // DT-2002 is low-stock with exactly 1 unit
        let id = lines.add_line(&cat, "DT-2002", None).unwrap();
        assert_eq!(lines.add_line(&cat, "DT-2002", None), None);
        assert_eq!(lines.get(id).unwrap().qty, 1);
    }

    #[test]
    fn test_add_line_backorder_has_no_cap() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        let id = lines.add_line(&cat, "DT-3003", None).unwrap();
        for _ in 0..4 {
            lines.add_line(&cat, "DT-3003", None).unwrap();
        }
        assert_eq!(lines.get(id).unwrap().qty, 5);
    }

    #[test]
    fn test_update_quantity_clamps_to_stock() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        // stock.quantity = 1, so +1 twice stays clamped at 1
        let id = lines.add_line(&cat, "DT-2002", None).unwrap();
        assert!(!lines.update_quantity(&cat, id, 1));
        assert!(!lines.update_quantity(&cat, id, 1));
        assert_eq!(lines.get(id).unwrap().qty, 1);
    }

    #[test]
    fn test_update_quantity_never_drops_below_one() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        let id = lines.add_line(&cat, "DT-1001", None).unwrap();
        assert!(!lines.update_quantity(&cat, id, -1)); // would hit 0
        assert_eq!(lines.get(id).unwrap().qty, 1);

        lines.update_quantity(&cat, id, 4);
        assert!(lines.update_quantity(&cat, id, -2));
        assert_eq!(lines.get(id).unwrap().qty, 3);
    }

    #[test]
    fn test_update_quantity_unresolvable_sku_is_unclamped() {
        let cat = catalogue();
        let mut lines = LineItems::new();
        let id = lines.add_line(&cat, "DT-1001", None).unwrap();

        // Catalogue loses the SKU after the line was created
        let empty = StubCatalogue::new(vec![]);
        assert!(lines.update_quantity(&empty, id, 50));
        assert_eq!(lines.get(id).unwrap().qty, 51);
    }

    #[test]
    fn test_remove_line_is_idempotent() {
        let cat = catalogue();
        let mut lines = LineItems::new();
        let id = lines.add_line(&cat, "DT-1001", None).unwrap();

        assert!(lines.remove_line(id));
        assert!(!lines.remove_line(id)); // already gone: no-op
        assert!(lines.is_empty());
    }

    #[test]
    fn test_set_price_applies_manual_discount() {
        let cat = catalogue();
        let mut lines = LineItems::new();
        let id = lines.add_line(&cat, "DT-1001", None).unwrap();

        assert!(lines.set_price(id, Money::from_cents(179900)));
        assert_eq!(lines.get(id).unwrap().price, Money::from_cents(179900));
        assert!(!lines.set_price(id, Money::from_cents(179900))); // unchanged
        assert!(!lines.set_price(99, Money::from_cents(100))); // no such line
    }

    #[test]
    fn test_ids_are_monotonic_and_survive_removal() {
        let cat = catalogue();
        let mut lines = LineItems::new();

        let a = lines.add_line(&cat, "DT-1001", None).unwrap();
        let b = lines.add_line(&cat, "DT-3003", None).unwrap();
        lines.remove_line(a);
        let c = lines.add_line(&cat, "DT-2002", None).unwrap();

        assert!(b > a);
        assert!(c > b); // counter never reuses ids
    }

    #[test]
    fn test_line_total() {
        let line = Line {
            id: 1,
            sku: "DT-1001".to_string(),
            name: "x".to_string(),
            qty: 2,
            price: Money::from_cents(199900),
            colour: None,
        };
        assert_eq!(line.line_total().cents(), 399800);
    }
}
