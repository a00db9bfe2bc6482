//! # Totals Module
//!
//! The sale totals pipeline: one pure function from (lines, delivery,
//! fees, discount) to the full breakdown the cashier sees before
//! submitting.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Totals Pipeline (all cents)                          │
//! │                                                                         │
//! │  per line:  itemsSum  += RRP   × qty   (catalogue lookup, fallback     │
//! │             subtotal  += price × qty    to line price if SKU gone)     │
//! │                                                                         │
//! │  lineDiscount = itemsSum − subtotal     (manual per-line discounts)    │
//! │                                                                         │
//! │  deliveryFee  = baseFee + Σ selected service fees                      │
//! │                                                                         │
//! │  beforeDiscount = subtotal + deliveryFee                               │
//! │  discount       = round½↑(beforeDiscount × pct)                        │
//! │  total          = beforeDiscount − discount                            │
//! │                                                                         │
//! │  deposit   = round½↑(total × 30%)   (financing; cashier may override   │
//! │  remaining = total − deposit         within [0, total])                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding happens at each named step, never once at the end, so the
//! figures on screen always sum exactly.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::LineItems;
use crate::money::Money;
use crate::types::{Catalogue, DeliveryDetails, DiscountRate};
use crate::DEPOSIT_RATE_BPS;

// =============================================================================
// Sale Totals
// =============================================================================

/// The derived totals breakdown for a draft.
///
/// Never persisted on its own - recomputed from the draft on every
/// relevant change, so it can't drift from the lines it describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    /// Σ RRP × qty - what the cart would cost at catalogue prices.
    pub items_sum: Money,

    /// itemsSum − subtotal: the value of manual per-line discounts.
    pub line_discount: Money,

    /// Σ negotiated price × qty.
    pub subtotal: Money,

    /// Base delivery fee plus selected add-on services.
    pub delivery_fee: Money,

    /// Overall percentage discount applied to subtotal + deliveryFee.
    pub discount: Money,

    /// Grand total.
    pub total: Money,

    /// Deposit due now (financing); 30% of total unless overridden.
    pub deposit: Money,

    /// Balance due on delivery (financing).
    pub remaining: Money,
}

impl SaleTotals {
    /// Computes the full breakdown.
    ///
    /// Pure and idempotent: identical inputs always produce identical
    /// output, so the wizard can call this speculatively (e.g. to
    /// preview whether "next" would be enabled) without committing to
    /// anything.
    ///
    /// ## Arguments
    /// * `deposit_override` - cashier-entered deposit; clamped into
    ///   `[0, total]`. `None` uses the 30% default.
    pub fn compute(
        lines: &LineItems,
        delivery: &DeliveryDetails,
        delivery_fee_base: Money,
        discount_rate: DiscountRate,
        deposit_override: Option<Money>,
        catalogue: &dyn Catalogue,
    ) -> SaleTotals {
        let mut items_sum = Money::zero();
        let mut subtotal = Money::zero();

        for line in lines.lines() {
            // RRP via catalogue; a SKU that no longer resolves falls back
            // to the line's own price (no phantom discount either way).
            let rrp = catalogue
                .get_product(&line.sku)
                .map(|item| item.price)
                .unwrap_or(line.price);
            items_sum += rrp.multiply_quantity(line.qty);
            subtotal += line.line_total();
        }

        let line_discount = items_sum - subtotal;
        let delivery_fee = delivery_fee_base + delivery.services.fee();

        let before_discount = subtotal + delivery_fee;
        let discount = before_discount.at_rate(discount_rate.bps());
        let total = before_discount - discount;

        let deposit = match deposit_override {
            Some(d) => d.clamp(Money::zero(), total),
            None => total.at_rate(DEPOSIT_RATE_BPS),
        };
        let remaining = total - deposit;

        SaleTotals {
            items_sum,
            line_discount,
            subtotal,
            delivery_fee,
            discount,
            total,
            deposit,
            remaining,
        }
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

    struct StubCatalogue {
        items: HashMap<String, CatalogueItem>,
    }

    impl Catalogue for StubCatalogue {
        fn get_product(&self, sku: &str) -> Option<CatalogueItem> {
            self.items.get(sku).cloned()
        }
    }

    fn catalogue() -> StubCatalogue {
        let item = CatalogueItem {
            sku: "DT-1001".to_string(),
            name: "Dreamtime Plush Queen".to_string(),
            price: Money::from_cents(199900),
            stock: StockInfo {
                status: StockStatus::InStock,
                quantity: 10,
                lead_time_text: None,
            },
            colours: Vec::new(),
        };
        StubCatalogue {
            items: HashMap::from([(item.sku.clone(), item)]),
        }
    }

    fn cart_with_two_units(cat: &StubCatalogue) -> LineItems {
        let mut lines = LineItems::new();
        lines.add_line(cat, "DT-1001", None).unwrap();
        lines.add_line(cat, "DT-1001", None).unwrap();
        lines
    }

    #[test]
    fn test_plain_cart_no_discounts() {
        let cat = catalogue();
        let lines = cart_with_two_units(&cat);

        let totals = SaleTotals::compute(
            &lines,
            &DeliveryDetails::default(),
            Money::zero(),
            DiscountRate::zero(),
            None,
            &cat,
        );

        assert_eq!(totals.subtotal.cents(), 399800);
        assert_eq!(totals.items_sum.cents(), 399800);
        assert_eq!(totals.line_discount, Money::zero());
        assert_eq!(totals.discount, Money::zero());
        assert_eq!(totals.total.cents(), 399800);
    }

    #[test]
    fn test_manual_line_discount_shows_in_breakdown() {
        let cat = catalogue();
        let mut lines = cart_with_two_units(&cat);
        let id = lines.lines()[0].id;
        lines.set_price(id, Money::from_cents(179900)); // $200 off per unit

        let totals = SaleTotals::compute(
            &lines,
            &DeliveryDetails::default(),
            Money::zero(),
            DiscountRate::zero(),
            None,
            &cat,
        );

        // (rrp - price) × qty = 20000 × 2
        assert_eq!(totals.line_discount.cents(), 40000);
        assert!(totals.line_discount.is_positive());
        assert_eq!(totals.subtotal.cents(), 359800);
        assert_eq!(totals.items_sum.cents(), 399800);
    }

    #[test]
    fn test_delivery_fee_and_services() {
        let cat = catalogue();
        let lines = cart_with_two_units(&cat);
        let delivery = DeliveryDetails {
            services: crate::types::DeliveryServices {
                white_glove: true,
                remove_old_mattress: false,
                setup: true,
            },
            ..DeliveryDetails::default()
        };

        let totals = SaleTotals::compute(
            &lines,
            &delivery,
            Money::from_cents(9900),
            DiscountRate::zero(),
            None,
            &cat,
        );

        // base 9900 + white glove 14900 + setup 9900
        assert_eq!(totals.delivery_fee.cents(), 34700);
        assert_eq!(totals.total.cents(), 399800 + 34700);
    }

    #[test]
    fn test_overall_discount_rounds_half_up() {
        let cat = catalogue();
        let lines = cart_with_two_units(&cat);

        let totals = SaleTotals::compute(
            &lines,
            &DeliveryDetails::default(),
            Money::from_cents(9900),
            DiscountRate::from_percentage(7.5),
            None,
            &cat,
        );

        // before = 409700; 7.5% = 30727.5 → 30728 (half-up)
        assert_eq!(totals.discount.cents(), 30728);
        assert_eq!(totals.total.cents(), 409700 - 30728);
        // invariant: total = subtotal + deliveryFee − discount
        assert_eq!(
            totals.total,
            totals.subtotal + totals.delivery_fee - totals.discount
        );
    }

    #[test]
    fn test_zero_discount_is_exact() {
        let cat = catalogue();
        let lines = cart_with_two_units(&cat);

        let totals = SaleTotals::compute(
            &lines,
            &DeliveryDetails::default(),
            Money::from_cents(9900),
            DiscountRate::zero(),
            None,
            &cat,
        );

        assert_eq!(totals.discount, Money::zero());
        assert_eq!(totals.total, totals.subtotal + totals.delivery_fee);
    }

    #[test]
    fn test_deposit_defaults_to_thirty_percent() {
        let cat = catalogue();
        let lines = cart_with_two_units(&cat);

        let totals = SaleTotals::compute(
            &lines,
            &DeliveryDetails::default(),
            Money::zero(),
            DiscountRate::zero(),
            None,
            &cat,
        );

        assert_eq!(totals.deposit.cents(), 119940); // 30% of 399800
        assert_eq!(totals.remaining, totals.total - totals.deposit);
    }

    #[test]
    fn test_deposit_override_is_clamped() {
        let cat = catalogue();
        let lines = cart_with_two_units(&cat);
        let compute = |over| {
            SaleTotals::compute(
                &lines,
                &DeliveryDetails::default(),
                Money::zero(),
                DiscountRate::zero(),
                over,
                &cat,
            )
        };

        let too_big = compute(Some(Money::from_cents(999999999)));
        assert_eq!(too_big.deposit, too_big.total);
        assert_eq!(too_big.remaining, Money::zero());

        let negative = compute(Some(Money::from_cents(-100)));
        assert_eq!(negative.deposit, Money::zero());
        assert_eq!(negative.remaining, negative.total);

        let exact = compute(Some(Money::from_cents(50000)));
        assert_eq!(exact.deposit.cents(), 50000);
    }

    #[test]
    fn test_unresolvable_sku_falls_back_to_line_price() {
        let cat = catalogue();
        let lines = cart_with_two_units(&cat);

        // Catalogue lost the SKU: RRP falls back to the line price, so
        // no phantom line discount appears.
        let empty = StubCatalogue {
            items: HashMap::new(),
        };
        let totals = SaleTotals::compute(
            &lines,
            &DeliveryDetails::default(),
            Money::zero(),
            DiscountRate::zero(),
            None,
            &empty,
        );

        assert_eq!(totals.items_sum, totals.subtotal);
        assert_eq!(totals.line_discount, Money::zero());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let cat = catalogue();
        let lines = cart_with_two_units(&cat);
        let run = || {
            SaleTotals::compute(
                &lines,
                &DeliveryDetails::default(),
                Money::from_cents(9900),
                DiscountRate::from_bps(750),
                Some(Money::from_cents(100000)),
                &cat,
            )
        };
        assert_eq!(run(), run());
    }
}
