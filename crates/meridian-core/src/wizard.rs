//! # Wizard Module
//!
//! The sale draft aggregate and the 4-step navigator that decides what
//! data is collected, in what order.
//!
//! ## Step Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Create Sale Wizard                                 │
//! │                                                                         │
//! │  ┌──────────┐ next ┌──────────┐ next ┌──────────┐ next ┌──────────┐    │
//! │  │ Customer │─────►│ Products │─────►│ Delivery │─────►│ Payment  │    │
//! │  └──────────┘      └──────────┘      └──────────┘      └────┬─────┘    │
//! │       ▲  ◄── prev ──────┴── prev ──────────┴── prev ───┘    │          │
//! │       │                                                 complete()     │
//! │       │                                                      │          │
//! │  next from an INVALID step: stays put, marks the step        ▼          │
//! │  "attempted" so its errors become visible.             Order Submission │
//! │                                                                         │
//! │  go_to_step: only the current step, a completed step, or the step      │
//! │  immediately after the last completed one - no jumping ahead past      │
//! │  unvalidated steps.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The navigator is linear: no branching, no skipping. All transitions
//! are synchronous; the only async action in a sale's life (submission)
//! lives in the session layer, which calls [`SaleDraft::assemble_order`]
//! once [`SaleDraft::can_complete`] says so.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Line, LineItems};
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::totals::SaleTotals;
use crate::types::{Catalogue, Customer, DeliveryDetails, DiscountRate, PaymentMethod};
use crate::validation::{
    customer_step, delivery_step, payment_step, products_step, DraftValidation,
};

// =============================================================================
// Wizard Step
// =============================================================================

/// The four wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Customer,
    Products,
    Delivery,
    Payment,
}

impl WizardStep {
    /// All steps in wizard order.
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Customer,
        WizardStep::Products,
        WizardStep::Delivery,
        WizardStep::Payment,
    ];

    /// Zero-based position in the wizard.
    pub const fn index(&self) -> usize {
        match self {
            WizardStep::Customer => 0,
            WizardStep::Products => 1,
            WizardStep::Delivery => 2,
            WizardStep::Payment => 3,
        }
    }

    /// The following step, if any.
    pub const fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Customer => Some(WizardStep::Products),
            WizardStep::Products => Some(WizardStep::Delivery),
            WizardStep::Delivery => Some(WizardStep::Payment),
            WizardStep::Payment => None,
        }
    }

    /// The preceding step, if any.
    pub const fn prev(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Customer => None,
            WizardStep::Products => Some(WizardStep::Customer),
            WizardStep::Delivery => Some(WizardStep::Products),
            WizardStep::Payment => Some(WizardStep::Delivery),
        }
    }
}

// =============================================================================
// Order Payload
// =============================================================================

/// The assembled order handed to the Order Submission collaborator.
///
/// Totals are included as computed at assembly time so the receiving
/// system records exactly what the cashier saw.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub customer: Customer,
    /// Derived display name, denormalized for the order record.
    pub customer_name: String,
    pub lines: Vec<Line>,
    pub delivery: DeliveryDetails,
    pub payment_method: PaymentMethod,
    pub totals: SaleTotals,
}

// =============================================================================
// Sale Draft
// =============================================================================

/// The in-progress, not-yet-submitted sale being composed by the wizard.
///
/// ## Lifecycle
/// Created empty on wizard entry (or restored from a persisted snapshot
/// younger than the session-expiry window), mutated field-by-field as
/// the cashier works, cleared on successful submission. The aggregate
/// exclusively owns its customer, lines, and delivery details - nothing
/// is shared across drafts.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub customer: Customer,
    pub lines: LineItems,
    pub delivery: DeliveryDetails,

    /// Base delivery fee for the store, before add-on services.
    pub delivery_fee_base: Money,

    /// Overall percentage discount.
    pub discount: DiscountRate,

    pub payment_method: Option<PaymentMethod>,

    /// Cashier-entered deposit override (financing). `None` means the
    /// 30% default applies.
    pub deposit: Option<Money>,

    current_step: WizardStep,
    completed_steps: Vec<WizardStep>,
    attempted_steps: Vec<WizardStep>,

    /// When the draft was last snapshotted by the autosaver.
    #[ts(as = "Option<String>")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl SaleDraft {
    /// Creates an empty draft starting at the customer step.
    pub fn new(delivery_fee_base: Money) -> Self {
        SaleDraft {
            customer: Customer::default(),
            lines: LineItems::new(),
            delivery: DeliveryDetails::default(),
            delivery_fee_base,
            discount: DiscountRate::zero(),
            payment_method: None,
            deposit: None,
            current_step: WizardStep::Customer,
            completed_steps: Vec::new(),
            attempted_steps: Vec::new(),
            saved_at: None,
        }
    }

    /// The step the wizard is currently showing.
    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    /// Whether a step has been completed (validated and left via next).
    pub fn is_completed(&self, step: WizardStep) -> bool {
        self.completed_steps.contains(&step)
    }

    /// Whether the cashier has tried to leave a step yet.
    pub fn is_attempted(&self, step: WizardStep) -> bool {
        self.attempted_steps.contains(&step)
    }

    fn mark_attempted(&mut self, step: WizardStep) {
        if !self.attempted_steps.contains(&step) {
            self.attempted_steps.push(step);
        }
    }

    fn unmark_attempted(&mut self, step: WizardStep) {
        self.attempted_steps.retain(|s| *s != step);
    }

    fn mark_completed(&mut self, step: WizardStep) {
        if !self.completed_steps.contains(&step) {
            self.completed_steps.push(step);
        }
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Runs all four step validators against the current draft state.
    ///
    /// Pure and side-effect-free, so it can be re-run on every change.
    /// `today` is injected - the draft never reads the clock.
    pub fn validate(&self, today: NaiveDate) -> DraftValidation {
        let customer = customer_step(&self.customer, self.is_attempted(WizardStep::Customer));
        let products = products_step(&self.lines, self.is_attempted(WizardStep::Products));
        let delivery = delivery_step(
            &self.delivery,
            today,
            self.is_attempted(WizardStep::Delivery),
        );
        let payment = payment_step(
            self.payment_method,
            self.deposit,
            self.is_attempted(WizardStep::Payment),
        );

        let is_valid =
            customer.is_valid && products.is_valid && delivery.is_valid && payment.is_valid;

        DraftValidation {
            customer,
            products,
            delivery,
            payment,
            is_valid,
        }
    }

    /// Whether a single step currently passes, ignoring attempted flags.
    pub fn step_is_valid(&self, step: WizardStep, today: NaiveDate) -> bool {
        match step {
            WizardStep::Customer => customer_step(&self.customer, false).is_valid,
            WizardStep::Products => products_step(&self.lines, false).is_valid,
            WizardStep::Delivery => delivery_step(&self.delivery, today, false).is_valid,
            WizardStep::Payment => payment_step(self.payment_method, self.deposit, false).is_valid,
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Tries to advance to the next step.
    ///
    /// Marks the current step attempted either way - that is what makes
    /// its errors visible. Advances (and marks the step completed) only
    /// when the step validates.
    ///
    /// ## Returns
    /// `true` if the wizard moved.
    pub fn next_step(&mut self, today: NaiveDate) -> bool {
        let current = self.current_step;
        self.mark_attempted(current);

        if !self.step_is_valid(current, today) {
            return false;
        }
        self.mark_completed(current);

        match current.next() {
            Some(next) => {
                self.current_step = next;
                true
            }
            None => false, // payment is terminal; complete() takes over
        }
    }

    /// Moves to the preceding step. Always allowed.
    ///
    /// Stepping back from Delivery also clears the Products attempted
    /// flag so re-entering the cart doesn't greet the cashier with
    /// stale errors.
    ///
    /// ## Returns
    /// `true` if the wizard moved.
    pub fn prev_step(&mut self) -> bool {
        let Some(prev) = self.current_step.prev() else {
            return false;
        };
        if self.current_step == WizardStep::Delivery {
            self.unmark_attempted(WizardStep::Products);
        }
        self.current_step = prev;
        true
    }

    /// Direct jump to a step.
    ///
    /// Permitted only for the current step, an already-completed step,
    /// or the step immediately following the last completed one - the
    /// step-indicator UI offers exactly these.
    ///
    /// ## Returns
    /// `true` if the jump was permitted.
    pub fn go_to_step(&mut self, step: WizardStep) -> bool {
        if !self.step_is_reachable(step) {
            return false;
        }
        self.current_step = step;
        true
    }

    /// Whether the step indicator should let the cashier click a step.
    pub fn step_is_reachable(&self, step: WizardStep) -> bool {
        if step == self.current_step || self.is_completed(step) {
            return true;
        }
        let frontier = self
            .completed_steps
            .iter()
            .map(|s| s.index())
            .max()
            .map_or(0, |i| i + 1);
        step.index() == frontier
    }

    // -------------------------------------------------------------------------
    // Totals & Completion
    // -------------------------------------------------------------------------

    /// Current totals breakdown for the draft.
    pub fn totals(&self, catalogue: &dyn Catalogue) -> SaleTotals {
        SaleTotals::compute(
            &self.lines,
            &self.delivery,
            self.delivery_fee_base,
            self.discount,
            self.deposit,
            catalogue,
        )
    }

    /// Whether the terminal action is available: on the payment step
    /// with every step valid.
    pub fn can_complete(&self, today: NaiveDate) -> bool {
        self.current_step == WizardStep::Payment
            && WizardStep::ALL
                .iter()
                .all(|s| self.step_is_valid(*s, today))
    }

    /// Assembles the order payload for submission.
    ///
    /// Fails with a typed error naming the offending step when the draft
    /// is not submittable; the draft itself is never modified here, so a
    /// failed submission keeps everything the cashier entered.
    pub fn assemble_order(
        &self,
        catalogue: &dyn Catalogue,
        today: NaiveDate,
    ) -> CoreResult<OrderPayload> {
        if self.current_step != WizardStep::Payment {
            return Err(CoreError::NotOnPaymentStep {
                current: self.current_step,
            });
        }
        for step in WizardStep::ALL {
            if !self.step_is_valid(step, today) {
                return Err(CoreError::DraftIncomplete { step });
            }
        }
        let payment_method = self.payment_method.ok_or(CoreError::DraftIncomplete {
            step: WizardStep::Payment,
        })?;

        Ok(OrderPayload {
            customer: self.customer.clone(),
            customer_name: self.customer.display_name(),
            lines: self.lines.lines().to_vec(),
            delivery: self.delivery.clone(),
            payment_method,
            totals: self.totals(catalogue),
        })
    }

    /// Resets the draft to a fresh sale, keeping the store's base fee.
    ///
    /// Used after a successful submission and when a stale persisted
    /// draft is discarded.
    pub fn clear(&mut self) {
        *self = SaleDraft::new(self.delivery_fee_base);
    }
}

impl Default for SaleDraft {
    fn default() -> Self {
        SaleDraft::new(Money::zero())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
